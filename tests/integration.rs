// SPDX-License-Identifier: MPL-2.0
use iced_lumen::app::config::{self, Config};
use iced_lumen::i18n::fluent::I18n;
use iced_lumen::media::TensorLayout;
use tempfile::tempdir;

#[test]
fn test_language_change_via_config() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");

    std::fs::write(&path, "[general]\nlanguage = \"en-US\"\n")
        .expect("Failed to write initial config file");
    let loaded = config::load_from_path(&path).expect("Failed to load initial config");
    let i18n_en = I18n::new(None, &loaded);
    assert_eq!(i18n_en.current_locale().to_string(), "en-US");
    assert_eq!(i18n_en.tr("button-upload"), "Upload a Low-Light Image");

    std::fs::write(&path, "[general]\nlanguage = \"fr\"\n")
        .expect("Failed to write french config file");
    let loaded = config::load_from_path(&path).expect("Failed to load french config");
    let i18n_fr = I18n::new(None, &loaded);
    assert_eq!(i18n_fr.current_locale().to_string(), "fr");
}

#[test]
fn test_cli_language_beats_config() {
    let mut config = Config::default();
    config.general.language = Some("fr".to_string());

    let i18n = I18n::new(Some("en-US".to_string()), &config);
    assert_eq!(i18n.current_locale().to_string(), "en-US");
}

#[test]
fn test_hand_written_model_section() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        r#"
[model]
url = "https://example.com/lowlight.zip"
directory = "lowlight"
layout = "nchw"
pad_multiple = 8
"#,
    )
    .expect("Failed to write config");

    let config = config::load_from_path(&path).expect("Failed to parse config");
    let source = config.model.source();
    assert_eq!(source.url, "https://example.com/lowlight.zip");
    assert_eq!(source.directory, "lowlight");
    assert_eq!(source.archive, config::DEFAULT_MODEL_ARCHIVE);

    let options = config.model.tensor_options();
    assert_eq!(options.layout, TensorLayout::Nchw);
    assert_eq!(options.pad_multiple, 8);
    assert_eq!(config.output.file_name, config::DEFAULT_OUTPUT_FILE_NAME);
}

#[test]
fn test_missing_config_falls_back_to_defaults() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let (config, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert!(warning.is_none());
    assert_eq!(config, Config::default());
}
