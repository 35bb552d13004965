// SPDX-License-Identifier: MPL-2.0
//! End-to-end checks of the enhancement pipeline that do not need the model.

use iced_lumen::app::session::{EnhancedImage, Session};
use iced_lumen::media::enhance::{postprocess_output, preprocess_image};
use iced_lumen::media::image::{encode_png, load_upload, write_png_bytes};
use iced_lumen::media::model_archive::{self, find_model_file, unpack_downloaded};
use iced_lumen::media::{ImageData, ModelSource, TensorLayout, TensorOptions};
use image_rs::{DynamicImage, Rgb, RgbImage};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn source() -> ModelSource {
    ModelSource {
        url: "https://example.invalid/mirnet_saved.zip".to_string(),
        checksum: None,
        directory: "mirnet_saved".to_string(),
        archive: "mirnet_saved.zip".to_string(),
    }
}

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("create zip");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, data) in entries {
        writer.start_file(*name, options).expect("start entry");
        writer.write_all(data).expect("write entry");
    }
    writer.finish().expect("finish zip");
}

#[test]
fn downloaded_archive_is_unpacked_and_located() {
    let data_dir = tempdir().expect("tempdir");
    let source = source();
    let archive = source.archive_path(data_dir.path());
    write_zip(
        &archive,
        &[
            ("mirnet_saved/variables/weights.bin", b"weights"),
            ("mirnet_saved/model.onnx", b"onnx"),
        ],
    );

    let model = unpack_downloaded(&source, &archive, data_dir.path()).expect("unpack");
    assert_eq!(model, data_dir.path().join("mirnet_saved").join("model.onnx"));
    assert!(!archive.exists(), "archive is removed after unpacking");
    assert!(model_archive::is_provisioned(&source, data_dir.path()));
}

#[test]
fn checksum_mismatch_leaves_nothing_behind() {
    let data_dir = tempdir().expect("tempdir");
    let mut source = source();
    source.checksum = Some("00".repeat(32));
    let archive = source.archive_path(data_dir.path());
    write_zip(&archive, &[("mirnet_saved/model.onnx", b"onnx")]);

    assert!(unpack_downloaded(&source, &archive, data_dir.path()).is_err());
    assert!(!archive.exists());
    assert!(find_model_file(&source.model_dir(data_dir.path())).is_none());
}

#[test]
fn upload_round_trips_through_tensors() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("dark.png");
    let mut rgb = RgbImage::new(3, 2);
    rgb.put_pixel(0, 0, Rgb([10, 20, 30]));
    rgb.put_pixel(2, 1, Rgb([255, 0, 128]));
    DynamicImage::ImageRgb8(rgb)
        .save(&input)
        .expect("write fixture");

    let upload = load_upload(&input).expect("decode upload");
    let prepared = preprocess_image(&upload, TensorOptions::default()).expect("preprocess");
    assert_eq!(prepared.tensor.shape(), &[1, 2, 3, 3]);
    assert!((prepared.tensor[[0, 1, 2, 0]] - 1.0).abs() < f32::EPSILON);

    // An identity model: feed the input straight back as the output.
    let (data, _) = prepared.tensor.into_raw_vec_and_offset();
    let output = postprocess_output(&[1, 2, 3, 3], &data, TensorLayout::Nhwc).expect("postprocess");
    let output = output.to_rgb8();
    assert_eq!(output.get_pixel(0, 0), &Rgb([10, 20, 30]));
    assert_eq!(output.get_pixel(2, 1), &Rgb([255, 0, 128]));
}

#[test]
fn out_of_range_output_is_clipped() {
    let data = [1.7, -0.4, 0.5];
    let image = postprocess_output(&[1, 1, 1, 3], &data, TensorLayout::Nhwc).expect("postprocess");
    assert_eq!(image.to_rgb8().get_pixel(0, 0), &Rgb([255, 0, 127]));
}

#[test]
fn session_downloads_enhanced_png() {
    let dir = tempdir().expect("tempdir");
    let original = ImageData::from_dynamic(DynamicImage::new_rgb8(4, 4));
    let enhanced = DynamicImage::new_rgb8(4, 4);
    let png = encode_png(&enhanced).expect("encode");

    let mut session = Session::default();
    session.upload(original).expect("upload");
    session.begin_enhance().expect("begin");
    session
        .finish_enhance::<String>(Ok(EnhancedImage {
            image: ImageData::from_dynamic(enhanced),
            png: Arc::new(png),
        }))
        .expect("finish");

    let target = dir.path().join("enhanced.png");
    let bytes = Arc::clone(&session.enhanced().expect("result").png);
    write_png_bytes(&bytes, &target).expect("save");
    session.mark_downloaded(target.clone()).expect("mark");

    assert_eq!(session.downloaded_to(), Some(target.as_path()));
    let reloaded = image_rs::open(&target).expect("reload");
    assert_eq!((reloaded.width(), reloaded.height()), (4, 4));
}
