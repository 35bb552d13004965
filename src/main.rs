// SPDX-License-Identifier: MPL-2.0
use iced_lumen::app::{self, config, paths, Flags};
use iced_lumen::headless;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
iced_lumen - low-light image enhancement

USAGE:
  iced_lumen [OPTIONS] [IMAGE]

OPTIONS:
  --lang <LOCALE>       UI language (e.g. en-US, fr)
  --data-dir <DIR>      Where the model is downloaded and unpacked
  --config-dir <DIR>    Where settings.toml is read from
  --output <PATH>       Enhance IMAGE without a window and write a PNG
  -v, --verbose         Debug logging
  -h, --help            Print this help
";

struct Args {
    flags: Flags,
    data_dir: Option<String>,
    config_dir: Option<String>,
    output: Option<PathBuf>,
    verbose: bool,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let verbose = args.contains(["-v", "--verbose"]);
    let lang = args.opt_value_from_str("--lang")?;
    let data_dir = args.opt_value_from_str("--data-dir")?;
    let config_dir = args.opt_value_from_str("--config-dir")?;
    let output = args.opt_value_from_str("--output")?;
    let file_path = args
        .finish()
        .into_iter()
        .next()
        .and_then(|s| s.into_string().ok());

    Ok(Some(Args {
        flags: Flags { lang, file_path },
        data_dir,
        config_dir,
        output,
        verbose,
    }))
}

fn init_tracing(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("iced_lumen={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(args.verbose);
    paths::init_cli_overrides(args.data_dir, args.config_dir);

    match args.output {
        Some(output) => run_headless(args.flags, output),
        None => match app::run(args.flags) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "application exited with an error");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_headless(flags: Flags, output: PathBuf) -> ExitCode {
    let Some(input) = flags.file_path.map(PathBuf::from) else {
        eprintln!("error: --output needs an IMAGE to enhance\n\n{HELP}");
        return ExitCode::FAILURE;
    };
    let Some(data_dir) = paths::get_app_data_dir() else {
        eprintln!("error: no data directory available, pass --data-dir");
        return ExitCode::FAILURE;
    };

    let (config, warning) = config::load();
    if let Some(key) = warning {
        tracing::warn!(%key, "using default settings");
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(headless::run(&config, &data_dir, &input, &output)) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
