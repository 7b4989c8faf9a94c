use adb_anchor_probe::annotate::{NullPresenter, Presenter, WindowPresenter};
use adb_anchor_probe::capture::{AdbShellCapture, StandardCodec};
use adb_anchor_probe::pipeline::{Probe, ProbeReport, StatusStream, exit_code, status_line};
use adb_anchor_probe::template_matching::CoefficientMatcher;
use adb_anchor_probe::{ProbeConfig, ProbeResult, args};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match args::parse() {
        Ok(Some(config)) => config,
        Ok(None) => return ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(2);
        }
    };

    let default_filter = if config.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = if config.show_window {
        rt.block_on(run(&config, &mut WindowPresenter::default()))
    } else {
        rt.block_on(run(&config, &mut NullPresenter))
    };

    match &result {
        Ok(report) if config.json_report => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Failed to serialise report: {e}"),
        },
        Err(e) if e.is_graceful() => log::warn!("{e}"),
        Err(e) => log::error!("{e}"),
        Ok(_) => {}
    }
    match status_line(&result, config.json_report) {
        Some((StatusStream::Stdout, line)) => println!("{line}"),
        Some((StatusStream::Stderr, line)) => eprintln!("{line}"),
        None => {}
    }

    ExitCode::from(exit_code(&result))
}

async fn run<P: Presenter>(config: &ProbeConfig, presenter: &mut P) -> ProbeResult<ProbeReport> {
    let frames = AdbShellCapture::new(&config.adb_path)
        .with_serial(config.serial.clone())
        .with_timeout(config.capture_timeout);

    Probe {
        config,
        frames: &frames,
        codec: &StandardCodec,
        matcher: &CoefficientMatcher::new(),
        presenter,
    }
    .run()
    .await
}
