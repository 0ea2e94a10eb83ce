use clap::Parser;
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use sysprobe::config::{AppConfig, ConfigSource, DEFAULT_CONFIG_PATH};
use sysprobe::display::Presenter;
use sysprobe::monitor::{Monitor, RunSummary, StopReason};
use sysprobe::sysinfo_repo::SysinfoRepo;
use sysprobe::{logging, version};

/// Host metrics probe: samples CPU, memory, disk, network and processes on a fixed interval.
#[derive(Parser)]
#[command(name = "sysprobe", version, about = "Host metrics probe")]
struct Args {
    /// Config file (YAML, or TOML when the name ends in .toml).
    #[arg(short, long, env = "CONFIG_FILE", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Stop after this many ticks instead of running until interrupted.
    #[arg(short = 'n', long, value_name = "N")]
    iterations: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let (app_config, source) = AppConfig::load_or_default(&args.config);

    let log_file = app_config
        .features
        .enable_logging
        .then(|| app_config.log_path());
    if let Err(e) = logging::init(log_file.as_deref()) {
        eprintln!("Warning: file logging disabled: {:#}", e);
        let _ = logging::init(None);
    }

    match run(args, app_config, source).await {
        Ok(summary) => {
            match summary.reason {
                StopReason::Shutdown => println!("\n\nMonitor stopped by user"),
                StopReason::IterationLimit => {
                    println!("\nMonitor finished after {} iterations", summary.iterations)
                }
            }
            println!("Alert history: {} alerts recorded", summary.alerts);
            tracing::info!(
                iterations = summary.iterations,
                alerts = summary.alerts,
                "Monitor stopped"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            let msg = format!("{:#}", e);
            tracing::error!(error = %msg, "Monitor failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, app_config: AppConfig, source: ConfigSource) -> anyhow::Result<RunSummary> {
    println!("{}", "=".repeat(60));
    println!("{}", version::banner());
    println!("{}", "=".repeat(60));

    match &source {
        ConfigSource::File(path) => tracing::info!(path = %path.display(), "Loaded config"),
        ConfigSource::Defaults { reason } => {
            println!("Config unavailable, using defaults");
            tracing::warn!(reason = %reason, "Config unavailable, using defaults");
        }
    }
    if app_config.features.enable_visualization {
        tracing::debug!("enable_visualization is set but has no effect");
    }
    tracing::info!(
        interval_secs = app_config.monitor.interval,
        format = app_config.storage_format().as_str(),
        path = %app_config.data_path().display(),
        "Monitor started"
    );

    // Register handlers before the first tick so an early Ctrl+C is not fatal.
    let shutdown = shutdown_signal()?;
    let mut monitor = Monitor::new(
        SysinfoRepo::new(),
        app_config,
        Presenter::for_stdout(),
        std::io::stdout(),
    )?;
    monitor.run(shutdown, args.iterations).await
}

#[cfg(unix)]
fn shutdown_signal() -> anyhow::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = sigint.recv() => {}
            _ = sigterm.recv() => {}
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> anyhow::Result<impl Future<Output = ()>> {
    Ok(async {
        let _ = tokio::signal::ctrl_c().await;
    })
}
