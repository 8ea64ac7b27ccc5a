use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use text_layout_harness::cases::text_layout_consistency;
use text_layout_harness::config::AppConfig;
use text_layout_harness::harness::{AutomationDriver, BufferCapture};
use text_layout_harness::internal::ui::app::App;
use text_layout_harness::tui;

#[derive(Debug, Parser)]
#[command(version, about = "Drive the text layout consistency case")]
struct Cli {
    /// Walk every mutation once headlessly, capturing a frame after each.
    #[arg(long)]
    automation: bool,

    /// Print captured frames to stdout (automation only).
    #[arg(long, requires = "automation")]
    print_frames: bool,

    /// Config file to use instead of the default lookup.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };

    if cli.automation {
        init_console_logging(&config);
        return run_automation(&config, cli.print_frames || config.automation.print_frames).await;
    }

    // While the TUI owns the terminal, logs go to a daily rotating file so they
    // don't corrupt the screen. If the terminal can't be set up, fall back to stderr.
    match tui::init() {
        Ok(terminal) => {
            let log_dir = config.logging.log_directory.as_deref().unwrap_or("logs");
            let file_appender = tracing_appender::rolling::daily(log_dir, "text-layout-harness.log");
            let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

            tracing_subscriber::fmt()
                .with_env_filter(env_filter(&config))
                .with_writer(non_blocking)
                .with_ansi(false)
                .compact()
                .init();

            let res = run_interactive(&config, terminal).await;

            tui::restore()?;

            if let Err(err) = res {
                eprintln!("{err:?}");
            }
            Ok(())
        }
        Err(e) => {
            init_console_logging(&config);
            eprintln!("Failed to initialize TUI: {e:?}");
            Err(e.into())
        }
    }
}

/// `RUST_LOG` wins; otherwise build the filter from config.
fn env_filter(config: &AppConfig) -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(config.logging.filter_directives()),
    }
}

fn init_console_logging(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn run_automation(config: &AppConfig, print_frames: bool) -> Result<()> {
    let (mut harness, nodes) =
        text_layout_consistency::build(&config.stage).context("Failed to build case")?;
    let mut capture = BufferCapture::new().with_status_node(nodes.index_info);

    let report = AutomationDriver::new()
        .run(&mut harness, &mut capture)
        .await
        .context("Automation run failed")?;

    if print_frames {
        for frame in capture.frames() {
            println!(
                "--- frame {} (status {}) at {}",
                frame.index,
                frame.status.as_deref().unwrap_or("-"),
                frame.captured_at
            );
            for line in frame.lines() {
                println!("{line}");
            }
        }
    }

    tracing::info!(captured = ?report.captured, "done");
    Ok(())
}

async fn run_interactive(config: &AppConfig, terminal: tui::Tui) -> Result<()> {
    let (mut harness, _) =
        text_layout_consistency::build(&config.stage).context("Failed to build case")?;
    harness.seek(0).context("Failed to apply the first mutation")?;

    let mut app = App::new(harness.into_shared(), config);
    app.run(terminal).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_frames_requires_automation() {
        assert!(Cli::try_parse_from(["text-layout-harness", "--print-frames"]).is_err());

        let cli =
            Cli::try_parse_from(["text-layout-harness", "--automation", "--print-frames"]).unwrap();
        assert!(cli.automation && cli.print_frames);
    }
}
