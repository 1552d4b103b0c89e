//! Keepsake terminal front-end.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::Parser;
use keepsake_app::cli::Cli;
use keepsake_app::logging::{LogConfig, init_logging};
use keepsake_app::{App, Reply, Settings};
use tokio::io::{AsyncBufReadExt, BufReader};

fn main() {
    let cli = Cli::parse();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    if let Err(error) = run(&cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

/// Build logging configuration from CLI flags.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default()
        .with_level(cli.verbosity.tracing_level_filter())
        .with_format(cli.log_format.into())
        .with_log_file(cli.log_file.clone());
    config.use_env_filter = !cli.verbosity.is_present();
    config.with_ansi = cli.log_file.is_none() && io::stderr().is_terminal();
    config
}

fn settings_from_cli(cli: &Cli) -> Settings {
    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    if cli.offline {
        settings.endpoint.url = None;
    } else if let Some(url) = &cli.endpoint {
        settings.endpoint.url = Some(url.clone());
    }
    settings
}

fn run(cli: &Cli) -> Result<()> {
    let settings = settings_from_cli(cli);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the runtime")?;
    runtime.block_on(event_loop(&settings))
}

async fn event_loop(settings: &Settings) -> Result<()> {
    let mut app = App::from_settings(settings).context("failed to set up the data endpoint")?;
    let screen = app.start().await;
    print_notices(&app);
    println!("{screen}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let reply = app.handle_line(&line).await;
        print_notices(&app);
        match reply {
            Reply::Show(screen) => println!("{screen}"),
            Reply::Nothing => {}
            Reply::Quit => break,
        }
    }

    app.shutdown().await;
    print_notices(&app);
    Ok(())
}

fn print_notices(app: &App) {
    for notice in app.drain_notices() {
        println!("{notice}");
    }
}
