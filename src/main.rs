use std::sync::Arc;

use anyhow::Result;
use aurora_api::ConfiguredGeolocator;
use aurora_core::Config;
use aurora_ui::{App, AppCommand, AppEvent, HeadlessSurface, MenuAction};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const HELP: &str =
    "commands: menu, reload, values, forecast, weather, about, quit, or a menu number or title";

/// Map a line of input to a command, the way the watch buttons would.
/// Menu entries can also be picked by their 1-based position or exact title.
fn parse_command(line: &str) -> Option<AppCommand> {
    let line = line.trim();
    if let Ok(n) = line.parse::<usize>() {
        return MenuAction::from_index(n.checked_sub(1)?).map(AppCommand::Select);
    }
    if let Some(action) = MenuAction::from_title(line) {
        return Some(AppCommand::Select(action));
    }

    let command = match line.to_ascii_lowercase().as_str() {
        "menu" | "m" => AppCommand::OpenMenu,
        "reload" | "r" => AppCommand::Select(MenuAction::Reload),
        "values" | "v" => AppCommand::Select(MenuAction::SeeValues),
        "forecast" | "kp" => AppCommand::Select(MenuAction::KpForecast),
        "weather" | "w" => AppCommand::Select(MenuAction::Weather),
        "about" => AppCommand::Select(MenuAction::About),
        "quit" | "q" | "exit" => AppCommand::Shutdown,
        _ => return None,
    };
    Some(command)
}

/// Forward stdin lines as commands until EOF or shutdown.
async fn read_commands(tx: mpsc::Sender<AppCommand>, shutdown: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match parse_command(&line) {
                Some(command) => {
                    if tx.send(command).await.is_err() {
                        break;
                    }
                }
                None => println!("{}", HELP),
            },
            Ok(None) => {
                let _ = tx.send(AppCommand::Shutdown).await;
                break;
            }
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        }
    }
}

/// Print refresh results as they happen.
async fn report_events(mut events: tokio::sync::broadcast::Receiver<AppEvent>) {
    while let Ok(event) = events.recv().await {
        match event {
            AppEvent::Refreshed(report) => println!("refresh: {:?}", report),
            AppEvent::Stopped => break,
            other => tracing::debug!("{:?}", other),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, validation) = Config::load_validated()?;
    aurora_core::init(config.debug)?;

    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }

    let geolocator = Arc::new(ConfiguredGeolocator::new(
        config.location.latitude,
        config.location.longitude,
    ));

    let mut app = App::new(config, geolocator, HeadlessSurface::new())?;
    tracing::info!("Aurora Watch started");
    println!("{}", HELP);

    let shutdown = app.shutdown_token();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(read_commands(tx, shutdown.clone()));
    tokio::spawn(report_events(app.subscribe()));

    app.run(rx).await?;
    shutdown.cancel();

    tracing::info!("Aurora Watch stopped");
    Ok(())
}
