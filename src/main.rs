use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fern::colors::{Color, ColoredLevelConfig};
use log::warn;
use tokio::io::{AsyncBufReadExt, BufReader};

mod auth;
mod config;
mod datetime;
mod event;
mod notify;
mod project;
mod session;
mod time_entry;
mod toggl;

use config::Config;
use event::ClockEvent;
use notify::ConsoleNotifier;
use session::ClockSession;
use toggl::TogglClient;

/// clockイベントをToggl APIへ中継するCLIアプリケーション。
///
/// 標準入力から1行ずつイベントを受け取り、実行中のtime entryを
/// Togglと同期する。
///
/// # Examples
/// ```
/// $ clocktoggl
/// in Write report +work @Acme
/// out
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(
        short = 'c',
        long = "config",
        help = "Sets a custom path to the configuration file"
    )]
    config: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logger().context("Failed to initialize logger")?;

    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    let client = Arc::new(TogglClient::new(&config));
    let notifier = Arc::new(ConsoleNotifier::new(std::io::stdout()));
    let session = ClockSession::new(client, notifier, config.workspace_id);

    if let Some(name) = config.default_project.as_deref() {
        // 既定プロジェクトを選択するため、一覧の取得を待ってから解決する
        session.refresh_projects().await;
        if session.select_project(name).is_none() {
            warn!("Default project not found: {}", name);
        }
    } else {
        session.refresh_projects_background();
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from stdin")?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match event::parse_event(line) {
            Ok(event) => event,
            Err(err) => {
                warn!("{:#}", err);
                continue;
            }
        };

        match event {
            ClockEvent::In {
                description,
                tags,
                project,
            } => {
                session.clock_in(description, tags, project);
            }
            ClockEvent::Out => {
                if session.clock_out().is_none() {
                    println!("No running time entry.");
                }
            }
            ClockEvent::Cancel => {
                if session.clock_cancel().is_none() {
                    println!("No running time entry.");
                }
            }
            ClockEvent::Projects => {
                session.refresh_projects().await;
                for name in session.project_names() {
                    println!("- {}", name);
                }
            }
            ClockEvent::Select { name } => {
                if session.project_names().is_empty() {
                    session.refresh_projects().await;
                }
                match session.select_project(&name) {
                    Some(id) => println!("Selected project: {} (id={})", name, id),
                    None => println!("Unknown project: {}", name),
                }
            }
            ClockEvent::Status => match session.current_entry() {
                Some(entry) => println!("Clocked in: {} (since {})", entry.description, entry.start),
                None => println!("No running time entry."),
            },
            ClockEvent::Quit => break,
        }
    }

    Ok(())
}

/// ログ出力を初期化する。
fn setup_logger() -> Result<(), fern::InitError> {
    let colors = ColoredLevelConfig::new()
        .info(Color::Green)
        .warn(Color::Yellow)
        .error(Color::Red);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                colors.color(record.level()),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}
