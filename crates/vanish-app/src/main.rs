mod command;
mod render;

use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use vanish_engine::view::{CountdownView, MessageView};
use vanish_engine::{ChatSession, EngineConfig};
use vanish_types::events::TimelineEvent;
use vanish_types::models::MessageId;
use vanish_widget::{EmbeddedWidget, HttpWidgetHost, WidgetConfig, WidgetState};

use crate::command::Command;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr, the timeline owns stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vanish_app=info,vanish_engine=info,vanish_widget=info".into()),
        )
        .init();

    let config = EngineConfig::from_env().context("reading engine config")?;
    let mut session = ChatSession::start(config);

    if let Some(widget) = widget_from_env() {
        spawn_widget(widget);
    }

    let mut events = session.subscribe();
    let mut countdown = session.subscribe_countdown();

    println!("Welcome, {}! Type /help for commands.\n", session.local_user().username);
    print!("{}", render::roster(&session.roster_view()));
    println!();
    print_timeline(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else {
                    break;
                };
                if !handle_line(&mut session, &line)? {
                    break;
                }
            }
            event = events.recv() => match event {
                Ok(TimelineEvent::MessageAppended { message, .. }) => {
                    let remaining = session.scheduler().remaining_secs(message.id);
                    println!("{}", render::message_line(&MessageView::new(&message, remaining, &Local)));
                }
                Ok(TimelineEvent::MessageRemoved { id, reason, .. }) => {
                    println!("{}", render::removal_line(&id.short(), reason));
                }
                Err(RecvError::Lagged(n)) => {
                    warn!("Timeline receiver lagged by {} events, redrawing", n);
                    print_timeline(&session);
                }
                Err(RecvError::Closed) => break,
            },
            tick = countdown.recv() => match tick {
                Ok(tick) => {
                    let view = CountdownView::new(tick.remaining_secs);
                    if view.urgent && tick.remaining_secs > 0 {
                        println!("[{}] {}", tick.id.short(), render::countdown_text(&view));
                    }
                }
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            },
        }
    }

    session.shutdown();
    Ok(())
}

/// Returns `false` when the user asked to leave.
fn handle_line(session: &mut ChatSession, line: &str) -> anyhow::Result<bool> {
    match Command::parse(line) {
        Command::Say(text) => {
            session.composer_mut().set_draft(text);
            if let Err(e) = session.submit() {
                debug!("Ignoring send: {}", e);
            }
        }
        Command::Vanish(preset) => {
            let composer = session.composer_mut();
            composer.select_vanish(preset);
            println!("{}", composer.status_line());
        }
        Command::Presets => {
            println!("{}", render::presets(session.composer().vanish()));
        }
        Command::Delete(prefix) => match resolve_own(session, &prefix) {
            Some(id) => {
                session.delete(id);
            }
            None => println!("No message of yours matches {prefix:?}"),
        },
        Command::List => print_timeline(session),
        Command::Users => print!("{}", render::roster(&session.roster_view())),
        Command::Json => {
            let json = serde_json::to_string_pretty(&session.snapshot())?;
            println!("{json}");
        }
        Command::Help => println!("{}", render::HELP),
        Command::Quit => return Ok(false),
        Command::Unknown(input) => println!("Unknown command {input:?}, try /help"),
    }
    Ok(true)
}

/// Own message whose id starts with `prefix`, if exactly one matches.
fn resolve_own(session: &ChatSession, prefix: &str) -> Option<MessageId> {
    let prefix = prefix.to_ascii_lowercase();
    let mut matches = session
        .snapshot()
        .into_iter()
        .filter(|m| m.is_own && m.id.0.simple().to_string().starts_with(&prefix));
    let first = matches.next()?;
    matches.next().is_none().then_some(first.id)
}

fn print_timeline(session: &ChatSession) {
    for view in session.timeline_view(&Local) {
        println!("{}", render::message_line(&view));
    }
}

fn widget_from_env() -> Option<EmbeddedWidget> {
    let script_url = std::env::var("VANISH_WIDGET_SCRIPT_URL").ok()?;
    let webhook_url = std::env::var("VANISH_WIDGET_WEBHOOK_URL").ok()?;
    Some(EmbeddedWidget::new(WidgetConfig::new(script_url, webhook_url)))
}

fn spawn_widget(widget: EmbeddedWidget) {
    let widget = Arc::new(widget);
    let mut state_rx = widget.subscribe();

    tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            match &*state_rx.borrow_and_update() {
                WidgetState::Loading => println!("[widget] loading..."),
                WidgetState::Ready => println!("[widget] ready"),
                WidgetState::Error(e) => println!("[widget] unavailable: {e}"),
                WidgetState::Idle => {}
            }
        }
    });

    tokio::spawn(async move {
        match HttpWidgetHost::new() {
            Ok(host) => {
                widget.activate(&host).await;
            }
            Err(e) => {
                widget.mark_failed(&e);
            }
        }
        info!("Widget activation finished: {:?}", widget.state());
    });
}
