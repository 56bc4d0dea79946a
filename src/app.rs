use std::time::{Duration, Instant};

use crossterm::event::{Event as CEvent, EventStream, KeyEventKind};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::commands::{self, Effect};
use crate::config::{self, ChatboxConfig};
use crate::event::AppEvent;
use crate::flows;
use crate::input::{self, InputAction};
use crate::prefs::FilePrefs;
use crate::server::ChatboxClient;
use crate::state::AppState;
use crate::theme::{system, ThemeManager};
use crate::ui;

const TICK_RATE: Duration = Duration::from_millis(250);
const APPEARANCE_POLL: Duration = Duration::from_secs(5);

pub async fn run(config: ChatboxConfig) -> anyhow::Result<()> {
    let client = ChatboxClient::new(&config.server.url, config.request_timeout())?;

    // Resolve theme
    let prefs = FilePrefs::open(config::data_dir().join("prefs.toml"));
    let theme = ThemeManager::init(Box::new(prefs), system::detect_dark());

    // App state
    let mut state = AppState::new(
        theme,
        client.base_url().to_string(),
        config.chat.context_limit,
    );

    // Task completion channel
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();

    if state.theme.follows_system() {
        spawn_appearance_watch(tx.clone());
    }

    // Setup terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Crossterm event stream
    let mut reader = EventStream::new();

    let mut last_tick = Instant::now();

    // Main event loop
    loop {
        // Draw
        terminal.draw(|f| {
            ui::render(f, &state);
        })?;

        if state.should_quit {
            break;
        }

        let tick_timeout = TICK_RATE.checked_sub(last_tick.elapsed()).unwrap_or(Duration::ZERO);

        tokio::select! {
            // Terminal events
            maybe_event = reader.next() => {
                if let Some(Ok(CEvent::Key(key))) = maybe_event {
                    if key.kind == KeyEventKind::Press {
                        let action = input::handle_key(key, &mut state);
                        handle_action(action, &mut state, &client, &tx);
                    }
                }
            }

            // Flow completions
            Some(event) = rx.recv() => {
                handle_app_event(event, &mut state);
            }

            // Tick
            _ = tokio::time::sleep(tick_timeout) => {
                last_tick = Instant::now();
                state.spinner_tick = state.spinner_tick.wrapping_add(1);
            }
        }
    }

    // Restore terminal
    ratatui::restore();
    Ok(())
}

fn handle_action(
    action: InputAction,
    state: &mut AppState,
    client: &ChatboxClient,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    match action {
        InputAction::Submit => handle_submit(state, client, tx),
        InputAction::Quit => {
            state.should_quit = true;
        }
        InputAction::ScrollUp => {
            state.log.auto_scroll = false;
            state.log.scroll_offset = state.log.scroll_offset.saturating_add(5);
        }
        InputAction::ScrollDown => {
            if state.log.scroll_offset > 5 {
                state.log.scroll_offset -= 5;
            } else {
                state.log.scroll_to_bottom();
            }
        }
        InputAction::ScrollToBottom => {
            state.log.scroll_to_bottom();
        }
        InputAction::Clear => {
            commands::run(commands::Command::Clear, state);
        }
        InputAction::ToggleTheme => {
            state.theme.toggle();
        }
        InputAction::Upload => start_upload(state, client, tx),
        InputAction::None => {}
    }
}

fn handle_submit(
    state: &mut AppState,
    client: &ChatboxClient,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    // Slash commands are handled locally
    if state.input.trim_start().starts_with('/') {
        let text = state.input.trim().to_string();
        state.push_history(text.clone());
        state.clear_input();

        match commands::run(commands::parse(&text), state) {
            Effect::Upload => start_upload(state, client, tx),
            Effect::Health => start_health(client, tx),
            Effect::None => {}
        }
        return;
    }

    let Some(payload) = flows::begin_send(state) else {
        debug!("send ignored");
        return;
    };

    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.send_message(&payload).await;
        let _ = tx.send(AppEvent::SendFinished(outcome));
    });
}

fn start_upload(
    state: &mut AppState,
    client: &ChatboxClient,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let Some(job) = flows::begin_upload(state) else {
        return;
    };

    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.upload(&job.files).await;
        let _ = tx.send(AppEvent::UploadFinished {
            notice: job.notice,
            outcome,
        });
    });
}

fn start_health(client: &ChatboxClient, tx: &mpsc::UnboundedSender<AppEvent>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.health().await;
        let _ = tx.send(AppEvent::HealthFinished(outcome));
    });
}

/// Poll the system appearance and report changes.
fn spawn_appearance_watch(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut last = None;
        loop {
            tokio::time::sleep(APPEARANCE_POLL).await;
            let current = tokio::task::spawn_blocking(system::detect_dark)
                .await
                .ok()
                .flatten();
            let Some(dark) = current else {
                continue;
            };
            if last != Some(dark) {
                last = Some(dark);
                if tx.send(AppEvent::Appearance(dark)).is_err() {
                    break;
                }
            }
        }
    });
}

fn handle_app_event(event: AppEvent, state: &mut AppState) {
    match event {
        AppEvent::SendFinished(outcome) => flows::finish_send(state, outcome),
        AppEvent::UploadFinished { notice, outcome } => {
            flows::finish_upload(state, notice, outcome)
        }
        AppEvent::HealthFinished(outcome) => flows::finish_health(state, outcome),
        AppEvent::Appearance(dark) => {
            if state.theme.system_changed(dark) {
                info!(theme = state.theme.active().as_str(), "followed system appearance");
            }
        }
    }
}
