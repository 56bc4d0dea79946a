use std::path::PathBuf;

use tracing::{info, warn};

use crate::state::AppState;

pub const MSG_NOTHING_TO_ATTACH: &str =
    "Nothing to attach. Scanned PDFs need OCR on the server (install Tesseract).";
pub const MSG_ATTACHED: &str = "📎 File context attached. Ask anything about the file.";

const HELP: &str = "commands: /files <paths> /upload /attach /open [n] /theme /health /clear /quit\n\
keys: Enter send │ Shift+Enter newline │ Ctrl+O upload │ Ctrl+T theme │ Ctrl+L clear │ PgUp/PgDn scroll";

#[derive(Debug, PartialEq)]
pub enum Command {
    Help,
    Files(Vec<String>),
    Upload,
    Attach,
    Open(Option<String>),
    Theme,
    Health,
    Clear,
    Quit,
    Unknown(String),
}

/// Follow-up work the app loop has to start.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Upload,
    Health,
}

pub fn parse(text: &str) -> Command {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    match cmd {
        "/help" => Command::Help,
        "/files" | "/pick" => Command::Files(args.split_whitespace().map(String::from).collect()),
        "/upload" => Command::Upload,
        "/attach" => Command::Attach,
        "/open" => Command::Open((!args.is_empty()).then(|| args.to_string())),
        "/theme" => Command::Theme,
        "/health" => Command::Health,
        "/clear" => Command::Clear,
        "/quit" | "/exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

pub fn run(cmd: Command, state: &mut AppState) -> Effect {
    match cmd {
        Command::Help => {
            state.add_bot_message(HELP);
        }
        Command::Files(args) => select_files(&args, state),
        Command::Upload => return Effect::Upload,
        Command::Attach => attach(state),
        Command::Open(arg) => open_card(arg.as_deref(), state),
        Command::Theme => {
            state.theme.toggle();
        }
        Command::Health => return Effect::Health,
        Command::Clear => {
            info!(messages = state.log.len(), "log cleared");
            state.log.clear();
            state.typing = None;
        }
        Command::Quit => {
            state.should_quit = true;
        }
        Command::Unknown(cmd) => {
            state.add_bot_message(format!("unknown command: {}", cmd));
        }
    }
    Effect::None
}

fn expand_home(arg: &str) -> PathBuf {
    if let Some(rest) = arg.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(arg)
}

/// Replace the file selection. With no arguments, show the current one.
fn select_files(args: &[String], state: &mut AppState) {
    if args.is_empty() {
        if state.selected_files.is_empty() {
            state.add_bot_message("no files selected");
        } else {
            let names: Vec<String> = state
                .selected_files
                .iter()
                .map(|p| p.display().to_string())
                .collect();
            state.add_bot_message(format!("selected: {}", names.join(", ")));
        }
        return;
    }

    let (found, missing): (Vec<PathBuf>, Vec<PathBuf>) =
        args.iter().map(|a| expand_home(a)).partition(|p| p.is_file());

    if !missing.is_empty() {
        let names: Vec<String> = missing.iter().map(|p| p.display().to_string()).collect();
        state.add_bot_message(format!("not found: {}", names.join(", ")));
    }

    info!(count = found.len(), "files selected");
    state.selected_files = found;
    if !state.selected_files.is_empty() {
        state.add_bot_message(format!(
            "{} file(s) selected. /upload to send them.",
            state.selected_files.len()
        ));
    }
}

/// The context is already sent with every message once populated; this
/// only confirms it to the user.
fn attach(state: &mut AppState) {
    if !state.controls.attach || !state.context.is_attachable() {
        state.add_bot_message(MSG_NOTHING_TO_ATTACH);
        return;
    }
    state.add_bot_message(MSG_ATTACHED);
}

fn open_card(arg: Option<&str>, state: &mut AppState) {
    let idx = match arg.map(str::parse::<usize>) {
        None => 1,
        Some(Ok(n)) if n > 0 => n,
        _ => {
            state.add_bot_message("usage: /open [n]");
            return;
        }
    };

    let Some(card) = state.file_cards.get(idx - 1) else {
        state.add_bot_message(format!("no file #{}", idx));
        return;
    };
    if card.open_url.is_empty() {
        state.add_bot_message(format!("{} has no link", card.filename));
        return;
    }

    let url = card.open_url.clone();
    if let Err(e) = open_url(&url) {
        warn!(url = %url, error = %e, "failed to open url");
        state.add_bot_message(format!("❌ Could not open {}: {}", url, e));
    }
}

fn open_url(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut cmd = std::process::Command::new("open");
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut cmd = std::process::Command::new("xdg-open");

    cmd.arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map(|_| ())
}
