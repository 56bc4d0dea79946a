use std::path::PathBuf;

use chrono::Local;

use crate::context::ContextBuffer;
use crate::protocol::FileResult;
use crate::theme::ThemeManager;

/// Input grows with its content up to this many lines.
pub const MAX_INPUT_LINES: usize = 6;
const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    You,
    Bot,
}

/// Handle to an entry of the message log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum EntryBody {
    Text(String),
    /// Placeholder drawn as three animated dots.
    Typing,
}

/// A single bubble in the chat log.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: EntryId,
    pub role: MessageRole,
    pub body: EntryBody,
    pub timestamp: String,
}

impl ChatMessage {
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            EntryBody::Text(t) => Some(t),
            EntryBody::Typing => None,
        }
    }
}

/// Ordered, append-mostly list of bubbles. Every append pins the view to
/// the bottom so the newest entry is visible.
#[derive(Debug)]
pub struct MessageLog {
    entries: Vec<ChatMessage>,
    next_id: u64,
    pub scroll_offset: usize,
    pub auto_scroll: bool,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            scroll_offset: 0,
            auto_scroll: true,
        }
    }
}

impl MessageLog {
    fn push(&mut self, role: MessageRole, body: EntryBody) -> EntryId {
        self.next_id += 1;
        let id = EntryId(self.next_id);
        self.entries.push(ChatMessage {
            id,
            role,
            body,
            timestamp: Local::now().format("%H:%M").to_string(),
        });
        self.scroll_to_bottom();
        id
    }

    /// Append a text bubble. Text is shown literally.
    pub fn add_msg(&mut self, text: impl Into<String>, role: MessageRole) -> EntryId {
        self.push(role, EntryBody::Text(text.into()))
    }

    /// Append a typing placeholder. The caller removes it with [`Self::remove`].
    pub fn create_typing(&mut self, role: MessageRole) -> EntryId {
        self.push(role, EntryBody::Typing)
    }

    /// Remove an entry. Unknown or already removed ids are ignored.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll_to_bottom();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
        self.scroll_offset = 0;
    }

    pub fn entries(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.entries.last()
    }

    pub fn typing_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.body == EntryBody::Typing)
            .count()
    }
}

/// Enabled state of the primary actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub send: bool,
    pub upload: bool,
    pub attach: bool,
}

impl Controls {
    /// A send in flight disables everything; an upload in flight disables
    /// upload. Attach otherwise tracks whether the context has content.
    pub fn derive(sending: bool, uploading: bool, attachable: bool) -> Self {
        Self {
            send: !sending,
            upload: !sending && !uploading,
            attach: !sending && attachable,
        }
    }
}

/// One uploaded file as shown in the files pane.
#[derive(Debug, Clone, PartialEq)]
pub struct FileCard {
    pub filename: String,
    /// Client-side name, kept only when the server renamed the file.
    pub original_name: Option<String>,
    pub mimetype: String,
    /// Absolute URL opened by `/open`.
    pub open_url: String,
    /// Raw returned content, or the per-file error.
    pub body: String,
    pub failed: bool,
}

impl FileCard {
    pub fn from_result(result: &FileResult, open_url: String) -> Self {
        let original_name = result
            .original_name
            .clone()
            .filter(|n| !n.is_empty() && *n != result.filename);
        match &result.error {
            Some(err) => Self {
                filename: result.filename.clone(),
                original_name,
                mimetype: result.mimetype.clone(),
                open_url,
                body: err.clone(),
                failed: true,
            },
            None => Self {
                filename: result.filename.clone(),
                original_name,
                mimetype: result.mimetype.clone(),
                open_url,
                body: result.file_content.clone(),
                failed: false,
            },
        }
    }
}

/// Full application state.
pub struct AppState {
    pub log: MessageLog,
    pub typing: Option<EntryId>,
    pub input: String,
    /// Cursor position in chars.
    pub cursor_pos: usize,
    pub controls: Controls,
    pub sending: bool,
    pub uploading: bool,
    pub context: ContextBuffer,
    pub context_limit: usize,
    pub selected_files: Vec<PathBuf>,
    pub file_cards: Vec<FileCard>,
    pub theme: ThemeManager,
    pub server_url: String,
    pub started_at: chrono::DateTime<Local>,
    pub spinner_tick: usize,
    pub should_quit: bool,
    pub input_history: Vec<String>,
    pub history_idx: Option<usize>,
    pub history_draft: String,
}

impl AppState {
    pub fn new(theme: ThemeManager, server_url: String, context_limit: usize) -> Self {
        let mut state = Self {
            log: MessageLog::default(),
            typing: None,
            input: String::new(),
            cursor_pos: 0,
            controls: Controls::derive(false, false, false),
            sending: false,
            uploading: false,
            context: ContextBuffer::default(),
            context_limit,
            selected_files: Vec::new(),
            file_cards: Vec::new(),
            theme,
            server_url,
            started_at: Local::now(),
            spinner_tick: 0,
            should_quit: false,
            input_history: Vec::new(),
            history_idx: None,
            history_draft: String::new(),
        };
        state.refresh_controls();
        state
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) -> EntryId {
        self.log.add_msg(content, MessageRole::You)
    }

    pub fn add_bot_message(&mut self, content: impl Into<String>) -> EntryId {
        self.log.add_msg(content, MessageRole::Bot)
    }

    /// Show the bot typing placeholder, replacing any existing one.
    pub fn show_typing(&mut self) {
        self.hide_typing();
        self.typing = Some(self.log.create_typing(MessageRole::Bot));
        debug_assert_eq!(self.log.typing_count(), 1);
    }

    pub fn hide_typing(&mut self) {
        if let Some(id) = self.typing.take() {
            self.log.remove(id);
        }
    }

    /// Recompute enabled flags from in-flight flows and the context.
    pub fn refresh_controls(&mut self) {
        self.controls = Controls::derive(self.sending, self.uploading, self.context.is_attachable());
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    /// Visible input height in lines (auto-grow).
    pub fn input_lines(&self) -> usize {
        let lines = self.input.split('\n').count();
        lines.clamp(1, MAX_INPUT_LINES)
    }

    pub fn push_history(&mut self, input: String) {
        if !input.is_empty() {
            // Avoid consecutive duplicates
            if self.input_history.last() != Some(&input) {
                self.input_history.push(input);
                if self.input_history.len() > HISTORY_LIMIT {
                    self.input_history.remove(0);
                }
            }
        }
        self.history_idx = None;
        self.history_draft.clear();
    }

    pub fn history_up(&mut self) {
        if self.input_history.is_empty() {
            return;
        }
        match self.history_idx {
            None => {
                self.history_draft = self.input.clone();
                self.history_idx = Some(self.input_history.len() - 1);
            }
            Some(0) => return,
            Some(idx) => {
                self.history_idx = Some(idx - 1);
            }
        }
        if let Some(idx) = self.history_idx {
            self.input = self.input_history[idx].clone();
            self.cursor_pos = self.input.chars().count();
        }
    }

    pub fn history_down(&mut self) {
        let Some(idx) = self.history_idx else {
            return;
        };
        if idx + 1 >= self.input_history.len() {
            self.history_idx = None;
            self.input = std::mem::take(&mut self.history_draft);
        } else {
            self.history_idx = Some(idx + 1);
            self.input = self.input_history[idx + 1].clone();
        }
        self.cursor_pos = self.input.chars().count();
    }

    pub fn uptime(&self) -> String {
        let dur = Local::now() - self.started_at;
        let secs = dur.num_seconds();
        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        }
    }
}
