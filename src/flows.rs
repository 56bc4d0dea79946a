//! Upload and send flows.
//!
//! Each flow is split around its network call: `begin_*` validates and
//! updates state synchronously, returning the request to perform (or `None`
//! when nothing should be sent); the app runs the request on a task and
//! hands the outcome to `finish_*`. Every `finish_*` path re-derives the
//! controls, so the UI always ends up interactive again.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::context::{truncate_context, ContextBuffer};
use crate::error::ClientError;
use crate::protocol::{HealthReport, SendMessageRequest, SendMessageResponse, UploadResponse};
use crate::server::resolve_file_url;
use crate::state::{AppState, EntryId, FileCard};

pub const MSG_SELECT_FILES: &str = "Choose files first: /files <path> [<path>...]";
pub const MSG_UPLOADING: &str = "⏳ Uploading and reading file contents...";
pub const MSG_UPLOAD_OK: &str = "✓ Upload done. Use /attach, then ask anything about the file.";
pub const MSG_UPLOAD_EMPTY: &str = "⚠️ Upload done but there is no content to attach.";
pub const MSG_NO_RESPONSE: &str = "(no response)";

/// Files to post, plus the transient notice to remove afterwards.
#[derive(Debug)]
pub struct UploadJob {
    pub files: Vec<PathBuf>,
    pub notice: EntryId,
}

pub fn begin_upload(state: &mut AppState) -> Option<UploadJob> {
    if state.selected_files.is_empty() {
        state.add_bot_message(MSG_SELECT_FILES);
        return None;
    }
    if !state.controls.upload {
        return None;
    }

    state.uploading = true;
    state.refresh_controls();
    state.file_cards.clear();
    let notice = state.add_bot_message(MSG_UPLOADING);

    Some(UploadJob {
        files: state.selected_files.clone(),
        notice,
    })
}

pub fn finish_upload(
    state: &mut AppState,
    notice: EntryId,
    outcome: Result<UploadResponse, ClientError>,
) {
    state.log.remove(notice);

    match outcome {
        Ok(resp) => {
            state.file_cards = resp
                .files
                .iter()
                .map(|f| FileCard::from_result(f, resolve_file_url(&state.server_url, &f.file_url)))
                .collect();
            state.context = ContextBuffer::from_files(&resp.files);
            info!(
                files = resp.files.len(),
                blocks = state.context.block_count(),
                source = %state.context.source_name,
                server_message = resp.message.as_deref().unwrap_or(""),
                "upload finished"
            );

            if state.context.is_attachable() {
                state.add_bot_message(MSG_UPLOAD_OK);
            } else {
                state.add_bot_message(MSG_UPLOAD_EMPTY);
            }
        }
        Err(e) => {
            warn!(error = %e, "upload failed");
            let detail = e.server_message("unknown").unwrap_or_else(|| e.to_string());
            state.add_bot_message(format!("❌ Upload failed: {}", detail));
            state.context.clear();
        }
    }

    state.uploading = false;
    state.selected_files.clear();
    state.refresh_controls();
}

/// Start a send from the current input. Leaves the input untouched when
/// the message is blank or sending is disabled.
pub fn begin_send(state: &mut AppState) -> Option<SendMessageRequest> {
    let text = state.input.trim().to_string();
    if text.is_empty() || !state.controls.send {
        return None;
    }

    state.push_history(text.clone());
    state.add_user_message(text.clone());
    state.clear_input();

    let payload = SendMessageRequest {
        message: text,
        context: truncate_context(&state.context.text, state.context_limit),
        context_name: state.context.source_name.clone(),
    };

    state.show_typing();
    state.sending = true;
    state.refresh_controls();

    Some(payload)
}

pub fn finish_send(state: &mut AppState, outcome: Result<SendMessageResponse, ClientError>) {
    state.hide_typing();

    match outcome {
        Ok(resp) => {
            let reply = resp
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| MSG_NO_RESPONSE.to_string());
            state.add_bot_message(reply);
        }
        Err(ClientError::Server { status, error }) => {
            warn!(status, error = ?error, "server rejected message");
            let detail = error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| status.to_string());
            state.add_bot_message(format!("❌ Server error: {}", detail));
        }
        Err(e) => {
            warn!(error = %e, "send failed");
            state.add_bot_message(format!("❌ Request failed: {}", e));
        }
    }

    state.sending = false;
    state.refresh_controls();
}

pub fn finish_health(state: &mut AppState, outcome: Result<HealthReport, ClientError>) {
    match outcome {
        Ok(report) => {
            state.add_bot_message(report.summary());
        }
        Err(e) => {
            warn!(error = %e, "health check failed");
            state.add_bot_message(format!("❌ Health check failed: {}", e));
        }
    }
}
