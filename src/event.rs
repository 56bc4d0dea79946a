use crate::error::ClientError;
use crate::protocol::{HealthReport, SendMessageResponse, UploadResponse};
use crate::state::EntryId;

/// Completions posted back to the app loop by spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
    SendFinished(Result<SendMessageResponse, ClientError>),
    UploadFinished {
        notice: EntryId,
        outcome: Result<UploadResponse, ClientError>,
    },
    HealthFinished(Result<HealthReport, ClientError>),
    /// System dark-mode signal (true = dark)
    Appearance(bool),
}
