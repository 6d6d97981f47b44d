use aurora_api::FetchError;
use aurora_core::error::ReqwestErrorExt;
use aurora_core::{AppError, ConfigError, FeedError, NetworkError, RenderFailure};

use crate::error::{RefreshError, RenderError};

impl From<RefreshError> for AppError {
    fn from(e: RefreshError) -> Self {
        match e {
            RefreshError::Fetch(FetchError::Network(err)) => {
                AppError::Network(err.into_network_error())
            }
            RefreshError::Fetch(FetchError::Status { status, body }) => {
                AppError::Network(NetworkError::ServerError {
                    status,
                    message: body,
                })
            }
            RefreshError::Fetch(FetchError::Parse(msg)) => AppError::Feed(FeedError::BadPayload(msg)),
            RefreshError::Fetch(FetchError::InvalidUrl(msg)) => {
                AppError::Config(ConfigError::Invalid(msg))
            }
            RefreshError::Aborted => {
                AppError::Feed(FeedError::FetchFailed("refresh task aborted".into()))
            }
        }
    }
}

/// Attach the view name to a render error.
pub fn render_failure(view: &str, e: &RenderError) -> AppError {
    AppError::Render(RenderFailure {
        view: view.to_string(),
        message: e.to_string(),
    })
}

/// Log and swallow a renderer failure. Every renderer goes through here so
/// a broken view never takes down the refresh loop.
pub fn guard<T>(view: &str, result: Result<T, RenderError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            let err = render_failure(view, &e);
            tracing::error!(view, "{} ({})", err.user_message(), err);
            None
        }
    }
}
