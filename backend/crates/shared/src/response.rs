//! Success envelope shared by every JSON endpoint
//!
//! `{"status":"success", "results"?, "token"?, "data"?}`. Failures use the
//! problem document rendered by [`crate::error::app_error::AppError`].

use serde::Serialize;

pub const STATUS_SUCCESS: &str = "success";

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            results: None,
            token: None,
            data: Some(data),
        }
    }

    /// A collection response with its item count.
    pub fn list(results: usize, data: T) -> Self {
        Self {
            results: Some(results),
            ..Self::data(data)
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl Envelope<()> {
    pub fn empty() -> Self {
        Self {
            status: STATUS_SUCCESS,
            results: None,
            token: None,
            data: None,
        }
    }
}
