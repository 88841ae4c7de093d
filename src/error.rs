// src/error.rs - Error types for the data client and coordinator
use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single resource request. Carries the resource name so the
/// coordinator can say which endpoint broke the cycle. The client never
/// retries; recovery is the next scheduled poll cycle.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{resource}: request failed: {source}")]
    Request {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{resource}: unexpected HTTP status {status}")]
    Status {
        resource: &'static str,
        status: StatusCode,
    },

    #[error("{resource}: invalid response body: {source}")]
    Decode {
        resource: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    pub fn resource(&self) -> &'static str {
        match self {
            TransportError::Request { resource, .. }
            | TransportError::Status { resource, .. }
            | TransportError::Decode { resource, .. } => resource,
        }
    }
}

/// Failure of the toggle command. Does not affect poll cycles.
#[derive(Error, Debug)]
#[error("toggle auto-trading failed: {0}")]
pub struct CommandError(#[from] pub TransportError);
