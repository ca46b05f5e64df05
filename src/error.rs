//! Error types for the storage and leaderboard adapters.
//!
//! None of these are fatal to a running game. Adapters propagate them with
//! `?` internally and the leaderboard sync layer turns them into log lines
//! and fallbacks.

use std::fmt;

/// Failure reading or writing the key-value store.
#[derive(Debug)]
pub enum StorageError {
    /// No storage backend in this environment (private mode, native build).
    Unavailable,
    /// The backend rejected the operation (quota, security policy).
    Backend(String),
    /// Stored data could not be (de)serialized.
    Serde(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "storage unavailable"),
            StorageError::Backend(msg) => write!(f, "storage backend error: {}", msg),
            StorageError::Serde(e) => write!(f, "stored data is malformed: {}", e),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serde(e)
    }
}

/// Failure talking to the remote leaderboard or its auth service.
#[derive(Debug)]
pub enum RemoteError {
    /// No endpoint configured; the game is running offline.
    NotConfigured,
    /// Request never completed (offline, CORS, DNS).
    Network(String),
    /// Server answered with a non-success status.
    Status { status: u16, body: String },
    /// Anonymous sign-in did not produce a token.
    Auth(String),
    /// GraphQL `errors` array in an otherwise successful response.
    GraphQl(String),
    /// Response body was not the JSON we expected.
    Decode(serde_json::Error),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::NotConfigured => write!(f, "leaderboard endpoint not configured"),
            RemoteError::Network(msg) => write!(f, "network error: {}", msg),
            RemoteError::Status { status, body } => {
                write!(f, "server returned {}: {}", status, body)
            }
            RemoteError::Auth(msg) => write!(f, "anonymous sign-in failed: {}", msg),
            RemoteError::GraphQl(msg) => write!(f, "graphql error: {}", msg),
            RemoteError::Decode(e) => write!(f, "unexpected response: {}", e),
        }
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RemoteError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        RemoteError::Decode(e)
    }
}
