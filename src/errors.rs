//! # Error Types Module
//!
//! This module defines the error types surfaced by the persistence layer and the
//! recipe metadata client. Neither is fatal: the repositories built on top of them
//! log the failure and continue with an empty or last-known-good view.
//!
//! An amount or unit that does not match is not an error at all; it shows up as
//! `None` on the parsed ingredient.

/// Errors raised by a [`KeyValueStore`](crate::storage::KeyValueStore)
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// The backing store could not be read
    Read(String),
    /// The backing store could not be written
    Write(String),
    /// A stored value did not have the expected JSON shape
    Serialization(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Read(msg) => write!(f, "Storage read error: {msg}"),
            StorageError::Write(msg) => write!(f, "Storage write error: {msg}"),
            StorageError::Serialization(msg) => write!(f, "Storage serialization error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for StorageError {
    fn from(err: anyhow::Error) -> Self {
        StorageError::Write(format!("{err:#}"))
    }
}

/// Errors raised while refreshing saved-recipe metadata from the host site
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataFetchError {
    /// No endpoint was configured for this page
    NotConfigured,
    /// The request could not be sent or the connection failed
    Transport(String),
    /// The host answered but reported `success: false`
    Rejected,
    /// The response body was not the expected JSON envelope
    InvalidResponse(String),
}

impl std::fmt::Display for MetadataFetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataFetchError::NotConfigured => write!(f, "Recipe data endpoint not configured"),
            MetadataFetchError::Transport(msg) => write!(f, "Recipe data request failed: {msg}"),
            MetadataFetchError::Rejected => write!(f, "Recipe data request was rejected"),
            MetadataFetchError::InvalidResponse(msg) => {
                write!(f, "Invalid recipe data response: {msg}")
            }
        }
    }
}

impl std::error::Error for MetadataFetchError {}

impl From<reqwest::Error> for MetadataFetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MetadataFetchError::InvalidResponse(err.to_string())
        } else {
            MetadataFetchError::Transport(err.to_string())
        }
    }
}
