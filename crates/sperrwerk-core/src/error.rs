// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Sperrwerk.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for all Sperrwerk operations.
#[derive(Debug, Error)]
pub enum SperrwerkError {
    // -- Caller errors --
    #[error("validation failed: {0}")]
    Validation(String),

    // -- Conflicts --
    #[error("principal with contact address {0} already exists")]
    UserExists(String),

    #[error("resource {0} already exists")]
    FileAlreadyExists(String),

    // -- Not found --
    #[error("resource {0} does not exist")]
    FileNotExists(String),

    #[error("{0} not found")]
    NotFound(String),

    // -- Authorization --
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Stable symbolic result codes surfaced to API callers.
///
/// All authorization failures (BLP denial, wrong owner, bad credential,
/// non-admin calling an admin-only operation) share `Unauthorized` by
/// design; the error message carries the human-readable reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    UnknownError,
    UserExists,
    Unauthorized,
    FileAlreadyExists,
    FileNotExists,
}

impl ErrorCode {
    /// The wire name of this code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::UserExists => "USER_EXISTS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::FileAlreadyExists => "FILE_ALREADY_EXISTS",
            Self::FileNotExists => "FILE_NOT_EXISTS",
        }
    }
}

impl SperrwerkError {
    /// Map this error onto its stable symbolic code.
    ///
    /// Internal faults (database, I/O, serialization) and validation
    /// failures all collapse into `UnknownError` so that callers cannot
    /// distinguish internal faults from one another through the code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UserExists(_) => ErrorCode::UserExists,
            Self::FileAlreadyExists(_) => ErrorCode::FileAlreadyExists,
            Self::FileNotExists(_) => ErrorCode::FileNotExists,
            Self::Unauthorized(_) => ErrorCode::Unauthorized,
            Self::Validation(_)
            | Self::NotFound(_)
            | Self::Database(_)
            | Self::Io(_)
            | Self::Serialization(_) => ErrorCode::UnknownError,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SperrwerkError>;
