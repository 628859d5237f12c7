// File: error.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - byprobe contributors

use thiserror::Error;

/// Numeric status codes exposed at the C ABI boundary.
pub const STATUS_SUCCESS: i32 = 0;
pub const STATUS_NETWORK: i32 = 1;
pub const STATUS_PARSE: i32 = 2;
pub const STATUS_TIMEOUT: i32 = 3;
pub const STATUS_INVALID_URL: i32 = 4;
pub const STATUS_OOM: i32 = 5;
pub const STATUS_UNKNOWN: i32 = 99;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("timeout after {0} ms")]
    Timeout(u64),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("tls error: {0}")]
    Ssl(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, ProbeError>;

impl ProbeError {
    /// Maps every error kind onto the stable status codes of the engine API.
    pub fn status_code(&self) -> i32 {
        match self {
            ProbeError::Network(_) | ProbeError::Ssl(_) | ProbeError::Io(_) => STATUS_NETWORK,
            ProbeError::Parse(_) | ProbeError::InvalidResponse(_) | ProbeError::Json(_) => {
                STATUS_PARSE
            }
            ProbeError::Timeout(_) => STATUS_TIMEOUT,
            ProbeError::InvalidUrl(_) => STATUS_INVALID_URL,
            ProbeError::Unknown(_) => STATUS_UNKNOWN,
        }
    }
}
