// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the library.
//!
//! Failures are grouped by where they happen: value validation, protocol
//! communication with a device, JSON parsing and configuration loading.
//! Automations usually swallow [`ProtocolError`] and [`ParseError`] at the
//! call site and only log them.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response or notification.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration is invalid or could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u16,
        /// Maximum allowed value.
        max: u16,
        /// The actual value that was provided.
        actual: u16,
    },

    /// A dim direction string was not `up` or `down`.
    #[error("invalid dim direction: {0}")]
    InvalidDirection(String),

    /// A time of day was not in `HH:MM` form.
    #[error("invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    /// A periodic interval was zero.
    #[error("{0} interval must be non-zero")]
    ZeroInterval(&'static str),
}

/// Errors related to protocol communication (HTTP/MQTT).
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// MQTT connection or communication failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// The device answered with a non-success status.
    #[error("device returned HTTP {status}: {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error message or body returned by the device.
        message: String,
    },

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing device responses and notifications.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing.
    #[error("missing field: {0}")]
    MissingField(String),

    /// Unexpected payload format.
    #[error("unexpected format: {0}")]
    UnexpectedFormat(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors related to loading and validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the expected schema.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value was rejected.
    #[error("{field}: {source}")]
    InvalidValue {
        /// Dotted path of the offending field.
        field: String,
        /// Why the value was rejected.
        source: ValueError,
    },

    /// Two automations claim the same input.
    #[error("input {0} is bound more than once")]
    DuplicateInput(u8),

    /// A section required by the configured automations is absent.
    #[error("missing section: {0}")]
    Missing(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
