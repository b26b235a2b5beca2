// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for Shelly devices.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::command::Command;
use crate::error::ProtocolError;
use crate::protocol::{CommandResponse, Protocol};

/// Configuration for an HTTP device.
///
/// HTTP is stateless - each command is an independent request.
///
/// # Examples
///
/// ```
/// use shelly_automation::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.60")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(3));
/// assert_eq!(config.base_url(), "http://192.168.1.60:8080");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    timeout: Duration,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new HTTP configuration for the specified host.
    ///
    /// `host` may carry an explicit port (`"10.0.0.5:8080"`); it is kept
    /// verbatim in the base URL.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self
            .host
            .strip_prefix("http://")
            .unwrap_or(&self.host)
            .trim_end_matches('/');
        if self.port == Self::DEFAULT_PORT || host.contains(':') {
            format!("http://{host}")
        } else {
            format!("http://{host}:{}", self.port)
        }
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url(),
            client,
        })
    }
}

/// HTTP client for one Shelly device.
///
/// # Examples
///
/// ```no_run
/// use shelly_automation::command::LightCommand;
/// use shelly_automation::protocol::{HttpClient, Protocol};
///
/// # async fn example() -> shelly_automation::Result<()> {
/// let client = HttpClient::new("192.168.1.60")?;
/// client.send_command(&LightCommand::toggle(0)).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
}

/// Error body returned by Gen2 RPC handlers.
#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        HttpConfig::new(host).into_client()
    }

    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url<C: Command + ?Sized>(&self, command: &C) -> String {
        format!("{}{}", self.base_url, command.to_request_path())
    }
}

impl Protocol for HttpClient {
    async fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> Result<CommandResponse, ProtocolError> {
        let url = self.build_url(command);

        tracing::debug!(url = %url, "Sending HTTP command");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(ProtocolError::Http)?;

        if !status.is_success() {
            let message = match serde_json::from_str::<RpcErrorBody>(&body) {
                Ok(rpc) => format!("{} (code {})", rpc.message, rpc.code),
                Err(_) => status.canonical_reason().unwrap_or("Unknown").to_string(),
            };
            return Err(ProtocolError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(body = %body, "Received HTTP response");

        Ok(CommandResponse::new(body))
    }
}
