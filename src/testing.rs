// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process protocol recording requests for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::command::Command;
use crate::error::ProtocolError;
use crate::protocol::{CommandResponse, Protocol};

/// Records every request path and answers from scripted bodies.
///
/// Bodies are queued per path; the last queued body keeps answering once
/// the queue is down to one. Unscripted paths answer `{}`.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingProtocol {
    requests: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<HashMap<String, VecDeque<String>>>>,
}

impl RecordingProtocol {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, path: &str, body: &str) {
        self.responses
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(body.to_string());
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    pub(crate) fn clear(&self) {
        self.requests.lock().clear();
    }
}

impl Protocol for RecordingProtocol {
    async fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> Result<CommandResponse, ProtocolError> {
        self.requests.lock().push(command.to_request_path());

        let mut responses = self.responses.lock();
        let body = match responses.get_mut(&command.path()) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(CommandResponse::new(body.unwrap_or_else(|| "{}".to_string())))
    }
}
