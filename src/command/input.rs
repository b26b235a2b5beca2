// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gen2 `Input.*` RPC commands.

use crate::command::{Command, rpc_path};

/// Command addressed to a Gen2 `input:<id>` component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Read the input configuration.
    GetConfig {
        /// Input component id.
        id: u8,
    },
    /// Change the input name.
    Rename {
        /// Input component id.
        id: u8,
        /// New name; `None` clears it.
        name: Option<String>,
    },
}

impl InputCommand {
    /// Reads the input configuration.
    #[must_use]
    pub const fn get_config(id: u8) -> Self {
        Self::GetConfig { id }
    }

    /// Renames the input.
    #[must_use]
    pub fn rename(id: u8, name: impl Into<String>) -> Self {
        Self::Rename {
            id,
            name: Some(name.into()),
        }
    }

    /// Removes the input name.
    #[must_use]
    pub const fn clear_name(id: u8) -> Self {
        Self::Rename { id, name: None }
    }
}

impl Command for InputCommand {
    fn path(&self) -> String {
        match self {
            Self::GetConfig { .. } => rpc_path("Input.GetConfig"),
            Self::Rename { .. } => rpc_path("Input.SetConfig"),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::GetConfig { id } => vec![("id", id.to_string())],
            Self::Rename { id, name } => vec![
                ("id", id.to_string()),
                ("config", serde_json::json!({ "name": name }).to_string()),
            ],
        }
    }
}
