// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gen2 `Switch.*` RPC commands.

use crate::command::{Command, rpc_path};

/// Command addressed to a Gen2 `switch:<id>` relay.
///
/// # Examples
///
/// ```
/// use shelly_automation::command::{Command, SwitchCommand};
///
/// let cmd = SwitchCommand::set(0, true);
/// assert_eq!(cmd.to_request_path(), "/rpc/Switch.Set?id=0&on=true");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchCommand {
    /// Set the relay output.
    Set {
        /// Switch component id.
        id: u8,
        /// Desired output.
        on: bool,
    },
}

impl SwitchCommand {
    /// Sets the relay output.
    #[must_use]
    pub const fn set(id: u8, on: bool) -> Self {
        Self::Set { id, on }
    }
}

impl Command for SwitchCommand {
    fn path(&self) -> String {
        match self {
            Self::Set { .. } => rpc_path("Switch.Set"),
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        match *self {
            Self::Set { id, on } => vec![("id", id.to_string()), ("on", on.to_string())],
        }
    }
}
