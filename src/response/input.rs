// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Input configuration parsing.

use serde::Deserialize;

/// Response of Gen2 `Input.GetConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputConfig {
    id: u8,
    #[serde(default)]
    name: Option<String>,
}

impl InputConfig {
    /// Returns the input component id.
    #[must_use]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Returns the configured name, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}
