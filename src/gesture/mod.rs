// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Button gestures driving remote dimmers.
//!
//! - [`GestureInterpreter`]: pure state machine turning events, readings
//!   and timer ticks into [`Effect`]s
//! - [`GestureController`]: actor executing those effects against one
//!   [`RemoteDimmer`](crate::dimmer::RemoteDimmer)
//! - [`InputRouter`]: one controller per i4 input
//! - [`RockerControl`]: two-channel up/down rocker without sweep

mod controller;
mod interpreter;
mod rocker;
mod router;

pub use controller::{GestureController, GestureHandle};
pub use interpreter::{Effect, GestureInterpreter, SweepId};
pub use rocker::{RockerAction, RockerControl, RockerInterpreter};
pub use router::InputRouter;
