// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device notifications and their distribution.
//!
//! Gen2 devices report button gestures as `NotifyEvent` frames and
//! component changes as `NotifyStatus` frames. [`Notification::parse_frame`]
//! turns a frame into [`Notification`]s and the [`EventBus`] hands them to
//! every automation in arrival order.

mod event_bus;
mod notification;

pub use event_bus::EventBus;
pub use notification::{ComponentEvent, EventKind, Notification, StatusChange};
