// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Remote dimmer proxies.
//!
//! A [`RemoteDimmer`] is the handful of calls the gesture controller makes
//! against one light channel. [`RpcDimmer`] drives Gen2 devices through
//! `/rpc/Light.*`; [`LegacyDimmer`] drives Gen1 devices through
//! `/light/<channel>`.

mod legacy;
mod rpc;
mod target;

use std::future::Future;

pub use legacy::LegacyDimmer;
pub use rpc::RpcDimmer;
pub use target::{DimmerTarget, SweepTiming};

use crate::error::Result;
use crate::types::{Brightness, DimDirection, FadeRate};

/// Calls made against one remote light channel.
///
/// Callers treat every call as fire-and-forget except
/// [`brightness`](Self::brightness), whose result drives the sweep.
pub trait RemoteDimmer: Send + Sync + 'static {
    /// Prepares the remote channel before the first gesture.
    ///
    /// # Errors
    ///
    /// Returns error if the device rejects the preparation.
    fn initialize(&self) -> impl Future<Output = Result<()>> + Send {
        async { Ok(()) }
    }

    /// Toggles the light, restoring its last brightness when turning on.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails.
    fn toggle(&self) -> impl Future<Output = Result<()>> + Send;

    /// Turns the light on at the given brightness.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails.
    fn set_brightness(&self, brightness: Brightness) -> impl Future<Output = Result<()>> + Send;

    /// Turns the light on at its last brightness.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails.
    fn turn_on(&self) -> impl Future<Output = Result<()>> + Send;

    /// Starts dimming towards the extreme in `direction`.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails.
    fn dim(
        &self,
        direction: DimDirection,
        fade_rate: FadeRate,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Stops an ongoing dim at the current level.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails.
    fn dim_stop(&self) -> impl Future<Output = Result<()>> + Send;

    /// Reads the current brightness.
    ///
    /// # Errors
    ///
    /// Returns error if the call fails or the response is malformed.
    fn brightness(&self) -> impl Future<Output = Result<Brightness>> + Send;
}
