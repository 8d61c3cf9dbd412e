// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # device-config
//!
//! Persistent device configuration for the camera server: imaging levels,
//! automatic day/night switching, and server resource tuning, stored as
//! TOML.
//!
//! The rest of the system depends only on the parsed structures; the file
//! format stays inside this crate. Every load path validates ranges, so a
//! hand-edited config cannot push an out-of-range level into the sensor
//! pipeline.

mod day_night;
mod error;
mod imaging;
mod store;

pub use day_night::{AutoDayNightConfig, DayNightMode, IrLedMode};
pub use error::ConfigError;
pub use imaging::ImagingSettings;
pub use store::{DeviceConfig, ServerSettings};
