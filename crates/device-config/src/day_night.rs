// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Automatic day/night switching configuration.

use crate::error::{check_range, ConfigError};

/// Day/night operating mode of the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayNightMode {
    /// Switch on luminance thresholds.
    #[default]
    Auto,
    /// Color mode, IR cut filter in.
    Day,
    /// Monochrome mode, IR cut filter out.
    Night,
}

/// Infrared illuminator mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IrLedMode {
    Off,
    On,
    /// Follow the day/night state.
    #[default]
    Auto,
}

/// Thresholds and IR behavior for automatic day/night switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AutoDayNightConfig {
    pub mode: DayNightMode,
    /// Luminance at or below which the camera switches to night mode.
    pub day_to_night_threshold: i32,
    /// Luminance at or above which the camera switches back to day mode.
    pub night_to_day_threshold: i32,
    /// Minimum seconds between switches, damping oscillation at dusk.
    pub lock_time_seconds: i32,
    pub ir_led_mode: IrLedMode,
    /// IR illuminator brightness (0..=100).
    pub ir_led_level: i32,
    /// Master switch for automatic transitions.
    pub auto_switching: bool,
}

impl AutoDayNightConfig {
    /// Checks thresholds and levels.
    ///
    /// The hysteresis constraint (`day_to_night_threshold` strictly below
    /// `night_to_day_threshold`) only applies when automatic switching is
    /// actually on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("day_to_night_threshold", self.day_to_night_threshold, 0, 255)?;
        check_range("night_to_day_threshold", self.night_to_day_threshold, 0, 255)?;
        check_range("lock_time_seconds", self.lock_time_seconds, 0, 3600)?;
        check_range("ir_led_level", self.ir_led_level, 0, 100)?;

        if self.auto_switching && self.day_to_night_threshold >= self.night_to_day_threshold {
            return Err(ConfigError::OutOfRange {
                field: "day_to_night_threshold",
                value: self.day_to_night_threshold,
                min: 0,
                max: self.night_to_day_threshold - 1,
            });
        }
        Ok(())
    }
}

impl Default for AutoDayNightConfig {
    fn default() -> Self {
        Self {
            mode: DayNightMode::Auto,
            day_to_night_threshold: 30,
            night_to_day_threshold: 70,
            lock_time_seconds: 5,
            ir_led_mode: IrLedMode::Auto,
            ir_led_level: 80,
            auto_switching: true,
        }
    }
}
