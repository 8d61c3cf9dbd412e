// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Imaging sensor settings.

use crate::error::{check_range, ConfigError};

/// Picture adjustment settings of the sensor pipeline.
///
/// All levels are signed offsets around the sensor's neutral point: `0`
/// means "as calibrated".
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImagingSettings {
    /// Brightness level (−100..=100).
    pub brightness: i32,
    /// Contrast level (−100..=100).
    pub contrast: i32,
    /// Saturation level (−100..=100).
    pub saturation: i32,
    /// Sharpness level (−100..=100).
    pub sharpness: i32,
    /// Hue rotation in degrees (−180..=180).
    pub hue: i32,
}

impl ImagingSettings {
    /// Checks every level against its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("brightness", self.brightness, -100, 100)?;
        check_range("contrast", self.contrast, -100, 100)?;
        check_range("saturation", self.saturation, -100, 100)?;
        check_range("sharpness", self.sharpness, -100, 100)?;
        check_range("hue", self.hue, -180, 180)?;
        Ok(())
    }
}

impl Default for ImagingSettings {
    fn default() -> Self {
        Self {
            brightness: 0,
            contrast: 0,
            saturation: 0,
            sharpness: 0,
            hue: 0,
        }
    }
}
