// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control command payloads.
//!
//! A [`ControlData`] is a plain value: it is not validated when created. The
//! range checks run when the command is added to a
//! [`ControlRequestAction`](crate::action::ControlRequestAction), before any
//! request is made.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Highest intensity the API accepts.
pub const MAX_INTENSITY: u8 = 100;

/// Longest control duration the API accepts, in milliseconds.
pub const MAX_SHOCK_DURATION: u32 = 30_000;

/// Kind of actuation sent to a shocker.
///
/// Serialized with its capitalized name (`"Shock"`, `"Vibrate"`, ...), which
/// is what the control endpoint expects in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlType {
    /// Electric stimulus.
    Shock,
    /// Vibration.
    Vibrate,
    /// Audible beep.
    Sound,
    /// Cancels whatever the shocker is currently doing.
    Stop,
}

impl ControlType {
    /// Returns the name used on the wire.
    ///
    /// # Examples
    ///
    /// ```
    /// use openshock_lib::ControlType;
    ///
    /// assert_eq!(ControlType::Vibrate.name(), "Vibrate");
    /// ```
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shock => "Shock",
            Self::Vibrate => "Vibrate",
            Self::Sound => "Sound",
            Self::Stop => "Stop",
        }
    }
}

impl fmt::Display for ControlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One timed actuation: kind, intensity (0-100) and duration in milliseconds.
///
/// # Examples
///
/// ```
/// use openshock_lib::{ControlData, ControlType};
/// use std::time::Duration;
///
/// let data = ControlData::new(ControlType::Shock, 50, 5_000);
/// assert!(data.validate().is_ok());
///
/// // Built without complaint, rejected on validation
/// let data = ControlData::new(ControlType::Vibrate, 120, 1_000);
/// assert!(data.validate().is_err());
///
/// let data = ControlData::with_duration(ControlType::Sound, 0, Duration::from_secs(2));
/// assert_eq!(data.duration_ms(), 2_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlData {
    kind: ControlType,
    intensity: u8,
    duration_ms: u64,
}

impl ControlData {
    /// Creates a control command with a duration in milliseconds.
    #[must_use]
    pub const fn new(kind: ControlType, intensity: u8, duration_ms: u64) -> Self {
        Self {
            kind,
            intensity,
            duration_ms,
        }
    }

    /// Creates a control command from a [`Duration`].
    ///
    /// Durations too long to represent in milliseconds saturate and are
    /// rejected by [`validate`](Self::validate).
    #[must_use]
    pub fn with_duration(kind: ControlType, intensity: u8, duration: Duration) -> Self {
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self::new(kind, intensity, duration_ms)
    }

    /// The `Stop` command: intensity 0, duration 0.
    #[must_use]
    pub const fn stop() -> Self {
        Self::new(ControlType::Stop, 0, 0)
    }

    /// Returns the command kind.
    #[must_use]
    pub const fn kind(&self) -> ControlType {
        self.kind
    }

    /// Returns the intensity.
    #[must_use]
    pub const fn intensity(&self) -> u8 {
        self.intensity
    }

    /// Returns the duration in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Checks intensity and duration against the API limits.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidIntensity` if intensity exceeds 100, or
    /// `ValueError::InvalidDuration` if duration exceeds
    /// [`MAX_SHOCK_DURATION`].
    pub fn validate(&self) -> Result<(), ValueError> {
        if self.intensity > MAX_INTENSITY {
            return Err(ValueError::InvalidIntensity(self.intensity));
        }
        if self.duration_ms > u64::from(MAX_SHOCK_DURATION) {
            return Err(ValueError::InvalidDuration {
                max: MAX_SHOCK_DURATION,
                actual: self.duration_ms,
            });
        }
        Ok(())
    }
}
