//! Stroke detection settings
//!
//! All durations are in microseconds, matching the resolution of the
//! rotation edge timestamps.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default flywheel moment of inertia (kg·m²)
pub const DEFAULT_FLYWHEEL_INERTIA: f32 = 0.0802;

/// Errors reported by [`StrokeSettings::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Minimum debounce must be non-zero
    ZeroDebounce,
    /// Minimum debounce must be below the maximum debounce
    DebounceWindow,
    /// Detection threshold must be between 1 and the number of interval pairs
    Threshold,
    /// History must hold at least two intervals
    HistoryTooShort,
    /// Inertia must be a positive finite number
    Inertia,
}

/// Stroke detection calibration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StrokeSettings {
    /// Intervals shorter than this are contact bounce and are dropped
    pub rotation_debounce_min_us: u32,
    /// An interval longer than this during recovery means the rower stopped
    pub rotation_debounce_max_us: u32,
    /// Drive phases must last longer than this to count as a stroke
    pub stroke_debounce_us: u32,
    /// Recoveries at least this long produce no drag factor update
    pub max_drag_recovery_us: u32,
    /// Number of consistent interval pairs needed to call a power change
    pub power_change_threshold: u8,
    /// Flywheel moment of inertia (kg·m²)
    pub flywheel_inertia: f32,
}

impl Default for StrokeSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeSettings {
    /// Create settings with the stock calibration
    pub const fn new() -> Self {
        Self {
            rotation_debounce_min_us: 15_000,
            rotation_debounce_max_us: 300_000,
            stroke_debounce_us: 300_000,
            max_drag_recovery_us: 6_000_000,
            power_change_threshold: 2,
            flywheel_inertia: DEFAULT_FLYWHEEL_INERTIA,
        }
    }

    /// Check the settings against a history of `N` intervals
    ///
    /// A history of `N` intervals has `N - 1` adjacent pairs, so the
    /// threshold can never exceed that.
    pub fn validate<const N: usize>(&self) -> Result<(), SettingsError> {
        if N < 2 {
            return Err(SettingsError::HistoryTooShort);
        }
        if self.rotation_debounce_min_us == 0 {
            return Err(SettingsError::ZeroDebounce);
        }
        if self.rotation_debounce_min_us >= self.rotation_debounce_max_us {
            return Err(SettingsError::DebounceWindow);
        }
        if self.power_change_threshold == 0 || self.power_change_threshold as usize > N - 1 {
            return Err(SettingsError::Threshold);
        }
        if !self.flywheel_inertia.is_finite() || self.flywheel_inertia <= 0.0 {
            return Err(SettingsError::Inertia);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(StrokeSettings::default().validate::<4>(), Ok(()));
    }

    #[test]
    fn test_zero_debounce() {
        let settings = StrokeSettings {
            rotation_debounce_min_us: 0,
            ..StrokeSettings::new()
        };
        assert_eq!(settings.validate::<4>(), Err(SettingsError::ZeroDebounce));
    }

    #[test]
    fn test_inverted_debounce_window() {
        let settings = StrokeSettings {
            rotation_debounce_min_us: 300_000,
            rotation_debounce_max_us: 15_000,
            ..StrokeSettings::new()
        };
        assert_eq!(settings.validate::<4>(), Err(SettingsError::DebounceWindow));
    }

    #[test]
    fn test_threshold_bounds() {
        let settings = StrokeSettings {
            power_change_threshold: 4,
            ..StrokeSettings::new()
        };
        // 4 intervals = 3 pairs
        assert_eq!(settings.validate::<4>(), Err(SettingsError::Threshold));
        assert_eq!(settings.validate::<5>(), Ok(()));

        let settings = StrokeSettings {
            power_change_threshold: 0,
            ..StrokeSettings::new()
        };
        assert_eq!(settings.validate::<4>(), Err(SettingsError::Threshold));
    }

    #[test]
    fn test_history_too_short() {
        assert_eq!(
            StrokeSettings::new().validate::<1>(),
            Err(SettingsError::HistoryTooShort)
        );
    }

    #[test]
    fn test_bad_inertia() {
        let settings = StrokeSettings {
            flywheel_inertia: -0.1,
            ..StrokeSettings::new()
        };
        assert_eq!(settings.validate::<4>(), Err(SettingsError::Inertia));

        let settings = StrokeSettings {
            flywheel_inertia: f32::NAN,
            ..StrokeSettings::new()
        };
        assert_eq!(settings.validate::<4>(), Err(SettingsError::Inertia));
    }
}
