//! Drag factor presentation
//!
//! The engine measures drag in kg·m² per µs of recovery; rowers read it on
//! the familiar 0–255 scale, alongside a distance-per-stroke estimate derived
//! from it. Both travel as a short ASCII text notification.

use core::f32::consts::TAU;
use core::fmt::Write;

use heapless::String;

/// Capacity of the drag notification text
pub const DRAG_TEXT_CAPACITY: usize = 24;

/// Drag notification text
pub type DragText = String<DRAG_TEXT_CAPACITY>;

const DISPLAY_SCALE: f32 = 1_000_000.0;

/// Magic constant of the erg distance model (2.8 W per (m/s)³)
const ERG_CONSTANT: f32 = 2.8;

const CUBE_ROOT_ITERATIONS: usize = 24;

/// Scale a raw drag factor to the display range
///
/// Negative and NaN map to 0, anything above 255 saturates.
pub fn display_drag_factor(raw: f32) -> u8 {
    (raw * DISPLAY_SCALE) as u8
}

/// Distance per flywheel revolution estimate for a display drag factor
///
/// `(df / 2.8)^(1/3) × 2π × 10`, truncated and saturated to `u8`.
pub fn distance_from_drag_factor(display: u8) -> u8 {
    let ratio = f32::from(display) / ERG_CONSTANT;
    (cube_root(ratio) * TAU * 10.0) as u8
}

/// Cube root of a non-negative value by Newton iteration
fn cube_root(x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }

    // Starting above the root keeps every step on the same side
    let mut y = if x > 1.0 { x } else { 1.0 };
    for _ in 0..CUBE_ROOT_ITERATIONS {
        y = (2.0 * y + x / (y * y)) / 3.0;
    }
    y
}

/// Format the drag notification, e.g. `DF=120, Dist=219`
pub fn drag_text(display: u8) -> DragText {
    let mut text = DragText::new();
    // Longest possible text is 16 bytes, well within capacity
    let _ = write!(
        text,
        "DF={}, Dist={}",
        display,
        distance_from_drag_factor(display)
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_display_scale() {
        assert_eq!(display_drag_factor(0.0), 0);
        assert_eq!(display_drag_factor(0.000_125_5), 125);
        assert_eq!(display_drag_factor(0.000_200_5), 200);
    }

    #[test]
    fn test_display_saturates() {
        assert_eq!(display_drag_factor(0.000_3), 255);
        assert_eq!(display_drag_factor(1.0), 255);
        assert_eq!(display_drag_factor(-0.000_1), 0);
        assert_eq!(display_drag_factor(f32::NAN), 0);
    }

    #[test]
    fn test_cube_root() {
        for (x, expected) in [(8.0f32, 2.0f32), (27.0, 3.0), (0.125, 0.5), (1.0, 1.0)] {
            let root = cube_root(x);
            assert!(root > expected - 1e-4 && root < expected + 1e-4, "cbrt({x}) = {root}");
        }
        assert_eq!(cube_root(0.0), 0.0);
        assert_eq!(cube_root(-8.0), 0.0);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance_from_drag_factor(0), 0);
        assert_eq!(distance_from_drag_factor(1), 44);
        assert_eq!(distance_from_drag_factor(3), 64);
        assert_eq!(distance_from_drag_factor(50), 164);
        assert_eq!(distance_from_drag_factor(100), 206);
        assert_eq!(distance_from_drag_factor(120), 219);
    }

    #[test]
    fn test_distance_saturates() {
        // 282.7 before saturation
        assert_eq!(distance_from_drag_factor(255), 255);
    }

    #[test]
    fn test_drag_text() {
        assert_eq!(drag_text(120).as_str(), "DF=120, Dist=219");
        assert_eq!(drag_text(0).as_str(), "DF=0, Dist=0");
        assert_eq!(drag_text(255).as_str(), "DF=255, Dist=255");
    }

    proptest! {
        #[test]
        fn prop_distance_is_monotonic(display in 0u8..255) {
            prop_assert!(distance_from_drag_factor(display + 1) >= distance_from_drag_factor(display));
        }

        #[test]
        fn prop_cube_root_cubes_back(x in 0.01f32..300.0) {
            let root = cube_root(x);
            let cubed = root * root * root;
            prop_assert!(cubed > x * 0.9999 && cubed < x * 1.0001);
        }
    }
}
