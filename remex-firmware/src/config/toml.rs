//! Simple TOML parser for rower configuration
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! Remex configuration. It does NOT support all of TOML.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float)
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys

use remex_core::SettingsError;
use remex_protocol::InfoField;

use super::{RowerConfig, HISTORY_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown section header
    InvalidSection,
    /// Value does not parse as the key's type
    InvalidValue,
    /// Device string longer than the firmware stores
    StringTooLong,
    /// Stroke settings parsed but are inconsistent
    InvalidSettings(SettingsError),
    /// Link settings out of range
    InvalidLink,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Stroke,
    Link,
    Device,
}

/// Parse TOML configuration into RowerConfig
///
/// Keys not present keep their defaults. Unknown keys are ignored so older
/// firmware accepts newer files.
pub fn parse_config(input: &str) -> Result<RowerConfig, ParseError> {
    let mut config = RowerConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    config
        .stroke
        .validate::<HISTORY_LEN>()
        .map_err(ParseError::InvalidSettings)?;
    if config.link.baud_rate == 0 || config.link.notify_interval_ms == 0 {
        return Err(ParseError::InvalidLink);
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "stroke" => Ok(Section::Stroke),
        "link" => Ok(Section::Link),
        "device" => Ok(Section::Device),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Parse key = value line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    // TOML allows underscores as digit separators
    let mut digits = heapless::String::<16>::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn device_field(key: &str) -> Option<InfoField> {
    match key {
        "name" => Some(InfoField::DeviceName),
        "manufacturer" => Some(InfoField::Manufacturer),
        "model" => Some(InfoField::Model),
        "serial" => Some(InfoField::Serial),
        "software_revision" => Some(InfoField::SoftwareRevision),
        _ => None,
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut RowerConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Stroke => {
            let s = &mut config.stroke;
            match key {
                "rotation_debounce_min_us" => s.rotation_debounce_min_us = parse_int(value)?,
                "rotation_debounce_max_us" => s.rotation_debounce_max_us = parse_int(value)?,
                "stroke_debounce_us" => s.stroke_debounce_us = parse_int(value)?,
                "max_drag_recovery_us" => s.max_drag_recovery_us = parse_int(value)?,
                "power_change_threshold" => s.power_change_threshold = parse_int(value)?,
                "flywheel_inertia" => s.flywheel_inertia = parse_float(value)?,
                _ => {} // Ignore unknown keys
            }
        }
        Section::Link => match key {
            "baud_rate" => config.link.baud_rate = parse_int(value)?,
            "notify_interval_ms" => config.link.notify_interval_ms = parse_int(value)?,
            _ => {}
        },
        Section::Device => {
            if let Some(field) = device_field(key) {
                let target = config.device.field_mut(field);
                target.clear();
                target
                    .push_str(parse_string(value))
                    .map_err(|_| ParseError::StringTooLong)?;
            }
        }
        Section::Root => {} // No root-level keys
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMBEDDED: &str = include_str!("../../rower.toml");

    #[test]
    fn test_embedded_config_parses() {
        let config = parse_config(EMBEDDED).unwrap();
        assert_eq!(config.stroke.rotation_debounce_min_us, 15_000);
        assert_eq!(config.stroke.power_change_threshold, 2);
        assert_eq!(config.link.notify_interval_ms, 1_000);
        assert_eq!(config.device.model.as_str(), "AR-C2");
        assert_eq!(config.device.field(InfoField::Manufacturer), "ZOCO BODY FIT");
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), RowerConfig::default());
        assert_eq!(parse_config("# nothing here\n\n").unwrap(), RowerConfig::default());
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("a = 1"), Some(("a", "1")));
        assert_eq!(parse_key_value("a = 1 # comment"), Some(("a", "1")));
        assert_eq!(
            parse_key_value("name = \"Row # 1\""),
            Some(("name", "\"Row # 1\""))
        );
        assert_eq!(parse_key_value("a ="), None);
        assert_eq!(parse_key_value("no equals"), None);
    }

    #[test]
    fn test_parse_int_separators() {
        assert_eq!(parse_int::<u32>("6_000_000"), Ok(6_000_000));
        assert_eq!(parse_int::<u8>("300"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u32>("1.5"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_overrides() {
        let config = parse_config(
            "[stroke]\n\
             power_change_threshold = 3\n\
             flywheel_inertia = 0.1\n\
             [link]\n\
             notify_interval_ms = 500\n\
             [device]\n\
             name = \"Remex\"\n\
             unknown = 1\n",
        )
        .unwrap();

        assert_eq!(config.stroke.power_change_threshold, 3);
        assert!(config.stroke.flywheel_inertia > 0.099 && config.stroke.flywheel_inertia < 0.101);
        assert_eq!(config.stroke.stroke_debounce_us, 300_000);
        assert_eq!(config.link.notify_interval_ms, 500);
        assert_eq!(config.link.baud_rate, 115_200);
        assert_eq!(config.device.name.as_str(), "Remex");
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(parse_config("[motor]\n"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_invalid_value() {
        assert_eq!(
            parse_config("[stroke]\nstroke_debounce_us = soon\n"),
            Err(ParseError::InvalidValue)
        );
    }

    #[test]
    fn test_inconsistent_settings() {
        // Threshold above the number of interval pairs in the history
        assert_eq!(
            parse_config("[stroke]\npower_change_threshold = 4\n"),
            Err(ParseError::InvalidSettings(SettingsError::Threshold))
        );
        assert_eq!(
            parse_config("[stroke]\nrotation_debounce_min_us = 400000\n"),
            Err(ParseError::InvalidSettings(SettingsError::DebounceWindow))
        );
        assert_eq!(
            parse_config("[link]\nnotify_interval_ms = 0\n"),
            Err(ParseError::InvalidLink)
        );
    }

    #[test]
    fn test_device_string_too_long() {
        assert_eq!(
            parse_config("[device]\nserial = \"0123456789012345678901234567890123\"\n"),
            Err(ParseError::StringTooLong)
        );
    }
}
