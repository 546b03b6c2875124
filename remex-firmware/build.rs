//! Build script for remex-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates rower.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keys each section must define, with their allowed range
const STROKE_KEYS: &[(&str, i64, i64)] = &[
    ("rotation_debounce_min_us", 1, 1_000_000),
    ("rotation_debounce_max_us", 1, 10_000_000),
    ("stroke_debounce_us", 0, 10_000_000),
    ("max_drag_recovery_us", 1, 60_000_000),
    ("power_change_threshold", 1, 3),
];

const LINK_KEYS: &[(&str, i64, i64)] = &[
    ("baud_rate", 9_600, 1_000_000),
    ("notify_interval_ms", 100, 60_000),
];

const DEVICE_KEYS: &[&str] = &["name", "manufacturer", "model", "serial", "software_revision"];

/// Longest device information string the firmware stores
const MAX_DEVICE_STRING: usize = 32;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate rower.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=rower.toml");

    let config_path = Path::new("rower.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: rower.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a rower.toml configuration file.          ║\n\
            ║  Please create one in the remex-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read rower.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in rower.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_stroke(&config, &mut errors);
    validate_integers(&config, "link", LINK_KEYS, &mut errors);
    validate_device(&config, &mut errors);
    report("Invalid configuration in rower.toml", &errors);

    println!("cargo:warning=rower.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fail the build with every collected error
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Look up a required `[section]` table
fn section<'a>(
    config: &'a toml::Value,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::value::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        Some(_) => {
            errors.push(format!("[{}] must be a table", name));
            None
        }
        None => {
            errors.push(format!("Missing [{}] section", name));
            None
        }
    }
}

/// Check integer keys are present and in range
fn validate_integers(
    config: &toml::Value,
    name: &str,
    keys: &[(&str, i64, i64)],
    errors: &mut Vec<String>,
) {
    let Some(table) = section(config, name, errors) else {
        return;
    };

    for &(key, min, max) in keys {
        match table.get(key) {
            Some(toml::Value::Integer(value)) => {
                if *value < min || *value > max {
                    errors.push(format!("[{}] {} must be {}-{}", name, key, min, max));
                }
            }
            Some(_) => errors.push(format!("[{}] {} must be an integer", name, key)),
            None => errors.push(format!("[{}] missing '{}'", name, key)),
        }
    }
}

/// Validate the stroke detection calibration
fn validate_stroke(config: &toml::Value, errors: &mut Vec<String>) {
    validate_integers(config, "stroke", STROKE_KEYS, errors);

    let Some(stroke) = config.get("stroke").and_then(|s| s.as_table()) else {
        return;
    };

    let min = stroke.get("rotation_debounce_min_us").and_then(|v| v.as_integer());
    let max = stroke.get("rotation_debounce_max_us").and_then(|v| v.as_integer());
    if let (Some(min), Some(max)) = (min, max) {
        if min >= max {
            errors.push(
                "[stroke] rotation_debounce_min_us must be below rotation_debounce_max_us".into(),
            );
        }
    }

    match stroke.get("flywheel_inertia") {
        Some(toml::Value::Float(inertia)) => {
            if !inertia.is_finite() || *inertia <= 0.0 {
                errors.push("[stroke] flywheel_inertia must be positive".into());
            }
        }
        Some(_) => errors.push("[stroke] flywheel_inertia must be a float".into()),
        None => errors.push("[stroke] missing 'flywheel_inertia'".into()),
    }
}

/// Validate the device information strings
fn validate_device(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(device) = section(config, "device", errors) else {
        return;
    };

    for &key in DEVICE_KEYS {
        match device.get(key) {
            Some(toml::Value::String(text)) => {
                if text.is_empty() || text.len() > MAX_DEVICE_STRING {
                    errors.push(format!(
                        "[device] {} must be 1-{} bytes",
                        key, MAX_DEVICE_STRING
                    ));
                }
            }
            Some(_) => errors.push(format!("[device] {} must be a string", key)),
            None => errors.push(format!("[device] missing '{}'", key)),
        }
    }
}
