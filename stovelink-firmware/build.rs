//! Build script for stovelink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates bridge.toml at compile time
//! - Generates `bridge_config.rs` with the validated values

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    let config = validate_config();
    write_config(&config);
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
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validated bridge settings
struct BridgeSettings {
    host_baud: u32,
    heater_baud: u32,
    read_timeout_ms: u32,
    step_delay_ms: u32,
    settle_delay_ms: u32,
    cycle_pause_ms: u32,
    pellet_sensors_enabled: bool,
    pellet_max_distance_cm: u16,
}

/// Validate bridge.toml configuration at compile time
fn validate_config() -> BridgeSettings {
    // Re-run if bridge.toml changes
    println!("cargo:rerun-if-changed=bridge.toml");

    let config_path = Path::new("bridge.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: bridge.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a bridge.toml configuration file.         ║\n\
            ║  Please create one in the stovelink-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read bridge.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in bridge.toml                       ║\n\
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
    let mut reader = SectionReader {
        config: &config,
        errors: &mut errors,
    };

    let host_baud = reader.integer("host", "baud", 19_200, 300..=921_600);
    let heater_baud = reader.integer("heaters", "baud", 1_200, 300..=115_200);
    let read_timeout_ms = reader.integer("heaters", "read_timeout_ms", 1_000, 1..=10_000);
    let step_delay_ms = reader.integer("timing", "step_delay_ms", 10, 0..=10_000);
    let settle_delay_ms = reader.integer("timing", "settle_delay_ms", 10, 0..=1_000);
    let cycle_pause_ms = reader.integer("timing", "cycle_pause_ms", 1_000, 0..=60_000);
    let pellet_sensors_enabled = reader.boolean("pellet_sensors", "enabled", true);
    // HC-SR04 class sensors range roughly 2 cm to 4 m
    let pellet_max_distance_cm = reader.integer("pellet_sensors", "max_distance_cm", 200, 2..=400);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in bridge.toml                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=bridge.toml validated successfully");

    BridgeSettings {
        host_baud: host_baud as u32,
        heater_baud: heater_baud as u32,
        read_timeout_ms: read_timeout_ms as u32,
        step_delay_ms: step_delay_ms as u32,
        settle_delay_ms: settle_delay_ms as u32,
        cycle_pause_ms: cycle_pause_ms as u32,
        pellet_sensors_enabled,
        pellet_max_distance_cm: pellet_max_distance_cm as u16,
    }
}

/// Typed lookups into `[section] key = value`, collecting errors
struct SectionReader<'a> {
    config: &'a toml::Value,
    errors: &'a mut Vec<String>,
}

impl<'a> SectionReader<'a> {
    fn value(&mut self, section: &str, key: &str) -> Option<&'a toml::Value> {
        let config: &'a toml::Value = self.config;
        match config.get(section) {
            None => None,
            Some(toml::Value::Table(t)) => t.get(key),
            Some(_) => {
                self.errors.push(format!("[{}] must be a table", section));
                None
            }
        }
    }

    fn integer(
        &mut self,
        section: &str,
        key: &str,
        default: i64,
        range: std::ops::RangeInclusive<i64>,
    ) -> i64 {
        let value = match self.value(section, key) {
            None => return default,
            Some(toml::Value::Integer(v)) => *v,
            Some(_) => {
                self.errors
                    .push(format!("[{}] {} must be an integer", section, key));
                return default;
            }
        };

        if !range.contains(&value) {
            self.errors.push(format!(
                "[{}] {} must be {}-{}",
                section,
                key,
                range.start(),
                range.end()
            ));
            return default;
        }
        value
    }

    fn boolean(&mut self, section: &str, key: &str, default: bool) -> bool {
        match self.value(section, key) {
            None => default,
            Some(toml::Value::Boolean(v)) => *v,
            Some(_) => {
                self.errors
                    .push(format!("[{}] {} must be true or false", section, key));
                default
            }
        }
    }
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

/// Write the validated settings as constants for `src/config.rs`
fn write_config(settings: &BridgeSettings) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("bridge_config.rs")).unwrap();

    writeln!(f, "// Generated from bridge.toml").unwrap();
    writeln!(f, "pub const HOST_BAUD: u32 = {};", settings.host_baud).unwrap();
    writeln!(f, "pub const HEATER_BAUD: u32 = {};", settings.heater_baud).unwrap();
    writeln!(f, "pub const READ_TIMEOUT_MS: u32 = {};", settings.read_timeout_ms).unwrap();
    writeln!(f, "pub const STEP_DELAY_MS: u32 = {};", settings.step_delay_ms).unwrap();
    writeln!(f, "pub const SETTLE_DELAY_MS: u32 = {};", settings.settle_delay_ms).unwrap();
    writeln!(f, "pub const CYCLE_PAUSE_MS: u32 = {};", settings.cycle_pause_ms).unwrap();
    writeln!(
        f,
        "pub const PELLET_SENSORS_ENABLED: bool = {};",
        settings.pellet_sensors_enabled
    )
    .unwrap();
    writeln!(
        f,
        "pub const PELLET_MAX_DISTANCE_CM: u16 = {};",
        settings.pellet_max_distance_cm
    )
    .unwrap();
}
