//! Build script for kestrel-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Parses and validates device.toml, then compiles it into
//!   `device_config.rs` so the firmware does no runtime parsing

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use kestrel_core::config::DeviceConfig;
use serde::Deserialize;

fn main() {
    setup_linker();
    let device = load_config();
    write_config(&device);
}

/// Link and loop settings that live next to the core configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
struct LinkSection {
    baudrate: u32,
    reply_timeout_ms: u32,
}

impl Default for LinkSection {
    fn default() -> Self {
        Self {
            baudrate: 115_200,
            reply_timeout_ms: 200,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PollSection {
    interval_ms: u32,
}

impl Default for PollSection {
    fn default() -> Self {
        Self { interval_ms: 1 }
    }
}

/// Shape of device.toml
#[derive(Debug, Deserialize)]
struct DeviceFile {
    #[serde(flatten)]
    device: DeviceConfig,
    #[serde(default)]
    link: LinkSection,
    #[serde(default)]
    poll: PollSection,
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

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse and validate device.toml
fn load_config() -> DeviceFile {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");
    if !config_path.exists() {
        fail(
            "device.toml not found!",
            &["The firmware requires a device.toml configuration file."],
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read device.toml", &[&e.to_string()]),
    };

    let file: DeviceFile = match toml::from_str(&content) {
        Ok(file) => file,
        Err(e) => {
            let msg = e.to_string();
            let lines: Vec<&str> = msg.lines().collect();
            fail("Invalid device.toml", &lines)
        }
    };

    let mut errors = Vec::new();
    if let Err(e) = file.device.validate() {
        errors.push(format!("{:?}", e));
    }
    if file.link.baudrate == 0 {
        errors.push("[link] baudrate must be non-zero".to_string());
    }
    if file.link.reply_timeout_ms == 0 {
        errors.push("[link] reply_timeout_ms must be non-zero".to_string());
    }
    if file.poll.interval_ms == 0 || file.poll.interval_ms > 10 {
        errors.push("[poll] interval_ms must be 1-10".to_string());
    }
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(|e| format!("• {}", e)).collect();
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        fail("Invalid device configuration", &lines);
    }

    println!("cargo:warning=device.toml validated successfully");
    file
}

/// Generate `device_config.rs` in OUT_DIR
///
/// Paths are fully qualified so the file compiles wherever it is included.
fn write_config(file: &DeviceFile) {
    let d = &file.device;
    let code = format!(
        "/// Device configuration compiled from device.toml
pub const DEVICE_CONFIG: kestrel_core::config::DeviceConfig = kestrel_core::config::DeviceConfig {{
    input: kestrel_core::config::InputTiming {{
        debounce_ms: {},
        long_press_ms: {},
        encoder_min_edge_ms: {},
    }},
    flood: kestrel_core::config::FloodConfig {{
        min_interval_ms: {},
        max_interval_ms: {},
        adv_interval_min: {:#06x},
        adv_interval_max: {:#06x},
        burst_ms: {},
    }},
    scan: kestrel_core::config::ScanConfig {{ duration_s: {} }},
    ui: kestrel_core::config::UiConfig {{ notice_ms: {} }},
}};

/// Radio link UART baud rate
pub const LINK_BAUDRATE: u32 = {};

/// Radio link reply deadline
pub const LINK_REPLY_TIMEOUT_MS: u32 = {};

/// Poll loop period
pub const POLL_INTERVAL_MS: u64 = {};
",
        d.input.debounce_ms,
        d.input.long_press_ms,
        d.input.encoder_min_edge_ms,
        d.flood.min_interval_ms,
        d.flood.max_interval_ms,
        d.flood.adv_interval_min,
        d.flood.adv_interval_max,
        d.flood.burst_ms,
        d.scan.duration_s,
        d.ui.notice_ms,
        file.link.baudrate,
        file.link.reply_timeout_ms,
        file.poll.interval_ms,
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("device_config.rs"), code).unwrap();
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[&str]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(lines)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
