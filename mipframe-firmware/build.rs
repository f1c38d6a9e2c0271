//! Build script for mipframe-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml and emits its values as constants, plus a
//!   function moving the wired peripherals out of `Peripherals`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const GPIO_COUNT: i64 = 30;
const DMA_CHANNEL_COUNT: i64 = 12;

fn main() {
    setup_linker();
    let panel = validate_config();
    write_constants(&panel);
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

/// Validated contents of panel.toml
struct Panel {
    bus_id: i64,
    clock_pin: i64,
    data_pin: i64,
    select_pin: i64,
    spi_frequency_hz: i64,
    settle_us: i64,
    dma_channel: i64,
}

/// Validate panel.toml configuration at compile time
fn validate_config() -> Panel {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: panel.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a panel.toml describing the display bus.  ║\n\
            ║  Please create one in the mipframe-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read panel.toml                                ║\n\
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
                ║  ERROR: Invalid TOML syntax in panel.toml                        ║\n\
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
    let panel = Panel {
        bus_id: integer(&config, "bus", "id", &mut errors),
        clock_pin: integer(&config, "bus", "clock_pin", &mut errors),
        data_pin: integer(&config, "bus", "data_pin", &mut errors),
        select_pin: integer(&config, "bus", "select_pin", &mut errors),
        spi_frequency_hz: integer(&config, "timing", "spi_frequency_hz", &mut errors),
        settle_us: integer(&config, "timing", "settle_us", &mut errors),
        dma_channel: integer(&config, "dma", "channel", &mut errors),
    };

    if errors.is_empty() {
        validate_bus(&panel, &mut errors);
        validate_timing(&panel, &mut errors);
        if !(0..DMA_CHANNEL_COUNT).contains(&panel.dma_channel) {
            errors.push(format!(
                "[dma] channel must be 0-{}",
                DMA_CHANNEL_COUNT - 1
            ));
        }
    }
    report("Invalid panel configuration", &errors);

    println!("cargo:warning=panel.toml validated successfully");
    panel
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

/// Required integer `[section] key`
fn integer(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> i64 {
    let table = match config.get(section) {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push(format!("[{}] must be a table", section));
            return 0;
        }
        None => {
            errors.push(format!("Missing [{}] section", section));
            return 0;
        }
    };

    match table.get(key) {
        Some(toml::Value::Integer(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] '{}' must be an integer", section, key));
            0
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            0
        }
    }
}

/// Bus id and pins against the RP2040 SPI muxing
fn validate_bus(panel: &Panel, errors: &mut Vec<String>) {
    if !(0..=1).contains(&panel.bus_id) {
        errors.push("[bus] id must be 0 or 1".to_string());
        return;
    }

    let pins = [
        ("clock_pin", panel.clock_pin),
        ("data_pin", panel.data_pin),
        ("select_pin", panel.select_pin),
    ];
    for (name, pin) in pins {
        if !(0..GPIO_COUNT).contains(&pin) {
            errors.push(format!("[bus] {} must be 0-{}", name, GPIO_COUNT - 1));
        }
    }
    for (i, (a, pa)) in pins.iter().enumerate() {
        for (b, pb) in &pins[i + 1..] {
            if pa == pb {
                errors.push(format!("[bus] {} and {} share GPIO {}", a, b, pa));
            }
        }
    }

    // Pins 0-7 and 16-23 mux to SPI0, the rest to SPI1; SCK is pin 2 and
    // TX pin 3 of each group of four
    let block_of = |pin: i64| (pin / 8) % 2;
    if panel.clock_pin % 4 != 2 || block_of(panel.clock_pin) != panel.bus_id {
        errors.push(format!(
            "[bus] GPIO {} is not an SCK pin of SPI{}",
            panel.clock_pin, panel.bus_id
        ));
    }
    if panel.data_pin % 4 != 3 || block_of(panel.data_pin) != panel.bus_id {
        errors.push(format!(
            "[bus] GPIO {} is not a TX pin of SPI{}",
            panel.data_pin, panel.bus_id
        ));
    }
}

fn validate_timing(panel: &Panel, errors: &mut Vec<String>) {
    if panel.spi_frequency_hz <= 0 || panel.spi_frequency_hz > u32::MAX as i64 {
        errors.push("[timing] spi_frequency_hz must be positive".to_string());
    }
    if panel.settle_us <= 0 || panel.settle_us > u32::MAX as i64 {
        errors.push("[timing] settle_us must be positive".to_string());
    }
}

/// Emit the panel values as Rust constants into OUT_DIR
///
/// The SPI block and pins are also emitted as peripheral types, so the
/// SPI driver's pin checks run against the configured wiring.
fn write_constants(panel: &Panel) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let source = format!(
        "pub const BUS_ID: u8 = {bus};\n\
         pub const CLOCK_PIN: u8 = {clk};\n\
         pub const DATA_PIN: u8 = {data};\n\
         pub const SELECT_PIN: u8 = {cs};\n\
         pub const SPI_FREQUENCY_HZ: u32 = {freq};\n\
         pub const SETTLE_US: u32 = {settle};\n\
         \n\
         pub type PanelSpi = embassy_rp::peripherals::SPI{bus};\n\
         pub type PanelClock = embassy_rp::peripherals::PIN_{clk};\n\
         pub type PanelData = embassy_rp::peripherals::PIN_{data};\n\
         \n\
         /// Move the panel's peripherals out of `p`\n\
         pub fn panel_peripherals(\n    \
             p: embassy_rp::Peripherals,\n\
         ) -> mipframe_hal_rp2040::BusPeripherals<PanelSpi, PanelClock, PanelData> {{\n    \
             mipframe_hal_rp2040::BusPeripherals {{\n        \
                 spi: p.SPI{bus},\n        \
                 clock: p.PIN_{clk},\n        \
                 data: p.PIN_{data},\n        \
                 select: p.PIN_{cs}.into(),\n        \
                 dma: p.DMA_CH{dma}.into(),\n    \
             }}\n\
         }}\n",
        bus = panel.bus_id,
        clk = panel.clock_pin,
        data = panel.data_pin,
        cs = panel.select_pin,
        freq = panel.spi_frequency_hz,
        settle = panel.settle_us,
        dma = panel.dma_channel,
    );

    fs::write(out_dir.join("panel_config.rs"), source).unwrap();
}
