//! Climate Monitor Simulator
//!
//! Runs the full firmware loop (MSSP driver, HTU21D cycle, display
//! rendering) on the host against the register-level simulator and prints
//! the two display lines after every cycle.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --features std --bin climate_sim
//!
//! # Five cycles, humidity drifting upwards, no settle pause
//! cargo run --features std --bin climate_sim -- --cycles 5 --humidity 6000 --step 500 --fast
//! ```
//!
//! ## Options
//!
//! - `--cycles <n>` - Number of cycles to run (default: 3)
//! - `--humidity <raw>` - Initial 14-bit humidity sample (default: 8192)
//! - `--temperature <raw>` - Initial 14-bit temperature sample (default: 6000)
//! - `--step <raw>` - Added to both samples after each cycle (default: 0)
//! - `--busy-polls <n>` - Status polls each bus operation stays busy (default: 4)
//! - `--fast` - Skip the settle pause between transactions
//! - `--help` - Show help

use std::time::Duration;

use embedded_hal::delay::DelayNs;

use pic::adapters::sim::{BufferDisplay, SimulatedMssp};
use pic::domain::RAW_MAX;
use pic::ports::display::DisplayLine;
use pic::ports::poll::SpinLimit;
use pic::{ClimateMonitor, Htu21dSensor, MsspConfig, MsspMaster};

/// Upper bound on busy polls per wait before the run is declared stalled
const STALL_LIMIT: u32 = 10_000;

/// Blocking delay backed by the OS scheduler
struct ThreadDelay {
    enabled: bool,
}

impl DelayNs for ThreadDelay {
    fn delay_ns(&mut self, ns: u32) {
        if self.enabled {
            std::thread::sleep(Duration::from_nanos(ns as u64));
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        if self.enabled {
            std::thread::sleep(Duration::from_millis(ms as u64));
        }
    }
}

struct Options {
    cycles: u32,
    humidity: u16,
    temperature: u16,
    step: u16,
    busy_polls: u32,
    fast: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let options = parse_options(&args)?;

    let mut sim = SimulatedMssp::new()
        .with_busy_polls(options.busy_polls)
        .with_slave_address(0x40)
        .with_htu21d(options.humidity, options.temperature);

    let mut master =
        MsspMaster::with_budget(&mut sim, MsspConfig::STANDARD_4MHZ, SpinLimit::new(STALL_LIMIT));
    master.init().map_err(|e| format!("bus init failed: {:?}", e))?;

    let sensor = Htu21dSensor::new(master, ThreadDelay { enabled: !options.fast });
    let mut monitor = ClimateMonitor::new(sensor, BufferDisplay::new());

    let mut humidity = options.humidity;
    let mut temperature = options.temperature;

    for cycle in 1..=options.cycles {
        let reading = monitor
            .run_once()
            .map_err(|e| format!("cycle {} failed: {:?}", cycle, e))?;

        println!(
            "[{:>3}] raw RH={:>5} raw T={:>5}",
            cycle, reading.raw_humidity, reading.raw_temperature
        );
        println!("      |{}|", monitor.display().line(DisplayLine::First));
        println!("      |{}|", monitor.display().line(DisplayLine::Second));

        humidity = humidity.saturating_add(options.step).min(RAW_MAX);
        temperature = temperature.saturating_add(options.step).min(RAW_MAX);
        // The monitor holds the bus; reach the simulator again for the next samples
        let (sensor, display) = monitor.release();
        let (master, delay) = sensor.release();
        let port = master.release();
        port.set_htu21d_samples(humidity, temperature);
        let master = MsspMaster::with_budget(port, MsspConfig::STANDARD_4MHZ, SpinLimit::new(STALL_LIMIT));
        monitor = ClimateMonitor::new(Htu21dSensor::new(master, delay), display);
    }

    let (sensor, _) = monitor.release();
    let (master, _) = sensor.release();
    let port = master.release();
    println!(
        "\n{} bus events, {} status polls, overlap: {}",
        port.events().len() + port.dropped_events(),
        port.status_polls(),
        port.overlapped()
    );

    Ok(())
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        cycles: 3,
        humidity: 8192,
        temperature: 6000,
        step: 0,
        busy_polls: 4,
        fast: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--fast" => options.fast = true,
            "--cycles" => options.cycles = parse_value(arg, iter.next())?,
            "--humidity" => options.humidity = parse_raw(arg, iter.next())?,
            "--temperature" => options.temperature = parse_raw(arg, iter.next())?,
            "--step" => options.step = parse_value(arg, iter.next())?,
            "--busy-polls" => options.busy_polls = parse_value(arg, iter.next())?,
            other => return Err(format!("unknown option: {}", other)),
        }
    }
    Ok(options)
}

fn parse_value<T: std::str::FromStr>(name: &str, value: Option<&String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", name))?;
    value
        .parse()
        .map_err(|_| format!("invalid value for {}: {}", name, value))
}

fn parse_raw(name: &str, value: Option<&String>) -> Result<u16, String> {
    let raw: u16 = parse_value(name, value)?;
    if raw > RAW_MAX {
        return Err(format!("{} must be at most {}", name, RAW_MAX));
    }
    Ok(raw)
}

fn print_help() {
    println!("Climate monitor simulator");
    println!();
    println!("Options:");
    println!("  --cycles <n>         Number of cycles to run (default: 3)");
    println!("  --humidity <raw>     Initial 14-bit humidity sample (default: 8192)");
    println!("  --temperature <raw>  Initial 14-bit temperature sample (default: 6000)");
    println!("  --step <raw>         Added to both samples after each cycle (default: 0)");
    println!("  --busy-polls <n>     Status polls each operation stays busy (default: 4)");
    println!("  --fast               Skip the settle pause between transactions");
    println!("  --help               Show this help");
}
