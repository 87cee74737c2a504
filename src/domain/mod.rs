//! Domain layer - pure logic independent of the bus hardware
//!
//! Byte assembly, unit conversion and display rendering. Nothing in here
//! touches a register, so all of it is testable on the host.

pub mod conversion;
pub mod display;
pub mod raw;
pub mod reading;

pub use conversion::{humidity_percent, temperature_celsius, ConversionCurve};
pub use display::{format_humidity, format_temperature, DisplayText};
pub use raw::{assemble_raw14, RawSample, RAW_MAX};
pub use reading::{ClimateReading, Measurement};
