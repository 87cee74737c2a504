//! PIC MSSP climate monitor
//!
//! An I2C master driver for the MSSP peripheral of 8-bit PIC parts, an
//! HTU21D humidity/temperature sensor on top of it, and the loop that
//! renders readings onto a two-line character display.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                                 │
//! │  - 14-bit sample assembly                                        │
//! │  - ConversionCurve: raw -> %RH / degC                            │
//! │  - ClimateReading entity, display rendering                      │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Ports (Traits)                               │
//! │  - MsspPort: MSSP register file                                  │
//! │  - PollBudget: bound on busy-waits                               │
//! │  - ClimateSensorPort: read humidity + temperature                │
//! │  - DisplayPort: character sink                                   │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Adapters                                     │
//! │  - MsspMaster: start/stop/send/receive bus driver                │
//! │  - Htu21dSensor: fixed humidity/temperature cycle                │
//! │  - SimulatedMssp, BufferDisplay: host stand-ins                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The driver never touches global register symbols; the firmware hands it
//! an [`MsspPort`] implementation mapping onto SSPCON/SSPCON2/SSPSTAT/
//! SSPADD/SSPBUF, and tests hand it a [`SimulatedMssp`].

#![cfg_attr(not(any(test, feature = "std")), no_std)]

// Must come first so the logging macros are visible below
#[macro_use]
mod fmt;

/// Domain layer - pure logic
pub mod domain;

/// Ports - traits defining boundaries
pub mod ports;

/// Adapters - concrete implementations
pub mod adapters;

/// Outer monitor loop
pub mod app;

// Re-export key domain types
pub use domain::{ClimateReading, ConversionCurve, Measurement, RawSample};

// Re-export key port traits
pub use ports::{
    BusError, ClimateSensorPort, DisplayPort, MsspPort, PollBudget, SensorConfig, SensorError,
};

// Re-export adapters
pub use adapters::{BufferDisplay, Htu21dSensor, MsspConfig, MsspMaster, SimulatedMssp};

pub use app::{ClimateMonitor, MonitorError};
