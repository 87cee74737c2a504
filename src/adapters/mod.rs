//! Adapters - concrete implementations of ports
//!
//! # Available Adapters
//!
//! - **mssp**: I2C master driver over any [`MsspPort`](crate::ports::MsspPort)
//! - **htu21d**: HTU21D humidity/temperature sensor on that driver
//! - **sim**: simulated MSSP register file and in-memory display

pub mod htu21d;
pub mod mssp;
pub mod sim;

pub use htu21d::Htu21dSensor;
pub use mssp::{MsspConfig, MsspMaster};
pub use sim::{BufferDisplay, BusEvent, SimulatedMssp};
