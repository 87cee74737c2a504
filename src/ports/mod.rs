//! Ports (interfaces) defining the boundaries of the driver
//!
//! Ports are traits that define how the driver and the monitor reach the
//! outside world. Adapters plug into them:
//!
//! - **MsspPort**: the MSSP register file (silicon, simulator)
//! - **PollBudget**: how long a busy-wait may spin
//! - **ClimateSensorPort**: how the monitor gets readings
//! - **DisplayPort**: where rendered readings go

pub mod display;
pub mod poll;
pub mod registers;
pub mod sensor;

pub use display::{DisplayError, DisplayLine, DisplayPort};
pub use poll::{Forever, PollBudget, SpinLimit};
pub use registers::{BusError, BusStatus, MsspPort, Phase, Register};
pub use sensor::{ClimateSensorPort, SensorConfig, SensorError};
