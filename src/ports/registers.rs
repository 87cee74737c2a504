//! Register port - access to the MSSP peripheral registers
//!
//! The I2C master driver never touches global register symbols. It talks to
//! an injected handle implementing [`MsspPort`], so a simulated bus can stand
//! in for the silicon during tests.

/// SSPCON: MSSP enable
pub const SSPCON_SSPEN: u8 = 1 << 5;
/// SSPCON: SSPM<3:0> = 1000, I2C master mode, clock = Fosc / (4 * (SSPADD + 1))
pub const SSPCON_MASTER_MODE: u8 = 0b1000;

/// SSPCON2: start condition enable
pub const SSPCON2_SEN: u8 = 1 << 0;
/// SSPCON2: repeated start condition enable
pub const SSPCON2_RSEN: u8 = 1 << 1;
/// SSPCON2: stop condition enable
pub const SSPCON2_PEN: u8 = 1 << 2;
/// SSPCON2: receive enable
pub const SSPCON2_RCEN: u8 = 1 << 3;
/// SSPCON2: acknowledge sequence enable
pub const SSPCON2_ACKEN: u8 = 1 << 4;
/// SSPCON2: acknowledge data (0 = ACK, 1 = NACK)
pub const SSPCON2_ACKDT: u8 = 1 << 5;
/// SSPCON2: acknowledge status from the slave (0 = ACK received)
pub const SSPCON2_ACKSTAT: u8 = 1 << 6;

/// SSPCON2 bits that stay set while an operation is in flight
pub const SSPCON2_PENDING_MASK: u8 =
    SSPCON2_SEN | SSPCON2_RSEN | SSPCON2_PEN | SSPCON2_RCEN | SSPCON2_ACKEN;

/// SSPSTAT: in master mode, set while a transmit is in progress
pub const SSPSTAT_R_W: u8 = 1 << 2;

/// Control registers reachable through [`MsspPort`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Control register 1 (enable, mode)
    Sspcon,
    /// Control register 2 (start/stop/receive/acknowledge triggers)
    Sspcon2,
    /// Status register
    Sspstat,
    /// Baud rate divisor in master mode
    Sspadd,
}

/// Snapshot of the bits that decide whether the bus is idle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusStatus {
    pub sspcon2: u8,
    pub sspstat: u8,
}

impl BusStatus {
    pub const fn new(sspcon2: u8, sspstat: u8) -> Self {
        Self { sspcon2, sspstat }
    }

    /// No start/stop/receive/acknowledge pending and no transmit in progress
    #[inline]
    pub const fn is_idle(&self) -> bool {
        self.sspcon2 & SSPCON2_PENDING_MASK == 0 && self.sspstat & SSPSTAT_R_W == 0
    }

    /// Whether the slave acknowledged the last transmitted byte
    pub const fn slave_acked(&self) -> bool {
        self.sspcon2 & SSPCON2_ACKSTAT == 0
    }
}

/// Bus phase that was in progress when an error happened
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No operation issued since init
    Idle,
    Start,
    RepeatedStart,
    Stop,
    Send,
    Receive,
    Acknowledge,
}

/// Error type for bus operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The poll budget gave up waiting for the bus to idle
    Timeout(Phase),
    /// Requested bus clock cannot be produced from the oscillator
    InvalidClock,
}

/// Port onto the MSSP control/status/data registers
///
/// Implementations on real hardware map these onto volatile accesses of
/// SSPCON, SSPCON2, SSPSTAT, SSPADD and SSPBUF. Pin direction (SCL/SDA as
/// inputs) is the implementation's responsibility.
pub trait MsspPort {
    /// Read the busy-relevant status bits
    fn read_status(&mut self) -> BusStatus;

    /// Read a control register
    fn read_control(&mut self, register: Register) -> u8;

    /// Write a control register
    fn write_control(&mut self, register: Register, value: u8);

    /// Read the data buffer (SSPBUF)
    fn read_data(&mut self) -> u8;

    /// Write the data buffer (SSPBUF), starting a transmission
    fn write_data(&mut self, value: u8);

    /// Read-modify-write helper that sets `mask` in `register`
    fn set_bits(&mut self, register: Register, mask: u8) {
        let value = self.read_control(register);
        self.write_control(register, value | mask);
    }

    /// Read-modify-write helper that clears `mask` in `register`
    fn clear_bits(&mut self, register: Register, mask: u8) {
        let value = self.read_control(register);
        self.write_control(register, value & !mask);
    }
}

impl<P: MsspPort + ?Sized> MsspPort for &mut P {
    fn read_status(&mut self) -> BusStatus {
        (**self).read_status()
    }

    fn read_control(&mut self, register: Register) -> u8 {
        (**self).read_control(register)
    }

    fn write_control(&mut self, register: Register, value: u8) {
        (**self).write_control(register, value)
    }

    fn read_data(&mut self) -> u8 {
        (**self).read_data()
    }

    fn write_data(&mut self, value: u8) {
        (**self).write_data(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_requires_no_pending_bits() {
        assert!(BusStatus::new(0, 0).is_idle());
        assert!(BusStatus::new(SSPCON2_ACKDT | SSPCON2_ACKSTAT, 0).is_idle());
        for bit in [SSPCON2_SEN, SSPCON2_RSEN, SSPCON2_PEN, SSPCON2_RCEN, SSPCON2_ACKEN] {
            assert!(!BusStatus::new(bit, 0).is_idle());
        }
    }

    #[test]
    fn test_idle_requires_no_transmit() {
        assert!(!BusStatus::new(0, SSPSTAT_R_W).is_idle());
        // BF alone does not block
        assert!(BusStatus::new(0, 0x01).is_idle());
    }

    #[test]
    fn test_ackstat() {
        assert!(BusStatus::new(0, 0).slave_acked());
        assert!(!BusStatus::new(SSPCON2_ACKSTAT, 0).slave_acked());
    }
}
