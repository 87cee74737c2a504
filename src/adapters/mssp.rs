//! MSSP I2C master driver
//!
//! Sequences the PIC MSSP peripheral through start, repeated start, stop,
//! send and receive/acknowledge phases. Every phase first waits for the
//! peripheral to report idle; the wait is bounded only by the injected
//! [`PollBudget`], so with [`Forever`] a dead bus hangs the caller.
//!
//! The slave's acknowledge after [`MsspMaster::send`] is not checked. A
//! missing device reads back as whatever the bus floats to.

use embedded_hal::i2c::{self, ErrorKind, ErrorType, Operation, SevenBitAddress};

use crate::ports::poll::{Forever, PollBudget};
use crate::ports::registers::{
    BusError, MsspPort, Phase, Register, SSPCON2_ACKDT, SSPCON2_ACKEN, SSPCON2_PEN,
    SSPCON2_RCEN, SSPCON2_RSEN, SSPCON2_SEN, SSPCON_MASTER_MODE, SSPCON_SSPEN,
};

/// Bus clock configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MsspConfig {
    /// CPU oscillator frequency (Fosc)
    pub oscillator_hz: u32,
    /// Requested SCL frequency
    pub bus_hz: u32,
}

impl Default for MsspConfig {
    fn default() -> Self {
        Self::STANDARD_4MHZ
    }
}

impl MsspConfig {
    /// 4 MHz crystal, 100 kHz standard mode (SSPADD = 9)
    pub const STANDARD_4MHZ: Self = Self {
        oscillator_hz: 4_000_000,
        bus_hz: 100_000,
    };

    /// 20 MHz crystal, 400 kHz fast mode (SSPADD = 11)
    pub const FAST_20MHZ: Self = Self {
        oscillator_hz: 20_000_000,
        bus_hz: 400_000,
    };

    pub const fn new(oscillator_hz: u32, bus_hz: u32) -> Self {
        Self {
            oscillator_hz,
            bus_hz,
        }
    }

    /// SSPADD value: `Fosc / (4 * Fscl) - 1`
    ///
    /// `None` if the result does not fit the 8-bit register.
    pub const fn divisor(&self) -> Option<u8> {
        let per_bit = match self.bus_hz.checked_mul(4) {
            Some(0) | None => return None,
            Some(v) => v,
        };
        let ticks = self.oscillator_hz / per_bit;
        if ticks == 0 || ticks > 256 {
            None
        } else {
            Some((ticks - 1) as u8)
        }
    }
}

impl i2c::Error for BusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// I2C master on the MSSP peripheral
///
/// Not reentrant: one bus, one transaction in flight. Each call blocks
/// until its phase has been handed to the hardware.
pub struct MsspMaster<P, B = Forever> {
    port: P,
    budget: B,
    config: MsspConfig,
    phase: Phase,
}

impl<P: MsspPort> MsspMaster<P, Forever> {
    /// Create a driver whose waits never time out
    pub fn new(port: P, config: MsspConfig) -> Self {
        Self::with_budget(port, config, Forever)
    }
}

impl<P: MsspPort, B: PollBudget> MsspMaster<P, B> {
    /// Create a driver with a custom poll budget
    pub fn with_budget(port: P, config: MsspConfig, budget: B) -> Self {
        Self {
            port,
            budget,
            config,
            phase: Phase::Idle,
        }
    }

    /// Put the MSSP into I2C master mode at the configured clock
    pub fn init(&mut self) -> Result<(), BusError> {
        let divisor = self.config.divisor().ok_or(BusError::InvalidClock)?;

        self.port
            .write_control(Register::Sspcon, SSPCON_SSPEN | SSPCON_MASTER_MODE);
        self.port.write_control(Register::Sspcon2, 0x00);
        self.port.write_control(Register::Sspstat, 0x00);
        self.port.write_control(Register::Sspadd, divisor);
        self.phase = Phase::Idle;

        debug!(
            "MSSP master: fosc={} scl={} sspadd={}",
            self.config.oscillator_hz,
            self.config.bus_hz,
            divisor
        );
        Ok(())
    }

    /// Block until no start/stop/receive/acknowledge is pending and no
    /// byte is being transmitted.
    pub fn wait_idle(&mut self) -> Result<(), BusError> {
        self.budget.restart();
        loop {
            if self.port.read_status().is_idle() {
                return Ok(());
            }
            if !self.budget.keep_polling() {
                warn!("MSSP: gave up waiting for idle in {}", self.phase);
                return Err(BusError::Timeout(self.phase));
            }
        }
    }

    /// Issue a start condition and take the bus
    pub fn start(&mut self) -> Result<(), BusError> {
        self.phase = Phase::Start;
        self.wait_idle()?;
        self.port.set_bits(Register::Sspcon2, SSPCON2_SEN);
        trace!("I2C start");
        Ok(())
    }

    /// Issue a restart without releasing the bus
    pub fn repeated_start(&mut self) -> Result<(), BusError> {
        self.phase = Phase::RepeatedStart;
        self.wait_idle()?;
        self.port.set_bits(Register::Sspcon2, SSPCON2_RSEN);
        trace!("I2C repeated start");
        Ok(())
    }

    /// Issue a stop condition and release the bus
    pub fn stop(&mut self) -> Result<(), BusError> {
        self.phase = Phase::Stop;
        self.wait_idle()?;
        self.port.set_bits(Register::Sspcon2, SSPCON2_PEN);
        trace!("I2C stop");
        Ok(())
    }

    /// Transmit one byte (address + direction bit, or data)
    pub fn send(&mut self, byte: u8) -> Result<(), BusError> {
        self.phase = Phase::Send;
        self.wait_idle()?;
        self.port.write_data(byte);
        trace!("I2C send {=u8:#x}", byte);
        Ok(())
    }

    /// Clock in one byte, then ACK it if `expect_more`, NACK it otherwise.
    ///
    /// ACK asks the slave for another byte; NACK tells it this was the last.
    pub fn receive(&mut self, expect_more: bool) -> Result<u8, BusError> {
        self.phase = Phase::Receive;
        self.wait_idle()?;
        self.port.set_bits(Register::Sspcon2, SSPCON2_RCEN);
        self.wait_idle()?;
        let byte = self.port.read_data();

        self.phase = Phase::Acknowledge;
        self.wait_idle()?;
        if expect_more {
            self.port.clear_bits(Register::Sspcon2, SSPCON2_ACKDT);
        } else {
            self.port.set_bits(Register::Sspcon2, SSPCON2_ACKDT);
        }
        self.port.set_bits(Register::Sspcon2, SSPCON2_ACKEN);
        trace!("I2C receive {=u8:#x} ack={}", byte, expect_more);
        Ok(byte)
    }

    /// Phase of the most recent operation
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> MsspConfig {
        self.config
    }

    /// Release the register port
    pub fn release(self) -> P {
        self.port
    }
}

impl<P: MsspPort, B: PollBudget> ErrorType for MsspMaster<P, B> {
    type Error = BusError;
}

impl<P: MsspPort, B: PollBudget> i2c::I2c<SevenBitAddress> for MsspMaster<P, B> {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut previous_read: Option<bool> = None;

        for i in 0..operations.len() {
            let is_read = matches!(operations[i], Operation::Read(_));
            let next_is_read = matches!(operations.get(i + 1), Some(Operation::Read(_)));

            if previous_read != Some(is_read) {
                if previous_read.is_none() {
                    self.start()?;
                } else {
                    self.repeated_start()?;
                }
                self.send((address << 1) | is_read as u8)?;
            }

            match &mut operations[i] {
                Operation::Write(bytes) => {
                    for &byte in bytes.iter() {
                        self.send(byte)?;
                    }
                }
                Operation::Read(buffer) => {
                    // Adjacent reads form one burst; only its final byte is NACKed
                    let len = buffer.len();
                    for (j, slot) in buffer.iter_mut().enumerate() {
                        let expect_more = j + 1 < len || next_is_read;
                        *slot = self.receive(expect_more)?;
                    }
                }
            }
            previous_read = Some(is_read);
        }

        if previous_read.is_some() {
            self.stop()?;
        }
        Ok(())
    }
}
