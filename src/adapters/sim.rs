//! Simulated MSSP peripheral and display
//!
//! [`SimulatedMssp`] models the register file of the MSSP in I2C master mode
//! closely enough to drive [`MsspMaster`](crate::adapters::MsspMaster)
//! without silicon: trigger bits stay set for a configurable number of
//! status polls, received bytes come from a scripted queue, and every bus
//! condition is appended to an event log.
//!
//! [`BufferDisplay`] keeps the two display lines in memory.

use heapless::{Deque, Vec};

use crate::ports::display::{DisplayError, DisplayLine, DisplayPort};
use crate::ports::registers::{
    BusStatus, MsspPort, Register, SSPCON2_ACKDT, SSPCON2_ACKEN, SSPCON2_ACKSTAT,
    SSPCON2_PEN, SSPCON2_PENDING_MASK, SSPCON2_RCEN, SSPCON2_RSEN, SSPCON2_SEN, SSPSTAT_R_W,
};

/// Events kept by the simulator before it starts dropping them
pub const EVENT_CAPACITY: usize = 128;

/// Scripted slave bytes the simulator can hold
pub const RESPONSE_CAPACITY: usize = 32;

/// Value read when no slave drives the bus
pub const RELEASED_BUS: u8 = 0xFF;

/// SSPSTAT buffer-full flag
const SSPSTAT_BF: u8 = 1 << 0;

/// Split a 14-bit sample into the MSB/LSB pair an HTU21D sends.
///
/// Bit 1 of the LSB is the sensor's status bit (set for humidity).
pub const fn htu21d_bytes(raw: u16, humidity: bool) -> [u8; 2] {
    let status = if humidity { 0b10 } else { 0b00 };
    [(raw >> 6) as u8, (((raw & 0x3F) << 2) as u8) | status]
}

/// Raw samples the simulated HTU21D answers with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Htu21dModel {
    pub humidity_command: u8,
    pub temperature_command: u8,
    pub raw_humidity: u16,
    pub raw_temperature: u16,
}

/// Bus condition observed by the simulator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusEvent {
    Start,
    RepeatedStart,
    Stop,
    /// Byte transmitted by the master
    Write(u8),
    /// Byte clocked in from the slave
    Read(u8),
    /// Master acknowledged a received byte
    Ack,
    /// Master did not acknowledge a received byte
    Nack,
}

/// Register-level MSSP simulator
#[derive(Debug)]
pub struct SimulatedMssp {
    sspcon: u8,
    sspcon2: u8,
    sspstat: u8,
    sspadd: u8,
    sspbuf: u8,
    busy_polls: u32,
    remaining: u32,
    stuck: bool,
    slave_address: Option<u8>,
    expecting_address: bool,
    selected: bool,
    model: Option<Htu21dModel>,
    responses: Deque<u8, RESPONSE_CAPACITY>,
    events: Vec<BusEvent, EVENT_CAPACITY>,
    dropped_events: usize,
    status_polls: u32,
    overlapped: bool,
}

impl Default for SimulatedMssp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedMssp {
    /// Simulator that completes every operation on the first status poll
    pub fn new() -> Self {
        Self {
            sspcon: 0,
            sspcon2: 0,
            sspstat: 0,
            sspadd: 0,
            sspbuf: 0,
            busy_polls: 0,
            remaining: 0,
            stuck: false,
            slave_address: None,
            expecting_address: false,
            selected: true,
            model: None,
            responses: Deque::new(),
            events: Vec::new(),
            dropped_events: 0,
            status_polls: 0,
            overlapped: false,
        }
    }

    /// Keep each operation busy for `polls` status reads
    pub fn with_busy_polls(mut self, polls: u32) -> Self {
        self.busy_polls = polls;
        self
    }

    /// Only answer to this 7-bit address. Other addresses get no ACK
    /// and read back as a released bus.
    pub fn with_slave_address(mut self, address: u8) -> Self {
        self.slave_address = Some(address);
        self
    }

    /// Answer measurement commands like an HTU21D holding these samples
    pub fn with_htu21d(mut self, raw_humidity: u16, raw_temperature: u16) -> Self {
        self.model = Some(Htu21dModel {
            humidity_command: 0xE5,
            temperature_command: 0xE3,
            raw_humidity,
            raw_temperature,
        });
        self
    }

    /// Change the samples of the simulated HTU21D
    pub fn set_htu21d_samples(&mut self, raw_humidity: u16, raw_temperature: u16) {
        if let Some(model) = self.model.as_mut() {
            model.raw_humidity = raw_humidity;
            model.raw_temperature = raw_temperature;
        }
    }

    /// Never report idle
    pub fn stuck(mut self) -> Self {
        self.stuck = true;
        self
    }

    /// Queue bytes the slave will send. Bytes beyond
    /// [`RESPONSE_CAPACITY`] are discarded.
    pub fn push_response(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if self.responses.push_back(byte).is_err() {
                break;
            }
        }
    }

    pub fn responses_left(&self) -> usize {
        self.responses.len()
    }

    /// Current value of a control register
    pub fn register(&self, register: Register) -> u8 {
        match register {
            Register::Sspcon => self.sspcon,
            Register::Sspcon2 => self.sspcon2,
            Register::Sspstat => self.sspstat,
            Register::Sspadd => self.sspadd,
        }
    }

    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
        self.dropped_events = 0;
    }

    /// Events lost because the log was full
    pub fn dropped_events(&self) -> usize {
        self.dropped_events
    }

    /// Number of `read_status` calls so far
    pub fn status_polls(&self) -> u32 {
        self.status_polls
    }

    /// Whether an operation was triggered while another was in flight
    pub fn overlapped(&self) -> bool {
        self.overlapped
    }

    fn busy(&self) -> bool {
        self.sspcon2 & SSPCON2_PENDING_MASK != 0 || self.sspstat & SSPSTAT_R_W != 0
    }

    fn record(&mut self, event: BusEvent) {
        if self.events.push(event).is_err() {
            self.dropped_events += 1;
        }
    }

    fn begin_operation(&mut self) {
        if self.busy() {
            self.overlapped = true;
        }
        self.remaining = self.busy_polls;
    }

    fn run_command(&mut self, command: u8) {
        let Some(model) = self.model else {
            return;
        };
        let bytes = if command == model.humidity_command {
            htu21d_bytes(model.raw_humidity, true)
        } else if command == model.temperature_command {
            htu21d_bytes(model.raw_temperature, false)
        } else {
            return;
        };
        self.responses.clear();
        self.push_response(&bytes);
    }

    fn write_sspcon2(&mut self, value: u8) {
        let triggered = value & !self.sspcon2 & SSPCON2_PENDING_MASK;
        if triggered != 0 {
            self.begin_operation();
        }

        if triggered & SSPCON2_SEN != 0 {
            self.record(BusEvent::Start);
            self.expecting_address = true;
        }
        if triggered & SSPCON2_RSEN != 0 {
            self.record(BusEvent::RepeatedStart);
            self.expecting_address = true;
        }
        if triggered & SSPCON2_PEN != 0 {
            self.record(BusEvent::Stop);
            self.selected = true;
        }
        if triggered & SSPCON2_RCEN != 0 {
            let byte = if self.selected {
                self.responses.pop_front().unwrap_or(RELEASED_BUS)
            } else {
                RELEASED_BUS
            };
            self.sspbuf = byte;
            self.sspstat |= SSPSTAT_BF;
            self.record(BusEvent::Read(byte));
        }
        if triggered & SSPCON2_ACKEN != 0 {
            if value & SSPCON2_ACKDT != 0 {
                self.record(BusEvent::Nack);
            } else {
                self.record(BusEvent::Ack);
            }
        }

        // ACKSTAT is driven by the slave, not writable
        self.sspcon2 = (value & !SSPCON2_ACKSTAT) | (self.sspcon2 & SSPCON2_ACKSTAT);
    }
}

impl MsspPort for SimulatedMssp {
    fn read_status(&mut self) -> BusStatus {
        self.status_polls = self.status_polls.saturating_add(1);
        if self.stuck {
            return BusStatus::new(self.sspcon2, self.sspstat | SSPSTAT_R_W);
        }
        if self.remaining > 0 {
            self.remaining -= 1;
        } else {
            self.sspcon2 &= !SSPCON2_PENDING_MASK;
            self.sspstat &= !SSPSTAT_R_W;
        }
        BusStatus::new(self.sspcon2, self.sspstat)
    }

    fn read_control(&mut self, register: Register) -> u8 {
        self.register(register)
    }

    fn write_control(&mut self, register: Register, value: u8) {
        match register {
            Register::Sspcon => self.sspcon = value,
            Register::Sspcon2 => self.write_sspcon2(value),
            Register::Sspstat => self.sspstat = value,
            Register::Sspadd => self.sspadd = value,
        }
    }

    fn read_data(&mut self) -> u8 {
        self.sspstat &= !SSPSTAT_BF;
        self.sspbuf
    }

    fn write_data(&mut self, value: u8) {
        self.begin_operation();
        self.sspbuf = value;
        self.sspstat |= SSPSTAT_R_W;
        self.record(BusEvent::Write(value));

        if self.expecting_address {
            self.expecting_address = false;
            self.selected = self.slave_address.map_or(true, |addr| value >> 1 == addr);
        } else if self.selected {
            self.run_command(value);
        }
        if self.selected {
            self.sspcon2 &= !SSPCON2_ACKSTAT;
        } else {
            self.sspcon2 |= SSPCON2_ACKSTAT;
        }
    }
}

/// Bytes per display line (HD44780 DDRAM holds 40 per line)
pub const LINE_CAPACITY: usize = 40;

/// In-memory two-line character display
#[derive(Debug, Default)]
pub struct BufferDisplay {
    lines: [Vec<u8, LINE_CAPACITY>; 2],
    line: usize,
    cursor: usize,
}

impl BufferDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a line. Non-ASCII content reads as an empty string.
    pub fn line(&self, line: DisplayLine) -> &str {
        core::str::from_utf8(&self.lines[Self::index(line)]).unwrap_or("")
    }

    fn index(line: DisplayLine) -> usize {
        match line {
            DisplayLine::First => 0,
            DisplayLine::Second => 1,
        }
    }
}

impl DisplayPort for BufferDisplay {
    fn set_line(&mut self, line: DisplayLine) -> Result<(), DisplayError> {
        self.line = Self::index(line);
        self.cursor = 0;
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), DisplayError> {
        let line = &mut self.lines[self.line];
        if self.cursor < line.len() {
            line[self.cursor] = byte;
        } else {
            line.push(byte).map_err(|_| DisplayError::Overflow)?;
        }
        self.cursor += 1;
        Ok(())
    }
}
