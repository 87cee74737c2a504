//! Climate monitor - the firmware's outer loop
//!
//! Reads the sensor, renders both values and pushes them to the display,
//! forever. Each value is padded to its field width so a shorter value
//! overwrites the previous one completely.

use core::convert::Infallible;

use crate::domain::display::{
    format_humidity, format_temperature, HUMIDITY_LABEL, TEMPERATURE_FIELD_WIDTH,
    TEMPERATURE_LABEL,
};
use crate::domain::ClimateReading;
use crate::ports::display::{DisplayError, DisplayLine, DisplayPort};
use crate::ports::sensor::{ClimateSensorPort, SensorError};

/// Width of the humidity field, `%` included ("118%")
pub const HUMIDITY_FIELD_WIDTH: usize = 4;

/// Error type for the monitor loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MonitorError {
    Sensor(SensorError),
    Display(DisplayError),
}

impl From<SensorError> for MonitorError {
    fn from(err: SensorError) -> Self {
        MonitorError::Sensor(err)
    }
}

impl From<DisplayError> for MonitorError {
    fn from(err: DisplayError) -> Self {
        MonitorError::Display(err)
    }
}

/// Sensor-to-display loop
pub struct ClimateMonitor<S, L> {
    sensor: S,
    display: L,
    cycles: u32,
}

impl<S: ClimateSensorPort, L: DisplayPort> ClimateMonitor<S, L> {
    pub fn new(sensor: S, display: L) -> Self {
        Self {
            sensor,
            display,
            cycles: 0,
        }
    }

    /// Take one reading and show it
    pub fn run_once(&mut self) -> Result<ClimateReading, MonitorError> {
        let reading = self.sensor.read()?;
        self.render(&reading)?;
        self.cycles = self.cycles.wrapping_add(1);

        info!(
            "cycle {}: RH={}% T={}C",
            self.cycles,
            reading.humidity_percent,
            reading.temperature_c
        );
        Ok(reading)
    }

    /// Read and display forever. Returns only if a cycle fails.
    pub fn run(&mut self) -> Result<Infallible, MonitorError> {
        loop {
            if let Err(err) = self.run_once() {
                error!("monitor stopped: {}", err);
                return Err(err);
            }
        }
    }

    /// Write both lines for a reading
    pub fn render(&mut self, reading: &ClimateReading) -> Result<(), MonitorError> {
        let humidity = format_humidity(reading.humidity_percent);
        self.display.set_line(DisplayLine::First)?;
        self.display.write_str(HUMIDITY_LABEL)?;
        write_field(&mut self.display, &humidity, HUMIDITY_FIELD_WIDTH)?;

        let temperature = format_temperature(reading.temperature_c);
        self.display.set_line(DisplayLine::Second)?;
        self.display.write_str(TEMPERATURE_LABEL)?;
        write_field(&mut self.display, &temperature, TEMPERATURE_FIELD_WIDTH + 1)?;
        Ok(())
    }

    /// Completed cycles
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn display(&self) -> &L {
        &self.display
    }

    pub fn release(self) -> (S, L) {
        (self.sensor, self.display)
    }
}

/// Write `text`, then pad with spaces up to `width`
fn write_field<L: DisplayPort>(display: &mut L, text: &str, width: usize) -> Result<(), DisplayError> {
    display.write_str(text)?;
    for _ in text.len()..width {
        display.write_byte(b' ')?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sim::BufferDisplay;
    use crate::domain::Measurement;

    /// Sensor that replays scripted raw pairs
    struct ScriptedSensor {
        samples: heapless::Deque<(u16, u16), 4>,
        pending: Option<u16>,
    }

    impl ScriptedSensor {
        fn new(samples: &[(u16, u16)]) -> Self {
            let mut queue = heapless::Deque::new();
            for &sample in samples {
                queue.push_back(sample).unwrap();
            }
            Self {
                samples: queue,
                pending: None,
            }
        }
    }

    impl ClimateSensorPort for ScriptedSensor {
        fn read_raw(&mut self, measurement: Measurement) -> Result<u16, SensorError> {
            match measurement {
                Measurement::Humidity => {
                    let (humidity, temperature) = self
                        .samples
                        .pop_front()
                        .ok_or(SensorError::Bus(crate::ports::BusError::Timeout(
                            crate::ports::Phase::Start,
                        )))?;
                    self.pending = Some(temperature);
                    Ok(humidity)
                }
                Measurement::Temperature => Ok(self.pending.take().unwrap_or(0)),
            }
        }
    }

    /// Display that refuses every write
    struct BrokenDisplay;

    impl DisplayPort for BrokenDisplay {
        fn set_line(&mut self, _line: DisplayLine) -> Result<(), DisplayError> {
            Ok(())
        }

        fn write_byte(&mut self, _byte: u8) -> Result<(), DisplayError> {
            Err(DisplayError::WriteFailed)
        }
    }

    #[test]
    fn test_run_once_renders_both_lines() {
        let mut monitor = ClimateMonitor::new(
            ScriptedSensor::new(&[(8192, 0)]),
            BufferDisplay::new(),
        );
        let reading = monitor.run_once().unwrap();
        assert_eq!(reading.humidity_percent, 56);
        assert_eq!(monitor.display().line(DisplayLine::First), "HUMIDITY:56% ");
        assert_eq!(monitor.display().line(DisplayLine::Second), "TEMPERATURE:-46.8C");
        assert_eq!(monitor.cycles(), 1);
    }

    #[test]
    fn test_shorter_value_overwrites_longer() {
        let mut monitor = ClimateMonitor::new(
            ScriptedSensor::new(&[(16383, 16383), (0, 8192)]),
            BufferDisplay::new(),
        );
        monitor.run_once().unwrap();
        assert_eq!(monitor.display().line(DisplayLine::First), "HUMIDITY:118%");
        monitor.run_once().unwrap();
        assert_eq!(monitor.display().line(DisplayLine::First), "HUMIDITY:-6% ");
        assert_eq!(monitor.display().line(DisplayLine::Second), "TEMPERATURE:41.01C");
    }

    #[test]
    fn test_run_stops_on_sensor_error() {
        let mut monitor = ClimateMonitor::new(
            ScriptedSensor::new(&[(1000, 1000), (2000, 2000)]),
            BufferDisplay::new(),
        );
        let err = monitor.run().unwrap_err();
        assert!(matches!(err, MonitorError::Sensor(_)));
        assert_eq!(monitor.cycles(), 2);
    }

    #[test]
    fn test_display_error_is_reported() {
        let mut monitor = ClimateMonitor::new(ScriptedSensor::new(&[(0, 0)]), BrokenDisplay);
        assert_eq!(
            monitor.run_once(),
            Err(MonitorError::Display(DisplayError::WriteFailed))
        );
        assert_eq!(monitor.cycles(), 0);
    }
}
