//! End-to-end runs of the monitor over the simulated MSSP

use embedded_hal_mock::eh1::delay::NoopDelay;
use float_cmp::approx_eq;

use pic::adapters::sim::BusEvent;
use pic::ports::{DisplayLine, Phase, SpinLimit};
use pic::{
    BufferDisplay, BusError, ClimateMonitor, ClimateSensorPort, Htu21dSensor, MonitorError,
    MsspConfig, MsspMaster, SensorError, SimulatedMssp,
};

#[test]
fn test_monitor_cycle_over_simulated_bus() {
    let mut sim = SimulatedMssp::new()
        .with_busy_polls(3)
        .with_slave_address(0x40)
        .with_htu21d(8192, 6000);

    let mut master = MsspMaster::new(&mut sim, MsspConfig::default());
    master.init().unwrap();
    let sensor = Htu21dSensor::new(master, NoopDelay::new());
    let mut monitor = ClimateMonitor::new(sensor, BufferDisplay::new());

    for _ in 0..3 {
        let reading = monitor.run_once().unwrap();
        assert_eq!(reading.humidity_percent, 56);
        assert!(approx_eq!(f32, reading.temperature_c, 17.50, epsilon = 0.01));
    }
    assert_eq!(monitor.cycles(), 3);
    assert_eq!(monitor.display().line(DisplayLine::First), "HUMIDITY:56% ");
    assert_eq!(monitor.display().line(DisplayLine::Second), "TEMPERATURE:17.50C");
    assert_eq!(monitor.sensor().last_raw(pic::Measurement::Temperature), Some(6000));

    drop(monitor);
    assert!(!sim.overlapped());
    assert_eq!(sim.events().len(), 3 * 20);
    let starts = sim
        .events()
        .iter()
        .filter(|e| matches!(e, BusEvent::Start))
        .count();
    let stops = sim
        .events()
        .iter()
        .filter(|e| matches!(e, BusEvent::Stop))
        .count();
    assert_eq!(starts, 6);
    assert_eq!(stops, 6);
}

#[test]
fn test_monitor_reports_stalled_bus() {
    let mut sim = SimulatedMssp::new().stuck();
    let master = MsspMaster::with_budget(&mut sim, MsspConfig::default(), SpinLimit::new(16));
    let mut monitor = ClimateMonitor::new(
        Htu21dSensor::new(master, NoopDelay::new()),
        BufferDisplay::new(),
    );

    let err = monitor.run().unwrap_err();
    assert_eq!(
        err,
        MonitorError::Sensor(SensorError::Bus(BusError::Timeout(Phase::Start)))
    );
    assert_eq!(monitor.cycles(), 0);
    assert_eq!(monitor.display().line(DisplayLine::First), "");
}
