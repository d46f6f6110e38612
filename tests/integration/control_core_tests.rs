//! Integration tests for the ControlCore → ports pipeline.
//!
//! Drive whole ticks through mock adapters and check what reached the
//! relays, the data log, the camera and the event sink.

use chamberctl::app::context::ActuatorState;
use chamberctl::app::events::AppEvent;
use chamberctl::app::service::ControlCore;
use chamberctl::config::SystemConfig;
use chamberctl::control::hysteresis::Bounds;
use chamberctl::error::ErrorKind;
use chamberctl::scheduler::WindowAdjustment;
use chrono::NaiveTime;

use crate::mock_hw::{MockSensor, Rig, at};

/// Poll every tick, no camera.
fn every_tick_config() -> SystemConfig {
    let mut c = SystemConfig::default();
    c.sensor_poll_interval_secs = 1;
    c.picture_interval_secs = None;
    c
}

fn core_with(c: &SystemConfig) -> ControlCore {
    ControlCore::new(c.validate().unwrap())
}

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

// ── Hysteresis through the core ───────────────────────────────

#[test]
fn heater_follows_temperature_band() {
    let mut core = core_with(&every_tick_config());
    let mut rig = Rig::new(
        MockSensor::steady(24.0, 72.0)
            .then(21.0, 72.0)
            .then(23.0, 72.0)
            .then(26.0, 72.0)
            .then(24.0, 72.0),
    );

    let heater: Vec<bool> = rig
        .run(&mut core, 4, at(12, 0, 0))
        .iter()
        .map(|r| r.state.heater)
        .collect();
    assert_eq!(heater, vec![true, true, false, false]);
}

#[test]
fn humidifier_follows_humidity_band() {
    let mut core = core_with(&every_tick_config());
    let mut rig = Rig::new(
        MockSensor::steady(23.0, 72.0)
            .then(23.0, 69.0)
            .then(23.0, 74.0)
            .then(23.0, 76.0)
            .then(23.0, 71.0),
    );

    let humidifier: Vec<bool> = rig
        .run(&mut core, 4, at(12, 0, 0))
        .iter()
        .map(|r| r.state.humidifier)
        .collect();
    assert_eq!(humidifier, vec![true, true, false, false]);
}

#[test]
fn degenerate_band_acts_as_threshold() {
    let mut c = every_tick_config();
    c.temperature_bounds = Bounds::new(23.0, 23.0);
    let mut core = core_with(&c);
    let mut rig = Rig::new(
        MockSensor::steady(23.0, 72.0)
            .then(22.9, 72.0)
            .then(23.0, 72.0)
            .then(23.1, 72.0),
    );
    let heater: Vec<bool> = rig
        .run(&mut core, 3, at(12, 0, 0))
        .iter()
        .map(|r| r.state.heater)
        .collect();
    assert_eq!(heater, vec![true, true, false]);
}

// ── Sensor failures ───────────────────────────────────────────

#[test]
fn sensor_failure_keeps_previous_outputs_and_skips_the_record() {
    let mut core = core_with(&every_tick_config());
    let mut rig = Rig::new(
        MockSensor::steady(23.0, 72.0)
            .then(20.0, 60.0)
            .then_fail()
            .then(23.0, 72.0),
    );

    let first = rig.tick(&mut core, at(12, 0, 0));
    assert!(first.state.heater && first.state.humidifier);

    let failed = rig.tick(&mut core, at(12, 0, 1));
    assert!(failed.state.heater, "heater holds through a failed read");
    assert!(failed.state.humidifier);
    assert!(failed.measurement.is_none());
    assert!(!failed.logged);
    assert_eq!(failed.errors.len(), 1);
    assert_eq!(failed.errors[0].kind(), ErrorKind::SensorUnavailable);

    // In-band reading keeps them on; the loop carries on normally.
    let recovered = rig.tick(&mut core, at(12, 0, 2));
    assert!(recovered.logged);
    assert!(recovered.state.heater);

    assert_eq!(rig.log.records.len(), 2);
    assert_eq!(rig.sink.faults(), vec![ErrorKind::SensorUnavailable]);
    assert_eq!(core.stats().sensor_failures, 1);
    assert_eq!(core.tick_count(), 3);
}

#[test]
fn non_finite_reading_is_a_sensor_failure() {
    let mut core = core_with(&every_tick_config());
    let mut rig = Rig::new(
        MockSensor::steady(23.0, 72.0)
            .then(20.0, 60.0)
            .then(f64::NAN, 72.0)
            .then(23.0, f64::INFINITY),
    );

    rig.tick(&mut core, at(12, 0, 0));
    let reports = rig.run(&mut core, 2, at(12, 0, 1));

    for r in &reports {
        assert!(r.state.heater && r.state.humidifier);
        assert!(r.measurement.is_none());
        assert!(!r.logged);
    }
    assert_eq!(rig.log.records.len(), 1);
    assert_eq!(
        rig.sink.faults(),
        vec![ErrorKind::SensorUnavailable, ErrorKind::SensorUnavailable]
    );
    assert_eq!(core.stats().sensor_failures, 2);
}

// ── Poll interval ─────────────────────────────────────────────

#[test]
fn sensor_is_polled_and_logged_on_interval_ticks_only() {
    let mut c = SystemConfig::default();
    c.picture_interval_secs = None;
    let mut core = core_with(&c);
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));

    let reports = rig.run(&mut core, 11, at(12, 0, 0));

    let logged: Vec<u64> = reports.iter().filter(|r| r.logged).map(|r| r.tick).collect();
    assert_eq!(logged, vec![0, 5, 10]);
    assert_eq!(rig.sensor.reads, 3);
    assert_eq!(rig.log.records.len(), 3);
    // Relays are written every tick regardless.
    assert_eq!(rig.relays.applied.len(), 11);
}

#[test]
fn log_record_carries_the_state_pushed_that_tick() {
    let mut core = core_with(&every_tick_config());
    let mut rig = Rig::new(MockSensor::steady(21.0, 80.0));

    let report = rig.tick(&mut core, at(7, 0, 0));
    let record = rig.log.records[0];
    assert!(record.heater);
    assert!(!record.humidifier);
    assert!(record.light, "07:00 is day");
    assert!(record.fan, "tick 0 opens the fan's on-span");
    assert!((record.temperature_c - 21.0).abs() < f64::EPSILON);
    assert_eq!(report.state.light, record.light);
}

// ── Recoverable collaborator failures ─────────────────────────

#[test]
fn actuator_failure_is_reported_and_retried_next_tick() {
    let mut core = core_with(&every_tick_config());
    let mut rig = Rig::new(MockSensor::steady(20.0, 72.0));
    rig.relays.fail_next = 1;

    let failed = rig.tick(&mut core, at(12, 0, 0));
    assert_eq!(failed.errors[0].kind(), ErrorKind::ActuatorWrite);
    assert!(failed.logged, "a relay fault does not block the data log");
    assert!(rig.relays.applied.is_empty());

    rig.tick(&mut core, at(12, 0, 1));
    assert_eq!(rig.relays.applied.len(), 1);
    assert!(rig.relays.last().unwrap().heater);
    assert_eq!(core.stats().actuator_failures, 1);
}

#[test]
fn log_and_capture_failures_do_not_stop_the_loop() {
    let mut c = every_tick_config();
    c.picture_interval_secs = Some(2);
    let mut core = core_with(&c);
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));
    rig.log.fail = true;
    rig.camera.fail = true;

    let reports = rig.run(&mut core, 4, at(12, 0, 0));

    assert_eq!(core.tick_count(), 4);
    assert!(reports.iter().all(|r| !r.logged && r.picture.is_none()));
    // 4 log failures + captures on ticks 0 and 2.
    let faults = rig.sink.faults();
    assert_eq!(faults.iter().filter(|k| **k == ErrorKind::LogWrite).count(), 4);
    assert_eq!(faults.iter().filter(|k| **k == ErrorKind::Capture).count(), 2);
    assert_eq!(rig.relays.applied.len(), 4);

    let stats = core.stats();
    assert_eq!(stats.record_failures, 4);
    assert_eq!(stats.picture_failures, 2);
    assert_eq!(stats.total_failures(), 6);
}

// ── Camera ────────────────────────────────────────────────────

#[test]
fn pictures_are_taken_on_interval_with_timestamped_names() {
    let mut core = core_with(&SystemConfig::default());
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));

    for s in 0..21 {
        rig.tick(&mut core, at(9, 30, s));
    }

    let names: Vec<String> = rig
        .camera
        .captured
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "2024-06-01_09-30-00.jpg",
            "2024-06-01_09-30-10.jpg",
            "2024-06-01_09-30-20.jpg"
        ]
    );
    assert!(rig.camera.captured[0].starts_with("/media/sdcard/Pictures"));
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::PictureCaptured(_))),
        3
    );
}

#[test]
fn disabled_camera_is_never_called() {
    let mut core = core_with(&every_tick_config());
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));
    rig.run(&mut core, 30, at(9, 0, 0));
    assert!(rig.camera.captured.is_empty());
}

// ── Fan ───────────────────────────────────────────────────────

#[test]
fn fan_runs_at_the_start_of_each_period() {
    let mut c = SystemConfig::default();
    c.picture_interval_secs = None;
    let mut core = core_with(&c);
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));

    let fan: Vec<bool> = rig
        .run(&mut core, 452, at(12, 0, 0))
        .iter()
        .map(|r| r.state.fan)
        .collect();

    assert!(fan[..=26].iter().all(|on| *on));
    assert!(fan[27..450].iter().all(|on| !*on));
    assert!(fan[450] && fan[451]);
}

// ── Light ─────────────────────────────────────────────────────

#[test]
fn light_switches_at_window_boundaries() {
    let mut core = core_with(&every_tick_config());
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));

    let light = |rig: &mut Rig, core: &mut ControlCore, h, m, s| rig.tick(core, at(h, m, s)).state.light;
    assert!(!light(&mut rig, &mut core, 5, 59, 59));
    assert!(light(&mut rig, &mut core, 6, 0, 0));
    assert!(light(&mut rig, &mut core, 21, 59, 59));
    assert!(!light(&mut rig, &mut core, 22, 0, 0));
    assert!(!light(&mut rig, &mut core, 0, 0, 0));
}

// ── Hourly drift ──────────────────────────────────────────────

/// One tick per minute so an hour is 60 ticks.
fn minute_tick_config() -> SystemConfig {
    let mut c = SystemConfig::default();
    c.tick_period_ms = 60_000;
    c.sensor_poll_interval_secs = 60;
    c.picture_interval_secs = None;
    c
}

#[test]
fn first_completed_hour_moves_night_start_during_day() {
    let mut core = core_with(&minute_tick_config());
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));

    let reports = rig.run(&mut core, 61, at(7, 0, 0));

    assert!(reports[0].window_adjustment.is_none(), "no drift at start-up");
    let adjusted: Vec<u64> = reports
        .iter()
        .filter(|r| r.window_adjustment.is_some())
        .map(|r| r.tick)
        .collect();
    assert_eq!(adjusted, vec![60]);
    assert_eq!(
        reports[60].window_adjustment,
        Some(WindowAdjustment::NightStartMoved {
            from: hm(22, 0),
            to: hm(23, 0),
        })
    );
    assert_eq!(core.window().night_start, hm(23, 0));
    assert_eq!(core.window().day_start, hm(6, 0));
    assert_eq!(core.stats().window_adjustments, 1);
}

#[test]
fn completed_hour_at_night_moves_day_start() {
    let mut core = core_with(&minute_tick_config());
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));

    rig.run(&mut core, 61, at(23, 0, 0));

    assert_eq!(core.window().day_start, hm(7, 0));
    assert_eq!(core.window().night_start, hm(22, 0));
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::WindowAdjusted(WindowAdjustment::DayStartMoved { .. }))),
        1
    );
}

#[test]
fn drift_can_be_disabled() {
    let mut c = minute_tick_config();
    c.drift_adjustment = false;
    let mut core = core_with(&c);
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));

    rig.run(&mut core, 121, at(7, 0, 0));

    assert_eq!(core.window(), c.validate().unwrap().window);
    assert_eq!(core.stats().window_adjustments, 0);
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn start_drives_everything_off_and_announces_fan_timing() {
    let mut core = core_with(&SystemConfig::default());
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));

    rig.start(&mut core);

    assert_eq!(rig.relays.applied, vec![ActuatorState::all_off()]);
    match rig.sink.events.first() {
        Some(AppEvent::Started {
            fan_on_secs,
            fan_period_secs,
            ..
        }) => {
            assert!((fan_on_secs - 26.68).abs() < 0.01);
            assert!((fan_period_secs - 450.0).abs() < f64::EPSILON);
        }
        other => panic!("expected Started, got {other:?}"),
    }
}

#[test]
fn actuator_changes_are_emitted_only_on_transitions() {
    let mut core = core_with(&every_tick_config());
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));

    // Tick 0 at noon: light and fan come on. Ticks 1..3: nothing changes.
    rig.run(&mut core, 4, at(12, 0, 0));

    let changes: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ActuatorsChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].0, ActuatorState::all_off());
    assert!(changes[0].1.light && changes[0].1.fan);
}

#[test]
fn shutdown_retries_all_off() {
    let mut core = core_with(&every_tick_config());
    let mut rig = Rig::new(MockSensor::steady(20.0, 60.0));
    rig.run(&mut core, 3, at(12, 0, 0));
    assert!(rig.relays.last().unwrap().heater);

    rig.relays.fail_next = 2;
    core.shutdown(&mut rig.relays, &mut rig.sink).unwrap();

    assert_eq!(rig.relays.last(), Some(ActuatorState::all_off()));
    assert_eq!(core.state(), ActuatorState::all_off());
    match rig.sink.events.last() {
        Some(AppEvent::Stopped(stats)) => {
            assert_eq!(stats.ticks, 3);
            assert_eq!(stats.actuator_failures, 2);
        }
        other => panic!("expected Stopped, got {other:?}"),
    }
}

#[test]
fn shutdown_gives_up_after_bounded_attempts() {
    let mut core = core_with(&every_tick_config());
    let mut rig = Rig::new(MockSensor::steady(23.0, 72.0));
    rig.relays.fail_next = 10;

    let err = core.shutdown(&mut rig.relays, &mut rig.sink).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ActuatorWrite);
    assert_eq!(rig.relays.fail_next, 7, "three attempts, then stop");
    assert!(matches!(rig.sink.events.last(), Some(AppEvent::Stopped(_))));
}
