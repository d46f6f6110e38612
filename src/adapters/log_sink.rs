//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each [`AppEvent`] as one structured
//! line through the `log` facade (the binary routes it to stderr via
//! `tracing-subscriber`).  A dashboard or MQTT adapter would implement the
//! same trait.

use log::{error, info, warn};

use crate::app::context::ActuatorState;
use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::scheduler::WindowAdjustment;

const TIME_FORMAT: &str = "%H:%M:%S";

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started {
                state,
                window,
                fan_on_secs,
                fan_period_secs,
            } => {
                info!(
                    "START | {} | day {}..{} ({}h/{}h) | fan {:.2}s/{:.2}s",
                    relays(state),
                    window.day_start.format(TIME_FORMAT),
                    window.night_start.format(TIME_FORMAT),
                    window.day_hours,
                    window.night_hours,
                    fan_on_secs,
                    fan_period_secs,
                );
            }
            AppEvent::Telemetry(r) => {
                info!(
                    "TELEM | {} | T={:.2}\u{00b0}C RH={:.2}% | {}",
                    r.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    r.temperature_c,
                    r.humidity_pct,
                    relays(&ActuatorState {
                        heater: r.heater,
                        humidifier: r.humidifier,
                        light: r.light,
                        fan: r.fan,
                    }),
                );
            }
            AppEvent::ActuatorsChanged { from, to } => {
                info!("STATE | {} -> {}", relays(from), relays(to));
            }
            AppEvent::WindowAdjusted(adj) => match adj {
                WindowAdjustment::NightStartMoved { from, to } => {
                    info!(
                        "WINDOW | night start {} -> {}",
                        from.format(TIME_FORMAT),
                        to.format(TIME_FORMAT)
                    );
                }
                WindowAdjustment::DayStartMoved { from, to } => {
                    info!(
                        "WINDOW | day start {} -> {}",
                        from.format(TIME_FORMAT),
                        to.format(TIME_FORMAT)
                    );
                }
            },
            AppEvent::PictureCaptured(path) => {
                info!("PICTURE | {}", path.display());
            }
            AppEvent::Fault { tick, error } => {
                if error.is_fatal() {
                    error!("FAULT | tick={} kind={} | {}", tick, error.kind(), error);
                } else {
                    warn!("FAULT | tick={} kind={} | {}", tick, error.kind(), error);
                }
            }
            AppEvent::Stopped(s) => {
                info!(
                    "STOP | ticks={} polls={} records={} pictures={} adjustments={} overruns={} | \
                     failures: sensor={} actuator={} log={} camera={}",
                    s.ticks,
                    s.polls,
                    s.records_written,
                    s.pictures_taken,
                    s.window_adjustments,
                    s.overruns,
                    s.sensor_failures,
                    s.actuator_failures,
                    s.record_failures,
                    s.picture_failures,
                );
            }
        }
    }
}

/// `H=1 U=0 L=1 F=0`
fn relays(s: &ActuatorState) -> String {
    format!(
        "H={} U={} L={} F={}",
        u8::from(s.heater),
        u8::from(s.humidifier),
        u8::from(s.light),
        u8::from(s.fan)
    )
}
