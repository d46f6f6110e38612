//! Tick loop.
//!
//! Drives [`ControlCore::tick`] on an absolute-deadline [`Cadence`] until
//! the shutdown future resolves.  Shutdown is only observed while waiting
//! for the next deadline, so a tick that has started always finishes its
//! hardware writes.

use std::future::Future;

use log::{info, warn};
use tokio::time::{Instant, sleep_until};

use crate::app::ports::{EventSink, Ports, WallClock};
use crate::app::service::ControlCore;
use crate::clock::Cadence;
use crate::diagnostics::RuntimeStats;
use crate::error::Result;

/// Run the control loop until `shutdown` completes, then drive every
/// output off.  Returns the run's statistics.
pub async fn run<F>(
    core: &mut ControlCore,
    ports: &mut Ports<'_>,
    clock: &dyn WallClock,
    sink: &mut impl EventSink,
    shutdown: F,
) -> Result<RuntimeStats>
where
    F: Future<Output = ()>,
{
    core.start(&mut *ports.actuators, sink);

    let period = core.config().tick_period;
    let mut cadence = Cadence::new(Instant::now(), period);
    let mut overruns_seen = 0;
    tokio::pin!(shutdown);

    info!("Control loop running, tick period {period:?}");
    loop {
        core.tick(clock.now(), ports, sink);

        let next = cadence.complete(Instant::now());
        if cadence.overruns() > overruns_seen {
            overruns_seen = cadence.overruns();
            core.record_overrun();
            warn!(
                "tick {} overran its {:?} period, catching up",
                core.tick_count().saturating_sub(1),
                period
            );
        }

        tokio::select! {
            biased;
            () = &mut shutdown => {
                info!("Stop requested");
                break;
            }
            () = sleep_until(next) => {}
        }
    }

    core.shutdown(&mut *ports.actuators, sink)?;
    Ok(core.stats())
}
