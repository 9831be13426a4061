use crate::service::{Arbiter, ArbiterError, Repository};
use crate::session::{Outcome, Rejection, SessionId, Status};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, instrument};

/// Drives the clocks of a session in real time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ClockDriver {
    period: Duration,
}

impl ClockDriver {
    /// A driver that ticks once every `period`.
    pub fn new(period: Duration) -> Self {
        ClockDriver { period }
    }

    /// Ticks the session until its match finishes.
    ///
    /// The driver idles while the session is waiting or before the first move is played.
    #[instrument(level = "debug", skip(self, arbiter), err)]
    pub async fn drive<R: Repository>(
        &self,
        arbiter: &Arbiter<R>,
        id: SessionId,
    ) -> Result<Outcome, ArbiterError> {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match arbiter.tick(id).await {
                Ok(t) => {
                    if let Some(outcome) = t.session.outcome() {
                        return Ok(outcome);
                    }
                }

                Err(ArbiterError::Rejected(Rejection::ClockIdle))
                | Err(ArbiterError::Rejected(Rejection::Unavailable(Status::Waiting))) => {
                    debug!(session = %id, "clock idle");
                }

                Err(ArbiterError::Rejected(Rejection::Unavailable(Status::Finished))) => {
                    let session = arbiter.repository().fetch(id).await?;
                    if let Some(outcome) = session.outcome() {
                        return Ok(outcome);
                    }
                }

                Err(e) => return Err(e),
            }
        }
    }
}
