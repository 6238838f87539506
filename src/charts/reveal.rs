//! Two-phase entrance animation.
//!
//! When a chart receives data with a new fingerprint it resets to `Idle`,
//! switches to `Primary` after [`PRIMARY_DELAY`] and to `Secondary` at
//! [`SECONDARY_DELAY`]. Both transitions run on one spawned task, so the
//! primary phase always commits first. Observing the same fingerprint again
//! is a no-op; a different fingerprint or dropping the controller aborts the
//! pending transitions.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::util::fingerprint;

pub const PRIMARY_DELAY: Duration = Duration::from_millis(50);
pub const SECONDARY_DELAY: Duration = Duration::from_millis(700);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealPhase {
    #[default]
    Idle,
    Primary,
    Secondary,
}

pub struct RevealController {
    fingerprint: Option<String>,
    phase: Arc<watch::Sender<RevealPhase>>,
    task: Option<JoinHandle<()>>,
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealController {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RevealPhase::Idle);
        Self {
            fingerprint: None,
            phase: Arc::new(tx),
            task: None,
        }
    }

    pub fn phase(&self) -> RevealPhase {
        *self.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<RevealPhase> {
        self.phase.subscribe()
    }

    /// Start the reveal for `series` unless it is already running or done
    /// for the same content. Returns whether a new cycle was started.
    pub fn observe<T: Serialize + ?Sized>(&mut self, series: &T) -> bool {
        self.start(fingerprint(series))
    }

    pub fn start(&mut self, key: String) -> bool {
        if self.fingerprint.as_deref() == Some(key.as_str()) {
            return false;
        }

        self.cancel();
        self.fingerprint = Some(key);
        self.phase.send_replace(RevealPhase::Idle);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let phase = Arc::clone(&self.phase);
                self.task = Some(handle.spawn(async move {
                    tokio::time::sleep(PRIMARY_DELAY).await;
                    phase.send_replace(RevealPhase::Primary);
                    tokio::time::sleep(SECONDARY_DELAY.saturating_sub(PRIMARY_DELAY)).await;
                    phase.send_replace(RevealPhase::Secondary);
                }));
            }
            Err(_) => {
                // No timer available; show the final frame.
                log::debug!("Reveal without a runtime, skipping to the final phase");
                self.phase.send_replace(RevealPhase::Secondary);
            }
        }
        true
    }

    /// Abort pending transitions, keeping the current phase.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for RevealController {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DivisionMetric;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn test_phases_advance_in_order() {
        let mut reveal = RevealController::new();
        assert!(reveal.observe(&vec![DivisionMetric::new("FANS", 1)]));
        assert_eq!(reveal.phase(), RevealPhase::Idle);

        tokio::time::sleep(ms(60)).await;
        assert_eq!(reveal.phase(), RevealPhase::Primary);

        tokio::time::sleep(ms(600)).await;
        assert_eq!(reveal.phase(), RevealPhase::Primary);

        tokio::time::sleep(ms(60)).await;
        assert_eq!(reveal.phase(), RevealPhase::Secondary);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_fingerprint_runs_one_cycle() {
        let rows = vec![DivisionMetric::new("FANS", 1)];
        let mut reveal = RevealController::new();
        assert!(reveal.observe(&rows));

        tokio::time::sleep(ms(100)).await;
        assert_eq!(reveal.phase(), RevealPhase::Primary);
        assert!(!reveal.observe(&rows.clone()));

        // A restart at 100ms would still be in Primary here.
        tokio::time::sleep(ms(610)).await;
        assert_eq!(reveal.phase(), RevealPhase::Secondary);

        assert!(!reveal.observe(&rows));
        assert_eq!(reveal.phase(), RevealPhase::Secondary);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_data_cancels_pending_transition() {
        let mut reveal = RevealController::new();
        reveal.observe(&vec![DivisionMetric::new("FANS", 1)]);

        tokio::time::sleep(ms(20)).await;
        assert!(reveal.observe(&vec![DivisionMetric::new("FANS", 2)]));

        // The first cycle would have fired at 50ms.
        tokio::time::sleep(ms(40)).await;
        assert_eq!(reveal.phase(), RevealPhase::Idle);

        tokio::time::sleep(ms(20)).await;
        assert_eq!(reveal.phase(), RevealPhase::Primary);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_data_after_reveal_resets_to_idle() {
        let mut reveal = RevealController::new();
        reveal.observe(&vec![DivisionMetric::new("A", 1)]);
        tokio::time::sleep(ms(800)).await;
        assert_eq!(reveal.phase(), RevealPhase::Secondary);

        reveal.observe(&vec![DivisionMetric::new("B", 1)]);
        assert_eq!(reveal.phase(), RevealPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_transitions() {
        let mut reveal = RevealController::new();
        let rx = reveal.subscribe();
        reveal.observe(&vec![DivisionMetric::new("FANS", 1)]);
        drop(reveal);

        tokio::time::sleep(ms(1000)).await;
        assert_eq!(*rx.borrow(), RevealPhase::Idle);
    }

    #[test]
    fn test_without_runtime_jumps_to_final_phase() {
        let mut reveal = RevealController::new();
        assert!(reveal.observe(&vec![DivisionMetric::new("FANS", 1)]));
        assert_eq!(reveal.phase(), RevealPhase::Secondary);
        assert!(!reveal.observe(&vec![DivisionMetric::new("FANS", 1)]));
    }
}
