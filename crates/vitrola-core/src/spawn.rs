//! Spawn scheduling
//!
//! While playback runs, a new wanderer is requested roughly every
//! `base_interval`, jittered. The pending deadline is an explicit value so
//! pausing can cancel it deterministically. When placement reports a full
//! stage the controller latches and stops scheduling until the next fresh
//! session. End of media switches to a teardown chain that requests one
//! removal per `teardown_delay`.

use rand::Rng;
use std::time::{Duration, Instant};

/// Spawn cadence parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnConfig {
    pub base_interval: Duration,
    pub jitter: Duration,
    pub teardown_delay: Duration,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            base_interval: Duration::from_secs(25),
            jitter: Duration::from_secs(3),
            teardown_delay: Duration::from_millis(500),
        }
    }
}

/// What the caller should do right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnDirective {
    /// Try to place one new wanderer
    Spawn,
    /// Remove one wanderer
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Armed { due: Instant },
    TearingDown { next_due: Instant },
}

/// Deadline-based spawn/teardown scheduler. All time is passed in, so the
/// controller itself is deterministic.
#[derive(Debug, Clone)]
pub struct SpawnController {
    config: SpawnConfig,
    phase: Phase,
    full: bool,
}

impl SpawnController {
    pub fn new(config: SpawnConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            full: false,
        }
    }

    /// Schedule the next spawn. Ignored while the full latch is set or a
    /// teardown is in progress.
    pub fn arm(&mut self, now: Instant, rng: &mut impl Rng) {
        if self.full || matches!(self.phase, Phase::TearingDown { .. }) {
            return;
        }
        let due = now + self.jittered_interval(rng);
        self.phase = Phase::Armed { due };
        tracing::trace!(?due, "spawn armed");
    }

    /// Drop a pending spawn deadline, leaving the latch untouched.
    pub fn cancel_pending(&mut self) {
        if matches!(self.phase, Phase::Armed { .. }) {
            self.phase = Phase::Idle;
        }
    }

    /// Placement reported a full stage: stop scheduling until `reset`.
    pub fn mark_full(&mut self) {
        self.full = true;
        self.phase = Phase::Idle;
        tracing::debug!("stage full, spawning halted");
    }

    /// Start the staggered removal chain.
    pub fn begin_teardown(&mut self, now: Instant) {
        self.phase = Phase::TearingDown {
            next_due: now + self.config.teardown_delay,
        };
    }

    /// The removal chain ran out of characters.
    pub fn finish_teardown(&mut self) {
        if matches!(self.phase, Phase::TearingDown { .. }) {
            self.phase = Phase::Idle;
        }
    }

    /// Fresh session: cancel everything and clear the full latch.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.full = false;
    }

    /// Check deadlines. A fired spawn disarms the controller; the caller
    /// re-arms after a successful placement (or latches via `mark_full`).
    /// A fired removal reschedules itself to keep the chain going.
    pub fn poll(&mut self, now: Instant) -> Option<SpawnDirective> {
        match self.phase {
            Phase::Armed { due } if now >= due => {
                self.phase = Phase::Idle;
                Some(SpawnDirective::Spawn)
            }
            Phase::TearingDown { next_due } if now >= next_due => {
                self.phase = Phase::TearingDown {
                    next_due: next_due + self.config.teardown_delay,
                };
                Some(SpawnDirective::Remove)
            }
            _ => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.phase, Phase::Armed { .. })
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn is_tearing_down(&self) -> bool {
        matches!(self.phase, Phase::TearingDown { .. })
    }

    /// The pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.phase {
            Phase::Idle => None,
            Phase::Armed { due } => Some(due),
            Phase::TearingDown { next_due } => Some(next_due),
        }
    }

    fn jittered_interval(&self, rng: &mut impl Rng) -> Duration {
        let base = self.config.base_interval;
        let jitter = self.config.jitter;
        if jitter.is_zero() {
            return base;
        }
        let span_ms = jitter.as_millis() as u64 * 2;
        let offset = Duration::from_millis(rng.gen_range(0..=span_ms));
        base.saturating_sub(jitter) + offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quick_config() -> SpawnConfig {
        SpawnConfig {
            base_interval: Duration::from_secs(25),
            jitter: Duration::from_secs(3),
            teardown_delay: Duration::from_millis(500),
        }
    }

    #[test]
    fn test_armed_deadline_is_jittered_around_base() {
        let mut rng = StdRng::seed_from_u64(8);
        let now = Instant::now();

        for _ in 0..100 {
            let mut controller = SpawnController::new(quick_config());
            controller.arm(now, &mut rng);
            let due = controller.next_deadline().unwrap();
            assert!(due >= now + Duration::from_secs(22));
            assert!(due <= now + Duration::from_secs(28));
        }
    }

    #[test]
    fn test_spawn_fires_once_and_disarms() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Instant::now();
        let mut controller = SpawnController::new(quick_config());
        controller.arm(now, &mut rng);

        assert_eq!(controller.poll(now), None);
        let due = controller.next_deadline().unwrap();
        assert_eq!(controller.poll(due), Some(SpawnDirective::Spawn));
        assert!(!controller.is_armed());
        assert_eq!(controller.poll(due + Duration::from_secs(60)), None);
    }

    #[test]
    fn test_cancel_pending_drops_deadline() {
        let mut rng = StdRng::seed_from_u64(2);
        let now = Instant::now();
        let mut controller = SpawnController::new(quick_config());
        controller.arm(now, &mut rng);
        controller.cancel_pending();

        assert!(!controller.is_armed());
        assert_eq!(controller.poll(now + Duration::from_secs(60)), None);
    }

    #[test]
    fn test_full_latch_blocks_arming_until_reset() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = Instant::now();
        let mut controller = SpawnController::new(quick_config());

        controller.mark_full();
        controller.arm(now, &mut rng);
        assert!(!controller.is_armed());
        assert!(controller.is_full());

        controller.reset();
        assert!(!controller.is_full());
        controller.arm(now, &mut rng);
        assert!(controller.is_armed());
    }

    #[test]
    fn test_teardown_chain_reschedules() {
        let now = Instant::now();
        let mut controller = SpawnController::new(quick_config());
        controller.begin_teardown(now);

        assert!(controller.is_tearing_down());
        assert_eq!(controller.poll(now), None);

        let first = now + Duration::from_millis(500);
        assert_eq!(controller.poll(first), Some(SpawnDirective::Remove));
        assert_eq!(controller.poll(first), None);

        let second = now + Duration::from_millis(1000);
        assert_eq!(controller.poll(second), Some(SpawnDirective::Remove));

        controller.finish_teardown();
        assert!(!controller.is_tearing_down());
        assert_eq!(controller.poll(now + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_arm_is_ignored_during_teardown() {
        let mut rng = StdRng::seed_from_u64(4);
        let now = Instant::now();
        let mut controller = SpawnController::new(quick_config());
        controller.begin_teardown(now);
        controller.arm(now, &mut rng);
        assert!(controller.is_tearing_down());
    }

    #[test]
    fn test_reset_cancels_teardown_chain() {
        let now = Instant::now();
        let mut controller = SpawnController::new(quick_config());
        controller.begin_teardown(now);
        controller.reset();
        assert_eq!(controller.poll(now + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_zero_jitter_uses_base_interval() {
        let mut rng = StdRng::seed_from_u64(5);
        let now = Instant::now();
        let mut controller = SpawnController::new(SpawnConfig {
            base_interval: Duration::from_secs(10),
            jitter: Duration::ZERO,
            teardown_delay: Duration::from_millis(500),
        });
        controller.arm(now, &mut rng);
        assert_eq!(
            controller.next_deadline().unwrap(),
            now + Duration::from_secs(10)
        );
    }
}
