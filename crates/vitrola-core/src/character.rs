//! Stage characters - the static center figure and the wandering dancers
//!
//! A wanderer cycles the frames of one sheet row on its own randomized
//! interval. Each time the cursor wraps back to the row start a repeat is
//! counted; once the row has been repeated as many times as it has frames,
//! the character re-rolls a fresh row uniformly at random and starts over.

use crate::placement::StageRect;
use crate::sprite::FrameMap;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

pub type CharacterId = u64;

/// Animation cursor of a wandering character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WanderState {
    /// Sheet row currently being played
    pub row: u32,
    /// Index into the row's valid frames
    pub cursor: usize,
    /// Completed passes over the row since the last re-roll
    pub repeats: u32,
}

impl WanderState {
    /// Fresh state on a uniformly chosen row, starting at its first frame.
    pub fn random(frames: &FrameMap, rng: &mut impl Rng) -> Self {
        let row = frames.row_ids().choose(rng).copied().unwrap_or_default();
        Self {
            row,
            cursor: 0,
            repeats: 0,
        }
    }

    /// Advance by one frame, wrapping and re-rolling per the rules above.
    pub fn step(&mut self, frames: &FrameMap, rng: &mut impl Rng) {
        let Some(row_frames) = frames.row_frames(self.row) else {
            *self = Self::random(frames, rng);
            return;
        };

        let len = row_frames.len();
        self.cursor = (self.cursor + 1) % len;
        if self.cursor == 0 {
            self.repeats += 1;
            if self.repeats as usize >= len {
                *self = Self::random(frames, rng);
            }
        }
    }

    pub fn current_frame(&self, frames: &FrameMap) -> Option<u32> {
        frames.row_frames(self.row)?.get(self.cursor).copied()
    }
}

#[derive(Debug, Clone)]
pub enum CharacterKind {
    /// Static figure pinned to the stage center, never animated
    Center { frame: u32 },
    /// Randomly placed dancer
    Wanderer(WanderState),
}

/// One on-stage character with its placement box and animation clock.
#[derive(Debug, Clone)]
pub struct Character {
    pub id: CharacterId,
    pub bounds: StageRect,
    kind: CharacterKind,
    frame_interval: Duration,
    next_step_at: Instant,
}

impl Character {
    pub fn center(id: CharacterId, bounds: StageRect, frame: u32, now: Instant) -> Self {
        Self {
            id,
            bounds,
            kind: CharacterKind::Center { frame },
            frame_interval: Duration::ZERO,
            next_step_at: now,
        }
    }

    pub fn wanderer(
        id: CharacterId,
        bounds: StageRect,
        frames: &FrameMap,
        frame_interval: Duration,
        now: Instant,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            id,
            bounds,
            kind: CharacterKind::Wanderer(WanderState::random(frames, rng)),
            frame_interval,
            next_step_at: now + frame_interval,
        }
    }

    /// Uniform draw from the configured interval range.
    pub fn random_interval(range: (Duration, Duration), rng: &mut impl Rng) -> Duration {
        let (min, max) = range;
        if max <= min {
            return min;
        }
        let span_ms = (max - min).as_millis() as u64;
        min + Duration::from_millis(rng.gen_range(0..=span_ms))
    }

    pub fn is_center(&self) -> bool {
        matches!(self.kind, CharacterKind::Center { .. })
    }

    /// The sheet frame to draw right now.
    pub fn current_frame(&self, frames: &FrameMap) -> Option<u32> {
        match &self.kind {
            CharacterKind::Center { frame } => Some(*frame),
            CharacterKind::Wanderer(state) => state.current_frame(frames),
        }
    }

    /// Advance the animation if this character's interval has elapsed.
    /// Center characters never advance.
    pub fn poll(&mut self, now: Instant, frames: &FrameMap, rng: &mut impl Rng) -> bool {
        let CharacterKind::Wanderer(state) = &mut self.kind else {
            return false;
        };
        if now < self.next_step_at {
            return false;
        }

        state.step(frames, rng);
        self.next_step_at = now + self.frame_interval;
        true
    }
}
