//! Obstacle pattern state machine
//!
//! A pattern decides how successive gap centers move. The generator stays in
//! one pattern for a randomized run of spawns, then switches to a different
//! one, never chaining two hard patterns back to back.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::tuning::PatternTuning;

/// Named rule for placing gap centers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Random walk with occasional surprise jumps
    #[default]
    Standard,
    /// Consistent climb or descent, bouncing off the edges
    Staircase,
    /// Smooth sinusoid around the canvas center
    Wave,
    /// Sharp alternation above/below center
    Zigzag,
    /// Random walk with a tighter gap
    Narrow,
    /// Center, high, low, repeating
    Rhythm,
}

/// Static per-pattern properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternParams {
    /// Hard patterns may not follow each other
    pub hard: bool,
    /// Multiplier applied to the base gap, if the pattern tightens it
    pub gap_factor: Option<f32>,
    /// Whether the occasional breather gap may apply
    pub allows_breather: bool,
}

impl Pattern {
    pub const ALL: [Pattern; 6] = [
        Pattern::Standard,
        Pattern::Staircase,
        Pattern::Wave,
        Pattern::Zigzag,
        Pattern::Narrow,
        Pattern::Rhythm,
    ];

    /// Guaranteed-safe choices when random selection keeps failing
    pub const FALLBACK: [Pattern; 2] = [Pattern::Standard, Pattern::Wave];

    /// Lookup table of per-pattern properties
    pub fn params(self, narrow_factor: f32) -> PatternParams {
        match self {
            Pattern::Narrow => PatternParams {
                hard: true,
                gap_factor: Some(narrow_factor),
                allows_breather: false,
            },
            Pattern::Zigzag => PatternParams {
                hard: true,
                gap_factor: None,
                allows_breather: true,
            },
            Pattern::Standard | Pattern::Staircase | Pattern::Wave | Pattern::Rhythm => {
                PatternParams {
                    hard: false,
                    gap_factor: None,
                    allows_breather: true,
                }
            }
        }
    }

    #[inline]
    pub fn is_hard(self) -> bool {
        matches!(self, Pattern::Narrow | Pattern::Zigzag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Pattern::Standard => "standard",
            Pattern::Staircase => "staircase",
            Pattern::Wave => "wave",
            Pattern::Zigzag => "zigzag",
            Pattern::Narrow => "narrow",
            Pattern::Rhythm => "rhythm",
        }
    }
}

/// Random selection attempts before falling back to an easy pattern
pub const MAX_SWITCH_ATTEMPTS: u32 = 10;

/// Recent patterns kept in [`PatternSession::history`]
pub const HISTORY_LEN: usize = 16;

/// Pick the next pattern: never the current one, never hard after hard.
///
/// `pick` draws one candidate from the slice it is given. After
/// [`MAX_SWITCH_ATTEMPTS`] rejected draws the first fallback pattern that
/// differs from `current` is returned.
pub fn choose_next_pattern(
    current: Pattern,
    mut pick: impl FnMut(&[Pattern]) -> Pattern,
) -> Pattern {
    let candidates: Vec<Pattern> = Pattern::ALL
        .into_iter()
        .filter(|p| !(current.is_hard() && p.is_hard()))
        .collect();

    for _ in 0..MAX_SWITCH_ATTEMPTS {
        let candidate = pick(&candidates);
        let allowed = candidate != current && !(current.is_hard() && candidate.is_hard());
        if allowed {
            return candidate;
        }
    }

    log::warn!(
        "Pattern switch exhausted {} attempts from {}, falling back",
        MAX_SWITCH_ATTEMPTS,
        current.as_str()
    );
    Pattern::FALLBACK
        .into_iter()
        .find(|p| *p != current)
        .unwrap_or(Pattern::Standard)
}

/// Mutable pattern bookkeeping owned by the obstacle generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternSession {
    pub current: Pattern,
    /// Spawns since the last switch
    pub step: u32,
    /// +1 moves gaps down the screen, -1 up
    pub direction: f32,
    /// Total obstacles spawned this run
    pub obstacle_count: u32,
    /// Spawn count at which the next switch happens
    pub next_switch_at: u32,
    /// Most recent patterns entered, oldest first
    #[serde(skip)]
    pub history: VecDeque<Pattern>,
}

impl PatternSession {
    pub fn new(tuning: &PatternTuning, rng: &mut impl Rng) -> Self {
        let mut session = Self {
            current: Pattern::Standard,
            step: 0,
            direction: 1.0,
            obstacle_count: 0,
            next_switch_at: 0,
            history: VecDeque::with_capacity(HISTORY_LEN),
        };
        session.reset(tuning, rng);
        session
    }

    pub fn reset(&mut self, tuning: &PatternTuning, rng: &mut impl Rng) {
        self.current = Pattern::Standard;
        self.step = 0;
        self.direction = random_direction(rng);
        self.obstacle_count = 0;
        self.next_switch_at = roll_run(tuning, rng);
        self.history.clear();
        self.history.push_back(Pattern::Standard);
    }

    /// Switch pattern if the current run is over. Call once before each spawn.
    pub fn advance(&mut self, tuning: &PatternTuning, rng: &mut impl Rng) -> bool {
        if self.obstacle_count < self.next_switch_at {
            return false;
        }
        self.switch(rng);
        self.next_switch_at = self.obstacle_count.saturating_add(roll_run(tuning, rng));
        true
    }

    /// Force a switch to a new pattern
    pub fn switch(&mut self, rng: &mut impl Rng) {
        let next = choose_next_pattern(self.current, |candidates| {
            candidates[rng.random_range(0..candidates.len())]
        });
        log::debug!(
            "Pattern {} -> {} at obstacle {}",
            self.current.as_str(),
            next.as_str(),
            self.obstacle_count
        );
        self.current = next;
        self.step = 0;
        self.direction = random_direction(rng);
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(next);
    }

    /// Record a spawned obstacle
    pub fn record_spawn(&mut self) {
        self.obstacle_count += 1;
        self.step += 1;
    }
}

fn random_direction(rng: &mut impl Rng) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

fn roll_run(tuning: &PatternTuning, rng: &mut impl Rng) -> u32 {
    rng.random_range(tuning.min_run..=tuning.max_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_hard_flags() {
        assert!(Pattern::Narrow.is_hard());
        assert!(Pattern::Zigzag.is_hard());
        assert!(!Pattern::Wave.is_hard());
        assert_eq!(Pattern::Narrow.params(0.75).gap_factor, Some(0.75));
        assert!(!Pattern::Narrow.params(0.75).allows_breather);
        assert!(Pattern::Zigzag.params(0.75).hard);
    }

    #[test]
    fn test_switch_excludes_current() {
        let mut rng = Pcg32::seed_from_u64(7);
        for current in Pattern::ALL {
            for _ in 0..50 {
                let next = choose_next_pattern(current, |c| c[rng.random_range(0..c.len())]);
                assert_ne!(next, current);
                if current.is_hard() {
                    assert!(!next.is_hard());
                }
            }
        }
    }

    #[test]
    fn test_exhausted_retries_fall_back() {
        let mut calls = 0;
        // Always offers the current pattern back
        let next = choose_next_pattern(Pattern::Standard, |_| {
            calls += 1;
            Pattern::Standard
        });
        assert_eq!(calls, MAX_SWITCH_ATTEMPTS);
        assert_eq!(next, Pattern::Wave);

        let next = choose_next_pattern(Pattern::Wave, |_| Pattern::Wave);
        assert_eq!(next, Pattern::Standard);

        let next = choose_next_pattern(Pattern::Narrow, |_| Pattern::Zigzag);
        assert_eq!(next, Pattern::Standard);
    }

    #[test]
    fn test_switch_resets_step() {
        let tuning = PatternTuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut session = PatternSession::new(&tuning, &mut rng);
        session.record_spawn();
        session.record_spawn();
        let before = session.current;
        session.switch(&mut rng);
        assert_eq!(session.step, 0);
        assert_ne!(session.current, before);
        assert!(session.direction == 1.0 || session.direction == -1.0);
    }

    #[test]
    fn test_run_lengths_within_bounds() {
        let tuning = PatternTuning::default();
        let mut rng = Pcg32::seed_from_u64(99);
        let mut session = PatternSession::new(&tuning, &mut rng);
        let mut last_switch = 0;
        let mut switches = 0;
        for _ in 0..500 {
            if session.advance(&tuning, &mut rng) {
                switches += 1;
                let run = session.obstacle_count - last_switch;
                if last_switch > 0 {
                    assert!((tuning.min_run..=tuning.max_run).contains(&run));
                }
                last_switch = session.obstacle_count;
            }
            session.record_spawn();
        }
        assert!(switches > 50);
        assert_eq!(session.history.len(), HISTORY_LEN);
        assert_eq!(session.history.back(), Some(&session.current));
    }

    #[test]
    fn test_huge_run_length_saturates() {
        let tuning = PatternTuning {
            min_run: u32::MAX - 5,
            max_run: u32::MAX,
            ..PatternTuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let mut session = PatternSession::new(&tuning, &mut rng);
        session.obstacle_count = u32::MAX - 1;
        session.next_switch_at = 0;
        assert!(session.advance(&tuning, &mut rng));
        assert_eq!(session.next_switch_at, u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_no_consecutive_hard_patterns(seed in any::<u64>()) {
            let tuning = PatternTuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut session = PatternSession::new(&tuning, &mut rng);
            for _ in 0..300 {
                let before = session.current;
                if session.advance(&tuning, &mut rng) {
                    prop_assert_ne!(before, session.current);
                    prop_assert!(!(before.is_hard() && session.current.is_hard()));
                }
                session.record_spawn();
            }
        }
    }
}
