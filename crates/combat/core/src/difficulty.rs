//! Adaptive difficulty: a feedback controller over combat telemetry.
//!
//! The host reports each combat resolution (outcome, time-to-kill, damage
//! taken); the controller keeps running counters and, once enough combats
//! have been sampled, moves the active tier one step up or down when the win
//! rate leaves the `[0.3, 0.8]` band. Tier moves are clamped at the ends of
//! the ladder.

use serde::{Deserialize, Serialize};

/// Ordered difficulty tiers, `Easy < Normal < Hard < Expert`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DifficultyTier {
    Easy,
    Normal,
    Hard,
    Expert,
}

impl DifficultyTier {
    /// One tier harder, clamped at `Expert`.
    pub fn promoted(self) -> Self {
        match self {
            Self::Easy => Self::Normal,
            Self::Normal => Self::Hard,
            Self::Hard | Self::Expert => Self::Expert,
        }
    }

    /// One tier easier, clamped at `Easy`.
    pub fn demoted(self) -> Self {
        match self {
            Self::Expert => Self::Hard,
            Self::Hard => Self::Normal,
            Self::Normal | Self::Easy => Self::Easy,
        }
    }
}

/// Parameter tuple a tier maps to, consumed by the FSM (reaction latency,
/// accuracy) and the tactics coordinator (cooperation, complexity).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub tier: DifficultyTier,
    /// How long an agent keeps its last movement decision, in milliseconds.
    pub reaction_ms: u32,
    /// Probability that a swing lands, 0..=1.
    pub accuracy: f32,
    /// Ordinal bound on how elaborate group strategy selection may get.
    pub complexity: u8,
    /// Probability ceiling for attempting any coordinated tactic per tick.
    pub cooperation: f32,
}

impl DifficultyProfile {
    /// Reaction latency in seconds, for comparison against the sim clock.
    pub fn reaction_secs(&self) -> f64 {
        f64::from(self.reaction_ms) / 1000.0
    }
}

/// Fixed per-tier profiles.
const PROFILES: [DifficultyProfile; 4] = [
    DifficultyProfile {
        tier: DifficultyTier::Easy,
        reaction_ms: 900,
        accuracy: 0.50,
        complexity: 1,
        cooperation: 0.20,
    },
    DifficultyProfile {
        tier: DifficultyTier::Normal,
        reaction_ms: 600,
        accuracy: 0.65,
        complexity: 2,
        cooperation: 0.45,
    },
    DifficultyProfile {
        tier: DifficultyTier::Hard,
        reaction_ms: 400,
        accuracy: 0.80,
        complexity: 3,
        cooperation: 0.70,
    },
    DifficultyProfile {
        tier: DifficultyTier::Expert,
        reaction_ms: 250,
        accuracy: 0.92,
        complexity: 4,
        cooperation: 0.90,
    },
];

/// Outcome of one resolved combat, as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatOutcome {
    PlayerWon,
    PlayerLost,
}

/// Win-rate thresholds for tier movement.
const PROMOTE_ABOVE: f32 = 0.8;
const DEMOTE_BELOW: f32 = 0.3;
/// Resolved combats required before the tier may move; a couple of early
/// wins would otherwise read as a 100% win rate and promote immediately.
const MIN_SAMPLES_FOR_TIER_MOVE: u32 = 10;

/// Running performance counters and the active tier.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptiveDifficulty {
    tier: DifficultyTier,
    wins: u32,
    losses: u32,
    /// Simple running average of time-to-kill, in seconds.
    avg_time_to_kill: f64,
    samples: u32,
    damage_taken: f64,
}

impl AdaptiveDifficulty {
    pub fn new(tier: DifficultyTier) -> Self {
        Self {
            tier,
            wins: 0,
            losses: 0,
            avg_time_to_kill: 0.0,
            samples: 0,
            damage_taken: 0.0,
        }
    }

    pub fn tier(&self) -> DifficultyTier {
        self.tier
    }

    /// The profile the active tier maps to.
    pub fn profile(&self) -> &'static DifficultyProfile {
        &PROFILES[self.tier as usize]
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn avg_time_to_kill(&self) -> f64 {
        self.avg_time_to_kill
    }

    pub fn damage_taken(&self) -> f64 {
        self.damage_taken
    }

    /// Wins over total resolved combats; 0 before any report.
    pub fn win_rate(&self) -> f32 {
        let total = self.wins + self.losses;
        if total == 0 {
            return 0.0;
        }
        self.wins as f32 / total as f32
    }

    /// Report one resolved combat and re-evaluate the tier.
    pub fn record_combat(&mut self, outcome: CombatOutcome, time_to_kill: f64, damage_taken: f64) {
        match outcome {
            CombatOutcome::PlayerWon => self.wins += 1,
            CombatOutcome::PlayerLost => self.losses += 1,
        }
        self.samples += 1;
        // Simple running average, deliberately not exponential.
        self.avg_time_to_kill +=
            (time_to_kill - self.avg_time_to_kill) / f64::from(self.samples);
        self.damage_taken += damage_taken;

        if self.samples < MIN_SAMPLES_FOR_TIER_MOVE {
            return;
        }
        let rate = self.win_rate();
        let next = if rate > PROMOTE_ABOVE {
            self.tier.promoted()
        } else if rate < DEMOTE_BELOW {
            self.tier.demoted()
        } else {
            self.tier
        };
        if next != self.tier {
            tracing::info!(from = %self.tier, to = %next, win_rate = rate, "difficulty tier change");
            self.tier = next;
        }
    }
}

impl Default for AdaptiveDifficulty {
    fn default() -> Self {
        Self::new(DifficultyTier::Normal)
    }
}
