//! Outward-facing combat events.
//!
//! The core does not resolve player-side combat; it emits events that
//! external collaborators (combat resolution, VFX, telemetry) drain from the
//! director once per tick.

use crate::agent::AgentId;
use crate::catalog::AbilityId;

/// Something observable that happened during a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CombatEvent {
    /// A regular agent's swing connected with the player.
    PlayerHit { agent: AgentId, amount: f32 },
    /// A boss cast an ability from its active phase set.
    AbilityCast {
        agent: AgentId,
        ability: AbilityId,
        damage: f32,
    },
    /// A boss crossed a phase threshold.
    BossPhase { agent: AgentId, phase: usize },
    /// A boss's one-shot soft enrage fired.
    BossEnraged { agent: AgentId },
}
