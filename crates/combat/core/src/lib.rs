//! Combat-AI orchestration core.
//!
//! Decides, every simulation tick, what each hostile agent does: per-agent
//! behavior state machines, formation planning, group-level cooperative
//! tactics, boss phase escalation, and an adaptive difficulty feedback loop
//! over combat telemetry. All state mutation flows through
//! [`CombatDirector::update`]; collaborators feed it a read-only
//! [`WorldContext`] and drain [`CombatEvent`]s back out.
//!
//! Content (enemy kinds, boss phase tables, elite modifiers) comes from an
//! [`AgentCatalog`] oracle implemented outside this crate.
pub mod agent;
pub mod boss;
pub mod catalog;
pub mod config;
pub mod difficulty;
pub mod director;
pub mod error;
pub mod events;
pub mod formation;
pub mod fsm;
pub mod registry;
pub mod rng;
pub mod tactics;

pub use agent::{
    Agent, AgentId, AgentMemory, BehaviorState, DamageEvent, DamageSource, Personality,
};
pub use boss::{AttackPattern, BossState};
pub use catalog::{
    abilities, AbilityId, AbilityList, AgentCatalog, BossTemplate, EliteModifier, EnemyTemplate,
    PhaseSpec,
};
pub use config::CombatConfig;
pub use difficulty::{
    AdaptiveDifficulty, CombatOutcome, DifficultyProfile, DifficultyTier,
};
pub use director::{CombatDirector, DeathReport, DirectorState, WorldContext};
pub use error::{FormationError, GroupError};
pub use events::CombatEvent;
pub use formation::{positions, Doctrine, FormationKind, FormationParams};
pub use fsm::{PackCall, PlayerSnapshot};
pub use registry::AgentRegistry;
pub use rng::{CombatRng, PcgRng};
pub use tactics::{Directive, Group, GroupId, Strategy, TacticsCoordinator};
