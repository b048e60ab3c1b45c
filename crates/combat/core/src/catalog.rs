//! Content oracle: agent templates, boss phase tables, elite modifiers.
//!
//! The core never hardcodes enemy numbers. A content crate implements
//! [`AgentCatalog`] and hands templates to the registry at spawn time; the
//! registry then applies the level scaling and elite formulas.

use arrayvec::ArrayVec;

use crate::agent::Personality;
use crate::boss::AttackPattern;
use crate::config::CombatConfig;

/// Identifier of an ability in the external ability content.
///
/// The core only carries these as opaque labels; effect resolution lives
/// with external collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct AbilityId(pub &'static str);

/// Bounded ability list used by templates and live agents.
pub type AbilityList = ArrayVec<AbilityId, { CombatConfig::MAX_ABILITIES }>;

/// Base definition of a regular enemy kind, before level scaling.
#[derive(Clone, Debug)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub base_health: f32,
    pub base_attack: f32,
    pub base_defense: f32,
    pub move_speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub personality: Personality,
    pub pack_behavior: bool,
    pub healer: bool,
    pub abilities: AbilityList,
    pub loot_table: &'static str,
    pub base_xp: u32,
}

/// One entry of a boss phase table.
///
/// Tables are ordered by descending health-ratio threshold and the first
/// entry always carries `threshold == 1.0`. Multipliers are applied on phase
/// entry and deliberately compound across phases.
#[derive(Clone, Debug)]
pub struct PhaseSpec {
    /// Health ratio at or below which this phase is active.
    pub threshold: f32,
    pub abilities: AbilityList,
    pub speed_mult: f32,
    pub damage_mult: f32,
    /// Whether the boss takes to the air for this phase.
    pub airborne: bool,
    pub pattern: AttackPattern,
}

/// Base definition of a boss kind.
#[derive(Clone, Debug)]
pub struct BossTemplate {
    pub name: &'static str,
    pub base_health: f32,
    pub base_attack: f32,
    pub base_defense: f32,
    pub move_speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub phases: ArrayVec<PhaseSpec, { CombatConfig::MAX_PHASES }>,
    /// Seconds after spawn at which the one-shot soft enrage fires.
    pub enrage_secs: f64,
    pub loot_table: &'static str,
    pub base_xp: u32,
}

/// A named stat-multiplier and ability bundle applied once at spawn.
#[derive(Clone, Debug)]
pub struct EliteModifier {
    pub name: &'static str,
    pub health_mult: f32,
    pub attack_mult: f32,
    pub defense_mult: f32,
    pub speed_mult: f32,
    pub extra_abilities: ArrayVec<AbilityId, { CombatConfig::MAX_ELITE_ABILITIES }>,
}

/// Oracle providing agent content by kind name.
///
/// Lookups return `None` for unknown names; the registry decides the
/// fallback policy (see `AgentRegistry::spawn_enemy`).
pub trait AgentCatalog: Send + Sync {
    /// Template for a regular enemy kind.
    fn enemy(&self, kind: &str) -> Option<EnemyTemplate>;

    /// Template for a boss kind.
    fn boss(&self, kind: &str) -> Option<BossTemplate>;

    /// Elite modifier bundle by name.
    fn elite(&self, name: &str) -> Option<EliteModifier>;

    /// Fallback enemy template substituted for unknown kinds.
    fn default_enemy(&self) -> EnemyTemplate;

    /// Fallback boss template substituted for unknown kinds.
    fn default_boss(&self) -> BossTemplate;
}

/// Build a bounded ability list from static names.
///
/// Names beyond the capacity are dropped; content tables stay within it.
pub fn abilities(names: &[&'static str]) -> AbilityList {
    names.iter().take(CombatConfig::MAX_ABILITIES).map(|n| AbilityId(n)).collect()
}
