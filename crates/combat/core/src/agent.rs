//! Agent identity and per-agent combat state.
//!
//! An [`Agent`] is a hostile unit (regular enemy or boss) tracked by the
//! [`AgentRegistry`](crate::registry::AgentRegistry). Handles are
//! generation-checked so a held [`AgentId`] goes stale, rather than dangling,
//! once the agent is swept after its death grace window.

use arrayvec::ArrayVec;
use glam::Vec3;

use crate::boss::BossState;
use crate::catalog::AbilityId;
use crate::config::CombatConfig;
use crate::tactics::{Directive, GroupId};

/// Generation-checked handle into the agent arena.
///
/// Two ids with the same index but different generations refer to different
/// agent lifetimes; resolving a stale id yields `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AgentId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl AgentId {
    /// Arena slot index. Exposed for diagnostics only.
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// Behavior states of the per-agent finite state machine.
///
/// `Dead` is absorbing: no transition leaves it.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BehaviorState {
    Idle,
    Patrol,
    Alert,
    Chase,
    Attack,
    Flee,
    Dead,
}

/// Disposition biasing state transitions and movement execution.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Personality {
    /// Closes straight on the target.
    Aggressive,
    /// Keeps an oscillating stand-off band around the target.
    Defensive,
    /// Approaches via a flanking point instead of head-on.
    Tactical,
    /// Breaks off and flees once badly hurt.
    Cowardly,
}

/// Where a damage event came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DamageSource {
    Player,
    Environment,
    Agent(AgentId),
}

/// One recorded hit against an agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageEvent {
    pub amount: f32,
    pub at: f64,
    pub source: DamageSource,
}

/// Short-term perception and damage memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentMemory {
    /// Last position the player was seen at, if ever.
    pub last_seen: Option<Vec3>,
    /// Sim-clock timestamp of the last sighting.
    pub seen_at: f64,
    /// Ring of the most recent hits taken.
    pub recent_damage: ArrayVec<DamageEvent, { CombatConfig::MAX_RECENT_DAMAGE }>,
}

impl AgentMemory {
    /// Note a player sighting.
    pub fn note_seen(&mut self, pos: Vec3, now: f64) {
        self.last_seen = Some(pos);
        self.seen_at = now;
    }

    /// Record a hit, evicting the oldest entry when the ring is full.
    pub fn note_damage(&mut self, event: DamageEvent) {
        if self.recent_damage.is_full() {
            self.recent_damage.remove(0);
        }
        self.recent_damage.push(event);
    }

    /// True if any hit landed within `window` seconds before `now`.
    pub fn recently_hurt(&self, now: f64, window: f64) -> bool {
        self.recent_damage
            .iter()
            .any(|event| now - event.at <= window)
    }
}

/// A live hostile unit.
///
/// Stats are computed once at spawn from the catalog template, the level
/// scaling formulas, and (exactly once) an optional elite modifier. After
/// spawn the registry, the FSM, the tactics coordinator, and the boss phase
/// controller are the only writers.
#[derive(Clone, Debug)]
pub struct Agent {
    pub id: AgentId,
    /// Catalog kind this agent was spawned from.
    pub kind: &'static str,
    pub level: u32,
    pub pos: Vec3,

    pub health: f32,
    pub max_health: f32,
    pub attack: f32,
    pub defense: f32,
    pub move_speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,

    pub state: BehaviorState,
    pub personality: Personality,
    pub abilities: ArrayVec<AbilityId, { CombatConfig::MAX_ABILITIES }>,
    /// Elite modifier applied at spawn, if any. Stats already include it.
    pub elite: Option<&'static str>,
    /// Calls nearby patrolling kin into the chase when engaging.
    pub pack_behavior: bool,
    /// Eligible to carry the heal-support directive.
    pub healer: bool,

    pub memory: AgentMemory,
    /// Owning group, by id. Never ownership; the group may outlive us.
    pub group: Option<GroupId>,

    /// Alert accumulation while in the alert state, 0..=100.
    pub alert: f32,
    /// Current movement target, if the agent is going somewhere.
    pub target: Option<Vec3>,
    /// Group directive for this tick, cleared before each coordination pass.
    pub directive: Option<Directive>,
    /// The agent may not re-plan its movement target before this deadline.
    pub next_decision_at: f64,
    /// The agent may not swing before this deadline.
    pub attack_ready_at: f64,
    /// Set once when health reaches zero; starts the death grace window.
    pub died_at: Option<f64>,

    /// Loot table reference handed to external reward generation on death.
    pub loot_table: &'static str,
    pub base_xp: u32,

    /// Phase-controller state; present only on bosses.
    pub boss: Option<BossState>,
}

impl Agent {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state != BehaviorState::Dead
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    /// Current health as a fraction of max, in `[0, 1]`.
    #[inline]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        self.health / self.max_health
    }

    /// Clamp health into `[0, max_health]`.
    #[inline]
    pub fn clamp_health(&mut self) {
        self.health = self.health.clamp(0.0, self.max_health);
    }

    /// Straight-line distance to a point.
    #[inline]
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.pos.distance(point)
    }
}
