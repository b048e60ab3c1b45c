//! Top-level combat director: one synchronous pass per simulation tick.
//!
//! The director owns the registry, the tactics coordinator, the adaptive
//! difficulty controller, and the sim clock. `update` runs the whole pass
//! in a fixed order: group tactics (registration order) first, then the
//! per-agent FSM in arena order, then deferred pack-call promotions, then
//! the boss phase controllers, then the death-grace sweep. Nothing blocks
//! or yields mid-tick, and nothing in here propagates a fatal error to the
//! host loop.

use std::sync::Arc;

use glam::Vec3;

use crate::agent::{Agent, AgentId, BehaviorState, DamageEvent, DamageSource};
use crate::catalog::AgentCatalog;
use crate::config::CombatConfig;
use crate::difficulty::{AdaptiveDifficulty, CombatOutcome, DifficultyTier};
use crate::error::GroupError;
use crate::events::CombatEvent;
use crate::formation::{FormationKind, FormationParams};
use crate::fsm::{self, FsmCtx, PackCall, PlayerSnapshot};
use crate::registry::AgentRegistry;
use crate::rng::CombatRng;
use crate::tactics::{Group, GroupId, TacticsCoordinator};

/// Read-only world inputs for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldContext {
    pub player: PlayerSnapshot,
}

/// Per-level XP growth applied to a template's base XP.
const XP_LEVEL_GROWTH: f32 = 0.10;
/// XP factor for elite variants.
const XP_ELITE_MULT: f32 = 1.5;
/// XP factor for bosses.
const XP_BOSS_MULT: f32 = 5.0;

/// Final state handed to external reward generation when an agent dies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeathReport {
    pub agent: AgentId,
    pub loot_table: &'static str,
    pub xp: u32,
}

/// Telemetry snapshot for UI and persistence collaborators.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DirectorState {
    pub tier: DifficultyTier,
    pub active_groups: usize,
    pub live_agents: usize,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f32,
    pub avg_time_to_kill: f64,
    pub damage_taken: f64,
}

/// Owner and driver of the combat core.
pub struct CombatDirector {
    config: CombatConfig,
    catalog: Arc<dyn AgentCatalog>,
    registry: AgentRegistry,
    tactics: TacticsCoordinator,
    difficulty: AdaptiveDifficulty,
    rng: Box<dyn CombatRng>,
    now: f64,
    events: Vec<CombatEvent>,
}

impl CombatDirector {
    pub fn new(
        catalog: Arc<dyn AgentCatalog>,
        config: CombatConfig,
        rng: Box<dyn CombatRng>,
    ) -> Self {
        Self {
            config,
            catalog,
            registry: AgentRegistry::new(),
            tactics: TacticsCoordinator::new(),
            difficulty: AdaptiveDifficulty::default(),
            rng,
            now: 0.0,
            events: Vec::new(),
        }
    }

    /// Current sim-clock time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.tactics.group(id)
    }

    /// Spawn a regular enemy at the current sim time.
    pub fn spawn_enemy(
        &mut self,
        kind: &str,
        pos: Vec3,
        level: u32,
        elite: Option<&str>,
    ) -> AgentId {
        self.registry
            .spawn_enemy(&*self.catalog, kind, pos, level, elite, self.now)
    }

    /// Spawn a boss at the current sim time.
    pub fn spawn_boss(&mut self, kind: &str, pos: Vec3, level: u32) -> AgentId {
        self.registry
            .spawn_boss(&*self.catalog, kind, pos, level, self.now)
    }

    /// Group existing agents into a formation.
    pub fn form_group(
        &mut self,
        member_ids: &[AgentId],
        center: Vec3,
        kind: FormationKind,
        params: &FormationParams,
    ) -> Result<GroupId, GroupError> {
        self.tactics.form_group(
            &mut self.registry,
            member_ids,
            center,
            kind,
            params,
            self.rng.as_mut(),
        )
    }

    /// Mark a group inactive; later ticks skip it without teardown.
    pub fn deactivate_group(&mut self, id: GroupId) {
        self.tactics.deactivate(id);
    }

    /// Advance the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f64, world: &WorldContext) {
        self.now += dt;
        let profile = *self.difficulty.profile();

        // Directives last one tick.
        for id in self.registry.ids() {
            if let Some(agent) = self.registry.get_mut(id) {
                agent.directive = None;
            }
        }

        self.tactics.tick(
            &mut self.registry,
            &world.player,
            &profile,
            self.now,
            dt,
            self.rng.as_mut(),
            &self.config,
        );

        let ctx = FsmCtx {
            player: &world.player,
            profile: &profile,
            now: self.now,
            dt,
        };
        let mut pack_calls: Vec<PackCall> = Vec::new();
        for id in self.registry.ids() {
            let Some(agent) = self.registry.get_mut(id) else {
                continue;
            };
            if !agent.is_alive() {
                continue;
            }
            if let Some(call) =
                fsm::tick_agent(agent, &ctx, self.rng.as_mut(), &self.config, &mut self.events)
            {
                pack_calls.push(call);
            }
        }
        self.apply_pack_calls(&pack_calls);

        for id in self.registry.ids() {
            if let Some(agent) = self.registry.get_mut(id) {
                crate::boss::tick(
                    agent,
                    self.now,
                    self.rng.as_mut(),
                    &self.config,
                    &mut self.events,
                );
            }
        }

        let swept = self
            .registry
            .sweep_dead(self.now, self.config.death_grace_secs);
        if !swept.is_empty() {
            tracing::debug!(count = swept.len(), "death grace expired, agents removed");
        }
    }

    /// Promote same-kind patrollers near a pack call into the chase.
    fn apply_pack_calls(&mut self, calls: &[PackCall]) {
        for call in calls {
            for id in self.registry.ids() {
                let Some(agent) = self.registry.get_mut(id) else {
                    continue;
                };
                if agent.kind == call.kind
                    && agent.state == BehaviorState::Patrol
                    && agent.pos.distance(call.origin) <= self.config.pack_call_radius
                {
                    agent.state = BehaviorState::Chase;
                    agent.target = Some(call.target);
                }
            }
        }
    }

    /// Apply damage to an agent. The only sanctioned way health goes down.
    ///
    /// No-ops on stale handles, dead agents, and invulnerable bosses. On
    /// lethal damage the agent transitions to `Dead`, its reward data is
    /// computed exactly once, and the report is returned; the body stays
    /// queryable for the death grace window.
    pub fn take_damage(
        &mut self,
        id: AgentId,
        amount: f32,
        source: DamageSource,
    ) -> Option<DeathReport> {
        let now = self.now;
        let Some(agent) = self.registry.get_mut(id) else {
            return None;
        };
        if !agent.is_alive() {
            return None;
        }
        if let Some(boss) = &agent.boss {
            if now < boss.invulnerable_until {
                return None;
            }
        }

        agent.health -= amount.max(0.0);
        agent.memory.note_damage(DamageEvent {
            amount,
            at: now,
            source,
        });
        if agent.health > 0.0 {
            return None;
        }

        agent.health = 0.0;
        agent.state = BehaviorState::Dead;
        agent.died_at = Some(now);
        agent.directive = None;
        let report = DeathReport {
            agent: id,
            loot_table: agent.loot_table,
            xp: xp_value(agent),
        };
        tracing::debug!(kind = agent.kind, xp = report.xp, "agent died");
        Some(report)
    }

    /// Report a resolved combat to the adaptive difficulty controller.
    pub fn record_combat(&mut self, outcome: CombatOutcome, time_to_kill: f64, damage_taken: f64) {
        self.difficulty
            .record_combat(outcome, time_to_kill, damage_taken);
    }

    /// Drain the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Telemetry snapshot for UI and persistence.
    pub fn state(&self) -> DirectorState {
        DirectorState {
            tier: self.difficulty.tier(),
            active_groups: self.tactics.active_count(),
            live_agents: self.registry.live_count(),
            wins: self.difficulty.wins(),
            losses: self.difficulty.losses(),
            win_rate: self.difficulty.win_rate(),
            avg_time_to_kill: self.difficulty.avg_time_to_kill(),
            damage_taken: self.difficulty.damage_taken(),
        }
    }
}

/// XP awarded for a kill, scaled by level and variant.
fn xp_value(agent: &Agent) -> u32 {
    let mut xp = agent.base_xp as f32 * (1.0 + (agent.level.saturating_sub(1)) as f32 * XP_LEVEL_GROWTH);
    if agent.elite.is_some() {
        xp *= XP_ELITE_MULT;
    }
    if agent.is_boss() {
        xp *= XP_BOSS_MULT;
    }
    xp.round() as u32
}
