//! Authoritative agent store over a generational arena.
//!
//! The registry is the single mutable store of the core: every other
//! component reads and writes agents only through it. Slots are reused after
//! removal, but each reuse bumps the slot generation so stale [`AgentId`]
//! handles resolve to `None` instead of aliasing a new agent.

use glam::Vec3;

use crate::agent::{Agent, AgentId, AgentMemory, BehaviorState};
use crate::boss::BossState;
use crate::catalog::{AgentCatalog, BossTemplate, EnemyTemplate};

// Per-level stat growth. Bosses scale harder than regular enemies.
const ENEMY_HEALTH_GROWTH: f32 = 0.15;
const ENEMY_ATTACK_GROWTH: f32 = 0.12;
const ENEMY_DEFENSE_GROWTH: f32 = 0.10;
const BOSS_HEALTH_GROWTH: f32 = 0.20;
const BOSS_ATTACK_GROWTH: f32 = 0.15;
const BOSS_DEFENSE_GROWTH: f32 = 0.12;

#[inline]
fn scaled(base: f32, level: u32, growth: f32) -> f32 {
    base * (1.0 + (level.saturating_sub(1)) as f32 * growth)
}

struct Slot {
    generation: u32,
    agent: Option<Agent>,
}

/// Dense arena of live (and recently dead) agents.
#[derive(Default)]
pub struct AgentRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a regular enemy.
    ///
    /// An unknown kind falls back to the catalog's default enemy rather than
    /// failing; an unknown elite modifier is skipped. Both are logged.
    pub fn spawn_enemy(
        &mut self,
        catalog: &dyn AgentCatalog,
        kind: &str,
        pos: Vec3,
        level: u32,
        elite: Option<&str>,
        now: f64,
    ) -> AgentId {
        let template = catalog.enemy(kind).unwrap_or_else(|| {
            let fallback = catalog.default_enemy();
            tracing::warn!(kind, fallback = fallback.name, "unknown enemy kind, using fallback");
            fallback
        });
        let mut agent = self.build_enemy(&template, pos, level, now);

        if let Some(name) = elite {
            match catalog.elite(name) {
                Some(modifier) => {
                    // Applied exactly once, at construction.
                    agent.max_health *= modifier.health_mult;
                    agent.attack *= modifier.attack_mult;
                    agent.defense *= modifier.defense_mult;
                    agent.move_speed *= modifier.speed_mult;
                    agent.health = agent.max_health;
                    for ability in &modifier.extra_abilities {
                        let _ = agent.abilities.try_push(*ability);
                    }
                    agent.elite = Some(modifier.name);
                }
                None => {
                    tracing::warn!(elite = name, "unknown elite modifier, spawning base kind");
                }
            }
        }

        self.insert(agent)
    }

    /// Spawn a boss. Unknown kinds fall back to the catalog's default boss.
    pub fn spawn_boss(
        &mut self,
        catalog: &dyn AgentCatalog,
        kind: &str,
        pos: Vec3,
        level: u32,
        now: f64,
    ) -> AgentId {
        let template = catalog.boss(kind).unwrap_or_else(|| {
            let fallback = catalog.default_boss();
            tracing::warn!(kind, fallback = fallback.name, "unknown boss kind, using fallback");
            fallback
        });
        let agent = self.build_boss(&template, pos, level, now);
        self.insert(agent)
    }

    fn build_enemy(&self, template: &EnemyTemplate, pos: Vec3, level: u32, now: f64) -> Agent {
        let max_health = scaled(template.base_health, level, ENEMY_HEALTH_GROWTH);
        Agent {
            // placeholder id; assigned on insert
            id: AgentId { index: 0, generation: 0 },
            kind: template.name,
            level,
            pos,
            health: max_health,
            max_health,
            attack: scaled(template.base_attack, level, ENEMY_ATTACK_GROWTH),
            defense: scaled(template.base_defense, level, ENEMY_DEFENSE_GROWTH),
            move_speed: template.move_speed,
            detection_range: template.detection_range,
            attack_range: template.attack_range,
            state: BehaviorState::Idle,
            personality: template.personality,
            abilities: template.abilities.clone(),
            elite: None,
            pack_behavior: template.pack_behavior,
            healer: template.healer,
            memory: AgentMemory::default(),
            group: None,
            alert: 0.0,
            target: None,
            directive: None,
            next_decision_at: now,
            attack_ready_at: now,
            died_at: None,
            loot_table: template.loot_table,
            base_xp: template.base_xp,
            boss: None,
        }
    }

    fn build_boss(&self, template: &BossTemplate, pos: Vec3, level: u32, now: f64) -> Agent {
        let max_health = scaled(template.base_health, level, BOSS_HEALTH_GROWTH);
        let first_phase = template
            .phases
            .first()
            .map(|phase| (phase.abilities.clone(), phase.pattern))
            .unwrap_or_default();
        Agent {
            id: AgentId { index: 0, generation: 0 },
            kind: template.name,
            level,
            pos,
            health: max_health,
            max_health,
            attack: scaled(template.base_attack, level, BOSS_ATTACK_GROWTH),
            defense: scaled(template.base_defense, level, BOSS_DEFENSE_GROWTH),
            move_speed: template.move_speed,
            detection_range: template.detection_range,
            attack_range: template.attack_range,
            state: BehaviorState::Idle,
            personality: crate::agent::Personality::Aggressive,
            abilities: first_phase.0,
            elite: None,
            pack_behavior: false,
            healer: false,
            memory: AgentMemory::default(),
            group: None,
            alert: 0.0,
            target: None,
            directive: None,
            next_decision_at: now,
            attack_ready_at: now,
            died_at: None,
            loot_table: template.loot_table,
            base_xp: template.base_xp,
            boss: Some(BossState::new(
                template.phases.clone(),
                first_phase.1,
                template.enrage_secs,
                now,
            )),
        }
    }

    fn insert(&mut self, mut agent: Agent) -> AgentId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                AgentId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    agent: None,
                });
                AgentId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        agent.id = id;
        self.slots[id.index as usize].agent = Some(agent);
        id
    }

    /// Resolve a handle. Stale generations yield `None`.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.agent.as_ref()
    }

    /// Mutable handle resolution.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.agent.as_mut()
    }

    /// Remove an agent, invalidating all outstanding handles to it.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let agent = slot.agent.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(agent)
    }

    /// Ids of every stored agent, in arena order. Dead-but-not-swept agents
    /// are included.
    pub fn ids(&self) -> Vec<AgentId> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| {
                slot.agent.as_ref().map(|_| AgentId {
                    index: index as u32,
                    generation: slot.generation,
                })
            })
            .collect()
    }

    /// Iterate all stored agents.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.slots.iter().filter_map(|slot| slot.agent.as_ref())
    }

    /// Agents matching a predicate.
    pub fn agents_where<'a>(
        &'a self,
        mut predicate: impl FnMut(&Agent) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Agent> {
        self.iter().filter(move |agent| predicate(agent))
    }

    /// Number of stored agents (live plus grace-window dead).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.agent.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of agents that are still alive.
    pub fn live_count(&self) -> usize {
        self.iter().filter(|agent| agent.is_alive()).count()
    }

    /// Remove agents whose death grace window has elapsed. Returns the
    /// removed ids so the caller can retire group references.
    pub fn sweep_dead(&mut self, now: f64, grace_secs: f64) -> Vec<AgentId> {
        let expired: Vec<AgentId> = self
            .iter()
            .filter(|agent| {
                agent
                    .died_at
                    .is_some_and(|died_at| now - died_at >= grace_secs)
            })
            .map(|agent| agent.id)
            .collect();
        for id in &expired {
            self.remove(*id);
        }
        expired
    }
}
