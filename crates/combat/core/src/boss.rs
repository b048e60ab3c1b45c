//! Boss phase controller and phase-scoped attack cadence.
//!
//! Each boss carries an ordered phase table, descending by health-ratio
//! threshold with the first entry covering 100%. Every tick the controller
//! compares the boss's health ratio against the table and, unless a
//! transition is still locked, advances one phase: swapping the ability set,
//! compounding the phase multipliers into the stored stats, optionally
//! toggling flight, restoring a slice of max health, and granting timed
//! invulnerability.
//!
//! Multipliers deliberately compound across phases; the stored speed/attack
//! is never reset to a phase-independent base.

use arrayvec::ArrayVec;

use crate::agent::{Agent, BehaviorState};
use crate::catalog::{AbilityId, PhaseSpec};
use crate::config::CombatConfig;
use crate::events::CombatEvent;
use crate::rng::CombatRng;

/// Attack cadence during a phase.
///
/// Patterns differ only in inter-attack delay and whether the cast ability
/// is fixed or drawn at random from the phase set; chaos also randomizes the
/// delay itself.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
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
pub enum AttackPattern {
    #[default]
    Basic,
    Aggressive,
    Mixed,
    Chaos,
}

impl AttackPattern {
    /// Inter-attack delay in seconds. Chaos draws within a band.
    fn delay(&self, rng: &mut dyn CombatRng) -> f64 {
        match self {
            Self::Basic => 2.5,
            Self::Aggressive => 1.2,
            Self::Mixed => 2.0,
            Self::Chaos => f64::from(rng.range_f32(0.8, 2.4)),
        }
    }

    /// Whether the ability is drawn at random from the phase set.
    fn randomizes_ability(&self) -> bool {
        matches!(self, Self::Mixed | Self::Chaos)
    }
}

/// Phase-controller state carried by a boss agent.
#[derive(Clone, Debug)]
pub struct BossState {
    phases: ArrayVec<PhaseSpec, { CombatConfig::MAX_PHASES }>,
    /// Monotonic non-decreasing while the boss lives.
    phase_index: usize,
    /// No transition may start before this deadline.
    lock_until: f64,
    /// Damage is ignored before this deadline.
    pub invulnerable_until: f64,
    /// Flight mode toggled by phases.
    pub airborne: bool,
    pattern: AttackPattern,
    next_attack_at: f64,
    spawned_at: f64,
    enrage_secs: f64,
    enraged: bool,
    /// Attack-speed factor; boosted once by the soft enrage.
    haste: f64,
    /// Per-ability use timestamps. Written on every cast but never
    /// consulted; no per-ability cooldown is enforced.
    last_ability_use: ArrayVec<(AbilityId, f64), { CombatConfig::MAX_ABILITIES }>,
}

impl BossState {
    pub fn new(
        phases: ArrayVec<PhaseSpec, { CombatConfig::MAX_PHASES }>,
        pattern: AttackPattern,
        enrage_secs: f64,
        now: f64,
    ) -> Self {
        Self {
            phases,
            phase_index: 0,
            lock_until: now,
            invulnerable_until: now,
            airborne: false,
            pattern,
            next_attack_at: now,
            spawned_at: now,
            enrage_secs,
            enraged: false,
            haste: 1.0,
            last_ability_use: ArrayVec::new(),
        }
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn is_enraged(&self) -> bool {
        self.enraged
    }

    /// True while a transition is animating and further transitions are
    /// silently ignored.
    pub fn transition_locked(&self, now: f64) -> bool {
        now < self.lock_until
    }

    /// Highest phase index whose threshold has been crossed at this ratio.
    fn target_phase(&self, health_ratio: f32) -> usize {
        let mut target = 0;
        for (index, phase) in self.phases.iter().enumerate() {
            if phase.threshold >= health_ratio {
                target = index;
            }
        }
        target
    }
}

/// Run the phase controller for one agent. No-op for non-bosses.
pub fn tick(
    agent: &mut Agent,
    now: f64,
    rng: &mut dyn CombatRng,
    cfg: &CombatConfig,
    events: &mut Vec<CombatEvent>,
) {
    let Some(mut boss) = agent.boss.take() else {
        return;
    };
    if agent.state != BehaviorState::Dead {
        check_transition(agent, &mut boss, now, cfg, events);
        check_enrage(agent, &mut boss, now, cfg, events);
        run_pattern(agent, &mut boss, now, rng, events);
    }
    agent.boss = Some(boss);
}

fn check_transition(
    agent: &mut Agent,
    boss: &mut BossState,
    now: f64,
    cfg: &CombatConfig,
    events: &mut Vec<CombatEvent>,
) {
    let target = boss.target_phase(agent.health_ratio());
    if target <= boss.phase_index || boss.transition_locked(now) {
        return;
    }
    // One step per transition; the lock spaces out catch-up across ticks.
    boss.phase_index += 1;
    let phase = boss.phases[boss.phase_index].clone();

    agent.abilities = phase.abilities;
    agent.move_speed *= phase.speed_mult;
    agent.attack *= phase.damage_mult;
    boss.airborne = phase.airborne;
    boss.pattern = phase.pattern;

    agent.health += agent.max_health * cfg.phase_heal_fraction;
    agent.clamp_health();
    boss.invulnerable_until = now + cfg.phase_invuln_secs;
    boss.lock_until = now + cfg.phase_lock_secs;

    tracing::info!(
        boss = agent.kind,
        phase = boss.phase_index,
        airborne = boss.airborne,
        "boss phase transition"
    );
    events.push(CombatEvent::BossPhase {
        agent: agent.id,
        phase: boss.phase_index,
    });
}

fn check_enrage(
    agent: &mut Agent,
    boss: &mut BossState,
    now: f64,
    cfg: &CombatConfig,
    events: &mut Vec<CombatEvent>,
) {
    if boss.enraged || now - boss.spawned_at < boss.enrage_secs {
        return;
    }
    boss.enraged = true;
    agent.attack *= cfg.enrage_attack_mult;
    boss.haste *= cfg.enrage_haste;
    tracing::info!(boss = agent.kind, elapsed = now - boss.spawned_at, "soft enrage");
    events.push(CombatEvent::BossEnraged { agent: agent.id });
}

/// Cast the next ability when in attack range and off the pattern delay.
fn run_pattern(
    agent: &mut Agent,
    boss: &mut BossState,
    now: f64,
    rng: &mut dyn CombatRng,
    events: &mut Vec<CombatEvent>,
) {
    if agent.state != BehaviorState::Attack || now < boss.next_attack_at {
        return;
    }
    let Some(ability) = pick_ability(agent, boss.pattern, rng) else {
        return;
    };
    boss.next_attack_at = now + boss.pattern.delay(rng) / boss.haste;
    record_use(boss, ability, now);
    events.push(CombatEvent::AbilityCast {
        agent: agent.id,
        ability,
        damage: agent.attack,
    });
}

fn pick_ability(agent: &Agent, pattern: AttackPattern, rng: &mut dyn CombatRng) -> Option<AbilityId> {
    if agent.abilities.is_empty() {
        return None;
    }
    let index = if pattern.randomizes_ability() {
        rng.index(agent.abilities.len())
    } else {
        0
    };
    Some(agent.abilities[index])
}

fn record_use(boss: &mut BossState, ability: AbilityId, now: f64) {
    if let Some(entry) = boss
        .last_ability_use
        .iter_mut()
        .find(|(used, _)| *used == ability)
    {
        entry.1 = now;
    } else if !boss.last_ability_use.is_full() {
        boss.last_ability_use.push((ability, now));
    }
}
