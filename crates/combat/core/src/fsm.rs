//! Per-agent behavior state machine.
//!
//! Evaluated once per tick per live agent: first the transition rules in
//! their fixed precedence, then movement execution for the (possibly new)
//! state. Movement target re-planning is gated by the difficulty profile's
//! reaction latency; between decisions an agent keeps steering at its last
//! target.
//!
//! Pack hunters entering the chase emit a [`PackCall`]; the director applies
//! the resulting promotions after the per-agent pass so that iteration order
//! never changes the outcome within a tick.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::agent::{Agent, BehaviorState, Personality};
use crate::config::CombatConfig;
use crate::difficulty::DifficultyProfile;
use crate::events::CombatEvent;
use crate::rng::CombatRng;

// Range multipliers for the transition rules.
const ALERT_DROP_FACTOR: f32 = 1.5;
const CHASE_DROP_FACTOR: f32 = 2.0;
const ATTACK_DROP_FACTOR: f32 = 1.5;
const FLEE_EXIT_FACTOR: f32 = 2.0;

// Health-ratio thresholds.
const COWARDLY_FLEE_BELOW: f32 = 0.30;
const DEFENSIVE_FLEE_BELOW: f32 = 0.50;
const FLEE_RECOVER_ABOVE: f32 = 0.60;

// Personality movement geometry.
const TACTICAL_FLANK_FACTOR: f32 = 0.8;
const DEFENSIVE_BAND_FACTOR: f32 = 0.7;

/// Seconds a hit counts as "recent" for the defensive flee tiebreak.
const RECENT_HURT_WINDOW: f64 = 2.0;

/// Read-only world snapshot for one player, passed into every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    pub pos: Vec3,
    pub health: f32,
    pub max_health: f32,
}

/// Per-tick inputs to the FSM.
pub struct FsmCtx<'a> {
    pub player: &'a PlayerSnapshot,
    pub profile: &'a DifficultyProfile,
    pub now: f64,
    pub dt: f64,
}

/// Request to pull same-kind patrollers into a chase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackCall {
    pub kind: &'static str,
    pub origin: Vec3,
    pub target: Vec3,
}

/// Run transitions and movement for one live agent.
///
/// Returns a pack call if the agent just committed to a chase and hunts in
/// packs. Dead agents are never passed in.
pub fn tick_agent(
    agent: &mut Agent,
    ctx: &FsmCtx<'_>,
    rng: &mut dyn CombatRng,
    cfg: &CombatConfig,
    events: &mut Vec<CombatEvent>,
) -> Option<PackCall> {
    let pack_call = run_transitions(agent, ctx, rng, cfg);
    run_movement(agent, ctx, rng, cfg, events);
    pack_call
}

fn run_transitions(
    agent: &mut Agent,
    ctx: &FsmCtx<'_>,
    rng: &mut dyn CombatRng,
    cfg: &CombatConfig,
) -> Option<PackCall> {
    let dist = agent.distance_to(ctx.player.pos);
    let ratio = agent.health_ratio();

    match agent.state {
        BehaviorState::Dead => None,
        BehaviorState::Idle | BehaviorState::Patrol => {
            if dist < agent.detection_range {
                agent.state = BehaviorState::Alert;
                agent.alert = cfg.alert_seed;
                agent.memory.note_seen(ctx.player.pos, ctx.now);
            }
            None
        }
        BehaviorState::Alert => {
            if dist > agent.detection_range * ALERT_DROP_FACTOR {
                agent.alert = 0.0;
                agent.state = BehaviorState::Patrol;
                return None;
            }
            agent.alert += cfg.alert_rate * ctx.dt as f32;
            agent.memory.note_seen(ctx.player.pos, ctx.now);
            if agent.alert >= cfg.alert_full {
                agent.alert = cfg.alert_full;
                agent.state = BehaviorState::Chase;
                agent.target = Some(ctx.player.pos);
                if agent.pack_behavior {
                    return Some(PackCall {
                        kind: agent.kind,
                        origin: agent.pos,
                        target: ctx.player.pos,
                    });
                }
            }
            None
        }
        BehaviorState::Chase => {
            agent.memory.note_seen(ctx.player.pos, ctx.now);
            if dist <= agent.attack_range {
                agent.state = BehaviorState::Attack;
            } else if dist > agent.detection_range * CHASE_DROP_FACTOR {
                agent.state = BehaviorState::Patrol;
                agent.target = None;
            } else if agent.personality == Personality::Cowardly && ratio < COWARDLY_FLEE_BELOW {
                agent.state = BehaviorState::Flee;
            }
            None
        }
        BehaviorState::Attack => {
            if dist > agent.attack_range * ATTACK_DROP_FACTOR {
                agent.state = BehaviorState::Chase;
            } else if agent.personality == Personality::Defensive && ratio < DEFENSIVE_FLEE_BELOW {
                // Twice as likely to break off while still smarting from a hit.
                let mut chance = cfg.defensive_flee_chance;
                if agent.memory.recently_hurt(ctx.now, RECENT_HURT_WINDOW) {
                    chance *= 2.0;
                }
                if rng.chance(chance) {
                    agent.state = BehaviorState::Flee;
                }
            }
            None
        }
        BehaviorState::Flee => {
            if dist > agent.detection_range * FLEE_EXIT_FACTOR || ratio > FLEE_RECOVER_ABOVE {
                agent.state = BehaviorState::Patrol;
                agent.target = None;
            }
            None
        }
    }
}

fn run_movement(
    agent: &mut Agent,
    ctx: &FsmCtx<'_>,
    rng: &mut dyn CombatRng,
    cfg: &CombatConfig,
    events: &mut Vec<CombatEvent>,
) {
    // A group directive overrides individual targeting for this tick.
    if let Some(directive) = agent.directive {
        step_toward(agent, directive.target, agent.move_speed, ctx.dt, cfg);
        if agent.state == BehaviorState::Attack {
            execute_attack(agent, ctx, rng, cfg, events);
        }
        return;
    }

    match agent.state {
        BehaviorState::Idle | BehaviorState::Dead => {}
        BehaviorState::Alert => {
            // Hold position while the alert level builds.
        }
        BehaviorState::Patrol => {
            let arrived = agent
                .target
                .is_none_or(|t| agent.distance_to(t) <= cfg.arrive_epsilon);
            if arrived {
                let angle = rng.range_f32(0.0, TAU);
                let radius = rng.range_f32(0.0, cfg.wander_radius);
                agent.target =
                    Some(agent.pos + Vec3::new(angle.cos(), 0.0, angle.sin()) * radius);
            }
            if let Some(target) = agent.target {
                step_toward(
                    agent,
                    target,
                    agent.move_speed * cfg.patrol_speed_factor,
                    ctx.dt,
                    cfg,
                );
            }
        }
        BehaviorState::Chase => {
            replan_target(agent, ctx, rng);
            if let Some(target) = agent.target {
                step_toward(agent, target, agent.move_speed, ctx.dt, cfg);
            }
        }
        BehaviorState::Attack => {
            replan_target(agent, ctx, rng);
            if let Some(target) = agent.target {
                step_toward(agent, target, agent.move_speed, ctx.dt, cfg);
            }
            execute_attack(agent, ctx, rng, cfg, events);
        }
        BehaviorState::Flee => {
            let away = agent.pos + flee_direction(agent.pos, ctx.player.pos) * agent.move_speed;
            step_toward(agent, away, agent.move_speed, ctx.dt, cfg);
        }
    }
}

/// Re-decide the movement target if the reaction latency has elapsed.
fn replan_target(agent: &mut Agent, ctx: &FsmCtx<'_>, rng: &mut dyn CombatRng) {
    if ctx.now < agent.next_decision_at {
        return;
    }
    agent.next_decision_at = ctx.now + ctx.profile.reaction_secs();
    let player = ctx.player.pos;
    let dist = agent.distance_to(player);

    agent.target = Some(match agent.personality {
        Personality::Aggressive | Personality::Cowardly => player,
        Personality::Tactical => {
            // Approach via a flank point just inside attack range.
            let angle = rng.range_f32(0.0, TAU);
            player + Vec3::new(angle.cos(), 0.0, angle.sin()) * agent.attack_range
                * TACTICAL_FLANK_FACTOR
        }
        Personality::Defensive => {
            // Oscillate around the stand-off band.
            if dist < agent.attack_range * DEFENSIVE_BAND_FACTOR {
                agent.pos + flee_direction(agent.pos, player) * agent.attack_range
            } else {
                player
            }
        }
    });
}

/// Swing at the player on the attack cadence; accuracy comes from the
/// difficulty profile. Bosses attack exclusively through their phase
/// patterns.
fn execute_attack(
    agent: &mut Agent,
    ctx: &FsmCtx<'_>,
    rng: &mut dyn CombatRng,
    cfg: &CombatConfig,
    events: &mut Vec<CombatEvent>,
) {
    if agent.is_boss() || ctx.now < agent.attack_ready_at {
        return;
    }
    agent.attack_ready_at = ctx.now + cfg.attack_interval_secs;
    if rng.chance(ctx.profile.accuracy) {
        events.push(CombatEvent::PlayerHit {
            agent: agent.id,
            amount: agent.attack,
        });
    }
}

/// Normalized direction away from a threat, with a fixed fallback when the
/// two positions coincide.
fn flee_direction(from: Vec3, threat: Vec3) -> Vec3 {
    let away = from - threat;
    if away.length_squared() < 1e-6 {
        return Vec3::X;
    }
    away.normalize()
}

/// Move straight toward a point, never overshooting it.
fn step_toward(agent: &mut Agent, point: Vec3, speed: f32, dt: f64, cfg: &CombatConfig) {
    let to = point - agent.pos;
    let dist = to.length();
    if dist <= cfg.arrive_epsilon * 0.1 {
        return;
    }
    let step = (speed * dt as f32).min(dist);
    agent.pos += to / dist * step;
}
