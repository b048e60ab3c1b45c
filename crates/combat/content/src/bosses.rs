//! Boss kinds and their phase tables.
//!
//! Phase tables are ordered by descending health-ratio threshold and always
//! open with a 100% entry. Phase multipliers are relative to the previous
//! phase: the core compounds them on entry and never resets to base.

use arrayvec::ArrayVec;
use combat_core::{abilities, AttackPattern, BossTemplate, CombatConfig, PhaseSpec};

/// All shipped boss kind names.
pub const KINDS: &[&str] = &["gravemind", "ash_tyrant"];

fn phase(
    threshold: f32,
    ability_names: &[&'static str],
    speed_mult: f32,
    damage_mult: f32,
    airborne: bool,
    pattern: AttackPattern,
) -> PhaseSpec {
    PhaseSpec {
        threshold,
        abilities: abilities(ability_names),
        speed_mult,
        damage_mult,
        airborne,
        pattern,
    }
}

fn table(phases: &[PhaseSpec]) -> ArrayVec<PhaseSpec, { CombatConfig::MAX_PHASES }> {
    phases.iter().cloned().collect()
}

/// Template for a boss kind, if it exists.
pub fn template(kind: &str) -> Option<BossTemplate> {
    let template = match kind {
        // Three-phase necrotic mass; slow but relentless, default boss.
        "gravemind" => BossTemplate {
            name: "gravemind",
            base_health: 1000.0,
            base_attack: 80.0,
            base_defense: 20.0,
            move_speed: 2.4,
            detection_range: 35.0,
            attack_range: 4.0,
            phases: table(&[
                phase(
                    1.0,
                    &["grave_slam", "rot_breath"],
                    1.0,
                    1.0,
                    false,
                    AttackPattern::Basic,
                ),
                phase(
                    0.60,
                    &["grave_slam", "rot_breath", "corpse_call"],
                    1.2,
                    1.3,
                    false,
                    AttackPattern::Mixed,
                ),
                phase(
                    0.25,
                    &["rot_breath", "corpse_call", "necrotic_burst"],
                    1.3,
                    1.5,
                    false,
                    AttackPattern::Chaos,
                ),
            ]),
            enrage_secs: 300.0,
            loot_table: "gravemind_hoard",
            base_xp: 400,
        },
        // Four-phase winged pyromancer; takes to the air mid-fight.
        "ash_tyrant" => BossTemplate {
            name: "ash_tyrant",
            base_health: 1400.0,
            base_attack: 95.0,
            base_defense: 25.0,
            move_speed: 3.0,
            detection_range: 45.0,
            attack_range: 6.0,
            phases: table(&[
                phase(
                    1.0,
                    &["cinder_swipe", "tail_lash"],
                    1.0,
                    1.0,
                    false,
                    AttackPattern::Basic,
                ),
                phase(
                    0.75,
                    &["cinder_swipe", "ember_rain"],
                    1.3,
                    1.2,
                    true,
                    AttackPattern::Aggressive,
                ),
                phase(
                    0.45,
                    &["ember_rain", "ash_storm", "dive_bomb"],
                    1.2,
                    1.4,
                    true,
                    AttackPattern::Mixed,
                ),
                phase(
                    0.15,
                    &["ash_storm", "dive_bomb", "immolate"],
                    1.4,
                    1.6,
                    false,
                    AttackPattern::Chaos,
                ),
            ]),
            enrage_secs: 240.0,
            loot_table: "ash_tyrant_hoard",
            base_xp: 650,
        },
        _ => return None,
    };
    Some(template)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_list_matches_templates() {
        for kind in KINDS {
            assert!(template(kind).is_some(), "missing template for {kind}");
        }
        assert!(template("husk").is_none());
    }

    #[test]
    fn phase_tables_open_at_full_health_and_descend() {
        for kind in KINDS {
            let boss = template(kind).unwrap();
            let thresholds: Vec<f32> = boss.phases.iter().map(|p| p.threshold).collect();
            assert_eq!(thresholds[0], 1.0);
            assert!(thresholds.windows(2).all(|w| w[0] > w[1]));
        }
    }

    #[test]
    fn every_phase_has_abilities() {
        for kind in KINDS {
            let boss = template(kind).unwrap();
            assert!(boss.phases.iter().all(|p| !p.abilities.is_empty()));
        }
    }
}
