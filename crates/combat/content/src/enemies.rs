//! Regular enemy kinds.
//!
//! Base stats are level-1 values; the registry applies the level growth
//! formulas at spawn.

use combat_core::{abilities, EnemyTemplate, Personality};

/// All shipped enemy kind names.
pub const KINDS: &[&str] = &["husk", "ravager", "stalker", "warden", "craven", "mender"];

/// Template for an enemy kind, if it exists.
pub fn template(kind: &str) -> Option<EnemyTemplate> {
    let template = match kind {
        // The baseline melee shambler; also the unknown-kind fallback.
        "husk" => EnemyTemplate {
            name: "husk",
            base_health: 100.0,
            base_attack: 10.0,
            base_defense: 5.0,
            move_speed: 2.8,
            detection_range: 12.0,
            attack_range: 2.0,
            personality: Personality::Aggressive,
            pack_behavior: false,
            healer: false,
            abilities: abilities(&["claw"]),
            loot_table: "husk_common",
            base_xp: 10,
        },
        // Fast pack hunter; one alerted ravager pulls the pack.
        "ravager" => EnemyTemplate {
            name: "ravager",
            base_health: 80.0,
            base_attack: 14.0,
            base_defense: 3.0,
            move_speed: 4.2,
            detection_range: 16.0,
            attack_range: 1.8,
            personality: Personality::Aggressive,
            pack_behavior: true,
            healer: false,
            abilities: abilities(&["rend", "howl"]),
            loot_table: "ravager_common",
            base_xp: 14,
        },
        // Circles to a flank before committing.
        "stalker" => EnemyTemplate {
            name: "stalker",
            base_health: 90.0,
            base_attack: 16.0,
            base_defense: 4.0,
            move_speed: 3.6,
            detection_range: 18.0,
            attack_range: 2.2,
            personality: Personality::Tactical,
            pack_behavior: false,
            healer: false,
            abilities: abilities(&["backstab", "smoke_bomb"]),
            loot_table: "stalker_common",
            base_xp: 18,
        },
        // Heavy line-holder; keeps a stand-off band.
        "warden" => EnemyTemplate {
            name: "warden",
            base_health: 160.0,
            base_attack: 9.0,
            base_defense: 12.0,
            move_speed: 2.2,
            detection_range: 10.0,
            attack_range: 2.6,
            personality: Personality::Defensive,
            pack_behavior: false,
            healer: false,
            abilities: abilities(&["shield_bash"]),
            loot_table: "warden_common",
            base_xp: 20,
        },
        // Breaks and runs when badly hurt.
        "craven" => EnemyTemplate {
            name: "craven",
            base_health: 60.0,
            base_attack: 12.0,
            base_defense: 2.0,
            move_speed: 3.8,
            detection_range: 14.0,
            attack_range: 1.6,
            personality: Personality::Cowardly,
            pack_behavior: false,
            healer: false,
            abilities: abilities(&["stab"]),
            loot_table: "craven_common",
            base_xp: 8,
        },
        // Support caster; carries the heal-support directive.
        "mender" => EnemyTemplate {
            name: "mender",
            base_health: 70.0,
            base_attack: 6.0,
            base_defense: 4.0,
            move_speed: 3.0,
            detection_range: 14.0,
            attack_range: 8.0,
            personality: Personality::Defensive,
            pack_behavior: false,
            healer: true,
            abilities: abilities(&["mend", "ward"]),
            loot_table: "mender_common",
            base_xp: 16,
        },
        _ => return None,
    };
    Some(template)
}
