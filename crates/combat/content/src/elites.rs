//! Elite modifier bundles, applied once at spawn by the registry.

use combat_core::{AbilityId, EliteModifier};

/// All shipped elite modifier names.
pub const NAMES: &[&str] = &["frenzied", "bulwark", "veiled"];

/// Modifier bundle by name, if it exists.
pub fn modifier(name: &str) -> Option<EliteModifier> {
    let modifier = match name {
        "frenzied" => EliteModifier {
            name: "frenzied",
            health_mult: 1.5,
            attack_mult: 1.8,
            defense_mult: 1.0,
            speed_mult: 1.3,
            extra_abilities: [AbilityId("frenzy")].into_iter().collect(),
        },
        "bulwark" => EliteModifier {
            name: "bulwark",
            health_mult: 2.5,
            attack_mult: 1.0,
            defense_mult: 2.0,
            speed_mult: 0.8,
            extra_abilities: [AbilityId("stone_skin")].into_iter().collect(),
        },
        "veiled" => EliteModifier {
            name: "veiled",
            health_mult: 1.2,
            attack_mult: 1.4,
            defense_mult: 1.2,
            speed_mult: 1.5,
            extra_abilities: [AbilityId("shadow_step"), AbilityId("vanish")]
                .into_iter()
                .collect(),
        },
        _ => return None,
    };
    Some(modifier)
}
