//! Static combat content: enemy kinds, boss phase tables, elite modifiers.
//!
//! `combat-core` defines the [`AgentCatalog`] oracle; this crate provides
//! the shipped tables behind it. Everything here is plain data; behavior
//! lives entirely in the core.

pub mod bosses;
pub mod elites;
pub mod enemies;

use combat_core::{AgentCatalog, BossTemplate, EliteModifier, EnemyTemplate};

/// Kind substituted when a spawn request names an unknown enemy.
pub const DEFAULT_ENEMY_KIND: &str = "husk";
/// Kind substituted when a spawn request names an unknown boss.
pub const DEFAULT_BOSS_KIND: &str = "gravemind";

/// The shipped content tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticCatalog;

impl StaticCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl AgentCatalog for StaticCatalog {
    fn enemy(&self, kind: &str) -> Option<EnemyTemplate> {
        enemies::template(kind)
    }

    fn boss(&self, kind: &str) -> Option<BossTemplate> {
        bosses::template(kind)
    }

    fn elite(&self, name: &str) -> Option<EliteModifier> {
        elites::modifier(name)
    }

    fn default_enemy(&self) -> EnemyTemplate {
        enemies::template(DEFAULT_ENEMY_KIND).expect("default enemy kind must exist")
    }

    fn default_boss(&self) -> BossTemplate {
        bosses::template(DEFAULT_BOSS_KIND).expect("default boss kind must exist")
    }
}
