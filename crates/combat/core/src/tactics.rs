//! Group tactics: cooperative strategy selection and per-member directives.
//!
//! Each tick, every active group draws a cooperation roll against the
//! current difficulty profile. On a failed roll the members fall back to
//! their individual FSM behavior; on success the coordinator picks a
//! strategy by situational analysis and writes a one-tick [`Directive`]
//! (target point plus strategy tag) onto each member.
//!
//! Member order is significant and never changes after creation: it defines
//! the flank split (first half / second half) and the combo-attack stagger.

use glam::Vec3;

use crate::agent::AgentId;
use crate::config::CombatConfig;
use crate::difficulty::DifficultyProfile;
use crate::error::GroupError;
use crate::formation::{self, Doctrine, FormationKind, FormationParams};
use crate::fsm::PlayerSnapshot;
use crate::registry::AgentRegistry;
use crate::rng::CombatRng;

/// Handle to a group. Plain counter; groups are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct GroupId(pub u32);

/// Cooperative strategy applied to a group for one tick.
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
pub enum Strategy {
    FocusFire,
    ProtectWeak,
    ComboAttack,
    Flank,
    HealSupport,
}

/// Strategy pool in escalation order; the difficulty profile's complexity
/// bounds how deep the random pick may reach.
const STRATEGY_POOL: [Strategy; 5] = [
    Strategy::FocusFire,
    Strategy::ProtectWeak,
    Strategy::ComboAttack,
    Strategy::Flank,
    Strategy::HealSupport,
];

/// Fraction of max health below which a member counts as weak.
const WEAK_BELOW: f32 = 0.30;
/// Fraction of weak members that flips selection to protect-weak.
const WEAK_FRACTION_TRIGGER: f32 = 0.30;
/// Minimum size for the combo-attack preference.
const COMBO_MIN_SIZE: usize = 3;

/// One-tick order for a single member: go here, for this reason.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Directive {
    pub target: Vec3,
    pub strategy: Strategy,
}

/// A registered cluster of agents acting together.
#[derive(Clone, Debug)]
pub struct Group {
    pub id: GroupId,
    pub center: Vec3,
    pub formation: FormationKind,
    /// Label implied by the formation; carried for telemetry only.
    pub doctrine: Doctrine,
    /// Member order is load-bearing; the list never grows or reorders.
    members: Vec<AgentId>,
    pub active: bool,
    /// Sim time the running combo-attack window lasts until; the stagger is
    /// assigned once per window, not on every coordinated tick.
    combo_until: f64,
}

impl Group {
    pub fn members(&self) -> &[AgentId] {
        &self.members
    }
}

struct MemberSnapshot {
    id: AgentId,
    pos: Vec3,
    health_ratio: f32,
    max_health: f32,
    healer: bool,
}

/// Owns all groups and runs the per-tick coordination pass.
#[derive(Default)]
pub struct TacticsCoordinator {
    groups: Vec<Group>,
    next_id: u32,
}

impl TacticsCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group from existing agents and move them onto formation
    /// positions.
    ///
    /// Fails without side effects if the member list is empty, any member is
    /// missing or already grouped, or the formation parameters are
    /// degenerate. The member count always equals the planned position
    /// count.
    pub fn form_group(
        &mut self,
        registry: &mut AgentRegistry,
        member_ids: &[AgentId],
        center: Vec3,
        kind: FormationKind,
        params: &FormationParams,
        rng: &mut dyn CombatRng,
    ) -> Result<GroupId, GroupError> {
        let slots = formation::positions(center, member_ids.len(), kind, params, rng)?;
        for id in member_ids {
            let agent = registry.get(*id).ok_or(GroupError::UnknownMember(*id))?;
            if agent.group.is_some() {
                return Err(GroupError::AlreadyGrouped(*id));
            }
        }

        let id = GroupId(self.next_id);
        self.next_id += 1;
        for (member, slot) in member_ids.iter().zip(&slots) {
            // presence checked above
            if let Some(agent) = registry.get_mut(*member) {
                agent.group = Some(id);
                agent.target = Some(*slot);
            }
        }
        self.groups.push(Group {
            id,
            center,
            formation: kind,
            doctrine: kind.doctrine(),
            members: member_ids.to_vec(),
            active: true,
            combo_until: 0.0,
        });
        tracing::debug!(group = id.0, kind = %kind, members = member_ids.len(), "group formed");
        Ok(id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    /// Mark a group inactive; it is skipped by all subsequent ticks.
    pub fn deactivate(&mut self, id: GroupId) {
        if let Some(group) = self.groups.iter_mut().find(|group| group.id == id) {
            group.active = false;
        }
    }

    pub fn active_count(&self) -> usize {
        self.groups.iter().filter(|group| group.active).count()
    }

    /// Run the coordination pass, in group registration order.
    pub fn tick(
        &mut self,
        registry: &mut AgentRegistry,
        player: &PlayerSnapshot,
        profile: &DifficultyProfile,
        now: f64,
        dt: f64,
        rng: &mut dyn CombatRng,
        cfg: &CombatConfig,
    ) {
        for group in &mut self.groups {
            if !group.active {
                continue;
            }
            let members = snapshot_members(registry, &group.members);
            if members.is_empty() {
                // every handle has gone stale; retire the group
                group.active = false;
                tracing::debug!(group = group.id.0, "group retired, all members gone");
                continue;
            }

            // Failed cooperation roll: individual behavior this tick.
            if rng.next_f32() > profile.cooperation {
                continue;
            }

            let strategy = select_strategy(&members, profile, rng);
            tracing::debug!(group = group.id.0, strategy = %strategy, "coordinated tactic");
            apply_strategy(strategy, group, &members, registry, player, now, dt, cfg);
        }
    }
}

/// Live members only, in stored order.
fn snapshot_members(registry: &AgentRegistry, ids: &[AgentId]) -> Vec<MemberSnapshot> {
    ids.iter()
        .filter_map(|id| registry.get(*id))
        .filter(|agent| agent.is_alive())
        .map(|agent| MemberSnapshot {
            id: agent.id,
            pos: agent.pos,
            health_ratio: agent.health_ratio(),
            max_health: agent.max_health,
            healer: agent.healer,
        })
        .collect()
}

/// Situational analysis, then a complexity-bounded uniform fallback.
fn select_strategy(
    members: &[MemberSnapshot],
    profile: &DifficultyProfile,
    rng: &mut dyn CombatRng,
) -> Strategy {
    let weak = members
        .iter()
        .filter(|m| m.health_ratio < WEAK_BELOW)
        .count();
    if weak as f32 / members.len() as f32 > WEAK_FRACTION_TRIGGER {
        return Strategy::ProtectWeak;
    }
    if members.len() >= COMBO_MIN_SIZE {
        return Strategy::ComboAttack;
    }
    let reach = (usize::from(profile.complexity) + 1).min(STRATEGY_POOL.len());
    STRATEGY_POOL[rng.index(reach)]
}

#[allow(clippy::too_many_arguments)]
fn apply_strategy(
    strategy: Strategy,
    group: &mut Group,
    members: &[MemberSnapshot],
    registry: &mut AgentRegistry,
    player: &PlayerSnapshot,
    now: f64,
    dt: f64,
    cfg: &CombatConfig,
) {
    match strategy {
        Strategy::FocusFire => {
            for member in members {
                set_directive(registry, member.id, player.pos, strategy);
            }
        }
        Strategy::ProtectWeak => {
            // Guards interpose between the weakest member and the player.
            let Some(ward) = members
                .iter()
                .filter(|m| m.health_ratio < WEAK_BELOW)
                .min_by(|a, b| a.health_ratio.total_cmp(&b.health_ratio))
            else {
                return;
            };
            let toward_player = player.pos - ward.pos;
            let station = if toward_player.length_squared() < 1e-6 {
                ward.pos
            } else {
                ward.pos + toward_player.normalize() * cfg.guard_standoff
            };
            for member in members {
                if member.health_ratio >= WEAK_BELOW {
                    set_directive(registry, member.id, station, strategy);
                }
            }
        }
        Strategy::ComboAttack => {
            // Staggered strikes in member-list order. Directives refresh
            // every tick, but the stagger is set only when the previous
            // combo window has played out; refreshing it per tick would
            // keep pushing the later members' deadlines past the clock.
            for member in members {
                set_directive(registry, member.id, player.pos, strategy);
            }
            if now >= group.combo_until {
                for (position, member) in members.iter().enumerate() {
                    if let Some(agent) = registry.get_mut(member.id) {
                        let strike_at = now + position as f64 * cfg.combo_delay_secs;
                        agent.attack_ready_at = agent.attack_ready_at.max(strike_at);
                    }
                }
                group.combo_until = now + members.len() as f64 * cfg.combo_delay_secs;
            }
        }
        Strategy::Flank => {
            // Split at the midpoint of the stored order; halves offset to
            // opposite sides of the player.
            let toward_player = player.pos - group.center;
            let lateral = if toward_player.length_squared() < 1e-6 {
                Vec3::X
            } else {
                let dir = toward_player.normalize();
                Vec3::new(-dir.z, 0.0, dir.x)
            };
            let split = members.len() / 2;
            for (position, member) in members.iter().enumerate() {
                let side = if position < split { 1.0 } else { -1.0 };
                let target = player.pos + lateral * cfg.flank_offset * side;
                set_directive(registry, member.id, target, strategy);
            }
        }
        Strategy::HealSupport => {
            // Healers converge on the most damaged non-healer and mend it.
            // Without a healer to hold the directive there is nobody to
            // channel the mending, so the group does nothing this tick.
            if !members.iter().any(|m| m.healer) {
                return;
            }
            let Some(patient) = members
                .iter()
                .filter(|m| !m.healer)
                .min_by(|a, b| a.health_ratio.total_cmp(&b.health_ratio))
            else {
                return;
            };
            let restored = patient.max_health * cfg.heal_rate_fraction * dt as f32;
            if let Some(agent) = registry.get_mut(patient.id) {
                agent.health += restored;
                agent.clamp_health();
            }
            for member in members.iter().filter(|m| m.healer) {
                set_directive(registry, member.id, patient.pos, strategy);
            }
        }
    }
}

fn set_directive(registry: &mut AgentRegistry, id: AgentId, target: Vec3, strategy: Strategy) {
    if let Some(agent) = registry.get_mut(id) {
        agent.directive = Some(Directive { target, strategy });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Personality;
    use crate::catalog::{abilities, AgentCatalog, BossTemplate, EliteModifier, EnemyTemplate};
    use crate::difficulty::{AdaptiveDifficulty, DifficultyTier};
    use crate::rng::{CombatRng, PcgRng};

    struct MiniCatalog;

    impl AgentCatalog for MiniCatalog {
        fn enemy(&self, kind: &str) -> Option<EnemyTemplate> {
            let mut template = self.default_enemy();
            match kind {
                "grunt" => Some(template),
                "mender" => {
                    template.name = "mender";
                    template.healer = true;
                    template.personality = Personality::Defensive;
                    Some(template)
                }
                _ => None,
            }
        }

        fn boss(&self, _kind: &str) -> Option<BossTemplate> {
            None
        }

        fn elite(&self, _name: &str) -> Option<EliteModifier> {
            None
        }

        fn default_enemy(&self) -> EnemyTemplate {
            EnemyTemplate {
                name: "grunt",
                base_health: 100.0,
                base_attack: 10.0,
                base_defense: 5.0,
                move_speed: 3.0,
                detection_range: 12.0,
                attack_range: 2.0,
                personality: Personality::Aggressive,
                pack_behavior: false,
                healer: false,
                abilities: abilities(&["slash"]),
                loot_table: "common",
                base_xp: 10,
            }
        }

        fn default_boss(&self) -> BossTemplate {
            unreachable!("no bosses in tactics tests")
        }
    }

    /// RNG that always rolls zero: the cooperation roll always passes and
    /// index picks always take the first entry.
    struct AlwaysZero;

    impl CombatRng for AlwaysZero {
        fn next_u32(&mut self) -> u32 {
            0
        }
    }

    /// RNG that always rolls the maximum: the cooperation roll always fails.
    struct AlwaysMax;

    impl CombatRng for AlwaysMax {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }
    }

    fn player() -> PlayerSnapshot {
        PlayerSnapshot {
            pos: Vec3::new(20.0, 0.0, 0.0),
            health: 100.0,
            max_health: 100.0,
        }
    }

    fn spawn_square(
        registry: &mut AgentRegistry,
        coordinator: &mut TacticsCoordinator,
        kinds: &[&str],
    ) -> (GroupId, Vec<AgentId>) {
        let ids: Vec<AgentId> = kinds
            .iter()
            .map(|kind| registry.spawn_enemy(&MiniCatalog, kind, Vec3::ZERO, 1, None, 0.0))
            .collect();
        let mut rng = PcgRng::seeded(2);
        let group = coordinator
            .form_group(
                registry,
                &ids,
                Vec3::ZERO,
                FormationKind::Circle,
                &FormationParams::default(),
                &mut rng,
            )
            .unwrap();
        (group, ids)
    }

    fn tick_with(
        coordinator: &mut TacticsCoordinator,
        registry: &mut AgentRegistry,
        rng: &mut dyn CombatRng,
    ) {
        let profile = AdaptiveDifficulty::new(DifficultyTier::Expert).profile();
        coordinator.tick(registry, &player(), profile, 1.0, 0.1, rng, &CombatConfig::new());
    }

    #[test]
    fn group_member_count_matches_request_and_never_grows() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        let (group, ids) = spawn_square(&mut registry, &mut coordinator, &["grunt"; 4]);
        assert_eq!(coordinator.group(group).unwrap().members().len(), 4);
        // members picked up their formation slots and back-references
        for id in &ids {
            let agent = registry.get(*id).unwrap();
            assert_eq!(agent.group, Some(group));
            assert!(agent.target.is_some());
        }
    }

    #[test]
    fn forming_with_missing_member_fails_without_side_effects() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        let present = registry.spawn_enemy(&MiniCatalog, "grunt", Vec3::ZERO, 1, None, 0.0);
        let missing = registry.spawn_enemy(&MiniCatalog, "grunt", Vec3::ZERO, 1, None, 0.0);
        registry.remove(missing);
        let mut rng = PcgRng::seeded(2);
        let err = coordinator
            .form_group(
                &mut registry,
                &[present, missing],
                Vec3::ZERO,
                FormationKind::Line,
                &FormationParams::default(),
                &mut rng,
            )
            .unwrap_err();
        assert_eq!(err, GroupError::UnknownMember(missing));
        assert_eq!(registry.get(present).unwrap().group, None);
        assert_eq!(coordinator.active_count(), 0);
    }

    #[test]
    fn failed_cooperation_roll_leaves_no_directives() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        let (_, ids) = spawn_square(&mut registry, &mut coordinator, &["grunt"; 4]);
        tick_with(&mut coordinator, &mut registry, &mut AlwaysMax);
        for id in &ids {
            assert_eq!(registry.get(*id).unwrap().directive, None);
        }
    }

    #[test]
    fn large_healthy_group_prefers_combo_attack_with_stagger() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        let (_, ids) = spawn_square(&mut registry, &mut coordinator, &["grunt"; 4]);
        tick_with(&mut coordinator, &mut registry, &mut AlwaysZero);
        let cfg = CombatConfig::new();
        for (position, id) in ids.iter().enumerate() {
            let agent = registry.get(*id).unwrap();
            let directive = agent.directive.expect("combo directive");
            assert_eq!(directive.strategy, Strategy::ComboAttack);
            let expected = 1.0 + position as f64 * cfg.combo_delay_secs;
            assert!((agent.attack_ready_at - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn hurt_group_protects_its_weakest() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        let (_, ids) = spawn_square(&mut registry, &mut coordinator, &["grunt"; 4]);
        for id in &ids[..2] {
            registry.get_mut(*id).unwrap().health = 20.0;
        }
        tick_with(&mut coordinator, &mut registry, &mut AlwaysZero);
        // the two healthy members guard; the weak keep individual behavior
        for id in &ids[..2] {
            assert_eq!(registry.get(*id).unwrap().directive, None);
        }
        for id in &ids[2..] {
            let directive = registry.get(*id).unwrap().directive.expect("guard directive");
            assert_eq!(directive.strategy, Strategy::ProtectWeak);
        }
    }

    #[test]
    fn flank_splits_member_order_deterministically() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        // four healthy members would select combo through the coordinator,
        // so drive the flank arm directly.
        let (group_id, ids) = spawn_square(&mut registry, &mut coordinator, &["grunt"; 4]);
        let mut group = coordinator.group(group_id).unwrap().clone();
        let members = snapshot_members(&registry, group.members());
        let cfg = CombatConfig::new();
        apply_strategy(
            Strategy::Flank,
            &mut group,
            &members,
            &mut registry,
            &player(),
            1.0,
            0.1,
            &cfg,
        );
        let targets: Vec<Vec3> = ids
            .iter()
            .map(|id| registry.get(*id).unwrap().directive.unwrap().target)
            .collect();
        // [0, 1] on one side, [2, 3] on the other, mirrored around the player
        assert_eq!(targets[0], targets[1]);
        assert_eq!(targets[2], targets[3]);
        let player_pos = player().pos;
        assert_eq!(
            targets[0] - player_pos,
            -(targets[2] - player_pos),
        );
        assert!((targets[0].distance(player_pos) - cfg.flank_offset).abs() < 1e-4);
    }

    #[test]
    fn heal_support_mends_the_most_damaged_non_healer() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        let (group_id, ids) =
            spawn_square(&mut registry, &mut coordinator, &["grunt", "grunt", "mender"]);
        registry.get_mut(ids[1]).unwrap().health = 35.0;
        let mut group = coordinator.group(group_id).unwrap().clone();
        let members = snapshot_members(&registry, group.members());
        let cfg = CombatConfig::new();
        apply_strategy(
            Strategy::HealSupport,
            &mut group,
            &members,
            &mut registry,
            &player(),
            1.0,
            1.0,
            &cfg,
        );
        // 5% of max per second restored
        assert!((registry.get(ids[1]).unwrap().health - 40.0).abs() < 1e-3);
        let healer = registry.get(ids[2]).unwrap();
        assert_eq!(healer.directive.unwrap().strategy, Strategy::HealSupport);
        assert_eq!(registry.get(ids[0]).unwrap().directive, None);
    }

    #[test]
    fn heal_support_without_a_healer_does_nothing() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        let (group_id, ids) = spawn_square(&mut registry, &mut coordinator, &["grunt"; 2]);
        registry.get_mut(ids[1]).unwrap().health = 50.0;
        let mut group = coordinator.group(group_id).unwrap().clone();
        let members = snapshot_members(&registry, group.members());
        let cfg = CombatConfig::new();
        apply_strategy(
            Strategy::HealSupport,
            &mut group,
            &members,
            &mut registry,
            &player(),
            1.0,
            1.0,
            &cfg,
        );
        assert_eq!(registry.get(ids[1]).unwrap().health, 50.0);
        for id in &ids {
            assert_eq!(registry.get(*id).unwrap().directive, None);
        }
    }

    #[test]
    fn combo_stagger_holds_for_the_whole_window() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        let (_, ids) = spawn_square(&mut registry, &mut coordinator, &["grunt"; 4]);
        let profile = AdaptiveDifficulty::new(DifficultyTier::Expert).profile();
        let cfg = CombatConfig::new();

        coordinator.tick(&mut registry, &player(), profile, 1.0, 0.1, &mut AlwaysZero, &cfg);
        let assigned: Vec<f64> = ids
            .iter()
            .map(|id| registry.get(*id).unwrap().attack_ready_at)
            .collect();

        // further coordinated ticks inside the window leave the deadlines
        // alone instead of pushing them past the clock
        coordinator.tick(&mut registry, &player(), profile, 1.1, 0.1, &mut AlwaysZero, &cfg);
        coordinator.tick(&mut registry, &player(), profile, 1.5, 0.1, &mut AlwaysZero, &cfg);
        for (position, id) in ids.iter().enumerate() {
            assert_eq!(registry.get(*id).unwrap().attack_ready_at, assigned[position]);
        }

        // once the window has elapsed a fresh stagger is assigned
        coordinator.tick(&mut registry, &player(), profile, 3.0, 0.1, &mut AlwaysZero, &cfg);
        let second = registry.get(ids[1]).unwrap().attack_ready_at;
        assert!((second - (3.0 + cfg.combo_delay_secs)).abs() < 1e-9);
    }

    #[test]
    fn sustained_coordination_lets_every_member_swing() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        let (_, ids) = spawn_square(&mut registry, &mut coordinator, &["grunt"; 3]);
        let profile = AdaptiveDifficulty::new(DifficultyTier::Expert).profile();
        let cfg = CombatConfig::new();

        let mut could_swing = vec![false; ids.len()];
        let mut now = 1.0;
        for _ in 0..50 {
            coordinator.tick(&mut registry, &player(), profile, now, 0.1, &mut AlwaysZero, &cfg);
            for (position, id) in ids.iter().enumerate() {
                if registry.get(*id).unwrap().attack_ready_at <= now {
                    could_swing[position] = true;
                }
            }
            now += 0.1;
        }
        assert!(could_swing.iter().all(|ready| *ready), "{could_swing:?}");
    }

    #[test]
    fn deactivated_group_is_skipped() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        let (group, ids) = spawn_square(&mut registry, &mut coordinator, &["grunt"; 4]);
        coordinator.deactivate(group);
        tick_with(&mut coordinator, &mut registry, &mut AlwaysZero);
        for id in &ids {
            assert_eq!(registry.get(*id).unwrap().directive, None);
        }
        assert_eq!(coordinator.active_count(), 0);
    }

    #[test]
    fn group_retires_once_all_members_are_swept() {
        let mut registry = AgentRegistry::new();
        let mut coordinator = TacticsCoordinator::new();
        let (_, ids) = spawn_square(&mut registry, &mut coordinator, &["grunt"; 2]);
        for id in &ids {
            registry.remove(*id);
        }
        assert_eq!(coordinator.active_count(), 1);
        tick_with(&mut coordinator, &mut registry, &mut AlwaysZero);
        assert_eq!(coordinator.active_count(), 0);
    }
}
