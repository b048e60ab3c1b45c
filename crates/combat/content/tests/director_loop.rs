//! End-to-end ticks through [`CombatDirector`] with the shipped content.

use std::sync::Arc;

use combat_content::StaticCatalog;
use combat_core::{
    BehaviorState, CombatConfig, CombatDirector, CombatOutcome, DamageSource, DifficultyTier,
    FormationKind, FormationParams, GroupError, PcgRng, PlayerSnapshot, WorldContext,
};
use glam::Vec3;

fn director(seed: u64) -> CombatDirector {
    CombatDirector::new(
        Arc::new(StaticCatalog::new()),
        CombatConfig::new(),
        Box::new(PcgRng::seeded(seed)),
    )
}

fn world(pos: Vec3) -> WorldContext {
    WorldContext {
        player: PlayerSnapshot {
            pos,
            health: 100.0,
            max_health: 100.0,
        },
    }
}

#[test]
fn detection_escalates_to_chase_and_attack() {
    let mut director = director(1);
    let id = director.spawn_enemy("husk", Vec3::ZERO, 1, None);
    let w = world(Vec3::new(5.0, 0.0, 0.0));

    // inside detection range: idle agents notice immediately
    director.update(0.1, &w);
    assert_eq!(director.registry().get(id).unwrap().state, BehaviorState::Alert);

    // one full second of alert accumulation commits the chase
    director.update(1.0, &w);
    let agent = director.registry().get(id).unwrap();
    assert_eq!(agent.state, BehaviorState::Chase);
    assert!(agent.distance_to(w.player.pos) < 5.0);

    for _ in 0..10 {
        director.update(0.5, &w);
    }
    assert_eq!(director.registry().get(id).unwrap().state, BehaviorState::Attack);

    // events are handed out exactly once
    let _ = director.drain_events();
    assert!(director.drain_events().is_empty());
}

#[test]
fn lethal_damage_reports_once_and_body_survives_the_grace_window() {
    let mut director = director(2);
    let id = director.spawn_enemy("husk", Vec3::ZERO, 3, None);

    let report = director
        .take_damage(id, 500.0, DamageSource::Player)
        .expect("lethal damage yields a report");
    assert_eq!(report.loot_table, "husk_common");
    // base 10, two levels of growth
    assert_eq!(report.xp, 12);

    let agent = director.registry().get(id).expect("body retained");
    assert_eq!(agent.state, BehaviorState::Dead);
    assert_eq!(agent.health, 0.0);
    assert!(director.take_damage(id, 10.0, DamageSource::Player).is_none());
    assert_eq!(director.state().live_agents, 0);

    let w = world(Vec3::new(100.0, 0.0, 0.0));
    director.update(1.0, &w);
    assert!(director.registry().get(id).is_some());
    director.update(6.0, &w);
    assert!(director.registry().get(id).is_none());
}

#[test]
fn elite_kill_pays_bonus_xp() {
    let mut director = director(3);
    let id = director.spawn_enemy("husk", Vec3::ZERO, 1, Some("frenzied"));
    assert_eq!(director.registry().get(id).unwrap().max_health, 150.0);

    let report = director
        .take_damage(id, 500.0, DamageSource::Player)
        .expect("lethal");
    assert_eq!(report.xp, 15);
}

#[test]
fn unknown_kind_spawns_the_fallback() {
    let mut director = director(4);
    let id = director.spawn_enemy("swamp_thing", Vec3::ZERO, 1, None);
    assert_eq!(director.registry().get(id).unwrap().kind, "husk");
}

#[test]
fn pack_call_promotes_nearby_patrolling_kin() {
    let mut director = director(5);
    let hunter = director.spawn_enemy("ravager", Vec3::ZERO, 1, None);
    let kin = director.spawn_enemy("ravager", Vec3::new(12.0, 0.0, 0.0), 1, None);

    // both notice the player
    director.update(0.1, &world(Vec3::new(8.0, 0.0, 0.0)));
    assert_eq!(director.registry().get(hunter).unwrap().state, BehaviorState::Alert);
    assert_eq!(director.registry().get(kin).unwrap().state, BehaviorState::Alert);

    // the player retreats: the far kin falls back to patrol, the near hunter
    // commits to the chase and its pack call pulls the kin straight back in
    let retreat = world(Vec3::new(-12.5, 0.0, 0.0));
    director.update(1.0, &retreat);
    assert_eq!(director.registry().get(hunter).unwrap().state, BehaviorState::Chase);
    let kin_agent = director.registry().get(kin).unwrap();
    assert_eq!(kin_agent.state, BehaviorState::Chase);
    assert_eq!(kin_agent.target, Some(retreat.player.pos));
}

#[test]
fn group_lifecycle_and_retirement() {
    let mut director = director(6);
    let ids: Vec<_> = (0..3)
        .map(|i| director.spawn_enemy("husk", Vec3::new(i as f32, 0.0, 0.0), 1, None))
        .collect();

    let group = director
        .form_group(&ids, Vec3::ZERO, FormationKind::Circle, &FormationParams::default())
        .expect("group forms");
    assert_eq!(director.group(group).unwrap().members().len(), 3);
    assert_eq!(director.state().active_groups, 1);
    for id in &ids {
        let agent = director.registry().get(*id).unwrap();
        assert_eq!(agent.group, Some(group));
        assert!(agent.target.is_some());
    }

    // members can belong to at most one group
    let err = director
        .form_group(&ids, Vec3::ZERO, FormationKind::Line, &FormationParams::default())
        .unwrap_err();
    assert!(matches!(err, GroupError::AlreadyGrouped(_)));

    // once every member is dead the group retires on the next pass
    for id in &ids {
        director.take_damage(*id, 1000.0, DamageSource::Environment);
    }
    director.update(0.1, &world(Vec3::new(50.0, 0.0, 0.0)));
    assert_eq!(director.state().active_groups, 0);
}

#[test]
fn difficulty_feedback_moves_the_tier() {
    let mut director = director(7);
    assert_eq!(director.state().tier, DifficultyTier::Normal);

    for _ in 0..9 {
        director.record_combat(CombatOutcome::PlayerWon, 12.0, 20.0);
    }
    director.record_combat(CombatOutcome::PlayerLost, 40.0, 90.0);

    let state = director.state();
    assert_eq!(state.tier, DifficultyTier::Hard);
    assert_eq!(state.wins, 9);
    assert_eq!(state.losses, 1);
    assert!((state.win_rate - 0.9).abs() < 1e-6);
}

#[test]
fn health_stays_clamped_through_ticks() {
    let mut director = director(8);
    for i in 0..4 {
        director.spawn_enemy("husk", Vec3::new(i as f32 * 3.0, 0.0, 0.0), 2, None);
    }
    let w = world(Vec3::new(2.0, 0.0, 0.0));
    for _ in 0..20 {
        director.update(0.25, &w);
        for agent in director.registry().iter() {
            assert!(agent.health >= 0.0);
            assert!(agent.health <= agent.max_health);
        }
    }
}
