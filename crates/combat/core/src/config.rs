/// Combat configuration constants and tunable parameters.
///
/// Compile-time constants bound container sizes and are used as type
/// parameters; runtime fields tune the behavior of the FSM, the tactics
/// coordinator, and the boss phase controller.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatConfig {
    /// Seconds a dead agent stays queryable in the registry before removal.
    pub death_grace_secs: f64,

    // ===== behavior state machine =====
    /// Alert level seeded when a patrol/idle agent first spots the player.
    pub alert_seed: f32,
    /// Alert accumulation rate per second while the player stays in range.
    pub alert_rate: f32,
    /// Alert level at which an agent commits to the chase.
    pub alert_full: f32,
    /// Speed factor applied while wandering between patrol waypoints.
    pub patrol_speed_factor: f32,
    /// Radius around the current position for random patrol waypoints.
    pub wander_radius: f32,
    /// Distance at which a move target counts as reached.
    pub arrive_epsilon: f32,
    /// Radius of the pack call emitted when a pack hunter starts chasing.
    pub pack_call_radius: f32,
    /// Per-tick probability that a hurt defensive agent breaks off to flee.
    pub defensive_flee_chance: f32,
    /// Seconds between regular (non-boss) attack swings.
    pub attack_interval_secs: f64,

    // ===== group tactics =====
    /// Stagger between consecutive members' strikes in a combo attack.
    pub combo_delay_secs: f64,
    /// Lateral offset from the player for each flanking half.
    pub flank_offset: f32,
    /// How far in front of a weak member a guard stations itself.
    pub guard_standoff: f32,
    /// Fraction of max health restored per second by a healer's support.
    pub heal_rate_fraction: f32,

    // ===== boss phase controller =====
    /// Seconds the transition lock holds after a phase advances.
    pub phase_lock_secs: f64,
    /// Seconds of invulnerability granted on a phase transition.
    pub phase_invuln_secs: f64,
    /// Fraction of max health restored on a phase transition.
    pub phase_heal_fraction: f32,
    /// One-shot damage multiplier applied at soft enrage.
    pub enrage_attack_mult: f32,
    /// One-shot attack-speed multiplier applied at soft enrage.
    pub enrage_haste: f64,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum abilities carried by a single agent.
    pub const MAX_ABILITIES: usize = 16;
    /// Maximum phases in a boss phase table.
    pub const MAX_PHASES: usize = 6;
    /// Maximum extra abilities granted by an elite modifier.
    pub const MAX_ELITE_ABILITIES: usize = 4;
    /// Size of the recent-damage ring kept in agent memory.
    pub const MAX_RECENT_DAMAGE: usize = 8;

    pub fn new() -> Self {
        Self {
            death_grace_secs: 5.0,
            alert_seed: 50.0,
            alert_rate: 50.0,
            alert_full: 100.0,
            patrol_speed_factor: 0.5,
            wander_radius: 8.0,
            arrive_epsilon: 0.5,
            pack_call_radius: 15.0,
            defensive_flee_chance: 0.02,
            attack_interval_secs: 1.5,
            combo_delay_secs: 0.4,
            flank_offset: 6.0,
            guard_standoff: 2.0,
            heal_rate_fraction: 0.05,
            phase_lock_secs: 1.5,
            phase_invuln_secs: 2.0,
            phase_heal_fraction: 0.10,
            enrage_attack_mult: 1.5,
            enrage_haste: 1.5,
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
