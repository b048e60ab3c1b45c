//! Formation planning: pure geometry from a center, a count, and a kind.
//!
//! The planner has no behavioral logic. Each kind maps 1:1 to a
//! [`Doctrine`] label consumed by the tactics coordinator purely as a tag.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::error::FormationError;
use crate::rng::CombatRng;

/// Geometric layout for a group of agents.
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
pub enum FormationKind {
    Circle,
    Line,
    Wedge,
    Scattered,
}

/// Strategy label derived from the formation kind.
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
pub enum Doctrine {
    Surround,
    FrontalAssault,
    Breakthrough,
    Guerrilla,
}

impl FormationKind {
    /// The doctrine label this formation implies.
    pub fn doctrine(&self) -> Doctrine {
        match self {
            Self::Circle => Doctrine::Surround,
            Self::Line => Doctrine::FrontalAssault,
            Self::Wedge => Doctrine::Breakthrough,
            Self::Scattered => Doctrine::Guerrilla,
        }
    }
}

/// Geometry parameters for the formation kinds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FormationParams {
    /// Circle radius.
    pub radius: f32,
    /// Spacing between neighbors in line and wedge rows.
    pub spacing: f32,
    /// Maximum radius for scattered placement.
    pub scatter_max: f32,
}

impl Default for FormationParams {
    fn default() -> Self {
        Self {
            radius: 5.0,
            spacing: 2.0,
            scatter_max: 8.0,
        }
    }
}

/// Compute `count` target positions around `center` for the given kind.
///
/// Scattered placement draws from the injected RNG; all other kinds are
/// fully deterministic in their inputs.
pub fn positions(
    center: Vec3,
    count: usize,
    kind: FormationKind,
    params: &FormationParams,
    rng: &mut dyn CombatRng,
) -> Result<Vec<Vec3>, FormationError> {
    if count == 0 {
        return Err(FormationError::Empty);
    }
    match kind {
        FormationKind::Circle => {
            if params.radius <= 0.0 {
                return Err(FormationError::DegenerateParams("radius"));
            }
            Ok(circle(center, count, params.radius))
        }
        FormationKind::Line => {
            if params.spacing <= 0.0 {
                return Err(FormationError::DegenerateParams("spacing"));
            }
            Ok(line(center, count, params.spacing))
        }
        FormationKind::Wedge => {
            if params.spacing <= 0.0 {
                return Err(FormationError::DegenerateParams("spacing"));
            }
            Ok(wedge(center, count, params.spacing))
        }
        FormationKind::Scattered => {
            if params.scatter_max <= 0.0 {
                return Err(FormationError::DegenerateParams("scatter_max"));
            }
            Ok(scattered(center, count, params.scatter_max, rng))
        }
    }
}

/// Points evenly spaced on a circle around the center.
fn circle(center: Vec3, count: usize, radius: f32) -> Vec<Vec3> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            center + Vec3::new(angle.cos(), 0.0, angle.sin()) * radius
        })
        .collect()
}

/// Points evenly spaced along a horizontal line centered on the center.
fn line(center: Vec3, count: usize, spacing: f32) -> Vec<Vec3> {
    let half = (count as f32 - 1.0) * 0.5;
    (0..count)
        .map(|i| center + Vec3::new((i as f32 - half) * spacing, 0.0, 0.0))
        .collect()
}

/// Triangular rows growing by two per row (1, 3, 5, ...), offset behind the
/// center.
fn wedge(center: Vec3, count: usize, spacing: f32) -> Vec<Vec3> {
    let mut points = Vec::with_capacity(count);
    let mut row = 0usize;
    while points.len() < count {
        let width = 2 * row + 1;
        let half = (width as f32 - 1.0) * 0.5;
        for col in 0..width {
            if points.len() == count {
                break;
            }
            points.push(
                center
                    + Vec3::new((col as f32 - half) * spacing, 0.0, row as f32 * spacing),
            );
        }
        row += 1;
    }
    points
}

/// Points at uniform random angle and radius within the scatter bound.
fn scattered(center: Vec3, count: usize, max_radius: f32, rng: &mut dyn CombatRng) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let angle = rng.range_f32(0.0, TAU);
            let radius = rng.range_f32(0.0, max_radius);
            center + Vec3::new(angle.cos(), 0.0, angle.sin()) * radius
        })
        .collect()
}
