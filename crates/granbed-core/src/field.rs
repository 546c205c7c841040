//! Field names and per-particle field maps.
//!
//! Field names come from the `ITEM: ATOMS` header of a dump file, so they
//! are carried as strings. The handful of names the analysis depends on
//! (identifier, positions, radius) are exposed as constants here.

use indexmap::IndexMap;

/// Column holding the particle identifier. Never stored as a data field.
pub const FIELD_ID: &str = "id";
/// Absolute x coordinate.
pub const FIELD_X: &str = "x";
/// Absolute y coordinate.
pub const FIELD_Y: &str = "y";
/// Box-scaled x coordinate.
pub const FIELD_XS: &str = "xs";
/// Box-scaled y coordinate.
pub const FIELD_YS: &str = "ys";
/// Particle radius.
pub const FIELD_RADIUS: &str = "radius";

/// Scalar field values of one particle at one timestep, in header order.
pub type FieldMap = IndexMap<String, f64>;

/// Per-timestep field sequences of one particle, in first-seen order.
pub type SeriesFieldMap = IndexMap<String, Vec<f64>>;

/// Whether a position field is in box units or absolute units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PositionKind {
    /// `x` / `y`.
    Absolute,
    /// `xs` / `ys`.
    Scaled,
}

/// One of the two in-plane axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl Axis {
    /// Both axes, in differentiation order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Name of the position field of the given kind on this axis.
    pub fn position_field(self, kind: PositionKind) -> &'static str {
        match (self, kind) {
            (Axis::X, PositionKind::Absolute) => FIELD_X,
            (Axis::X, PositionKind::Scaled) => FIELD_XS,
            (Axis::Y, PositionKind::Absolute) => FIELD_Y,
            (Axis::Y, PositionKind::Scaled) => FIELD_YS,
        }
    }

    /// Classify `name` as a position field on this axis, if it is one.
    pub fn position_kind(self, name: &str) -> Option<PositionKind> {
        [PositionKind::Absolute, PositionKind::Scaled]
            .into_iter()
            .find(|&kind| self.position_field(kind) == name)
    }

    /// Velocity field derived from a position field of the given kind.
    ///
    /// `x` → `v_x`, `xs` → `vs_x`.
    pub fn velocity_field(self, kind: PositionKind) -> &'static str {
        match (self, kind) {
            (Axis::X, PositionKind::Absolute) => "v_x",
            (Axis::X, PositionKind::Scaled) => "vs_x",
            (Axis::Y, PositionKind::Absolute) => "v_y",
            (Axis::Y, PositionKind::Scaled) => "vs_y",
        }
    }

    /// Acceleration field derived from a position field of the given kind.
    ///
    /// `x` → `a_x`, `xs` → `as_x`.
    pub fn acceleration_field(self, kind: PositionKind) -> &'static str {
        match (self, kind) {
            (Axis::X, PositionKind::Absolute) => "a_x",
            (Axis::X, PositionKind::Scaled) => "as_x",
            (Axis::Y, PositionKind::Absolute) => "a_y",
            (Axis::Y, PositionKind::Scaled) => "as_y",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}
