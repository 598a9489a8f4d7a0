//! Vector math and transform types.
//!
//! Coordinates live in the simulator's left-handed frame (x forward, y
//! right, z up in top view); all angles are degrees.  Positions and
//! directions are single-precision — geometry-library distance queries
//! upgrade to `f64` at the polygon boundary.

use cgmath::{InnerSpace, Point3, Vector3};

/// A world-space position in metres.
pub type Location = Point3<f32>;

/// A world-space direction or velocity.
pub type Vector3d = Vector3<f32>;

/// Threshold below which a direction is treated as the zero vector instead
/// of being normalized, to avoid NaNs from near-zero magnitudes.
pub const DIRECTION_EPSILON: f32 = 2.0 * f32::EPSILON;

/// Squared Euclidean distance between two locations.
#[inline]
pub fn distance_squared(a: Location, b: Location) -> f32 {
    (b - a).magnitude2()
}

/// Euclidean distance between two locations.
#[inline]
pub fn distance(a: Location, b: Location) -> f32 {
    (b - a).magnitude()
}

/// Unit vector of `v`, or the zero vector when `|v|` is below
/// [`DIRECTION_EPSILON`].
///
/// A zero result deterministically fails `dot(heading, dir) > 0` style
/// front checks, which is the intended degenerate-direction behavior.
pub fn unit_or_zero(v: Vector3d) -> Vector3d {
    let magnitude = v.magnitude();
    if magnitude > DIRECTION_EPSILON {
        v / magnitude
    } else {
        Vector3d::new(0.0, 0.0, 0.0)
    }
}

/// Left-perpendicular unit vector of `heading` in the horizontal plane
/// (left-handed top view): `unit(-h.y, h.x, 0)`.
#[inline]
pub fn left_perpendicular(heading: Vector3d) -> Vector3d {
    unit_or_zero(Vector3d::new(-heading.y, heading.x, 0.0))
}

/// Project a vector onto the horizontal plane.
#[inline]
pub fn flatten(v: Vector3d) -> Vector3d {
    Vector3d::new(v.x, v.y, 0.0)
}

// ── Rotation ──────────────────────────────────────────────────────────────────

/// An orientation as pitch/yaw/roll Euler angles in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotation {
    #[inline]
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// A rotation in the horizontal plane only.
    #[inline]
    pub fn from_yaw_degrees(yaw: f32) -> Self {
        Self { pitch: 0.0, yaw, roll: 0.0 }
    }

    /// The unit forward vector of this orientation.
    pub fn forward_vector(&self) -> Vector3d {
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        Vector3d::new(cos_pitch * cos_yaw, cos_pitch * sin_yaw, sin_pitch)
    }
}

// ── Transform ─────────────────────────────────────────────────────────────────

/// A position plus orientation, as dispatched back to the simulator for
/// physics-less teleportation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub location: Location,
    pub rotation: Rotation,
}

impl Transform {
    #[inline]
    pub fn new(location: Location, rotation: Rotation) -> Self {
        Self { location, rotation }
    }

    #[inline]
    pub fn forward_vector(&self) -> Vector3d {
        self.rotation.forward_vector()
    }
}

impl Default for Transform {
    /// Origin with identity orientation — used as the defensive output pose
    /// when an actor has no snapshot entry at all.
    fn default() -> Self {
        Self {
            location: Location::new(0.0, 0.0, 0.0),
            rotation: Rotation::default(),
        }
    }
}
