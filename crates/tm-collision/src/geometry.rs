//! Pairwise polygon geometry with per-tick memoization.

use std::collections::HashMap;

use geo::{EuclideanDistance, LineString, Polygon};
use tm_core::{ActorId, Location};
use tm_snapshot::{KinematicState, SimpleWaypoint, StaticAttributes};

use crate::boundary::{actor_boundary, geodesic_boundary, GeodesicBoundaryCache};
use crate::lock::LockView;

/// The four distances comparing two actors' footprints and corridors.
///
/// The `reference_*`/`other_*` scalars are caller-relative: they swap when
/// the same pair is queried with the roles reversed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeometryComparison {
    /// Reference footprint → other's corridor polygon.
    pub reference_to_other_geodesic: f64,
    /// Other footprint → reference's corridor polygon.
    pub other_to_reference_geodesic: f64,
    /// Corridor polygon → corridor polygon.
    pub inter_geodesic_distance: f64,
    /// Footprint → footprint.
    pub inter_bbox_distance: f64,
}

impl GeometryComparison {
    /// The same comparison seen from the other actor's side.
    fn swapped(self) -> Self {
        Self {
            reference_to_other_geodesic: self.other_to_reference_geodesic,
            other_to_reference_geodesic: self.reference_to_other_geodesic,
            ..self
        }
    }
}

/// Per-tick memo of pairwise comparisons under the unordered `(min, max)`
/// id pair, stored min-actor-relative.
pub type GeometryComparisonCache = HashMap<(ActorId, ActorId), GeometryComparison>;

/// Scratch caches for one ego evaluation.  Never shared across egos.
#[derive(Default)]
pub struct ScratchCaches {
    pub geodesic: GeodesicBoundaryCache,
    pub geometry: GeometryComparisonCache,
}

/// One actor's inputs to a pairwise comparison.
#[derive(Copy, Clone)]
pub struct ActorView<'a> {
    pub id: ActorId,
    pub kinematics: &'a KinematicState,
    pub attributes: &'a StaticAttributes,
    pub buffer: &'a [SimpleWaypoint],
    /// The actor's configured leading-vehicle gap, metres.
    pub lead_distance: f32,
}

/// A closed planar polygon from a boundary vertex list.
///
/// The first vertex is repeated to close the ring explicitly; distance
/// queries return 0 for intersecting or touching polygons.
pub fn boundary_polygon(boundary: &[Location]) -> Polygon<f64> {
    let mut ring: Vec<(f64, f64)> = boundary
        .iter()
        .map(|location| (f64::from(location.x), f64::from(location.y)))
        .collect();
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    Polygon::new(LineString::from(ring), vec![])
}

/// The memoized four-distance comparison between `reference` and `other`.
///
/// On a cache hit where the cached orientation does not match the caller's,
/// the two caller-relative scalars are swapped before returning.
pub fn geometry_between_actors(
    caches: &mut ScratchCaches,
    reference: &ActorView<'_>,
    other: &ActorView<'_>,
    locks: &LockView<'_>,
) -> GeometryComparison {
    let key = ActorId::ordered_pair(reference.id, other.id);
    let reference_is_minor = key.0 == reference.id;

    if let Some(&cached) = caches.geometry.get(&key) {
        return if reference_is_minor {
            cached
        } else {
            cached.swapped()
        };
    }

    let reference_polygon =
        boundary_polygon(&actor_boundary(reference.kinematics, reference.attributes));
    let other_polygon = boundary_polygon(&actor_boundary(other.kinematics, other.attributes));

    let reference_geodesic = boundary_polygon(&geodesic_boundary(
        reference.id,
        &mut caches.geodesic,
        reference.kinematics,
        reference.attributes,
        reference.buffer,
        reference.lead_distance,
        locks,
    ));
    let other_geodesic = boundary_polygon(&geodesic_boundary(
        other.id,
        &mut caches.geodesic,
        other.kinematics,
        other.attributes,
        other.buffer,
        other.lead_distance,
        locks,
    ));

    let comparison = GeometryComparison {
        reference_to_other_geodesic: reference_polygon.euclidean_distance(&other_geodesic),
        other_to_reference_geodesic: other_polygon.euclidean_distance(&reference_geodesic),
        inter_geodesic_distance: reference_geodesic.euclidean_distance(&other_geodesic),
        inter_bbox_distance: reference_polygon.euclidean_distance(&other_polygon),
    };

    caches.geometry.insert(
        key,
        if reference_is_minor {
            comparison
        } else {
            comparison.swapped()
        },
    );
    comparison
}
