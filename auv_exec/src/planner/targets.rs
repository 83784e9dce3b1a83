//! # Target sequences from the marker map

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Quaternion, UnitQuaternion};
use rand::seq::SliceRandom;

// Internal
use super::params::{PlannerParams, SequenceKind};
use crate::geom::Pose;
use comms_if::eqpt::map::MapMsg;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Derive an ordered target sequence from the marker map.
///
/// `Down` targets sit directly above each marker at the cruise depth.
/// `Forward` targets stand off in front of each marker, after rotating the
/// marker orientation from the map frame into the world frame.
pub fn targets_from_map(map: &MapMsg, params: &PlannerParams, shuffle: bool) -> Vec<Pose> {
    let mut targets: Vec<Pose> = map
        .markers
        .iter()
        .map(|marker| match params.sequence {
            SequenceKind::Down => {
                let mut target = Pose::from_wire(&marker.pose);
                target.z = params.z_target_m;
                target
            }
            SequenceKind::Forward => {
                let o = marker.pose.orientation;
                let marker_f_map =
                    UnitQuaternion::from_quaternion(Quaternion::new(o[3], o[0], o[1], o[2]));
                let marker_f_world = map_to_world_rotation() * marker_f_map;
                let (_, _, yaw) = marker_f_world.euler_angles();

                Pose::new(
                    marker.pose.position[0] + yaw.cos() * params.xy_offset_m,
                    marker.pose.position[1] + yaw.sin() * params.xy_offset_m,
                    params.z_target_m,
                    yaw,
                )
            }
        })
        .collect();

    if shuffle {
        targets.shuffle(&mut rand::thread_rng());
    }

    targets
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Fixed rotation from the marker map frame to the world frame.
fn map_to_world_rotation() -> UnitQuaternion<f64> {
    let half_sqrt = (0.5f64).sqrt();
    UnitQuaternion::from_quaternion(Quaternion::new(half_sqrt, 0.0, 0.0, -half_sqrt))
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::eqpt::map::Marker;

    fn map_with_markers(count: usize) -> MapMsg {
        MapMsg {
            t: comms_if::Timestamp(1),
            markers: (0..count)
                .map(|i| Marker {
                    id: i as u32,
                    pose: Pose::new(i as f64, 2.0 * i as f64, 0.0, 0.0).to_wire(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_down_targets_at_cruise_depth() {
        let params = PlannerParams::default();
        let targets = targets_from_map(&map_with_markers(3), &params, false);

        assert_eq!(targets.len(), 3);
        for (i, target) in targets.iter().enumerate() {
            assert_eq!(target.x, i as f64);
            assert_eq!(target.z, params.z_target_m);
        }
    }

    #[test]
    fn test_shuffle_preserves_targets() {
        let params = PlannerParams::default();
        let map = map_with_markers(8);

        let plain = targets_from_map(&map, &params, false);
        let mut shuffled = targets_from_map(&map, &params, true);

        assert_eq!(plain.len(), shuffled.len());

        // Same multiset of x coordinates
        let mut xs: Vec<f64> = plain.iter().map(|t| t.x).collect();
        let mut xs_shuffled: Vec<f64> = shuffled.drain(..).map(|t| t.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        xs_shuffled.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, xs_shuffled);
    }

    #[test]
    fn test_forward_targets_stand_off() {
        let mut params = PlannerParams::default();
        params.sequence = SequenceKind::Forward;

        let targets = targets_from_map(&map_with_markers(1), &params, false);
        assert_eq!(targets.len(), 1);

        // Stand-off distance from the marker position on the xy plane
        let marker = Pose::new(0.0, 0.0, 0.0, 0.0);
        assert!((targets[0].distance_xy(&marker) - params.xy_offset_m).abs() < 1e-9);
        assert_eq!(targets[0].z, params.z_target_m);
    }
}
