use glam::IVec3;
use glam::Vec3;

use crate::axis::Axis;
use crate::geom::Aabb;
use crate::geom::Ray;
use crate::grid::VoxelGrid;
use crate::intersect::ray_aabb_intersection;
use crate::voxel::Voxel;

/// Outcome of walking a ray through the grid.
///
/// `voxel_coord` is the voxel the walk resolved on: the first non-empty
/// voxel when one was found, otherwise the last voxel the ray reached
/// before running out of grid, length, or step budget. `distance`,
/// `point` and `normal` come from an exact ray-box test against that
/// voxel's unit cube, measured from the caller's ray origin. The normal
/// is `None` when the ray starts inside the resolved voxel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub voxel_coord: IVec3,
    pub voxel: Voxel,
    pub found_nonempty: bool,
    pub distance: f32,
    pub point: Vec3,
    pub normal: Option<Axis>,
}

/// Walk a ray voxel by voxel through the grid.
///
/// Visits every voxel the segment passes through, in order, crossing at
/// most `max_voxels` boundaries. With `stop_on_nonempty` the walk ends
/// at the first occupied voxel and the hit reports `found_nonempty`.
/// Returns `None` only when the ray never reaches an in-bounds voxel.
pub fn traverse(
    ray: &Ray,
    grid: &VoxelGrid,
    stop_on_nonempty: bool,
    max_voxels: usize,
) -> Option<Hit> {
    let bounds = grid.bounding_box();

    // Find the starting voxel. A ray starting outside the grid gets its
    // origin advanced to the point where it enters; the entry test runs
    // unbounded because the segment length only gates the walk itself.
    let (origin, entry_distance, mut current) = if bounds.contains_point(ray.origin) {
        (ray.origin, 0.0, ray.origin.round().as_ivec3())
    } else {
        let probe = Ray {
            origin: ray.origin,
            direction: ray.direction,
            length: f32::MAX,
        };
        let entry = ray_aabb_intersection(&probe, &bounds)?;
        let origin = ray.point_at(entry.distance);
        let mut current = origin.round().as_ivec3();
        // On the entry axis the advanced origin sits exactly on a voxel
        // boundary; take the coordinate from the face rather than
        // rounding a half-integer.
        if let Some(axis) = entry.normal {
            let i = axis.index();
            current[i] = if axis.sign() > 0 {
                grid.max_coord()[i]
            } else {
                grid.min_coord()[i]
            };
        }
        (origin, entry.distance, current)
    };

    // Per-axis stepping state: coordinate increment, distance along the
    // ray between two boundaries of that axis, and distance to the
    // first boundary. Zero-direction axes keep infinite distances and
    // never win the selection below.
    let mut step = IVec3::ZERO;
    let mut t_delta = Vec3::splat(f32::MAX);
    let mut t_next = Vec3::splat(f32::MAX);
    for i in 0..3 {
        let dir = ray.direction[i];
        if dir > 0.0 {
            step[i] = 1;
            t_delta[i] = 1.0 / dir;
            t_next[i] = (current[i] as f32 + 0.5 - origin[i]) * t_delta[i];
        } else if dir < 0.0 {
            step[i] = -1;
            t_delta[i] = 1.0 / dir.abs();
            t_next[i] = (origin[i] - (current[i] as f32 - 0.5)) * t_delta[i];
        }
    }

    let mut previous: Option<IVec3> = None;
    let mut found_nonempty = false;
    let mut traversed = 0usize;

    while traversed < max_voxels && grid.contains(current) {
        if stop_on_nonempty && !grid.voxel_unchecked(current).is_empty() {
            found_nonempty = true;
            break;
        }
        previous = Some(current);

        // Step along the axis whose next boundary is closest; equal
        // distances fall through to the later branch. Stop without
        // stepping once that boundary lies past the segment end.
        if t_next.x < t_next.y {
            if t_next.x < t_next.z {
                if t_next.x > ray.length {
                    break;
                }
                current.x += step.x;
                t_next.x += t_delta.x;
            } else {
                if t_next.z > ray.length {
                    break;
                }
                current.z += step.z;
                t_next.z += t_delta.z;
            }
        } else if t_next.y < t_next.z {
            if t_next.y > ray.length {
                break;
            }
            current.y += step.y;
            t_next.y += t_delta.y;
        } else {
            if t_next.z > ray.length {
                break;
            }
            current.z += step.z;
            t_next.z += t_delta.z;
        }

        traversed += 1;
    }

    let resolved = if grid.contains(current) {
        current
    } else {
        previous?
    };

    // Recompute the exact hit against the resolved voxel's cube instead
    // of trusting accumulated stepping error.
    let probe = Ray {
        origin,
        direction: ray.direction,
        length: f32::MAX,
    };
    let local = ray_aabb_intersection(&probe, &Aabb::voxel_box(resolved))?;

    let distance = entry_distance + local.distance;
    Some(Hit {
        voxel_coord: resolved,
        voxel: grid.voxel_unchecked(resolved),
        found_nonempty,
        distance,
        point: ray.origin + ray.direction * distance,
        normal: local.normal,
    })
}
