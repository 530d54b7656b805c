use glam::Vec3;

use crate::axis::Axis;
use crate::geom::Aabb;
use crate::geom::Plane;
use crate::geom::Ray;

/// Result of a ray-box test. `normal` is the outward face normal of the
/// entry face, `None` when the ray starts inside the box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxHit {
    pub distance: f32,
    pub normal: Option<Axis>,
}

/// Result of a ray-plane test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneHit {
    pub distance: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Slab test of a ray segment against a box.
///
/// The hit interval is clipped to [0, ray.length]. Axes where the
/// direction component vanishes only reject when the origin lies
/// outside that slab.
pub fn ray_aabb_intersection(ray: &Ray, aabb: &Aabb) -> Option<BoxHit> {
    let mut t_min = 0.0_f32;
    let mut t_max = ray.length;
    let mut normal = None;

    for i in 0..3 {
        let dir = ray.direction[i];
        if dir.abs() < f32::EPSILON {
            if ray.origin[i] < aabb.min[i] || ray.origin[i] > aabb.max[i] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let mut t1 = (aabb.min[i] - ray.origin[i]) * inv;
        let mut t2 = (aabb.max[i] - ray.origin[i]) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        if t1 > t_min {
            t_min = t1;
            let sign = if dir > 0.0 { 1 } else { -1 };
            normal = Some(Axis::from_index_sign(i, sign).opposite());
        }
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    Some(BoxHit {
        distance: t_min,
        normal,
    })
}

/// Ray segment against an infinite plane. Misses when the ray runs
/// parallel to the plane or the crossing lies outside (0, ray.length).
pub fn ray_plane_intersection(ray: &Ray, plane: &Plane) -> Option<PlaneHit> {
    let denom = plane.normal.dot(ray.direction);
    if denom == 0.0 {
        return None;
    }
    let distance = (plane.distance - plane.normal.dot(ray.origin)) / denom;
    if distance <= 0.0 || distance >= ray.length {
        return None;
    }
    Some(PlaneHit {
        distance,
        point: ray.point_at(distance),
        normal: plane.normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_ray_hits_box_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 100.0);
        let hit = ray_aabb_intersection(&ray, &Aabb::voxel_box(IVec3::ZERO)).unwrap();
        assert_eq!(hit.distance, 4.5);
        assert_eq!(hit.normal, Some(Axis::NegZ));
    }

    #[test]
    fn test_ray_starting_inside_box() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 100.0);
        let hit = ray_aabb_intersection(&ray, &Aabb::voxel_box(IVec3::ZERO)).unwrap();
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.normal, None);
    }

    #[test]
    fn test_ray_too_short_for_box() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 3.0);
        assert!(ray_aabb_intersection(&ray, &Aabb::voxel_box(IVec3::ZERO)).is_none());
    }

    #[test]
    fn test_box_behind_ray() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, 100.0);
        assert!(ray_aabb_intersection(&ray, &Aabb::voxel_box(IVec3::ZERO)).is_none());
    }

    #[test]
    fn test_parallel_axis_inside_slab_still_hits() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, -5.0), Vec3::Z, 100.0);
        let hit = ray_aabb_intersection(&ray, &Aabb::voxel_box(IVec3::ZERO)).unwrap();
        assert_eq!(hit.normal, Some(Axis::NegZ));
    }

    #[test]
    fn test_parallel_axis_outside_slab_misses() {
        let ray = Ray::new(Vec3::new(2.0, 0.0, -5.0), Vec3::Z, 100.0);
        assert!(ray_aabb_intersection(&ray, &Aabb::voxel_box(IVec3::ZERO)).is_none());
    }

    #[test]
    fn test_entry_normal_tracks_latest_axis() {
        // Enters the y slab after the x slab, so the normal comes from y.
        let ray = Ray::new(Vec3::new(-2.5, -3.0, 0.0), Vec3::new(1.0, 1.0, 0.0), 100.0);
        let hit = ray_aabb_intersection(&ray, &Aabb::voxel_box(IVec3::ZERO)).unwrap();
        assert_eq!(hit.normal, Some(Axis::NegY));
        assert!((hit.distance - 2.5 * 2.0_f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_rays_through_center_always_hit() {
        let cases = [
            (Vec3::new(0.0, 0.0, -5.0), Vec3::Z),
            (Vec3::new(0.0, 0.0, 5.0), -Vec3::Z),
            (Vec3::new(-5.0, 0.0, 0.0), Vec3::X),
            (Vec3::new(5.0, 0.0, 0.0), -Vec3::X),
            (Vec3::new(0.0, -5.0, 0.0), Vec3::Y),
            (Vec3::new(0.0, 5.0, 0.0), -Vec3::Y),
            (Vec3::new(-3.0, -3.0, -3.0), Vec3::ONE),
        ];
        for (i, (origin, direction)) in cases.iter().enumerate() {
            let ray = Ray::new(*origin, *direction, 100.0);
            let hit = ray_aabb_intersection(&ray, &Aabb::voxel_box(IVec3::ZERO));
            match hit {
                Some(hit) => assert!(hit.distance > 0.0, "case {}: distance not positive", i),
                None => panic!("case {}: ray through the center must hit", i),
            }
        }
    }

    #[test]
    fn test_ray_plane_crossing() {
        let plane = Plane::from_point_normal(Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y, 10.0);
        let hit = ray_plane_intersection(&ray, &plane).unwrap();
        assert_eq!(hit.distance, 3.0);
        assert_eq!(hit.point, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(hit.normal, Vec3::Y);
    }

    #[test]
    fn test_ray_plane_parallel_misses() {
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Y);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::X, 10.0);
        assert!(ray_plane_intersection(&ray, &plane).is_none());
    }

    #[test]
    fn test_ray_plane_is_open_interval() {
        let plane = Plane::from_point_normal(Vec3::ZERO, Vec3::Y);
        // Crossing exactly at the origin.
        let on_plane = Ray::new(Vec3::ZERO, -Vec3::Y, 10.0);
        assert!(ray_plane_intersection(&on_plane, &plane).is_none());
        // Crossing exactly at the segment end.
        let at_end = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y, 5.0);
        assert!(ray_plane_intersection(&at_end, &plane).is_none());
    }
}
