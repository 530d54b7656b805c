use glam::IVec3;
use glam::Vec3;

/// Axis-aligned bounding box with inclusive faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb { min, max }
    }

    /// Unit cube centered on an integer voxel coordinate.
    pub fn voxel_box(coord: IVec3) -> Self {
        let center = coord.as_vec3();
        Aabb {
            min: center - Vec3::splat(0.5),
            max: center + Vec3::splat(0.5),
        }
    }

    /// Point-in-box test, boundary included on all faces.
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Finite ray segment. The direction is unit length; `length` is the
/// distance from the origin to the far end of the segment.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub length: f32,
}

impl Ray {
    /// Build a ray, normalizing `direction`. A zero or non-finite
    /// direction is not a valid ray.
    pub fn new(origin: Vec3, direction: Vec3, length: f32) -> Self {
        let direction = direction.normalize();
        debug_assert!(direction.is_finite(), "ray direction must be non-zero");
        Ray {
            origin,
            direction,
            length,
        }
    }

    /// Point at `distance` along the ray.
    pub fn point_at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Infinite plane in normal-distance form: dot(normal, p) == distance.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Plane {
            normal,
            distance: normal.dot(point),
        }
    }
}
