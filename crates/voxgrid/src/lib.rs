mod axis;
mod edit;
mod geom;
mod grid;
mod intersect;
mod morton;
mod raycast;
mod voxel;

pub use axis::Axis;
pub use edit::{EditHistory, EditOp, SetBoxOp};
pub use geom::{Aabb, Plane, Ray};
pub use grid::{GridError, NodeUpdate, VoxelGrid, MAX_DEPTH, MIN_DEPTH};
pub use intersect::{ray_aabb_intersection, ray_plane_intersection, BoxHit, PlaneHit};
pub use morton::NodeIndex;
pub use raycast::{traverse, Hit};
pub use voxel::Voxel;

// Re-export glam for convenience
pub use glam;
