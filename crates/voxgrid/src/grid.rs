use glam::IVec3;
use glam::UVec3;
use glam::Vec3;
use thiserror::Error;
use tracing::debug;

use crate::geom::Aabb;
use crate::morton::NodeIndex;
use crate::voxel::Voxel;

/// Smallest usable octree depth: a 2x2x2 grid with a lone root above it.
pub const MIN_DEPTH: u32 = 2;
/// Largest supported octree depth: a 512x512x512 grid.
pub const MAX_DEPTH: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("voxel coordinate {coord} outside grid bounds {min}..={max}")]
    OutOfBounds {
        coord: IVec3,
        min: IVec3,
        max: IVec3,
    },
}

/// One octree node changed: `voxel` is the byte now stored at `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeUpdate {
    pub index: NodeIndex,
    pub voxel: Voxel,
}

type UpdateHook = Box<dyn FnMut(NodeUpdate)>;

/// Sparse voxel octree stored in one flat array.
///
/// Every node lives at its Morton index: the root at index 1, leaves on
/// the deepest level. Leaf bytes hold material ids, interior bytes hold
/// child occupancy bitfields, so walking from a leaf to the root is a
/// shift by three per level. Voxel coordinates are signed and centered
/// on the origin; each voxel is a unit cube centered on its coordinate.
pub struct VoxelGrid {
    depth: u32,
    side: i32,
    nodes: Vec<Voxel>,
    update_hook: Option<UpdateHook>,
}

impl VoxelGrid {
    /// Create an empty grid. `depth` counts octree levels including the
    /// root, so the grid spans `2^(depth-1)` voxels per edge.
    ///
    /// Panics when `depth` is outside [`MIN_DEPTH`]..=[`MAX_DEPTH`].
    pub fn new(depth: u32) -> VoxelGrid {
        assert!(
            (MIN_DEPTH..=MAX_DEPTH).contains(&depth),
            "octree depth {depth} outside supported range {MIN_DEPTH}..={MAX_DEPTH}"
        );
        let side = 1i32 << (depth - 1);
        let volume = (side as usize).pow(3);
        VoxelGrid {
            depth,
            side,
            nodes: vec![Voxel::EMPTY; volume * 2],
            update_hook: None,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Voxels per grid edge.
    pub fn side(&self) -> i32 {
        self.side
    }

    pub fn min_coord(&self) -> IVec3 {
        IVec3::splat(-self.side / 2)
    }

    pub fn max_coord(&self) -> IVec3 {
        IVec3::splat(self.side / 2 - 1)
    }

    /// World-space box enclosing every voxel cube in the grid.
    pub fn bounding_box(&self) -> Aabb {
        Aabb::new(
            self.min_coord().as_vec3() - Vec3::splat(0.5),
            self.max_coord().as_vec3() + Vec3::splat(0.5),
        )
    }

    pub fn contains(&self, coord: IVec3) -> bool {
        coord.cmpge(self.min_coord()).all() && coord.cmple(self.max_coord()).all()
    }

    pub(crate) fn ensure_contains(&self, coord: IVec3) -> Result<(), GridError> {
        if !self.contains(coord) {
            return Err(GridError::OutOfBounds {
                coord,
                min: self.min_coord(),
                max: self.max_coord(),
            });
        }
        Ok(())
    }

    /// Flat index of the leaf node for a voxel coordinate.
    pub fn leaf_index(&self, coord: IVec3) -> Result<NodeIndex, GridError> {
        self.ensure_contains(coord)?;
        Ok(self.leaf_index_unchecked(coord))
    }

    fn leaf_index_unchecked(&self, coord: IVec3) -> NodeIndex {
        let offset = (coord - self.min_coord()).as_uvec3();
        NodeIndex::encode(offset, self.depth - 1)
    }

    pub fn get_voxel(&self, coord: IVec3) -> Result<Voxel, GridError> {
        Ok(self.nodes[self.leaf_index(coord)?.to_usize()])
    }

    /// Leaf read without the bounds check. Callers must have validated
    /// the coordinate already.
    pub(crate) fn voxel_unchecked(&self, coord: IVec3) -> Voxel {
        debug_assert!(self.contains(coord));
        self.nodes[self.leaf_index_unchecked(coord).to_usize()]
    }

    /// Raw node read, any level. Indexing past the node array panics.
    pub fn node(&self, index: NodeIndex) -> Voxel {
        self.nodes[index.to_usize()]
    }

    /// Write one voxel and keep every ancestor bitfield consistent.
    ///
    /// Storing a non-empty voxel sets child bits upward until it finds
    /// an ancestor that already knew about this subtree. Storing the
    /// empty voxel clears the leaf's bit in its parent, then keeps
    /// clearing upward as long as nodes empty out. Each bitfield that
    /// changes is reported through the update hook; the leaf write
    /// itself is not.
    pub fn set_voxel(&mut self, coord: IVec3, voxel: Voxel) -> Result<(), GridError> {
        let index = self.leaf_index(coord)?;
        if voxel.is_empty() {
            self.clear_leaf(index);
        } else {
            self.store_leaf(index, voxel);
        }
        Ok(())
    }

    fn store_leaf(&mut self, index: NodeIndex, voxel: Voxel) {
        self.nodes[index.to_usize()] = voxel;

        let mut current = index;
        for _ in 0..self.depth - 1 {
            let parent = current.parent();
            let slot = current.child_slot();
            if self.nodes[parent.to_usize()].has_child(slot) {
                // A set bit means the path to the root already exists.
                break;
            }
            let bitfield = self.nodes[parent.to_usize()].with_child(slot);
            self.nodes[parent.to_usize()] = bitfield;
            self.notify(parent, bitfield);
            current = parent;
        }
    }

    fn clear_leaf(&mut self, index: NodeIndex) {
        if self.nodes[index.to_usize()].is_empty() {
            return;
        }
        self.nodes[index.to_usize()] = Voxel::EMPTY;

        // The leaf's own bit in its parent always goes away.
        let mut current = index.parent();
        let bitfield = self.nodes[current.to_usize()].without_child(index.child_slot());
        self.nodes[current.to_usize()] = bitfield;
        self.notify(current, bitfield);

        // Keep clearing upward as long as entire subtrees empty out.
        for _ in 0..self.depth - 2 {
            if !self.nodes[current.to_usize()].is_empty() {
                break;
            }
            let parent = current.parent();
            let bitfield = self.nodes[parent.to_usize()].without_child(current.child_slot());
            self.nodes[parent.to_usize()] = bitfield;
            self.notify(parent, bitfield);
            current = parent;
        }
    }

    /// Install a callback that receives every bitfield update made by
    /// [`VoxelGrid::set_voxel`]. Replaces any previous hook.
    pub fn set_update_hook(&mut self, hook: impl FnMut(NodeUpdate) + 'static) {
        self.update_hook = Some(Box::new(hook));
    }

    pub fn clear_update_hook(&mut self) {
        self.update_hook = None;
    }

    fn notify(&mut self, index: NodeIndex, voxel: Voxel) {
        if let Some(hook) = self.update_hook.as_mut() {
            hook(NodeUpdate { index, voxel });
        }
    }

    /// Bulk-populate the grid from a per-voxel function, then rebuild
    /// all interior bitfields from scratch. Existing content is
    /// overwritten and the update hook does not fire.
    pub fn fill_with<F>(&mut self, mut f: F)
    where
        F: FnMut(IVec3) -> Voxel,
    {
        let leaf_level = self.depth - 1;
        let min = self.min_coord();
        let max = self.max_coord();
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    let coord = IVec3::new(x, y, z);
                    let offset = (coord - min).as_uvec3();
                    self.nodes[NodeIndex::encode(offset, leaf_level).to_usize()] = f(coord);
                }
            }
        }
        self.rebuild_bitfields();
        debug!(depth = self.depth, side = self.side, "filled voxel grid");
    }

    /// Recompute every interior bitfield from its children, deepest
    /// level first.
    fn rebuild_bitfields(&mut self) {
        for level in (0..self.depth - 1).rev() {
            let first = 1usize << (3 * level);
            for i in first..first * 2 {
                let mut bitfield = Voxel::EMPTY;
                for slot in 0..8u32 {
                    if !self.nodes[i * 8 + slot as usize].is_empty() {
                        bitfield = bitfield.with_child(slot);
                    }
                }
                self.nodes[i] = bitfield;
            }
        }
    }

    /// The node array as raw bytes, in index order. Suitable for
    /// uploading to a GPU buffer or writing to disk.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.nodes)
    }

    fn offset_to_coord(&self, offset: UVec3) -> IVec3 {
        offset.as_ivec3() + self.min_coord()
    }

    /// Coordinate of a leaf node, the inverse of [`VoxelGrid::leaf_index`].
    pub fn leaf_coord(&self, index: NodeIndex) -> IVec3 {
        self.offset_to_coord(index.decode(self.depth - 1))
    }
}
