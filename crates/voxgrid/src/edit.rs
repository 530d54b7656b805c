use glam::IVec3;
use tracing::debug;

use crate::grid::GridError;
use crate::grid::VoxelGrid;
use crate::voxel::Voxel;

/// Overwrite a rectangular region of voxels with one value.
///
/// The region is inclusive on both corners. Applying the operation
/// captures the voxels it overwrites so it can be reverted cell by
/// cell.
#[derive(Debug, Clone)]
pub struct SetBoxOp {
    min: IVec3,
    max: IVec3,
    value: Voxel,
    captured: Vec<Voxel>,
}

impl SetBoxOp {
    /// Corners may be given in any order; bounds normalize per
    /// component.
    pub fn new(corner_a: IVec3, corner_b: IVec3, value: Voxel) -> SetBoxOp {
        SetBoxOp {
            min: corner_a.min(corner_b),
            max: corner_a.max(corner_b),
            value,
            captured: Vec::new(),
        }
    }

    /// Normalized inclusive bounds of the region.
    pub fn bounds(&self) -> (IVec3, IVec3) {
        (self.min, self.max)
    }

    fn apply(&mut self, grid: &mut VoxelGrid) -> Result<(), GridError> {
        self.captured.clear();
        for x in self.min.x..=self.max.x {
            for y in self.min.y..=self.max.y {
                for z in self.min.z..=self.max.z {
                    let coord = IVec3::new(x, y, z);
                    self.captured.push(grid.get_voxel(coord)?);
                    grid.set_voxel(coord, self.value)?;
                }
            }
        }
        Ok(())
    }

    fn revert(&self, grid: &mut VoxelGrid) -> Result<(), GridError> {
        let mut i = 0;
        for x in self.min.x..=self.max.x {
            for y in self.min.y..=self.max.y {
                for z in self.min.z..=self.max.z {
                    grid.set_voxel(IVec3::new(x, y, z), self.captured[i])?;
                    i += 1;
                }
            }
        }
        Ok(())
    }
}

/// A reversible grid edit. Every variant carries the state it needs to
/// undo itself.
#[derive(Debug, Clone)]
pub enum EditOp {
    SetBox(SetBoxOp),
}

impl EditOp {
    fn validate(&self, grid: &VoxelGrid) -> Result<(), GridError> {
        match self {
            EditOp::SetBox(op) => {
                grid.ensure_contains(op.min)?;
                grid.ensure_contains(op.max)
            }
        }
    }

    fn apply(&mut self, grid: &mut VoxelGrid) -> Result<(), GridError> {
        match self {
            EditOp::SetBox(op) => op.apply(grid),
        }
    }

    fn revert(&self, grid: &mut VoxelGrid) -> Result<(), GridError> {
        match self {
            EditOp::SetBox(op) => op.revert(grid),
        }
    }
}

/// Bounded undo/redo history over grid edits.
///
/// Executing a new operation discards everything past the cursor; when
/// the history is full the oldest entry is evicted. Redo re-runs the
/// operation against the grid as it stands, re-capturing the state it
/// overwrites.
pub struct EditHistory {
    ops: Vec<EditOp>,
    cursor: usize,
    capacity: usize,
}

impl EditHistory {
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// Panics when `capacity` is zero.
    pub fn new(capacity: usize) -> EditHistory {
        assert!(capacity > 0, "edit history capacity must be at least 1");
        EditHistory {
            ops: Vec::new(),
            cursor: 0,
            capacity,
        }
    }

    /// Validate, apply, and record an operation. A rejected operation
    /// leaves both the grid and the history untouched.
    pub fn execute(&mut self, grid: &mut VoxelGrid, mut op: EditOp) -> Result<(), GridError> {
        op.validate(grid)?;
        op.apply(grid)?;

        self.ops.truncate(self.cursor);
        if self.ops.len() == self.capacity {
            self.ops.remove(0);
        }
        self.ops.push(op);
        self.cursor = self.ops.len();
        debug!(applied = self.cursor, "executed grid edit");
        Ok(())
    }

    /// Revert the operation before the cursor. Returns false when there
    /// is nothing to undo.
    pub fn undo(&mut self, grid: &mut VoxelGrid) -> Result<bool, GridError> {
        if self.cursor == 0 {
            return Ok(false);
        }
        self.cursor -= 1;
        self.ops[self.cursor].revert(grid)?;
        Ok(true)
    }

    /// Re-apply the operation at the cursor. Returns false when there
    /// is nothing to redo.
    pub fn redo(&mut self, grid: &mut VoxelGrid) -> Result<bool, GridError> {
        if self.cursor == self.ops.len() {
            return Ok(false);
        }
        self.ops[self.cursor].apply(grid)?;
        self.cursor += 1;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.ops.len()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        EditHistory::new(Self::DEFAULT_CAPACITY)
    }
}
