use glam::UVec3;

/// Index of a node in the flat tree array.
///
/// Bits of the coordinate offset are interleaved x, y, z from the low
/// end, and a guard bit is set just above them. The guard bit makes
/// indices unique across levels and turns parent/child navigation into
/// shifts: `index >> 3` is the parent and `index & 7` the child slot.
/// The root sits at index 1; index 0 is never used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const ROOT: NodeIndex = NodeIndex(1);

    /// Encode a node offset at `level` (root is level 0, each level
    /// down doubles the side). Offsets are unsigned, in [0, 2^level).
    #[inline]
    pub fn encode(offset: UVec3, level: u32) -> NodeIndex {
        debug_assert!(offset.cmplt(UVec3::splat(1 << level)).all());
        let guard = 1u32 << (3 * level);
        NodeIndex(part1_by_2(offset.x) | part1_by_2(offset.y) << 1 | part1_by_2(offset.z) << 2 | guard)
    }

    /// Recover the node offset. `level` must match the level the index
    /// was encoded at.
    #[inline]
    pub fn decode(self, level: u32) -> UVec3 {
        let bits = self.0 & !(1u32 << (3 * level));
        UVec3::new(
            compact_by_2(bits),
            compact_by_2(bits >> 1),
            compact_by_2(bits >> 2),
        )
    }

    #[inline]
    pub fn parent(self) -> NodeIndex {
        NodeIndex(self.0 >> 3)
    }

    #[inline]
    pub fn child(self, slot: u32) -> NodeIndex {
        NodeIndex(self.0 << 3 | slot)
    }

    /// Which of the parent's eight slots this node occupies.
    #[inline]
    pub fn child_slot(self) -> u32 {
        self.0 & 7
    }

    #[inline]
    pub fn is_root(self) -> bool {
        self.0 == 1
    }

    #[inline]
    pub fn to_usize(self) -> usize {
        self.0 as usize
    }
}

/// Spread the low 10 bits of `v` so that bit n lands at bit 3n.
#[inline]
fn part1_by_2(v: u32) -> u32 {
    let v = v & 0x0000_03FF;
    let v = (v ^ (v << 16)) & 0x0300_00FF;
    let v = (v ^ (v << 8)) & 0x0300_F00F;
    let v = (v ^ (v << 4)) & 0x030C_30C3;
    (v ^ (v << 2)) & 0x0924_9249
}

/// Inverse of `part1_by_2`: gather every third bit back together.
#[inline]
fn compact_by_2(v: u32) -> u32 {
    let v = v & 0x0924_9249;
    let v = (v ^ (v >> 2)) & 0x030C_30C3;
    let v = (v ^ (v >> 4)) & 0x0300_F00F;
    let v = (v ^ (v >> 8)) & 0x0300_00FF;
    (v ^ (v >> 16)) & 0x0000_03FF
}
