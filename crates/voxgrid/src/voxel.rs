use bytemuck::Pod;
use bytemuck::Zeroable;

/// One node of the voxel tree, a single byte.
///
/// At the deepest level the byte is a material id (0 means empty).
/// At every other level it is a bitfield with one bit per child slot:
/// bit n is set when the child in slot n has any content below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
#[repr(transparent)]
pub struct Voxel(pub u8);

impl Voxel {
    pub const EMPTY: Voxel = Voxel(0);

    /// True when the byte carries no content: an empty leaf or a
    /// bitfield with no occupied children.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Bitfield view: is the child in `slot` (0..8) occupied?
    #[inline]
    pub fn has_child(self, slot: u32) -> bool {
        self.0 & (1 << slot) != 0
    }

    /// Bitfield view: copy with the child bit for `slot` set.
    #[inline]
    pub fn with_child(self, slot: u32) -> Voxel {
        Voxel(self.0 | (1 << slot))
    }

    /// Bitfield view: copy with the child bit for `slot` cleared.
    #[inline]
    pub fn without_child(self, slot: u32) -> Voxel {
        Voxel(self.0 & !(1 << slot))
    }
}

impl Default for Voxel {
    fn default() -> Self {
        Voxel::EMPTY
    }
}
