use glam::IVec3;
use glam::Vec3;

/// Axis-aligned normal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Axis {
    /// Convert to Vec3 normal
    pub fn as_vec3(self) -> Vec3 {
        match self {
            Axis::PosX => Vec3::X,
            Axis::NegX => -Vec3::X,
            Axis::PosY => Vec3::Y,
            Axis::NegY => -Vec3::Y,
            Axis::PosZ => Vec3::Z,
            Axis::NegZ => -Vec3::Z,
        }
    }

    /// Convert to IVec3 normal
    pub fn as_ivec3(self) -> IVec3 {
        match self {
            Axis::PosX => IVec3::X,
            Axis::NegX => -IVec3::X,
            Axis::PosY => IVec3::Y,
            Axis::NegY => -IVec3::Y,
            Axis::PosZ => IVec3::Z,
            Axis::NegZ => -IVec3::Z,
        }
    }

    /// Get the opposite axis
    pub fn opposite(self) -> Self {
        match self {
            Axis::PosX => Axis::NegX,
            Axis::NegX => Axis::PosX,
            Axis::PosY => Axis::NegY,
            Axis::NegY => Axis::PosY,
            Axis::PosZ => Axis::NegZ,
            Axis::NegZ => Axis::PosZ,
        }
    }

    /// Component index: 0=X, 1=Y, 2=Z
    #[inline]
    pub fn index(self) -> usize {
        (self as usize) >> 1
    }

    /// Sign: 1 for Pos*, -1 for Neg*
    #[inline]
    pub fn sign(self) -> i32 {
        1 - ((self as i32) & 1) * 2
    }

    /// Construct from component index and sign
    #[inline]
    pub fn from_index_sign(index: usize, sign: i32) -> Self {
        const TABLE: [Axis; 6] = [
            Axis::NegX,
            Axis::PosX,
            Axis::NegY,
            Axis::PosY,
            Axis::NegZ,
            Axis::PosZ,
        ];
        TABLE[index * 2 + ((sign + 1) >> 1) as usize]
    }
}
