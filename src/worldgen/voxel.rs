//! # Voxel Module
//!
//! The per-voxel record written by the chunk generator.

/// Number of bytes in one voxel record.
pub const VOXEL_BYTES: usize = std::mem::size_of::<Voxel>();

/// A single generated voxel: a density byte followed by an RGB color.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute together with the `bytemuck` derives guarantees the record
/// is exactly the four bytes `[value, r, g, b]` with no padding, so a flat chunk buffer
/// can be viewed as `&[Voxel]` without copying.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Voxel {
    /// Density / occupancy proxy.
    pub value: u8,
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Voxel {
    /// Builds a voxel from its density and color.
    pub fn new(value: u8, [r, g, b]: [u8; 3]) -> Self {
        Voxel { value, r, g, b }
    }

    /// The color as an `[r, g, b]` triple.
    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}
