// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node local transforms and their conversion to matrices.

use bytemuck::{Pod, Zeroable};

use crate::math::{Mat4, Quat, Vec3, Vec4};

/// A node's transform relative to its parent: uniform scale, then rotation,
/// then translation.
///
/// The field order and `#[repr(C)]` layout match the accelerator-side struct,
/// so a `&[LocalTransform]` can be uploaded with [`bytemuck::cast_slice`].
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct LocalTransform {
    /// Uniform scale factor.
    pub scale: f32,
    /// Rotation, scalar-first. Expected to be unit length.
    pub rotation: Quat,
    /// Translation in parent space.
    pub position: Vec3,
}

impl LocalTransform {
    /// Scale 1, no rotation, no translation.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        rotation: Quat::IDENTITY,
        position: Vec3::ZERO,
    };

    /// Creates a transform from its parts.
    #[inline]
    #[must_use]
    pub const fn new(scale: f32, rotation: Quat, position: Vec3) -> Self {
        Self {
            scale,
            rotation,
            position,
        }
    }

    /// A pure translation.
    #[inline]
    #[must_use]
    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Converts to a column-major matrix.
    ///
    /// The upper 3×3 block is the rotation matrix of `rotation` multiplied by
    /// `scale`; column `w` is `(position, 1)`. The quaternion is used as-is:
    /// a non-unit quaternion produces a skewed matrix rather than an error.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        let Quat { s, x, y, z } = self.rotation;
        let scale = self.scale;

        let x2 = x + x;
        let y2 = y + y;
        let z2 = z + z;

        let xx2 = x2 * x;
        let xy2 = x2 * y;
        let xz2 = x2 * z;
        let yy2 = y2 * y;
        let yz2 = y2 * z;
        let zz2 = z2 * z;

        let sx2 = x2 * s;
        let sy2 = y2 * s;
        let sz2 = z2 * s;

        Mat4::from_cols(
            Vec4::new(1.0 - yy2 - zz2, xy2 + sz2, xz2 - sy2, 0.0) * scale,
            Vec4::new(xy2 - sz2, 1.0 - xx2 - zz2, yz2 + sx2, 0.0) * scale,
            Vec4::new(xz2 + sy2, yz2 - sx2, 1.0 - xx2 - yy2, 0.0) * scale,
            self.position.extend(1.0),
        )
    }
}

impl Default for LocalTransform {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<LocalTransform> for Mat4 {
    #[inline]
    fn from(t: LocalTransform) -> Self {
        t.to_matrix()
    }
}
