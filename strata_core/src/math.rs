// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal `f32` vector, quaternion, and column-major 4×4 matrix types.
//!
//! These cover exactly what world-transform resolution needs (composition,
//! column access, point transformation, tolerance comparison) without pulling
//! in a full linear-algebra crate. Every type is `#[repr(C)]` and
//! [`Pod`](bytemuck::Pod), so slices of them can be uploaded to an accelerator
//! as-is.

use core::ops::{Add, Index, IndexMut, Mul, Sub};

use bytemuck::{Pod, Zeroable};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A 3-component `f32` vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// All zeroes.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a vector from its components.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Extends to a homogeneous [`Vec4`] with the given `w`.
    #[inline]
    #[must_use]
    pub const fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }
}

/// A 4-component `f32` vector, used both as a matrix column and as a
/// homogeneous point or direction.
///
/// Components are reachable by name (`v.x`) or by index (`v[0]`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vec4 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// W component.
    pub w: f32,
}

impl Vec4 {
    /// All zeroes.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Unit X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    /// Unit Y axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    /// Unit Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    /// Unit W axis (the homogeneous origin).
    pub const W: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a vector from its components.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a vector from an array `[x, y, z, w]`.
    #[inline]
    #[must_use]
    pub const fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    /// Returns the components as `[x, y, z, w]`.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Drops the `w` component.
    #[inline]
    #[must_use]
    pub const fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Dot product.
    #[inline]
    #[must_use]
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    /// Returns `true` if every component differs from `rhs` by at most
    /// `max_abs_diff`.
    #[inline]
    #[must_use]
    pub fn abs_diff_eq(self, rhs: Self, max_abs_diff: f32) -> bool {
        (self.x - rhs.x).abs() <= max_abs_diff
            && (self.y - rhs.y).abs() <= max_abs_diff
            && (self.z - rhs.z).abs() <= max_abs_diff
            && (self.w - rhs.w).abs() <= max_abs_diff
    }
}

impl Index<usize> for Vec4 {
    type Output = f32;

    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Vec4 index {i} out of range"),
        }
    }
}

impl IndexMut<usize> for Vec4 {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Vec4 index {i} out of range"),
        }
    }
}

impl Add for Vec4 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl Sub for Vec4 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
            self.w - rhs.w,
        )
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

/// A rotation quaternion stored scalar-first as `(s, x, y, z)`.
///
/// Nothing here enforces unit length. Converting an unnormalized quaternion
/// to a matrix yields a skewed (non-rigid) matrix.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Quat {
    /// Scalar (real) part.
    pub s: f32,
    /// X of the vector part.
    pub x: f32,
    /// Y of the vector part.
    pub y: f32,
    /// Z of the vector part.
    pub z: f32,
}

impl Quat {
    /// The identity rotation `(1, 0, 0, 0)`.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    /// Creates a quaternion from its scalar and vector parts.
    #[inline]
    #[must_use]
    pub const fn new(s: f32, x: f32, y: f32, z: f32) -> Self {
        Self { s, x, y, z }
    }

    /// Creates a rotation of `radians` around a unit-length `axis`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "trig is evaluated in f64 and narrowed back to storage precision"
    )]
    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Self {
        let half = f64::from(radians) * 0.5;
        #[cfg(feature = "std")]
        let (sin, cos) = half.sin_cos();
        #[cfg(not(feature = "std"))]
        let (sin, cos) = (half.sin(), half.cos());
        let (sin, cos) = (sin as f32, cos as f32);
        Self::new(cos, axis.x * sin, axis.y * sin, axis.z * sin)
    }

    /// Squared norm.
    #[inline]
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.s * self.s + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns this quaternion scaled to unit length.
    ///
    /// A zero quaternion yields NaN components.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "sqrt is evaluated in f64 and narrowed back to storage precision"
    )]
    pub fn normalize(self) -> Self {
        let len = f64::from(self.length_squared()).sqrt() as f32;
        Self::new(self.s / len, self.x / len, self.y / len, self.z / len)
    }
}

impl Default for Quat {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quat {
    type Output = Self;

    /// Hamilton product: `self * rhs` applies `rhs` first, then `self`.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.s * rhs.s - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.s * rhs.x + self.x * rhs.s + self.y * rhs.z - self.z * rhs.y,
            self.s * rhs.y - self.x * rhs.z + self.y * rhs.s + self.z * rhs.x,
            self.s * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.s,
        )
    }
}

/// A column-major 4×4 matrix stored as four [`Vec4`] columns.
///
/// Column `w` carries the translation, matching the memory layout expected by
/// GPU APIs. `a * b` applies `b` first, so a world matrix is always
/// `parent_world * local`.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Mat4 {
    /// First column (image of the X axis).
    pub x: Vec4,
    /// Second column (image of the Y axis).
    pub y: Vec4,
    /// Third column (image of the Z axis).
    pub z: Vec4,
    /// Fourth column (translation).
    pub w: Vec4,
}

impl Mat4 {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, Vec4::W);

    /// Creates a matrix from four columns.
    #[inline]
    #[must_use]
    pub const fn from_cols(x: Vec4, y: Vec4, z: Vec4, w: Vec4) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a matrix from a column-major 2-D array.
    #[inline]
    #[must_use]
    pub const fn from_cols_array_2d(cols: [[f32; 4]; 4]) -> Self {
        Self::from_cols(
            Vec4::from_array(cols[0]),
            Vec4::from_array(cols[1]),
            Vec4::from_array(cols[2]),
            Vec4::from_array(cols[3]),
        )
    }

    /// Returns the columns as a 2-D array.
    #[inline]
    #[must_use]
    pub const fn to_cols_array_2d(self) -> [[f32; 4]; 4] {
        [
            self.x.to_array(),
            self.y.to_array(),
            self.z.to_array(),
            self.w.to_array(),
        ]
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> Vec4 {
        match i {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            3 => self.w,
            _ => panic!("Mat4 column index out of range"),
        }
    }

    /// Creates a pure translation.
    #[inline]
    #[must_use]
    pub const fn from_translation(t: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, t.extend(1.0))
    }

    /// Creates a uniform scale.
    #[inline]
    #[must_use]
    pub const fn from_scale(s: f32) -> Self {
        Self::from_cols(
            Vec4::new(s, 0.0, 0.0, 0.0),
            Vec4::new(0.0, s, 0.0, 0.0),
            Vec4::new(0.0, 0.0, s, 0.0),
            Vec4::W,
        )
    }

    /// Returns the translation (the `xyz` of column `w`).
    #[inline]
    #[must_use]
    pub const fn translation(self) -> Vec3 {
        self.w.truncate()
    }

    /// Transforms a homogeneous vector.
    #[inline]
    #[must_use]
    pub fn mul_vec4(self, v: Vec4) -> Vec4 {
        self.x * v.x + self.y * v.y + self.z * v.z + self.w * v.w
    }

    /// Transforms a point (implicit `w = 1`).
    #[inline]
    #[must_use]
    pub fn transform_point3(self, p: Vec3) -> Vec3 {
        self.mul_vec4(p.extend(1.0)).truncate()
    }

    /// Composes two matrices: the result applies `rhs` first, then `self`.
    ///
    /// Element `(row i, column j)` of the result is the dot product of row `i`
    /// of `self` with column `j` of `rhs`.
    #[inline]
    #[must_use]
    pub fn mul_mat4(self, rhs: Self) -> Self {
        Self::from_cols(
            self.mul_vec4(rhs.x),
            self.mul_vec4(rhs.y),
            self.mul_vec4(rhs.z),
            self.mul_vec4(rhs.w),
        )
    }

    /// Returns `true` if every element differs from `rhs` by at most
    /// `max_abs_diff`.
    #[inline]
    #[must_use]
    pub fn abs_diff_eq(self, rhs: Self, max_abs_diff: f32) -> bool {
        self.x.abs_diff_eq(rhs.x, max_abs_diff)
            && self.y.abs_diff_eq(rhs.y, max_abs_diff)
            && self.z.abs_diff_eq(rhs.z, max_abs_diff)
            && self.w.abs_diff_eq(rhs.w, max_abs_diff)
    }

    /// Is every element [finite]?
    ///
    /// [finite]: f32::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_cols_array_2d()
            .iter()
            .flatten()
            .all(|v| v.is_finite())
    }

    /// Is any element [NaN]?
    ///
    /// [NaN]: f32::is_nan
    #[inline]
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.to_cols_array_2d().iter().flatten().any(|v| v.is_nan())
    }
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_mat4(rhs)
    }
}
