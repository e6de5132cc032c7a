use bevy::math::{Mat2, Vec2};

pub type Real = f32;

pub type Vector = Vec2;
pub type Matrix = Mat2;

#[inline(always)]
pub fn zero_vector() -> Vector {
    Vec2::ZERO
}

#[inline(always)]
pub fn zero_matrix() -> Matrix {
    Mat2::ZERO
}

/// Outer product `a ⊗ b`, i.e. the matrix whose `(i, j)` entry is `a[i] * b[j]`.
#[inline(always)]
pub fn outer_product(a: Vector, b: Vector) -> Matrix {
    Mat2::from_cols(a * b.x, a * b.y)
}

#[inline(always)]
pub fn pow2(x: Real) -> Real {
    x * x
}

/// Exact zero check inverse (prevents NaN from division by zero)
#[inline(always)]
pub fn inv_exact(e: Real) -> Real {
    if e == 0.0 { 0.0 } else { 1.0 / e }
}
