//! The fixed host-side inputs every example adds.

use std::fmt::Display;
use std::ops::Add;

use crate::error::{ClError, Result};

/// Element count of the demo vectors.
pub const N: usize = 3;

pub type Vector = [f32; N];

pub const A: Vector = [1.0, 2.0, 3.0];
pub const B: Vector = [5.0, 6.0, 8.0];
pub const EXPECTED: Vector = [6.0, 8.0, 11.0];

/// Element count of the interoperability examples.
pub const INTEROP_LEN: usize = 4;

/// `a[i] = i`, `b[i] = i + offset`.
pub fn interop_inputs(offset: i32) -> ([i32; INTEROP_LEN], [i32; INTEROP_LEN]) {
    let mut a = [0; INTEROP_LEN];
    let mut b = [0; INTEROP_LEN];
    for (i, (x, y)) in a.iter_mut().zip(b.iter_mut()).enumerate() {
        *x = i as i32;
        *y = i as i32 + offset;
    }
    (a, b)
}

/// Fails with the first length in `found` that differs from `expected`.
pub fn same_len(expected: usize, found: &[usize]) -> Result<()> {
    match found.iter().find(|&&len| len != expected) {
        Some(&found) => Err(ClError::Length { expected, found }),
        None => Ok(()),
    }
}

/// Checks `c[i] == a[i] + b[i]` for every element.
pub fn check_sum<T>(a: &[T], b: &[T], c: &[T]) -> Result<()>
where
    T: Copy + Add<Output = T> + PartialEq + Display,
{
    same_len(a.len(), &[b.len(), c.len()])?;
    for (index, ((&x, &y), &z)) in a.iter().zip(b).zip(c).enumerate() {
        let expected = x + y;
        if z != expected {
            return Err(ClError::Mismatch {
                index,
                expected: expected.to_string(),
                found: z.to_string(),
            });
        }
    }
    Ok(())
}
