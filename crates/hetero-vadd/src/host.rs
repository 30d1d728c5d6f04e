//! Host-side executions of the same addition: a sequential reference, a
//! data-parallel loop over shared memory, and a fixed-size pipelined
//! function in the style of an HLS kernel.

use rayon::prelude::*;

use crate::error::Result;
use crate::vector::{N, Vector, same_len};

/// Sequential reference.
pub fn vector_add(a: &Vector, b: &Vector) -> Vector {
    let mut c = [0.0; N];
    for i in 0..N {
        c[i] = a[i] + b[i];
    }
    c
}

/// Runs `f(i)` for every `i in 0..n` on the rayon pool and collects the
/// results in index order.
pub fn parallel_for<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    (0..n).into_par_iter().map(f).collect()
}

/// Data-parallel elementwise sum. All three slices must have the same
/// length; `c` is left untouched otherwise.
pub fn parallel_vector_add(a: &[f32], b: &[f32], c: &mut [f32]) -> Result<()> {
    same_len(c.len(), &[a.len(), b.len()])?;
    c.par_iter_mut()
        .zip(a.par_iter().zip(b.par_iter()))
        .for_each(|(c, (a, b))| *c = a + b);
    Ok(())
}

/// One element per step over a compile-time length, no early exit.
pub fn pipelined_vector_add<const L: usize>(a: &[f32; L], b: &[f32; L], c: &mut [f32; L]) {
    for i in 0..L {
        c[i] = a[i] + b[i];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClError;
    use crate::vector::{A, B, EXPECTED};
    use pretty_assertions::assert_eq;

    #[test]
    fn sequential_matches_expected() {
        assert_eq!(vector_add(&A, &B), EXPECTED);
    }

    #[test]
    fn parallel_for_keeps_index_order() {
        let c = parallel_for(N, |i| A[i] + B[i]);
        assert_eq!(c, EXPECTED.to_vec());
    }

    #[test]
    fn parallel_add_fills_output() {
        let mut c = [0.0; N];
        parallel_vector_add(&A, &B, &mut c).unwrap();
        assert_eq!(c, EXPECTED);
    }

    #[test]
    fn parallel_add_rejects_short_output() {
        let mut c = [0.0; 2];
        let err = parallel_vector_add(&A, &B, &mut c).unwrap_err();
        assert!(matches!(err, ClError::Length { expected: 2, found: 3 }));
        assert_eq!(c, [0.0, 0.0]);
    }

    #[test]
    fn parallel_add_rejects_long_output() {
        let mut c = [-1.0; 5];
        let err = parallel_vector_add(&A, &B, &mut c).unwrap_err();
        assert!(matches!(err, ClError::Length { expected: 5, found: 3 }));
        assert_eq!(c, [-1.0; 5]);
    }

    #[test]
    fn parallel_add_rejects_short_second_input() {
        let mut c = [0.0; N];
        let err = parallel_vector_add(&A, &[1.0, 2.0], &mut c).unwrap_err();
        assert!(matches!(err, ClError::Length { expected: 3, found: 2 }));
    }

    #[test]
    fn pipelined_matches_expected() {
        let mut c = [0.0; N];
        pipelined_vector_add(&A, &B, &mut c);
        assert_eq!(c, EXPECTED);
    }
}
