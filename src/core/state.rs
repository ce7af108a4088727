//! Fixed-size state vectors of the dynamical systems.
use std::fmt;

/// A fixed-size vector of state variables.
///
/// The integrators only need the linear-combination primitives below, which keeps every step allocation free.
pub trait StateVector: Copy + PartialEq + fmt::Debug {
    /// The number of state variables.
    const DIM: usize;

    /// Returns the vector with all entries set to zero.
    fn zeros() -> Self;

    /// Returns the entries of the vector.
    fn as_slice(&self) -> &[f64];

    /// Returns the mutable entries of the vector.
    fn as_mut_slice(&mut self) -> &mut [f64];

    /// Returns `self + a * x`.
    fn axpy(&self, a: f64, x: &Self) -> Self;

    /// Returns `true` if every entry is finite.
    fn is_finite(&self) -> bool {
        self.as_slice().iter().all(|x| x.is_finite())
    }
}

impl<const N: usize> StateVector for [f64; N] {
    const DIM: usize = N;

    fn zeros() -> Self {
        [0.0; N]
    }

    fn as_slice(&self) -> &[f64] {
        &self[..]
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self[..]
    }

    #[inline]
    fn axpy(&self, a: f64, x: &Self) -> Self {
        let mut y = *self;
        for (yi, xi) in y.iter_mut().zip(x.iter()) {
            *yi += a * xi;
        }
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axpy() {
        let x = [1.0, -2.0, 0.5];
        let y = [0.0, 1.0, 1.0];
        assert_eq!(y.axpy(2.0, &x), [2.0, -3.0, 2.0]);
        assert_eq!(<[f64; 3]>::DIM, 3);
    }

    #[test]
    fn test_is_finite() {
        assert!([0.0, 1.0].is_finite());
        assert!(![0.0, f64::NAN].is_finite());
        assert!(![f64::INFINITY, 1.0].is_finite());
    }
}
