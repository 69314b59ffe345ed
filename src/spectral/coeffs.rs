//! Packed triangular storage for spherical-harmonic coefficients.
//!
//! A field of triangular truncation L stores complex coefficients aₗᵐ for
//! 0 ≤ m ≤ l ≤ L plus one extra "tail" degree l = L+1 per order, which the
//! banded ε-recurrences of the meridional operators reference without
//! branching. Storage is a dense (L+2) × (L+1) rectangle, column-major over
//! the order m, so each order's degrees are contiguous.
//!
//! Invariants:
//! - entries above the diagonal (m > l) are exactly zero and never read,
//! - the (l=0, m=0) entry is real (imaginary part stored as zero).

use num_complex::Complex64;

/// Spectral coefficients of one horizontal field, packed lower-triangular.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralCoeffs {
    trunc: usize,
    nrows: usize,
    ncols: usize,
    data: Vec<Complex64>,
}

impl SpectralCoeffs {
    /// Allocate zeroed coefficients for truncation `trunc`.
    pub fn zeros(trunc: usize) -> Self {
        let nrows = trunc + 2;
        let ncols = trunc + 1;
        Self {
            trunc,
            nrows,
            ncols,
            data: vec![Complex64::new(0.0, 0.0); nrows * ncols],
        }
    }

    /// Triangular truncation L.
    #[inline]
    pub fn trunc(&self) -> usize {
        self.trunc
    }

    /// Number of stored degrees per order, L+2 (including the tail row).
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of stored orders, L+1.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    fn idx(&self, l: usize, m: usize) -> usize {
        debug_assert!(m <= l, "coefficient ({}, {}) above the diagonal", l, m);
        debug_assert!(l < self.nrows && m < self.ncols);
        m * self.nrows + l
    }

    /// Coefficient aₗᵐ.
    #[inline]
    pub fn get(&self, l: usize, m: usize) -> Complex64 {
        self.data[self.idx(l, m)]
    }

    /// Set coefficient aₗᵐ.
    #[inline]
    pub fn set(&mut self, l: usize, m: usize, value: Complex64) {
        let i = self.idx(l, m);
        self.data[i] = value;
    }

    /// Add into coefficient aₗᵐ.
    #[inline]
    pub fn add(&mut self, l: usize, m: usize, value: Complex64) {
        let i = self.idx(l, m);
        self.data[i] += value;
    }

    /// Degrees l = m … L+1 of order `m` as a contiguous slice, indexed by l.
    ///
    /// The returned slice spans all rows of the column; entries with l < m
    /// are the zero padding above the diagonal.
    #[inline]
    pub fn column(&self, m: usize) -> &[Complex64] {
        &self.data[m * self.nrows..(m + 1) * self.nrows]
    }

    /// Mutable access to the full column of order `m`, indexed by l.
    #[inline]
    pub fn column_mut(&mut self, m: usize) -> &mut [Complex64] {
        &mut self.data[m * self.nrows..(m + 1) * self.nrows]
    }

    /// Raw coefficient storage, column-major over m.
    ///
    /// The padding above the diagonal is zero; elementwise arithmetic across
    /// whole arrays keeps it zero.
    #[inline]
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Mutable raw coefficient storage.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [Complex64] {
        &mut self.data
    }

    /// Reset all coefficients to zero.
    pub fn fill_zero(&mut self) {
        self.data.fill(Complex64::new(0.0, 0.0));
    }

    /// Multiply all coefficients by a real constant.
    pub fn scale(&mut self, c: f64) {
        for v in &mut self.data {
            *v *= c;
        }
    }

    /// self ← self + c·other.
    pub fn axpy(&mut self, c: f64, other: &Self) {
        self.check_same_shape(other);
        for (v, &o) in self.data.iter_mut().zip(other.data.iter()) {
            *v += o * c;
        }
    }

    /// Copy coefficients from another array of the same truncation.
    pub fn copy_from(&mut self, other: &Self) {
        self.check_same_shape(other);
        self.data.copy_from_slice(&other.data);
    }

    /// Zero the tail row l = L+1.
    ///
    /// Transforms and recurrence operators may leave content there; it must
    /// not reach the time integrator.
    pub fn truncate(&mut self) {
        let (nrows, trunc) = (self.nrows, self.trunc);
        for m in 0..self.ncols {
            self.data[m * nrows + trunc + 1] = Complex64::new(0.0, 0.0);
        }
    }

    /// Damp high-degree coefficients: modes with l > fraction·L are scaled by
    /// 1/(1 + strength·(l/L)^power). Used to smooth ingested boundary fields.
    pub fn smooth(&mut self, strength: f64, power: f64, fraction: f64) {
        let trunc = self.trunc as f64;
        let l_start = (fraction * trunc).ceil() as usize;
        for m in 0..self.ncols {
            let col = &mut self.data[m * self.nrows..(m + 1) * self.nrows];
            for (l, v) in col.iter_mut().enumerate().skip(l_start.max(m)) {
                let ratio = l as f64 / trunc;
                *v *= 1.0 / (1.0 + strength * ratio.powf(power));
            }
        }
    }

    /// Iterate over stored (l, m) pairs with m ≤ l ≤ L+1, column by column.
    pub fn iter_lm(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let nrows = self.nrows;
        (0..self.ncols).flat_map(move |m| (m..nrows).map(move |l| (l, m)))
    }

    /// Maximum absolute value over stored coefficients (L∞ norm).
    pub fn linf_norm(&self) -> f64 {
        self.iter_lm()
            .map(|(l, m)| self.get(l, m).norm())
            .fold(0.0, f64::max)
    }

    /// Assert another array has the same truncation.
    #[inline]
    #[track_caller]
    pub fn check_same_shape(&self, other: &Self) {
        assert_eq!(
            self.trunc, other.trunc,
            "spectral truncations differ: T{} vs T{}",
            self.trunc, other.trunc
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape() {
        let c = SpectralCoeffs::zeros(21);
        assert_eq!(c.trunc(), 21);
        assert_eq!(c.nrows(), 23);
        assert_eq!(c.ncols(), 22);
        assert_eq!(c.column(0).len(), 23);
    }

    #[test]
    fn test_set_get_roundtrip() {
        let mut c = SpectralCoeffs::zeros(5);
        c.set(3, 2, Complex64::new(1.5, -0.5));
        assert_eq!(c.get(3, 2), Complex64::new(1.5, -0.5));
        assert_eq!(c.get(3, 3), Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_columns_are_contiguous() {
        let mut c = SpectralCoeffs::zeros(4);
        c.set(2, 1, Complex64::new(7.0, 0.0));
        assert_eq!(c.column(1)[2], Complex64::new(7.0, 0.0));
    }

    #[test]
    fn test_truncate_zeros_tail() {
        let mut c = SpectralCoeffs::zeros(4);
        for m in 0..=4 {
            c.set(5, m, Complex64::new(1.0, 1.0));
        }
        c.truncate();
        for m in 0..=4 {
            assert_eq!(c.get(5, m), Complex64::new(0.0, 0.0));
        }
    }

    #[test]
    fn test_axpy() {
        let mut a = SpectralCoeffs::zeros(3);
        let mut b = SpectralCoeffs::zeros(3);
        a.set(1, 0, Complex64::new(1.0, 0.0));
        b.set(1, 0, Complex64::new(2.0, 1.0));
        a.axpy(0.5, &b);
        assert_eq!(a.get(1, 0), Complex64::new(2.0, 0.5));
    }

    #[test]
    fn test_smooth_leaves_low_modes() {
        let mut c = SpectralCoeffs::zeros(10);
        for (l, m) in [(1, 0), (10, 0)] {
            c.set(l, m, Complex64::new(1.0, 0.0));
        }
        c.smooth(1.0, 2.0, 0.5);
        assert_eq!(c.get(1, 0), Complex64::new(1.0, 0.0));
        assert!(c.get(10, 0).re < 1.0);
    }

    #[test]
    #[should_panic(expected = "spectral truncations differ")]
    fn test_shape_mismatch_panics() {
        let mut a = SpectralCoeffs::zeros(3);
        let b = SpectralCoeffs::zeros(4);
        a.axpy(1.0, &b);
    }
}
