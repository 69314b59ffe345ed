//! Bidirectional spherical-harmonic transform on Gaussian ring grids.
//!
//! The forward (grid → spectral) transform FFTs each latitude ring into zonal
//! Fourier coefficients, combines ring pairs mirrored across the equator into
//! even/odd-parity sums, and accumulates Gauss–Legendre quadrature against
//! the P̄ₗᵐ tables. The inverse mirrors it: per-order Legendre synthesis into
//! hemispheric Fourier coefficients, then an inverse FFT per ring.
//!
//! All FFT plans, Legendre tables, ε coefficients and scratch buffers are
//! allocated once at construction; transforms never allocate per call.
//!
//! Degrees run through the tail row l = L+1: the forward transform computes
//! it honestly (the quadrature is exact there at the mandated grid sizes) and
//! the banded recurrence operators consume it. Tendencies are truncated to
//! l ≤ L before they leave the core.

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::collections::HashMap;
use std::sync::Arc;

use super::coeffs::SpectralCoeffs;
use super::legendre::{Epsilon, LegendrePolynomials};
use crate::error::ModelError;
use crate::grid::RingGrid;

/// Precomputed spectral transform for one (grid, truncation) pair.
pub struct SpectralTransform {
    trunc: usize,
    nrows: usize,
    ncols: usize,
    radius: f64,
    nlat: usize,
    nlat_half: usize,
    n_points: usize,
    nlons: Vec<usize>,
    offsets: Vec<usize>,
    weights: Vec<f64>,
    /// Highest zonal wavenumber resolvable on each ring.
    m_max: Vec<usize>,
    eps: Epsilon,
    polys: LegendrePolynomials,
    plans_fwd: HashMap<usize, Arc<dyn Fft<f64>>>,
    plans_inv: HashMap<usize, Arc<dyn Fft<f64>>>,
    // scratch, reused across calls
    ring_buf: Vec<Complex64>,
    fft_scratch: Vec<Complex64>,
    fourier_n: Vec<Complex64>,
    fourier_s: Vec<Complex64>,
    col_a: Vec<Complex64>,
    col_b: Vec<Complex64>,
}

impl SpectralTransform {
    /// Build the transform for a grid, truncation and planet radius.
    ///
    /// Rejects truncations the grid cannot support (nlat < (3L+1)/2).
    pub fn new(grid: &RingGrid, trunc: usize, radius: f64) -> Result<Self, ModelError> {
        let nlat = grid.nlat();
        let required = (3 * trunc + 1).div_ceil(2);
        if nlat < required {
            return Err(ModelError::TruncationTooHigh {
                trunc,
                nlat,
                required,
            });
        }

        let nlat_half = grid.nlat_half();
        let nlons: Vec<usize> = (0..nlat).map(|j| grid.nlon(j)).collect();
        let offsets: Vec<usize> = (0..=nlat)
            .map(|j| if j < nlat { grid.ring_range(j).start } else { grid.n_points() })
            .collect();
        let weights: Vec<f64> = (0..nlat).map(|j| grid.weight(j)).collect();
        let m_max: Vec<usize> = nlons.iter().map(|&n| trunc.min((n - 1) / 2)).collect();

        let eps = Epsilon::new(trunc);
        let sin_lat_north: Vec<f64> = (0..nlat_half).map(|j| grid.sin_lat(j)).collect();
        let polys = LegendrePolynomials::new(trunc, &sin_lat_north, &eps);

        let mut planner = FftPlanner::<f64>::new();
        let mut plans_fwd = HashMap::new();
        let mut plans_inv = HashMap::new();
        let mut scratch_len = 0;
        for &nlon in &nlons {
            plans_fwd
                .entry(nlon)
                .or_insert_with(|| planner.plan_fft_forward(nlon));
            plans_inv
                .entry(nlon)
                .or_insert_with(|| planner.plan_fft_inverse(nlon));
        }
        for plan in plans_fwd.values().chain(plans_inv.values()) {
            scratch_len = scratch_len.max(plan.get_inplace_scratch_len());
        }
        let max_nlon = nlons.iter().copied().max().unwrap_or(0);

        log::debug!(
            "spectral transform: T{}, {} rings, {} FFT plan sizes",
            trunc,
            nlat,
            plans_fwd.len()
        );

        let nrows = trunc + 2;
        let ncols = trunc + 1;
        Ok(Self {
            trunc,
            nrows,
            ncols,
            radius,
            nlat,
            nlat_half,
            n_points: grid.n_points(),
            nlons,
            offsets,
            weights,
            m_max,
            eps,
            polys,
            plans_fwd,
            plans_inv,
            ring_buf: vec![Complex64::new(0.0, 0.0); max_nlon],
            fft_scratch: vec![Complex64::new(0.0, 0.0); scratch_len],
            fourier_n: vec![Complex64::new(0.0, 0.0); ncols],
            fourier_s: vec![Complex64::new(0.0, 0.0); ncols],
            col_a: vec![Complex64::new(0.0, 0.0); nrows],
            col_b: vec![Complex64::new(0.0, 0.0); nrows],
        })
    }

    /// Triangular truncation L.
    #[inline]
    pub fn trunc(&self) -> usize {
        self.trunc
    }

    /// Planet radius the operators are scaled with.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Allocate zeroed spectral coefficients matching this transform.
    pub fn zeros_spectral(&self) -> SpectralCoeffs {
        SpectralCoeffs::zeros(self.trunc)
    }

    #[inline]
    #[track_caller]
    fn check_grid_shape(&self, field: &[f64]) {
        assert_eq!(
            field.len(),
            self.n_points,
            "grid field has {} points, transform expects {}",
            field.len(),
            self.n_points
        );
    }

    #[inline]
    #[track_caller]
    fn check_spectral_shape(&self, coeffs: &SpectralCoeffs) {
        assert_eq!(
            coeffs.trunc(),
            self.trunc,
            "spectral field is T{}, transform is T{}",
            coeffs.trunc(),
            self.trunc
        );
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Forward transform: grid field → spectral coefficients.
    pub fn forward(&mut self, field: &[f64], out: &mut SpectralCoeffs) {
        self.check_grid_shape(field);
        self.check_spectral_shape(out);
        out.fill_zero();

        for jn in 0..self.nlat_half {
            let js = self.nlat - 1 - jn;
            let nlon = self.nlons[jn];
            let mmax = self.m_max[jn];
            let plan = Arc::clone(&self.plans_fwd[&nlon]);

            Self::fourier_analysis(
                &plan,
                &field[self.offsets[jn]..self.offsets[jn] + nlon],
                &mut self.ring_buf,
                &mut self.fft_scratch,
                &mut self.fourier_n,
                mmax,
            );
            Self::fourier_analysis(
                &plan,
                &field[self.offsets[js]..self.offsets[js] + nlon],
                &mut self.ring_buf,
                &mut self.fft_scratch,
                &mut self.fourier_s,
                mmax,
            );

            let w = 0.5 * self.weights[jn];
            for m in 0..=mmax {
                let even = w * (self.fourier_n[m] + self.fourier_s[m]);
                let odd = w * (self.fourier_n[m] - self.fourier_s[m]);
                let plm = self.polys.column(jn, m);
                let out_col = out.column_mut(m);

                let mut l = m;
                while l < self.nrows {
                    out_col[l] += plm[l] * even;
                    l += 2;
                }
                let mut l = m + 1;
                while l < self.nrows {
                    out_col[l] += plm[l] * odd;
                    l += 2;
                }
            }
        }

        // zonal-mean coefficients of a real field are real
        for v in out.column_mut(0) {
            v.im = 0.0;
        }
    }

    /// Inverse transform: spectral coefficients → grid field.
    pub fn inverse(&mut self, coeffs: &SpectralCoeffs, out: &mut [f64]) {
        self.check_grid_shape(out);
        self.check_spectral_shape(coeffs);

        for jn in 0..self.nlat_half {
            let js = self.nlat - 1 - jn;
            let nlon = self.nlons[jn];
            let mmax = self.m_max[jn];
            let plan = Arc::clone(&self.plans_inv[&nlon]);

            for m in 0..=mmax {
                let plm = self.polys.column(jn, m);
                let col = coeffs.column(m);

                let mut even = Complex64::new(0.0, 0.0);
                let mut l = m;
                while l < self.nrows {
                    even += plm[l] * col[l];
                    l += 2;
                }
                let mut odd = Complex64::new(0.0, 0.0);
                let mut l = m + 1;
                while l < self.nrows {
                    odd += plm[l] * col[l];
                    l += 2;
                }

                self.fourier_n[m] = even + odd;
                self.fourier_s[m] = even - odd;
            }

            let start_n = self.offsets[jn];
            Self::fourier_synthesis(
                &plan,
                &self.fourier_n[..=mmax],
                &mut self.ring_buf,
                &mut self.fft_scratch,
                &mut out[start_n..start_n + nlon],
            );
            let start_s = self.offsets[js];
            Self::fourier_synthesis(
                &plan,
                &self.fourier_s[..=mmax],
                &mut self.ring_buf,
                &mut self.fft_scratch,
                &mut out[start_s..start_s + nlon],
            );
        }
    }

    /// FFT one ring into normalized zonal Fourier coefficients F₀ … Fₘₘₐₓ.
    fn fourier_analysis(
        plan: &Arc<dyn Fft<f64>>,
        values: &[f64],
        ring_buf: &mut [Complex64],
        fft_scratch: &mut [Complex64],
        fourier: &mut [Complex64],
        mmax: usize,
    ) {
        let nlon = values.len();
        let buf = &mut ring_buf[..nlon];
        for (b, &v) in buf.iter_mut().zip(values.iter()) {
            *b = Complex64::new(v, 0.0);
        }
        plan.process_with_scratch(buf, fft_scratch);
        let norm = 1.0 / nlon as f64;
        for (m, f) in fourier.iter_mut().enumerate().take(mmax + 1) {
            *f = buf[m] * norm;
        }
    }

    /// Inverse FFT zonal Fourier coefficients back onto one ring.
    fn fourier_synthesis(
        plan: &Arc<dyn Fft<f64>>,
        fourier: &[Complex64],
        ring_buf: &mut [Complex64],
        fft_scratch: &mut [Complex64],
        out: &mut [f64],
    ) {
        let nlon = out.len();
        let buf = &mut ring_buf[..nlon];
        buf.fill(Complex64::new(0.0, 0.0));
        buf[0] = Complex64::new(fourier[0].re, 0.0);
        for (m, &f) in fourier.iter().enumerate().skip(1) {
            buf[m] = f;
            buf[nlon - m] = f.conj();
        }
        plan.process_with_scratch(buf, fft_scratch);
        for (o, b) in out.iter_mut().zip(buf.iter()) {
            *o = b.re;
        }
    }

    // =========================================================================
    // Spectral operators
    // =========================================================================

    /// Zonal derivative ∂F/∂λ scaled by 1/R: multiplies aₗᵐ by i·m/R.
    pub fn gradient_lon(
        &self,
        f: &SpectralCoeffs,
        out: &mut SpectralCoeffs,
        add: bool,
        flipsign: bool,
    ) {
        self.check_spectral_shape(f);
        self.check_spectral_shape(out);
        for m in 0..self.ncols {
            let factor = m as f64 / self.radius;
            let fcol = f.column(m);
            let ocol = out.column_mut(m);
            for l in m..=self.trunc {
                let v = fcol[l];
                store(&mut ocol[l], Complex64::new(-factor * v.im, factor * v.re), add, flipsign);
            }
            if !add {
                ocol[self.trunc + 1] = Complex64::new(0.0, 0.0);
            }
        }
    }

    /// Meridional derivative, grid image cosφ·∂F/∂φ scaled by 1/R.
    ///
    /// Banded recurrence in l through εₗᵐ; the input tail row l = L+1 is
    /// treated as zero, the output tail row is written (degree raised by one).
    pub fn gradient_lat(
        &self,
        f: &SpectralCoeffs,
        out: &mut SpectralCoeffs,
        add: bool,
        flipsign: bool,
    ) {
        self.check_spectral_shape(f);
        self.check_spectral_shape(out);
        let r_inv = 1.0 / self.radius;
        for m in 0..self.ncols {
            let fcol = f.column(m);
            let ocol = out.column_mut(m);
            for l in m..self.nrows {
                let mut v = Complex64::new(0.0, 0.0);
                if l > m {
                    v -= (l as f64 - 1.0) * self.eps.get(l, m) * fcol[l - 1];
                }
                if l + 1 <= self.trunc {
                    v += (l as f64 + 2.0) * self.eps.get(l + 1, m) * fcol[l + 1];
                }
                store(&mut ocol[l], v * r_inv, add, flipsign);
            }
        }
    }

    /// Divergence ∇·(u, v) from a spectral vector field.
    ///
    /// Inputs are the transforms of the cos⁻¹φ-scaled velocities
    /// (u/cosφ, v/cosφ); the cos⁻²φ conversion from the u·cosφ-scaled grid
    /// velocities happens in grid space before the forward transform. The
    /// recurrence reads the tail row of `v`, which carries the degree-(L+1)
    /// content the quadrature preserves; output is band-limited to l ≤ L and
    /// its (0,0) mode is exactly zero.
    pub fn divergence(
        &self,
        u: &SpectralCoeffs,
        v: &SpectralCoeffs,
        out: &mut SpectralCoeffs,
        add: bool,
        flipsign: bool,
    ) {
        self.check_spectral_shape(u);
        self.check_spectral_shape(v);
        self.check_spectral_shape(out);
        let r_inv = 1.0 / self.radius;
        for m in 0..self.ncols {
            let ucol = u.column(m);
            let vcol = v.column(m);
            let ocol = out.column_mut(m);
            for l in m..=self.trunc {
                let uc = ucol[l];
                let mut v_ = Complex64::new(-(m as f64) * uc.im, m as f64 * uc.re);
                if l > m {
                    v_ -= (l as f64 + 1.0) * self.eps.get(l, m) * vcol[l - 1];
                }
                v_ += l as f64 * self.eps.get(l + 1, m) * vcol[l + 1];
                store(&mut ocol[l], v_ * r_inv, add, flipsign);
            }
            if !add {
                ocol[self.trunc + 1] = Complex64::new(0.0, 0.0);
            }
        }
    }

    /// Curl ∇×(u, v) of a spectral vector field; same input scaling as
    /// [`SpectralTransform::divergence`].
    pub fn curl(
        &self,
        u: &SpectralCoeffs,
        v: &SpectralCoeffs,
        out: &mut SpectralCoeffs,
        add: bool,
        flipsign: bool,
    ) {
        self.check_spectral_shape(u);
        self.check_spectral_shape(v);
        self.check_spectral_shape(out);
        let r_inv = 1.0 / self.radius;
        for m in 0..self.ncols {
            let ucol = u.column(m);
            let vcol = v.column(m);
            let ocol = out.column_mut(m);
            for l in m..=self.trunc {
                let vc = vcol[l];
                let mut v_ = Complex64::new(-(m as f64) * vc.im, m as f64 * vc.re);
                if l > m {
                    v_ += (l as f64 + 1.0) * self.eps.get(l, m) * ucol[l - 1];
                }
                v_ -= l as f64 * self.eps.get(l + 1, m) * ucol[l + 1];
                store(&mut ocol[l], v_ * r_inv, add, flipsign);
            }
            if !add {
                ocol[self.trunc + 1] = Complex64::new(0.0, 0.0);
            }
        }
    }

    /// Laplacian: multiplies aₗᵐ by −l(l+1)/R².
    pub fn laplacian(
        &self,
        f: &SpectralCoeffs,
        out: &mut SpectralCoeffs,
        add: bool,
        flipsign: bool,
    ) {
        self.check_spectral_shape(f);
        self.check_spectral_shape(out);
        let r2_inv = 1.0 / (self.radius * self.radius);
        for m in 0..self.ncols {
            let fcol = f.column(m);
            let ocol = out.column_mut(m);
            for l in m..=self.trunc {
                let eig = -((l * (l + 1)) as f64) * r2_inv;
                store(&mut ocol[l], eig * fcol[l], add, flipsign);
            }
            if !add {
                ocol[self.trunc + 1] = Complex64::new(0.0, 0.0);
            }
        }
    }

    /// Inverse Laplacian: multiplies aₗᵐ by −R²/(l(l+1)); the (0,0) mode is
    /// fixed to zero exactly.
    pub fn inv_laplacian(
        &self,
        f: &SpectralCoeffs,
        out: &mut SpectralCoeffs,
        add: bool,
        flipsign: bool,
    ) {
        self.check_spectral_shape(f);
        self.check_spectral_shape(out);
        let r2 = self.radius * self.radius;
        for m in 0..self.ncols {
            let fcol = f.column(m);
            let ocol = out.column_mut(m);
            for l in m..=self.trunc {
                let v = if l == 0 {
                    Complex64::new(0.0, 0.0)
                } else {
                    -r2 / ((l * (l + 1)) as f64) * fcol[l]
                };
                store(&mut ocol[l], v, add, flipsign);
            }
            if !add {
                ocol[self.trunc + 1] = Complex64::new(0.0, 0.0);
            }
        }
    }

    /// Recover the spectral velocities (U, V) = (u·cosφ, v·cosφ) from
    /// vorticity and divergence.
    ///
    /// Solves ∇²Ψ = ζ and ∇²Φ = D, then
    /// U = −cosφ ∂Ψ/∂φ + ∂Φ/∂λ, V = cosφ ∂Φ/∂φ + ∂Ψ/∂λ, all spectral and
    /// scaled by 1/R. The (0,0) mode of Ψ, Φ (and hence U, V) is zero; the
    /// tail rows of U, V carry the degree-(L+1) recurrence content.
    pub fn uv_from_vordiv(
        &mut self,
        vor: &SpectralCoeffs,
        div: &SpectralCoeffs,
        u: &mut SpectralCoeffs,
        v: &mut SpectralCoeffs,
    ) {
        self.check_spectral_shape(vor);
        self.check_spectral_shape(div);
        self.check_spectral_shape(u);
        self.check_spectral_shape(v);
        let r2 = self.radius * self.radius;
        let r_inv = 1.0 / self.radius;

        for m in 0..self.ncols {
            // streamfunction and velocity potential columns
            self.col_a.fill(Complex64::new(0.0, 0.0));
            self.col_b.fill(Complex64::new(0.0, 0.0));
            let vcol = vor.column(m);
            let dcol = div.column(m);
            for l in m.max(1)..=self.trunc {
                let factor = -r2 / ((l * (l + 1)) as f64);
                self.col_a[l] = factor * vcol[l];
                self.col_b[l] = factor * dcol[l];
            }

            let ucol = u.column_mut(m);
            for l in m..self.nrows {
                let phi = self.col_b[l];
                let mut val = Complex64::new(-(m as f64) * phi.im, m as f64 * phi.re);
                if l > m {
                    val += (l as f64 - 1.0) * self.eps.get(l, m) * self.col_a[l - 1];
                }
                if l + 1 < self.nrows {
                    val -= (l as f64 + 2.0) * self.eps.get(l + 1, m) * self.col_a[l + 1];
                }
                ucol[l] = val * r_inv;
            }

            let vcol_out = v.column_mut(m);
            for l in m..self.nrows {
                let psi = self.col_a[l];
                let mut val = Complex64::new(-(m as f64) * psi.im, m as f64 * psi.re);
                if l > m {
                    val -= (l as f64 - 1.0) * self.eps.get(l, m) * self.col_b[l - 1];
                }
                if l + 1 < self.nrows {
                    val += (l as f64 + 2.0) * self.eps.get(l + 1, m) * self.col_b[l + 1];
                }
                vcol_out[l] = val * r_inv;
            }
        }
    }

    /// Recover (U, V) from vorticity alone (zero divergence), the barotropic
    /// special case of [`SpectralTransform::uv_from_vordiv`].
    pub fn uv_from_vor(
        &mut self,
        vor: &SpectralCoeffs,
        u: &mut SpectralCoeffs,
        v: &mut SpectralCoeffs,
    ) {
        self.check_spectral_shape(vor);
        self.check_spectral_shape(u);
        self.check_spectral_shape(v);
        let r2 = self.radius * self.radius;
        let r_inv = 1.0 / self.radius;

        for m in 0..self.ncols {
            self.col_a.fill(Complex64::new(0.0, 0.0));
            let vcol = vor.column(m);
            for l in m.max(1)..=self.trunc {
                self.col_a[l] = -r2 / ((l * (l + 1)) as f64) * vcol[l];
            }

            let ucol = u.column_mut(m);
            let vcol_out = v.column_mut(m);
            for l in m..self.nrows {
                let mut val = Complex64::new(0.0, 0.0);
                if l > m {
                    val += (l as f64 - 1.0) * self.eps.get(l, m) * self.col_a[l - 1];
                }
                if l + 1 < self.nrows {
                    val -= (l as f64 + 2.0) * self.eps.get(l + 1, m) * self.col_a[l + 1];
                }
                ucol[l] = val * r_inv;

                let psi = self.col_a[l];
                vcol_out[l] = Complex64::new(-(m as f64) * psi.im, m as f64 * psi.re) * r_inv;
            }
        }
    }
}

/// Write an operator result honoring the add/flipsign modifiers.
#[inline]
fn store(out: &mut Complex64, val: Complex64, add: bool, flipsign: bool) {
    let v = if flipsign { -val } else { val };
    if add {
        *out += v;
    } else {
        *out = v;
    }
}
