//! Ring-indexed horizontal grids on the sphere.
//!
//! A horizontal field is a flat `Vec<f64>` of grid-point values grouped into
//! rings of constant latitude, ordered north to south, each ring ordered by
//! increasing longitude starting at λ = 0. No 2-D array is ever stored; ring
//! start offsets and lengths make full and reduced Gaussian grids uniform.
//!
//! Per-ring metadata (latitude, cos φ, quadrature weight, Coriolis factor) is
//! precomputed once at construction and shared read-only afterwards.

pub mod gaussian;

use crate::constants::Planet;
use crate::error::ModelError;
use std::ops::Range;

/// Supported horizontal grid families.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridKind {
    /// Gaussian latitudes with the same number of longitudes on every ring
    /// (nlon = 2·nlat).
    FullGaussian,
    /// Gaussian latitudes with nlon(j) = 20 + 4j longitudes on ring j counted
    /// from the pole, mirrored across the equator.
    OctahedralGaussian,
}

/// Descriptor of the horizontal resolution.
#[derive(Clone, Copy, Debug)]
pub struct SpectralGrid {
    /// Triangular truncation L: modes with l ≤ L, |m| ≤ l are retained.
    pub trunc: usize,
    /// Rings per hemisphere (the equator ring of odd-`nlat` full grids counts
    /// as northern).
    pub nlat_half: usize,
    /// Grid family.
    pub kind: GridKind,
}

impl SpectralGrid {
    /// Shorthand for a full Gaussian grid satisfying the truncation's minimum
    /// resolution nlat = 2·nlat_half ≥ (3L+1)/2.
    pub fn for_truncation(trunc: usize) -> Self {
        let nlat = (3 * trunc + 1).div_ceil(2);
        Self {
            trunc,
            nlat_half: nlat.div_ceil(2),
            kind: GridKind::FullGaussian,
        }
    }
}

/// Metadata of a single latitude ring, yielded by [`RingGrid::rings`].
#[derive(Clone, Debug)]
pub struct Ring {
    /// Ring index, 0 at the northernmost ring.
    pub j: usize,
    /// Index range of the ring's points in a flat grid field.
    pub range: Range<usize>,
    /// Number of longitudes on this ring.
    pub nlon: usize,
    /// Latitude φⱼ (radians).
    pub lat: f64,
    /// sin φⱼ, the Legendre argument μ.
    pub sin_lat: f64,
    /// cos φⱼ.
    pub cos_lat: f64,
    /// cos⁻²φⱼ, the scaling between u·cosφ and u/cosφ representations.
    pub coslat_recip2: f64,
    /// Gaussian quadrature weight wⱼ (weights over all rings sum to 2).
    pub weight: f64,
    /// Coriolis factor fⱼ = 2Ω sin φⱼ.
    pub coriolis: f64,
}

/// A Gaussian grid with per-ring latitude metadata.
///
/// Construction validates the truncation/grid compatibility rules; once
/// built, all tables are read-only and may be shared across threads.
#[derive(Clone, Debug)]
pub struct RingGrid {
    kind: GridKind,
    nlat: usize,
    nlat_half: usize,
    n_points: usize,
    /// Ring start offsets, with a sentinel entry at the end.
    offsets: Vec<usize>,
    nlons: Vec<usize>,
    lat: Vec<f64>,
    sin_lat: Vec<f64>,
    cos_lat: Vec<f64>,
    coslat_recip2: Vec<f64>,
    weights: Vec<f64>,
    coriolis: Vec<f64>,
}

impl RingGrid {
    /// Build the grid for a resolution descriptor and planet rotation.
    ///
    /// Fails if the ring count cannot support the truncation
    /// (nlat < (3L+1)/2), if a full grid's rings are too short
    /// (nlon < 3L+1), or if an octahedral grid has an odd ring count.
    pub fn new(spec: &SpectralGrid, planet: &Planet) -> Result<Self, ModelError> {
        let nlat = match spec.kind {
            GridKind::FullGaussian => 2 * spec.nlat_half,
            GridKind::OctahedralGaussian => 2 * spec.nlat_half,
        };
        let required = (3 * spec.trunc + 1).div_ceil(2);
        if nlat < required {
            return Err(ModelError::TruncationTooHigh {
                trunc: spec.trunc,
                nlat,
                required,
            });
        }

        let nlons: Vec<usize> = match spec.kind {
            // nlat ≥ (3L+1)/2 already guarantees nlon = 2·nlat ≥ 3L+1
            GridKind::FullGaussian => vec![2 * nlat; nlat],
            GridKind::OctahedralGaussian => {
                (0..nlat)
                    .map(|j| {
                        let j_pole = j.min(nlat - 1 - j);
                        20 + 4 * j_pole
                    })
                    .collect()
            }
        };

        let (mu, weights) = gaussian::gauss_legendre(nlat);

        let mut offsets = Vec::with_capacity(nlat + 1);
        let mut acc = 0;
        for &n in &nlons {
            offsets.push(acc);
            acc += n;
        }
        offsets.push(acc);

        let lat: Vec<f64> = mu.iter().map(|&m| m.asin()).collect();
        let cos_lat: Vec<f64> = mu.iter().map(|&m| (1.0 - m * m).sqrt()).collect();
        let coslat_recip2: Vec<f64> = mu.iter().map(|&m| 1.0 / (1.0 - m * m)).collect();
        let coriolis: Vec<f64> = mu.iter().map(|&m| 2.0 * planet.rotation * m).collect();

        log::debug!(
            "grid: {:?}, {} rings, {} points, T{} capable",
            spec.kind,
            nlat,
            acc,
            spec.trunc,
        );

        Ok(Self {
            kind: spec.kind,
            nlat,
            nlat_half: nlat.div_ceil(2),
            n_points: acc,
            offsets,
            nlons,
            lat,
            sin_lat: mu,
            cos_lat,
            coslat_recip2,
            weights,
            coriolis,
        })
    }

    /// Grid family.
    #[inline]
    pub fn kind(&self) -> GridKind {
        self.kind
    }

    /// Total number of latitude rings.
    #[inline]
    pub fn nlat(&self) -> usize {
        self.nlat
    }

    /// Rings per hemisphere (equator counts as northern for odd `nlat`).
    #[inline]
    pub fn nlat_half(&self) -> usize {
        self.nlat_half
    }

    /// Total number of grid points.
    #[inline]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Number of longitudes on ring `j`.
    #[inline]
    pub fn nlon(&self, j: usize) -> usize {
        self.nlons[j]
    }

    /// Index range of ring `j` in a flat field.
    #[inline]
    pub fn ring_range(&self, j: usize) -> Range<usize> {
        self.offsets[j]..self.offsets[j + 1]
    }

    /// sin φⱼ of ring `j`.
    #[inline]
    pub fn sin_lat(&self, j: usize) -> f64 {
        self.sin_lat[j]
    }

    /// Gaussian weight of ring `j`.
    #[inline]
    pub fn weight(&self, j: usize) -> f64 {
        self.weights[j]
    }

    /// Metadata of ring `j`.
    pub fn ring(&self, j: usize) -> Ring {
        Ring {
            j,
            range: self.ring_range(j),
            nlon: self.nlons[j],
            lat: self.lat[j],
            sin_lat: self.sin_lat[j],
            cos_lat: self.cos_lat[j],
            coslat_recip2: self.coslat_recip2[j],
            weight: self.weights[j],
            coriolis: self.coriolis[j],
        }
    }

    /// Iterate over all rings north to south.
    ///
    /// This is the single iteration primitive of the grid: dynamics kernels
    /// loop `for ring in grid.rings()` and index flat fields with
    /// `ring.range`, after checking shapes with [`RingGrid::check_shape`].
    pub fn rings(&self) -> impl Iterator<Item = Ring> + '_ {
        (0..self.nlat).map(move |j| self.ring(j))
    }

    /// Assert that a flat field has this grid's shape.
    ///
    /// Shape mismatches are caller errors: immediate and fatal.
    #[inline]
    #[track_caller]
    pub fn check_shape(&self, field: &[f64]) {
        assert_eq!(
            field.len(),
            self.n_points,
            "grid field has {} points, grid has {}",
            field.len(),
            self.n_points
        );
    }

    /// Allocate a zeroed field with this grid's shape.
    pub fn zeros(&self) -> Vec<f64> {
        vec![0.0; self.n_points]
    }

    /// Longitude of point `i` on ring `j` (radians, first point at λ = 0).
    #[inline]
    pub fn lon(&self, j: usize, i: usize) -> f64 {
        2.0 * std::f64::consts::PI * i as f64 / self.nlons[j] as f64
    }

    /// Fill a field from a function of (longitude, latitude) in radians.
    pub fn fill_from_fn(&self, field: &mut [f64], mut f: impl FnMut(f64, f64) -> f64) {
        self.check_shape(field);
        for ring in self.rings() {
            for (i, ij) in ring.range.clone().enumerate() {
                field[ij] = f(self.lon(ring.j, i), ring.lat);
            }
        }
    }
}
