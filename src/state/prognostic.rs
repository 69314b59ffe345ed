//! Prognostic spectral state with leapfrog time slices.

use crate::spectral::SpectralCoeffs;

/// Number of leapfrog time slices carried per prognostic field.
pub const N_STEPS: usize = 2;

/// Prognostic spectral fields of one σ layer.
///
/// Each field carries two leapfrog slices; the tendency pipeline receives an
/// index `lf` selecting the current one. Humidity is allocated for all tiers
/// but left untouched by a dry core.
#[derive(Clone, Debug)]
pub struct PrognosticLayer {
    pub vor: [SpectralCoeffs; N_STEPS],
    pub div: [SpectralCoeffs; N_STEPS],
    pub temp: [SpectralCoeffs; N_STEPS],
    pub humid: [SpectralCoeffs; N_STEPS],
}

impl PrognosticLayer {
    fn zeros(trunc: usize) -> Self {
        let z = || SpectralCoeffs::zeros(trunc);
        Self {
            vor: [z(), z()],
            div: [z(), z()],
            temp: [z(), z()],
            humid: [z(), z()],
        }
    }
}

/// Full prognostic state: layered spectral fields plus log surface pressure.
#[derive(Clone, Debug)]
pub struct PrognosticVariables {
    trunc: usize,
    pub layers: Vec<PrognosticLayer>,
    /// ln(p_s/p_ref), spectral, two leapfrog slices. Holds the interface
    /// displacement η for the shallow-water tier.
    pub pres: [SpectralCoeffs; N_STEPS],
}

impl PrognosticVariables {
    /// Allocate a zeroed state for the given truncation and layer count.
    pub fn zeros(trunc: usize, nlev: usize) -> Self {
        Self {
            trunc,
            layers: (0..nlev).map(|_| PrognosticLayer::zeros(trunc)).collect(),
            pres: [SpectralCoeffs::zeros(trunc), SpectralCoeffs::zeros(trunc)],
        }
    }

    /// Triangular truncation L.
    #[inline]
    pub fn trunc(&self) -> usize {
        self.trunc
    }

    /// Number of σ layers.
    #[inline]
    pub fn nlev(&self) -> usize {
        self.layers.len()
    }

    /// Copy leapfrog slice `from` into slice `to` for every field, used when
    /// seeding the second slice from initial conditions.
    pub fn copy_slice(&mut self, from: usize, to: usize) {
        for layer in &mut self.layers {
            let vor = layer.vor[from].clone();
            layer.vor[to].copy_from(&vor);
            let div = layer.div[from].clone();
            layer.div[to].copy_from(&div);
            let temp = layer.temp[from].clone();
            layer.temp[to].copy_from(&temp);
            let humid = layer.humid[from].clone();
            layer.humid[to].copy_from(&humid);
        }
        let pres = self.pres[from].clone();
        self.pres[to].copy_from(&pres);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_allocation_shape() {
        let progn = PrognosticVariables::zeros(21, 8);
        assert_eq!(progn.nlev(), 8);
        assert_eq!(progn.trunc(), 21);
        assert_eq!(progn.layers[0].vor[0].trunc(), 21);
    }

    #[test]
    fn test_copy_slice() {
        let mut progn = PrognosticVariables::zeros(5, 2);
        progn.layers[1].vor[0].set(2, 1, Complex64::new(3.0, -1.0));
        progn.pres[0].set(1, 0, Complex64::new(0.5, 0.0));
        progn.copy_slice(0, 1);
        assert_eq!(progn.layers[1].vor[1].get(2, 1), Complex64::new(3.0, -1.0));
        assert_eq!(progn.pres[1].get(1, 0), Complex64::new(0.5, 0.0));
    }
}
