use sv_field::Ef;

/// A multilinear polynomial given by its `2^n` monomial coefficients,
/// indexed by bitstrings of length `n` (coefficient `i` multiplies the
/// monomial `Π_{j: bit j of i = 1} x_j`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultilinearCoeffs {
    coeffs: Vec<Ef>,
}

impl MultilinearCoeffs {
    pub fn new(coeffs: Vec<Ef>) -> Self {
        assert!(coeffs.len().is_power_of_two(), "coefficient count must be a power of two");
        Self { coeffs }
    }

    pub fn num_vars(&self) -> usize {
        self.coeffs.len().trailing_zeros() as usize
    }

    pub fn coeffs(&self) -> &[Ef] {
        &self.coeffs
    }

    pub fn evaluate(&self, point: &[Ef]) -> Ef {
        assert_eq!(point.len(), self.num_vars());
        self.coeffs
            .iter()
            .enumerate()
            .fold(Ef::ZERO, |acc, (i, &c)| {
                let monomial = point
                    .iter()
                    .enumerate()
                    .fold(Ef::ONE, |m, (j, &x_j)| if (i >> j) & 1 == 1 { m * x_j } else { m });
                acc + c * monomial
            })
    }
}

/// A multilinear polynomial given by its `2^n` evaluations over
/// `{0,1}^n`, indexed by bitstrings of length `n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultilinearEvals {
    evals: Vec<Ef>,
}

impl MultilinearEvals {
    pub fn new(evals: Vec<Ef>) -> Self {
        assert!(evals.len().is_power_of_two(), "evaluation count must be a power of two");
        Self { evals }
    }

    pub fn num_vars(&self) -> usize {
        self.evals.len().trailing_zeros() as usize
    }

    pub fn evals(&self) -> &[Ef] {
        &self.evals
    }

    /// Tensor-product barycentric formula:
    /// `Σ_i v_i · Π_j (x_j if bit j of i = 1 else 1 - x_j)`.
    pub fn evaluate(&self, point: &[Ef]) -> Ef {
        assert_eq!(point.len(), self.num_vars());
        self.evals
            .iter()
            .enumerate()
            .fold(Ef::ZERO, |acc, (i, &v)| {
                let basis = point.iter().enumerate().fold(Ef::ONE, |b, (j, &x_j)| {
                    b * if (i >> j) & 1 == 1 { x_j } else { Ef::ONE - x_j }
                });
                acc + v * basis
            })
    }
}
