use sv_field::Ef;

/// A univariate polynomial over the extension field, coefficients ordered
/// with index `i` holding the coefficient of `x^i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnivariatePoly {
    coeffs: Vec<Ef>,
}

impl UnivariatePoly {
    pub fn new(coeffs: Vec<Ef>) -> Self {
        Self { coeffs }
    }

    pub fn coeffs(&self) -> &[Ef] {
        &self.coeffs
    }

    /// Evaluate via Horner's method.
    pub fn evaluate(&self, x: Ef) -> Ef {
        self.coeffs
            .iter()
            .rev()
            .fold(Ef::ZERO, |acc, &c| acc * x + c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sv_field::Fp;

    #[test]
    fn horner_matches_naive_power_sum() {
        let coeffs: Vec<Ef> = [1u64, 2, 3, 4]
            .into_iter()
            .map(|v| Ef::from_base(Fp::new(v)))
            .collect();
        let poly = UnivariatePoly::new(coeffs.clone());
        let x = Ef::from_base(Fp::new(5));

        let naive = coeffs
            .iter()
            .enumerate()
            .fold(Ef::ZERO, |acc, (i, &c)| acc + c * x.exp_u64(i as u64));

        assert_eq!(poly.evaluate(x), naive);
    }

    #[test]
    fn constant_polynomial_evaluates_to_its_single_coefficient() {
        let c = Ef::from_base(Fp::new(7));
        let poly = UnivariatePoly::new(vec![c]);
        assert_eq!(poly.evaluate(Ef::from_base(Fp::new(123))), c);
    }
}
