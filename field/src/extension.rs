use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::{Fp, DEG, W};

/// An element of the degree-`DEG` extension `Ef = Fp[x] / (x^DEG - W)`.
///
/// Coefficients are ordered with index 0 as the constant term. Invariant:
/// every coefficient is a canonical `Fp` element (guaranteed transitively,
/// since `Fp` itself always stores its canonical representative).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ef([Fp; DEG]);

impl Ef {
    pub const ZERO: Self = Self([Fp::ZERO; DEG]);

    pub const ONE: Self = {
        let mut coeffs = [Fp::ZERO; DEG];
        coeffs[0] = Fp::ONE;
        Self(coeffs)
    };

    /// Build an extension element from its `DEG` base-field coefficients.
    pub const fn new(coeffs: [Fp; DEG]) -> Self {
        Self(coeffs)
    }

    /// The embedding `Fp -> Ef`, `a -> (a, 0, ..., 0)`.
    ///
    /// This coercion is always explicit: nothing in this crate implicitly
    /// promotes a base-field value into the extension.
    pub const fn from_base(a: Fp) -> Self {
        let mut coeffs = [Fp::ZERO; DEG];
        coeffs[0] = a;
        Self(coeffs)
    }

    /// The `DEG` base-field coefficients, constant term first.
    pub const fn coeffs(self) -> [Fp; DEG] {
        self.0
    }

    /// `self + Ef::from_base(rhs)`, without materializing the embedding.
    pub fn add_base(self, rhs: Fp) -> Self {
        let mut out = self.0;
        out[0] += rhs;
        Self(out)
    }

    /// Scale every coefficient by a base-field element.
    pub fn scale(self, rhs: Fp) -> Self {
        let mut out = self.0;
        for c in &mut out {
            *c *= rhs;
        }
        Self(out)
    }

    pub fn exp_u64(self, mut exponent: u64) -> Self {
        let mut base = self;
        let mut result = Self::ONE;
        while exponent > 0 {
            if exponent & 1 == 1 {
                result *= base;
            }
            base *= base;
            exponent >>= 1;
        }
        result
    }
}

impl From<Fp> for Ef {
    fn from(value: Fp) -> Self {
        Self::from_base(value)
    }
}

impl fmt::Display for Ef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "]")
    }
}

impl Add for Ef {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let mut out = self.0;
        for i in 0..DEG {
            out[i] += rhs.0[i];
        }
        Self(out)
    }
}

impl AddAssign for Ef {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Ef {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        let mut out = self.0;
        for i in 0..DEG {
            out[i] -= rhs.0[i];
        }
        Self(out)
    }
}

impl SubAssign for Ef {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Ef {
    type Output = Self;
    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

impl Mul for Ef {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        // Schoolbook product, folding the high half back down with the
        // non-residue `W` since `x^DEG == W` in this ring.
        let w = Fp::new(W);
        let mut result = [Fp::ZERO; DEG];
        for i in 0..DEG {
            for j in 0..DEG {
                let prod = self.0[i] * rhs.0[j];
                if i + j < DEG {
                    result[i + j] += prod;
                } else {
                    result[i + j - DEG] += prod * w;
                }
            }
        }
        Self(result)
    }
}

impl MulAssign for Ef {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
