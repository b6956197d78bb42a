use core::fmt;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::{P, TWO_ADICITY, TWO_ADIC_GENERATOR};

/// An element of the base prime field `Fp = Z/PZ`.
///
/// Invariant: the inner value is always the canonical representative in
/// `[0, P)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fp(u64);

impl Fp {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    /// Reduce `value` to its canonical representative.
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value % P)
    }

    /// The canonical representative in `[0, P)`.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Exponentiation by square-and-multiply.
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

    /// The generator of the multiplicative subgroup of size `2^bits`.
    ///
    /// Defined for `0 <= bits <= TWO_ADICITY`.
    pub fn two_adic_generator(bits: u32) -> Self {
        assert!(
            bits <= TWO_ADICITY,
            "subgroup of size 2^{bits} does not divide the multiplicative group"
        );
        Self::new(TWO_ADIC_GENERATOR).exp_u64(1u64 << (TWO_ADICITY - bits))
    }
}

impl From<u64> for Fp {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Fp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Fp {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl AddAssign for Fp {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fp {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.0 + P - rhs.0)
    }
}

impl SubAssign for Fp {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Fp {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

impl Mul for Fp {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::new((self.0 as u128 * rhs.0 as u128 % P as u128) as u64)
    }
}

impl MulAssign for Fp {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
