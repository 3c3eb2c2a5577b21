//! Random utilities.

use gcd::Gcd;
use std::time::Duration;

/// Unsigned number represented by a fraction.
///
/// Wide enough for `clock_hz * oversampling` products without overflow.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fraction(pub u64, pub u64);
impl Fraction {
    pub fn reduce(self) -> Self {
        let div = self.0.gcd(self.1);
        if div > 1 {
            Fraction(self.0 / div, self.1 / div)
        } else {
            self
        }
    }
    pub fn invert(self) -> Fraction {
        Fraction(self.1, self.0)
    }
    /// Truncating integer value, like a hardware integer division.
    pub fn trunc(self) -> u64 {
        self.0 / self.1
    }
    /// Is this a whole number?
    pub fn is_integer(self) -> bool {
        self.1 != 0 && self.0 % self.1 == 0
    }
    pub fn into_f64(self) -> f64 {
        self.0 as f64 / self.1 as f64
    }
}
impl std::ops::Div<u64> for Fraction {
    type Output = Fraction;
    fn div(self, div: u64) -> Fraction {
        #[allow(clippy::suspicious_arithmetic_impl)]
        Fraction(self.0, self.1 * div).reduce()
    }
}
impl std::ops::Mul<u64> for Fraction {
    type Output = Fraction;
    fn mul(self, mul: u64) -> Fraction {
        Fraction(self.0 * mul, self.1).reduce()
    }
}
impl From<Fraction> for Duration {
    /// Fraction of seconds.
    fn from(x: Fraction) -> Self {
        let nanos = u128::from(x.0) * 1_000_000_000 / u128::from(x.1);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
