use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

pub const FRACBITS: u32 = 16;

/// Signed 16.16 fixed-point value, the coordinate representation used
/// everywhere past the raw disk format.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(1 << FRACBITS);

    pub fn from_raw(raw: i32) -> Fixed {
        Fixed(raw)
    }

    pub fn to_raw(self) -> i32 {
        self.0
    }

    /// Promotes a disk-format short. Exact for the entire `i16` range and
    /// reversible through `to_short`.
    pub fn from_short(value: i16) -> Fixed {
        Fixed(i32::from(value) << FRACBITS)
    }

    pub fn to_short(self) -> i16 {
        (self.0 >> FRACBITS) as i16
    }

    pub fn from_int(value: i32) -> Fixed {
        Fixed(value << FRACBITS)
    }

    pub fn to_int(self) -> i32 {
        self.0 >> FRACBITS
    }

    pub fn abs(self) -> Fixed {
        Fixed(self.0.wrapping_abs())
    }
}

impl Add for Fixed {
    type Output = Fixed;
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Fixed {
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Fixed {
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed(((i64::from(self.0) * i64::from(rhs.0)) >> FRACBITS) as i32)
    }
}

impl Div for Fixed {
    type Output = Fixed;
    fn div(self, rhs: Fixed) -> Fixed {
        // Saturates where the quotient cannot fit, matching the classic
        // FixedDiv overflow rule.
        if (self.0.wrapping_abs() >> 14) >= rhs.0.wrapping_abs() {
            Fixed(if (self.0 ^ rhs.0) < 0 {
                i32::min_value()
            } else {
                i32::max_value()
            })
        } else {
            Fixed(((i64::from(self.0) << FRACBITS) / i64::from(rhs.0)) as i32)
        }
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "Fixed({})", f64::from(self.0) / f64::from(1 << FRACBITS))
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", f64::from(self.0) / f64::from(1 << FRACBITS))
    }
}

#[cfg(test)]
mod test {
    use super::{Fixed, FRACBITS};

    #[test]
    fn test_short_promotion_round_trips_exactly() {
        for value in i16::min_value()..=i16::max_value() {
            let fixed = Fixed::from_short(value);
            assert_eq!(fixed.to_raw(), i32::from(value) << FRACBITS);
            assert_eq!(fixed.to_short(), value);
        }
    }

    #[test]
    fn test_sign_preserved() {
        assert!(Fixed::from_short(-1).to_raw() < 0);
        assert_eq!(Fixed::from_short(-1).to_raw(), -65536);
        assert_eq!(Fixed::from_short(1), Fixed::ONE);
    }

    #[test]
    fn test_mul() {
        assert_eq!(Fixed::from_int(3) * Fixed::from_int(2), Fixed::from_int(6));
        assert_eq!(Fixed::from_int(-3) * Fixed::from_int(2), Fixed::from_int(-6));
        assert_eq!(
            Fixed::from_raw(1 << 15) * Fixed::from_int(2),
            Fixed::from_raw(1 << 16)
        );
    }

    #[test]
    fn test_div() {
        assert_eq!(Fixed::from_int(6) / Fixed::from_int(2), Fixed::from_int(3));
        assert_eq!(Fixed::from_int(1) / Fixed::from_int(2), Fixed::from_raw(1 << 15));
        assert_eq!(
            Fixed::from_int(1 << 14) / Fixed::from_raw(1),
            Fixed::from_raw(i32::max_value())
        );
        assert_eq!(
            Fixed::from_int(-(1 << 14)) / Fixed::from_raw(1),
            Fixed::from_raw(i32::min_value())
        );
    }
}
