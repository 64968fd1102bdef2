// Copyright Materialize, Inc. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository, or online at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Packed binary-coded decimal conversions.
//!
//! Packed BCD is a compact exchange format in which each byte holds two
//! 4-bit nibbles. Digit nibbles run from the most significant digit to the
//! least, and the final nibble of the final byte holds the sign. The scale
//! is carried separately and gives the number of digits that follow the
//! decimal point.

use std::convert::TryFrom;

use crate::arith::{Kind, Num};
use crate::decimal::Decimal;
use crate::error::{ParsePackedError, TryIntoPackedError};

const NIBBLE_PLUS: u8 = 0xc;
const NIBBLE_MINUS: u8 = 0xd;

/// A decimal number in packed binary-coded decimal format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packed {
    /// The digit and sign nibbles, two to a byte, right-aligned so that the
    /// sign nibble occupies the low nibble of the final byte.
    pub bcd: Vec<u8>,
    /// The number of digits following the decimal point.
    pub scale: i32,
}

impl Packed {
    /// Converts an arbitrary-precision decimal to packed BCD.
    ///
    /// NaNs and infinities cannot be represented in packed BCD and produce
    /// an error.
    pub fn from_decimal<const N: usize>(d: &Decimal<N>) -> Result<Packed, TryIntoPackedError> {
        let n = d.to_num();
        if n.kind != Kind::Finite {
            return Err(TryIntoPackedError);
        }
        let exp = i32::try_from(n.exp).map_err(|_| TryIntoPackedError)?;
        let scale = exp.checked_neg().ok_or(TryIntoPackedError)?;
        let sign = if n.sign { NIBBLE_MINUS } else { NIBBLE_PLUS };

        // One nibble per digit plus the sign nibble, padded at the front to
        // a whole number of bytes.
        let nibbles = n.coef.len() + 1;
        let mut bcd = Vec::with_capacity((nibbles + 1) / 2);
        let mut digits = n.coef.iter();
        if nibbles % 2 != 0 {
            bcd.push(*digits.next().expect("coefficient is never empty"));
        }
        loop {
            match (digits.next(), digits.next()) {
                (Some(&hi), Some(&lo)) => bcd.push(hi << 4 | lo),
                (Some(&hi), None) => {
                    bcd.push(hi << 4 | sign);
                    break;
                }
                (None, _) => {
                    bcd.push(sign);
                    break;
                }
            }
        }
        Ok(Packed { bcd, scale })
    }

    /// Converts packed BCD to an arbitrary-precision decimal.
    ///
    /// The sign nibble must occupy the final position; any of `0xa`, `0xc`,
    /// `0xe`, or `0xf` denotes a positive number and `0xb` or `0xd` a
    /// negative one. Digit nibbles greater than nine, a missing sign, a
    /// sign nibble in a non-final position, or a coefficient too large for
    /// `N` produce an error.
    pub fn to_decimal<const N: usize>(&self) -> Result<Decimal<N>, ParsePackedError> {
        let last = match self.bcd.last() {
            Some(&b) => b,
            None => return Err(ParsePackedError),
        };
        let sign = match last & 0xf {
            0xa | 0xc | 0xe | 0xf => false,
            0xb | 0xd => true,
            _ => return Err(ParsePackedError),
        };

        let mut coef = Vec::with_capacity(self.bcd.len() * 2 - 1);
        for (i, &b) in self.bcd.iter().enumerate() {
            coef.push(b >> 4);
            if i + 1 < self.bcd.len() {
                coef.push(b & 0xf);
            }
        }
        if coef.iter().any(|&d| d > 9) {
            return Err(ParsePackedError);
        }
        while coef.len() > 1 && coef[0] == 0 {
            coef.remove(0);
        }
        if coef.len() > N * 3 {
            return Err(ParsePackedError);
        }

        let n = Num {
            sign,
            exp: -i64::from(self.scale),
            coef,
            kind: Kind::Finite,
        };
        let mut d = Decimal::default();
        d.set_from_num(&n);
        Ok(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_literals() {
        let p = Packed {
            bcd: vec![0x06, 0x2c],
            scale: 1,
        };
        let d: Decimal<12> = p.to_decimal().unwrap();
        assert_eq!(d.to_string(), "6.2");
        assert_eq!(Packed::from_decimal(&d).unwrap(), p);

        let d: Decimal<12> = "3.14".parse().unwrap();
        let p = Packed::from_decimal(&d).unwrap();
        assert_eq!(p.bcd, vec![0x31, 0x4c]);
        assert_eq!(p.scale, 2);
    }

    #[test]
    fn signed_scaled_zero() {
        let d: Decimal<12> = "-0.00".parse().unwrap();
        let p = Packed::from_decimal(&d).unwrap();
        assert_eq!(p.bcd, vec![0x0d]);
        assert_eq!(p.scale, 2);
        let d: Decimal<12> = p.to_decimal().unwrap();
        assert_eq!(d.to_string(), "-0.00");
    }

    #[test]
    fn alternate_sign_nibbles() {
        for sign in [0xa, 0xc, 0xe, 0xf] {
            let p = Packed {
                bcd: vec![0x42, sign],
                scale: 0,
            };
            let d: Decimal<12> = p.to_decimal().unwrap();
            assert_eq!(d.to_string(), "42");
        }
        for sign in [0xb, 0xd] {
            let p = Packed {
                bcd: vec![0x42, sign],
                scale: 0,
            };
            let d: Decimal<12> = p.to_decimal().unwrap();
            assert_eq!(d.to_string(), "-42");
        }
    }

    #[test]
    fn malformed_input() {
        // empty
        let p = Packed {
            bcd: vec![],
            scale: 0,
        };
        assert!(p.to_decimal::<12>().is_err());

        // missing sign
        let p = Packed {
            bcd: vec![0x12],
            scale: 0,
        };
        assert!(p.to_decimal::<12>().is_err());

        // digit nibble greater than nine
        let p = Packed {
            bcd: vec![0x1a, 0x2c],
            scale: 0,
        };
        assert!(p.to_decimal::<12>().is_err());
    }

    #[test]
    fn specials_rejected() {
        let d: Decimal<12> = "NaN".parse().unwrap();
        assert!(Packed::from_decimal(&d).is_err());
        let d: Decimal<12> = "-Infinity".parse().unwrap();
        assert!(Packed::from_decimal(&d).is_err());
    }

    #[test]
    fn negative_scale() {
        let d: Decimal<12> = "1.2E+5".parse().unwrap();
        let p = Packed::from_decimal(&d).unwrap();
        assert_eq!(p.bcd, vec![0x01, 0x2c]);
        assert_eq!(p.scale, -4);
        let d: Decimal<12> = p.to_decimal().unwrap();
        assert_eq!(d.to_string(), "1.2E+5");
    }
}
