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

use std::convert::TryFrom;

use crate::arith::{Kind, Num};
use crate::decimal::Decimal;
use crate::decimal128::Decimal128;
use crate::decimal64::Decimal64;
use crate::error::TryFromDecimalError;

/// Converts from some arbitrary signed integer `$n` whose size is a multiple of
/// 32 into a decimal of type `$t`.
///
/// `$cx` is a `Context::<$t>` used to generate a value of `$t`. It must outlive
/// the macro call to, e.g., allow checking the context's status.
macro_rules! from_signed_int {
    ($t:ty, $cx:expr, $n:expr) => {
        __from_int!($t, i32, $cx, $n)
    };
}

/// Like `from_signed_int!` but for unsigned integers.
macro_rules! from_unsigned_int {
    ($t:ty, $cx:expr, $n:expr) => {
        __from_int!($t, u32, $cx, $n)
    };
}

macro_rules! __from_int {
    ($t:ty, $l:ty, $cx:expr, $n:expr) => {{
        let n = $n.to_be_bytes();
        assert!(
            n.len() % 4 == 0 && n.len() >= 4,
            "from_int requires size of integer to be a multiple of 32"
        );

        // Process `$n` in 32-bit chunks. Only the first chunk has to be sign
        // aware. Each turn of the loop computes `d = d * 2^32 + n`, where `n`
        // is the next 32-bit chunk.
        let mut d = <$t>::from(<$l>::from_be_bytes(n[..4].try_into().unwrap()));
        for i in (4..n.len()).step_by(4) {
            d = $cx.mul(d, <$t>::TWO_POW_32);
            let n = <$t>::from(u32::from_be_bytes(n[i..i + 4].try_into().unwrap()));
            d = $cx.add(d, n);
        }

        d
    }};
}

macro_rules! decimal_from_signed_int {
    ($cx:expr, $n:expr) => {
        __decimal_from_int!(i32, $cx, $n)
    };
}

macro_rules! decimal_from_unsigned_int {
    ($cx:expr, $n:expr) => {
        __decimal_from_int!(u32, $cx, $n)
    };
}

// Equivalent to `__from_int`, but with `Decimal`'s API.
macro_rules! __decimal_from_int {
    ($l:ty, $cx:expr, $n:expr) => {{
        let n = $n.to_be_bytes();
        assert!(
            n.len() % 4 == 0 && n.len() >= 4,
            "from_int requires size of integer to be a multiple of 32"
        );
        let two_pow_32 = Decimal::<N>::two_pow_32();

        let mut d = Decimal::<N>::from(<$l>::from_be_bytes(n[..4].try_into().unwrap()));
        for i in (4..n.len()).step_by(4) {
            $cx.mul(&mut d, &two_pow_32);
            let n = Decimal::<N>::from(u32::from_be_bytes(n[i..i + 4].try_into().unwrap()));
            $cx.add(&mut d, &n);
        }

        d
    }};
}

/// Computes the exact integral value of `n`, if `n` is a finite number with no
/// fractional part that fits in an `i128`.
fn to_i128_exact(n: &Num) -> Result<i128, TryFromDecimalError> {
    if n.kind != Kind::Finite {
        return Err(TryFromDecimalError);
    }
    if n.is_zero() {
        return Ok(0);
    }
    let mut exp = n.exp;
    let mut digits = &n.coef[..];
    // Trailing zeros in the coefficient can absorb a negative exponent.
    while exp < 0 {
        match digits.split_last() {
            Some((0, rest)) if !rest.is_empty() => {
                digits = rest;
                exp += 1;
            }
            _ => return Err(TryFromDecimalError),
        }
    }
    // Accumulate negated so that i128::MIN converts without overflow.
    let mut acc: i128 = 0;
    for &d in digits {
        acc = acc
            .checked_mul(10)
            .and_then(|acc| acc.checked_sub(i128::from(d)))
            .ok_or(TryFromDecimalError)?;
    }
    for _ in 0..exp {
        acc = acc.checked_mul(10).ok_or(TryFromDecimalError)?;
    }
    if n.sign {
        Ok(acc)
    } else {
        acc.checked_neg().ok_or(TryFromDecimalError)
    }
}

macro_rules! decimal_tryinto_primitive {
    ($($p:ty),* $(,)?) => {
        $(
            impl<const N: usize> TryFrom<Decimal<N>> for $p {
                type Error = TryFromDecimalError;

                /// Attempts to convert the decimal to the primitive integer
                /// type. Fails if the decimal is special, has a fractional
                /// part, or is out of the target type's range.
                fn try_from(n: Decimal<N>) -> Result<$p, TryFromDecimalError> {
                    <$p>::try_from(&n)
                }
            }

            impl<const N: usize> TryFrom<&Decimal<N>> for $p {
                type Error = TryFromDecimalError;

                fn try_from(n: &Decimal<N>) -> Result<$p, TryFromDecimalError> {
                    let i = to_i128_exact(&n.to_num())?;
                    <$p>::try_from(i).map_err(|_| TryFromDecimalError)
                }
            }

            impl TryFrom<Decimal64> for $p {
                type Error = TryFromDecimalError;

                fn try_from(n: Decimal64) -> Result<$p, TryFromDecimalError> {
                    let i = to_i128_exact(&n.to_num())?;
                    <$p>::try_from(i).map_err(|_| TryFromDecimalError)
                }
            }

            impl TryFrom<Decimal128> for $p {
                type Error = TryFromDecimalError;

                fn try_from(n: Decimal128) -> Result<$p, TryFromDecimalError> {
                    let i = to_i128_exact(&n.to_num())?;
                    <$p>::try_from(i).map_err(|_| TryFromDecimalError)
                }
            }
        )*
    };
}

decimal_tryinto_primitive!(i8, u8, i16, u16, i32, u32, i64, u64, i128, u128, isize, usize);

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use paste::paste;

    use crate::decimal::Decimal;
    use crate::decimal64::Decimal64;

    macro_rules! round_trip_tests {
        ($($p:ty => $v:expr),* $(,)?) => {
            paste! {
                $(
                    #[test]
                    fn [<try_into_ $p _round_trips>]() {
                        let v: $p = $v;
                        let d = Decimal::<12>::try_from(i128::from(v)).unwrap();
                        assert_eq!(<$p>::try_from(d).unwrap(), v);
                    }
                )*
            }
        };
    }

    round_trip_tests! {
        i8 => -128,
        u8 => 255,
        i16 => -32_768,
        u16 => 65_535,
        i32 => -2_147_483_648,
        u32 => 4_294_967_295,
        i64 => i64::MIN,
        u64 => u64::MAX,
    }

    #[test]
    fn fractional_part_rejected() {
        let d: Decimal<12> = "1.5".parse().unwrap();
        assert!(i64::try_from(d).is_err());
        let d: Decimal<12> = "1.0".parse().unwrap();
        assert_eq!(i64::try_from(d).unwrap(), 1);
    }

    #[test]
    fn out_of_range_rejected() {
        let d: Decimal<12> = "300".parse().unwrap();
        assert!(i8::try_from(d).is_err());
        let d: Decimal<12> = "-1".parse().unwrap();
        assert!(u64::try_from(d).is_err());
    }

    #[test]
    fn specials_rejected() {
        let d: Decimal<12> = "Infinity".parse().unwrap();
        assert!(i64::try_from(d).is_err());
        let d: Decimal<12> = "NaN".parse().unwrap();
        assert!(i64::try_from(d).is_err());
    }

    #[test]
    fn exponent_scaling() {
        let d: Decimal<12> = "1E+3".parse().unwrap();
        assert_eq!(i64::try_from(d).unwrap(), 1000);
        let d: Decimal<12> = "1.500E+3".parse().unwrap();
        assert_eq!(i64::try_from(d).unwrap(), 1500);
    }

    #[test]
    fn fixed_width_conversions() {
        let d: Decimal64 = "42".parse().unwrap();
        assert_eq!(i32::try_from(d).unwrap(), 42);
        let d: Decimal64 = "-42.1".parse().unwrap();
        assert!(i32::try_from(d).is_err());
    }
}
