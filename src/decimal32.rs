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

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use static_assertions::assert_eq_size;

use crate::arith::{self, Kind, Num};
use crate::context::{Class, Context, ContextInner, Rounding, Status};
use crate::decimal::Decimal;
use crate::decimal128::Decimal128;
use crate::decimal64::Decimal64;
use crate::dpd::{self, FORM32};
use crate::error::ParseDecimalError;

/// A 32-bit decimal floating-point number.
///
/// The 32-bit format is a storage format, not a computational format.
/// Arithmetic is not defined on `Decimal32`; convert to [`Decimal64`] or
/// [`Decimal128`] to compute.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct Decimal32 {
    pub(crate) inner: [u8; 4],
}

assert_eq_size!(Decimal32, u32);

impl Decimal32 {
    /// The value that represents Not-a-Number (NaN).
    pub const NAN: Decimal32 = Decimal32::from_ne_bytes(if cfg!(target_endian = "little") {
        [0x0, 0x0, 0x0, 0x7c]
    } else {
        [0x7c, 0x0, 0x0, 0x0]
    });

    /// The value that represents zero.
    pub const ZERO: Decimal32 = Decimal32::from_ne_bytes(if cfg!(target_endian = "little") {
        [0x0, 0x0, 0x50, 0x22]
    } else {
        [0x22, 0x50, 0x0, 0x0]
    });

    /// The value that represents one.
    pub const ONE: Decimal32 = Decimal32::from_ne_bytes(if cfg!(target_endian = "little") {
        [0x1, 0x0, 0x50, 0x22]
    } else {
        [0x22, 0x50, 0x0, 0x1]
    });

    pub(crate) fn to_num(&self) -> Num {
        dpd::decode(u128::from(u32::from_ne_bytes(self.inner)), &FORM32)
    }

    pub(crate) fn from_num(n: &Num) -> Decimal32 {
        let bits = dpd::encode(n, &FORM32) as u32;
        Decimal32 {
            inner: bits.to_ne_bytes(),
        }
    }

    /// Creates a number from its representation as a little-endian byte array.
    pub fn from_le_bytes(mut bytes: [u8; 4]) -> Decimal32 {
        if cfg!(target_endian = "big") {
            bytes.reverse();
        }
        Decimal32::from_ne_bytes(bytes)
    }

    /// Creates a number from its representation as a big-endian byte array.
    pub fn from_be_bytes(mut bytes: [u8; 4]) -> Decimal32 {
        if cfg!(target_endian = "little") {
            bytes.reverse();
        }
        Decimal32::from_ne_bytes(bytes)
    }

    /// Creates a number from its representation as a byte array in the
    /// native endianness of the target platform.
    pub const fn from_ne_bytes(bytes: [u8; 4]) -> Decimal32 {
        Decimal32 { inner: bytes }
    }

    /// Returns the memory representation of the number as a byte array in
    /// little-endian order.
    pub fn to_le_bytes(&self) -> [u8; 4] {
        let mut bytes = self.to_ne_bytes();
        if cfg!(target_endian = "big") {
            bytes.reverse();
        }
        bytes
    }

    /// Returns the memory representation of the number as a byte array in
    /// big-endian order.
    pub fn to_be_bytes(&self) -> [u8; 4] {
        let mut bytes = self.to_ne_bytes();
        if cfg!(target_endian = "little") {
            bytes.reverse();
        }
        bytes
    }

    /// Returns the memory representation of the number as a byte array in
    /// the native endianness of the target platform.
    pub fn to_ne_bytes(&self) -> [u8; 4] {
        self.inner
    }

    /// Classifies the number.
    pub fn class(&self) -> Class {
        arith::classify(&self.to_num(), &Context::<Decimal32>::default().inner)
    }

    /// Computes the number of significant digits in the number.
    ///
    /// If the number is zero or infinite, returns 1. If the number is a NaN,
    /// returns the number of digits in the payload.
    pub fn digits(&self) -> u32 {
        self.to_num().coef.len() as u32
    }

    /// Computes the coefficient of the number.
    ///
    /// If the number is a special value (i.e., NaN or infinity), returns zero.
    pub fn coefficient(&self) -> i32 {
        let n = self.to_num();
        if n.kind != Kind::Finite {
            return 0;
        }
        let mut r: i32 = 0;
        for &d in &n.coef {
            r = r * 10 + i32::from(d);
        }
        if n.sign {
            r = -r;
        }
        r
    }

    /// Computes the exponent of the number.
    ///
    /// Returns zero if the number is a special value.
    pub fn exponent(&self) -> i32 {
        self.to_num().exp as i32
    }

    /// Returns an equivalent number whose encoding is guaranteed to be
    /// canonical.
    pub fn canonical(self) -> Decimal32 {
        let bits = dpd::canonical(u128::from(u32::from_ne_bytes(self.inner)), &FORM32) as u32;
        Decimal32 {
            inner: bits.to_ne_bytes(),
        }
    }

    /// Reports whether the encoding of the number is canonical.
    pub fn is_canonical(&self) -> bool {
        dpd::is_canonical(u128::from(u32::from_ne_bytes(self.inner)), &FORM32)
    }

    /// Reports whether the number is finite.
    ///
    /// A finite number is one that is neither infinite nor a NaN.
    pub fn is_finite(&self) -> bool {
        !self.is_infinite() && !self.is_nan()
    }

    /// Reports whether the number is positive or negative infinity.
    pub fn is_infinite(&self) -> bool {
        self.combination() == 0b11110
    }

    /// Reports whether the number is a NaN.
    pub fn is_nan(&self) -> bool {
        self.combination() == 0b11111
    }

    /// Reports whether the number is a signaling NaN.
    pub fn is_signaling_nan(&self) -> bool {
        self.is_nan() && u32::from_ne_bytes(self.inner) >> 25 & 1 != 0
    }

    /// Reports whether the number has a sign of 1.
    ///
    /// Note that zeros and NaNs may have a sign of 1.
    pub fn is_signed(&self) -> bool {
        u32::from_ne_bytes(self.inner) >> 31 & 1 != 0
    }

    /// Reports whether the number is positive or negative zero.
    pub fn is_zero(&self) -> bool {
        self.to_num().is_zero()
    }

    /// Returns a string of the number in standard notation, i.e. guaranteed to
    /// not be scientific notation.
    pub fn to_standard_notation_string(&self) -> String {
        arith::to_standard_string(&self.to_num())
    }

    fn combination(&self) -> u32 {
        u32::from_ne_bytes(self.inner) >> 26 & 0x1f
    }
}

impl Default for Decimal32 {
    fn default() -> Decimal32 {
        Decimal32::ZERO
    }
}

impl fmt::Debug for Decimal32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Decimal32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&arith::to_string_common(&self.to_num(), f.alternate()))
    }
}

impl FromStr for Decimal32 {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Decimal32, ParseDecimalError> {
        Context::<Decimal32>::default().parse(s)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl Serialize for Decimal32 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_le_bytes().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> Deserialize<'de> for Decimal32 {
    fn deserialize<D>(deserializer: D) -> Result<Decimal32, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Decimal32::from_le_bytes(<[u8; 4]>::deserialize(
            deserializer,
        )?))
    }
}

impl Default for Context<Decimal32> {
    fn default() -> Context<Decimal32> {
        Context {
            inner: ContextInner {
                digits: 7,
                emax: 96,
                emin: -95,
                rounding: Rounding::HalfEven,
                clamp: true,
                status: Status::NONE,
            },
            _phantom: PhantomData,
        }
    }
}

impl Context<Decimal32> {
    /// Parses a number from its string representation.
    pub fn parse<S>(&mut self, s: S) -> Result<Decimal32, ParseDecimalError>
    where
        S: AsRef<str>,
    {
        match arith::parse(s.as_ref(), &mut self.inner) {
            Ok(n) => Ok(Decimal32::from_num(&n)),
            Err(()) => Err(ParseDecimalError),
        }
    }

    /// Constructs a number from a 64-bit decimal float.
    ///
    /// The result may be inexact. The status fields on the context will be set
    /// appropriately if so.
    pub fn from_decimal64(&mut self, d64: Decimal64) -> Decimal32 {
        let mut n = d64.to_num();
        arith::finalize(&mut n, &mut self.inner);
        Decimal32::from_num(&n)
    }

    /// Constructs a number from a 128-bit decimal float.
    ///
    /// The result may be inexact. The status fields on the context will be set
    /// appropriately if so.
    pub fn from_decimal128(&mut self, d128: Decimal128) -> Decimal32 {
        let mut n = d128.to_num();
        arith::finalize(&mut n, &mut self.inner);
        Decimal32::from_num(&n)
    }

    /// Constructs a number from an arbitrary-precision decimal.
    ///
    /// The result may be inexact. The status fields on the context will be set
    /// appropriately if so.
    pub fn from_decimal<const N: usize>(&mut self, d: &Decimal<N>) -> Decimal32 {
        let mut n = d.to_num();
        arith::finalize(&mut n, &mut self.inner);
        Decimal32::from_num(&n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_decode() {
        assert!(Decimal32::ZERO.is_zero());
        assert_eq!(Decimal32::ZERO.exponent(), 0);
        assert_eq!(Decimal32::ONE.to_string(), "1");
        assert!(Decimal32::NAN.is_nan());
    }

    #[test]
    fn parse_and_render() {
        let d: Decimal32 = "123.45".parse().unwrap();
        assert_eq!(d.to_string(), "123.45");
        assert_eq!(d.coefficient(), 12345);
        assert_eq!(d.exponent(), -2);
        assert_eq!(d.digits(), 5);
    }

    #[test]
    fn narrowing_rounds() {
        let mut cx = Context::<Decimal32>::default();
        let wide: Decimal64 = "1.23456789".parse().unwrap();
        let d = cx.from_decimal64(wide);
        assert_eq!(d.to_string(), "1.234568");
        assert!(cx.status().inexact());
    }

    #[test]
    fn byte_round_trip() {
        let d: Decimal32 = "-7.50".parse().unwrap();
        let bytes = d.to_be_bytes();
        let e = Decimal32::from_be_bytes(bytes);
        assert_eq!(e.to_string(), "-7.50");
        assert!(e.is_signed());
    }
}
