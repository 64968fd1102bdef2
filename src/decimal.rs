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

use std::cmp::Ordering;
use std::convert::{TryFrom, TryInto};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::de::{MapAccess, SeqAccess, Visitor};
#[cfg(feature = "serde")]
use serde::ser::SerializeStruct;
#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::arith::{self, DivOp, Kind, LogicalOp, Num};
use crate::context::{Class, Context, ContextInner, Rounding, Status};
use crate::decimal128::Decimal128;
use crate::decimal32::Decimal32;
use crate::decimal64::Decimal64;
use crate::error::{
    InvalidCoefficientError, InvalidExponentError, InvalidPrecisionError, ParseDecimalError,
    TryIntoDecimalError,
};
use crate::math;

/// Sign bit of a [`Decimal`]'s `bits` field.
pub(crate) const BIT_NEG: u8 = 0x80;
/// Infinity bit of a [`Decimal`]'s `bits` field.
pub(crate) const BIT_INF: u8 = 0x40;
/// Quiet NaN bit of a [`Decimal`]'s `bits` field.
pub(crate) const BIT_NAN: u8 = 0x20;
/// Signaling NaN bit of a [`Decimal`]'s `bits` field.
pub(crate) const BIT_SNAN: u8 = 0x10;
/// Mask for the bits that mark a special value.
pub(crate) const BIT_SPECIAL: u8 = BIT_INF | BIT_NAN | BIT_SNAN;

fn validate_n(n: usize) {
    // TODO: check this at compile time, when that becomes possible.
    if n < 12 || n > 999_999_999 {
        panic!("Decimal<N>:: N is not in the range [12, 999999999]");
    }
}

/// An arbitrary-precision decimal number.
///
/// The maximum number of digits that can be stored in the number is specified
/// by `N * 3`. For example, a value of type `Decimal<3>` has space for nine
/// decimal digits. This somewhat odd design is due to limitations of constant
/// generic parameters in Rust. The intention is to someday make `N` correspond
/// directly to the number of digits of precision.
///
/// `N` must be at least 12 and no greater than 999,999,999, though typically
/// the stack size implies a smaller maximum for `N`. Due to limitations with
/// constant generics it is not yet possible to enforce these restrictions
/// at compile time, so they are checked at runtime.
#[repr(C)]
#[derive(Clone)]
pub struct Decimal<const N: usize> {
    pub(crate) digits: u32,
    pub(crate) exponent: i32,
    pub(crate) bits: u8,
    pub(crate) lsu: [u16; N],
}

impl<const N: usize> Decimal<N> {
    /// Unpacks the number into the engine's working representation.
    pub(crate) fn to_num(&self) -> Num {
        let kind = if self.bits & BIT_SNAN != 0 {
            Kind::SNan
        } else if self.bits & BIT_NAN != 0 {
            Kind::QNan
        } else if self.bits & BIT_INF != 0 {
            Kind::Infinite
        } else {
            Kind::Finite
        };
        let digits = self.digits as usize;
        let mut coef = vec![0u8; digits];
        for i in 0..digits {
            coef[digits - 1 - i] = self.digit(i);
        }
        Num {
            sign: self.bits & BIT_NEG != 0,
            exp: i64::from(self.exponent),
            coef,
            kind,
        }
    }

    /// Packs a finalized engine result back into this slot.
    ///
    /// The coefficient must fit into `N * 3` digits; operations guarantee this
    /// by rounding through the context before packing.
    pub(crate) fn set_from_num(&mut self, n: &Num) {
        self.bits = if n.sign { BIT_NEG } else { 0 };
        match n.kind {
            Kind::Finite => (),
            Kind::Infinite => self.bits |= BIT_INF,
            Kind::QNan => self.bits |= BIT_NAN,
            Kind::SNan => self.bits |= BIT_SNAN,
        }
        let lead = n
            .coef
            .iter()
            .take_while(|&&d| d == 0)
            .count()
            .min(n.coef.len() - 1);
        let coef = &n.coef[lead..];
        debug_assert!(coef.len() <= N * 3);
        self.lsu = [0; N];
        for (i, &d) in coef.iter().rev().enumerate() {
            self.lsu[i / 3] += u16::from(d) * [1, 10, 100][i % 3];
        }
        self.digits = u32::try_from(coef.len()).expect("digit count fits into u32");
        self.exponent = if n.kind == Kind::Finite {
            i32::try_from(n.exp).expect("finalized exponent fits into i32")
        } else {
            0
        };
    }

    /// Returns the `i`th digit of the coefficient, counting from the least
    /// significant digit.
    fn digit(&self, i: usize) -> u8 {
        let unit = self.lsu[i / 3];
        match i % 3 {
            0 => (unit % 10) as u8,
            1 => (unit / 10 % 10) as u8,
            _ => (unit / 100) as u8,
        }
    }

    /// Constructs a decimal number with `N / 3` digits of precision
    /// representing the number 0.
    pub fn zero() -> Decimal<N> {
        Decimal::default()
    }

    /// Constructs a decimal number representing positive infinity.
    pub fn infinity() -> Decimal<N> {
        let mut d = Decimal::default();
        d.bits = BIT_INF;
        d
    }

    /// Constructs a decimal number representing a non-signaling NaN.
    pub fn nan() -> Decimal<N> {
        let mut d = Decimal::default();
        d.bits = BIT_NAN;
        d
    }

    pub(crate) fn two_pow_32() -> Decimal<N> {
        Decimal::from(1i64 << 32)
    }

    /// Computes the number of significant digits in the number.
    ///
    /// If the number is zero or infinite, returns 1. If the number is a NaN,
    /// returns the number of digits in the payload.
    pub fn digits(&self) -> u32 {
        self.digits
    }

    /// Returns the coefficient of the number as `T`, where `T` is a primitive
    /// integer type.
    ///
    /// Errors if the number is special or if the coefficient does not fit
    /// in `T`.
    pub fn coefficient<T>(&self) -> Result<T, InvalidCoefficientError>
    where
        T: TryFrom<Decimal<N>>,
    {
        if self.is_special() {
            return Err(InvalidCoefficientError);
        }
        let mut d = self.clone();
        d.exponent = 0;
        T::try_from(d).map_err(|_| InvalidCoefficientError)
    }

    /// Returns the individual digits of the coefficient in 8-bit, unpacked
    /// [binary-coded decimal][bcd] format.
    ///
    /// [bcd]: https://en.wikipedia.org/wiki/Binary-coded_decimal
    pub fn coefficient_digits(&self) -> Vec<u8> {
        let digits = self.digits as usize;
        let mut buf = vec![0u8; digits];
        for i in 0..digits {
            buf[digits - 1 - i] = self.digit(i);
        }
        buf
    }

    /// Returns the units of the coefficient, in little-endian order, with
    /// three digits per unit.
    pub(crate) fn coefficient_units(&self) -> &[u16] {
        let units = (self.digits as usize + 2) / 3;
        &self.lsu[..units]
    }

    /// Computes the exponent of the number.
    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Reports whether the number is finite.
    ///
    /// A finite number is one that is neither infinite nor a NaN.
    pub fn is_finite(&self) -> bool {
        (self.bits & BIT_SPECIAL) == 0
    }

    /// Reports whether the number is positive or negative infinity.
    pub fn is_infinite(&self) -> bool {
        (self.bits & BIT_INF) != 0
    }

    /// Reports whether the number is a NaN.
    pub fn is_nan(&self) -> bool {
        (self.bits & (BIT_NAN | BIT_SNAN)) != 0
    }

    /// Reports whether the number is negative.
    ///
    /// A negative number is either negative zero, less than zero, or NaN
    /// with a sign of one. This corresponds to [`Decimal128::is_signed`], not
    /// [`Decimal128::is_negative`].
    pub fn is_negative(&self) -> bool {
        (self.bits & BIT_NEG) != 0
    }

    /// Reports whether the number is a quiet NaN.
    pub fn is_quiet_nan(&self) -> bool {
        (self.bits & BIT_NAN) != 0
    }

    /// Reports whether the number is a signaling NaN.
    pub fn is_signaling_nan(&self) -> bool {
        (self.bits & BIT_SNAN) != 0
    }

    /// Reports whether the number has a special value.
    ///
    /// A special value is either infinity or NaN. This is the inverse of
    /// [`Decimal::is_finite`].
    pub fn is_special(&self) -> bool {
        (self.bits & BIT_SPECIAL) != 0
    }

    /// Reports whether the number is positive or negative zero.
    pub fn is_zero(&self) -> bool {
        self.is_finite() && self.lsu[0] == 0 && self.digits == 1
    }

    /// Reports whether the number is an integer, i.e. finite with no digits
    /// below the units digit.
    pub fn is_integer(&self) -> bool {
        if !self.is_finite() {
            return false;
        }
        if self.exponent >= 0 {
            return true;
        }
        // digits whose place value is below one must all be zero
        let frac = usize::try_from(-i64::from(self.exponent)).unwrap_or(usize::MAX);
        (0..frac.min(self.digits as usize)).all(|i| self.digit(i) == 0)
            && (frac < self.digits as usize || self.is_zero())
    }

    /// Reports whether the number is a valid argument for logical operations.
    ///
    /// A number is a valid argument for logical operations if it is a
    /// nonnegative integer with an exponent of zero where each digit is
    /// either zero or one.
    pub fn is_logical(&self) -> bool {
        self.is_finite()
            && !self.is_negative()
            && self.exponent == 0
            && (0..self.digits as usize).all(|i| self.digit(i) <= 1)
    }

    /// Reports whether the quantum of the number matches the quantum of
    /// `rhs`.
    ///
    /// Quantums are considered to match if the numbers have the same exponent,
    /// are both NaNs, or both infinite.
    pub fn quantum_matches(&self, rhs: &Decimal<N>) -> bool {
        if self.is_nan() || rhs.is_nan() {
            self.is_nan() && rhs.is_nan()
        } else if self.is_infinite() || rhs.is_infinite() {
            self.is_infinite() && rhs.is_infinite()
        } else {
            self.exponent == rhs.exponent
        }
    }

    /// Converts this decimal to a 32-bit decimal float.
    ///
    /// The result may be inexact. Use [`Context::<Decimal32>::from_decimal`]
    /// to observe exceptional conditions.
    pub fn to_decimal32(&self) -> Decimal32 {
        Context::<Decimal32>::default().from_decimal(self)
    }

    /// Converts this decimal to a 64-bit decimal float.
    ///
    /// The result may be inexact. Use [`Context::<Decimal64>::from_decimal`]
    /// to observe exceptional conditions.
    pub fn to_decimal64(&self) -> Decimal64 {
        Context::<Decimal64>::default().from_decimal(self)
    }

    /// Converts this decimal to a 128-bit decimal float.
    ///
    /// The result may be inexact. Use [`Context::<Decimal128>::from_decimal`]
    /// to observe exceptional conditions.
    pub fn to_decimal128(&self) -> Decimal128 {
        Context::<Decimal128>::default().from_decimal(self)
    }

    /// Returns a string of the number in standard notation, i.e. guaranteed
    /// to not be scientific notation.
    pub fn to_standard_notation_string(&self) -> String {
        arith::to_standard_string(&self.to_num())
    }

    /// Returns the raw parts of this decimal.
    ///
    /// The meaning of these parts are unspecified and subject to change.
    pub fn to_raw_parts(&self) -> (u32, i32, u8, [u16; N]) {
        (self.digits, self.exponent, self.bits, self.lsu)
    }

    /// Returns a `Decimal::<N>` with the supplied raw parts, which should be
    /// generated using [`Decimal::to_raw_parts`].
    pub fn from_raw_parts(digits: u32, exponent: i32, bits: u8, lsu: [u16; N]) -> Decimal<N> {
        validate_n(N);
        Decimal {
            digits,
            exponent,
            bits,
            lsu,
        }
    }
}

impl<const N: usize> Default for Decimal<N> {
    fn default() -> Decimal<N> {
        validate_n(N);
        Decimal {
            digits: 1,
            exponent: 0,
            bits: 0,
            lsu: [0; N],
        }
    }
}

impl<const N: usize> PartialEq for Decimal<N> {
    fn eq(&self, other: &Decimal<N>) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl<const N: usize> PartialOrd for Decimal<N> {
    fn partial_cmp(&self, other: &Decimal<N>) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            None
        } else {
            Some(arith::compare(&self.to_num(), &other.to_num()))
        }
    }
}

impl<const N: usize> fmt::Debug for Decimal<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<const N: usize> fmt::Display for Decimal<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&arith::to_string_common(&self.to_num(), f.alternate()))
    }
}

impl<const N: usize> FromStr for Decimal<N> {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Decimal<N>, ParseDecimalError> {
        Context::<Decimal<N>>::default().parse(s)
    }
}

fn from_int_parts<const N: usize>(sign: bool, mut mag: u128) -> Decimal<N> {
    let mut d = Decimal::default();
    if sign {
        d.bits = BIT_NEG;
    }
    if mag == 0 {
        return d;
    }
    let mut i = 0;
    while mag > 0 {
        d.lsu[i / 3] += (mag % 10) as u16 * [1, 10, 100][i % 3];
        mag /= 10;
        i += 1;
    }
    d.digits = i as u32;
    d
}

macro_rules! decimal_from_signed_primitive {
    ($($t:ty),* $(,)?) => {$(
        impl<const N: usize> From<$t> for Decimal<N> {
            fn from(n: $t) -> Decimal<N> {
                validate_n(N);
                from_int_parts(n < 0, i128::from(n).unsigned_abs())
            }
        }
    )*};
}

macro_rules! decimal_from_unsigned_primitive {
    ($($t:ty),* $(,)?) => {$(
        impl<const N: usize> From<$t> for Decimal<N> {
            fn from(n: $t) -> Decimal<N> {
                validate_n(N);
                from_int_parts(false, u128::from(n))
            }
        }
    )*};
}

decimal_from_signed_primitive!(i8, i16, i32, i64);
decimal_from_unsigned_primitive!(u8, u16, u32, u64);

fn int_digits(mag: u128) -> usize {
    let mut mag = mag;
    let mut digits = 1;
    while mag >= 10 {
        mag /= 10;
        digits += 1;
    }
    digits
}

impl<const N: usize> TryFrom<i128> for Decimal<N> {
    type Error = TryIntoDecimalError;

    /// Fails when the value needs more than `N * 3` digits, i.e. only when
    /// `N` is 12 and the value has 37 or more digits.
    fn try_from(n: i128) -> Result<Decimal<N>, TryIntoDecimalError> {
        validate_n(N);
        let mag = n.unsigned_abs();
        if int_digits(mag) > N * 3 {
            return Err(TryIntoDecimalError);
        }
        Ok(from_int_parts(n < 0, mag))
    }
}

impl<const N: usize> TryFrom<u128> for Decimal<N> {
    type Error = TryIntoDecimalError;

    /// Fails when the value needs more than `N * 3` digits, i.e. only when
    /// `N` is 12 and the value has 37 or more digits.
    fn try_from(n: u128) -> Result<Decimal<N>, TryIntoDecimalError> {
        validate_n(N);
        if int_digits(n) > N * 3 {
            return Err(TryIntoDecimalError);
        }
        Ok(from_int_parts(false, n))
    }
}

impl<const N: usize> From<usize> for Decimal<N> {
    fn from(n: usize) -> Decimal<N> {
        Decimal::from(n as u64)
    }
}

impl<const N: usize> From<isize> for Decimal<N> {
    fn from(n: isize) -> Decimal<N> {
        Decimal::from(n as i64)
    }
}

impl<const N: usize> From<Decimal32> for Decimal<N> {
    fn from(n: Decimal32) -> Decimal<N> {
        validate_n(N);
        let mut d = Decimal::default();
        d.set_from_num(&n.to_num());
        d
    }
}

impl<const N: usize> From<Decimal64> for Decimal<N> {
    fn from(n: Decimal64) -> Decimal<N> {
        validate_n(N);
        let mut d = Decimal::default();
        d.set_from_num(&n.to_num());
        d
    }
}

impl<const N: usize> From<Decimal128> for Decimal<N> {
    fn from(n: Decimal128) -> Decimal<N> {
        validate_n(N);
        let mut d = Decimal::default();
        d.set_from_num(&n.to_num());
        d
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<const N: usize> Serialize for Decimal<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("Decimal", 4)?;
        s.serialize_field("digits", &self.digits)?;
        s.serialize_field("exponent", &self.exponent)?;
        s.serialize_field("bits", &self.bits)?;
        s.serialize_field("lsu", &self.lsu[..])?;
        s.end()
    }
}

#[cfg(feature = "serde")]
const DECIMAL_FIELDS: &[&str] = &["digits", "exponent", "bits", "lsu"];

#[cfg(feature = "serde")]
fn decimal_from_fields<const N: usize, E>(
    digits: u32,
    exponent: i32,
    bits: u8,
    lsu: Vec<u16>,
) -> Result<Decimal<N>, E>
where
    E: de::Error,
{
    validate_n(N);
    if digits < 1 || digits > (N * 3) as u32 {
        return Err(E::invalid_value(
            de::Unexpected::Unsigned(u64::from(digits)),
            &"digit count between 1 and the coefficient capacity",
        ));
    }
    let lsu: [u16; N] = lsu
        .try_into()
        .map_err(|v: Vec<u16>| E::invalid_length(v.len(), &"coefficient unit array of length N"))?;
    Ok(Decimal::from_raw_parts(digits, exponent, bits, lsu))
}

#[cfg(feature = "serde")]
fn visit_decimal_map<'de, A, const N: usize>(mut map: A) -> Result<Decimal<N>, A::Error>
where
    A: MapAccess<'de>,
{
    let mut digits = None;
    let mut exponent = None;
    let mut bits = None;
    let mut lsu = None;
    while let Some(key) = map.next_key::<String>()? {
        match key.as_str() {
            "digits" => digits = Some(map.next_value()?),
            "exponent" => exponent = Some(map.next_value()?),
            "bits" => bits = Some(map.next_value()?),
            "lsu" => lsu = Some(map.next_value::<Vec<u16>>()?),
            f => return Err(de::Error::unknown_field(f, DECIMAL_FIELDS)),
        }
    }
    decimal_from_fields(
        digits.ok_or_else(|| de::Error::missing_field("digits"))?,
        exponent.ok_or_else(|| de::Error::missing_field("exponent"))?,
        bits.ok_or_else(|| de::Error::missing_field("bits"))?,
        lsu.ok_or_else(|| de::Error::missing_field("lsu"))?,
    )
}

#[cfg(feature = "serde")]
fn visit_decimal_seq<'de, A, const N: usize>(mut seq: A) -> Result<Decimal<N>, A::Error>
where
    A: SeqAccess<'de>,
{
    let digits = seq
        .next_element()?
        .ok_or_else(|| de::Error::invalid_length(0, &"struct Decimal with 4 elements"))?;
    let exponent = seq
        .next_element()?
        .ok_or_else(|| de::Error::invalid_length(1, &"struct Decimal with 4 elements"))?;
    let bits = seq
        .next_element()?
        .ok_or_else(|| de::Error::invalid_length(2, &"struct Decimal with 4 elements"))?;
    let lsu = seq
        .next_element::<Vec<u16>>()?
        .ok_or_else(|| de::Error::invalid_length(3, &"struct Decimal with 4 elements"))?;
    decimal_from_fields(digits, exponent, bits, lsu)
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de, const N: usize> Deserialize<'de> for Decimal<N> {
    fn deserialize<D>(deserializer: D) -> Result<Decimal<N>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor<const N: usize>;

        impl<'de, const N: usize> Visitor<'de> for DecimalVisitor<N> {
            type Value = Decimal<N>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("struct Decimal")
            }

            fn visit_map<A>(self, map: A) -> Result<Decimal<N>, A::Error>
            where
                A: MapAccess<'de>,
            {
                visit_decimal_map(map)
            }

            fn visit_seq<A>(self, seq: A) -> Result<Decimal<N>, A::Error>
            where
                A: SeqAccess<'de>,
            {
                visit_decimal_seq(seq)
            }
        }

        deserializer.deserialize_struct("Decimal", DECIMAL_FIELDS, DecimalVisitor)
    }
}

/// Deserializes a [`Decimal`] from either its struct representation or any
/// primitive that losslessly converts to a decimal, i.e. integers and
/// strings.
///
/// For use with [serde's `with` field attribute][with].
///
/// [with]: https://serde.rs/field-attrs.html#with
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod serde_decimal_from_non_float_primitives {
    use std::fmt;
    use std::str::FromStr;

    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use serde::{Deserializer, Serialize, Serializer};

    use super::{visit_decimal_map, visit_decimal_seq, Decimal};

    /// Serializes a [`Decimal`] using the standard struct representation.
    pub fn serialize<S, const N: usize>(d: &Decimal<N>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Serialize::serialize(d, serializer)
    }

    /// Deserializes a [`Decimal`] from a struct, integer, or string.
    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<Decimal<N>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PrimitiveVisitor<const N: usize>;

        impl<'de, const N: usize> Visitor<'de> for PrimitiveVisitor<N> {
            type Value = Decimal<N>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("struct Decimal or compatible primitive")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Decimal<N>, E>
            where
                E: de::Error,
            {
                Ok(Decimal::from(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Decimal<N>, E>
            where
                E: de::Error,
            {
                Ok(Decimal::from(v))
            }

            fn visit_str<E>(self, v: &str) -> Result<Decimal<N>, E>
            where
                E: de::Error,
            {
                Decimal::from_str(v).map_err(E::custom)
            }

            fn visit_map<A>(self, map: A) -> Result<Decimal<N>, A::Error>
            where
                A: MapAccess<'de>,
            {
                visit_decimal_map(map)
            }

            fn visit_seq<A>(self, seq: A) -> Result<Decimal<N>, A::Error>
            where
                A: SeqAccess<'de>,
            {
                visit_decimal_seq(seq)
            }
        }

        deserializer.deserialize_any(PrimitiveVisitor)
    }

}

impl<const N: usize> Default for Context<Decimal<N>> {
    fn default() -> Context<Decimal<N>> {
        validate_n(N);
        Context {
            inner: ContextInner {
                digits: i32::try_from(N * 3).expect("decimal digit count does not fit into i32"),
                emax: 999_999_999,
                emin: -999_999_999,
                rounding: Rounding::HalfUp,
                clamp: false,
                status: Status::NONE,
            },
            _phantom: PhantomData,
        }
    }
}

impl<const N: usize> Context<Decimal<N>> {
    /// Returns the context's precision.
    ///
    /// Operations that use this context will be rounded to this length if
    /// necessary.
    pub fn precision(&self) -> usize {
        usize::try_from(self.inner.digits).expect("context digit count does not fit into usize")
    }

    /// Sets the context's precision.
    ///
    /// The precision must be at least one and no greater than `N * 3`.
    pub fn set_precision(&mut self, precision: usize) -> Result<(), InvalidPrecisionError> {
        if precision < 1 || precision > N * 3 {
            return Err(InvalidPrecisionError);
        }
        self.inner.digits = i32::try_from(precision).map_err(|_| InvalidPrecisionError)?;
        Ok(())
    }

    /// Reports whether the context has exponent clamping enabled.
    ///
    /// See the `clamp` field in the documentation of decNumber's
    /// [decContext module] for details.
    ///
    /// [decContext module]: http://speleotrove.com/decimal/dncont.html
    pub fn clamp(&self) -> bool {
        self.inner.clamp
    }

    /// Sets whether the context has exponent clamping enabled.
    pub fn set_clamp(&mut self, clamp: bool) {
        self.inner.clamp = clamp
    }

    /// Returns the context's maximum exponent.
    ///
    /// See the `emax` field in the documentation of decNumber's
    /// [decContext module] for details.
    ///
    /// [decContext module]: http://speleotrove.com/decimal/dncont.html
    pub fn max_exponent(&self) -> isize {
        isize::try_from(self.inner.emax).expect("context max exponent does not fit into isize")
    }

    /// Sets the context's maximum exponent.
    ///
    /// The maximum exponent must not be negative and no greater than
    /// 999,999,999.
    pub fn set_max_exponent(&mut self, e: isize) -> Result<(), InvalidExponentError> {
        if e < 0 || e > 999_999_999 {
            return Err(InvalidExponentError);
        }
        self.inner.emax = i32::try_from(e).map_err(|_| InvalidExponentError)?;
        Ok(())
    }

    /// Returns the context's minimum exponent.
    ///
    /// See the `emin` field in the documentation of decNumber's
    /// [decContext module] for details.
    ///
    /// [decContext module]: http://speleotrove.com/decimal/dncont.html
    pub fn min_exponent(&self) -> isize {
        isize::try_from(self.inner.emin).expect("context min exponent does not fit into isize")
    }

    /// Sets the context's minimum exponent.
    ///
    /// The minimum exponent must not be positive and no smaller than
    /// -999,999,999.
    pub fn set_min_exponent(&mut self, e: isize) -> Result<(), InvalidExponentError> {
        if e > 0 || e < -999_999_999 {
            return Err(InvalidExponentError);
        }
        self.inner.emin = i32::try_from(e).map_err(|_| InvalidExponentError)?;
        Ok(())
    }

    fn unary<F>(&mut self, n: &mut Decimal<N>, f: F)
    where
        F: FnOnce(&Num, &mut ContextInner) -> Num,
    {
        let a = n.to_num();
        let r = f(&a, &mut self.inner);
        n.set_from_num(&r);
    }

    fn binary<F>(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>, f: F)
    where
        F: FnOnce(&Num, &Num, &mut ContextInner) -> Num,
    {
        let a = lhs.to_num();
        let b = rhs.to_num();
        let r = f(&a, &b, &mut self.inner);
        lhs.set_from_num(&r);
    }

    /// Parses a number from its string representation.
    pub fn parse<S>(&mut self, s: S) -> Result<Decimal<N>, ParseDecimalError>
    where
        S: AsRef<str>,
    {
        validate_n(N);
        match arith::parse(s.as_ref(), &mut self.inner) {
            Ok(n) => {
                let mut d = Decimal::default();
                d.set_from_num(&n);
                Ok(d)
            }
            Err(()) => Err(ParseDecimalError),
        }
    }

    /// Constructs a number from an `i128`.
    ///
    /// Note that this function can return inexact results when `N` is too
    /// small to represent every digit of the value.
    pub fn from_i128(&mut self, n: i128) -> Decimal<N> {
        decimal_from_signed_int!(self, n)
    }

    /// Constructs a number from a `u128`.
    ///
    /// Note that this function can return inexact results when `N` is too
    /// small to represent every digit of the value.
    pub fn from_u128(&mut self, n: u128) -> Decimal<N> {
        decimal_from_unsigned_int!(self, n)
    }

    /// Classifies the number.
    pub fn class(&mut self, n: &Decimal<N>) -> Class {
        arith::classify(&n.to_num(), &self.inner)
    }

    /// Reports whether `n` is normal.
    ///
    /// A normal number is finite, non-zero, and not subnormal for the
    /// context's minimum exponent.
    pub fn is_normal(&self, n: &Decimal<N>) -> bool {
        matches!(
            arith::classify(&n.to_num(), &self.inner),
            Class::NegNormal | Class::PosNormal
        )
    }

    /// Reports whether `n` is subnormal.
    ///
    /// A subnormal number is finite, non-zero, and has magnitude less than
    /// 10<sup>emin</sup>.
    pub fn is_subnormal(&self, n: &Decimal<N>) -> bool {
        matches!(
            arith::classify(&n.to_num(), &self.inner),
            Class::NegSubnormal | Class::PosSubnormal
        )
    }

    /// Computes the absolute value of `n`, storing the result in `n`.
    ///
    /// This has the same effect as [`Context::<Decimal<N>>::plus`] unless
    /// `n` is negative, in which case it has the same effect as
    /// [`Context::<Decimal<N>>::minus`].
    pub fn abs(&mut self, n: &mut Decimal<N>) {
        self.unary(n, arith::abs);
    }

    /// Adds `lhs` and `rhs`, storing the result in `lhs`.
    pub fn add(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| arith::add(a, b, false, cx));
    }

    /// Carries out the digitwise logical and of `lhs` and `rhs`, storing
    /// the result in `lhs`.
    pub fn and(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| {
            arith::logical(a, b, LogicalOp::And, cx)
        });
    }

    /// Divides `lhs` by `rhs`, storing the result in `lhs`.
    pub fn div(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| arith::divide(a, b, DivOp::Div, cx));
    }

    /// Divides `lhs` by `rhs`, storing the integer part of the result in
    /// `lhs`.
    ///
    /// If the integer part does not fit in the context's precision,
    /// [`Status::division_impossible`] is set.
    ///
    /// [`Status::division_impossible`]: crate::context::Status::division_impossible
    pub fn div_integer(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| arith::divide(a, b, DivOp::DivInt, cx));
    }

    /// Raises *e* to the power of `n`, storing the result in `n`.
    pub fn exp(&mut self, n: &mut Decimal<N>) {
        self.unary(n, math::exp);
    }

    /// Calculates the fused multiply-add `(x * y) + z` and stores the result
    /// in `x`.
    ///
    /// The multiplication is carried out first and is exact, so this operation
    /// only has the one, final rounding.
    pub fn fma(&mut self, x: &mut Decimal<N>, y: &Decimal<N>, z: &Decimal<N>) {
        let a = x.to_num();
        let b = y.to_num();
        let c = z.to_num();
        let r = arith::fma(&a, &b, &c, &mut self.inner);
        x.set_from_num(&r);
    }

    /// Computes the digitwise logical inversion of `n`, storing the result in
    /// `n`.
    pub fn invert(&mut self, n: &mut Decimal<N>) {
        self.unary(n, arith::invert);
    }

    /// Computes the natural logarithm of `n`, storing the result in `n`.
    pub fn ln(&mut self, n: &mut Decimal<N>) {
        self.unary(n, math::ln);
    }

    /// Computes the base-10 logarithm of `n`, storing the result in `n`.
    pub fn log10(&mut self, n: &mut Decimal<N>) {
        self.unary(n, math::log10);
    }

    /// Computes the adjusted exponent of the number, according to IEEE 754
    /// rules.
    pub fn logb(&mut self, n: &mut Decimal<N>) {
        self.unary(n, arith::logb);
    }

    /// Places whichever of `lhs` and `rhs` is larger in `lhs`.
    ///
    /// The comparison is performed using the same rules as for
    /// [`total_cmp`](Context::<Decimal<N>>::total_cmp).
    pub fn max(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| arith::min_max(a, b, true, false, cx));
    }

    /// Places whichever of `lhs` and `rhs` has the larger absolute value in
    /// `lhs`.
    pub fn max_abs(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| arith::min_max(a, b, true, true, cx));
    }

    /// Places whichever of `lhs` and `rhs` is smaller in `lhs`.
    ///
    /// The comparison is performed using the same rules as for
    /// [`total_cmp`](Context::<Decimal<N>>::total_cmp).
    pub fn min(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| arith::min_max(a, b, false, false, cx));
    }

    /// Places whichever of `lhs` and `rhs` has the smaller absolute value in
    /// `lhs`.
    pub fn min_abs(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| arith::min_max(a, b, false, true, cx));
    }

    /// Subtracts `n` from zero, storing the result in `n`.
    pub fn minus(&mut self, n: &mut Decimal<N>) {
        self.unary(n, arith::minus);
    }

    /// Multiples `lhs` by `rhs`, storing the result in `lhs`.
    pub fn mul(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, arith::multiply);
    }

    /// Carries out the digitwise logical or of `lhs` and `rhs`, storing
    /// the result in `lhs`.
    pub fn or(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| arith::logical(a, b, LogicalOp::Or, cx));
    }

    /// Determines the ordering of `lhs` relative to `rhs`, using a partial
    /// order.
    ///
    /// If either `lhs` or `rhs` is a NaN, returns `None`. To force an ordering
    /// upon NaNs, use [`total_cmp`](Context::<Decimal<N>>::total_cmp).
    pub fn partial_cmp(&mut self, lhs: &Decimal<N>, rhs: &Decimal<N>) -> Option<Ordering> {
        arith::compare_op(&lhs.to_num(), &rhs.to_num(), &mut self.inner)
    }

    /// Like [`partial_cmp`](Context::<Decimal<N>>::partial_cmp), but raises
    /// `INVALID_OPERATION` if either operand is a NaN, quiet or not.
    pub fn cmp_signal(&mut self, lhs: &Decimal<N>, rhs: &Decimal<N>) -> Option<Ordering> {
        arith::compare_signal(&lhs.to_num(), &rhs.to_num(), &mut self.inner)
    }

    /// Adds `n` to zero, storing the result in `n`.
    pub fn plus(&mut self, n: &mut Decimal<N>) {
        self.unary(n, arith::plus);
    }

    /// Raises `x` to the power of `y`, storing the result in `x`.
    pub fn pow(&mut self, x: &mut Decimal<N>, y: &Decimal<N>) {
        self.binary(x, y, math::pow);
    }

    /// Rounds or pads `lhs` so that it has the same exponent as `rhs`, storing
    /// the result in `lhs`.
    pub fn quantize(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, arith::quantize);
    }

    /// Reduces `n`'s coefficient to its shortest possible form without
    /// changing the value of the result, storing the result in `n`.
    pub fn reduce(&mut self, n: &mut Decimal<N>) {
        self.unary(n, arith::reduce);
    }

    /// Integer-divides `lhs` by `rhs`, storing the remainder in `lhs`.
    pub fn rem(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| arith::divide(a, b, DivOp::Rem, cx));
    }

    /// Like [`rem`](Context::<Decimal<N>>::rem), but uses the IEEE 754
    /// rules for remainder operations.
    pub fn rem_near(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| {
            arith::divide(a, b, DivOp::RemNear, cx)
        });
    }

    /// Rescales `lhs` to have the exponent given by the integer value of
    /// `rhs`, rounding the coefficient as needed.
    pub fn rescale(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, arith::rescale);
    }

    /// Rounds the number to an integral value using the rounding mode in the
    /// context, storing the result in `n`.
    ///
    /// Unlike IEEE 754's *roundToIntegral* operations, raises `INEXACT` when
    /// discarded digits were non-zero.
    pub fn round(&mut self, n: &mut Decimal<N>) {
        self.unary(n, arith::round_to_integral);
    }

    /// Shifts the digits of `lhs` by `rhs`, storing the result in `lhs`.
    ///
    /// If `rhs` is positive, shifts to the left. If `rhs` is negative, shifts
    /// to the right. Any digits "shifted in" will be zero.
    ///
    /// `rhs` specifies the number of positions to shift, and must be a finite
    /// integer.
    pub fn shift(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, arith::shift);
    }

    /// Rotates the digits of `lhs` by `rhs`, storing the result in `lhs`.
    ///
    /// If `rhs` is positive, rotates to the left. If `rhs` is negative, rotates
    /// to the right.
    ///
    /// `rhs` specifies the number of positions to rotate, and must be a finite
    /// integer.
    pub fn rotate(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, arith::rotate);
    }

    /// Multiplies `x` by 10<sup>`y`</sup>, storing the result in `x`.
    pub fn scaleb(&mut self, x: &mut Decimal<N>, y: &Decimal<N>) {
        self.binary(x, y, arith::scaleb);
    }

    /// Computes the square root of `n`, storing the result in `n`.
    pub fn sqrt(&mut self, n: &mut Decimal<N>) {
        self.unary(n, math::sqrt);
    }

    /// Subtracts `rhs` from `lhs`, storing the result in `lhs`.
    pub fn sub(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| arith::add(a, b, true, cx));
    }

    /// Determines the ordering of `lhs` relative to `rhs`, using the
    /// total order predicate defined in IEEE 754-2008.
    ///
    /// For a brief description of the ordering, consult [`f32::total_cmp`].
    pub fn total_cmp(&mut self, lhs: &Decimal<N>, rhs: &Decimal<N>) -> Ordering {
        validate_n(N);
        arith::total_cmp(&lhs.to_num(), &rhs.to_num())
    }

    /// Like [`total_cmp`](Context::<Decimal<N>>::total_cmp), but compares
    /// the operands' absolute values.
    pub fn total_cmp_abs(&mut self, lhs: &Decimal<N>, rhs: &Decimal<N>) -> Ordering {
        validate_n(N);
        arith::total_cmp_abs(&lhs.to_num(), &rhs.to_num())
    }

    /// Carries out the digitwise logical xor of `lhs` and `rhs`, storing
    /// the result in `lhs`.
    pub fn xor(&mut self, lhs: &mut Decimal<N>, rhs: &Decimal<N>) {
        self.binary(lhs, rhs, |a, b, cx| {
            arith::logical(a, b, LogicalOp::Xor, cx)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lsu_round_trips() {
        let mut cx = Context::<Decimal<12>>::default();
        let d = cx.parse("-12.34").unwrap();
        assert_eq!(d.digits, 4);
        assert_eq!(d.exponent, -2);
        assert_eq!(d.bits, BIT_NEG);
        assert_eq!(&d.lsu[..2], &[234, 1]);
        assert_eq!(d.to_num().coef, vec![1, 2, 3, 4]);
        assert_eq!(d.to_string(), "-12.34");
    }

    #[test]
    fn integer_predicate() {
        let d: Decimal<12> = "100".parse().unwrap();
        assert!(d.is_integer());
        let d: Decimal<12> = "1.00E+2".parse().unwrap();
        assert!(d.is_integer());
        let d: Decimal<12> = "100.5".parse().unwrap();
        assert!(!d.is_integer());
        let d: Decimal<12> = "0.00".parse().unwrap();
        assert!(d.is_integer());
        assert!(!Decimal::<12>::infinity().is_integer());
    }

    #[test]
    fn primitive_conversions() {
        assert_eq!(Decimal::<12>::from(0u8).to_string(), "0");
        assert_eq!(Decimal::<12>::from(-42i64).to_string(), "-42");
        assert!(Decimal::<12>::try_from(u128::MAX).is_err());
        assert_eq!(
            Decimal::<13>::try_from(u128::MAX).unwrap().to_string(),
            "340282366920938463463374607431768211455"
        );
        assert_eq!(Decimal::<12>::from(i64::MIN).to_string(), "-9223372036854775808");
    }

    #[test]
    fn quantum() {
        let a: Decimal<12> = "1.00".parse().unwrap();
        let b: Decimal<12> = "9.99".parse().unwrap();
        assert!(a.quantum_matches(&b));
        let c: Decimal<12> = "1.0".parse().unwrap();
        assert!(!a.quantum_matches(&c));
        assert!(Decimal::<12>::nan().quantum_matches(&Decimal::<12>::nan()));
        assert!(!Decimal::<12>::nan().quantum_matches(&a));
    }
}
