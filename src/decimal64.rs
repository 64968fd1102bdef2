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
use std::convert::TryInto;
use std::fmt;
use std::iter::{Product, Sum};
use std::marker::PhantomData;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use static_assertions::assert_eq_size;

use crate::arith::{self, DivOp, Kind, LogicalOp, Num};
use crate::context::{Class, Context, ContextInner, Rounding, Status};
use crate::decimal::Decimal;
use crate::decimal128::Decimal128;
use crate::decimal32::Decimal32;
use crate::dpd::{self, FORM64};
use crate::error::ParseDecimalError;

/// A 64-bit decimal floating-point number.
///
/// Additional operations are defined as methods on the [`Context`] type.
///
/// For convenience, `Decimal64` overloads many of the standard Rust operators.
/// For example, you can use the standard `+` operator to add two values
/// together:
///
/// ```
/// use decnumber::Decimal64;
/// let a = Decimal64::from(1);
/// let b = Decimal64::from(2);
/// assert_eq!(a + b, Decimal64::from(3));
/// ```
///
/// These overloaded operators implicitly construct a single-use default
/// context, which has some performance overhead. For maximum performance when
/// performing operations in bulk, use a long-lived context that you construct
/// yourself.
#[repr(transparent)]
#[derive(Clone, Copy)]
pub struct Decimal64 {
    pub(crate) inner: [u8; 8],
}

assert_eq_size!(Decimal64, u64);

impl Decimal64 {
    /// The value that represents Not-a-Number (NaN).
    pub const NAN: Decimal64 = Decimal64::from_ne_bytes(if cfg!(target_endian = "little") {
        [0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x7c]
    } else {
        [0x7c, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0]
    });

    /// The value that represents zero.
    pub const ZERO: Decimal64 = Decimal64::from_ne_bytes(if cfg!(target_endian = "little") {
        [0x0, 0x0, 0x0, 0x0, 0x0, 0x0, 0x38, 0x22]
    } else {
        [0x22, 0x38, 0x0, 0x0, 0x0, 0x0, 0x0, 0x0]
    });

    /// The value that represents one.
    pub const ONE: Decimal64 = Decimal64::from_ne_bytes(if cfg!(target_endian = "little") {
        [0x1, 0x0, 0x0, 0x0, 0x0, 0x0, 0x38, 0x22]
    } else {
        [0x22, 0x38, 0x0, 0x0, 0x0, 0x0, 0x0, 0x1]
    });

    /// The value that represents 2<sup>32</sup>.
    const TWO_POW_32: Decimal64 = Decimal64::from_ne_bytes(if cfg!(target_endian = "little") {
        [0x7A, 0xB5, 0xAF, 0x15, 0x1, 0x0, 0x38, 0x22]
    } else {
        [0x22, 0x38, 0x0, 0x1, 0x15, 0xAF, 0xB5, 0x7A]
    });

    pub(crate) fn to_num(&self) -> Num {
        dpd::decode(u128::from(u64::from_ne_bytes(self.inner)), &FORM64)
    }

    pub(crate) fn from_num(n: &Num) -> Decimal64 {
        let bits = dpd::encode(n, &FORM64) as u64;
        Decimal64 {
            inner: bits.to_ne_bytes(),
        }
    }

    /// Creates a number from its representation as a little-endian byte array.
    pub fn from_le_bytes(mut bytes: [u8; 8]) -> Decimal64 {
        if cfg!(target_endian = "big") {
            bytes.reverse();
        }
        Decimal64::from_ne_bytes(bytes)
    }

    /// Creates a number from its representation as a big-endian byte array.
    pub fn from_be_bytes(mut bytes: [u8; 8]) -> Decimal64 {
        if cfg!(target_endian = "little") {
            bytes.reverse();
        }
        Decimal64::from_ne_bytes(bytes)
    }

    /// Creates a number from its representation as a byte array in the
    /// native endianness of the target platform.
    pub const fn from_ne_bytes(bytes: [u8; 8]) -> Decimal64 {
        Decimal64 { inner: bytes }
    }

    /// Returns the memory representation of the number as a byte array in
    /// little-endian order.
    pub fn to_le_bytes(&self) -> [u8; 8] {
        let mut bytes = self.to_ne_bytes();
        if cfg!(target_endian = "big") {
            bytes.reverse();
        }
        bytes
    }

    /// Returns the memory representation of the number as a byte array in
    /// big-endian order.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        let mut bytes = self.to_ne_bytes();
        if cfg!(target_endian = "little") {
            bytes.reverse();
        }
        bytes
    }

    /// Returns the memory representation of the number as a byte array in
    /// the native endianness of the target platform.
    pub fn to_ne_bytes(&self) -> [u8; 8] {
        self.inner
    }

    /// Classifies the number.
    pub fn class(&self) -> Class {
        arith::classify(&self.to_num(), &Context::<Decimal64>::default().inner)
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
    pub fn coefficient(&self) -> i64 {
        let n = self.to_num();
        if n.kind != Kind::Finite {
            return 0;
        }
        let mut r: i64 = 0;
        for &d in &n.coef {
            r = r * 10 + i64::from(d);
        }
        if n.sign {
            r = -r;
        }
        r
    }

    /// Returns the individual digits of the coefficient in 8-bit, unpacked
    /// [binary-coded decimal][bcd] format.
    ///
    /// [bcd]: https://en.wikipedia.org/wiki/Binary-coded_decimal
    pub fn coefficient_digits(&self) -> [u8; 16] {
        let n = self.to_num();
        let mut buf = [0u8; 16];
        let start = 16 - n.coef.len();
        buf[start..].copy_from_slice(&n.coef);
        buf
    }

    /// Computes the exponent of the number.
    ///
    /// Returns zero if the number is a special value.
    pub fn exponent(&self) -> i32 {
        self.to_num().exp as i32
    }

    /// Returns an equivalent number whose encoding is guaranteed to be
    /// canonical.
    pub fn canonical(self) -> Decimal64 {
        let bits = dpd::canonical(u128::from(u64::from_ne_bytes(self.inner)), &FORM64) as u64;
        Decimal64 {
            inner: bits.to_ne_bytes(),
        }
    }

    /// Reports whether the encoding of the number is canonical.
    pub fn is_canonical(&self) -> bool {
        dpd::is_canonical(u128::from(u64::from_ne_bytes(self.inner)), &FORM64)
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

    /// Reports whether the number is an integer.
    ///
    /// An integer is a decimal number that is finite and has an exponent of
    /// zero.
    pub fn is_integer(&self) -> bool {
        let n = self.to_num();
        n.kind == Kind::Finite && n.exp == 0
    }

    /// Reports whether the number is a valid argument for logical operations.
    ///
    /// A number is a valid argument for logical operations if it is a
    /// nonnegative integer where each digit is either zero or one.
    pub fn is_logical(&self) -> bool {
        let n = self.to_num();
        n.kind == Kind::Finite
            && !n.sign
            && n.exp == 0
            && n.coef.iter().all(|&d| d <= 1)
    }

    /// Reports whether the number is a NaN.
    pub fn is_nan(&self) -> bool {
        self.combination() == 0b11111
    }

    /// Reports whether the number is less than zero and not a NaN.
    pub fn is_negative(&self) -> bool {
        self.is_signed() && !self.is_zero() && !self.is_nan()
    }

    /// Reports whether the number is normal.
    ///
    /// A normal number is finite, non-zero, and not subnormal.
    pub fn is_normal(&self) -> bool {
        matches!(self.class(), Class::NegNormal | Class::PosNormal)
    }

    /// Reports whether the number is greater than zero and not a NaN.
    pub fn is_positive(&self) -> bool {
        !self.is_signed() && !self.is_zero() && !self.is_nan()
    }

    /// Reports whether the number is a signaling NaN.
    pub fn is_signaling_nan(&self) -> bool {
        self.is_nan() && self.inner_bits() >> 57 & 1 != 0
    }

    /// Reports whether the number has a sign of 1.
    ///
    /// Note that zeros and NaNs may have a sign of 1.
    pub fn is_signed(&self) -> bool {
        self.inner_bits() >> 63 & 1 != 0
    }

    /// Reports whether the number is subnormal.
    ///
    /// A subnormal number is finite, non-zero, and has magnitude less than
    /// 10<sup>emin</sup>.
    pub fn is_subnormal(&self) -> bool {
        matches!(self.class(), Class::NegSubnormal | Class::PosSubnormal)
    }

    /// Reports whether the number is positive or negative zero.
    pub fn is_zero(&self) -> bool {
        let n = self.to_num();
        n.is_zero()
    }

    /// Reports whether the quantum of the number matches the quantum of
    /// `rhs`.
    ///
    /// Quantums are considered to match if the numbers have the same exponent,
    /// are both NaNs, or both infinite.
    pub fn quantum_matches(&self, rhs: &Decimal64) -> bool {
        if self.is_nan() || rhs.is_nan() {
            self.is_nan() && rhs.is_nan()
        } else if self.is_infinite() || rhs.is_infinite() {
            self.is_infinite() && rhs.is_infinite()
        } else {
            self.exponent() == rhs.exponent()
        }
    }

    /// Determines the ordering of this number relative to `rhs`, using the
    /// total order predicate defined in IEEE 754-2008.
    ///
    /// For a brief description of the ordering, consult [`f32::total_cmp`].
    pub fn total_cmp(&self, rhs: &Decimal64) -> Ordering {
        arith::total_cmp(&self.to_num(), &rhs.to_num())
    }

    /// Returns a string of the number in standard notation, i.e. guaranteed to
    /// not be scientific notation.
    pub fn to_standard_notation_string(&self) -> String {
        arith::to_standard_string(&self.to_num())
    }

    fn inner_bits(&self) -> u64 {
        u64::from_ne_bytes(self.inner)
    }

    fn combination(&self) -> u64 {
        self.inner_bits() >> 58 & 0x1f
    }
}

impl Default for Decimal64 {
    fn default() -> Decimal64 {
        Decimal64::ZERO
    }
}

impl fmt::Debug for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Decimal64 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&arith::to_string_common(&self.to_num(), f.alternate()))
    }
}

impl FromStr for Decimal64 {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Decimal64, ParseDecimalError> {
        Context::<Decimal64>::default().parse(s)
    }
}

impl From<i32> for Decimal64 {
    fn from(n: i32) -> Decimal64 {
        Decimal64::from_num(&arith::from_i64_num(i64::from(n)))
    }
}

impl From<u32> for Decimal64 {
    fn from(n: u32) -> Decimal64 {
        Decimal64::from_num(&arith::from_i64_num(i64::from(n)))
    }
}

impl From<Decimal32> for Decimal64 {
    fn from(d32: Decimal32) -> Decimal64 {
        // widening is always exact
        Decimal64::from_num(&d32.to_num())
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl Serialize for Decimal64 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_le_bytes().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<'de> Deserialize<'de> for Decimal64 {
    fn deserialize<D>(deserializer: D) -> Result<Decimal64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Decimal64::from_le_bytes(<[u8; 8]>::deserialize(
            deserializer,
        )?))
    }
}

#[cfg(feature = "num-traits")]
#[cfg_attr(docsrs, doc(cfg(feature = "num-traits")))]
impl num_traits::Zero for Decimal64 {
    fn zero() -> Decimal64 {
        Decimal64::ZERO
    }

    fn is_zero(&self) -> bool {
        Decimal64::is_zero(self)
    }
}

#[cfg(feature = "num-traits")]
#[cfg_attr(docsrs, doc(cfg(feature = "num-traits")))]
impl num_traits::One for Decimal64 {
    fn one() -> Decimal64 {
        Decimal64::ONE
    }
}

impl PartialOrd for Decimal64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Context::<Decimal64>::default().partial_cmp(*self, *other)
    }
}

impl PartialEq for Decimal64 {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl Neg for Decimal64 {
    type Output = Decimal64;

    fn neg(self) -> Decimal64 {
        Context::<Decimal64>::default().minus(self)
    }
}

impl Add<Decimal64> for Decimal64 {
    type Output = Decimal64;

    fn add(self, rhs: Decimal64) -> Decimal64 {
        Context::<Decimal64>::default().add(self, rhs)
    }
}

impl AddAssign<Decimal64> for Decimal64 {
    fn add_assign(&mut self, rhs: Decimal64) {
        *self = Context::<Decimal64>::default().add(*self, rhs);
    }
}

impl Div<Decimal64> for Decimal64 {
    type Output = Decimal64;

    fn div(self, rhs: Decimal64) -> Decimal64 {
        Context::<Decimal64>::default().div(self, rhs)
    }
}

impl DivAssign<Decimal64> for Decimal64 {
    fn div_assign(&mut self, rhs: Decimal64) {
        *self = Context::<Decimal64>::default().div(*self, rhs);
    }
}

impl Mul<Decimal64> for Decimal64 {
    type Output = Decimal64;

    fn mul(self, rhs: Decimal64) -> Decimal64 {
        Context::<Decimal64>::default().mul(self, rhs)
    }
}

impl MulAssign<Decimal64> for Decimal64 {
    fn mul_assign(&mut self, rhs: Decimal64) {
        *self = Context::<Decimal64>::default().mul(*self, rhs);
    }
}

impl Rem<Decimal64> for Decimal64 {
    type Output = Decimal64;

    fn rem(self, rhs: Decimal64) -> Decimal64 {
        Context::<Decimal64>::default().rem(self, rhs)
    }
}

impl RemAssign<Decimal64> for Decimal64 {
    fn rem_assign(&mut self, rhs: Decimal64) {
        *self = Context::<Decimal64>::default().rem(*self, rhs);
    }
}

impl Sub<Decimal64> for Decimal64 {
    type Output = Decimal64;

    fn sub(self, rhs: Decimal64) -> Decimal64 {
        Context::<Decimal64>::default().sub(self, rhs)
    }
}

impl SubAssign<Decimal64> for Decimal64 {
    fn sub_assign(&mut self, rhs: Decimal64) {
        *self = Context::<Decimal64>::default().sub(*self, rhs);
    }
}

impl Sum for Decimal64 {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = Decimal64>,
    {
        let mut cx = Context::<Decimal64>::default();
        let mut sum = Decimal64::ZERO;
        for d in iter {
            sum = cx.add(sum, d);
        }
        sum
    }
}

impl<'a> Sum<&'a Decimal64> for Decimal64 {
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = &'a Decimal64>,
    {
        iter.copied().sum()
    }
}

impl Product for Decimal64 {
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = Decimal64>,
    {
        let mut cx = Context::<Decimal64>::default();
        let mut product = Decimal64::ONE;
        for d in iter {
            product = cx.mul(product, d);
        }
        product
    }
}

impl<'a> Product<&'a Decimal64> for Decimal64 {
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = &'a Decimal64>,
    {
        iter.copied().product()
    }
}

impl Default for Context<Decimal64> {
    fn default() -> Context<Decimal64> {
        Context {
            inner: ContextInner {
                digits: 16,
                emax: 384,
                emin: -383,
                rounding: Rounding::HalfEven,
                clamp: true,
                status: Status::NONE,
            },
            _phantom: PhantomData,
        }
    }
}

impl Context<Decimal64> {
    fn unary<F>(&mut self, n: Decimal64, f: F) -> Decimal64
    where
        F: FnOnce(&Num, &mut ContextInner) -> Num,
    {
        let a = n.to_num();
        let r = f(&a, &mut self.inner);
        Decimal64::from_num(&r)
    }

    fn binary<F>(&mut self, lhs: Decimal64, rhs: Decimal64, f: F) -> Decimal64
    where
        F: FnOnce(&Num, &Num, &mut ContextInner) -> Num,
    {
        let a = lhs.to_num();
        let b = rhs.to_num();
        let r = f(&a, &b, &mut self.inner);
        Decimal64::from_num(&r)
    }

    /// Parses a number from its string representation.
    pub fn parse<S>(&mut self, s: S) -> Result<Decimal64, ParseDecimalError>
    where
        S: AsRef<str>,
    {
        match arith::parse(s.as_ref(), &mut self.inner) {
            Ok(n) => Ok(Decimal64::from_num(&n)),
            Err(()) => Err(ParseDecimalError),
        }
    }

    /// Constructs a number from a 128-bit decimal float.
    ///
    /// The result may be inexact. The status fields on the context will be set
    /// appropriately if so.
    pub fn from_decimal128(&mut self, d128: Decimal128) -> Decimal64 {
        let mut n = d128.to_num();
        arith::finalize(&mut n, &mut self.inner);
        Decimal64::from_num(&n)
    }

    /// Constructs a number from an arbitrary-precision decimal.
    ///
    /// The result may be inexact. The status fields on the context will be set
    /// appropriately if so.
    pub fn from_decimal<const N: usize>(&mut self, d: &Decimal<N>) -> Decimal64 {
        let mut n = d.to_num();
        arith::finalize(&mut n, &mut self.inner);
        Decimal64::from_num(&n)
    }

    /// Constructs a number from an `i64`.
    ///
    /// Note that this function can return inexact results for numbers with 15
    /// or more places of precision, e.g. `99_999_999_999_999_999i64`,
    /// `-99_999_999_999_999_999i64`, `i64::MAX`, `i64::MIN`, etc.
    ///
    /// However, some numbers with 15 or more places of precision retain their
    /// exactness, e.g. `1_000_000_000_000_000i64`.
    ///
    /// ```
    /// use decnumber::Decimal64;
    /// let mut ctx = decnumber::Context::<Decimal64>::default();
    /// let d = ctx.from_i64(-99_999_999_999_999_999i64);
    /// // Inexact result
    /// assert!(ctx.status().inexact());
    ///
    /// let mut ctx = decnumber::Context::<Decimal64>::default();
    /// let d = ctx.from_i64(1_000_000_000_000_000i64);
    /// // Exact result
    /// assert!(!ctx.status().inexact());
    /// ```
    ///
    /// To avoid inexact results when converting from large `i64`, use
    /// [`crate::Decimal128`] instead.
    pub fn from_i64(&mut self, n: i64) -> Decimal64 {
        from_signed_int!(Decimal64, self, n)
    }

    /// Constructs a number from an `u64`.
    ///
    /// Note that this function can return inexact results for numbers with 16
    /// or more places of precision, e.g., `1_000_000_000_000_0001u64` and
    /// `u64::MAX`.
    ///
    /// However, some numbers with 15 or more places of precision retain their
    /// exactness, e.g. `1_000_000_000_000_000u64`.
    ///
    /// To avoid inexact results when converting from large `u64`, use
    /// [`crate::Decimal128`] instead.
    pub fn from_u64(&mut self, n: u64) -> Decimal64 {
        from_unsigned_int!(Decimal64, self, n)
    }

    /// Computes the absolute value of `n`.
    ///
    /// This has the same effect as [`Context::<Decimal64>::plus`] unless
    /// `n` is negative, in which case it has the same effect as
    /// [`Context::<Decimal64>::minus`].
    ///
    /// The returned result will be canonical.
    pub fn abs(&mut self, n: Decimal64) -> Decimal64 {
        self.unary(n, arith::abs)
    }

    /// Adds `lhs` and `rhs`.
    pub fn add(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| arith::add(a, b, false, cx))
    }

    /// Carries out the digitwise logical and of `lhs` and `rhs`.
    ///
    /// The operands must be valid for logical operations.
    /// See [`Decimal64::is_logical`].
    pub fn and(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| {
            arith::logical(a, b, LogicalOp::And, cx)
        })
    }

    /// Divides `lhs` by `rhs`.
    pub fn div(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| arith::divide(a, b, DivOp::Div, cx))
    }

    /// Divides `lhs` by `rhs` and returns the integer part of the result
    /// (rounded towards zero) with an exponent of 0.
    ///
    /// If the result would overflow, then [`Status::division_impossible`] is
    /// set.
    ///
    /// [`Status::division_impossible`]: crate::context::Status::division_impossible
    pub fn div_integer(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| arith::divide(a, b, DivOp::DivInt, cx))
    }

    /// Calculates the fused multiply-add `(x * y) + z`.
    ///
    /// The multiplication is carried out first and is exact, so this operation
    /// only has the one, final rounding.
    pub fn fma(&mut self, x: Decimal64, y: Decimal64, z: Decimal64) -> Decimal64 {
        let a = x.to_num();
        let b = y.to_num();
        let c = z.to_num();
        let r = arith::fma(&a, &b, &c, &mut self.inner);
        Decimal64::from_num(&r)
    }

    /// Carries out the digitwise logical inversion of `n`.
    ///
    /// The operand must be valid for logical operation.
    /// See [`Decimal64::is_logical`].
    pub fn invert(&mut self, n: Decimal64) -> Decimal64 {
        self.unary(n, arith::invert)
    }

    /// Computes the adjusted exponent of the number, according to IEEE 754
    /// rules.
    pub fn logb(&mut self, n: Decimal64) -> Decimal64 {
        self.unary(n, arith::logb)
    }

    /// Returns whichever of `lhs` and `rhs` is larger.
    ////
    /// The comparison is performed using the same rules as for
    /// [`Decimal64::total_cmp`].
    pub fn max(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| arith::min_max(a, b, true, false, cx))
    }

    /// Returns whichever of `lhs` and `rhs` has the largest absolute value.
    pub fn max_abs(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| arith::min_max(a, b, true, true, cx))
    }

    /// Returns whichever of `lhs` and `rhs` is smaller.
    ////
    /// The comparison is performed using the same rules as for
    /// [`Decimal64::total_cmp`].
    pub fn min(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| arith::min_max(a, b, false, false, cx))
    }

    /// Returns whichever of `lhs` and `rhs` has the smallest absolute value.
    pub fn min_abs(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| arith::min_max(a, b, false, true, cx))
    }

    /// Subtracts `n` from zero.
    pub fn minus(&mut self, n: Decimal64) -> Decimal64 {
        self.unary(n, arith::minus)
    }

    /// Multiplies `lhs` by `rhs`.
    pub fn mul(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, arith::multiply)
    }

    /// Determines the ordering of `lhs` relative to `rhs`, using a partial
    /// order.
    ///
    /// If either `lhs` or `rhs` is a NaN, returns `None`. To force an ordering
    /// upon NaNs, use [`Decimal64::total_cmp`] or
    /// [`OrderedDecimal`](crate::OrderedDecimal).
    pub fn partial_cmp(&mut self, lhs: Decimal64, rhs: Decimal64) -> Option<Ordering> {
        arith::compare_op(&lhs.to_num(), &rhs.to_num(), &mut self.inner)
    }

    /// Adds `n` to zero.
    pub fn plus(&mut self, n: Decimal64) -> Decimal64 {
        self.unary(n, arith::plus)
    }

    /// Rounds or pads `lhs` so that it has the same exponent as `rhs`.
    pub fn quantize(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, arith::quantize)
    }

    /// Reduces the number's coefficient to its shortest possible form without
    /// changing the value of the result.
    ///
    /// This removes all possible trailing zeros; some may remain when the
    /// number is very close to the most positive or most negative number.
    pub fn reduce(&mut self, n: Decimal64) -> Decimal64 {
        self.unary(n, arith::reduce)
    }

    /// Integer-divides `lhs` by `rhs` and returns the remainder from the
    /// division.
    pub fn rem(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| arith::divide(a, b, DivOp::Rem, cx))
    }

    /// Like [`rem`](Context::<Decimal64>::rem), but uses the IEEE 754
    /// rules for remainder operations.
    pub fn rem_near(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| {
            arith::divide(a, b, DivOp::RemNear, cx)
        })
    }

    /// Rotates the digits of `lhs` by `rhs`.
    ///
    /// If `rhs` is positive, rotates to the left. If `rhs` is negative, rotates
    /// to the right.
    ///
    /// `rhs` specifies the number of positions to rotate, and must be a finite
    /// integer. NaNs are propagated as usual.
    ///
    /// If `lhs` is infinity, the result is infinity of the same sign.
    pub fn rotate(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, arith::rotate)
    }

    /// Rounds the number to an integral value using the rounding mode in the
    /// context.
    pub fn round(&mut self, n: Decimal64) -> Decimal64 {
        self.unary(n, arith::round_to_integral)
    }

    /// Multiplies `x` by 10<sup>`y`</sup>.
    pub fn scaleb(&mut self, x: Decimal64, y: Decimal64) -> Decimal64 {
        self.binary(x, y, arith::scaleb)
    }

    /// Sets `d`'s exponent to `e` _without_ modifying the coefficient.
    ///
    /// `e` must lie within the format's exponent range.
    pub fn set_exponent(&mut self, d: &mut Decimal64, e: i32) {
        let mut n = d.to_num();
        n.exp = i64::from(e);
        *d = Decimal64::from_num(&n);
    }

    /// Shifts the digits of `lhs` by `rhs`.
    ///
    /// If `rhs` is positive, shifts to the left. If `rhs` is negative, shifts
    /// to the right. Any digits "shifted in" will be zero.
    ///
    /// `rhs` specifies the number of positions to shift, and must be a finite
    /// integer. NaNs are propagated as usual.
    ///
    /// If `lhs` is infinity, the result is infinity of the same sign.
    pub fn shift(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, arith::shift)
    }

    /// Adjust `x`'s exponent to equal `s`, while retaining as many of the same
    /// significant digits of the coefficient as permitted with the current and
    /// new exponents.
    ///
    /// - When increasing the exponent's value, **irrevocably truncates** the least
    ///   significant digits. Use caution in this context.
    /// - When reducing the exponent's value, appends `0`s as less significant
    ///   digits.
    ///
    /// ```
    /// use decnumber::{Context, Decimal64};
    /// let mut cx = Context::<Decimal64>::default();
    /// let mut d = cx.div(Decimal64::from(5), Decimal64::from(4));
    ///
    /// assert_eq!(d.exponent(), -2);
    /// assert_eq!(d.to_string(), "1.25");
    ///
    /// cx.rescale(&mut d, -3);
    /// assert_eq!(d.exponent(), -3);
    /// assert_eq!(d.to_string(), "1.250");
    ///
    /// cx.rescale(&mut d, -1);
    /// assert_eq!(d.exponent(), -1);
    /// assert_eq!(d.to_string(), "1.2");
    ///
    /// cx.rescale(&mut d, 0);
    /// assert_eq!(d.exponent(), 0);
    /// assert_eq!(d.to_string(), "1");
    /// ```
    pub fn rescale(&mut self, x: &mut Decimal64, s: i32) {
        let e = x.exponent();
        *x = self.shift(*x, Decimal64::from(e - s));
        self.set_exponent(x, s);
    }

    /// Subtracts `rhs` from `lhs`.
    pub fn sub(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| arith::add(a, b, true, cx))
    }

    /// Carries out the digitwise logical or of `lhs` and `rhs`.
    ///
    /// The operands must be valid for logical operations.
    /// See [`Decimal64::is_logical`].
    pub fn or(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| arith::logical(a, b, LogicalOp::Or, cx))
    }

    /// Carries out the digitwise logical exclusive or of `lhs` and `rhs`.
    ///
    /// The operands must be valid for logical operations.
    /// See [`Decimal64::is_logical`].
    pub fn xor(&mut self, lhs: Decimal64, rhs: Decimal64) -> Decimal64 {
        self.binary(lhs, rhs, |a, b, cx| {
            arith::logical(a, b, LogicalOp::Xor, cx)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_decode() {
        assert!(Decimal64::ZERO.is_zero());
        assert_eq!(Decimal64::ZERO.exponent(), 0);
        assert_eq!(Decimal64::ONE.to_string(), "1");
        assert!(Decimal64::NAN.is_nan());
        assert!(!Decimal64::NAN.is_signaling_nan());
        assert_eq!(Decimal64::TWO_POW_32, Decimal64::from_num(&arith::from_i64_num(1 << 32)));
    }

    #[test]
    fn arithmetic() {
        let mut cx = Context::<Decimal64>::default();
        let a = cx.parse("0.1").unwrap();
        let b = cx.parse("0.2").unwrap();
        let c = cx.add(a, b);
        assert_eq!(c.to_string(), "0.3");
        assert!(!cx.status().any());
    }

    #[test]
    fn rounding_to_format() {
        let mut cx = Context::<Decimal64>::default();
        let d = cx.parse("12345678901234567890").unwrap();
        assert_eq!(d.to_string(), "1.234567890123457E+19");
        assert!(cx.status().inexact());
    }

    #[test]
    fn from_i64_exactness() {
        let mut cx = Context::<Decimal64>::default();
        let d = cx.from_i64(1_000_000_000_000_000);
        assert_eq!(d.to_string(), "1000000000000000");
        assert!(!cx.status().inexact());

        let mut cx = Context::<Decimal64>::default();
        cx.from_i64(-99_999_999_999_999_999);
        assert!(cx.status().inexact());
    }

    #[test]
    fn canonical_checks() {
        assert!(Decimal64::ZERO.is_canonical());
        assert!(Decimal64::ONE.is_canonical());
        // a declet of 0x16E (a non-canonical alias of 888) in the low bits
        let bits: u64 = 0x2238000000000000 | 0x16E;
        let d = Decimal64::from_ne_bytes(bits.to_ne_bytes());
        assert!(!d.is_canonical());
        assert_eq!(d.canonical().to_string(), "888");
        assert_eq!(d.to_string(), "888");
    }
}
