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

use crate::error::StatusError;

/// The raw settings and accumulated status shared by every context type.
///
/// `digits`, `emax`, and `emin` are stored wide enough for the base context's
/// 999 999 999 limits.
#[derive(Debug, Clone)]
pub(crate) struct ContextInner {
    pub(crate) digits: i32,
    pub(crate) emax: i32,
    pub(crate) emin: i32,
    pub(crate) rounding: Rounding,
    pub(crate) clamp: bool,
    pub(crate) status: Status,
}

/// A context for performing decimal operations.
///
/// Contexts serve two purposes:
///
///   * They configure various properties of decimal arithmetic, like the
///     rounding algorithm to use.
///
///   * They accumulate any informational and exceptional conditions raised by
///     decimal operations. Multiple operations can be performed on a context
///     and the status need only be checked once at the end. This can improve
///     performance when performing many decimal operations.
///
/// A given context is only valid for use with one decimal type, specified by
/// the `D` type parameter.
///
/// Not all context types support all operations. For example, only the
/// context for the arbitrary-precision decimal type `Decimal` supports
/// configuring precision.
#[derive(Clone)]
pub struct Context<D> {
    pub(crate) inner: ContextInner,
    pub(crate) _phantom: PhantomData<D>,
}

impl<D> fmt::Debug for Context<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("clamp", &self.inner.clamp)
            .field("digits", &self.inner.digits)
            .field("emax", &self.inner.emax)
            .field("emin", &self.inner.emin)
            .field("rounding", &self.rounding())
            .finish()
    }
}

impl<D> Context<D> {
    /// Returns the context's rounding algorithm.
    pub fn rounding(&self) -> Rounding {
        self.inner.rounding
    }

    /// Set's the context's rounding algorithm.
    pub fn set_rounding(&mut self, rounding: Rounding) {
        self.inner.rounding = rounding;
    }

    /// Returns the context's status.
    pub fn status(&self) -> Status {
        self.inner.status
    }

    /// Returns a mutable reference to the context's status, through which
    /// individual conditions can be set and cleared.
    pub fn status_mut(&mut self) -> &mut Status {
        &mut self.inner.status
    }

    /// Clears the context's status.
    pub fn clear_status(&mut self) {
        self.inner.status.zero();
    }
}

/// Algorithms for rounding decimal numbers.
///
/// The rounding modes are precisely defined in [The Arithmetic Model][model]
/// chapter of the General Decimal Arithmetic specification.
///
/// [model]: http://speleotrove.com/decimal/damodel.html
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Rounding {
    /// Round towards positive infinity.
    Ceiling,
    /// Round towards zero (truncation).
    Down,
    /// Round towards negative infinity.
    Floor,
    /// Round to nearest; if equidistant, round down.
    HalfDown,
    /// Round to nearest; if equidistant, round so that the final digit is even.
    HalfEven,
    /// Round to nearest; if equidistant, round up.
    HalfUp,
    /// Round away from zero.
    Up,
    /// The same as [`Rounding::Up`], except that rounding up only occurs
    /// if the digit to be rounded up is 0 or 5.
    ///
    /// After overflow the result is the same as for [`Rounding::Down`].
    ZeroFiveUp,
}

impl Default for Rounding {
    fn default() -> Rounding {
        Rounding::HalfEven
    }
}

/// Represents exceptional conditions resulting from operations on decimal
/// numbers.
///
/// A status is a bitset over the individual conditions. Operations on a
/// context accumulate conditions into the context's status; the associated
/// constants and the [`set`](Status::set), [`clear`](Status::clear),
/// [`test`](Status::test), [`save`](Status::save), and
/// [`restore`](Status::restore) methods manipulate them in groups.
///
/// For details about the various exceptional conditions, consult the
/// [Exceptional Conditions][conditions] chapter of the General Decimal
/// Arithmetic specification.
///
/// [conditions]: http://speleotrove.com/decimal/daexcep.html
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Status {
    inner: u32,
}

impl Default for Status {
    fn default() -> Status {
        Status::NONE
    }
}

impl Status {
    /// The empty status.
    pub const NONE: Status = Status { inner: 0 };
    /// An invalid string was converted to a decimal.
    pub const CONVERSION_SYNTAX: Status = Status { inner: 0x0000_0001 };
    /// A nonzero dividend was divided by zero.
    pub const DIVISION_BY_ZERO: Status = Status { inner: 0x0000_0002 };
    /// The integer result of a division had too many digits.
    pub const DIVISION_IMPOSSIBLE: Status = Status { inner: 0x0000_0004 };
    /// A zero dividend was divided by zero.
    pub const DIVISION_UNDEFINED: Status = Status { inner: 0x0000_0008 };
    /// An operation ran out of memory.
    ///
    /// Retained for compatibility with the classification groups; operations
    /// in this crate abort on allocation failure and never raise it.
    pub const INSUFFICIENT_STORAGE: Status = Status { inner: 0x0000_0010 };
    /// One or more nonzero coefficient digits were discarded during rounding.
    pub const INEXACT: Status = Status { inner: 0x0000_0020 };
    /// An operation detected an invalid context.
    pub const INVALID_CONTEXT: Status = Status { inner: 0x0000_0040 };
    /// An operation received invalid arguments.
    pub const INVALID_OPERATION: Status = Status { inner: 0x0000_0080 };
    /// The exponent of a result was too large to be represented.
    pub const OVERFLOW: Status = Status { inner: 0x0000_0200 };
    /// The exponent of a result was altered or constrained to fit a concrete
    /// representation.
    pub const CLAMPED: Status = Status { inner: 0x0000_0400 };
    /// One or more zero or nonzero coefficient digits were discarded from a
    /// result.
    pub const ROUNDED: Status = Status { inner: 0x0000_0800 };
    /// A result's adjusted exponent was less than E<sub>min</sub> before any
    /// rounding.
    pub const SUBNORMAL: Status = Status { inner: 0x0000_1000 };
    /// A result was both subnormal and inexact.
    pub const UNDERFLOW: Status = Status { inner: 0x0000_2000 };

    /// The conditions that are normally regarded as errors.
    pub const ERRORS: Status = Status {
        inner: Status::CONVERSION_SYNTAX.inner
            | Status::DIVISION_BY_ZERO.inner
            | Status::DIVISION_IMPOSSIBLE.inner
            | Status::DIVISION_UNDEFINED.inner
            | Status::INSUFFICIENT_STORAGE.inner
            | Status::INVALID_CONTEXT.inner
            | Status::INVALID_OPERATION.inner
            | Status::OVERFLOW.inner
            | Status::UNDERFLOW.inner,
    };
    /// The conditions that result in a NaN.
    pub const NANS: Status = Status {
        inner: Status::CONVERSION_SYNTAX.inner
            | Status::DIVISION_IMPOSSIBLE.inner
            | Status::DIVISION_UNDEFINED.inner
            | Status::INSUFFICIENT_STORAGE.inner
            | Status::INVALID_CONTEXT.inner
            | Status::INVALID_OPERATION.inner,
    };
    /// The conditions that are merely informational.
    pub const INFORMATION: Status = Status {
        inner: Status::CLAMPED.inner
            | Status::ROUNDED.inner
            | Status::INEXACT.inner
            | Status::SUBNORMAL.inner,
    };

    /// Sets every condition in `mask`.
    pub fn set(&mut self, mask: Status) {
        self.inner |= mask.inner;
    }

    /// Clears every condition in `mask`.
    pub fn clear(&mut self, mask: Status) {
        self.inner &= !mask.inner;
    }

    /// Clears every condition.
    pub fn zero(&mut self) {
        self.inner = 0;
    }

    /// Reports whether any condition in `mask` is set.
    pub fn test(&self, mask: Status) -> bool {
        self.inner & mask.inner != 0
    }

    /// Returns the conditions in `mask` that are currently set.
    pub fn save(&self, mask: Status) -> Status {
        Status {
            inner: self.inner & mask.inner,
        }
    }

    /// Restores the conditions in `mask` to their state in `saved`, leaving
    /// the conditions outside `mask` untouched.
    pub fn restore(&mut self, saved: Status, mask: Status) {
        self.inner = (self.inner & !mask.inner) | (saved.inner & mask.inner);
    }

    /// Converts the error conditions in the status into a [`StatusError`].
    ///
    /// Returns `None` when no error condition is set.
    pub fn to_error(&self) -> Option<StatusError> {
        let errors = self.save(Status::ERRORS);
        if errors.any() {
            Some(StatusError(errors))
        } else {
            None
        }
    }

    /// Reports whether any of the condition flags are set.
    pub fn any(&self) -> bool {
        self.inner != 0
    }

    /// Reports whether the conversion syntax flag is set.
    ///
    /// Operations set this flag when an invalid string is converted to a
    /// decimal.
    pub fn conversion_syntax(&self) -> bool {
        self.test(Status::CONVERSION_SYNTAX)
    }

    /// Reports whether the division by zero flag is set.
    ///
    /// Operations set this flag when a nonzero dividend is divided by zero.
    pub fn division_by_zero(&self) -> bool {
        self.test(Status::DIVISION_BY_ZERO)
    }

    /// Reports whether the division impossible flag is set.
    ///
    /// Operations set this flag if the integer result of a division had too
    /// many digits.
    pub fn division_impossible(&self) -> bool {
        self.test(Status::DIVISION_IMPOSSIBLE)
    }

    /// Reports whether the division undefined flag is set.
    ///
    /// Operations set this flag when a zero dividend is divided by zero.
    pub fn division_undefined(&self) -> bool {
        self.test(Status::DIVISION_UNDEFINED)
    }

    /// Reports whether the insufficient storage flag is set.
    ///
    /// Operations in this crate abort the process if memory allocation fails,
    /// so this flag is never set. It is nonetheless provided for completeness.
    pub fn insufficient_storage(&self) -> bool {
        self.test(Status::INSUFFICIENT_STORAGE)
    }

    /// Reports whether the inexact flag is set.
    ///
    /// Operations set this flag when one or more nonzero coefficient digits
    /// were discarded during rounding from a result.
    pub fn inexact(&self) -> bool {
        self.test(Status::INEXACT)
    }

    /// Reports whether the invalid context flag is set.
    ///
    /// Mathematical functions set this flag when the context's precision or
    /// exponent limits exceed what those functions support.
    pub fn invalid_context(&self) -> bool {
        self.test(Status::INVALID_CONTEXT)
    }

    /// Reports whether the invalid operation flag is set.
    ///
    /// Various operations set this flag in response to invalid arguments.
    pub fn invalid_operation(&self) -> bool {
        self.test(Status::INVALID_OPERATION)
    }

    /// Reports whether the overflow flag is set.
    ///
    /// Operations set this flag when the exponent of a result is too large to
    /// be represented.
    pub fn overflow(&self) -> bool {
        self.test(Status::OVERFLOW)
    }

    /// Reports whether the clamped flag is set.
    ///
    /// Operations set this flag when the exponent of a result has been altered
    /// or constrained in order to fit the constraints of a specific concrete
    /// representation.
    pub fn clamped(&self) -> bool {
        self.test(Status::CLAMPED)
    }

    /// Reports whether the rounded flag is set.
    ///
    /// Operations set this flag when one or more zero or nonzero coefficient
    /// digits were discarded from a result.
    pub fn rounded(&self) -> bool {
        self.test(Status::ROUNDED)
    }

    /// Reports whether the subnormal flag is set.
    ///
    /// Operations set this flag when a result's adjusted exponent is less than
    /// E<sub>min</sub> before any rounding.
    pub fn subnormal(&self) -> bool {
        self.test(Status::SUBNORMAL)
    }

    /// Reports whether the underflow flag is set.
    ///
    /// Operations set this flag when a result is both subnormal and inexact.
    pub fn underflow(&self) -> bool {
        self.test(Status::UNDERFLOW)
    }

    fn name(&self) -> Option<&'static str> {
        let name = match *self {
            Status::CONVERSION_SYNTAX => "Conversion syntax",
            Status::DIVISION_BY_ZERO => "Division by zero",
            Status::DIVISION_IMPOSSIBLE => "Division impossible",
            Status::DIVISION_UNDEFINED => "Division undefined",
            Status::INSUFFICIENT_STORAGE => "Insufficient storage",
            Status::INEXACT => "Inexact",
            Status::INVALID_CONTEXT => "Invalid context",
            Status::INVALID_OPERATION => "Invalid operation",
            Status::OVERFLOW => "Overflow",
            Status::CLAMPED => "Clamped",
            Status::ROUNDED => "Rounded",
            Status::SUBNORMAL => "Subnormal",
            Status::UNDERFLOW => "Underflow",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for Status {
    /// Renders `"No status"` for an empty status, the name of the condition
    /// for a status with exactly one condition set, and `"Multiple status"`
    /// otherwise.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.any() {
            f.write_str("No status")
        } else if self.inner.count_ones() == 1 {
            match self.name() {
                Some(name) => f.write_str(name),
                None => f.write_str("Multiple status"),
            }
        } else {
            f.write_str("Multiple status")
        }
    }
}

/// An error indicating that a string does not name a single status condition.
#[derive(Debug, Eq, PartialEq)]
pub struct ParseStatusError;

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid status name")
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for Status {
    type Err = ParseStatusError;

    /// Inverts the `Display` rendering of a single-condition status.
    ///
    /// `"No status"` parses to the empty status; `"Multiple status"` and
    /// unknown names fail, as the conditions they stand for cannot be
    /// recovered.
    fn from_str(s: &str) -> Result<Status, ParseStatusError> {
        let status = match s {
            "No status" => Status::NONE,
            "Conversion syntax" => Status::CONVERSION_SYNTAX,
            "Division by zero" => Status::DIVISION_BY_ZERO,
            "Division impossible" => Status::DIVISION_IMPOSSIBLE,
            "Division undefined" => Status::DIVISION_UNDEFINED,
            "Insufficient storage" => Status::INSUFFICIENT_STORAGE,
            "Inexact" => Status::INEXACT,
            "Invalid context" => Status::INVALID_CONTEXT,
            "Invalid operation" => Status::INVALID_OPERATION,
            "Overflow" => Status::OVERFLOW,
            "Clamped" => Status::CLAMPED,
            "Rounded" => Status::ROUNDED,
            "Subnormal" => Status::SUBNORMAL,
            "Underflow" => Status::UNDERFLOW,
            _ => return Err(ParseStatusError),
        };
        Ok(status)
    }
}

/// The class of a decimal number.
///
/// These classes are precisely defined in [The Arithmetic Model][model] chapter
/// of the General Decimal Arithmetic specification.
///
/// [model]: http://speleotrove.com/decimal/damodel.html
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Class {
    /// Signaling NaN ("Not a Number").
    SignalingNan,
    /// Quiet NaN ("Not a Number").
    QuietNan,
    /// Negative infinity.
    NegInfinity,
    /// Negative normal.
    NegNormal,
    /// Negative subnormal.
    NegSubnormal,
    /// Negative zero.
    NegZero,
    /// Positive zero.
    PosZero,
    /// Positive subnormal.
    PosSubnormal,
    /// Positive normal.
    PosNormal,
    /// Positive infinity.
    PosInfinity,
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Class::SignalingNan => f.write_str("sNaN"),
            Class::QuietNan => f.write_str("NaN"),
            Class::NegInfinity => f.write_str("-Infinity"),
            Class::NegNormal => f.write_str("-Normal"),
            Class::NegSubnormal => f.write_str("-Subnormal"),
            Class::NegZero => f.write_str("-Zero"),
            Class::PosZero => f.write_str("+Zero"),
            Class::PosSubnormal => f.write_str("+Subnormal"),
            Class::PosNormal => f.write_str("+Normal"),
            Class::PosInfinity => f.write_str("+Infinity"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_groups() {
        let mut status = Status::NONE;
        assert!(!status.any());
        status.set(Status::INEXACT);
        status.set(Status::ROUNDED);
        assert!(status.inexact());
        assert!(status.rounded());
        assert!(!status.test(Status::ERRORS));
        assert!(status.to_error().is_none());

        status.set(Status::OVERFLOW);
        assert!(status.test(Status::ERRORS));
        let err = status.to_error().unwrap();
        assert_eq!(err.status(), Status::OVERFLOW);
        assert_eq!(err.to_string(), "Overflow");

        let saved = status.save(Status::INFORMATION);
        status.zero();
        assert!(!status.any());
        status.restore(saved, Status::INFORMATION);
        assert!(status.inexact());
        assert!(status.rounded());
        assert!(!status.overflow());
    }

    #[test]
    fn status_display_round_trips() {
        let singles = [
            Status::CONVERSION_SYNTAX,
            Status::DIVISION_BY_ZERO,
            Status::DIVISION_IMPOSSIBLE,
            Status::DIVISION_UNDEFINED,
            Status::INSUFFICIENT_STORAGE,
            Status::INEXACT,
            Status::INVALID_CONTEXT,
            Status::INVALID_OPERATION,
            Status::OVERFLOW,
            Status::CLAMPED,
            Status::ROUNDED,
            Status::SUBNORMAL,
            Status::UNDERFLOW,
        ];
        for s in singles {
            assert_eq!(s.to_string().parse::<Status>().unwrap(), s);
        }
        assert_eq!(Status::NONE.to_string(), "No status");
        assert_eq!("No status".parse::<Status>().unwrap(), Status::NONE);

        let mut multi = Status::NONE;
        multi.set(Status::INEXACT);
        multi.set(Status::ROUNDED);
        assert_eq!(multi.to_string(), "Multiple status");
        assert!("Multiple status".parse::<Status>().is_err());
        assert!("garbage".parse::<Status>().is_err());
    }
}
