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

//! The arbitrary-precision arithmetic engine.
//!
//! Operations work on [`Num`], an unpacked representation with one decimal
//! digit per byte, most significant digit first. The packed `Decimal<N>`
//! representation is converted to and from `Num` at operation boundaries.
//! Every operation that produces a finite result runs it through
//! [`finalize`], which rounds to the context's precision and applies the
//! exponent limits, accumulating conditions into the context's status.

use std::cmp::Ordering;

use crate::context::{Class, ContextInner, Rounding, Status};

/// The kind of value a [`Num`] holds.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum Kind {
    Finite,
    Infinite,
    QNan,
    SNan,
}

/// An unpacked decimal number.
///
/// For finite values, `coef` holds the coefficient digits most significant
/// first, with no leading zeros except for the single digit of a zero value.
/// For NaNs, `coef` holds the payload digits; `[0]` means no payload. The
/// exponent is kept wide so intermediate results cannot wrap before the
/// exponent limits are applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Num {
    pub(crate) sign: bool,
    pub(crate) exp: i64,
    pub(crate) coef: Vec<u8>,
    pub(crate) kind: Kind,
}

impl Num {
    pub(crate) fn zero() -> Num {
        Num {
            sign: false,
            exp: 0,
            coef: vec![0],
            kind: Kind::Finite,
        }
    }

    pub(crate) fn infinity(sign: bool) -> Num {
        Num {
            sign,
            exp: 0,
            coef: vec![0],
            kind: Kind::Infinite,
        }
    }

    pub(crate) fn qnan() -> Num {
        Num {
            sign: false,
            exp: 0,
            coef: vec![0],
            kind: Kind::QNan,
        }
    }

    pub(crate) fn is_nan(&self) -> bool {
        matches!(self.kind, Kind::QNan | Kind::SNan)
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.kind == Kind::Finite && self.coef.iter().all(|&d| d == 0)
    }

    /// The adjusted exponent, i.e. the exponent of the most significant
    /// digit. Meaningful only for stripped finite values.
    pub(crate) fn adjusted(&self) -> i64 {
        self.exp + self.coef.len() as i64 - 1
    }

    /// Removes leading zeros, keeping at least one digit.
    pub(crate) fn strip(&mut self) {
        let lead = self.coef.iter().take_while(|&&d| d == 0).count();
        let lead = lead.min(self.coef.len() - 1);
        if lead > 0 {
            self.coef.drain(..lead);
        }
    }
}

/// Raises `INVALID_OPERATION` and returns a quiet NaN.
pub(crate) fn invalid(cx: &mut ContextInner) -> Num {
    cx.status.set(Status::INVALID_OPERATION);
    Num::qnan()
}

/// Handles NaN operands per the usual propagation rules: the result is the
/// first signaling NaN if any, quietened, else the first quiet NaN; a
/// signaling NaN raises `INVALID_OPERATION`. Returns `None` when neither
/// operand is a NaN.
pub(crate) fn propagate_nans(a: &Num, b: Option<&Num>, cx: &mut ContextInner) -> Option<Num> {
    let a_nan = a.is_nan();
    let b_nan = b.map_or(false, |b| b.is_nan());
    if !a_nan && !b_nan {
        return None;
    }
    if a.kind == Kind::SNan || b.map_or(false, |b| b.kind == Kind::SNan) {
        cx.status.set(Status::INVALID_OPERATION);
    }
    let src = if a.kind == Kind::SNan {
        a
    } else if let Some(b) = b {
        if b.kind == Kind::SNan {
            b
        } else if a_nan {
            a
        } else {
            b
        }
    } else {
        a
    };
    let mut r = src.clone();
    r.kind = Kind::QNan;
    r.exp = 0;
    let max_payload = cx.digits.max(1) as usize;
    if r.coef.len() > max_payload {
        let excess = r.coef.len() - max_payload;
        r.coef.drain(..excess);
    }
    Some(r)
}

/// The result of discarding digits, for mapping onto status conditions.
struct Discarded {
    rounded: bool,
    inexact: bool,
}

/// Discards the `drop` least significant digits of `num`, rounding the kept
/// digits per `rounding` and raising the exponent accordingly. `drop` may
/// exceed the digit count; the missing high positions count as zeros.
fn discard(num: &mut Num, drop: usize, rounding: Rounding) -> Discarded {
    if drop == 0 {
        return Discarded {
            rounded: false,
            inexact: false,
        };
    }
    let len = num.coef.len();
    let keep = len.saturating_sub(drop);
    let (first, rest_nonzero) = if drop >= len {
        if drop == len {
            (num.coef[0], num.coef[1..].iter().any(|&d| d != 0))
        } else {
            (0, num.coef.iter().any(|&d| d != 0))
        }
    } else {
        (num.coef[keep], num.coef[keep + 1..].iter().any(|&d| d != 0))
    };
    let inexact = first != 0 || rest_nonzero;
    num.coef.truncate(keep);
    if num.coef.is_empty() {
        num.coef.push(0);
    }
    num.exp += drop as i64;
    let last = *num.coef.last().unwrap();
    let round_up = match rounding {
        Rounding::Down => false,
        Rounding::Up => inexact,
        Rounding::Ceiling => inexact && !num.sign,
        Rounding::Floor => inexact && num.sign,
        Rounding::HalfUp => first >= 5,
        Rounding::HalfDown => first > 5 || (first == 5 && rest_nonzero),
        Rounding::HalfEven => first > 5 || (first == 5 && (rest_nonzero || last % 2 == 1)),
        Rounding::ZeroFiveUp => inexact && (last == 0 || last == 5),
    };
    if round_up {
        increment(num);
    }
    Discarded {
        rounded: true,
        inexact,
    }
}

/// Adds one to the coefficient, keeping the digit count fixed: a carry out of
/// the most significant digit trades the now-zero low digit for one more
/// exponent.
fn increment(num: &mut Num) {
    for d in num.coef.iter_mut().rev() {
        if *d == 9 {
            *d = 0;
        } else {
            *d += 1;
            return;
        }
    }
    num.coef.insert(0, 1);
    num.coef.pop();
    num.exp += 1;
}

/// Rounds a finite result to the context's precision and applies the
/// exponent limits, raising `ROUNDED`, `INEXACT`, `SUBNORMAL`, `UNDERFLOW`,
/// `OVERFLOW`, and `CLAMPED` as appropriate.
pub(crate) fn finalize(num: &mut Num, cx: &mut ContextInner) {
    if num.kind != Kind::Finite {
        return;
    }
    num.strip();
    let prec = i64::from(cx.digits);
    let emax = i64::from(cx.emax);
    let emin = i64::from(cx.emin);
    let etiny = emin - (prec - 1);
    if num.is_zero() {
        let max = if cx.clamp { emax - (prec - 1) } else { emax };
        if num.exp < etiny {
            num.exp = etiny;
            cx.status.set(Status::CLAMPED);
        } else if num.exp > max {
            num.exp = max;
            cx.status.set(Status::CLAMPED);
        }
        return;
    }
    let subnormal = num.adjusted() < emin;
    if subnormal {
        cx.status.set(Status::SUBNORMAL);
    }
    let mut drop = num.coef.len() as i64 - prec;
    if subnormal && etiny - num.exp > drop {
        drop = etiny - num.exp;
    }
    if drop > 0 {
        let d = discard(num, drop as usize, cx.rounding);
        if d.rounded {
            cx.status.set(Status::ROUNDED);
        }
        if d.inexact {
            cx.status.set(Status::INEXACT);
            if subnormal {
                cx.status.set(Status::UNDERFLOW);
            }
        }
        if num.is_zero() {
            num.exp = etiny;
            cx.status.set(Status::CLAMPED);
            return;
        }
    }
    if subnormal {
        return;
    }
    if num.adjusted() > emax {
        overflow(num, cx);
        return;
    }
    if cx.clamp && num.exp > emax - (prec - 1) {
        // fold down: pad the coefficient to lower the exponent
        let pad = (num.exp - (emax - (prec - 1))) as usize;
        num.coef.extend(std::iter::repeat(0).take(pad));
        num.exp -= pad as i64;
        cx.status.set(Status::CLAMPED);
    }
}

/// Replaces an overflowed result with ±Infinity or ±Nmax per the rounding
/// mode, raising `OVERFLOW`, `INEXACT`, and `ROUNDED`.
fn overflow(num: &mut Num, cx: &mut ContextInner) {
    cx.status.set(Status::OVERFLOW);
    cx.status.set(Status::INEXACT);
    cx.status.set(Status::ROUNDED);
    let to_max = match cx.rounding {
        Rounding::Down | Rounding::ZeroFiveUp => true,
        Rounding::Ceiling => num.sign,
        Rounding::Floor => !num.sign,
        _ => false,
    };
    if to_max {
        let prec = cx.digits as usize;
        num.coef = vec![9; prec];
        num.exp = i64::from(cx.emax) - (prec as i64 - 1);
        num.kind = Kind::Finite;
    } else {
        num.coef = vec![0];
        num.exp = 0;
        num.kind = Kind::Infinite;
    }
}

/// Compares the magnitudes of two stripped, finite, nonzero values.
fn cmp_abs(a: &Num, b: &Num) -> Ordering {
    match a.adjusted().cmp(&b.adjusted()) {
        Ordering::Equal => {}
        ord => return ord,
    }
    let len = a.coef.len().max(b.coef.len());
    for i in 0..len {
        let da = a.coef.get(i).copied().unwrap_or(0);
        let db = b.coef.get(i).copied().unwrap_or(0);
        match da.cmp(&db) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    Ordering::Equal
}

/// Numerically compares two non-NaN values.
pub(crate) fn compare(a: &Num, b: &Num) -> Ordering {
    debug_assert!(!a.is_nan() && !b.is_nan());
    let a_zero = a.kind == Kind::Finite && a.is_zero();
    let b_zero = b.kind == Kind::Finite && b.is_zero();
    if a_zero && b_zero {
        return Ordering::Equal;
    }
    if a_zero {
        return if b.sign { Ordering::Greater } else { Ordering::Less };
    }
    if b_zero {
        return if a.sign { Ordering::Less } else { Ordering::Greater };
    }
    match (a.sign, b.sign) {
        (false, true) => return Ordering::Greater,
        (true, false) => return Ordering::Less,
        _ => {}
    }
    let ord = match (a.kind, b.kind) {
        (Kind::Infinite, Kind::Infinite) => Ordering::Equal,
        (Kind::Infinite, _) => Ordering::Greater,
        (_, Kind::Infinite) => Ordering::Less,
        _ => {
            let (mut sa, mut sb) = (a.clone(), b.clone());
            sa.strip();
            sb.strip();
            cmp_abs(&sa, &sb)
        }
    };
    if a.sign {
        ord.reverse()
    } else {
        ord
    }
}

/// Compares per the numeric comparison, returning `None` for NaN operands.
/// Signaling NaNs raise `INVALID_OPERATION`; quiet NaNs are unordered without
/// raising a condition.
pub(crate) fn compare_op(a: &Num, b: &Num, cx: &mut ContextInner) -> Option<Ordering> {
    if a.kind == Kind::SNan || b.kind == Kind::SNan {
        cx.status.set(Status::INVALID_OPERATION);
        return None;
    }
    if a.is_nan() || b.is_nan() {
        return None;
    }
    Some(compare(a, b))
}

/// Compares like [`compare_op`], but any NaN operand raises
/// `INVALID_OPERATION`.
pub(crate) fn compare_signal(a: &Num, b: &Num, cx: &mut ContextInner) -> Option<Ordering> {
    if a.is_nan() || b.is_nan() {
        cx.status.set(Status::INVALID_OPERATION);
        return None;
    }
    Some(compare(a, b))
}

fn kind_rank(kind: Kind) -> u8 {
    match kind {
        Kind::Finite => 0,
        Kind::Infinite => 1,
        Kind::SNan => 2,
        Kind::QNan => 3,
    }
}

/// Compares payload digit strings as integers.
fn cmp_payload(a: &[u8], b: &[u8]) -> Ordering {
    let sa: Vec<u8> = a.iter().copied().skip_while(|&d| d == 0).collect();
    let sb: Vec<u8> = b.iter().copied().skip_while(|&d| d == 0).collect();
    match sa.len().cmp(&sb.len()) {
        Ordering::Equal => sa.cmp(&sb),
        ord => ord,
    }
}

fn total_cmp_magnitude(a: &Num, b: &Num) -> Ordering {
    let (ra, rb) = (kind_rank(a.kind), kind_rank(b.kind));
    if ra != rb {
        return ra.cmp(&rb);
    }
    match a.kind {
        Kind::Infinite => Ordering::Equal,
        Kind::QNan | Kind::SNan => cmp_payload(&a.coef, &b.coef),
        Kind::Finite => {
            let (a_zero, b_zero) = (a.is_zero(), b.is_zero());
            if a_zero && b_zero {
                return a.exp.cmp(&b.exp);
            }
            if a_zero {
                return Ordering::Less;
            }
            if b_zero {
                return Ordering::Greater;
            }
            let (mut sa, mut sb) = (a.clone(), b.clone());
            sa.strip();
            sb.strip();
            match cmp_abs(&sa, &sb) {
                Ordering::Equal => sa.exp.cmp(&sb.exp),
                ord => ord,
            }
        }
    }
}

/// The IEEE 754 total ordering. Never sets status.
pub(crate) fn total_cmp(a: &Num, b: &Num) -> Ordering {
    match (a.sign, b.sign) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => total_cmp_magnitude(a, b),
        (true, true) => total_cmp_magnitude(a, b).reverse(),
    }
}

/// The total ordering applied to the magnitudes of the operands.
pub(crate) fn total_cmp_abs(a: &Num, b: &Num) -> Ordering {
    total_cmp_magnitude(a, b)
}

/// Classifies a value against the context's subnormal boundary.
pub(crate) fn classify(a: &Num, cx: &ContextInner) -> Class {
    match a.kind {
        Kind::SNan => Class::SignalingNan,
        Kind::QNan => Class::QuietNan,
        Kind::Infinite => {
            if a.sign {
                Class::NegInfinity
            } else {
                Class::PosInfinity
            }
        }
        Kind::Finite => {
            if a.is_zero() {
                if a.sign {
                    Class::NegZero
                } else {
                    Class::PosZero
                }
            } else {
                let mut s = a.clone();
                s.strip();
                let subnormal = s.adjusted() < i64::from(cx.emin);
                match (a.sign, subnormal) {
                    (true, true) => Class::NegSubnormal,
                    (true, false) => Class::NegNormal,
                    (false, true) => Class::PosSubnormal,
                    (false, false) => Class::PosNormal,
                }
            }
        }
    }
}

/// Materializes the digits of `x` rescaled to exponent `e` in a window of
/// `width` digit slots, most significant first. Requires `x.exp >= e` and
/// enough slots for every digit.
fn aligned(x: &Num, e: i64, width: usize) -> Vec<u8> {
    let mut v = vec![0u8; width];
    let shift = (x.exp - e) as usize;
    let len = x.coef.len();
    for (i, &d) in x.coef.iter().enumerate() {
        let pos = (len - 1 - i) + shift;
        v[width - 1 - pos] = d;
    }
    v
}

fn add_vecs(a: &[u8], b: &[u8]) -> Vec<u8> {
    debug_assert_eq!(a.len(), b.len());
    let mut out = vec![0u8; a.len()];
    let mut carry = 0u8;
    for i in (0..a.len()).rev() {
        let v = a[i] + b[i] + carry;
        out[i] = v % 10;
        carry = v / 10;
    }
    debug_assert_eq!(carry, 0, "carry slot exhausted");
    out
}

/// `a - b` where `a >= b`, element counts equal.
fn sub_vecs(a: &[u8], b: &[u8]) -> Vec<u8> {
    debug_assert_eq!(a.len(), b.len());
    let mut out = vec![0u8; a.len()];
    let mut borrow = 0i8;
    for i in (0..a.len()).rev() {
        let mut v = a[i] as i8 - b[i] as i8 - borrow;
        if v < 0 {
            v += 10;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out[i] = v as u8;
    }
    debug_assert_eq!(borrow, 0, "subtrahend exceeds minuend");
    out
}

/// Adds two numbers; with `negate_b`, subtracts instead.
pub(crate) fn add(a: &Num, b: &Num, negate_b: bool, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, Some(b), cx) {
        return nan;
    }
    let bsign = b.sign ^ negate_b;
    match (a.kind, b.kind) {
        (Kind::Infinite, Kind::Infinite) => {
            if a.sign != bsign {
                return invalid(cx);
            }
            return Num::infinity(a.sign);
        }
        (Kind::Infinite, _) => return Num::infinity(a.sign),
        (_, Kind::Infinite) => return Num::infinity(bsign),
        _ => {}
    }
    let prec = i64::from(cx.digits);
    let mut oa = a.clone();
    oa.strip();
    let mut ob = b.clone();
    ob.sign = bsign;
    ob.strip();
    if oa.is_zero() && ob.is_zero() {
        let mut r = Num::zero();
        r.exp = oa.exp.min(ob.exp);
        r.sign = if oa.sign == ob.sign {
            oa.sign
        } else {
            cx.rounding == Rounding::Floor
        };
        finalize(&mut r, cx);
        return r;
    }
    // the operand with the greater magnitude position is the anchor
    let (mut hi, mut lo) = if ob.is_zero() || (!oa.is_zero() && oa.adjusted() >= ob.adjusted()) {
        (oa, ob)
    } else {
        (ob, oa)
    };
    if lo.is_zero() {
        // only the exponent of the zero matters; pad the other operand
        // toward it as far as precision allows
        let pad_allowed = (prec - hi.coef.len() as i64).max(0);
        let e = lo.exp.min(hi.exp).max(hi.exp - pad_allowed);
        let pad = (hi.exp - e) as usize;
        hi.coef.extend(std::iter::repeat(0).take(pad));
        hi.exp = e;
        finalize(&mut hi, cx);
        return hi;
    }
    // a distant small operand only contributes a sticky digit
    let cutoff = hi.exp.min(hi.adjusted() - prec - 3);
    if lo.adjusted() < cutoff - 1 {
        lo = Num {
            sign: lo.sign,
            exp: cutoff - 2,
            coef: vec![1],
            kind: Kind::Finite,
        };
    }
    let ideal = a.exp.min(b.exp);
    let e = hi.exp.min(lo.exp);
    let top = hi.adjusted().max(lo.adjusted()) + 1;
    let width = (top - e + 1) as usize;
    let va = aligned(&hi, e, width);
    let vb = aligned(&lo, e, width);
    let mut r = if hi.sign == lo.sign {
        Num {
            sign: hi.sign,
            exp: e,
            coef: add_vecs(&va, &vb),
            kind: Kind::Finite,
        }
    } else {
        match va.cmp(&vb) {
            Ordering::Equal => {
                let mut r = Num::zero();
                r.exp = ideal;
                r.sign = cx.rounding == Rounding::Floor;
                finalize(&mut r, cx);
                return r;
            }
            Ordering::Greater => Num {
                sign: hi.sign,
                exp: e,
                coef: sub_vecs(&va, &vb),
                kind: Kind::Finite,
            },
            Ordering::Less => Num {
                sign: lo.sign,
                exp: e,
                coef: sub_vecs(&vb, &va),
                kind: Kind::Finite,
            },
        }
    };
    finalize(&mut r, cx);
    r
}

/// Schoolbook product of two digit vectors, stripped of leading zeros.
pub(crate) fn mul_digits(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut acc = vec![0u32; a.len() + b.len()];
    for (i, &da) in a.iter().rev().enumerate() {
        if da == 0 {
            continue;
        }
        let mut carry = 0u32;
        for (j, &db) in b.iter().rev().enumerate() {
            let v = acc[i + j] + u32::from(da) * u32::from(db) + carry;
            acc[i + j] = v % 10;
            carry = v / 10;
        }
        let mut idx = i + b.len();
        while carry > 0 {
            let v = acc[idx] + carry;
            acc[idx] = v % 10;
            carry = v / 10;
            idx += 1;
        }
    }
    let mut out: Vec<u8> = acc.iter().rev().map(|&d| d as u8).collect();
    let lead = out.iter().take_while(|&&d| d == 0).count();
    let lead = lead.min(out.len() - 1);
    out.drain(..lead);
    out
}

/// The exact product, before any rounding. Returns `None` when the operands
/// invalidate the operation (∞ × 0).
fn multiply_exact(a: &Num, b: &Num) -> Option<Num> {
    debug_assert!(!a.is_nan() && !b.is_nan());
    let sign = a.sign ^ b.sign;
    match (a.kind, b.kind) {
        (Kind::Infinite, _) | (_, Kind::Infinite) => {
            if (a.kind == Kind::Finite && a.is_zero()) || (b.kind == Kind::Finite && b.is_zero()) {
                return None;
            }
            return Some(Num::infinity(sign));
        }
        _ => {}
    }
    if a.is_zero() || b.is_zero() {
        return Some(Num {
            sign,
            exp: a.exp + b.exp,
            coef: vec![0],
            kind: Kind::Finite,
        });
    }
    let mut oa = a.clone();
    oa.strip();
    let mut ob = b.clone();
    ob.strip();
    Some(Num {
        sign,
        exp: oa.exp + ob.exp,
        coef: mul_digits(&oa.coef, &ob.coef),
        kind: Kind::Finite,
    })
}

pub(crate) fn multiply(a: &Num, b: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, Some(b), cx) {
        return nan;
    }
    match multiply_exact(a, b) {
        None => invalid(cx),
        Some(mut r) => {
            finalize(&mut r, cx);
            r
        }
    }
}

/// Fused multiply-add: `a × b + c` with a single final rounding.
pub(crate) fn fma(a: &Num, b: &Num, c: &Num, cx: &mut ContextInner) -> Num {
    if a.is_nan() || b.is_nan() {
        let nan = propagate_nans(a, Some(b), cx).unwrap();
        // a signaling third operand must still signal
        if c.kind == Kind::SNan {
            cx.status.set(Status::INVALID_OPERATION);
        }
        return nan;
    }
    let product = match multiply_exact(a, b) {
        None => {
            if c.kind == Kind::SNan {
                cx.status.set(Status::INVALID_OPERATION);
            }
            return invalid(cx);
        }
        Some(p) => p,
    };
    add(&product, c, false, cx)
}

pub(crate) fn ge_digits(a: &[u8], b: &[u8]) -> bool {
    let sa = a.iter().copied().skip_while(|&d| d == 0).count();
    let sb = b.iter().copied().skip_while(|&d| d == 0).count();
    if sa != sb {
        return sa > sb;
    }
    let a: Vec<u8> = a.iter().copied().skip_while(|&d| d == 0).collect();
    let b: Vec<u8> = b.iter().copied().skip_while(|&d| d == 0).collect();
    a >= b
}

/// Subtracts `b` from `rem` in place; `rem >= b` stripped-digit-wise.
pub(crate) fn sub_in_place(rem: &mut Vec<u8>, b: &[u8]) {
    let width = rem.len().max(b.len());
    let mut vb = vec![0u8; width];
    vb[width - b.len()..].copy_from_slice(b);
    let mut va = vec![0u8; width];
    va[width - rem.len()..].copy_from_slice(rem);
    let out = sub_vecs(&va, &vb);
    *rem = out;
    let lead = rem.iter().take_while(|&&d| d == 0).count();
    let lead = lead.min(rem.len().saturating_sub(1));
    rem.drain(..lead);
}

fn div_step(rem: &mut Vec<u8>, b: &[u8]) -> u8 {
    let mut digit = 0u8;
    while ge_digits(rem, b) {
        sub_in_place(rem, b);
        digit += 1;
    }
    digit
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum DivOp {
    Div,
    DivInt,
    Rem,
    RemNear,
}

pub(crate) fn divide(a: &Num, b: &Num, op: DivOp, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, Some(b), cx) {
        return nan;
    }
    let sign = a.sign ^ b.sign;
    let prec = i64::from(cx.digits);
    let etiny = i64::from(cx.emin) - (prec - 1);
    match (a.kind, b.kind) {
        (Kind::Infinite, Kind::Infinite) => return invalid(cx),
        (Kind::Infinite, _) => {
            return match op {
                DivOp::Div | DivOp::DivInt => Num::infinity(sign),
                DivOp::Rem | DivOp::RemNear => invalid(cx),
            };
        }
        (_, Kind::Infinite) => {
            return match op {
                DivOp::Div => Num {
                    sign,
                    exp: etiny,
                    coef: vec![0],
                    kind: Kind::Finite,
                },
                DivOp::DivInt => Num {
                    sign,
                    exp: 0,
                    coef: vec![0],
                    kind: Kind::Finite,
                },
                DivOp::Rem | DivOp::RemNear => {
                    let mut r = a.clone();
                    finalize(&mut r, cx);
                    r
                }
            };
        }
        _ => {}
    }
    if b.is_zero() {
        if a.is_zero() {
            cx.status.set(Status::DIVISION_UNDEFINED);
            return Num::qnan();
        }
        return match op {
            DivOp::Div | DivOp::DivInt => {
                cx.status.set(Status::DIVISION_BY_ZERO);
                Num::infinity(sign)
            }
            DivOp::Rem | DivOp::RemNear => invalid(cx),
        };
    }
    if a.is_zero() {
        let mut r = Num {
            sign: match op {
                DivOp::Div | DivOp::DivInt => sign,
                DivOp::Rem | DivOp::RemNear => a.sign,
            },
            exp: match op {
                DivOp::Div => a.exp - b.exp,
                DivOp::DivInt => 0,
                DivOp::Rem | DivOp::RemNear => a.exp.min(b.exp),
            },
            coef: vec![0],
            kind: Kind::Finite,
        };
        finalize(&mut r, cx);
        return r;
    }
    let mut oa = a.clone();
    oa.strip();
    let mut ob = b.clone();
    ob.strip();
    match op {
        DivOp::Div => divide_full(&oa, &ob, sign, cx),
        _ => divide_integer(&oa, &ob, a, op, cx),
    }
}

/// Long division producing up to `digits + 1` significant quotient digits,
/// with the remainder folded into a sticky adjustment of the last digit.
fn divide_full(a: &Num, b: &Num, sign: bool, cx: &mut ContextInner) -> Num {
    let prec = cx.digits as usize;
    let mut q: Vec<u8> = Vec::with_capacity(prec + 1);
    let mut rem: Vec<u8> = vec![0];
    let mut s = 0usize;
    loop {
        let d_in = a.coef.get(s).copied().unwrap_or(0);
        if rem == [0] {
            rem[0] = d_in;
        } else {
            rem.push(d_in);
        }
        let digit = div_step(&mut rem, &b.coef);
        if !(q.is_empty() && digit == 0) {
            q.push(digit);
        }
        s += 1;
        if q.len() >= prec + 1 {
            break;
        }
        if s >= a.coef.len() && rem == [0] {
            break;
        }
    }
    let mut e_q = a.exp - b.exp + (a.coef.len() as i64 - s as i64);
    if q.is_empty() {
        q.push(0);
    }
    let sticky = rem != [0] || a.coef.get(s..).map_or(false, |t| t.iter().any(|&d| d != 0));
    if sticky {
        // fold the unproduced tail into the rounding digit
        let last = q.last_mut().unwrap();
        if *last == 0 {
            *last = 1;
        } else if *last == 5 {
            *last = 6;
        }
    } else {
        // exact: surplus trailing zeros approach the ideal exponent
        let ideal = a.exp - b.exp;
        while e_q < ideal && q.len() > 1 && *q.last().unwrap() == 0 {
            q.pop();
            e_q += 1;
        }
    }
    let mut r = Num {
        sign,
        exp: e_q,
        coef: q,
        kind: Kind::Finite,
    };
    finalize(&mut r, cx);
    r
}

/// Shared integer-quotient engine for divide-integer, remainder, and
/// remainder-near.
fn divide_integer(a: &Num, b: &Num, orig_a: &Num, op: DivOp, cx: &mut ContextInner) -> Num {
    let prec = i64::from(cx.digits);
    let sign = a.sign ^ b.sign;
    if cmp_abs(a, b) == Ordering::Less {
        // integer quotient is zero and the remainder is the dividend,
        // except that remainder-near may still round the quotient up
        if op != DivOp::RemNear || !twice_exceeds(a, b, false) {
            let mut r = match op {
                DivOp::DivInt => Num {
                    sign,
                    exp: 0,
                    coef: vec![0],
                    kind: Kind::Finite,
                },
                _ => orig_a.clone(),
            };
            finalize(&mut r, cx);
            return r;
        }
    }
    // the quotient digit count is bounded by the adjusted exponent gap
    if a.adjusted() - b.adjusted() > prec {
        cx.status.set(Status::DIVISION_IMPOSSIBLE);
        return Num::qnan();
    }
    let steps = a.coef.len() as i64 + (a.exp - b.exp);
    let mut q: Vec<u8> = Vec::new();
    let mut rem: Vec<u8> = vec![0];
    let mut s = 0i64;
    while s < steps {
        let d_in = a.coef.get(s as usize).copied().unwrap_or(0);
        if rem == [0] {
            rem[0] = d_in;
        } else {
            rem.push(d_in);
        }
        let digit = div_step(&mut rem, &b.coef);
        if !(q.is_empty() && digit == 0) {
            q.push(digit);
        }
        s += 1;
    }
    if q.is_empty() {
        q.push(0);
    }
    if q.len() as i64 > prec {
        cx.status.set(Status::DIVISION_IMPOSSIBLE);
        return Num::qnan();
    }
    if op == DivOp::DivInt {
        let mut r = Num {
            sign,
            exp: 0,
            coef: q,
            kind: Kind::Finite,
        };
        finalize(&mut r, cx);
        return r;
    }
    // remainder coefficient: current remainder followed by the unconsumed
    // dividend digits; exponent is the lesser operand exponent
    let rem_exp = a.exp.min(b.exp);
    let mut rem_coef = rem;
    if (s as usize) < a.coef.len() {
        if rem_coef == [0] {
            rem_coef.clear();
        }
        rem_coef.extend_from_slice(&a.coef[s as usize..]);
        if rem_coef.is_empty() {
            rem_coef.push(0);
        }
    }
    let mut rem_num = Num {
        sign: a.sign,
        exp: rem_exp,
        coef: rem_coef,
        kind: Kind::Finite,
    };
    rem_num.strip();
    if op == DivOp::RemNear && !rem_num.is_zero() {
        let q_odd = q.last().map_or(false, |&d| d % 2 == 1);
        if twice_exceeds(&rem_num, b, q_odd) {
            // round the quotient toward nearest: remainder flips around b
            if q.iter().all(|&d| d == 9) && q.len() as i64 >= prec {
                cx.status.set(Status::DIVISION_IMPOSSIBLE);
                return Num::qnan();
            }
            let e = rem_num.exp.min(b.exp);
            let top = rem_num.adjusted().max(b.adjusted()) + 1;
            let width = (top - e + 1) as usize;
            let vr = aligned(&rem_num, e, width);
            let mut vb = b.clone();
            vb.strip();
            let vb = aligned(&vb, e, width);
            rem_num = Num {
                sign: !a.sign,
                exp: e,
                coef: sub_vecs(&vb, &vr),
                kind: Kind::Finite,
            };
            rem_num.strip();
        }
    }
    finalize(&mut rem_num, cx);
    rem_num
}

/// Reports whether `2 × |rem|` exceeds `|b|`, or equals it when the integer
/// quotient is odd (the round-half-even tie for remainder-near).
fn twice_exceeds(rem: &Num, b: &Num, q_odd: bool) -> bool {
    if rem.is_zero() {
        return false;
    }
    let mut twice = rem.clone();
    twice.strip();
    twice.coef = mul_digits(&twice.coef, &[2]);
    let mut sb = b.clone();
    sb.strip();
    match cmp_abs(&twice, &sb) {
        Ordering::Greater => true,
        Ordering::Equal => q_odd,
        Ordering::Less => false,
    }
}

/// Adjusts `a` to have exponent `target`, rounding or padding as needed.
/// Used by quantize and rescale after their operand checks.
pub(crate) fn quantize_exp(a: &Num, target: i64, cx: &mut ContextInner) -> Num {
    let prec = i64::from(cx.digits);
    let etiny = i64::from(cx.emin) - (prec - 1);
    if target < etiny || target > i64::from(cx.emax) {
        return invalid(cx);
    }
    if a.is_zero() {
        let mut r = Num::zero();
        r.sign = a.sign;
        r.exp = target;
        return r;
    }
    let mut r = a.clone();
    r.strip();
    let diff = r.exp - target;
    let mut flags = Discarded {
        rounded: false,
        inexact: false,
    };
    if diff > 0 {
        if r.coef.len() as i64 + diff > prec {
            return invalid(cx);
        }
        r.coef.extend(std::iter::repeat(0).take(diff as usize));
        r.exp = target;
    } else if diff < 0 {
        flags = discard(&mut r, (-diff) as usize, cx.rounding);
        if r.exp > target {
            // a rounding carry lengthened the value; restore the scale
            let pad = (r.exp - target) as usize;
            r.coef.extend(std::iter::repeat(0).take(pad));
            r.exp = target;
        }
        if r.is_zero() {
            r.sign = a.sign;
        }
    }
    if r.coef.len() as i64 > prec || r.adjusted() > i64::from(cx.emax) {
        return invalid(cx);
    }
    if flags.rounded {
        cx.status.set(Status::ROUNDED);
    }
    if flags.inexact {
        cx.status.set(Status::INEXACT);
    }
    r
}

/// Quantize: the result has the same exponent as `b`.
pub(crate) fn quantize(a: &Num, b: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, Some(b), cx) {
        return nan;
    }
    match (a.kind, b.kind) {
        (Kind::Infinite, Kind::Infinite) => return a.clone(),
        (Kind::Infinite, _) | (_, Kind::Infinite) => return invalid(cx),
        _ => {}
    }
    quantize_exp(a, b.exp, cx)
}

/// Rescale: the target exponent is the integer value of `b`.
pub(crate) fn rescale(a: &Num, b: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, Some(b), cx) {
        return nan;
    }
    if b.kind == Kind::Infinite {
        return invalid(cx);
    }
    let target = match to_integer(b) {
        Some(v) => v,
        None => return invalid(cx),
    };
    if a.kind == Kind::Infinite {
        return invalid(cx);
    }
    quantize_exp(a, target, cx)
}

/// Rounds to an integer, keeping the exponent at least zero and raising
/// `INEXACT` and `ROUNDED` when digits are discarded.
pub(crate) fn round_to_integral(a: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, None, cx) {
        return nan;
    }
    if a.kind == Kind::Infinite {
        return a.clone();
    }
    if a.exp >= 0 {
        return a.clone();
    }
    let mut r = a.clone();
    r.strip();
    if r.is_zero() {
        r.exp = 0;
        return r;
    }
    let drop = (-r.exp) as usize;
    let flags = discard(&mut r, drop, cx.rounding);
    if r.exp > 0 {
        let pad = r.exp as usize;
        r.coef.extend(std::iter::repeat(0).take(pad));
        r.exp = 0;
    }
    if r.is_zero() {
        r.sign = a.sign;
    }
    if flags.rounded {
        cx.status.set(Status::ROUNDED);
    }
    if flags.inexact {
        cx.status.set(Status::INEXACT);
    }
    r
}

/// The integer value of a finite, integer-valued operand, when it fits
/// comfortably in an `i64`.
pub(crate) fn to_integer(n: &Num) -> Option<i64> {
    if n.kind != Kind::Finite {
        return None;
    }
    let mut s = n.clone();
    s.strip();
    if s.is_zero() {
        return Some(0);
    }
    if s.exp < 0 {
        // trailing fractional digits must all be zero
        let frac = (-s.exp) as usize;
        if frac >= s.coef.len() + 18 {
            return None;
        }
        let start = s.coef.len().saturating_sub(frac);
        if s.coef[start..].iter().any(|&d| d != 0) {
            return None;
        }
        s.coef.truncate(start);
        s.exp = 0;
        if s.coef.is_empty() {
            return Some(0);
        }
    }
    if s.coef.len() as i64 + s.exp > 18 {
        return None;
    }
    let mut v: i64 = 0;
    for &d in &s.coef {
        v = v * 10 + i64::from(d);
    }
    for _ in 0..s.exp {
        v *= 10;
    }
    Some(if n.sign { -v } else { v })
}

/// `+a`: equivalent to adding zero, which applies rounding and the usual
/// sign rule for zeros.
pub(crate) fn plus(a: &Num, cx: &mut ContextInner) -> Num {
    let zero = Num {
        sign: false,
        exp: a.exp,
        coef: vec![0],
        kind: Kind::Finite,
    };
    add(&zero, a, false, cx)
}

/// `-a`: subtraction from zero.
pub(crate) fn minus(a: &Num, cx: &mut ContextInner) -> Num {
    let zero = Num {
        sign: false,
        exp: a.exp,
        coef: vec![0],
        kind: Kind::Finite,
    };
    add(&zero, a, true, cx)
}

/// `|a|`.
pub(crate) fn abs(a: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, None, cx) {
        return nan;
    }
    let mut r = a.clone();
    r.sign = false;
    finalize(&mut r, cx);
    r
}

/// Removes trailing zeros after rounding to the context's precision.
pub(crate) fn reduce(a: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, None, cx) {
        return nan;
    }
    if a.kind == Kind::Infinite {
        return a.clone();
    }
    let mut r = a.clone();
    finalize(&mut r, cx);
    if r.kind != Kind::Finite {
        return r;
    }
    if r.is_zero() {
        r.coef = vec![0];
        r.exp = 0;
        return r;
    }
    while r.coef.len() > 1 && *r.coef.last().unwrap() == 0 {
        r.coef.pop();
        r.exp += 1;
    }
    r
}

/// 754 minNum/maxNum and their magnitude variants: a single quiet NaN loses
/// to a number; ties between equal values are broken by the total ordering.
pub(crate) fn min_max(a: &Num, b: &Num, max: bool, by_abs: bool, cx: &mut ContextInner) -> Num {
    let a_nan = a.is_nan();
    let b_nan = b.is_nan();
    if a_nan || b_nan {
        if a.kind == Kind::SNan || b.kind == Kind::SNan || (a_nan && b_nan) {
            return propagate_nans(a, Some(b), cx).unwrap();
        }
        let mut r = if a_nan { b.clone() } else { a.clone() };
        finalize(&mut r, cx);
        return r;
    }
    let ord = if by_abs {
        let (mut pa, mut pb) = (a.clone(), b.clone());
        pa.sign = false;
        pb.sign = false;
        match compare(&pa, &pb) {
            Ordering::Equal => total_cmp_abs(a, b),
            ord => ord,
        }
    } else {
        match compare(a, b) {
            Ordering::Equal => total_cmp(a, b),
            ord => ord,
        }
    };
    let pick = if ord == Ordering::Equal || (ord == Ordering::Greater) == max {
        a
    } else {
        b
    };
    let mut r = pick.clone();
    finalize(&mut r, cx);
    r
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum LogicalOp {
    And,
    Or,
    Xor,
}

fn is_logical(n: &Num, prec: i64) -> bool {
    n.kind == Kind::Finite
        && !n.sign
        && n.exp == 0
        && n.coef.len() as i64 <= prec
        && n.coef.iter().all(|&d| d <= 1)
}

/// Digit-wise logical operation on two logical operands.
pub(crate) fn logical(a: &Num, b: &Num, op: LogicalOp, cx: &mut ContextInner) -> Num {
    let prec = i64::from(cx.digits);
    if !is_logical(a, prec) || !is_logical(b, prec) {
        return invalid(cx);
    }
    let width = a.coef.len().max(b.coef.len());
    let mut out = vec![0u8; width];
    for i in 0..width {
        let da = digit_from_low(&a.coef, i);
        let db = digit_from_low(&b.coef, i);
        out[width - 1 - i] = match op {
            LogicalOp::And => da & db,
            LogicalOp::Or => da | db,
            LogicalOp::Xor => da ^ db,
        };
    }
    let mut r = Num {
        sign: false,
        exp: 0,
        coef: out,
        kind: Kind::Finite,
    };
    r.strip();
    r
}

/// Digit-wise complement across the full precision width.
pub(crate) fn invert(a: &Num, cx: &mut ContextInner) -> Num {
    let prec = i64::from(cx.digits);
    if !is_logical(a, prec) {
        return invalid(cx);
    }
    let width = prec as usize;
    let mut out = vec![0u8; width];
    for i in 0..width {
        out[width - 1 - i] = 1 - digit_from_low(&a.coef, i);
    }
    let mut r = Num {
        sign: false,
        exp: 0,
        coef: out,
        kind: Kind::Finite,
    };
    r.strip();
    r
}

fn digit_from_low(coef: &[u8], i: usize) -> u8 {
    if i < coef.len() {
        coef[coef.len() - 1 - i]
    } else {
        0
    }
}

/// Shifts the coefficient left (positive count) or right (negative count)
/// within a window of `digits` digits; vacated positions fill with zeros and
/// digits shifted out are lost without raising a condition.
pub(crate) fn shift(a: &Num, b: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, Some(b), cx) {
        return nan;
    }
    let prec = i64::from(cx.digits);
    if b.kind == Kind::Infinite {
        return invalid(cx);
    }
    let count = match to_integer(b) {
        Some(v) if v.abs() <= prec => v,
        _ => return invalid(cx),
    };
    if a.kind == Kind::Infinite {
        return Num::infinity(a.sign);
    }
    if a.coef.len() as i64 > prec {
        return invalid(cx);
    }
    let width = prec as usize;
    let mut window = vec![0u8; width];
    let len = a.coef.len();
    window[width - len..].copy_from_slice(&a.coef);
    let mut out = vec![0u8; width];
    if count >= 0 {
        let c = count as usize;
        if c < width {
            out[..width - c].copy_from_slice(&window[c..]);
        }
    } else {
        let c = (-count) as usize;
        if c < width {
            out[c..].copy_from_slice(&window[..width - c]);
        }
    }
    let mut r = Num {
        sign: a.sign,
        exp: a.exp,
        coef: out,
        kind: Kind::Finite,
    };
    r.strip();
    r
}

/// Rotates the coefficient within a window of `digits` digits; positive
/// counts rotate toward the most significant end.
pub(crate) fn rotate(a: &Num, b: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, Some(b), cx) {
        return nan;
    }
    let prec = i64::from(cx.digits);
    if b.kind == Kind::Infinite {
        return invalid(cx);
    }
    let count = match to_integer(b) {
        Some(v) if v.abs() <= prec => v,
        _ => return invalid(cx),
    };
    if a.kind == Kind::Infinite {
        return Num::infinity(a.sign);
    }
    if a.coef.len() as i64 > prec {
        return invalid(cx);
    }
    let width = prec as usize;
    let mut window = vec![0u8; width];
    window[width - a.coef.len()..].copy_from_slice(&a.coef);
    let shift = count.rem_euclid(prec) as usize;
    window.rotate_left(shift);
    let mut r = Num {
        sign: a.sign,
        exp: a.exp,
        coef: window,
        kind: Kind::Finite,
    };
    r.strip();
    r
}

/// The adjusted exponent of the operand, as a decimal.
pub(crate) fn logb(a: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, None, cx) {
        return nan;
    }
    if a.kind == Kind::Infinite {
        return Num::infinity(false);
    }
    if a.is_zero() {
        cx.status.set(Status::DIVISION_BY_ZERO);
        return Num::infinity(true);
    }
    let mut s = a.clone();
    s.strip();
    let mut r = from_i64_num(s.adjusted());
    finalize(&mut r, cx);
    r
}

/// Adds the integer value of `b` to the exponent of `a`.
pub(crate) fn scaleb(a: &Num, b: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = propagate_nans(a, Some(b), cx) {
        return nan;
    }
    if b.kind == Kind::Infinite {
        return invalid(cx);
    }
    let limit = 2 * (i64::from(cx.emax) + i64::from(cx.digits));
    let count = match to_integer(b) {
        Some(v) if v.abs() <= limit => v,
        _ => return invalid(cx),
    };
    if a.kind == Kind::Infinite {
        return Num::infinity(a.sign);
    }
    let mut r = a.clone();
    r.exp += count;
    finalize(&mut r, cx);
    r
}

/// Builds a `Num` holding an integer value, exactly.
pub(crate) fn from_i64_num(v: i64) -> Num {
    let sign = v < 0;
    let mut mag = v.unsigned_abs();
    let mut coef = Vec::new();
    if mag == 0 {
        coef.push(0);
    }
    while mag > 0 {
        coef.push((mag % 10) as u8);
        mag /= 10;
    }
    coef.reverse();
    Num {
        sign,
        exp: 0,
        coef,
        kind: Kind::Finite,
    }
}

/// Parses a numeric string per the General Decimal Arithmetic grammar,
/// applying the context's rounding and limits. On a syntax error, raises
/// `CONVERSION_SYNTAX` and returns `Err`.
pub(crate) fn parse(s: &str, cx: &mut ContextInner) -> Result<Num, ()> {
    match parse_inner(s, cx) {
        Some(mut num) => {
            finalize(&mut num, cx);
            Ok(num)
        }
        None => {
            cx.status.set(Status::CONVERSION_SYNTAX);
            Err(())
        }
    }
}

fn parse_inner(s: &str, cx: &ContextInner) -> Option<Num> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut sign = false;
    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        sign = bytes[i] == b'-';
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }
    if !bytes[i].is_ascii_digit() && bytes[i] != b'.' {
        return parse_special(&s[i..], sign, cx);
    }
    let mut coef: Vec<u8> = Vec::new();
    let mut frac_digits: i64 = 0;
    let mut seen_digit = false;
    let mut seen_point = false;
    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_digit() {
            seen_digit = true;
            if !(coef.is_empty() && c == b'0') {
                coef.push(c - b'0');
            }
            if seen_point {
                frac_digits += 1;
            }
            i += 1;
        } else if c == b'.' {
            if seen_point {
                return None;
            }
            seen_point = true;
            i += 1;
        } else {
            break;
        }
    }
    if !seen_digit {
        return None;
    }
    let mut exp: i64 = 0;
    if i < bytes.len() {
        if bytes[i] != b'e' && bytes[i] != b'E' {
            return None;
        }
        i += 1;
        let mut exp_sign = false;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            exp_sign = bytes[i] == b'-';
            i += 1;
        }
        if i >= bytes.len() {
            return None;
        }
        while i < bytes.len() {
            let c = bytes[i];
            if !c.is_ascii_digit() {
                return None;
            }
            exp = exp
                .saturating_mul(10)
                .saturating_add(i64::from(c - b'0'));
            i += 1;
        }
        if exp_sign {
            exp = -exp;
        }
    }
    if coef.is_empty() {
        coef.push(0);
    }
    Some(Num {
        sign,
        exp: exp.saturating_sub(frac_digits),
        coef,
        kind: Kind::Finite,
    })
}

fn parse_special(s: &str, sign: bool, cx: &ContextInner) -> Option<Num> {
    let lower = s.to_ascii_lowercase();
    if lower == "inf" || lower == "infinity" {
        return Some(Num::infinity(sign));
    }
    let (kind, rest) = if let Some(rest) = lower.strip_prefix("snan") {
        (Kind::SNan, rest)
    } else if let Some(rest) = lower.strip_prefix("nan") {
        (Kind::QNan, rest)
    } else {
        return None;
    };
    let mut payload: Vec<u8> = Vec::new();
    for c in rest.bytes() {
        if !c.is_ascii_digit() {
            return None;
        }
        if !(payload.is_empty() && c == b'0') {
            payload.push(c - b'0');
        }
    }
    let max_payload = (cx.digits - if cx.clamp { 1 } else { 0 }).max(1) as usize;
    if payload.len() > max_payload {
        return None;
    }
    if payload.is_empty() {
        payload.push(0);
    }
    Some(Num {
        sign,
        exp: 0,
        coef: payload,
        kind,
    })
}

fn push_digits(out: &mut String, coef: &[u8]) {
    for &d in coef {
        out.push((b'0' + d) as char);
    }
}

fn push_zeros(out: &mut String, n: i64) {
    for _ in 0..n {
        out.push('0');
    }
}

/// Renders the to-scientific-string (`eng == false`) or
/// to-engineering-string (`eng == true`) form.
pub(crate) fn to_string_common(n: &Num, eng: bool) -> String {
    let mut out = String::new();
    if n.sign {
        out.push('-');
    }
    match n.kind {
        Kind::Infinite => {
            out.push_str("Infinity");
            return out;
        }
        Kind::QNan | Kind::SNan => {
            if n.kind == Kind::SNan {
                out.push('s');
            }
            out.push_str("NaN");
            if n.coef != [0] {
                push_digits(&mut out, &n.coef);
            }
            return out;
        }
        Kind::Finite => {}
    }
    let ndigits = n.coef.len() as i64;
    let adjusted = n.exp + ndigits - 1;
    if n.exp <= 0 && adjusted >= -6 {
        // plain notation
        if n.exp == 0 {
            push_digits(&mut out, &n.coef);
        } else if ndigits > -n.exp {
            let point = (ndigits + n.exp) as usize;
            push_digits(&mut out, &n.coef[..point]);
            out.push('.');
            push_digits(&mut out, &n.coef[point..]);
        } else {
            out.push_str("0.");
            push_zeros(&mut out, -n.exp - ndigits);
            push_digits(&mut out, &n.coef);
        }
        return out;
    }
    // exponential notation
    let mut e = adjusted;
    let mut pre: i64 = 1;
    if eng && e != 0 {
        let mut adj = e % 3;
        if adj < 0 {
            adj += 3;
        }
        e -= adj;
        if !n.is_zero() {
            pre = adj + 1;
        } else if adj != 0 {
            e += 3;
            pre = adj - 2;
        }
    }
    if pre > 0 {
        if ndigits <= pre {
            push_digits(&mut out, &n.coef);
            push_zeros(&mut out, pre - ndigits);
        } else {
            push_digits(&mut out, &n.coef[..pre as usize]);
            out.push('.');
            push_digits(&mut out, &n.coef[pre as usize..]);
        }
    } else {
        out.push_str("0.");
        push_zeros(&mut out, 1 - pre);
    }
    if e != 0 {
        out.push('E');
        out.push(if e > 0 { '+' } else { '-' });
        out.push_str(&e.abs().to_string());
    }
    out
}

/// Renders without exponential notation, regardless of magnitude.
pub(crate) fn to_standard_string(n: &Num) -> String {
    if n.kind != Kind::Finite {
        return to_string_common(n, false);
    }
    let mut out = String::new();
    if n.sign {
        out.push('-');
    }
    let ndigits = n.coef.len() as i64;
    if n.exp >= 0 {
        push_digits(&mut out, &n.coef);
        push_zeros(&mut out, n.exp);
    } else if ndigits > -n.exp {
        let point = (ndigits + n.exp) as usize;
        push_digits(&mut out, &n.coef[..point]);
        out.push('.');
        push_digits(&mut out, &n.coef[point..]);
    } else {
        out.push_str("0.");
        push_zeros(&mut out, -n.exp - ndigits);
        push_digits(&mut out, &n.coef);
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn base_cx(digits: i32) -> ContextInner {
        ContextInner {
            digits,
            emax: 999_999_999,
            emin: -999_999_999,
            rounding: Rounding::HalfUp,
            clamp: false,
            status: Status::NONE,
        }
    }

    pub(crate) fn num(s: &str) -> Num {
        let mut cx = base_cx(40);
        parse(s, &mut cx).unwrap()
    }

    fn sci(n: &Num) -> String {
        to_string_common(n, false)
    }

    #[test]
    fn add_aligns_and_keeps_scale() {
        let mut cx = base_cx(34);
        let r = add(&num("1.27"), &num("2.23"), false, &mut cx);
        assert_eq!(sci(&r), "3.50");
        assert!(!cx.status.any());
    }

    #[test]
    fn add_rounds_to_precision() {
        let mut cx = base_cx(5);
        let r = add(&num("12345"), &num("0.6"), false, &mut cx);
        assert_eq!(sci(&r), "12346");
        assert!(cx.status.inexact());
        assert!(cx.status.rounded());
    }

    #[test]
    fn subtract_exact_cancellation() {
        let mut cx = base_cx(10);
        let r = add(&num("1.3"), &num("1.3"), true, &mut cx);
        assert_eq!(sci(&r), "0.0");
        assert!(!r.sign);

        cx.rounding = Rounding::Floor;
        let r = add(&num("1.3"), &num("1.3"), true, &mut cx);
        assert!(r.sign);
    }

    #[test]
    fn add_distant_operand_is_sticky() {
        let mut cx = base_cx(5);
        cx.rounding = Rounding::Down;
        let r = add(&num("1E+20"), &num("-1E-20"), false, &mut cx);
        assert_eq!(sci(&r), "9.9999E+19");
        assert!(cx.status.inexact());
    }

    #[test]
    fn multiply_cases() {
        let mut cx = base_cx(9);
        let r = multiply(&num("1.20"), &num("3"), &mut cx);
        assert_eq!(sci(&r), "3.60");
        let r = multiply(&num("0.9"), &num("-0"), &mut cx);
        assert_eq!(sci(&r), "-0.0");
        let r = multiply(&num("Infinity"), &num("0"), &mut cx);
        assert!(r.is_nan());
        assert!(cx.status.invalid_operation());
    }

    #[test]
    fn divide_cases() {
        let mut cx = base_cx(9);
        let r = divide(&num("1.20"), &num("2"), DivOp::Div, &mut cx);
        assert_eq!(sci(&r), "0.60");
        let r = divide(&num("1"), &num("3"), DivOp::Div, &mut cx);
        assert_eq!(sci(&r), "0.333333333");
        assert!(cx.status.inexact());

        cx.status.zero();
        let r = divide(&num("2"), &num("3"), DivOp::Div, &mut cx);
        assert_eq!(sci(&r), "0.666666667");

        cx.status.zero();
        let r = divide(&num("1"), &num("0"), DivOp::Div, &mut cx);
        assert_eq!(r.kind, Kind::Infinite);
        assert!(cx.status.division_by_zero());

        cx.status.zero();
        let r = divide(&num("0"), &num("0"), DivOp::Div, &mut cx);
        assert!(r.is_nan());
        assert!(cx.status.division_undefined());
    }

    #[test]
    fn divide_integer_and_remainder() {
        let mut cx = base_cx(9);
        let r = divide(&num("123.4"), &num("1"), DivOp::DivInt, &mut cx);
        assert_eq!(sci(&r), "123");
        let r = divide(&num("123.4"), &num("1"), DivOp::Rem, &mut cx);
        assert_eq!(sci(&r), "0.4");
        let r = divide(&num("10"), &num("3"), DivOp::Rem, &mut cx);
        assert_eq!(sci(&r), "1");
        let r = divide(&num("10"), &num("6"), DivOp::RemNear, &mut cx);
        assert_eq!(sci(&r), "-2");
        let r = divide(&num("10"), &num("4"), DivOp::RemNear, &mut cx);
        assert_eq!(sci(&r), "2");
        assert!(!cx.status.any());

        let r = divide(&num("1E+10"), &num("3"), DivOp::DivInt, &mut cx);
        assert!(r.is_nan());
        assert!(cx.status.division_impossible());
    }

    #[test]
    fn quantize_cases() {
        let mut cx = base_cx(9);
        let r = quantize(&num("2.17"), &num("0.001"), &mut cx);
        assert_eq!(sci(&r), "2.170");
        let r = quantize(&num("2.17"), &num("1e+1"), &mut cx);
        assert_eq!(sci(&r), "0E+1");
        assert!(cx.status.inexact());

        cx.status.zero();
        let r = quantize(&num("9.99"), &num("0.1"), &mut cx);
        assert_eq!(sci(&r), "10.0");

        cx.status.zero();
        let mut small = base_cx(3);
        let r = quantize(&num("999"), &num("0.1"), &mut small);
        assert!(r.is_nan());
        assert!(small.status.invalid_operation());
    }

    #[test]
    fn round_to_integral_cases() {
        let mut cx = base_cx(9);
        let r = round_to_integral(&num("9.9"), &mut cx);
        assert_eq!(sci(&r), "10");
        assert!(cx.status.inexact());
        cx.status.zero();
        let r = round_to_integral(&num("-0.1"), &mut cx);
        assert_eq!(sci(&r), "-0");
        cx.status.zero();
        let r = round_to_integral(&num("1E+2"), &mut cx);
        assert_eq!(sci(&r), "1E+2");
        assert!(!cx.status.any());
        let r = round_to_integral(&num("123.456"), &mut cx);
        assert_eq!(sci(&r), "123");
        cx.status.zero();
        let r = round_to_integral(&num("0.00123"), &mut cx);
        assert_eq!(sci(&r), "0");
        assert!(cx.status.inexact());
        assert!(cx.status.rounded());
    }

    #[test]
    fn rounding_modes() {
        for (mode, expect) in [
            (Rounding::Down, "1.4"),
            (Rounding::HalfUp, "1.5"),
            (Rounding::HalfEven, "1.4"),
            (Rounding::Ceiling, "1.5"),
            (Rounding::Floor, "1.4"),
            (Rounding::Up, "1.5"),
        ] {
            let mut cx = base_cx(2);
            cx.rounding = mode;
            let mut n = num("1.45");
            finalize(&mut n, &mut cx);
            assert_eq!(sci(&n), expect, "{:?}", mode);
        }

        let mut cx = base_cx(2);
        cx.rounding = Rounding::ZeroFiveUp;
        let mut n = num("1.51");
        finalize(&mut n, &mut cx);
        assert_eq!(sci(&n), "1.6");
        let mut n = num("1.61");
        finalize(&mut n, &mut cx);
        assert_eq!(sci(&n), "1.6");
    }

    #[test]
    fn overflow_and_underflow() {
        let mut cx = ContextInner {
            digits: 7,
            emax: 96,
            emin: -95,
            rounding: Rounding::HalfEven,
            clamp: false,
            status: Status::NONE,
        };
        let mut n = num("1.23e+97");
        finalize(&mut n, &mut cx);
        assert_eq!(n.kind, Kind::Infinite);
        assert!(cx.status.overflow());
        assert!(cx.status.inexact());

        cx.status.zero();
        let mut n = num("1e-101");
        n = {
            let mut c = n;
            finalize(&mut c, &mut cx);
            c
        };
        assert_eq!(sci(&n), "1E-101");
        assert!(cx.status.subnormal());
        assert!(!cx.status.underflow());

        cx.status.zero();
        let mut n = num("1e-120");
        finalize(&mut n, &mut cx);
        assert!(n.is_zero());
        assert!(cx.status.underflow());
        assert!(cx.status.clamped());
    }

    #[test]
    fn overflow_result_depends_on_rounding() {
        for (mode, inf) in [
            (Rounding::HalfEven, true),
            (Rounding::Up, true),
            (Rounding::Down, false),
            (Rounding::ZeroFiveUp, false),
        ] {
            let mut cx = ContextInner {
                digits: 3,
                emax: 96,
                emin: -95,
                rounding: mode,
                clamp: false,
                status: Status::NONE,
            };
            let mut n = num("1e+99");
            finalize(&mut n, &mut cx);
            if inf {
                assert_eq!(n.kind, Kind::Infinite, "{:?}", mode);
            } else {
                assert_eq!(sci(&n), "9.99E+96", "{:?}", mode);
            }
        }
    }

    #[test]
    fn logical_ops() {
        let mut cx = base_cx(9);
        let r = logical(&num("1100"), &num("1010"), LogicalOp::And, &mut cx);
        assert_eq!(sci(&r), "1000");
        let r = logical(&num("1100"), &num("1010"), LogicalOp::Or, &mut cx);
        assert_eq!(sci(&r), "1110");
        let r = logical(&num("1100"), &num("1010"), LogicalOp::Xor, &mut cx);
        assert_eq!(sci(&r), "110");
        let r = invert(&num("101"), &mut cx);
        assert_eq!(sci(&r), "111111010");
        let r = logical(&num("2"), &num("1"), LogicalOp::And, &mut cx);
        assert!(r.is_nan());
        assert!(cx.status.invalid_operation());
    }

    #[test]
    fn shift_and_rotate() {
        let mut cx = base_cx(9);
        let r = shift(&num("34"), &num("8"), &mut cx);
        assert_eq!(sci(&r), "400000000");
        let r = shift(&num("12"), &num("-2"), &mut cx);
        assert_eq!(sci(&r), "0");
        let r = rotate(&num("123456789"), &num("2"), &mut cx);
        assert_eq!(sci(&r), "345678912");
        let r = rotate(&num("123456789"), &num("-2"), &mut cx);
        assert_eq!(sci(&r), "891234567");
    }

    #[test]
    fn logb_scaleb() {
        let mut cx = base_cx(9);
        let r = logb(&num("250"), &mut cx);
        assert_eq!(sci(&r), "2");
        let r = logb(&num("0.03"), &mut cx);
        assert_eq!(sci(&r), "-2");
        let r = logb(&num("0"), &mut cx);
        assert_eq!(r.kind, Kind::Infinite);
        assert!(r.sign);
        assert!(cx.status.division_by_zero());

        cx.status.zero();
        let r = scaleb(&num("7.50"), &num("-2"), &mut cx);
        assert_eq!(sci(&r), "0.0750");
    }

    #[test]
    fn comparisons() {
        let mut cx = base_cx(9);
        assert_eq!(
            compare_op(&num("2.1"), &num("3"), &mut cx),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_op(&num("2.1"), &num("2.10"), &mut cx),
            Some(Ordering::Equal)
        );
        assert_eq!(
            compare_op(&num("-0"), &num("0"), &mut cx),
            Some(Ordering::Equal)
        );
        assert_eq!(compare_op(&num("NaN"), &num("1"), &mut cx), None);
        assert!(!cx.status.any());
        assert_eq!(compare_signal(&num("NaN"), &num("1"), &mut cx), None);
        assert!(cx.status.invalid_operation());
    }

    #[test]
    fn total_ordering() {
        let inorder = [
            "-NaN", "-sNaN", "-Infinity", "-127", "-1", "-1.00", "-0", "-0.000", "0.000", "0",
            "1.00", "1", "127", "Infinity", "sNaN", "NaN",
        ];
        for (i, a) in inorder.iter().enumerate() {
            for (j, b) in inorder.iter().enumerate() {
                let (na, nb) = (num(a), num(b));
                assert_eq!(total_cmp(&na, &nb), i.cmp(&j), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn string_forms() {
        for (input, sci_form, eng_form) in [
            ("123.4e7", "1.234E+9", "1.234E+9"),
            ("1.234e10", "1.234E+10", "12.34E+9"),
            ("1e4", "1E+4", "10E+3"),
            ("0e+3", "0E+3", "0.00E+3"),
            ("0e+2", "0E+2", "0.0E+3"),
            ("123.45", "123.45", "123.45"),
            ("0.00012", "0.00012", "0.00012"),
            ("1e-7", "1E-7", "100E-9"),
            ("-0", "-0", "-0"),
            ("NaN", "NaN", "NaN"),
            ("-sNaN7", "-sNaN7", "-sNaN7"),
            ("-Infinity", "-Infinity", "-Infinity"),
        ] {
            let n = num(input);
            assert_eq!(to_string_common(&n, false), sci_form, "sci {}", input);
            assert_eq!(to_string_common(&n, true), eng_form, "eng {}", input);
        }

        let n = num("12345678901234567890e-4");
        assert_eq!(to_standard_string(&n), "1234567890123456.7890");
        let n = num("1.23e5");
        assert_eq!(to_standard_string(&n), "123000");
    }

    #[test]
    fn parse_failures() {
        for bad in ["", "12garbage524", "1..2", "1e", "1e++2", "e4", "+", "NaN12x"] {
            let mut cx = base_cx(34);
            assert!(parse(bad, &mut cx).is_err(), "{:?}", bad);
            assert!(cx.status.conversion_syntax());
        }
    }

    #[test]
    fn parse_specials() {
        let n = num("-inf");
        assert_eq!(n.kind, Kind::Infinite);
        assert!(n.sign);
        let n = num("sNaN123");
        assert_eq!(n.kind, Kind::SNan);
        assert_eq!(n.coef, vec![1, 2, 3]);
        let n = num("nan");
        assert_eq!(n.kind, Kind::QNan);
        assert_eq!(n.coef, vec![0]);
    }

    #[test]
    fn min_max_family() {
        let mut cx = base_cx(9);
        assert_eq!(sci(&min_max(&num("3"), &num("2"), true, false, &mut cx)), "3");
        assert_eq!(sci(&min_max(&num("3"), &num("2"), false, false, &mut cx)), "2");
        // a single quiet NaN loses
        assert_eq!(sci(&min_max(&num("NaN"), &num("2"), true, false, &mut cx)), "2");
        assert!(!cx.status.any());
        // magnitude variants
        assert_eq!(
            sci(&min_max(&num("-5"), &num("2"), true, true, &mut cx)),
            "-5"
        );
        assert_eq!(
            sci(&min_max(&num("-5"), &num("2"), false, true, &mut cx)),
            "2"
        );
    }

    #[test]
    fn reduce_cases() {
        let mut cx = base_cx(9);
        assert_eq!(sci(&reduce(&num("2.500"), &mut cx)), "2.5");
        assert_eq!(sci(&reduce(&num("1200"), &mut cx)), "1.2E+3");
        assert_eq!(sci(&reduce(&num("0.00"), &mut cx)), "0");
    }
}
