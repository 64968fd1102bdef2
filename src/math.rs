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

//! Mathematical functions: exp, ln, log10, power, and square root.
//!
//! These are restricted to contexts and operands within the `MAX_MATH`
//! bounds, and except for square root their results may be up to 1 ulp away
//! from the correctly rounded answer in rare cases. All of them work at an
//! elevated internal precision and round once at the end.

use std::cmp::Ordering;

use crate::arith::{self, DivOp, Kind, Num};
use crate::context::{ContextInner, Rounding, Status};

/// The precision and exponent-magnitude ceiling for mathematical functions.
pub(crate) const MAX_MATH: i32 = 999_999;

/// Validates the context bounds for a mathematical function, raising
/// `INVALID_CONTEXT` on violation.
fn check_context(cx: &mut ContextInner) -> bool {
    if cx.digits > MAX_MATH || cx.emax > MAX_MATH || -cx.emin > MAX_MATH {
        cx.status.set(Status::INVALID_CONTEXT);
        return false;
    }
    true
}

/// Validates a finite operand's digits and adjusted exponent, raising
/// `INVALID_OPERATION` on violation.
fn check_operand(n: &Num, cx: &mut ContextInner) -> bool {
    if n.kind != Kind::Finite || n.is_zero() {
        return true;
    }
    let mut s = n.clone();
    s.strip();
    if s.coef.len() > MAX_MATH as usize || s.adjusted().abs() > i64::from(MAX_MATH) {
        cx.status.set(Status::INVALID_OPERATION);
        return false;
    }
    true
}

/// An internal context with unbounded exponents for intermediate work.
fn work_cx(digits: i64) -> ContextInner {
    ContextInner {
        digits: digits as i32,
        emax: 999_999_999,
        emin: -999_999_999,
        rounding: Rounding::HalfEven,
        clamp: false,
        status: Status::NONE,
    }
}

fn one() -> Num {
    Num {
        sign: false,
        exp: 0,
        coef: vec![1],
        kind: Kind::Finite,
    }
}

/// atanh(u) by its Taylor series; requires |u| well below 1.
fn atanh_series(u: &Num, wcx: &mut ContextInner) -> Num {
    let guard = i64::from(wcx.digits) + 2;
    let u2 = arith::multiply(u, u, wcx);
    let mut term = u.clone();
    let mut sum = u.clone();
    let mut k: i64 = 1;
    loop {
        term = arith::multiply(&term, &u2, wcx);
        let div = arith::from_i64_num(2 * k + 1);
        let t = arith::divide(&term, &div, DivOp::Div, wcx);
        if t.is_zero() || t.adjusted() < sum.adjusted() - guard {
            break;
        }
        sum = arith::add(&sum, &t, false, wcx);
        k += 1;
    }
    sum
}

fn atanh_frac(p: i64, q: i64, wcx: &mut ContextInner) -> Num {
    let u = arith::divide(
        &arith::from_i64_num(p),
        &arith::from_i64_num(q),
        DivOp::Div,
        wcx,
    );
    atanh_series(&u, wcx)
}

/// ln(2) at the working precision: 2·atanh(1/3).
fn ln2_at(wcx: &mut ContextInner) -> Num {
    let a = atanh_frac(1, 3, wcx);
    arith::multiply(&a, &arith::from_i64_num(2), wcx)
}

/// ln(10) at the working precision: 2·(atanh(1/3) + atanh(2/3)).
fn ln10_at(wcx: &mut ContextInner) -> Num {
    let a = atanh_frac(1, 3, wcx);
    let b = atanh_frac(2, 3, wcx);
    let s = arith::add(&a, &b, false, wcx);
    arith::multiply(&s, &arith::from_i64_num(2), wcx)
}

/// e^x for a finite operand, at `prec + guard` internal digits. The result
/// carries an out-of-range exponent when the true result overflows or
/// underflows every representable value; `finalize` turns that into the
/// appropriate conditions.
fn exp_core(x: &Num, prec: i64) -> Num {
    if x.is_zero() {
        return one();
    }
    let wp = prec + 30;
    let mut wcx = work_cx(wp);
    let ln10 = ln10_at(&mut wcx);
    // reduce: x = q·ln10 + r, so e^x = e^r · 10^q
    let t = arith::divide(x, &ln10, DivOp::Div, &mut wcx);
    let ti = arith::round_to_integral(&t, &mut wcx);
    let q = match arith::to_integer(&ti) {
        Some(q) => q,
        // far beyond any representable exponent
        None => {
            return Num {
                sign: false,
                exp: if x.sign { i64::MIN / 4 } else { i64::MAX / 4 },
                coef: vec![1],
                kind: Kind::Finite,
            };
        }
    };
    let q_digits = if q == 0 {
        1
    } else {
        q.unsigned_abs().to_string().len() as i64
    };
    let wp = prec + q_digits + 14;
    let mut wcx = work_cx(wp);
    let ln10 = ln10_at(&mut wcx);
    let q_num = arith::from_i64_num(q);
    let r = {
        let prod = arith::multiply(&q_num, &ln10, &mut wcx);
        arith::add(x, &prod, true, &mut wcx)
    };
    // halve the argument eight times so the series converges quickly
    let r = arith::divide(&r, &arith::from_i64_num(256), DivOp::Div, &mut wcx);
    let mut sum = one();
    let mut term = one();
    let mut n: i64 = 1;
    loop {
        term = arith::multiply(&term, &r, &mut wcx);
        term = arith::divide(&term, &arith::from_i64_num(n), DivOp::Div, &mut wcx);
        if term.is_zero() || term.adjusted() < -(wp + 2) {
            break;
        }
        sum = arith::add(&sum, &term, false, &mut wcx);
        n += 1;
    }
    for _ in 0..8 {
        sum = arith::multiply(&sum, &sum, &mut wcx);
    }
    sum.exp += q;
    sum
}

/// ln(x) for a finite, positive, non-one operand, at elevated precision.
fn ln_core(x: &Num, prec: i64) -> Num {
    let mut s = x.clone();
    s.strip();
    // x = m · 10^k with 0.1 <= m < 1
    let k = s.adjusted() + 1;
    let mut m = s.clone();
    m.sign = false;
    m.exp = -(m.coef.len() as i64);
    let k_digits = if k == 0 {
        1
    } else {
        k.unsigned_abs().to_string().len() as i64
    };
    let wp = prec + k_digits + 12;
    let mut wcx = work_cx(wp);
    // double m into [0.7, 1.4) so the atanh argument is small
    let seven_tenths = Num {
        sign: false,
        exp: -1,
        coef: vec![7],
        kind: Kind::Finite,
    };
    let mut j: i64 = 0;
    while arith::compare(&m, &seven_tenths) == Ordering::Less {
        m = arith::multiply(&m, &arith::from_i64_num(2), &mut wcx);
        j += 1;
    }
    // ln(m) = 2·atanh((m-1)/(m+1))
    let num = arith::add(&m, &one(), true, &mut wcx);
    let den = arith::add(&m, &one(), false, &mut wcx);
    let u = arith::divide(&num, &den, DivOp::Div, &mut wcx);
    let at = atanh_series(&u, &mut wcx);
    let mut r = arith::multiply(&at, &arith::from_i64_num(2), &mut wcx);
    if j > 0 {
        let ln2 = ln2_at(&mut wcx);
        let jl = arith::multiply(&arith::from_i64_num(j), &ln2, &mut wcx);
        r = arith::add(&r, &jl, true, &mut wcx);
    }
    if k != 0 {
        let ln10 = ln10_at(&mut wcx);
        let kl = arith::multiply(&arith::from_i64_num(k), &ln10, &mut wcx);
        r = arith::add(&r, &kl, false, &mut wcx);
    }
    r
}

fn inexact_result(mut r: Num, cx: &mut ContextInner) -> Num {
    cx.status.set(Status::INEXACT);
    cx.status.set(Status::ROUNDED);
    arith::finalize(&mut r, cx);
    r
}

/// e^x.
pub(crate) fn exp(a: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = arith::propagate_nans(a, None, cx) {
        return nan;
    }
    if a.kind == Kind::Infinite {
        return if a.sign { Num::zero() } else { Num::infinity(false) };
    }
    if !check_context(cx) {
        return Num::qnan();
    }
    if !check_operand(a, cx) {
        return Num::qnan();
    }
    if a.is_zero() {
        return one();
    }
    let r = exp_core(a, i64::from(cx.digits));
    inexact_result(r, cx)
}

/// The natural logarithm.
pub(crate) fn ln(a: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = arith::propagate_nans(a, None, cx) {
        return nan;
    }
    if a.kind == Kind::Infinite {
        if a.sign {
            return arith::invalid(cx);
        }
        return Num::infinity(false);
    }
    if a.is_zero() {
        return Num::infinity(true);
    }
    if a.sign {
        return arith::invalid(cx);
    }
    if !check_context(cx) {
        return Num::qnan();
    }
    if !check_operand(a, cx) {
        return Num::qnan();
    }
    if arith::compare(a, &one()) == Ordering::Equal {
        return Num::zero();
    }
    let r = ln_core(a, i64::from(cx.digits));
    inexact_result(r, cx)
}

/// The base-10 logarithm; exact for exact powers of ten.
pub(crate) fn log10(a: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = arith::propagate_nans(a, None, cx) {
        return nan;
    }
    if a.kind == Kind::Infinite {
        if a.sign {
            return arith::invalid(cx);
        }
        return Num::infinity(false);
    }
    if a.is_zero() {
        return Num::infinity(true);
    }
    if a.sign {
        return arith::invalid(cx);
    }
    if !check_context(cx) {
        return Num::qnan();
    }
    if !check_operand(a, cx) {
        return Num::qnan();
    }
    let mut s = a.clone();
    s.strip();
    if s.coef.iter().skip(1).all(|&d| d == 0) && s.coef[0] == 1 {
        // an exact power of ten
        let mut r = arith::from_i64_num(s.adjusted());
        arith::finalize(&mut r, cx);
        return r;
    }
    let prec = i64::from(cx.digits);
    let wp = prec + 12;
    let mut wcx = work_cx(wp);
    let l = ln_core(a, wp);
    let ln10 = ln10_at(&mut wcx);
    let r = arith::divide(&l, &ln10, DivOp::Div, &mut wcx);
    inexact_result(r, cx)
}

/// x^y, with the exact integer-power regime for integer exponents and the
/// exp(y·ln x) route otherwise.
pub(crate) fn pow(a: &Num, b: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = arith::propagate_nans(a, Some(b), cx) {
        return nan;
    }
    if b.is_zero() {
        if a.kind == Kind::Finite && a.is_zero() {
            return arith::invalid(cx);
        }
        return one();
    }
    let int_exp = if b.kind == Kind::Finite {
        arith::to_integer(b).filter(|n| n.abs() <= 999_999_999)
    } else {
        None
    };
    if let Some(n) = int_exp {
        return pow_integer(a, n, cx);
    }
    // non-integer or oversized exponents take the mathematical-function
    // route, with its restrictions
    if !check_context(cx) {
        return Num::qnan();
    }
    if !check_operand(a, cx) || !check_operand(b, cx) {
        return Num::qnan();
    }
    if a.kind == Kind::Finite && a.is_zero() {
        if b.sign {
            cx.status.set(Status::DIVISION_BY_ZERO);
            return Num::infinity(false);
        }
        return Num::zero();
    }
    if a.sign {
        // a negative base requires an integer exponent
        return arith::invalid(cx);
    }
    let one_cmp = if a.kind == Kind::Finite {
        arith::compare(a, &one())
    } else {
        Ordering::Greater
    };
    if b.kind == Kind::Infinite {
        return match one_cmp {
            Ordering::Equal => arith::invalid(cx),
            Ordering::Greater => {
                if b.sign {
                    Num::zero()
                } else {
                    Num::infinity(false)
                }
            }
            Ordering::Less => {
                if b.sign {
                    Num::infinity(false)
                } else {
                    Num::zero()
                }
            }
        };
    }
    if a.kind == Kind::Infinite {
        return if b.sign { Num::zero() } else { Num::infinity(false) };
    }
    if one_cmp == Ordering::Equal {
        return one();
    }
    let prec = i64::from(cx.digits);
    let wp = prec + 16;
    let mut wcx = work_cx(wp);
    let l = ln_core(a, wp);
    let prod = arith::multiply(b, &l, &mut wcx);
    let r = exp_core(&prod, prec + 4);
    inexact_result(r, cx)
}

/// Integer powers by binary exponentiation at elevated precision.
fn pow_integer(a: &Num, n: i64, cx: &mut ContextInner) -> Num {
    let sign = a.sign && n % 2 != 0;
    if a.kind == Kind::Infinite {
        if n > 0 {
            return Num::infinity(sign);
        }
        let mut r = Num::zero();
        r.sign = sign;
        return r;
    }
    if a.is_zero() {
        if n < 0 {
            cx.status.set(Status::DIVISION_BY_ZERO);
            return Num::infinity(sign);
        }
        let mut r = Num::zero();
        r.sign = sign;
        r.exp = a.exp.saturating_mul(n).clamp(i64::MIN / 4, i64::MAX / 4);
        arith::finalize(&mut r, cx);
        return r;
    }
    let n_digits = n.unsigned_abs().to_string().len() as i64;
    let wp = i64::from(cx.digits) + n_digits + 4;
    let mut wcx = work_cx(wp);
    let mut base = a.clone();
    base.sign = false;
    base.strip();
    let mut acc = one();
    let mut m = n.unsigned_abs();
    while m > 0 {
        if m & 1 == 1 {
            acc = arith::multiply(&acc, &base, &mut wcx);
        }
        m >>= 1;
        if m > 0 {
            base = arith::multiply(&base, &base, &mut wcx);
        }
    }
    if n < 0 {
        acc = arith::divide(&one(), &acc, DivOp::Div, &mut wcx);
    }
    acc.sign = sign;
    // inexactness surfaces either from the working precision or the final
    // rounding
    if wcx.status.inexact() {
        cx.status.set(Status::INEXACT);
        cx.status.set(Status::ROUNDED);
    }
    arith::finalize(&mut acc, cx);
    acc
}

/// The square root, correctly rounded via a digit-pair algorithm.
pub(crate) fn sqrt(a: &Num, cx: &mut ContextInner) -> Num {
    if let Some(nan) = arith::propagate_nans(a, None, cx) {
        return nan;
    }
    if a.kind == Kind::Infinite {
        if a.sign {
            return arith::invalid(cx);
        }
        return Num::infinity(false);
    }
    if a.is_zero() {
        let mut r = Num::zero();
        r.sign = a.sign;
        r.exp = a.exp.div_euclid(2);
        arith::finalize(&mut r, cx);
        return r;
    }
    if a.sign {
        return arith::invalid(cx);
    }
    if !check_context(cx) {
        return Num::qnan();
    }
    if !check_operand(a, cx) {
        return Num::qnan();
    }
    let prec = i64::from(cx.digits);
    let ideal = a.exp.div_euclid(2);
    let mut s = a.clone();
    s.strip();
    if s.exp % 2 != 0 {
        s.coef.push(0);
        s.exp -= 1;
    }
    let want = 2 * (prec as usize + 2);
    while s.coef.len() < want {
        s.coef.push(0);
        s.coef.push(0);
        s.exp -= 2;
    }
    if s.coef.len() % 2 != 0 {
        s.coef.insert(0, 0);
    }
    let (mut root, exact) = isqrt_digits(&s.coef);
    let mut exp = s.exp / 2;
    if exact {
        while exp < ideal && root.len() > 1 && *root.last().unwrap() == 0 {
            root.pop();
            exp += 1;
        }
    } else {
        // the true root lies strictly between root and root+1; a trailing
        // sticky digit preserves every rounding decision
        root.push(1);
        exp -= 1;
    }
    let mut r = Num {
        sign: false,
        exp,
        coef: root,
        kind: Kind::Finite,
    };
    r.strip();
    arith::finalize(&mut r, cx);
    r
}

/// Schoolbook square root over an even-length digit string: processes one
/// digit pair per result digit, tracking the exact remainder.
fn isqrt_digits(c: &[u8]) -> (Vec<u8>, bool) {
    debug_assert!(c.len() % 2 == 0);
    let mut root: Vec<u8> = Vec::with_capacity(c.len() / 2);
    let mut rem: Vec<u8> = vec![0];
    for pair in c.chunks(2) {
        if rem == [0] {
            rem.clear();
        }
        rem.push(pair[0]);
        rem.push(pair[1]);
        let lead = rem.iter().take_while(|&&d| d == 0).count();
        let lead = lead.min(rem.len() - 1);
        rem.drain(..lead);
        // find the largest d with (20·root + d)·d <= rem
        let mut digit = 0u8;
        for d in (1..=9u8).rev() {
            let mut trial = arith::mul_digits(&root, &[2]);
            trial.push(d);
            let trial = arith::mul_digits(&trial, &[d]);
            if arith::ge_digits(&rem, &trial) {
                arith::sub_in_place(&mut rem, &trial);
                digit = d;
                break;
            }
        }
        root.push(digit);
    }
    (root, rem == [0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::tests::{base_cx, num};

    fn cx16() -> ContextInner {
        let mut cx = base_cx(16);
        cx.rounding = Rounding::HalfEven;
        cx
    }

    fn sci(n: &Num) -> String {
        arith::to_string_common(n, false)
    }

    #[test]
    fn exp_values() {
        let mut cx = cx16();
        assert_eq!(sci(&exp(&num("0"), &mut cx)), "1");
        assert!(!cx.status.any());
        assert_eq!(sci(&exp(&num("1"), &mut cx)), "2.718281828459045");
        assert!(cx.status.inexact());
        cx.status.zero();
        assert_eq!(sci(&exp(&num("2"), &mut cx)), "7.389056098930650");
        cx.status.zero();
        assert_eq!(sci(&exp(&num("-1"), &mut cx)), "0.3678794411714423");
        assert_eq!(sci(&exp(&num("-Infinity"), &mut cx)), "0");
        assert_eq!(sci(&exp(&num("Infinity"), &mut cx)), "Infinity");
    }

    #[test]
    fn exp_extremes() {
        let mut cx = ContextInner {
            digits: 16,
            emax: 384,
            emin: -383,
            rounding: Rounding::HalfEven,
            clamp: false,
            status: Status::NONE,
        };
        let r = exp(&num("10000"), &mut cx);
        assert_eq!(r.kind, Kind::Infinite);
        assert!(cx.status.overflow());

        cx.status.zero();
        let r = exp(&num("-10000"), &mut cx);
        assert!(r.is_zero());
        assert!(cx.status.underflow());
    }

    #[test]
    fn ln_values() {
        let mut cx = cx16();
        assert_eq!(sci(&ln(&num("1"), &mut cx)), "0");
        assert!(!cx.status.any());
        assert_eq!(sci(&ln(&num("2"), &mut cx)), "0.6931471805599453");
        cx.status.zero();
        assert_eq!(sci(&ln(&num("10"), &mut cx)), "2.302585092994046");
        cx.status.zero();
        assert_eq!(sci(&ln(&num("0.5"), &mut cx)), "-0.6931471805599453");
        let r = ln(&num("0"), &mut cx);
        assert_eq!(r.kind, Kind::Infinite);
        assert!(r.sign);
        cx.status.zero();
        let r = ln(&num("-1"), &mut cx);
        assert!(r.is_nan());
        assert!(cx.status.invalid_operation());
    }

    #[test]
    fn log10_values() {
        let mut cx = cx16();
        assert_eq!(sci(&log10(&num("1000"), &mut cx)), "3");
        assert_eq!(sci(&log10(&num("0.01"), &mut cx)), "-2");
        assert!(!cx.status.any());
        assert_eq!(sci(&log10(&num("2"), &mut cx)), "0.3010299956639812");
        assert!(cx.status.inexact());
    }

    #[test]
    fn pow_values() {
        let mut cx = cx16();
        assert_eq!(sci(&pow(&num("2"), &num("10"), &mut cx)), "1024");
        assert!(!cx.status.any());
        assert_eq!(sci(&pow(&num("-2"), &num("3"), &mut cx)), "-8");
        assert_eq!(sci(&pow(&num("10"), &num("-1"), &mut cx)), "0.1");
        assert!(!cx.status.any());
        assert_eq!(sci(&pow(&num("2"), &num("0.5"), &mut cx)), "1.414213562373095");
        assert!(cx.status.inexact());

        cx.status.zero();
        let r = pow(&num("0"), &num("0"), &mut cx);
        assert!(r.is_nan());
        assert!(cx.status.invalid_operation());

        cx.status.zero();
        let r = pow(&num("-2"), &num("0.5"), &mut cx);
        assert!(r.is_nan());
        assert!(cx.status.invalid_operation());

        cx.status.zero();
        let r = pow(&num("0"), &num("-2"), &mut cx);
        assert_eq!(r.kind, Kind::Infinite);
        assert!(cx.status.division_by_zero());
    }

    #[test]
    fn pow_one_third() {
        let mut cx = cx16();
        let third = arith::divide(&num("1"), &num("3"), DivOp::Div, &mut cx);
        cx.status.zero();
        assert_eq!(sci(&pow(&num("27"), &third, &mut cx)), "3.000000000000000");
    }

    #[test]
    fn sqrt_values() {
        let mut cx = cx16();
        assert_eq!(sci(&sqrt(&num("100"), &mut cx)), "10");
        assert_eq!(sci(&sqrt(&num("1.00"), &mut cx)), "1.0");
        assert!(!cx.status.any());
        assert_eq!(sci(&sqrt(&num("2"), &mut cx)), "1.414213562373095");
        assert!(cx.status.inexact());
        cx.status.zero();
        assert_eq!(sci(&sqrt(&num("7"), &mut cx)), "2.645751311064591");
        cx.status.zero();
        assert_eq!(sci(&sqrt(&num("-0"), &mut cx)), "-0");
        let r = sqrt(&num("-1"), &mut cx);
        assert!(r.is_nan());
        assert!(cx.status.invalid_operation());
    }

    #[test]
    fn math_rejects_oversized_context() {
        let mut cx = base_cx(30_000_000);
        let r = exp(&num("1"), &mut cx);
        assert!(r.is_nan());
        assert!(cx.status.invalid_context());
    }
}
