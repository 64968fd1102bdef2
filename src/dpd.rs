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

//! The IEEE 754-2008 densely packed decimal interchange encodings.
//!
//! A decimal interchange format packs a sign bit, a 5-bit combination field,
//! an exponent continuation field, and a coefficient continuation field of
//! 10-bit declets, each declet holding three decimal digits. The three
//! widths differ only in the sizes of the continuation fields, captured here
//! by [`Form`].

use crate::arith::{Kind, Num};

/// The field layout of one interchange width.
pub(crate) struct Form {
    /// Total bits in the encoding.
    pub total_bits: u32,
    /// Bits in the exponent continuation field.
    pub cont_bits: u32,
    /// Declets in the coefficient continuation field.
    pub declets: u32,
    /// Exponent bias.
    pub bias: i32,
    /// Coefficient digits, i.e. `3 * declets + 1`.
    pub prec: u32,
}

pub(crate) const FORM32: Form = Form {
    total_bits: 32,
    cont_bits: 6,
    declets: 2,
    bias: 101,
    prec: 7,
};

pub(crate) const FORM64: Form = Form {
    total_bits: 64,
    cont_bits: 8,
    declets: 5,
    bias: 398,
    prec: 16,
};

pub(crate) const FORM128: Form = Form {
    total_bits: 128,
    cont_bits: 12,
    declets: 11,
    bias: 6176,
    prec: 34,
};

/// Packs three decimal digits, most significant first, into a declet.
///
/// The result is always one of the 1000 canonical declets.
pub(crate) fn declet_encode(d: [u8; 3]) -> u16 {
    let (d1, d2, d3) = (u16::from(d[0]), u16::from(d[1]), u16::from(d[2]));
    match (d1 > 7, d2 > 7, d3 > 7) {
        (false, false, false) => (d1 << 7) | (d2 << 4) | d3,
        (false, false, true) => (d1 << 7) | (d2 << 4) | 0b1000 | (d3 & 1),
        (false, true, false) => {
            (d1 << 7) | ((d3 >> 1) << 5) | ((d2 & 1) << 4) | 0b1010 | (d3 & 1)
        }
        (true, false, false) => {
            ((d3 >> 1) << 8) | ((d1 & 1) << 7) | (d2 << 4) | 0b1100 | (d3 & 1)
        }
        (true, true, false) => {
            ((d3 >> 1) << 8) | ((d1 & 1) << 7) | ((d2 & 1) << 4) | 0b1110 | (d3 & 1)
        }
        (true, false, true) => {
            ((d2 >> 1) << 8) | ((d1 & 1) << 7) | (1 << 5) | ((d2 & 1) << 4) | 0b1110 | (d3 & 1)
        }
        (false, true, true) => (d1 << 7) | (1 << 6) | ((d2 & 1) << 4) | 0b1110 | (d3 & 1),
        (true, true, true) => ((d1 & 1) << 7) | (3 << 5) | ((d2 & 1) << 4) | 0b1110 | (d3 & 1),
    }
}

/// Unpacks a declet into three decimal digits, most significant first.
///
/// All 1024 bit patterns decode; the 24 non-canonical patterns alias
/// canonical values per the standard.
pub(crate) fn declet_decode(v: u16) -> [u8; 3] {
    let v = v & 0x3ff;
    if v & 0b1000 == 0 {
        return [(v >> 7) as u8, (v >> 4 & 7) as u8, (v & 7) as u8];
    }
    match v >> 1 & 3 {
        0b00 => [(v >> 7) as u8, (v >> 4 & 7) as u8, (8 | v & 1) as u8],
        0b01 => [
            (v >> 7) as u8,
            (8 | v >> 4 & 1) as u8,
            ((v >> 5 & 3) << 1 | v & 1) as u8,
        ],
        0b10 => [
            (8 | v >> 7 & 1) as u8,
            (v >> 4 & 7) as u8,
            ((v >> 8 & 3) << 1 | v & 1) as u8,
        ],
        _ => match v >> 5 & 3 {
            0b00 => [
                (8 | v >> 7 & 1) as u8,
                (8 | v >> 4 & 1) as u8,
                ((v >> 8 & 3) << 1 | v & 1) as u8,
            ],
            0b01 => [
                (8 | v >> 7 & 1) as u8,
                ((v >> 8 & 3) << 1 | v >> 4 & 1) as u8,
                (8 | v & 1) as u8,
            ],
            0b10 => [
                (v >> 7) as u8,
                (8 | v >> 4 & 1) as u8,
                (8 | v & 1) as u8,
            ],
            _ => [
                (8 | v >> 7 & 1) as u8,
                (8 | v >> 4 & 1) as u8,
                (8 | v & 1) as u8,
            ],
        },
    }
}

/// Decodes an interchange encoding into the engine representation.
pub(crate) fn decode(bits: u128, form: &Form) -> Num {
    let sign = bits >> (form.total_bits - 1) & 1 != 0;
    let comb = (bits >> (form.total_bits - 6) & 0x1f) as u32;
    if comb == 0b11110 {
        return Num {
            sign,
            exp: 0,
            coef: vec![0],
            kind: Kind::Infinite,
        };
    }
    if comb == 0b11111 {
        let signaling = bits >> (form.total_bits - 7) & 1 != 0;
        let mut payload = decode_declets(bits, form);
        strip_leading(&mut payload);
        return Num {
            sign,
            exp: 0,
            coef: payload,
            kind: if signaling { Kind::SNan } else { Kind::QNan },
        };
    }
    let (exp_high, msd) = if comb >> 3 == 0b11 {
        (comb >> 1 & 3, 8 | comb & 1)
    } else {
        (comb >> 3, comb & 7)
    };
    let cont_mask = (1u128 << form.cont_bits) - 1;
    let cont = (bits >> (10 * form.declets) & cont_mask) as i64;
    let exp = ((i64::from(exp_high) << form.cont_bits) | cont) - i64::from(form.bias);
    let mut coef = Vec::with_capacity(form.prec as usize);
    coef.push(msd as u8);
    coef.extend_from_slice(&decode_declets(bits, form));
    strip_leading(&mut coef);
    Num {
        sign,
        exp,
        coef,
        kind: Kind::Finite,
    }
}

fn decode_declets(bits: u128, form: &Form) -> Vec<u8> {
    let mut digits = Vec::with_capacity(3 * form.declets as usize);
    for i in (0..form.declets).rev() {
        let declet = (bits >> (10 * i) & 0x3ff) as u16;
        digits.extend_from_slice(&declet_decode(declet));
    }
    digits
}

fn strip_leading(coef: &mut Vec<u8>) {
    let lead = coef.iter().take_while(|&&d| d == 0).count();
    let lead = lead.min(coef.len() - 1);
    coef.drain(..lead);
}

/// Encodes a number into an interchange encoding.
///
/// Finite operands must already satisfy the width's limits, i.e. have been
/// finalized through the width's context: at most `prec` coefficient digits
/// and a biased exponent within the format's range.
pub(crate) fn encode(n: &Num, form: &Form) -> u128 {
    let sign = if n.sign {
        1u128 << (form.total_bits - 1)
    } else {
        0
    };
    match n.kind {
        Kind::Infinite => return sign | 0b11110u128 << (form.total_bits - 6),
        Kind::QNan | Kind::SNan => {
            let mut bits = sign | 0b11111u128 << (form.total_bits - 6);
            if n.kind == Kind::SNan {
                bits |= 1u128 << (form.total_bits - 7);
            }
            return bits | encode_declets(&n.coef, form);
        }
        Kind::Finite => (),
    }
    let biased = n.exp + i64::from(form.bias);
    debug_assert!(biased >= 0 && biased < 3 << form.cont_bits);
    debug_assert!(n.coef.len() <= form.prec as usize);
    let mut digits = vec![0u8; form.prec as usize - n.coef.len()];
    digits.extend_from_slice(&n.coef);
    let msd = u128::from(digits[0]);
    let exp_high = (biased >> form.cont_bits) as u128;
    let cont = (biased & ((1 << form.cont_bits) - 1)) as u128;
    let comb = if msd > 7 {
        0b11000 | exp_high << 1 | (msd & 1)
    } else {
        exp_high << 3 | msd
    };
    sign | comb << (form.total_bits - 6)
        | cont << (10 * form.declets)
        | encode_declets(&digits[1..], form)
}

fn encode_declets(digits: &[u8], form: &Form) -> u128 {
    // right-align the digits within the declet field
    let width = 3 * form.declets as usize;
    let mut padded = vec![0u8; width.saturating_sub(digits.len())];
    let skip = digits.len().saturating_sub(width);
    padded.extend_from_slice(&digits[skip..]);
    let mut bits = 0u128;
    for group in padded.chunks(3) {
        bits = bits << 10 | u128::from(declet_encode([group[0], group[1], group[2]]));
    }
    bits
}

/// Reports whether an encoding is canonical, i.e. contains no aliased
/// declets and, for special values, no undefined bits.
pub(crate) fn is_canonical(bits: u128, form: &Form) -> bool {
    bits == canonical(bits, form)
}

/// Returns the canonical encoding of the same value.
pub(crate) fn canonical(bits: u128, form: &Form) -> u128 {
    encode(&decode(bits, form), form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declets_round_trip() {
        for v in 0..1000u16 {
            let digits = [(v / 100) as u8, (v / 10 % 10) as u8, (v % 10) as u8];
            let declet = declet_encode(digits);
            assert!(declet < 1024);
            assert_eq!(declet_decode(declet), digits, "value {}", v);
        }
    }

    #[test]
    fn declet_known_values() {
        assert_eq!(declet_encode([0, 0, 5]), 0x005);
        assert_eq!(declet_encode([0, 0, 9]), 0x009);
        assert_eq!(declet_encode([0, 8, 0]), 0x00A);
        assert_eq!(declet_encode([8, 0, 0]), 0x00C);
        assert_eq!(declet_encode([8, 8, 8]), 0x06E);
        assert_eq!(declet_encode([9, 9, 9]), 0x0FF);
        assert_eq!(declet_encode([1, 2, 3]), 0x0A3);
    }

    #[test]
    fn noncanonical_declets_decode() {
        // every 10-bit pattern decodes to valid digits and re-encodes to a
        // canonical declet with the same value
        for v in 0..1024u16 {
            let digits = declet_decode(v);
            assert!(digits.iter().all(|&d| d <= 9), "declet {:#x}", v);
            let canonical = declet_encode(digits);
            assert_eq!(declet_decode(canonical), digits);
        }
    }

    #[test]
    fn zero_encoding() {
        let z = Num {
            sign: false,
            exp: 0,
            coef: vec![0],
            kind: Kind::Finite,
        };
        assert_eq!(encode(&z, &FORM64), 0x2238000000000000);
        assert_eq!(encode(&z, &FORM32), 0x22500000);
        let n = decode(0x2238000000000000, &FORM64);
        assert!(n.is_zero());
        assert_eq!(n.exp, 0);
    }

    #[test]
    fn one_encoding() {
        let one = Num {
            sign: false,
            exp: 0,
            coef: vec![1],
            kind: Kind::Finite,
        };
        assert_eq!(encode(&one, &FORM64), 0x2238000000000001);
    }

    #[test]
    fn nan_encoding() {
        let nan = Num {
            sign: false,
            exp: 0,
            coef: vec![0],
            kind: Kind::QNan,
        };
        assert_eq!(encode(&nan, &FORM64), 0x7c00000000000000);
        let n = decode(0x7c00000000000000, &FORM64);
        assert_eq!(n.kind, Kind::QNan);
    }

    #[test]
    fn finite_round_trip() {
        for s in &["1", "-1", "123.45", "4294967296", "-0.00001", "9.999999E+96"] {
            let mut cx = crate::arith::tests::base_cx(7);
            cx.emax = 96;
            cx.emin = -95;
            let n = crate::arith::parse(s, &mut cx).unwrap();
            let bits = encode(&n, &FORM32);
            let back = decode(bits, &FORM32);
            assert_eq!(back.sign, n.sign);
            assert_eq!(back.exp, n.exp);
            assert_eq!(back.coef, n.coef);
        }
    }
}
