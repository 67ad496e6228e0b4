//! # Z80 Arithmetic and Flag Rules
//!
//! Pure functions computing a result and updating `Flags`. The decoders call
//! these for every arithmetic, logic, rotate and bit-test instruction so each
//! flag rule lives in exactly one place.

use super::flags::Flags;

/// Even parity, by XOR-folding the byte down to one bit.
pub(crate) fn parity(value: u8) -> bool {
    let mut v = value;
    v ^= v >> 4;
    v ^= v >> 2;
    v ^= v >> 1;
    v & 1 == 0
}

/// ADD/ADC: H is the carry out of bit 3, P/V is signed overflow.
pub(crate) fn add8(f: &mut Flags, a: u8, value: u8, carry: bool) -> u8 {
    let c = carry as u8;
    let wide = a as u16 + value as u16 + c as u16;
    let result = wide as u8;

    f.set_sz_xy(result);
    f.h = (a & 0x0F) + (value & 0x0F) + c > 0x0F;
    f.pv = ((a ^ result) & (value ^ result) & 0x80) != 0;
    f.n = false;
    f.c = wide > 0xFF;
    result
}

/// SUB/SBC: H is the borrow into bit 4, P/V is signed overflow.
pub(crate) fn sub8(f: &mut Flags, a: u8, value: u8, carry: bool) -> u8 {
    let c = carry as u8;
    let result = a.wrapping_sub(value).wrapping_sub(c);

    f.set_sz_xy(result);
    f.h = (a & 0x0F) < (value & 0x0F) + c;
    f.pv = ((a ^ value) & (a ^ result) & 0x80) != 0;
    f.n = true;
    f.c = (a as u16) < value as u16 + c as u16;
    result
}

/// CP: a subtraction that only keeps the flags. X and Y come from the operand.
pub(crate) fn cp8(f: &mut Flags, a: u8, value: u8) {
    sub8(f, a, value, false);
    f.set_xy(value);
}

pub(crate) fn and8(f: &mut Flags, a: u8, value: u8) -> u8 {
    let result = a & value;
    logic_flags(f, result);
    f.h = true;
    result
}

pub(crate) fn xor8(f: &mut Flags, a: u8, value: u8) -> u8 {
    let result = a ^ value;
    logic_flags(f, result);
    result
}

pub(crate) fn or8(f: &mut Flags, a: u8, value: u8) -> u8 {
    let result = a | value;
    logic_flags(f, result);
    result
}

fn logic_flags(f: &mut Flags, result: u8) {
    f.set_sz_xy(result);
    f.h = false;
    f.pv = parity(result);
    f.n = false;
    f.c = false;
}

/// Applies ALU operation `op` (ADD ADC SUB SBC AND XOR OR CP) to A.
///
/// Returns the new accumulator; CP returns `a` unchanged.
pub(crate) fn alu_op(f: &mut Flags, op: u8, a: u8, value: u8) -> u8 {
    match op & 7 {
        0 => add8(f, a, value, false),
        1 => {
            let carry = f.c;
            add8(f, a, value, carry)
        }
        2 => sub8(f, a, value, false),
        3 => {
            let carry = f.c;
            sub8(f, a, value, carry)
        }
        4 => and8(f, a, value),
        5 => xor8(f, a, value),
        6 => or8(f, a, value),
        _ => {
            cp8(f, a, value);
            a
        }
    }
}

/// INC r: C is preserved, P/V flags 0x7F -> 0x80.
pub(crate) fn inc8(f: &mut Flags, value: u8) -> u8 {
    let result = value.wrapping_add(1);
    f.set_sz_xy(result);
    f.h = (value & 0x0F) == 0x0F;
    f.pv = value == 0x7F;
    f.n = false;
    result
}

/// DEC r: C is preserved, P/V flags 0x80 -> 0x7F.
pub(crate) fn dec8(f: &mut Flags, value: u8) -> u8 {
    let result = value.wrapping_sub(1);
    f.set_sz_xy(result);
    f.h = (value & 0x0F) == 0x00;
    f.pv = value == 0x80;
    f.n = true;
    result
}

/// ADD HL,rr: H from bit 11, C from bit 15. S, Z and P/V are preserved.
pub(crate) fn add16(f: &mut Flags, a: u16, value: u16) -> u16 {
    let wide = a as u32 + value as u32;
    let result = wide as u16;

    f.h = (a & 0x0FFF) + (value & 0x0FFF) > 0x0FFF;
    f.n = false;
    f.c = wide > 0xFFFF;
    f.set_xy((result >> 8) as u8);
    result
}

/// ADC HL,rr: like `add16` but also sets S, Z and P/V (overflow).
pub(crate) fn adc16(f: &mut Flags, a: u16, value: u16, carry: bool) -> u16 {
    let c = carry as u32;
    let wide = a as u32 + value as u32 + c;
    let result = wide as u16;

    f.s = result & 0x8000 != 0;
    f.z = result == 0;
    f.h = (a as u32 & 0x0FFF) + (value as u32 & 0x0FFF) + c > 0x0FFF;
    f.pv = ((a ^ result) & (value ^ result) & 0x8000) != 0;
    f.n = false;
    f.c = wide > 0xFFFF;
    f.set_xy((result >> 8) as u8);
    result
}

/// SBC HL,rr
pub(crate) fn sbc16(f: &mut Flags, a: u16, value: u16, carry: bool) -> u16 {
    let c = carry as u32;
    let result = a.wrapping_sub(value).wrapping_sub(c as u16);

    f.s = result & 0x8000 != 0;
    f.z = result == 0;
    f.h = (a as u32 & 0x0FFF) < (value as u32 & 0x0FFF) + c;
    f.pv = ((a ^ value) & (a ^ result) & 0x8000) != 0;
    f.n = true;
    f.c = (a as u32) < value as u32 + c;
    f.set_xy((result >> 8) as u8);
    result
}

/// CB-prefixed rotate/shift `op` (RLC RRC RL RR SLA SRA SLL SRL).
///
/// Sets S, Z and parity from the result, clears H and N, and moves the
/// shifted-out bit into C.
pub(crate) fn rotate_shift(f: &mut Flags, op: u8, value: u8) -> u8 {
    let carry_in = f.c as u8;
    let (result, carry_out) = match op & 7 {
        0 => (value.rotate_left(1), value & 0x80 != 0),
        1 => (value.rotate_right(1), value & 0x01 != 0),
        2 => ((value << 1) | carry_in, value & 0x80 != 0),
        3 => ((value >> 1) | (carry_in << 7), value & 0x01 != 0),
        4 => (value << 1, value & 0x80 != 0),
        5 => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        6 => ((value << 1) | 0x01, value & 0x80 != 0),
        _ => (value >> 1, value & 0x01 != 0),
    };

    f.set_sz_xy(result);
    f.h = false;
    f.pv = parity(result);
    f.n = false;
    f.c = carry_out;
    result
}

/// RLCA/RRCA/RLA/RRA: the accumulator rotates. S, Z and P/V are preserved.
pub(crate) fn rotate_accumulator(f: &mut Flags, op: u8, a: u8) -> u8 {
    let carry_in = f.c as u8;
    let (result, carry_out) = match op & 3 {
        0 => (a.rotate_left(1), a & 0x80 != 0),
        1 => (a.rotate_right(1), a & 0x01 != 0),
        2 => ((a << 1) | carry_in, a & 0x80 != 0),
        _ => ((a >> 1) | (carry_in << 7), a & 0x01 != 0),
    };

    f.h = false;
    f.n = false;
    f.c = carry_out;
    f.set_xy(result);
    result
}

/// BIT b,value: Z and P/V set when the bit is clear, S only for a set bit 7.
pub(crate) fn bit(f: &mut Flags, b: u8, value: u8) {
    let set = value & (1 << (b & 7)) != 0;

    f.z = !set;
    f.pv = !set;
    f.s = b == 7 && set;
    f.h = true;
    f.n = false;
    f.set_xy(value);
}

/// DAA: corrects A after a BCD addition (N clear) or subtraction (N set).
pub(crate) fn daa(f: &mut Flags, a: u8) -> u8 {
    let mut correction = 0u8;
    let mut carry = f.c;

    if f.h || (a & 0x0F) > 0x09 {
        correction |= 0x06;
    }
    if f.c || a > 0x99 {
        correction |= 0x60;
        carry = true;
    }

    let result = if f.n {
        a.wrapping_sub(correction)
    } else {
        a.wrapping_add(correction)
    };

    f.h = if f.n {
        f.h && (a & 0x0F) < 0x06
    } else {
        (a & 0x0F) > 0x09
    };
    f.c = carry;
    f.set_sz_xy(result);
    f.pv = parity(result);
    result
}

/// NEG: 0 - A. P/V is set for 0x80, C for any non-zero A.
pub(crate) fn neg(f: &mut Flags, a: u8) -> u8 {
    sub8(f, 0, a, false)
}
