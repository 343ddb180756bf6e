/*
    iron86
    https://github.com/iron86-emu/iron86

    Copyright 2024-2025 the iron86 authors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    ---------------------------------------------------------------------------

    tests/alu_props.rs

    Property tests: flag rules checked against a reference computed at wider
    precision, the linear address rule, register file round-trips, and a
    random-byte-soup sweep proving the core never panics on any stream.

*/

use iron86_core::{
    cpu_8086::{mnemonic::Mnemonic, Flag, CPU_FLAGS_RESERVED_ON},
    cpu_common::calc_linear_address,
    Intel8086, Register16, Register8,
};
use proptest::prelude::*;

/// Reference flag computation for 8-bit add/adc, done at 16-bit precision.
fn reference_add8(d: u8, s: u8, cin: bool) -> (u8, bool, bool, bool, bool, bool, bool) {
    let wide = d as u16 + s as u16 + cin as u16;
    let r = wide as u8;
    let carry = wide > 0xFF;
    let aux = (d & 0x0F) + (s & 0x0F) + cin as u8 > 0x0F;
    let overflow = (d ^ s) & 0x80 == 0 && (d ^ r) & 0x80 != 0;
    (r, carry, overflow, aux, r == 0, r & 0x80 != 0, r.count_ones() % 2 == 0)
}

/// Reference flag computation for 8-bit sub/sbb.
fn reference_sub8(d: u8, s: u8, cin: bool) -> (u8, bool, bool, bool, bool, bool, bool) {
    let subtrahend = s as u16 + cin as u16;
    let r = (d as u16).wrapping_sub(subtrahend) as u8;
    let carry = subtrahend > d as u16;
    let aux = ((d & 0x0F) as u16) < (s & 0x0F) as u16 + cin as u16;
    let overflow = (d ^ s) & 0x80 != 0 && (d ^ r) & 0x80 != 0;
    (r, carry, overflow, aux, r == 0, r & 0x80 != 0, r.count_ones() % 2 == 0)
}

/// Reference flag computation for 16-bit add/adc at 32-bit precision.
fn reference_add16(d: u16, s: u16, cin: bool) -> (u16, bool, bool, bool, bool, bool, bool) {
    let wide = d as u32 + s as u32 + cin as u32;
    let r = wide as u16;
    let carry = wide > 0xFFFF;
    let aux = (d & 0x0F) + (s & 0x0F) + cin as u16 > 0x0F;
    let overflow = (d ^ s) & 0x8000 == 0 && (d ^ r) & 0x8000 != 0;
    let parity = (r & 0xFF).count_ones() % 2 == 0;
    (r, carry, overflow, aux, r == 0, r & 0x8000 != 0, parity)
}

/// Reference flag computation for 16-bit sub/sbb.
fn reference_sub16(d: u16, s: u16, cin: bool) -> (u16, bool, bool, bool, bool, bool, bool) {
    let subtrahend = s as u32 + cin as u32;
    let r = (d as u32).wrapping_sub(subtrahend) as u16;
    let carry = subtrahend > d as u32;
    let aux = ((d & 0x0F) as u32) < (s & 0x0F) as u32 + cin as u32;
    let overflow = (d ^ s) & 0x8000 != 0 && (d ^ r) & 0x8000 != 0;
    let parity = (r & 0xFF).count_ones() % 2 == 0;
    (r, carry, overflow, aux, r == 0, r & 0x8000 != 0, parity)
}

fn check_flags(
    cpu: &Intel8086,
    expected: (bool, bool, bool, bool, bool, bool),
) -> Result<(), TestCaseError> {
    let (carry, overflow, aux, zero, sign, parity) = expected;
    prop_assert_eq!(cpu.get_flag(Flag::Carry), carry, "CF");
    prop_assert_eq!(cpu.get_flag(Flag::Overflow), overflow, "OF");
    prop_assert_eq!(cpu.get_flag(Flag::AuxCarry), aux, "AF");
    prop_assert_eq!(cpu.get_flag(Flag::Zero), zero, "ZF");
    prop_assert_eq!(cpu.get_flag(Flag::Sign), sign, "SF");
    prop_assert_eq!(cpu.get_flag(Flag::Parity), parity, "PF");
    Ok(())
}

proptest! {
    #[test]
    fn add8_flags_match_reference(d: u8, s: u8, cin: bool) {
        let mut cpu = Intel8086::new();
        cpu.set_flag_state(Flag::Carry, cin);
        let mnemonic = if cin { Mnemonic::ADC } else { Mnemonic::ADD };
        let result = cpu.math_op8(mnemonic, d, s);

        let (r, carry, overflow, aux, zero, sign, parity) = reference_add8(d, s, cin);
        prop_assert_eq!(result, r);
        check_flags(&cpu, (carry, overflow, aux, zero, sign, parity))?;
    }

    #[test]
    fn sub8_flags_match_reference(d: u8, s: u8, cin: bool) {
        let mut cpu = Intel8086::new();
        cpu.set_flag_state(Flag::Carry, cin);
        let mnemonic = if cin { Mnemonic::SBB } else { Mnemonic::SUB };
        let result = cpu.math_op8(mnemonic, d, s);

        let (r, carry, overflow, aux, zero, sign, parity) = reference_sub8(d, s, cin);
        prop_assert_eq!(result, r);
        check_flags(&cpu, (carry, overflow, aux, zero, sign, parity))?;
    }

    #[test]
    fn add16_flags_match_reference(d: u16, s: u16, cin: bool) {
        let mut cpu = Intel8086::new();
        cpu.set_flag_state(Flag::Carry, cin);
        let mnemonic = if cin { Mnemonic::ADC } else { Mnemonic::ADD };
        let result = cpu.math_op16(mnemonic, d, s);

        let (r, carry, overflow, aux, zero, sign, parity) = reference_add16(d, s, cin);
        prop_assert_eq!(result, r);
        check_flags(&cpu, (carry, overflow, aux, zero, sign, parity))?;
    }

    #[test]
    fn sub16_flags_match_reference(d: u16, s: u16, cin: bool) {
        let mut cpu = Intel8086::new();
        cpu.set_flag_state(Flag::Carry, cin);
        let mnemonic = if cin { Mnemonic::SBB } else { Mnemonic::SUB };
        let result = cpu.math_op16(mnemonic, d, s);

        let (r, carry, overflow, aux, zero, sign, parity) = reference_sub16(d, s, cin);
        prop_assert_eq!(result, r);
        check_flags(&cpu, (carry, overflow, aux, zero, sign, parity))?;
    }

    #[test]
    fn cmp_sets_flags_without_writing(d: u8, s: u8) {
        let mut cpu = Intel8086::new();
        let result = cpu.math_op8(Mnemonic::CMP, d, s);
        prop_assert_eq!(result, d);

        let (_, carry, overflow, aux, zero, sign, parity) = reference_sub8(d, s, false);
        check_flags(&cpu, (carry, overflow, aux, zero, sign, parity))?;
    }

    #[test]
    fn logical_ops_clear_carry_and_overflow(d: u16, s: u16) {
        for mnemonic in [Mnemonic::AND, Mnemonic::OR, Mnemonic::XOR, Mnemonic::TEST] {
            let mut cpu = Intel8086::new();
            cpu.set_flag(Flag::Carry);
            cpu.set_flag(Flag::Overflow);
            let result = cpu.math_op16(mnemonic, d, s);
            let logical = match mnemonic {
                Mnemonic::AND | Mnemonic::TEST => d & s,
                Mnemonic::OR => d | s,
                _ => d ^ s,
            };
            prop_assert!(!cpu.get_flag(Flag::Carry));
            prop_assert!(!cpu.get_flag(Flag::Overflow));
            prop_assert_eq!(cpu.get_flag(Flag::Zero), logical == 0);
            prop_assert_eq!(cpu.get_flag(Flag::Sign), logical & 0x8000 != 0);
            prop_assert_eq!(
                cpu.get_flag(Flag::Parity),
                (logical & 0xFF).count_ones() % 2 == 0
            );
            if mnemonic == Mnemonic::TEST {
                prop_assert_eq!(result, d);
            }
        }
    }

    #[test]
    fn linear_address_rule(segment: u16, offset: u16) {
        let expected = ((segment as u32 * 16) + offset as u32) % 0x100000;
        prop_assert_eq!(calc_linear_address(segment, offset), expected);
    }

    #[test]
    fn register16_roundtrip(index in 0usize..8, value: u16) {
        let lut = [
            Register16::AX, Register16::CX, Register16::DX, Register16::BX,
            Register16::SP, Register16::BP, Register16::SI, Register16::DI,
        ];
        let mut cpu = Intel8086::new();
        cpu.set_register16(lut[index], value);
        prop_assert_eq!(cpu.get_register16(lut[index]), value);
    }

    #[test]
    fn register8_roundtrip_preserves_sibling(index in 0usize..8, value: u8, sibling: u8) {
        let lut = [
            Register8::AL, Register8::CL, Register8::DL, Register8::BL,
            Register8::AH, Register8::CH, Register8::DH, Register8::BH,
        ];
        // The sibling half of the same 16-bit register: AL <-> AH etc.
        let other = lut[(index + 4) % 8];
        let mut cpu = Intel8086::new();
        cpu.set_register8(other, sibling);
        cpu.set_register8(lut[index], value);
        prop_assert_eq!(cpu.get_register8(lut[index]), value);
        prop_assert_eq!(cpu.get_register8(other), sibling);
    }

    // The core must execute anything without panicking: well-formed code,
    // truncated instructions, modrm bytes pointing anywhere, the lot. The
    // budget also bounds execution regardless of what the bytes decode to.
    #[test]
    fn random_byte_soup_never_panics(
        program in proptest::collection::vec(any::<u8>(), 1..256),
        budget in 0usize..64,
    ) {
        let mut cpu = Intel8086::new();
        cpu.load_program(0x0000, 0x0000, &program).unwrap();
        let executed = cpu.execute(budget);
        prop_assert!(executed <= budget);

        // Reserved flag bits survive arbitrary execution
        prop_assert_eq!(cpu.get_flags() & CPU_FLAGS_RESERVED_ON, CPU_FLAGS_RESERVED_ON);
    }
}
