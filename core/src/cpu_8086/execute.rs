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

    cpu_8086::execute.rs

    Opcode dispatch. Each arm owns any further decoding its instruction
    needs: modrm and displacement, then immediates, in instruction stream
    order. Group opcodes re-dispatch on the reg field of their modrm byte.

*/

use crate::{
    cpu_8086::{mnemonic::Mnemonic, modrm::ModRmByte, *},
    cpu_common::Segment,
};

// Group-1 sub-dispatch, also the row order of the 0x00-0x3D ALU block:
// bits 5:3 of those opcodes select the same operations.
pub const GROUP1_OPS: [Mnemonic; 8] = [
    Mnemonic::ADD,
    Mnemonic::OR,
    Mnemonic::ADC,
    Mnemonic::SBB,
    Mnemonic::AND,
    Mnemonic::SUB,
    Mnemonic::XOR,
    Mnemonic::CMP,
];

// Group-2 sub-dispatch for 0xD0-0xD3. reg=6 is the undocumented SETMO.
pub const GROUP2_OPS: [Mnemonic; 8] = [
    Mnemonic::ROL,
    Mnemonic::ROR,
    Mnemonic::RCL,
    Mnemonic::RCR,
    Mnemonic::SHL,
    Mnemonic::SHR,
    Mnemonic::SETMO,
    Mnemonic::SAR,
];

// rustfmt chokes on large match statements.
#[rustfmt::skip]
impl Intel8086 {
    /// Execute one opcode that has just been fetched from CS:IP. On entry IP
    /// points at the byte after the opcode; handlers fetch the rest of the
    /// instruction themselves.
    pub fn execute_instruction(&mut self, opcode: u8) -> ExecutionResult {
        match opcode {
            0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 => {
                // ALU r/m8, r8
                let mnemonic = GROUP1_OPS[((opcode >> 3) & 0x07) as usize];
                let modrm = ModRmByte::read(self);
                let op1_value = self.read_rm8(&modrm);
                let op2_value = self.get_register8(modrm.get_op2_reg8());
                let result = self.math_op8(mnemonic, op1_value, op2_value);
                if mnemonic != Mnemonic::CMP {
                    self.write_rm8(&modrm, result);
                }
            }
            0x01 | 0x09 | 0x11 | 0x19 | 0x21 | 0x29 | 0x31 | 0x39 => {
                // ALU r/m16, r16
                let mnemonic = GROUP1_OPS[((opcode >> 3) & 0x07) as usize];
                let modrm = ModRmByte::read(self);
                let op1_value = self.read_rm16(&modrm);
                let op2_value = self.get_register16(modrm.get_op2_reg16());
                let result = self.math_op16(mnemonic, op1_value, op2_value);
                if mnemonic != Mnemonic::CMP {
                    self.write_rm16(&modrm, result);
                }
            }
            0x02 | 0x0A | 0x12 | 0x1A | 0x22 | 0x2A | 0x32 | 0x3A => {
                // ALU r8, r/m8
                let mnemonic = GROUP1_OPS[((opcode >> 3) & 0x07) as usize];
                let modrm = ModRmByte::read(self);
                let op1_value = self.get_register8(modrm.get_op2_reg8());
                let op2_value = self.read_rm8(&modrm);
                let result = self.math_op8(mnemonic, op1_value, op2_value);
                if mnemonic != Mnemonic::CMP {
                    self.set_register8(modrm.get_op2_reg8(), result);
                }
            }
            0x03 | 0x0B | 0x13 | 0x1B | 0x23 | 0x2B | 0x33 | 0x3B => {
                // ALU r16, r/m16
                let mnemonic = GROUP1_OPS[((opcode >> 3) & 0x07) as usize];
                let modrm = ModRmByte::read(self);
                let op1_value = self.get_register16(modrm.get_op2_reg16());
                let op2_value = self.read_rm16(&modrm);
                let result = self.math_op16(mnemonic, op1_value, op2_value);
                if mnemonic != Mnemonic::CMP {
                    self.set_register16(modrm.get_op2_reg16(), result);
                }
            }
            0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
                // ALU al, imm8
                let mnemonic = GROUP1_OPS[((opcode >> 3) & 0x07) as usize];
                let op1_value = self.get_register8(Register8::AL);
                let op2_value = self.fetch_u8();
                let result = self.math_op8(mnemonic, op1_value, op2_value);
                if mnemonic != Mnemonic::CMP {
                    self.set_register8(Register8::AL, result);
                }
            }
            0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
                // ALU ax, imm16
                let mnemonic = GROUP1_OPS[((opcode >> 3) & 0x07) as usize];
                let op1_value = self.get_register16(Register16::AX);
                let op2_value = self.fetch_u16();
                let result = self.math_op16(mnemonic, op1_value, op2_value);
                if mnemonic != Mnemonic::CMP {
                    self.set_register16(Register16::AX, result);
                }
            }
            0x06 => self.push_register16(Register16::ES),
            0x07 => self.pop_register16(Register16::ES),
            0x0E => self.push_register16(Register16::CS),
            0x0F => {
                // POP cs executes as encoded on the 8086
                self.pop_register16(Register16::CS);
            }
            0x16 => self.push_register16(Register16::SS),
            0x17 => self.pop_register16(Register16::SS),
            0x1E => self.push_register16(Register16::DS),
            0x1F => self.pop_register16(Register16::DS),
            0x26 => {
                // ES segment override prefix
                self.segment_override = Some(Segment::ES);
                return ExecutionResult::Prefix;
            }
            0x2E => {
                // CS segment override prefix
                self.segment_override = Some(Segment::CS);
                return ExecutionResult::Prefix;
            }
            0x36 => {
                // SS segment override prefix
                self.segment_override = Some(Segment::SS);
                return ExecutionResult::Prefix;
            }
            0x3E => {
                // DS segment override prefix
                self.segment_override = Some(Segment::DS);
                return ExecutionResult::Prefix;
            }
            0x27 => self.daa(),
            0x2F => self.das(),
            0x37 => self.aaa(),
            0x3F => self.aas(),
            0x40..=0x47 => {
                // INC r16. CF is not affected.
                let reg = REGISTER16_LUT[(opcode & OPCODE_REGISTER_SELECT_MASK) as usize];
                let value = self.get_register16(reg);
                let result = self.math_op16(Mnemonic::INC, value, 0);
                self.set_register16(reg, result);
            }
            0x48..=0x4F => {
                // DEC r16. CF is not affected.
                let reg = REGISTER16_LUT[(opcode & OPCODE_REGISTER_SELECT_MASK) as usize];
                let value = self.get_register16(reg);
                let result = self.math_op16(Mnemonic::DEC, value, 0);
                self.set_register16(reg, result);
            }
            0x50..=0x57 => {
                // PUSH r16
                let reg = REGISTER16_LUT[(opcode & OPCODE_REGISTER_SELECT_MASK) as usize];
                self.push_register16(reg);
            }
            0x58..=0x5F => {
                // POP r16
                let reg = REGISTER16_LUT[(opcode & OPCODE_REGISTER_SELECT_MASK) as usize];
                self.pop_register16(reg);
            }
            0x60..=0x7F => {
                // Jcc rel8. The 0x60 row aliases the 0x70 row on stock 8086.
                let rel8 = self.fetch_i8();
                if self.jcc_condition(opcode) {
                    self.reljmp(rel8 as i16);
                }
            }
            0x80 | 0x82 => {
                // Group-1: ADD/OR/ADC/SBB/AND/SUB/XOR/CMP r/m8, imm8
                let modrm = ModRmByte::read(self);
                let mnemonic = GROUP1_OPS[(modrm.get_op_extension() & 0x07) as usize];
                let op1_value = self.read_rm8(&modrm);
                let op2_value = self.fetch_u8();
                let result = self.math_op8(mnemonic, op1_value, op2_value);
                if mnemonic != Mnemonic::CMP {
                    self.write_rm8(&modrm, result);
                }
            }
            0x81 => {
                // Group-1: r/m16, imm16
                let modrm = ModRmByte::read(self);
                let mnemonic = GROUP1_OPS[(modrm.get_op_extension() & 0x07) as usize];
                let op1_value = self.read_rm16(&modrm);
                let op2_value = self.fetch_u16();
                let result = self.math_op16(mnemonic, op1_value, op2_value);
                if mnemonic != Mnemonic::CMP {
                    self.write_rm16(&modrm, result);
                }
            }
            0x83 => {
                // Group-1: r/m16, imm8 sign-extended to 16 bits
                let modrm = ModRmByte::read(self);
                let mnemonic = GROUP1_OPS[(modrm.get_op_extension() & 0x07) as usize];
                let op1_value = self.read_rm16(&modrm);
                let op2_value = self.fetch_i8() as i16 as u16;
                let result = self.math_op16(mnemonic, op1_value, op2_value);
                if mnemonic != Mnemonic::CMP {
                    self.write_rm16(&modrm, result);
                }
            }
            0x84 => {
                // TEST r/m8, r8
                let modrm = ModRmByte::read(self);
                let op1_value = self.read_rm8(&modrm);
                let op2_value = self.get_register8(modrm.get_op2_reg8());
                self.math_op8(Mnemonic::TEST, op1_value, op2_value);
            }
            0x85 => {
                // TEST r/m16, r16
                let modrm = ModRmByte::read(self);
                let op1_value = self.read_rm16(&modrm);
                let op2_value = self.get_register16(modrm.get_op2_reg16());
                self.math_op16(Mnemonic::TEST, op1_value, op2_value);
            }
            0x86 => {
                // XCHG r8, r/m8
                let modrm = ModRmByte::read(self);
                let reg = modrm.get_op2_reg8();
                let rm_value = self.read_rm8(&modrm);
                let reg_value = self.get_register8(reg);
                self.write_rm8(&modrm, reg_value);
                self.set_register8(reg, rm_value);
            }
            0x87 => {
                // XCHG r16, r/m16
                let modrm = ModRmByte::read(self);
                let reg = modrm.get_op2_reg16();
                let rm_value = self.read_rm16(&modrm);
                let reg_value = self.get_register16(reg);
                self.write_rm16(&modrm, reg_value);
                self.set_register16(reg, rm_value);
            }
            0x88 => {
                // MOV r/m8, r8
                let modrm = ModRmByte::read(self);
                let value = self.get_register8(modrm.get_op2_reg8());
                self.write_rm8(&modrm, value);
            }
            0x89 => {
                // MOV r/m16, r16
                let modrm = ModRmByte::read(self);
                let value = self.get_register16(modrm.get_op2_reg16());
                self.write_rm16(&modrm, value);
            }
            0x8A => {
                // MOV r8, r/m8
                let modrm = ModRmByte::read(self);
                let value = self.read_rm8(&modrm);
                self.set_register8(modrm.get_op2_reg8(), value);
            }
            0x8B => {
                // MOV r16, r/m16
                let modrm = ModRmByte::read(self);
                let value = self.read_rm16(&modrm);
                self.set_register16(modrm.get_op2_reg16(), value);
            }
            0x8C => {
                // MOV r/m16, sreg
                let modrm = ModRmByte::read(self);
                let value = self.get_register16(modrm.get_op2_segmentreg16());
                self.write_rm16(&modrm, value);
            }
            0x8D => {
                // LEA r16, m
                let modrm = ModRmByte::read(self);
                let offset = self.load_effective_address(&modrm);
                self.set_register16(modrm.get_op2_reg16(), offset);
            }
            0x8E => {
                // MOV sreg, r/m16
                let modrm = ModRmByte::read(self);
                let value = self.read_rm16(&modrm);
                self.set_register16(modrm.get_op2_segmentreg16(), value);
            }
            0x8F => {
                // POP r/m16
                let modrm = ModRmByte::read(self);
                let value = self.pop_u16();
                self.write_rm16(&modrm, value);
            }
            0x90 => {
                // NOP (XCHG ax, ax)
            }
            0x91..=0x97 => {
                // XCHG ax, r16
                let reg = REGISTER16_LUT[(opcode & OPCODE_REGISTER_SELECT_MASK) as usize];
                let ax_value = self.get_register16(Register16::AX);
                let reg_value = self.get_register16(reg);
                self.set_register16(Register16::AX, reg_value);
                self.set_register16(reg, ax_value);
            }
            0x98 => {
                // CBW
                self.sign_extend_al();
            }
            0x99 => {
                // CWD
                self.sign_extend_ax();
            }
            0x9A => {
                // CALLF ptr16:16. Offset word first, then segment word.
                let new_ip = self.fetch_u16();
                let new_cs = self.fetch_u16();
                self.farcall(new_cs, new_ip);
            }
            0x9B => {
                // WAIT: no co-processor attached, nothing to wait for
            }
            0x9C => self.push_flags(),
            0x9D => self.pop_flags(),
            0x9E => {
                // SAHF: load SF, ZF, AF, PF, CF from AH
                let ah = self.get_register8(Register8::AH) as u16;
                self.set_flag_state(Flag::Sign, ah & CPU_FLAG_SIGN != 0);
                self.set_flag_state(Flag::Zero, ah & CPU_FLAG_ZERO != 0);
                self.set_flag_state(Flag::AuxCarry, ah & CPU_FLAG_AUX_CARRY != 0);
                self.set_flag_state(Flag::Parity, ah & CPU_FLAG_PARITY != 0);
                self.set_flag_state(Flag::Carry, ah & CPU_FLAG_CARRY != 0);
            }
            0x9F => {
                // LAHF: store the low flags byte into AH, reserved bits set
                let flags = (self.get_flags() & 0x00FF) as u8;
                self.set_register8(Register8::AH, flags);
            }
            0xA0 => {
                // MOV al, [offs8]
                let offset = self.fetch_u16();
                let segment = self.segment_override.unwrap_or(Segment::DS);
                let value = self.biu_read_u8(segment, offset);
                self.set_register8(Register8::AL, value);
            }
            0xA1 => {
                // MOV ax, [offs16]
                let offset = self.fetch_u16();
                let segment = self.segment_override.unwrap_or(Segment::DS);
                let value = self.biu_read_u16(segment, offset);
                self.set_register16(Register16::AX, value);
            }
            0xA2 => {
                // MOV [offs8], al
                let offset = self.fetch_u16();
                let segment = self.segment_override.unwrap_or(Segment::DS);
                let value = self.get_register8(Register8::AL);
                self.biu_write_u8(segment, offset, value);
            }
            0xA3 => {
                // MOV [offs16], ax
                let offset = self.fetch_u16();
                let segment = self.segment_override.unwrap_or(Segment::DS);
                let value = self.get_register16(Register16::AX);
                self.biu_write_u16(segment, offset, value);
            }
            0xA4 => self.rep_string_op(Mnemonic::MOVSB),
            0xA5 => self.rep_string_op(Mnemonic::MOVSW),
            0xA6 => self.rep_string_op(Mnemonic::CMPSB),
            0xA7 => self.rep_string_op(Mnemonic::CMPSW),
            0xA8 => {
                // TEST al, imm8
                let op1_value = self.get_register8(Register8::AL);
                let op2_value = self.fetch_u8();
                self.math_op8(Mnemonic::TEST, op1_value, op2_value);
            }
            0xA9 => {
                // TEST ax, imm16
                let op1_value = self.get_register16(Register16::AX);
                let op2_value = self.fetch_u16();
                self.math_op16(Mnemonic::TEST, op1_value, op2_value);
            }
            0xAA => self.rep_string_op(Mnemonic::STOSB),
            0xAB => self.rep_string_op(Mnemonic::STOSW),
            0xAC => self.rep_string_op(Mnemonic::LODSB),
            0xAD => self.rep_string_op(Mnemonic::LODSW),
            0xAE => self.rep_string_op(Mnemonic::SCASB),
            0xAF => self.rep_string_op(Mnemonic::SCASW),
            0xB0..=0xB7 => {
                // MOV r8, imm8
                let value = self.fetch_u8();
                self.set_register8(REGISTER8_LUT[(opcode & OPCODE_REGISTER_SELECT_MASK) as usize], value);
            }
            0xB8..=0xBF => {
                // MOV r16, imm16
                let value = self.fetch_u16();
                self.set_register16(REGISTER16_LUT[(opcode & OPCODE_REGISTER_SELECT_MASK) as usize], value);
            }
            0xC0 | 0xC2 => {
                // RETN imm16 (0xC0 aliases 0xC2 on stock 8086)
                let release = self.fetch_u16();
                self.near_return(release);
            }
            0xC1 | 0xC3 => {
                // RETN
                self.near_return(0);
            }
            0xC4 => {
                // LES r16, m16:16
                let modrm = ModRmByte::read(self);
                let (segment, offset) = self.read_rm_farptr(&modrm);
                self.set_register16(modrm.get_op2_reg16(), offset);
                self.set_register16(Register16::ES, segment);
            }
            0xC5 => {
                // LDS r16, m16:16
                let modrm = ModRmByte::read(self);
                let (segment, offset) = self.read_rm_farptr(&modrm);
                self.set_register16(modrm.get_op2_reg16(), offset);
                self.set_register16(Register16::DS, segment);
            }
            0xC6 => {
                // MOV r/m8, imm8
                let modrm = ModRmByte::read(self);
                let value = self.fetch_u8();
                self.write_rm8(&modrm, value);
            }
            0xC7 => {
                // MOV r/m16, imm16
                let modrm = ModRmByte::read(self);
                let value = self.fetch_u16();
                self.write_rm16(&modrm, value);
            }
            0xC8 | 0xCA => {
                // RETF imm16 (0xC8 aliases 0xCA on stock 8086)
                let release = self.fetch_u16();
                self.far_return(release);
            }
            0xC9 | 0xCB => {
                // RETF
                self.far_return(0);
            }
            0xCC => {
                // INT3
                self.sw_interrupt(3);
            }
            0xCD => {
                // INT imm8
                let vector = self.fetch_u8();
                self.sw_interrupt(vector);
            }
            0xCE => {
                // INTO
                if self.get_flag(Flag::Overflow) {
                    self.sw_interrupt(4);
                }
            }
            0xCF => {
                // IRET
                self.iret_routine();
            }
            0xD0 | 0xD1 => {
                // Group-2: shifts and rotates by 1
                let modrm = ModRmByte::read(self);
                let mnemonic = GROUP2_OPS[(modrm.get_op_extension() & 0x07) as usize];
                if opcode & 0x01 == 0 {
                    let operand = self.read_rm8(&modrm);
                    let result = self.bitshift_op8(mnemonic, operand, 1);
                    self.write_rm8(&modrm, result);
                }
                else {
                    let operand = self.read_rm16(&modrm);
                    let result = self.bitshift_op16(mnemonic, operand, 1);
                    self.write_rm16(&modrm, result);
                }
            }
            0xD2 | 0xD3 => {
                // Group-2: shifts and rotates by CL, count unmasked
                let modrm = ModRmByte::read(self);
                let mnemonic = GROUP2_OPS[(modrm.get_op_extension() & 0x07) as usize];
                let count = self.get_register8(Register8::CL);
                if opcode & 0x01 == 0 {
                    let operand = self.read_rm8(&modrm);
                    let result = self.bitshift_op8(mnemonic, operand, count);
                    self.write_rm8(&modrm, result);
                }
                else {
                    let operand = self.read_rm16(&modrm);
                    let result = self.bitshift_op16(mnemonic, operand, count);
                    self.write_rm16(&modrm, result);
                }
            }
            0xD4 => {
                // AAM imm8
                let imm8 = self.fetch_u8();
                if !self.aam(imm8) {
                    self.int0();
                }
            }
            0xD5 => {
                // AAD imm8
                let imm8 = self.fetch_u8();
                self.aad(imm8);
            }
            0xD6 => {
                // SALC (undocumented): AL = CF ? FF : 00
                let value = if self.get_flag(Flag::Carry) { 0xFF } else { 0x00 };
                self.set_register8(Register8::AL, value);
            }
            0xD7 => {
                // XLAT: al = [seg:bx + al]
                let segment = self.segment_override.unwrap_or(Segment::DS);
                let offset = self
                    .get_register16(Register16::BX)
                    .wrapping_add(self.get_register8(Register8::AL) as u16);
                let value = self.biu_read_u8(segment, offset);
                self.set_register8(Register8::AL, value);
            }
            0xD8..=0xDF => {
                // ESC: no x87 attached. Consume the modrm byte and any
                // displacement so the stream stays aligned, then do nothing.
                let _modrm = ModRmByte::read(self);
            }
            0xE0 => {
                // LOOPNE rel8
                let rel8 = self.fetch_i8();
                let cx = self.get_register16(Register16::CX).wrapping_sub(1);
                self.set_register16(Register16::CX, cx);
                if cx != 0 && !self.get_flag(Flag::Zero) {
                    self.reljmp(rel8 as i16);
                }
            }
            0xE1 => {
                // LOOPE rel8
                let rel8 = self.fetch_i8();
                let cx = self.get_register16(Register16::CX).wrapping_sub(1);
                self.set_register16(Register16::CX, cx);
                if cx != 0 && self.get_flag(Flag::Zero) {
                    self.reljmp(rel8 as i16);
                }
            }
            0xE2 => {
                // LOOP rel8
                let rel8 = self.fetch_i8();
                let cx = self.get_register16(Register16::CX).wrapping_sub(1);
                self.set_register16(Register16::CX, cx);
                if cx != 0 {
                    self.reljmp(rel8 as i16);
                }
            }
            0xE3 => {
                // JCXZ rel8
                let rel8 = self.fetch_i8();
                if self.get_register16(Register16::CX) == 0 {
                    self.reljmp(rel8 as i16);
                }
            }
            0xE4 => {
                // IN al, imm8: no port devices; the open bus reads as ones
                let _port = self.fetch_u8();
                self.set_register8(Register8::AL, 0xFF);
            }
            0xE5 => {
                // IN ax, imm8
                let _port = self.fetch_u8();
                self.set_register16(Register16::AX, 0xFFFF);
            }
            0xE6 | 0xE7 => {
                // OUT imm8, al/ax: the write is dropped
                let _port = self.fetch_u8();
            }
            0xE8 => {
                // CALL rel16
                let rel16 = self.fetch_u16() as i16;
                let new_ip = self.ip().wrapping_add(rel16 as u16);
                self.near_call(new_ip);
            }
            0xE9 => {
                // JMP rel16
                let rel16 = self.fetch_u16() as i16;
                self.reljmp(rel16);
            }
            0xEA => {
                // JMPF ptr16:16
                let new_ip = self.fetch_u16();
                let new_cs = self.fetch_u16();
                self.farjmp(new_cs, new_ip);
            }
            0xEB => {
                // JMP rel8
                let rel8 = self.fetch_i8();
                self.reljmp(rel8 as i16);
            }
            0xEC => {
                // IN al, dx
                self.set_register8(Register8::AL, 0xFF);
            }
            0xED => {
                // IN ax, dx
                self.set_register16(Register16::AX, 0xFFFF);
            }
            0xEE | 0xEF => {
                // OUT dx, al/ax: dropped
            }
            0xF0 => {
                // LOCK prefix: accepted, no bus arbitration to assert
                return ExecutionResult::Prefix;
            }
            0xF2 => {
                // REPNE prefix
                self.rep_type = RepType::Repne;
                return ExecutionResult::Prefix;
            }
            0xF3 => {
                // REP/REPE prefix
                self.rep_type = RepType::Repe;
                return ExecutionResult::Prefix;
            }
            0xF4 => {
                // HLT
                return ExecutionResult::Halt;
            }
            0xF5 => {
                // CMC
                let carry = self.get_flag(Flag::Carry);
                self.set_flag_state(Flag::Carry, !carry);
            }
            0xF6 => {
                // Group-3, 8-bit: TEST/NOT/NEG/MUL/IMUL/DIV/IDIV r/m8
                let modrm = ModRmByte::read(self);
                match modrm.get_op_extension() & 0x07 {
                    0 | 1 => {
                        // TEST r/m8, imm8; reg=1 aliases reg=0
                        let op1_value = self.read_rm8(&modrm);
                        let op2_value = self.fetch_u8();
                        self.math_op8(Mnemonic::TEST, op1_value, op2_value);
                    }
                    2 => {
                        let op1_value = self.read_rm8(&modrm);
                        let result = self.math_op8(Mnemonic::NOT, op1_value, 0);
                        self.write_rm8(&modrm, result);
                    }
                    3 => {
                        let op1_value = self.read_rm8(&modrm);
                        let result = self.math_op8(Mnemonic::NEG, op1_value, 0);
                        self.write_rm8(&modrm, result);
                    }
                    4 => {
                        let op1_value = self.read_rm8(&modrm);
                        self.multiply_u8(op1_value);
                    }
                    5 => {
                        let op1_value = self.read_rm8(&modrm);
                        self.multiply_i8(op1_value as i8);
                    }
                    6 => {
                        let op1_value = self.read_rm8(&modrm);
                        if !self.divide_u8(op1_value) {
                            self.int0();
                        }
                    }
                    _ => {
                        let op1_value = self.read_rm8(&modrm);
                        if !self.divide_i8(op1_value) {
                            self.int0();
                        }
                    }
                }
            }
            0xF7 => {
                // Group-3, 16-bit
                let modrm = ModRmByte::read(self);
                match modrm.get_op_extension() & 0x07 {
                    0 | 1 => {
                        let op1_value = self.read_rm16(&modrm);
                        let op2_value = self.fetch_u16();
                        self.math_op16(Mnemonic::TEST, op1_value, op2_value);
                    }
                    2 => {
                        let op1_value = self.read_rm16(&modrm);
                        let result = self.math_op16(Mnemonic::NOT, op1_value, 0);
                        self.write_rm16(&modrm, result);
                    }
                    3 => {
                        let op1_value = self.read_rm16(&modrm);
                        let result = self.math_op16(Mnemonic::NEG, op1_value, 0);
                        self.write_rm16(&modrm, result);
                    }
                    4 => {
                        let op1_value = self.read_rm16(&modrm);
                        self.multiply_u16(op1_value);
                    }
                    5 => {
                        let op1_value = self.read_rm16(&modrm);
                        self.multiply_i16(op1_value as i16);
                    }
                    6 => {
                        let op1_value = self.read_rm16(&modrm);
                        if !self.divide_u16(op1_value) {
                            self.int0();
                        }
                    }
                    _ => {
                        let op1_value = self.read_rm16(&modrm);
                        if !self.divide_i16(op1_value) {
                            self.int0();
                        }
                    }
                }
            }
            0xF8 => self.clear_flag(Flag::Carry),
            0xF9 => self.set_flag(Flag::Carry),
            0xFA => self.clear_flag(Flag::Interrupt),
            0xFB => self.set_flag(Flag::Interrupt),
            0xFC => self.clear_flag(Flag::Direction),
            0xFD => self.set_flag(Flag::Direction),
            0xFE => {
                // Group-4: INC/DEC r/m8. Other encodings are undefined.
                let modrm = ModRmByte::read(self);
                match modrm.get_op_extension() & 0x07 {
                    0 => {
                        let op1_value = self.read_rm8(&modrm);
                        let result = self.math_op8(Mnemonic::INC, op1_value, 0);
                        self.write_rm8(&modrm, result);
                    }
                    1 => {
                        let op1_value = self.read_rm8(&modrm);
                        let result = self.math_op8(Mnemonic::DEC, op1_value, 0);
                        self.write_rm8(&modrm, result);
                    }
                    ext => {
                        log::trace!("Undefined group-4 extension {} executed as no-op", ext);
                    }
                }
            }
            0xFF => {
                // Group-5: INC/DEC/CALL/CALLF/JMP/JMPF/PUSH r/m16
                let modrm = ModRmByte::read(self);
                match modrm.get_op_extension() & 0x07 {
                    0 => {
                        let op1_value = self.read_rm16(&modrm);
                        let result = self.math_op16(Mnemonic::INC, op1_value, 0);
                        self.write_rm16(&modrm, result);
                    }
                    1 => {
                        let op1_value = self.read_rm16(&modrm);
                        let result = self.math_op16(Mnemonic::DEC, op1_value, 0);
                        self.write_rm16(&modrm, result);
                    }
                    2 => {
                        // CALL near indirect
                        let new_ip = self.read_rm16(&modrm);
                        self.near_call(new_ip);
                    }
                    3 => {
                        // CALLF indirect
                        let (new_cs, new_ip) = self.read_rm_farptr(&modrm);
                        self.farcall(new_cs, new_ip);
                    }
                    4 => {
                        // JMP near indirect
                        let new_ip = self.read_rm16(&modrm);
                        self.set_ip(new_ip);
                    }
                    5 => {
                        // JMPF indirect
                        let (new_cs, new_ip) = self.read_rm_farptr(&modrm);
                        self.farjmp(new_cs, new_ip);
                    }
                    _ => {
                        // PUSH r/m16; reg=7 aliases reg=6
                        let value = self.read_rm16(&modrm);
                        self.push_u16(value);
                    }
                }
            }
            _ => {
                // Undefined opcode (0xF1). The 8086 attempts some decode
                // with indeterminate effect; the benign reading is a no-op.
                log::trace!("Undefined opcode {:02X} executed as no-op", opcode);
            }
        }

        ExecutionResult::Okay
    }
}
