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

    cpu_8086::addressing.rs

    Implements effective address calculation and the rm operand read/write
    layer that dispatches register vs. memory on the mod field.

*/

use crate::{
    cpu_8086::{modrm::ModRmByte, *},
    cpu_common::{AddressingMode, Segment},
};

#[rustfmt::skip]
impl Intel8086 {
    /// Calculate the effective address for the given AddressingMode.
    /// Addressing modes that reference BP use the stack segment instead of
    /// the data segment unless a segment override is present.
    pub fn calc_effective_address(
        &mut self,
        mode: AddressingMode,
        segment_override: Option<Segment>,
    ) -> (Segment, u16) {
        let segment_base_ds = segment_override.unwrap_or(Segment::DS);
        let segment_base_ss = segment_override.unwrap_or(Segment::SS);

        let bx = self.get_register16(Register16::BX);
        let bp = self.get_register16(Register16::BP);
        let si = self.get_register16(Register16::SI);
        let di = self.get_register16(Register16::DI);

        // All of this relies on 2's complement arithmetic for signed displacements
        let (segment, offset) = match mode {
            AddressingMode::BxSi               => (segment_base_ds, bx.wrapping_add(si)),
            AddressingMode::BxDi               => (segment_base_ds, bx.wrapping_add(di)),
            AddressingMode::BpSi               => (segment_base_ss, bp.wrapping_add(si)),
            AddressingMode::BpDi               => (segment_base_ss, bp.wrapping_add(di)),
            AddressingMode::Si                 => (segment_base_ds, si),
            AddressingMode::Di                 => (segment_base_ds, di),
            AddressingMode::Disp16(disp16)     => (segment_base_ds, disp16.get_u16()),
            AddressingMode::Bx                 => (segment_base_ds, bx),

            AddressingMode::BxSiDisp8(disp8)   => (segment_base_ds, bx.wrapping_add(si.wrapping_add(disp8.get_u16()))),
            AddressingMode::BxDiDisp8(disp8)   => (segment_base_ds, bx.wrapping_add(di.wrapping_add(disp8.get_u16()))),
            AddressingMode::BpSiDisp8(disp8)   => (segment_base_ss, bp.wrapping_add(si.wrapping_add(disp8.get_u16()))),
            AddressingMode::BpDiDisp8(disp8)   => (segment_base_ss, bp.wrapping_add(di.wrapping_add(disp8.get_u16()))),
            AddressingMode::SiDisp8(disp8)     => (segment_base_ds, si.wrapping_add(disp8.get_u16())),
            AddressingMode::DiDisp8(disp8)     => (segment_base_ds, di.wrapping_add(disp8.get_u16())),
            AddressingMode::BpDisp8(disp8)     => (segment_base_ss, bp.wrapping_add(disp8.get_u16())),
            AddressingMode::BxDisp8(disp8)     => (segment_base_ds, bx.wrapping_add(disp8.get_u16())),

            AddressingMode::BxSiDisp16(disp16) => (segment_base_ds, bx.wrapping_add(si.wrapping_add(disp16.get_u16()))),
            AddressingMode::BxDiDisp16(disp16) => (segment_base_ds, bx.wrapping_add(di.wrapping_add(disp16.get_u16()))),
            AddressingMode::BpSiDisp16(disp16) => (segment_base_ss, bp.wrapping_add(si.wrapping_add(disp16.get_u16()))),
            AddressingMode::BpDiDisp16(disp16) => (segment_base_ss, bp.wrapping_add(di.wrapping_add(disp16.get_u16()))),
            AddressingMode::SiDisp16(disp16)   => (segment_base_ds, si.wrapping_add(disp16.get_u16())),
            AddressingMode::DiDisp16(disp16)   => (segment_base_ds, di.wrapping_add(disp16.get_u16())),
            AddressingMode::BpDisp16(disp16)   => (segment_base_ss, bp.wrapping_add(disp16.get_u16())),
            AddressingMode::BxDisp16(disp16)   => (segment_base_ds, bx.wrapping_add(disp16.get_u16())),

            // Register operands never reach EA calculation; the rm layer
            // dispatches on mod first. Fall back to the last computed EA.
            AddressingMode::RegisterMode       => (segment_base_ds, self.last_ea),
        };

        // Save the EA offset; the illegal register forms of LEA/LES/LDS read
        // through whatever was computed last.
        self.last_ea = offset;
        (segment, offset)
    }

    /// Resolve the EA offset for LEA. LEA ignores segment overrides (no
    /// memory access takes place); the register form is illegal and yields
    /// the last computed EA.
    pub fn load_effective_address(&mut self, modrm: &ModRmByte) -> u16 {
        if modrm.is_register_mode() {
            return self.last_ea;
        }
        let (_, offset) = self.calc_effective_address(modrm.get_addressing_mode(), None);
        offset
    }
}

impl Intel8086 {
    /* ----------------------- rm operand read/write ----------------------- */

    pub fn read_rm8(&mut self, modrm: &ModRmByte) -> u8 {
        if modrm.is_register_mode() {
            self.get_register8(modrm.get_op1_reg8())
        }
        else {
            let (segment, offset) =
                self.calc_effective_address(modrm.get_addressing_mode(), self.segment_override);
            self.biu_read_u8(segment, offset)
        }
    }

    pub fn write_rm8(&mut self, modrm: &ModRmByte, value: u8) {
        if modrm.is_register_mode() {
            self.set_register8(modrm.get_op1_reg8(), value);
        }
        else {
            let (segment, offset) =
                self.calc_effective_address(modrm.get_addressing_mode(), self.segment_override);
            self.biu_write_u8(segment, offset, value);
        }
    }

    pub fn read_rm16(&mut self, modrm: &ModRmByte) -> u16 {
        if modrm.is_register_mode() {
            self.get_register16(modrm.get_op1_reg16())
        }
        else {
            let (segment, offset) =
                self.calc_effective_address(modrm.get_addressing_mode(), self.segment_override);
            self.biu_read_u16(segment, offset)
        }
    }

    pub fn write_rm16(&mut self, modrm: &ModRmByte, value: u16) {
        if modrm.is_register_mode() {
            self.set_register16(modrm.get_op1_reg16(), value);
        }
        else {
            let (segment, offset) =
                self.calc_effective_address(modrm.get_addressing_mode(), self.segment_override);
            self.biu_write_u16(segment, offset, value);
        }
    }

    /// Load a far pointer (offset word, then segment word) through an rm
    /// operand. The register form is illegal on the 8086 and reads through
    /// the last computed EA instead.
    pub fn read_rm_farptr(&mut self, modrm: &ModRmByte) -> (u16, u16) {
        if modrm.is_register_mode() {
            let segment = self.segment_override.unwrap_or(Segment::DS);
            let offset = self.biu_read_u16(segment, self.last_ea);
            let segment_part = self.biu_read_u16(segment, self.last_ea.wrapping_add(2));
            (segment_part, offset)
        }
        else {
            let (segment, ea) =
                self.calc_effective_address(modrm.get_addressing_mode(), self.segment_override);
            let offset = self.biu_read_u16(segment, ea);
            let segment_part = self.biu_read_u16(segment, ea.wrapping_add(2));
            (segment_part, offset)
        }
    }
}
