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

    cpu_common::mod.rs

    Definitions common to any CPU model: register and segment selectors,
    addressing modes, displacement values, and the linear address rule.

*/

pub mod alu;

/// 8-bit register selectors in instruction encoding order. Note that the
/// encoding interleaves low and high halves: 0..=3 select the low bytes of
/// AX,CX,DX,BX and 4..=7 select the high bytes of the same registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register8 {
    AL,
    CL,
    DL,
    BL,
    AH,
    CH,
    DH,
    BH,
}

/// 16-bit register selectors. 0..=7 match the instruction encoding order;
/// the segment registers follow in their own encoding order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register16 {
    AX,
    CX,
    DX,
    BX,
    SP,
    BP,
    SI,
    DI,
    ES,
    CS,
    SS,
    DS,
}

/// Segment selector for a memory access. `None` addresses physical memory
/// directly with a segment base of zero (used for IVT reads).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    None,
    ES,
    CS,
    SS,
    DS,
}

/// A ModR/M displacement, already fetched and resolved. Addressing modes
/// without a displacement simply carry none.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Displacement {
    Disp8(i8),
    Disp16(i16),
}

impl Displacement {
    /// Return the displacement as an unsigned 16-bit addend. 8-bit
    /// displacements sign-extend; two's complement arithmetic then makes
    /// wrapping_add do the right thing for negative offsets.
    #[inline]
    pub fn get_u16(&self) -> u16 {
        match self {
            Displacement::Disp8(disp8) => *disp8 as i16 as u16,
            Displacement::Disp16(disp16) => *disp16 as u16,
        }
    }
}

/// The effective-address forms selectable by a ModR/M byte. The rm field
/// picks the base expression; mod picks the displacement width. mod=00/rm=6
/// is the direct-address exception (no base register at all).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AddressingMode {
    BxSi,
    BxDi,
    BpSi,
    BpDi,
    Si,
    Di,
    Disp16(Displacement),
    Bx,
    BxSiDisp8(Displacement),
    BxDiDisp8(Displacement),
    BpSiDisp8(Displacement),
    BpDiDisp8(Displacement),
    SiDisp8(Displacement),
    DiDisp8(Displacement),
    BpDisp8(Displacement),
    BxDisp8(Displacement),
    BxSiDisp16(Displacement),
    BxDiDisp16(Displacement),
    BpSiDisp16(Displacement),
    BpDiDisp16(Displacement),
    SiDisp16(Displacement),
    DiDisp16(Displacement),
    BpDisp16(Displacement),
    BxDisp16(Displacement),
    RegisterMode,
}

/// Outcome of a single dispatched opcode.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ExecutionResult {
    /// An instruction retired normally.
    Okay,
    /// A prefix byte was consumed; transient prefix state is latched and the
    /// instruction budget is not charged.
    Prefix,
    /// HLT retired; the execution loop stops until the host intervenes.
    Halt,
}

/// Linear address rule: segment shifted left four, plus offset, truncated
/// to the 20-bit physical bus. The truncation reproduces the 1 MiB address
/// wrap that real-mode programs can rely on.
#[inline]
pub fn calc_linear_address(segment: u16, offset: u16) -> u32 {
    (((segment as u32) << 4) + offset as u32) & 0xFFFFFu32
}
