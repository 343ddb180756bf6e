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

    cpu_8086::mnemonic.rs

    Defines the mnemonic enum. Only operations that are dispatched through a
    table (the ALU group, the shift/rotate group, group-3 and the string ops)
    need a tag; everything else is handled by its own opcode arm.

*/

#[derive(PartialEq, Copy, Clone, Debug)]
pub enum Mnemonic {
    ADD,
    OR,
    ADC,
    SBB,
    AND,
    SUB,
    XOR,
    CMP,
    TEST,
    NOT,
    NEG,
    INC,
    DEC,
    ROL,
    ROR,
    RCL,
    RCR,
    SHL,
    SHR,
    SETMO,
    SAR,
    MOVSB,
    MOVSW,
    CMPSB,
    CMPSW,
    STOSB,
    STOSW,
    LODSB,
    LODSW,
    SCASB,
    SCASW,
}
