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

    coreconfig.rs

    Host-supplied core configuration. Frontends deserialize this from their
    own configuration format and hand it to Intel8086::from_config().

*/

use serde::Deserialize;

#[derive(Copy, Clone, Debug, Deserialize)]
pub struct CpuConfig {
    /// Initial CS:IP. Defaults to 0000:0000.
    #[serde(default)]
    pub reset_cs: u16,
    #[serde(default)]
    pub reset_ip: u16,
    /// Halt after a run of consecutive 0x00 opcodes. A long run of ADD
    /// [BX+SI],AL almost always means execution fell into zeroed memory.
    #[serde(default)]
    pub off_rails_detection: bool,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            reset_cs: 0,
            reset_ip: 0,
            off_rails_detection: false,
        }
    }
}
