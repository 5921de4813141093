//! Abstract x86-64 assembly and its machine encoder.
//!
//! This crate models a small slice of the x86-64 instruction set as plain
//! values ([`Instruction`](struct.Instruction.html) = opcode tag + operand
//! list) and lowers sequences of them to raw machine code bytes with
//! [`encode`](fn.encode.html).
//!
//! The encoder is deliberately table-driven and two-pass:
//!
//! 1. Pass one walks the instructions in order, emitting prefix bytes
//!    (segment override, `0x66` operand size, SSE mandatory prefixes,
//!    REX), opcode, ModR/M, SIB, displacement and immediates. `LABEL`
//!    pseudo-instructions record the current byte offset; control-flow
//!    instructions that target a label emit a 4-byte placeholder.
//! 2. Pass two patches each placeholder with the little-endian
//!    `rel32 = label_offset - (placeholder_offset + 4)`.
//!
//! Supported operand shapes are exactly what a stack-machine code
//! generator needs: register/register and register/immediate forms for
//! the ALU block, register/memory moves over the full addressing-mode
//! grammar (`[base]`, `[base + disp]`, `[base + index * scale + disp]`,
//! absolute), stack pushes and pops, near jumps and calls (relative and
//! indirect), `SETcc`/`CMOVcc`, and the SSE2 scalar-double set with the
//! `MOVQ` GPR↔XMM transports.
//!
//! Anything outside the supported surface is a hard
//! [`EncodeError`](enum.EncodeError.html), never a silent fallback:
//! unknown operand combinations, mismatched operand widths, scales other
//! than 1/2/4/8, high byte registers in REX contexts, and unresolved or
//! unpatchable labels.

mod code;
mod encoder;
mod error;
mod instruction;
mod operand;
mod register;

#[cfg(test)]
mod test;

pub use code::CodeBuffer;
pub use encoder::{encode, LabelMap};
pub use error::EncodeError;
pub use instruction::{Instruction, Op};
pub use operand::{absolute, at, at_disp, indexed, Mem, Operand, Segment};
pub use register::{Reg, Width};
