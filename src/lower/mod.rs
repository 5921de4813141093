//! Expansion of OIL commands into abstract x86-64 instruction sequences.
//!
//! Every operation follows one stack-machine convention: operands are
//! popped off the hardware stack (right operand first) and the result is
//! pushed back. Booleans live as zero-extended bytes in full 64-bit
//! slots; floats travel as `u64` bit patterns and are moved through
//! `XMM0`/`XMM1` for arithmetic.

mod boolean;
mod byte;
mod complex;
mod convert;
mod float;
mod integer;
mod locals;
mod stack;

pub use self::complex::operation_caller;

use std::collections::HashMap;
use std::ffi::CString;
use std::sync::Mutex;

use oasm::Reg::*;
use oasm::{asm_seq, at, at_disp, indexed, Instruction, Op, Operand, Reg};

use crate::abi;
use crate::commands::{OilCommand, PackedCommand};
use crate::databuf::{RESULT_OFFSET, RSP_OFFSET};
use crate::error::LowerError;
use crate::trampoline::{complex_op_handler, ComplexOpHandler};

pub(crate) type Registry = HashMap<OilCommand, Vec<Instruction>>;

/// Owns the command registry and the interned string pool.
///
/// The registry is built once (per factory, not per process) and is
/// read-only afterwards; one `Lowerer` serves any number of
/// compilations concurrently.
pub struct Lowerer {
    registry: Registry,
    strings: Mutex<Vec<CString>>,
}

impl Lowerer {
    pub fn new() -> Lowerer {
        Lowerer::with_handler(complex_op_handler)
    }

    /// Builds a lowerer whose trampolines call `handler` for complex
    /// operations.
    pub fn with_handler(handler: ComplexOpHandler) -> Lowerer {
        let mut registry = Registry::new();
        stack::register(&mut registry);
        integer::register(&mut registry);
        float::register(&mut registry);
        byte::register(&mut registry);
        boolean::register(&mut registry);
        convert::register(&mut registry);
        locals::register(&mut registry);
        complex::register(&mut registry, handler);
        Lowerer {
            registry,
            strings: Mutex::new(Vec::new()),
        }
    }

    /// The registered expansion of a command, for commands lowered
    /// purely through the registry.
    pub fn expansion(&self, command: OilCommand) -> Option<&[Instruction]> {
        self.registry.get(&command).map(|seq| &seq[..])
    }

    /// Expands a packed OIL body into one instruction sequence bracketed
    /// by the function prologue and epilogue.
    pub fn lower(&self, body: &[PackedCommand]) -> Result<Vec<Instruction>, LowerError> {
        let mut labels = LabelAllocator::default();
        let mut out = prologue();
        for packed in body {
            self.command(packed, &mut out, &mut labels)?;
        }
        epilogue(&mut out, &mut labels);
        Ok(out)
    }

    fn command(
        &self,
        packed: &PackedCommand,
        out: &mut Vec<Instruction>,
        labels: &mut LabelAllocator,
    ) -> Result<(), LowerError> {
        use crate::commands::OilCommand::*;

        match packed.command {
            PushInt => push_immediate(out, parse_int(packed)? as u64),
            PushFloat => push_immediate(out, parse_float(packed)?.to_bits()),
            PushBool => push_immediate(out, parse_bool(packed)? as u64),
            PushChar => push_immediate(out, u64::from(parse_char(packed)? as u32)),
            PushByte => push_immediate(out, u64::from(parse_byte(packed)?)),
            PushString => {
                let address = self.intern(packed)?;
                push_immediate(out, address);
            }
            LoadLocal | SetLocal => {
                let slot = parse_slot(packed)?;
                out.push(Instruction::new(
                    Op::MOV,
                    vec![Operand::Reg(Reg::R11), Operand::UImm(slot)],
                ));
                self.registered(packed.command, out)?;
            }
            Rotate => rotate(out, labels, parse_slot(packed)?),
            Return => return_sequence(out),
            command => self.registered(command, out)?,
        }
        Ok(())
    }

    fn registered(&self, command: OilCommand, out: &mut Vec<Instruction>) -> Result<(), LowerError> {
        let seq = self
            .registry
            .get(&command)
            .ok_or(LowerError::UnsupportedCommand(command))?;
        out.extend_from_slice(seq);
        Ok(())
    }

    /// Interns a string literal as a NUL-terminated C string owned by
    /// this lowerer and returns its address.
    fn intern(&self, packed: &PackedCommand) -> Result<u64, LowerError> {
        let text = argument(packed)?;
        let interned = CString::new(text)
            .map_err(|_| LowerError::InvalidArgument(packed.command, text.to_owned()))?;
        let address = interned.as_ptr() as u64;
        let mut pool = match self.strings.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        pool.push(interned);
        Ok(address)
    }
}

impl Default for Lowerer {
    fn default() -> Lowerer {
        Lowerer::new()
    }
}

#[derive(Default)]
struct LabelAllocator {
    next: usize,
}

impl LabelAllocator {
    fn fresh(&mut self, stem: &str) -> String {
        let label = format!(".{}_{}", stem, self.next);
        self.next += 1;
        label
    }
}

/// Captures the data buffer and locals array pointers and parks the
/// entry stack pointer so the epilogue can restore it unconditionally.
/// `RBX`, `R13` and `R14` are callee-saved in both supported ABIs and
/// get clobbered below, so they are preserved first.
fn prologue() -> Vec<Instruction> {
    let host = &abi::HOST;
    asm_seq![
        PUSH RBX;
        PUSH R13;
        PUSH R14;
        MOV R14, host.arg0;
        MOV R13, host.arg2;
        MOV at_disp(R14, RSP_OFFSET), RSP;
    ]
}

/// If the operand stack is non-empty at exit, its top becomes the
/// function result.
fn epilogue(out: &mut Vec<Instruction>, labels: &mut LabelAllocator) {
    let done = labels.fresh("exit");
    out.extend(asm_seq![
        MOV RBX, at_disp(R14, RSP_OFFSET);
        CMP RSP, RBX;
        JE done.clone();
        POP RAX;
        MOV at_disp(R14, RESULT_OFFSET), RAX;
        LABEL done;
        MOV RSP, at_disp(R14, RSP_OFFSET);
        POP R14;
        POP R13;
        POP RBX;
        RET;
    ]);
}

fn return_sequence(out: &mut Vec<Instruction>) {
    out.extend(asm_seq![
        POP RAX;
        MOV at_disp(R14, RESULT_OFFSET), RAX;
        MOV RSP, at_disp(R14, RSP_OFFSET);
        POP R14;
        POP R13;
        POP RBX;
        RET;
    ]);
}

fn push_immediate(out: &mut Vec<Instruction>, value: u64) {
    out.extend(asm_seq![
        MOV RAX, value;
        PUSH RAX;
    ]);
}

/// Moves the stack top to depth `n - 1` and shifts the slots between up
/// by one. Labels are allocated per occurrence.
fn rotate(out: &mut Vec<Instruction>, labels: &mut LabelAllocator, n: u64) {
    if n < 2 {
        return;
    }
    let again = labels.fresh("rotate");
    let done = labels.fresh("rotate_done");
    out.extend(asm_seq![
        MOV RAX, at(RSP);
        MOV RDX, (n as i64 - 1);
        MOV RCX, 0;
        LABEL again.clone();
        CMP RCX, RDX;
        JE done.clone();
        MOV RBX, indexed(RSP, RCX, 8, 8);
        MOV indexed(RSP, RCX, 8, 0), RBX;
        INC RCX;
        JMP again;
        LABEL done;
        MOV indexed(RSP, RDX, 8, 0), RAX;
    ]);
}

fn argument(packed: &PackedCommand) -> Result<&str, LowerError> {
    packed
        .arguments
        .first()
        .map(String::as_str)
        .ok_or_else(|| LowerError::InvalidArgument(packed.command, String::new()))
}

fn invalid(packed: &PackedCommand, text: &str) -> LowerError {
    LowerError::InvalidArgument(packed.command, text.to_owned())
}

fn parse_int(packed: &PackedCommand) -> Result<i64, LowerError> {
    let text = argument(packed)?;
    text.parse().map_err(|_| invalid(packed, text))
}

fn parse_float(packed: &PackedCommand) -> Result<f64, LowerError> {
    let text = argument(packed)?;
    text.parse().map_err(|_| invalid(packed, text))
}

fn parse_bool(packed: &PackedCommand) -> Result<bool, LowerError> {
    let text = argument(packed)?;
    match text {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(invalid(packed, text)),
    }
}

fn parse_char(packed: &PackedCommand) -> Result<char, LowerError> {
    let text = argument(packed)?;
    let bare = text.trim_matches('\'');
    let mut chars = bare.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(invalid(packed, text)),
    }
}

fn parse_byte(packed: &PackedCommand) -> Result<u8, LowerError> {
    let text = argument(packed)?;
    text.parse().map_err(|_| invalid(packed, text))
}

fn parse_slot(packed: &PackedCommand) -> Result<u64, LowerError> {
    let text = argument(packed)?;
    text.parse().map_err(|_| invalid(packed, text))
}
