use super::Registry;
use crate::abi;
use crate::commands::OilCommand;
use crate::databuf::{SPILLED_GPRS, SPILLED_XMMS};
use crate::trampoline::{CalledOp, ComplexOpHandler};
use oasm::Reg::*;
use oasm::{asm_seq, at_disp, Instruction, Op, Operand};

/// Commands that lower to a host trampoline call, with their operation
/// codes.
const TRAMPOLINE_COMMANDS: [(OilCommand, CalledOp); 54] = [
    (OilCommand::FloatSqrt, CalledOp::FloatSqrt),
    (OilCommand::Print, CalledOp::Print),
    (OilCommand::PrintLine, CalledOp::PrintLine),
    (OilCommand::ReadLine, CalledOp::ReadLine),
    (OilCommand::ReadChar, CalledOp::ReadChar),
    (OilCommand::ReadInt, CalledOp::ReadInt),
    (OilCommand::ReadFloat, CalledOp::ReadFloat),
    (OilCommand::StringConcat, CalledOp::StringConcat),
    (OilCommand::StringLength, CalledOp::StringLength),
    (OilCommand::StringSubstring, CalledOp::StringSubstring),
    (OilCommand::StringCompare, CalledOp::StringCompare),
    (OilCommand::StringToInt, CalledOp::StringToInt),
    (OilCommand::StringToFloat, CalledOp::StringToFloat),
    (OilCommand::IntToString, CalledOp::IntToString),
    (OilCommand::FloatToString, CalledOp::FloatToString),
    (OilCommand::UnixTime, CalledOp::UnixTime),
    (OilCommand::UnixTimeMs, CalledOp::UnixTimeMs),
    (OilCommand::UnixTimeNs, CalledOp::UnixTimeNs),
    (OilCommand::NanoTime, CalledOp::NanoTime),
    (OilCommand::FormatDateTime, CalledOp::FormatDateTime),
    (OilCommand::ParseDateTime, CalledOp::ParseDateTime),
    (OilCommand::FileExists, CalledOp::FileExists),
    (OilCommand::DirectoryExists, CalledOp::DirectoryExists),
    (OilCommand::CreateDir, CalledOp::CreateDir),
    (OilCommand::DeleteFileByName, CalledOp::DeleteFileByName),
    (OilCommand::DeleteDir, CalledOp::DeleteDir),
    (OilCommand::MoveFileByName, CalledOp::MoveFileByName),
    (OilCommand::CopyFileByName, CalledOp::CopyFileByName),
    (OilCommand::ListDir, CalledOp::ListDir),
    (OilCommand::GetCurrentDir, CalledOp::GetCurrentDir),
    (OilCommand::ChangeDir, CalledOp::ChangeDir),
    (OilCommand::SleepMs, CalledOp::SleepMs),
    (OilCommand::SleepNs, CalledOp::SleepNs),
    (OilCommand::Exit, CalledOp::Exit),
    (OilCommand::GetProcessId, CalledOp::GetProcessId),
    (OilCommand::GetEnvironmentVar, CalledOp::GetEnvironmentVar),
    (OilCommand::SetEnvironmentVar, CalledOp::SetEnvironmentVar),
    (OilCommand::Random, CalledOp::Random),
    (OilCommand::RandomRange, CalledOp::RandomRange),
    (OilCommand::RandomFloat, CalledOp::RandomFloat),
    (OilCommand::RandomFloatRange, CalledOp::RandomFloatRange),
    (OilCommand::SeedRandom, CalledOp::SeedRandom),
    (OilCommand::GetMemoryUsage, CalledOp::GetMemoryUsage),
    (OilCommand::GetPeakMemoryUsage, CalledOp::GetPeakMemoryUsage),
    (
        OilCommand::ForceGarbageCollection,
        CalledOp::ForceGarbageCollection,
    ),
    (OilCommand::GetProcessorCount, CalledOp::GetProcessorCount),
    (OilCommand::GetOsName, CalledOp::GetOsName),
    (OilCommand::GetOsVersion, CalledOp::GetOsVersion),
    (OilCommand::GetArchitecture, CalledOp::GetArchitecture),
    (OilCommand::GetUsername, CalledOp::GetUsername),
    (OilCommand::GetHomeDir, CalledOp::GetHomeDir),
    (OilCommand::TypeOf, CalledOp::TypeOf),
    (OilCommand::Interop, CalledOp::Interop),
    (OilCommand::Unwrap, CalledOp::Unwrap),
];

pub(super) fn register(registry: &mut Registry, handler: ComplexOpHandler) {
    for (command, op) in TRAMPOLINE_COMMANDS.iter() {
        registry.insert(*command, operation_caller(*op, handler));
    }
}

/// The save-call-restore bracket around one host operation.
///
/// Result slots are reserved before anything else: a callee must never
/// write below the stack pointer it receives, so slots the operation
/// will fill have to exist above it. The operand-stack top is latched
/// into the first argument register before re-alignment; the handler
/// returns the stack top to install, which also discards the alignment
/// pad and any shadow space.
pub fn operation_caller(op: CalledOp, handler: ComplexOpHandler) -> Vec<Instruction> {
    let host = &abi::HOST;
    let (_, pushes) = op.stack_effect();
    let mut seq = Vec::new();

    if pushes > 0 {
        seq.extend(asm_seq![
            SUB RSP, (8 * pushes as i64);
        ]);
    }

    for (reg, offset) in SPILLED_GPRS.iter() {
        seq.push(Instruction::new(
            Op::MOV,
            vec![
                Operand::Mem(at_disp(R14, *offset)),
                Operand::Reg(*reg),
            ],
        ));
    }
    if host.spills_xmm {
        for (reg, offset) in SPILLED_XMMS.iter() {
            seq.push(Instruction::new(
                Op::MOVQ,
                vec![
                    Operand::Mem(at_disp(R14, *offset)),
                    Operand::Reg(*reg),
                ],
            ));
        }
    }

    seq.push(Instruction::new(
        Op::MOV,
        vec![Operand::Reg(host.arg0), Operand::Reg(RSP)],
    ));
    seq.push(Instruction::new(
        Op::MOV,
        vec![Operand::Reg(host.arg1), Operand::Imm(op as i64)],
    ));

    if host.shadow_space != 0 {
        seq.extend(asm_seq![
            SUB RSP, host.shadow_space;
        ]);
    } else {
        seq.extend(asm_seq![
            MOV RAX, RSP;
            AND RAX, 8;
            SUB RSP, RAX;
        ]);
    }

    seq.push(Instruction::new(
        Op::MOV,
        vec![
            Operand::Reg(RAX),
            Operand::UImm(handler as usize as u64),
        ],
    ));
    seq.extend(asm_seq![
        CALL RAX;
        MOV RSP, RAX;
    ]);

    if host.spills_xmm {
        for (reg, offset) in SPILLED_XMMS.iter().rev() {
            seq.push(Instruction::new(
                Op::MOVQ,
                vec![
                    Operand::Reg(*reg),
                    Operand::Mem(at_disp(R14, *offset)),
                ],
            ));
        }
    }
    for (reg, offset) in SPILLED_GPRS.iter().rev() {
        seq.push(Instruction::new(
            Op::MOV,
            vec![
                Operand::Reg(*reg),
                Operand::Mem(at_disp(R14, *offset)),
            ],
        ));
    }

    seq
}
