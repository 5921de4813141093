use super::Registry;
use crate::commands::OilCommand;
use oasm::Reg::*;
use oasm::{asm_seq, Instruction, Op, Operand};

/// Binary float arithmetic: both operands travel through `RAX` as bit
/// patterns, compute in `XMM0`/`XMM1`, result goes back as a pattern.
fn binary(op: Op) -> Vec<Instruction> {
    let mut seq = asm_seq![
        POP RAX;
        MOVQ XMM1, RAX;
        POP RAX;
        MOVQ XMM0, RAX;
    ];
    seq.push(Instruction::new(
        op,
        vec![Operand::Reg(XMM0), Operand::Reg(XMM1)],
    ));
    seq.extend(asm_seq![
        MOVQ RAX, XMM0;
        PUSH RAX;
    ]);
    seq
}

/// Float comparisons use `UCOMISD`, which sets the unsigned condition
/// flags, so the `SETcc` tail uses below/above forms.
fn comparison(set: Op) -> Vec<Instruction> {
    let mut seq = asm_seq![
        POP RAX;
        MOVQ XMM1, RAX;
        POP RAX;
        MOVQ XMM0, RAX;
        UCOMISD XMM0, XMM1;
        MOV RAX, 0;
    ];
    seq.push(Instruction::new(set, vec![Operand::Reg(AL)]));
    seq.extend(asm_seq![
        MOVZX RAX, AL;
        PUSH RAX;
    ]);
    seq
}

pub(super) fn register(registry: &mut Registry) {
    registry.insert(OilCommand::FloatAdd, binary(Op::ADDSD));
    registry.insert(OilCommand::FloatSubtract, binary(Op::SUBSD));
    registry.insert(OilCommand::FloatMultiply, binary(Op::MULSD));
    registry.insert(OilCommand::FloatDivide, binary(Op::DIVSD));

    // 0.0 - x; avoids materializing a sign-bit constant.
    registry.insert(
        OilCommand::FloatNegate,
        asm_seq![
            POP RAX;
            MOVQ XMM0, RAX;
            XORPD XMM1, XMM1;
            SUBSD XMM1, XMM0;
            MOVQ RAX, XMM1;
            PUSH RAX;
        ],
    );

    registry.insert(OilCommand::FloatEqual, comparison(Op::SETZ));
    registry.insert(OilCommand::FloatNotEqual, comparison(Op::SETNZ));
    registry.insert(OilCommand::FloatLessThan, comparison(Op::SETB));
    registry.insert(OilCommand::FloatLessEqual, comparison(Op::SETBE));
    registry.insert(OilCommand::FloatGreaterThan, comparison(Op::SETNBE));
    registry.insert(OilCommand::FloatGreaterEqual, comparison(Op::SETNB));
}
