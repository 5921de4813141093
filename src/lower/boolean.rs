use super::Registry;
use crate::commands::OilCommand;
use oasm::Reg::*;
use oasm::{asm_seq, Instruction, Op, Operand};

/// Normalizes both operands to 0/1 before combining, so any non-zero
/// encoding of `true` behaves the same.
fn combine(op: Op) -> Vec<Instruction> {
    let mut seq = asm_seq![
        POP RBX;
        POP RAX;
        TEST RAX, RAX;
        SETNZ AL;
        TEST RBX, RBX;
        SETNZ BL;
    ];
    seq.push(Instruction::new(
        op,
        vec![Operand::Reg(AL), Operand::Reg(BL)],
    ));
    seq.extend(asm_seq![
        MOVZX RAX, AL;
        PUSH RAX;
    ]);
    seq
}

pub(super) fn register(registry: &mut Registry) {
    registry.insert(OilCommand::BoolAnd, combine(Op::AND));
    registry.insert(OilCommand::BoolOr, combine(Op::OR));
    registry.insert(OilCommand::BoolXor, combine(Op::XOR));

    registry.insert(
        OilCommand::BoolNot,
        asm_seq![
            POP RAX;
            TEST RAX, RAX;
            SETZ AL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::BoolToByte,
        asm_seq![
            POP RAX;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );
}
