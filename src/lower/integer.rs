use super::Registry;
use crate::commands::OilCommand;
use oasm::Reg::*;
use oasm::{asm_seq, Instruction, Op, Operand};

/// `POP RBX; POP RAX; CMP; SETcc AL; MOVZX; PUSH` comparison template.
fn comparison(set: Op) -> Vec<Instruction> {
    let mut seq = asm_seq![
        POP RBX;
        POP RAX;
        CMP RAX, RBX;
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
    registry.insert(
        OilCommand::IntAdd,
        asm_seq![
            POP RBX;
            POP RAX;
            ADD RAX, RBX;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::IntSubtract,
        asm_seq![
            POP RBX;
            POP RAX;
            SUB RAX, RBX;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::IntMultiply,
        asm_seq![
            POP RBX;
            POP RAX;
            IMUL RAX, RBX;
            PUSH RAX;
        ],
    );

    // Sign-extend RAX into RDX by hand before dividing.
    registry.insert(
        OilCommand::IntDivide,
        asm_seq![
            POP RBX;
            POP RAX;
            MOV RDX, RAX;
            SAR RDX, 63;
            IDIV RBX;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::IntModulo,
        asm_seq![
            POP RBX;
            POP RAX;
            MOV RDX, RAX;
            SAR RDX, 63;
            IDIV RBX;
            PUSH RDX;
        ],
    );

    registry.insert(
        OilCommand::IntNegate,
        asm_seq![
            POP RAX;
            NEG RAX;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::IntIncrement,
        asm_seq![
            POP RAX;
            INC RAX;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::IntDecrement,
        asm_seq![
            POP RAX;
            DEC RAX;
            PUSH RAX;
        ],
    );

    registry.insert(OilCommand::IntEqual, comparison(Op::SETZ));
    registry.insert(OilCommand::IntNotEqual, comparison(Op::SETNZ));
    registry.insert(OilCommand::IntLessThan, comparison(Op::SETL));
    registry.insert(OilCommand::IntLessEqual, comparison(Op::SETLE));
    registry.insert(OilCommand::IntGreaterThan, comparison(Op::SETNLE));
    registry.insert(OilCommand::IntGreaterEqual, comparison(Op::SETNL));

    registry.insert(
        OilCommand::IntAnd,
        asm_seq![
            POP RBX;
            POP RAX;
            AND RAX, RBX;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::IntOr,
        asm_seq![
            POP RBX;
            POP RAX;
            OR RAX, RBX;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::IntXor,
        asm_seq![
            POP RBX;
            POP RAX;
            XOR RAX, RBX;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::IntNot,
        asm_seq![
            POP RAX;
            NOT RAX;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::IntLeftShift,
        asm_seq![
            POP RCX;
            POP RAX;
            SHL RAX, CL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::IntRightShift,
        asm_seq![
            POP RCX;
            POP RAX;
            SAR RAX, CL;
            PUSH RAX;
        ],
    );
}
