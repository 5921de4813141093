use super::Registry;
use crate::commands::OilCommand;
use oasm::Reg::*;
use oasm::{asm_seq, Instruction, Op, Operand};

/// Byte comparisons compare `AL` against `BL` and are unsigned.
fn comparison(set: Op) -> Vec<Instruction> {
    let mut seq = asm_seq![
        POP RBX;
        POP RAX;
        CMP AL, BL;
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
        OilCommand::ByteAdd,
        asm_seq![
            POP RBX;
            POP RAX;
            ADD AL, BL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::ByteSubtract,
        asm_seq![
            POP RBX;
            POP RAX;
            SUB AL, BL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::ByteMultiply,
        asm_seq![
            POP RBX;
            POP RAX;
            MUL BL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    // AX = AL / BL with the quotient in AL and the remainder in AH.
    registry.insert(
        OilCommand::ByteDivide,
        asm_seq![
            POP RBX;
            POP RAX;
            XOR AH, AH;
            DIV BL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::ByteModulo,
        asm_seq![
            POP RBX;
            POP RAX;
            XOR AH, AH;
            DIV BL;
            MOV AL, AH;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::ByteNegate,
        asm_seq![
            POP RAX;
            NEG AL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::ByteIncrement,
        asm_seq![
            POP RAX;
            INC AL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::ByteDecrement,
        asm_seq![
            POP RAX;
            DEC AL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(OilCommand::ByteEqual, comparison(Op::SETZ));
    registry.insert(OilCommand::ByteNotEqual, comparison(Op::SETNZ));
    registry.insert(OilCommand::ByteLessThan, comparison(Op::SETB));
    registry.insert(OilCommand::ByteLessEqual, comparison(Op::SETBE));
    registry.insert(OilCommand::ByteGreaterThan, comparison(Op::SETNBE));
    registry.insert(OilCommand::ByteGreaterEqual, comparison(Op::SETNB));

    registry.insert(
        OilCommand::ByteAnd,
        asm_seq![
            POP RBX;
            POP RAX;
            AND AL, BL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::ByteOr,
        asm_seq![
            POP RBX;
            POP RAX;
            OR AL, BL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::ByteXor,
        asm_seq![
            POP RBX;
            POP RAX;
            XOR AL, BL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::ByteNot,
        asm_seq![
            POP RAX;
            NOT AL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::ByteLeftShift,
        asm_seq![
            POP RCX;
            POP RAX;
            SHL AL, CL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::ByteRightShift,
        asm_seq![
            POP RCX;
            POP RAX;
            SHR AL, CL;
            MOVZX RAX, AL;
            PUSH RAX;
        ],
    );
}
