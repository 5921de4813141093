use super::Registry;
use crate::commands::OilCommand;
use oasm::Reg::*;
use oasm::{asm_seq, at};

pub(super) fn register(registry: &mut Registry) {
    registry.insert(
        OilCommand::PushNull,
        asm_seq![
            MOV RAX, 0;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::Pop,
        asm_seq![
            POP RAX;
        ],
    );

    registry.insert(
        OilCommand::Dup,
        asm_seq![
            MOV RAX, at(RSP);
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::Swap,
        asm_seq![
            POP RBX;
            POP RAX;
            PUSH RBX;
            PUSH RAX;
        ],
    );

    // Null tests operate on the stack top in place.
    registry.insert(
        OilCommand::IsNull,
        asm_seq![
            MOV RAX, at(RSP);
            TEST RAX, RAX;
            SETZ AL;
            MOVZX RAX, AL;
            MOV at(RSP), RAX;
        ],
    );

    registry.insert(
        OilCommand::NullCoalesce,
        asm_seq![
            POP RBX;
            POP RAX;
            TEST RAX, RAX;
            CMOVE RAX, RBX;
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::CallIndirect,
        asm_seq![
            POP RAX;
            CALL RAX;
        ],
    );
}
