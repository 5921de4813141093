use super::Registry;
use crate::commands::OilCommand;
use oasm::Reg::*;
use oasm::{asm_seq, at};

// The slot number arrives in R11; R13 holds the local-variable array.

pub(super) fn register(registry: &mut Registry) {
    registry.insert(
        OilCommand::LoadLocal,
        asm_seq![
            SHL R11, 3;
            ADD R11, R13;
            MOV RAX, at(R11);
            PUSH RAX;
        ],
    );

    registry.insert(
        OilCommand::SetLocal,
        asm_seq![
            SHL R11, 3;
            ADD R11, R13;
            POP RAX;
            MOV at(R11), RAX;
        ],
    );
}
