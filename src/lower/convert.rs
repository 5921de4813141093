use super::Registry;
use crate::commands::OilCommand;
use oasm::asm_seq;
use oasm::Reg::*;

pub(super) fn register(registry: &mut Registry) {
    registry.insert(
        OilCommand::IntToFloat,
        asm_seq![
            POP RAX;
            CVTSI2SD XMM0, RAX;
            MOVQ RAX, XMM0;
            PUSH RAX;
        ],
    );

    // Truncating conversion.
    registry.insert(
        OilCommand::FloatToInt,
        asm_seq![
            POP RAX;
            MOVQ XMM0, RAX;
            CVTTSD2SI RAX, XMM0;
            PUSH RAX;
        ],
    );

    let zero_extend_low_byte = asm_seq![
        POP RAX;
        MOVZX RAX, AL;
        PUSH RAX;
    ];
    registry.insert(OilCommand::ByteToInt, zero_extend_low_byte.clone());
    registry.insert(OilCommand::CharToByte, zero_extend_low_byte.clone());
    registry.insert(OilCommand::ByteToChar, zero_extend_low_byte);
}
