use crate::Reg::*;
use crate::{encode, EncodeError, Instruction, Op, Operand};

#[test]
fn ret_forms() {
    encodes_to!(RET => 0xC3);
    encodes_to!(RET 0 => 0xC3);
    encodes_to!(RET 16 => 0xC2 0x10 0x00);
}

#[test]
fn indirect() {
    encodes_to!(CALL RAX => 0xFF 0xD0);
    encodes_to!(JMP RAX => 0xFF 0xE0);
    encodes_to!(CALL R10 => 0x41 0xFF 0xD2);
}

#[test]
fn relative_immediate() {
    encodes_to!(JMP 0i64 => 0xE9 0 0 0 0);
    encodes_to!(CALL 0x11223344i64 => 0xE8 0x44 0x33 0x22 0x11);
    encodes_to!(JE 2i64 => 0x0F 0x84 2 0 0 0);
}

#[test]
fn forward_label() {
    let (code, labels) = encode(&[
        Instruction::new(Op::JMP, vec![Operand::from("end")]),
        Instruction::new(Op::NOP, vec![]),
        Instruction::label("end"),
    ])
    .unwrap();

    // rel32 = 6 - (1 + 4) = 1
    assert_eq!(code.as_bytes(), &[0xE9, 0x01, 0x00, 0x00, 0x00, 0x90]);
    assert_eq!(labels["end"], 6);
}

#[test]
fn backward_label() {
    let (code, labels) = encode(&[
        Instruction::label("top"),
        Instruction::new(Op::NOP, vec![]),
        Instruction::new(Op::JMP, vec![Operand::from("top")]),
    ])
    .unwrap();

    // rel32 = 0 - (2 + 4) = -6
    assert_eq!(code.as_bytes(), &[0x90, 0xE9, 0xFA, 0xFF, 0xFF, 0xFF]);
    assert_eq!(labels["top"], 0);
}

#[test]
fn conditional_label() {
    let (code, _) = encode(&[
        Instruction::new(Op::JE, vec![Operand::from("skip")]),
        Instruction::label("skip"),
    ])
    .unwrap();

    assert_eq!(code.as_bytes(), &[0x0F, 0x84, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn unresolved_label_is_fatal() {
    let result = encode(&[Instruction::new(Op::JMP, vec![Operand::from("nowhere")])]);
    matches::assert_matches!(result, Err(EncodeError::UnresolvedLabel(_)));
}

#[test]
fn conditional_jump_opcodes() {
    encodes_to!(JE 0i64 => 0x0F 0x84 0 0 0 0);
    encodes_to!(JNE 0i64 => 0x0F 0x85 0 0 0 0);
    encodes_to!(JB 0i64 => 0x0F 0x82 0 0 0 0);
    encodes_to!(JAE 0i64 => 0x0F 0x83 0 0 0 0);
    encodes_to!(JBE 0i64 => 0x0F 0x86 0 0 0 0);
    encodes_to!(JA 0i64 => 0x0F 0x87 0 0 0 0);
    encodes_to!(JL 0i64 => 0x0F 0x8C 0 0 0 0);
    encodes_to!(JGE 0i64 => 0x0F 0x8D 0 0 0 0);
    encodes_to!(JLE 0i64 => 0x0F 0x8E 0 0 0 0);
    encodes_to!(JG 0i64 => 0x0F 0x8F 0 0 0 0);
}

#[test]
fn conditional_jumps_reject_register_targets() {
    encoding_fails!(JE RAX => EncodeError::UnsupportedOperands(_));
}

#[test]
fn conditional_move() {
    encodes_to!(CMOVE RAX, RBX => 0x48 0x0F 0x44 0xC3);
    encodes_to!(CMOVNE RAX, RBX => 0x48 0x0F 0x45 0xC3);
    encodes_to!(CMOVB RAX, RBX => 0x48 0x0F 0x42 0xC3);
    encodes_to!(CMOVAE RAX, RBX => 0x48 0x0F 0x43 0xC3);
    encodes_to!(CMOVBE RAX, RBX => 0x48 0x0F 0x46 0xC3);
    encodes_to!(CMOVA RAX, RBX => 0x48 0x0F 0x47 0xC3);
    encodes_to!(CMOVE R11, RBX => 0x4C 0x0F 0x44 0xDB);
    encoding_fails!(CMOVE AL, BL => EncodeError::OperandWidthMismatch(_));
}
