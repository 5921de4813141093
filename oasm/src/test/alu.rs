use crate::Reg::*;
use crate::{at_disp, EncodeError};

#[test]
fn reg_reg_forms() {
    encodes_to!(ADD RAX, RBX => 0x48 0x01 0xD8);
    encodes_to!(SUB RAX, RBX => 0x48 0x29 0xD8);
    encodes_to!(CMP RAX, RBX => 0x48 0x39 0xD8);
    encodes_to!(AND RAX, RBX => 0x48 0x21 0xD8);
    encodes_to!(OR RAX, RBX => 0x48 0x09 0xD8);
    encodes_to!(XOR RAX, RBX => 0x48 0x31 0xD8);
    encodes_to!(ADD R11, R13 => 0x4D 0x01 0xEB);
}

#[test]
fn byte_forms() {
    encodes_to!(ADD AL, BL => 0x00 0xD8);
    encodes_to!(SUB AL, BL => 0x28 0xD8);
    encodes_to!(AND AL, BL => 0x20 0xD8);
    encodes_to!(CMP AL, BL => 0x38 0xD8);
    encodes_to!(XOR AH, AH => 0x30 0xE4);
}

#[test]
fn immediate_forms() {
    encodes_to!(ADD RAX, 8 => 0x48 0x83 0xC0 0x08);
    encodes_to!(SUB RSP, 32 => 0x48 0x83 0xEC 0x20);
    encodes_to!(AND RAX, 8 => 0x48 0x83 0xE0 0x08);
    encodes_to!(ADD RAX, 1000 => 0x48 0x81 0xC0 0xE8 0x03 0x00 0x00);
    encodes_to!(ADD AL, 5 => 0x80 0xC0 0x05);
}

#[test]
fn memory_forms() {
    encodes_to!(ADD RAX, at_disp(R14, 8) => 0x49 0x03 0x46 0x08);
    encodes_to!(ADD at_disp(R14, 8), RAX => 0x49 0x01 0x46 0x08);
}

#[test]
fn test_instruction() {
    encodes_to!(TEST RAX, RAX => 0x48 0x85 0xC0);
    encodes_to!(TEST RBX, RBX => 0x48 0x85 0xDB);
}

#[test]
fn shifts() {
    encodes_to!(SAR RDX, 63 => 0x48 0xC1 0xFA 0x3F);
    encodes_to!(SAR RDX, 1 => 0x48 0xD1 0xFA);
    encodes_to!(SHL RAX, CL => 0x48 0xD3 0xE0);
    encodes_to!(SAR RAX, CL => 0x48 0xD3 0xF8);
    encodes_to!(SHR RAX, CL => 0x48 0xD3 0xE8);
    encodes_to!(SHL R11, 3 => 0x49 0xC1 0xE3 0x03);
    encodes_to!(SHL AL, CL => 0xD2 0xE0);
    encodes_to!(SHR AL, CL => 0xD2 0xE8);
}

#[test]
fn unary_group() {
    encodes_to!(NEG RAX => 0x48 0xF7 0xD8);
    encodes_to!(NOT RAX => 0x48 0xF7 0xD0);
    encodes_to!(INC RAX => 0x48 0xFF 0xC0);
    encodes_to!(DEC RAX => 0x48 0xFF 0xC8);
    encodes_to!(INC AL => 0xFE 0xC0);
    encodes_to!(DEC AL => 0xFE 0xC8);
    encodes_to!(NEG AL => 0xF6 0xD8);
    encodes_to!(NOT AL => 0xF6 0xD0);
    encodes_to!(IDIV RBX => 0x48 0xF7 0xFB);
    encodes_to!(DIV BL => 0xF6 0xF3);
    encodes_to!(MUL BL => 0xF6 0xE3);
}

#[test]
fn imul_two_operand() {
    encodes_to!(IMUL RAX, RBX => 0x48 0x0F 0xAF 0xC3);
}

#[test]
fn rejects_width_mismatch() {
    encoding_fails!(ADD RAX, BL => EncodeError::OperandWidthMismatch(_));
    encoding_fails!(SUB EAX, RBX => EncodeError::OperandWidthMismatch(_));
    encoding_fails!(SHL RAX, BL => EncodeError::UnsupportedOperands(_));
}
