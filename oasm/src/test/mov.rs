use crate::Reg::*;
use crate::{at, at_disp, EncodeError};

#[test]
fn mov_imm64() {
    encodes_to!(MOV RAX, 0i64 => 0x48 0xB8 0 0 0 0 0 0 0 0);
    encodes_to!(MOV RAX, 5i64 => 0x48 0xB8 5 0 0 0 0 0 0 0);
    encodes_to!(MOV R11, 3i64 => 0x49 0xBB 3 0 0 0 0 0 0 0);
    encodes_to!(MOV RAX, 0xDEAD_BEEF_0000_0001u64
        => 0x48 0xB8 0x01 0x00 0x00 0x00 0xEF 0xBE 0xAD 0xDE);
}

#[test]
fn mov_imm_narrow() {
    encodes_to!(MOV EAX, 5 => 0xB8 5 0 0 0);
    encodes_to!(MOV AX, 7 => 0x66 0xB8 7 0);
    encodes_to!(MOV AL, 1 => 0xB0 1);
}

#[test]
fn mov_reg_reg() {
    encodes_to!(MOV RAX, RBX => 0x48 0x89 0xD8);
    encodes_to!(MOV R14, RDI => 0x49 0x89 0xFE);
    encodes_to!(MOV RDX, RAX => 0x48 0x89 0xC2);
    encodes_to!(MOV AL, AH => 0x88 0xE0);
}

#[test]
fn mov_mem() {
    encodes_to!(MOV RSP, at_disp(R14, 72) => 0x49 0x8B 0x66 0x48);
    encodes_to!(MOV at_disp(R14, 72), RSP => 0x49 0x89 0x66 0x48);
    encodes_to!(MOV RAX, at(RSP) => 0x48 0x8B 0x04 0x24);
    encodes_to!(MOV RAX, at(R13) => 0x49 0x8B 0x45 0x00);
    encodes_to!(MOV at(R11), RAX => 0x49 0x89 0x03);
}

#[test]
fn mov_mem_imm() {
    encodes_to!(MOV at_disp(R14, 80), 0 => 0x49 0xC7 0x46 0x50 0 0 0 0);
}

#[test]
fn movzx() {
    encodes_to!(MOVZX RAX, AL => 0x48 0x0F 0xB6 0xC0);
    encodes_to!(MOVZX RAX, BL => 0x48 0x0F 0xB6 0xC3);
    encodes_to!(MOVZX EAX, AX => 0x0F 0xB7 0xC0);
    encodes_to!(MOVSX RAX, AL => 0x48 0x0F 0xBE 0xC0);
}

#[test]
fn lea() {
    encodes_to!(LEA RAX, at_disp(RSP, 8) => 0x48 0x8D 0x44 0x24 0x08);
}

#[test]
fn xchg() {
    encodes_to!(XCHG RAX, RBX => 0x48 0x87 0xD8);
}

#[test]
fn extended_register_forms() {
    encodes_to!(MOV R8, R9 => 0x4D 0x89 0xC8);
    encodes_to!(MOV RAX, R15 => 0x4C 0x89 0xF8);
    encodes_to!(MOV R10, RBX => 0x49 0x89 0xDA);
    encodes_to!(MOV R8B, AL => 0x41 0x88 0xC0);
}

#[test]
fn sixteen_bit_forms() {
    encodes_to!(MOV AX, BX => 0x66 0x89 0xD8);
    encodes_to!(MOV R8W, AX => 0x66 0x41 0x89 0xC0);
}

#[test]
fn rex_only_byte_registers() {
    // SIL only exists under a REX prefix.
    encodes_to!(MOV SIL, AL => 0x40 0x88 0xC6);
}

#[test]
fn rejects_bad_combinations() {
    encoding_fails!(MOV RAX, EBX => EncodeError::OperandWidthMismatch(_));
    encoding_fails!(MOVZX RAX, AH => EncodeError::UnsupportedOperands(_));
    encoding_fails!(MOVZX AL, AL => EncodeError::OperandWidthMismatch(_));
    encoding_fails!(MOV RAX, 1.5f64 => EncodeError::UnsupportedOperands(_));
}
