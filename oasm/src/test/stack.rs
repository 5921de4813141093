use crate::EncodeError;
use crate::Reg::*;

#[test]
fn push_pop_registers() {
    encodes_to!(PUSH RAX => 0x50);
    encodes_to!(PUSH RBX => 0x53);
    encodes_to!(POP RAX => 0x58);
    encodes_to!(POP RBX => 0x5B);
    encodes_to!(PUSH R8 => 0x41 0x50);
    encodes_to!(POP R15 => 0x41 0x5F);
}

#[test]
fn push_immediates() {
    encodes_to!(PUSH 8 => 0x6A 0x08);
    encodes_to!(PUSH -1 => 0x6A 0xFF);
    encodes_to!(PUSH 1000 => 0x68 0xE8 0x03 0x00 0x00);
}

#[test]
fn flag_forms() {
    encodes_to!(PUSHF => 0x9C);
    encodes_to!(POPF => 0x9D);
}

#[test]
fn rejects_narrow_registers() {
    encoding_fails!(PUSH EAX => EncodeError::OperandWidthMismatch(_));
    encoding_fails!(POP AL => EncodeError::OperandWidthMismatch(_));
}
