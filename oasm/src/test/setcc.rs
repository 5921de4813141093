use crate::EncodeError;
use crate::Reg::*;

#[test]
fn set_byte_forms() {
    encodes_to!(SETZ AL => 0x0F 0x94 0xC0);
    encodes_to!(SETNZ AL => 0x0F 0x95 0xC0);
    encodes_to!(SETB AL => 0x0F 0x92 0xC0);
    encodes_to!(SETNB AL => 0x0F 0x93 0xC0);
    encodes_to!(SETBE AL => 0x0F 0x96 0xC0);
    encodes_to!(SETNBE AL => 0x0F 0x97 0xC0);
    encodes_to!(SETL AL => 0x0F 0x9C 0xC0);
    encodes_to!(SETNL AL => 0x0F 0x9D 0xC0);
    encodes_to!(SETLE AL => 0x0F 0x9E 0xC0);
    encodes_to!(SETNLE AL => 0x0F 0x9F 0xC0);
    encodes_to!(SETZ BL => 0x0F 0x94 0xC3);
}

#[test]
fn rejects_wide_destination() {
    encoding_fails!(SETZ RAX => EncodeError::OperandWidthMismatch(_));
}
