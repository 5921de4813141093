use crate::EncodeError;
use crate::Reg::*;

#[test]
fn scalar_double_arithmetic() {
    encodes_to!(ADDSD XMM0, XMM1 => 0xF2 0x0F 0x58 0xC1);
    encodes_to!(SUBSD XMM0, XMM1 => 0xF2 0x0F 0x5C 0xC1);
    encodes_to!(SUBSD XMM1, XMM0 => 0xF2 0x0F 0x5C 0xC8);
    encodes_to!(MULSD XMM0, XMM1 => 0xF2 0x0F 0x59 0xC1);
    encodes_to!(DIVSD XMM0, XMM1 => 0xF2 0x0F 0x5E 0xC1);
    encodes_to!(SQRTSD XMM0, XMM0 => 0xF2 0x0F 0x51 0xC0);
    encodes_to!(MOVSD XMM0, XMM1 => 0xF2 0x0F 0x10 0xC1);
}

#[test]
fn comparisons_and_packed_logic() {
    encodes_to!(UCOMISD XMM0, XMM1 => 0x66 0x0F 0x2E 0xC1);
    encodes_to!(COMISD XMM0, XMM1 => 0x66 0x0F 0x2F 0xC1);
    encodes_to!(XORPD XMM1, XMM1 => 0x66 0x0F 0x57 0xC9);
    encodes_to!(ANDPD XMM0, XMM1 => 0x66 0x0F 0x54 0xC1);
    encodes_to!(ORPD XMM0, XMM1 => 0x66 0x0F 0x56 0xC1);
}

#[test]
fn conversions() {
    encodes_to!(CVTSI2SD XMM0, RAX => 0xF2 0x48 0x0F 0x2A 0xC0);
    encodes_to!(CVTSD2SI RAX, XMM0 => 0xF2 0x48 0x0F 0x2D 0xC0);
    encodes_to!(CVTTSD2SI RAX, XMM0 => 0xF2 0x48 0x0F 0x2C 0xC0);
}

#[test]
fn movq_transports() {
    encodes_to!(MOVQ XMM0, RAX => 0x66 0x48 0x0F 0x6E 0xC0);
    encodes_to!(MOVQ XMM1, RAX => 0x66 0x48 0x0F 0x6E 0xC8);
    encodes_to!(MOVQ RAX, XMM0 => 0x66 0x48 0x0F 0x7E 0xC0);
    encodes_to!(MOVQ XMM0, XMM1 => 0xF3 0x0F 0x7E 0xC1);
    encodes_to!(MOVQ XMM8, RAX => 0x66 0x4C 0x0F 0x6E 0xC0);
}

#[test]
fn rejects_narrow_gpr() {
    encoding_fails!(MOVQ XMM0, EAX => EncodeError::OperandWidthMismatch(_));
    encoding_fails!(CVTSI2SD XMM0, AL => EncodeError::OperandWidthMismatch(_));
}
