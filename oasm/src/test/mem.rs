use crate::Reg::*;
use crate::{absolute, at, at_disp, indexed, EncodeError, Mem, Segment};

#[test]
fn absolute_address() {
    encodes_to!(MOV RAX, absolute(0x100) => 0x48 0x8B 0x04 0x25 0x00 0x01 0x00 0x00);
}

#[test]
fn base_only() {
    encodes_to!(MOV RAX, at(RBX) => 0x48 0x8B 0x03);
    // RBP and R13 have no mod=00 form; an 8-bit zero displacement is used.
    encodes_to!(MOV RAX, at(RBP) => 0x48 0x8B 0x45 0x00);
    encodes_to!(MOV RAX, at(R13) => 0x49 0x8B 0x45 0x00);
    // RSP and R12 escape into a SIB byte.
    encodes_to!(MOV RAX, at(RSP) => 0x48 0x8B 0x04 0x24);
    encodes_to!(MOV RAX, at(R12) => 0x49 0x8B 0x04 0x24);
}

#[test]
fn displacement_sizes() {
    encodes_to!(MOV RAX, at_disp(RBX, 127) => 0x48 0x8B 0x43 0x7F);
    encodes_to!(MOV RAX, at_disp(RBX, -128) => 0x48 0x8B 0x43 0x80);
    encodes_to!(MOV RAX, at_disp(RBX, 128) => 0x48 0x8B 0x83 0x80 0x00 0x00 0x00);
    encodes_to!(MOV RAX, at_disp(RSP, 8) => 0x48 0x8B 0x44 0x24 0x08);
}

#[test]
fn base_and_index() {
    encodes_to!(MOV RAX, indexed(RBX, RCX, 4, 0) => 0x48 0x8B 0x04 0x8B);
    encodes_to!(MOV RAX, indexed(RSP, RCX, 8, 8) => 0x48 0x8B 0x44 0xCC 0x08);
    encodes_to!(MOV RAX, indexed(R13, RCX, 1, 0) => 0x49 0x8B 0x44 0x0D 0x00);
    encodes_to!(MOV RBX, indexed(RSP, RCX, 8, 0) => 0x48 0x8B 0x1C 0xCC);
}

#[test]
fn index_without_base() {
    let mem = Mem {
        base: None,
        index: Some(RCX),
        scale: 2,
        disp: 0x40,
        segment: None,
    };
    encodes_to!(MOV RAX, mem => 0x48 0x8B 0x04 0x4D 0x40 0x00 0x00 0x00);
}

#[test]
fn segment_override() {
    let mem = Mem {
        segment: Some(Segment::FS),
        ..at(RBX)
    };
    encodes_to!(MOV RAX, mem => 0x64 0x48 0x8B 0x03);
}

#[test]
fn invalid_scale() {
    encoding_fails!(MOV RAX, indexed(RBX, RCX, 3, 0) => EncodeError::InvalidScale(3));
}

#[test]
fn rsp_cannot_be_an_index() {
    encoding_fails!(MOV RAX, indexed(RBX, RSP, 1, 0) => EncodeError::UnsupportedOperands(_));
}
