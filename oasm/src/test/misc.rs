#[test]
fn one_byte_forms() {
    encodes_to!(NOP => 0x90);
    encodes_to!(HLT => 0xF4);
    encodes_to!(CLC => 0xF8);
    encodes_to!(STC => 0xF9);
    encodes_to!(CMC => 0xF5);
}

#[test]
fn sign_extension_and_syscall() {
    encodes_to!(CQO => 0x48 0x99);
    encodes_to!(SYSCALL => 0x0F 0x05);
}
