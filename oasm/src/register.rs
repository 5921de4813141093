/// Operand width classes of the x86-64 register file.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Width {
    B8,
    B16,
    B32,
    B64,
    B128,
}

impl Width {
    pub fn bits(self) -> u32 {
        match self {
            Width::B8 => 8,
            Width::B16 => 16,
            Width::B32 => 32,
            Width::B64 => 64,
            Width::B128 => 128,
        }
    }
}

/// The addressable x86-64 registers.
///
/// Each register carries a width class and a hardware encoding index in
/// `0..16`. The high 8-bit halves (`AH`, `BH`, `CH`, `DH`) share indexes
/// 4-7 with `SPL`..`DIL` and cannot be combined with a REX prefix; the
/// low 8-bit forms `SPL`, `BPL`, `SIL`, `DIL` conversely require one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reg {
    RAX,
    RCX,
    RDX,
    RBX,
    RSP,
    RBP,
    RSI,
    RDI,
    R8,
    R9,
    R10,
    R11,
    R12,
    R13,
    R14,
    R15,

    EAX,
    ECX,
    EDX,
    EBX,
    ESP,
    EBP,
    ESI,
    EDI,
    R8D,
    R9D,
    R10D,
    R11D,
    R12D,
    R13D,
    R14D,
    R15D,

    AX,
    CX,
    DX,
    BX,
    SP,
    BP,
    SI,
    DI,
    R8W,
    R9W,
    R10W,
    R11W,
    R12W,
    R13W,
    R14W,
    R15W,

    AL,
    CL,
    DL,
    BL,
    SPL,
    BPL,
    SIL,
    DIL,
    R8B,
    R9B,
    R10B,
    R11B,
    R12B,
    R13B,
    R14B,
    R15B,

    AH,
    CH,
    DH,
    BH,

    XMM0,
    XMM1,
    XMM2,
    XMM3,
    XMM4,
    XMM5,
    XMM6,
    XMM7,
    XMM8,
    XMM9,
    XMM10,
    XMM11,
    XMM12,
    XMM13,
    XMM14,
    XMM15,
}

use self::Reg::*;

impl Reg {
    /// Hardware encoding index (0-15). The high bit goes into REX, the
    /// low three bits into ModR/M or SIB fields.
    pub fn index(self) -> u8 {
        match self {
            RAX | EAX | AX | AL | XMM0 => 0,
            RCX | ECX | CX | CL | XMM1 => 1,
            RDX | EDX | DX | DL | XMM2 => 2,
            RBX | EBX | BX | BL | XMM3 => 3,
            RSP | ESP | SP | SPL | AH | XMM4 => 4,
            RBP | EBP | BP | BPL | CH | XMM5 => 5,
            RSI | ESI | SI | SIL | DH | XMM6 => 6,
            RDI | EDI | DI | DIL | BH | XMM7 => 7,
            R8 | R8D | R8W | R8B | XMM8 => 8,
            R9 | R9D | R9W | R9B | XMM9 => 9,
            R10 | R10D | R10W | R10B | XMM10 => 10,
            R11 | R11D | R11W | R11B | XMM11 => 11,
            R12 | R12D | R12W | R12B | XMM12 => 12,
            R13 | R13D | R13W | R13B | XMM13 => 13,
            R14 | R14D | R14W | R14B | XMM14 => 14,
            R15 | R15D | R15W | R15B | XMM15 => 15,
        }
    }

    /// Low three bits of the encoding index, as stored in ModR/M and SIB.
    pub fn low3(self) -> u8 {
        self.index() & 0x07
    }

    pub fn width(self) -> Width {
        match self {
            RAX | RCX | RDX | RBX | RSP | RBP | RSI | RDI | R8 | R9 | R10 | R11 | R12 | R13
            | R14 | R15 => Width::B64,
            EAX | ECX | EDX | EBX | ESP | EBP | ESI | EDI | R8D | R9D | R10D | R11D | R12D
            | R13D | R14D | R15D => Width::B32,
            AX | CX | DX | BX | SP | BP | SI | DI | R8W | R9W | R10W | R11W | R12W | R13W
            | R14W | R15W => Width::B16,
            AL | CL | DL | BL | SPL | BPL | SIL | DIL | R8B | R9B | R10B | R11B | R12B | R13B
            | R14B | R15B | AH | CH | DH | BH => Width::B8,
            XMM0 | XMM1 | XMM2 | XMM3 | XMM4 | XMM5 | XMM6 | XMM7 | XMM8 | XMM9 | XMM10
            | XMM11 | XMM12 | XMM13 | XMM14 | XMM15 => Width::B128,
        }
    }

    /// Registers 8-15 need the matching REX extension bit.
    pub fn is_extended(self) -> bool {
        !self.is_high_byte() && self.index() >= 8
    }

    pub fn is_xmm(self) -> bool {
        self.width() == Width::B128
    }

    /// The legacy high byte halves, incompatible with any REX prefix.
    pub fn is_high_byte(self) -> bool {
        match self {
            AH | CH | DH | BH => true,
            _ => false,
        }
    }

    /// `SPL`/`BPL`/`SIL`/`DIL` only exist when a REX prefix is present.
    pub fn needs_rex_presence(self) -> bool {
        match self {
            SPL | BPL | SIL | DIL => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Reg {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}
