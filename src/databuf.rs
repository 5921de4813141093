use oasm::Reg;

/// Spill area shared between a compiled function and the host.
///
/// `R14` points at this struct for the whole lifetime of an invocation.
/// The trampoline saves caller-saved registers into the leading cells,
/// the prologue parks the entry stack pointer in `rsp`, and the result
/// of the function is left in `result` for the runner to unmarshal.
/// Cell offsets are fixed; generated code addresses them relative to
/// `R14`.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug)]
pub struct DataBuffer {
    pub rax: u64,
    pub rcx: u64,
    pub rdx: u64,
    pub rsi: u64,
    pub rdi: u64,
    pub r8: u64,
    pub r9: u64,
    pub r10: u64,
    pub r11: u64,
    pub rsp: u64,
    pub result: u64,
    #[cfg(windows)]
    pub xmm0: u64,
    #[cfg(windows)]
    pub xmm1: u64,
    #[cfg(windows)]
    pub xmm2: u64,
    #[cfg(windows)]
    pub xmm3: u64,
    #[cfg(windows)]
    pub xmm4: u64,
    #[cfg(windows)]
    pub xmm5: u64,
}

/// Byte offset of the `result` cell.
pub const RESULT_OFFSET: i32 = 80;

/// Byte offset of the `rsp` save slot.
pub const RSP_OFFSET: i32 = 72;

/// General-purpose registers spilled around every trampoline call,
/// paired with their cell offsets.
pub const SPILLED_GPRS: [(Reg, i32); 9] = [
    (Reg::RAX, 0),
    (Reg::RCX, 8),
    (Reg::RDX, 16),
    (Reg::RSI, 24),
    (Reg::RDI, 32),
    (Reg::R8, 40),
    (Reg::R9, 48),
    (Reg::R10, 56),
    (Reg::R11, 64),
];

/// XMM registers spilled on Windows, paired with their cell offsets.
pub const SPILLED_XMMS: [(Reg, i32); 6] = [
    (Reg::XMM0, 88),
    (Reg::XMM1, 96),
    (Reg::XMM2, 104),
    (Reg::XMM3, 112),
    (Reg::XMM4, 120),
    (Reg::XMM5, 128),
];

impl DataBuffer {
    pub fn new() -> DataBuffer {
        DataBuffer::default()
    }

    /// Cell offset of a spilled register, if it has one.
    pub fn offset(reg: Reg) -> Option<i32> {
        if reg == Reg::RSP {
            return Some(RSP_OFFSET);
        }
        SPILLED_GPRS
            .iter()
            .chain(SPILLED_XMMS.iter())
            .find(|(spilled, _)| *spilled == reg)
            .map(|(_, offset)| *offset)
    }
}
