use oasm::Reg;

/// The calling-convention facts the code generator depends on.
///
/// Both supported conventions spill the same logical register set; they
/// differ in argument registers, the Windows shadow space and whether
/// XMM argument registers must be preserved across host calls.
pub struct Abi {
    /// First, second and third integer argument registers.
    pub arg0: Reg,
    pub arg1: Reg,
    pub arg2: Reg,
    /// Stack bytes a caller must reserve for the callee.
    pub shadow_space: i32,
    /// Whether `XMM0`..`XMM5` are spilled around trampoline calls.
    pub spills_xmm: bool,
}

#[cfg(not(windows))]
pub const HOST: Abi = Abi {
    arg0: Reg::RDI,
    arg1: Reg::RSI,
    arg2: Reg::RDX,
    shadow_space: 0,
    spills_xmm: false,
};

#[cfg(windows)]
pub const HOST: Abi = Abi {
    arg0: Reg::RCX,
    arg1: Reg::RDX,
    arg2: Reg::R8,
    shadow_space: 32,
    spills_xmm: true,
};
