//! Executable memory and the typed entry point of compiled code.
//!
//! This module is the only place where verified bytes become a callable
//! function. An [`ExecutableMemory`] starts read-write, receives the
//! code bytes, and transitions to read-execute exactly once; the
//! mapping is released when the owner drops.

use crate::databuf::DataBuffer;
use crate::error::ExecError;

/// C signature of every compiled OIL function.
pub type EntryFn = unsafe extern "C" fn(*mut DataBuffer, u64, *mut u64);

pub struct ExecutableMemory {
    data: *mut u8,
    size: usize,
}

impl ExecutableMemory {
    #[cfg(unix)]
    pub fn allocate(size: usize) -> Result<ExecutableMemory, ExecError> {
        let data = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_PRIVATE | libc::MAP_ANON,
                -1,
                0,
            )
        };
        if data == libc::MAP_FAILED {
            return Err(ExecError::AllocationFailed);
        }
        Ok(ExecutableMemory {
            data: data as *mut u8,
            size,
        })
    }

    #[cfg(windows)]
    pub fn allocate(size: usize) -> Result<ExecutableMemory, ExecError> {
        use winapi::um::memoryapi::VirtualAlloc;
        use winapi::um::winnt::{MEM_COMMIT, PAGE_READWRITE};

        let data = unsafe {
            VirtualAlloc(std::ptr::null_mut(), size, MEM_COMMIT, PAGE_READWRITE)
        };
        if data.is_null() {
            return Err(ExecError::AllocationFailed);
        }
        Ok(ExecutableMemory {
            data: data as *mut u8,
            size,
        })
    }

    /// Copies `bytes` to the start of the mapping. Only valid while the
    /// mapping is still writable.
    pub fn write(&mut self, bytes: &[u8]) {
        assert!(bytes.len() <= self.size);
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), self.data, bytes.len());
        }
    }

    #[cfg(unix)]
    pub fn make_executable(&mut self) -> Result<(), ExecError> {
        let result = unsafe {
            libc::mprotect(
                self.data as *mut libc::c_void,
                self.size,
                libc::PROT_READ | libc::PROT_EXEC,
            )
        };
        if result != 0 {
            return Err(ExecError::ProtectionFailed);
        }
        Ok(())
    }

    #[cfg(windows)]
    pub fn make_executable(&mut self) -> Result<(), ExecError> {
        use winapi::um::memoryapi::VirtualProtect;
        use winapi::um::winnt::PAGE_EXECUTE_READ;

        let mut old = 0;
        let result = unsafe {
            VirtualProtect(
                self.data as *mut winapi::ctypes::c_void,
                self.size,
                PAGE_EXECUTE_READ,
                &mut old,
            )
        };
        if result == 0 {
            return Err(ExecError::ProtectionFailed);
        }
        Ok(())
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.data
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Drop for ExecutableMemory {
    #[cfg(unix)]
    fn drop(&mut self) {
        unsafe {
            libc::munmap(self.data as *mut libc::c_void, self.size);
        }
    }

    #[cfg(windows)]
    fn drop(&mut self) {
        use winapi::um::memoryapi::VirtualFree;
        use winapi::um::winnt::MEM_RELEASE;

        unsafe {
            VirtualFree(self.data as *mut winapi::ctypes::c_void, 0, MEM_RELEASE);
        }
    }
}

// The mapping is immutable once executable and owned uniquely.
unsafe impl Send for ExecutableMemory {}
unsafe impl Sync for ExecutableMemory {}

/// An invocable compiled function. Owns exactly one executable mapping;
/// the read-write to read-execute transition happens in `new` and is
/// never reversed.
pub struct CompiledFunction {
    memory: ExecutableMemory,
}

impl CompiledFunction {
    pub fn new(code: &[u8]) -> Result<CompiledFunction, ExecError> {
        let mut memory = ExecutableMemory::allocate(code.len().max(1))?;
        memory.write(code);
        memory.make_executable()?;
        Ok(CompiledFunction { memory })
    }

    fn entry(&self) -> EntryFn {
        unsafe { std::mem::transmute(self.memory.as_ptr()) }
    }

    /// Invokes the compiled code.
    ///
    /// # Safety
    ///
    /// `argv` must point at `argc` readable and writable `u64` slots,
    /// and the code must have been produced by this crate's pipeline so
    /// that it honors the `void(DataBuffer*, u64, u64*)` contract.
    pub unsafe fn invoke(&self, buffer: &mut DataBuffer, argc: u64, argv: *mut u64) {
        (self.entry())(buffer, argc, argv);
    }
}
