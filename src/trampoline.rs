//! Operation codes and the reference host handler for complex operations.
//!
//! Compiled code reaches the host through a single C-ABI function: the
//! generated trampoline passes the operand-stack top and a 64-bit
//! operation code, and installs whatever stack pointer the handler
//! returns. The handler sees the operand stack laid out as
//!
//! ```text
//! rsp[0 .. pushes]                  result slots (reserved by the caller)
//! rsp[pushes .. pushes + pops]      arguments, top of stack first
//! ```
//!
//! and finishes by sliding the results over the consumed arguments and
//! returning `rsp + 8 * pops`.

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::FromPrimitive;
use std::ffi::CStr;
use std::io::{BufRead, Write};
use std::os::raw::c_char;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Signature of the host function called by generated trampolines.
pub type ComplexOpHandler = extern "C" fn(*mut u64, u64) -> *mut u64;

/// The closed set of operation codes understood by the host trampoline.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, FromPrimitive, ToPrimitive)]
pub enum CalledOp {
    FloatSqrt = 1,
    Print,
    PrintLine,
    ReadLine,
    ReadChar,
    ReadInt,
    ReadFloat,
    StringConcat,
    StringLength,
    StringSubstring,
    StringCompare,
    StringToInt,
    StringToFloat,
    IntToString,
    FloatToString,
    UnixTime,
    UnixTimeMs,
    UnixTimeNs,
    NanoTime,
    FormatDateTime,
    ParseDateTime,
    FileExists,
    DirectoryExists,
    CreateDir,
    DeleteFileByName,
    DeleteDir,
    MoveFileByName,
    CopyFileByName,
    ListDir,
    GetCurrentDir,
    ChangeDir,
    SleepMs,
    SleepNs,
    Exit,
    GetProcessId,
    GetEnvironmentVar,
    SetEnvironmentVar,
    Random,
    RandomRange,
    RandomFloat,
    RandomFloatRange,
    SeedRandom,
    GetMemoryUsage,
    GetPeakMemoryUsage,
    ForceGarbageCollection,
    GetProcessorCount,
    GetOsName,
    GetOsVersion,
    GetArchitecture,
    GetUsername,
    GetHomeDir,
    TypeOf,
    Interop,
    Unwrap,
}

impl CalledOp {
    /// Operand-stack slots consumed and produced by the operation.
    ///
    /// The lowerer reserves `pushes` slots before the call; the handler
    /// relies on this layout to locate its arguments.
    pub fn stack_effect(self) -> (usize, usize) {
        use self::CalledOp::*;
        match self {
            FloatSqrt => (1, 1),
            Print | PrintLine => (1, 0),
            ReadLine | ReadChar | ReadInt | ReadFloat => (0, 1),
            StringConcat => (2, 1),
            StringLength => (1, 1),
            StringSubstring => (3, 1),
            StringCompare => (2, 1),
            StringToInt | StringToFloat | IntToString | FloatToString => (1, 1),
            UnixTime | UnixTimeMs | UnixTimeNs | NanoTime => (0, 1),
            FormatDateTime | ParseDateTime => (2, 1),
            FileExists | DirectoryExists | CreateDir | DeleteFileByName | DeleteDir
            | ListDir | ChangeDir => (1, 1),
            MoveFileByName | CopyFileByName => (2, 1),
            GetCurrentDir => (0, 1),
            SleepMs | SleepNs | Exit | SeedRandom => (1, 0),
            GetProcessId => (0, 1),
            GetEnvironmentVar => (1, 1),
            SetEnvironmentVar => (2, 0),
            Random | RandomFloat => (0, 1),
            RandomRange | RandomFloatRange => (2, 1),
            GetMemoryUsage | GetPeakMemoryUsage | GetProcessorCount => (0, 1),
            ForceGarbageCollection | Interop => (0, 0),
            GetOsName | GetOsVersion | GetArchitecture | GetUsername | GetHomeDir => (0, 1),
            TypeOf => (1, 1),
            Unwrap => (0, 0),
        }
    }
}

static RANDOM_STATE: AtomicU64 = AtomicU64::new(0x9E37_79B9_7F4A_7C15);

fn next_random() -> u64 {
    // xorshift64*, good enough for a reference host.
    let mut x = RANDOM_STATE.load(Ordering::Relaxed);
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    RANDOM_STATE.store(x, Ordering::Relaxed);
    x.wrapping_mul(0x2545_F491_4F6C_DD1D)
}

unsafe fn c_str<'a>(raw: u64) -> Option<&'a CStr> {
    let ptr = raw as *const c_char;
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr))
    }
}

fn unix_time() -> std::time::Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

fn read_stdin_line() -> String {
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
    line
}

/// Reference implementation of the complex-operation handler.
///
/// Arithmetic, time, sleep, process, random and file-existence
/// operations are functional. Operations that would have to produce
/// host-managed strings consume their arguments and produce zeroed
/// results; a VM embedding this compiler installs its own handler via
/// `Lowerer::with_handler` and dispatches on [`CalledOp`] itself.
pub extern "C" fn complex_op_handler(stack_top: *mut u64, code: u64) -> *mut u64 {
    let op = match CalledOp::from_u64(code) {
        Some(op) => op,
        None => return stack_top,
    };
    unsafe { handle(stack_top, op) }
}

unsafe fn handle(top: *mut u64, op: CalledOp) -> *mut u64 {
    let (pops, pushes) = op.stack_effect();
    let arg = |i: usize| *top.add(pushes + i);
    let mut results = [0u64; 2];

    match op {
        CalledOp::FloatSqrt => {
            results[0] = f64::from_bits(arg(0)).sqrt().to_bits();
        }
        CalledOp::Print => {
            print!("{}", arg(0) as i64);
            let _ = std::io::stdout().flush();
        }
        CalledOp::PrintLine => {
            println!("{}", arg(0) as i64);
        }
        CalledOp::ReadInt => {
            results[0] = read_stdin_line().trim().parse::<i64>().unwrap_or(0) as u64;
        }
        CalledOp::ReadFloat => {
            results[0] = read_stdin_line()
                .trim()
                .parse::<f64>()
                .unwrap_or(0.0)
                .to_bits();
        }
        CalledOp::ReadChar => {
            results[0] = read_stdin_line().chars().next().map_or(0, |c| c as u64);
        }
        CalledOp::StringLength => {
            results[0] = c_str(arg(0)).map_or(0, |s| s.to_bytes().len() as u64);
        }
        CalledOp::StringCompare => {
            let right = c_str(arg(0)).map(CStr::to_bytes);
            let left = c_str(arg(1)).map(CStr::to_bytes);
            results[0] = match left.cmp(&right) {
                std::cmp::Ordering::Less => -1i64 as u64,
                std::cmp::Ordering::Equal => 0,
                std::cmp::Ordering::Greater => 1,
            };
        }
        CalledOp::StringToInt => {
            results[0] = c_str(arg(0))
                .and_then(|s| s.to_str().ok())
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(0) as u64;
        }
        CalledOp::StringToFloat => {
            results[0] = c_str(arg(0))
                .and_then(|s| s.to_str().ok())
                .and_then(|s| s.trim().parse::<f64>().ok())
                .unwrap_or(0.0)
                .to_bits();
        }
        CalledOp::UnixTime => {
            results[0] = unix_time().as_secs();
        }
        CalledOp::UnixTimeMs => {
            results[0] = unix_time().as_millis() as u64;
        }
        CalledOp::UnixTimeNs | CalledOp::NanoTime => {
            results[0] = unix_time().as_nanos() as u64;
        }
        CalledOp::FileExists => {
            results[0] = path_check(arg(0), |p| p.is_file());
        }
        CalledOp::DirectoryExists => {
            results[0] = path_check(arg(0), |p| p.is_dir());
        }
        CalledOp::CreateDir => {
            results[0] = path_check(arg(0), |p| std::fs::create_dir(p).is_ok());
        }
        CalledOp::DeleteFileByName => {
            results[0] = path_check(arg(0), |p| std::fs::remove_file(p).is_ok());
        }
        CalledOp::DeleteDir => {
            results[0] = path_check(arg(0), |p| std::fs::remove_dir(p).is_ok());
        }
        CalledOp::MoveFileByName => {
            results[0] = two_path_check(arg(1), arg(0), |from, to| {
                std::fs::rename(from, to).is_ok()
            });
        }
        CalledOp::CopyFileByName => {
            results[0] = two_path_check(arg(1), arg(0), |from, to| {
                std::fs::copy(from, to).is_ok()
            });
        }
        CalledOp::ChangeDir => {
            results[0] = path_check(arg(0), |p| std::env::set_current_dir(p).is_ok());
        }
        CalledOp::SleepMs => {
            std::thread::sleep(std::time::Duration::from_millis(arg(0)));
        }
        CalledOp::SleepNs => {
            std::thread::sleep(std::time::Duration::from_nanos(arg(0)));
        }
        CalledOp::Exit => {
            std::process::exit(arg(0) as i32);
        }
        CalledOp::GetProcessId => {
            results[0] = u64::from(std::process::id());
        }
        CalledOp::SetEnvironmentVar => {
            if let (Some(name), Some(value)) = (c_str(arg(1)), c_str(arg(0))) {
                if let (Ok(name), Ok(value)) = (name.to_str(), value.to_str()) {
                    std::env::set_var(name, value);
                }
            }
        }
        CalledOp::Random => {
            results[0] = next_random();
        }
        CalledOp::RandomRange => {
            let high = arg(0) as i64;
            let low = arg(1) as i64;
            results[0] = if high <= low {
                low as u64
            } else {
                (low + (next_random() % (high - low) as u64) as i64) as u64
            };
        }
        CalledOp::RandomFloat => {
            results[0] = ((next_random() >> 11) as f64 / (1u64 << 53) as f64).to_bits();
        }
        CalledOp::RandomFloatRange => {
            let high = f64::from_bits(arg(0));
            let low = f64::from_bits(arg(1));
            let unit = (next_random() >> 11) as f64 / (1u64 << 53) as f64;
            results[0] = (low + unit * (high - low)).to_bits();
        }
        CalledOp::SeedRandom => {
            RANDOM_STATE.store(arg(0) | 1, Ordering::Relaxed);
        }
        CalledOp::GetProcessorCount => {
            results[0] = std::thread::available_parallelism()
                .map(|n| n.get() as u64)
                .unwrap_or(1);
        }
        CalledOp::Unwrap => {
            if *top == 0 {
                eprintln!("Unwrap of a null value");
                std::process::abort();
            }
        }
        // String-producing and host-state operations are left to the
        // embedding VM; arguments are consumed, results read as zero.
        _ => {}
    }

    finish(top, pops, pushes, &results[..pushes.min(results.len())])
}

unsafe fn path_check(raw: u64, check: impl Fn(&Path) -> bool) -> u64 {
    c_str(raw)
        .and_then(|s| s.to_str().ok())
        .map_or(0, |s| check(Path::new(s)) as u64)
}

unsafe fn two_path_check(a: u64, b: u64, check: impl Fn(&Path, &Path) -> bool) -> u64 {
    match (
        c_str(a).and_then(|s| s.to_str().ok()),
        c_str(b).and_then(|s| s.to_str().ok()),
    ) {
        (Some(a), Some(b)) => check(Path::new(a), Path::new(b)) as u64,
        _ => 0,
    }
}

/// Slides the produced results over the consumed arguments and returns
/// the new operand-stack top.
unsafe fn finish(top: *mut u64, pops: usize, pushes: usize, results: &[u64]) -> *mut u64 {
    let out = top.add(pops);
    for (i, value) in results.iter().enumerate() {
        *out.add(i) = *value;
    }
    out
}
