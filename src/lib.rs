//! Just-in-time compiler from OIL stack bytecode to x86-64 machine code.
//!
//! OIL is a flat, stack-based command language. This crate parses a
//! token stream of OIL commands, expands each command into abstract
//! x86-64 instructions over a stack-machine convention, removes
//! redundant push/pop pairs, encodes the result to raw bytes with the
//! [oasm](../oasm/index.html) crate, maps them into executable memory
//! and invokes them as a C function.
//!
//! ```text
//! tokens → parse → PackedCommand* → lower → Instruction* → peephole
//!        → Instruction* → encode → bytes → map → run
//! ```
//!
//! The pipeline is driven through [`JitExecutorFactory`] and
//! [`JitExecutor`]: the factory owns the command registry (built once)
//! and the executor compiles one function body lazily and runs it
//! against VM state ([`ExecutionData`]).
//!
//! # Calling convention of compiled code
//!
//! Compiled functions have the C signature
//! `void f(DataBuffer*, u64 argc, u64* argv)`. For the whole
//! invocation `R14` holds the [`DataBuffer`] address and `R13` the
//! local-variable array; operands live on the hardware stack. Complex
//! operations (I/O, strings, time, filesystem, process, OS, random)
//! reach the host through a single trampoline function, identified by
//! a [`CalledOp`](trampoline/enum.CalledOp.html) code.
//!
//! # Command vocabulary
//!
//! Group       | Commands
//! ------------|-----------------------------------------------------
//! Stack       | `PushNull` `Pop` `Dup` `Swap` `Rotate n` `PushInt n` `PushFloat n` `PushBool n` `PushChar n` `PushByte n` `PushString s`
//! Integer     | `IntAdd` `IntSubtract` `IntMultiply` `IntDivide` `IntModulo` `IntNegate` `IntIncrement` `IntDecrement`
//! Float       | `FloatAdd` `FloatSubtract` `FloatMultiply` `FloatDivide` `FloatNegate` `FloatSqrt`
//! Byte        | `ByteAdd` `ByteSubtract` `ByteMultiply` `ByteDivide` `ByteModulo` `ByteNegate` `ByteIncrement` `ByteDecrement`
//! Compare     | `IntEqual` `IntNotEqual` `IntLessThan` `IntLessEqual` `IntGreaterThan` `IntGreaterEqual` (same set for `Float…` and `Byte…`)
//! Boolean     | `BoolAnd` `BoolOr` `BoolNot` `BoolXor`
//! Bitwise     | `IntAnd` `IntOr` `IntXor` `IntNot` `IntLeftShift` `IntRightShift` (same set for `Byte…`)
//! String      | `StringConcat` `StringLength` `StringSubstring` `StringCompare` `StringToInt` `StringToFloat` `IntToString` `FloatToString`
//! Convert     | `IntToFloat` `FloatToInt` `ByteToInt` `CharToByte` `ByteToChar` `BoolToByte`
//! Flow        | `CallIndirect` `Return` `Unwrap` `NullCoalesce` `IsNull`
//! I/O         | `Print` `PrintLine` `ReadLine` `ReadChar` `ReadInt` `ReadFloat`
//! Time        | `UnixTime` `UnixTimeMs` `UnixTimeNs` `NanoTime` `FormatDateTime` `ParseDateTime`
//! Filesystem  | `FileExists` `DirectoryExists` `CreateDir` `DeleteFileByName` `DeleteDir` `MoveFileByName` `CopyFileByName` `ListDir` `GetCurrentDir` `ChangeDir`
//! Process     | `SleepMs` `SleepNs` `Exit` `GetProcessId` `GetEnvironmentVar` `SetEnvironmentVar`
//! Random      | `Random` `RandomRange` `RandomFloat` `RandomFloatRange` `SeedRandom`
//! Memory      | `GetMemoryUsage` `GetPeakMemoryUsage` `ForceGarbageCollection`
//! OS          | `GetProcessorCount` `GetOsName` `GetOsVersion` `GetArchitecture` `GetUsername` `GetHomeDir` `TypeOf` `Interop`
//! Locals      | `LoadLocal n` `SetLocal n`
//!
//! `Break`, `Continue`, the call variants (`Call`, `CallVirtual`,
//! `CallConstructor`, `SafeCall`), the vtable commands and the
//! static/field accessors are recognized by the parser but have no
//! lowering rule; compiling a body that uses them fails.

mod abi;
pub mod commands;
pub mod databuf;
pub mod error;
pub mod exec;
pub mod executor;
pub mod lower;
pub mod parser;
pub mod peephole;
pub mod runner;
pub mod text;
pub mod token;
pub mod trampoline;


pub use commands::{Arity, OilCommand, PackedCommand};
pub use databuf::DataBuffer;
pub use error::{Error, ExecError, LowerError, ParseError, RunError};
pub use exec::{CompiledFunction, ExecutableMemory};
pub use executor::{JitExecutor, JitExecutorFactory};
pub use lower::Lowerer;
pub use runner::{ExecutionData, Frame, ResultType, Value};
pub use token::{OwnedToken, Token};
pub use trampoline::{complex_op_handler, CalledOp, ComplexOpHandler};
