use util::EnumFromStr;
use util_derive::EnumFromStr;

/// The closed OIL command vocabulary.
///
/// Variant names are the wire-format command names; lookup goes through
/// the derived `FromStr` and unknown names are rejected by the parser.
/// Not every command has a lowering rule: the call variants and the
/// static/field accessors parse but fail compilation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, EnumFromStr)]
pub enum OilCommand {
    // Stack
    PushNull,
    Pop,
    Dup,
    Swap,
    PushInt,
    PushFloat,
    PushBool,
    PushChar,
    PushByte,
    PushString,
    Rotate,
    // Integer arithmetic
    IntAdd,
    IntSubtract,
    IntMultiply,
    IntDivide,
    IntModulo,
    IntNegate,
    IntIncrement,
    IntDecrement,
    // Float arithmetic
    FloatAdd,
    FloatSubtract,
    FloatMultiply,
    FloatDivide,
    FloatNegate,
    FloatSqrt,
    // Byte arithmetic
    ByteAdd,
    ByteSubtract,
    ByteMultiply,
    ByteDivide,
    ByteModulo,
    ByteNegate,
    ByteIncrement,
    ByteDecrement,
    // Comparisons
    IntEqual,
    IntNotEqual,
    IntLessThan,
    IntLessEqual,
    IntGreaterThan,
    IntGreaterEqual,
    FloatEqual,
    FloatNotEqual,
    FloatLessThan,
    FloatLessEqual,
    FloatGreaterThan,
    FloatGreaterEqual,
    ByteEqual,
    ByteNotEqual,
    ByteLessThan,
    ByteLessEqual,
    ByteGreaterThan,
    ByteGreaterEqual,
    // Boolean logic
    BoolAnd,
    BoolOr,
    BoolNot,
    BoolXor,
    // Bitwise
    IntAnd,
    IntOr,
    IntXor,
    IntNot,
    IntLeftShift,
    IntRightShift,
    ByteAnd,
    ByteOr,
    ByteXor,
    ByteNot,
    ByteLeftShift,
    ByteRightShift,
    // Strings
    StringConcat,
    StringLength,
    StringSubstring,
    StringCompare,
    StringToInt,
    StringToFloat,
    IntToString,
    FloatToString,
    // Conversions
    IntToFloat,
    FloatToInt,
    ByteToInt,
    CharToByte,
    ByteToChar,
    BoolToByte,
    // Control flow
    CallIndirect,
    Return,
    Break,
    Continue,
    Unwrap,
    NullCoalesce,
    IsNull,
    // I/O
    Print,
    PrintLine,
    ReadLine,
    ReadChar,
    ReadInt,
    ReadFloat,
    // Time
    UnixTime,
    UnixTimeMs,
    UnixTimeNs,
    NanoTime,
    FormatDateTime,
    ParseDateTime,
    // Filesystem
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
    // Process
    SleepMs,
    SleepNs,
    Exit,
    GetProcessId,
    GetEnvironmentVar,
    SetEnvironmentVar,
    // Random
    Random,
    RandomRange,
    RandomFloat,
    RandomFloatRange,
    SeedRandom,
    // Memory
    GetMemoryUsage,
    GetPeakMemoryUsage,
    ForceGarbageCollection,
    // OS
    GetProcessorCount,
    GetOsName,
    GetOsVersion,
    GetArchitecture,
    GetUsername,
    GetHomeDir,
    TypeOf,
    Interop,
    // Locals, statics and fields
    LoadLocal,
    SetLocal,
    LoadStatic,
    SetStatic,
    GetField,
    SetField,
    // Call variants
    Call,
    CallVirtual,
    CallConstructor,
    GetVTable,
    SetVTable,
    SafeCall,
    IsType,
    SizeOf,
}

/// Every recognized command name, in declaration order. The wire format
/// of OIL is exactly this set; nothing else parses.
pub const ALL_COMMAND_NAMES: [&str; 146] = [
    "PushNull",
    "Pop",
    "Dup",
    "Swap",
    "PushInt",
    "PushFloat",
    "PushBool",
    "PushChar",
    "PushByte",
    "PushString",
    "Rotate",
    "IntAdd",
    "IntSubtract",
    "IntMultiply",
    "IntDivide",
    "IntModulo",
    "IntNegate",
    "IntIncrement",
    "IntDecrement",
    "FloatAdd",
    "FloatSubtract",
    "FloatMultiply",
    "FloatDivide",
    "FloatNegate",
    "FloatSqrt",
    "ByteAdd",
    "ByteSubtract",
    "ByteMultiply",
    "ByteDivide",
    "ByteModulo",
    "ByteNegate",
    "ByteIncrement",
    "ByteDecrement",
    "IntEqual",
    "IntNotEqual",
    "IntLessThan",
    "IntLessEqual",
    "IntGreaterThan",
    "IntGreaterEqual",
    "FloatEqual",
    "FloatNotEqual",
    "FloatLessThan",
    "FloatLessEqual",
    "FloatGreaterThan",
    "FloatGreaterEqual",
    "ByteEqual",
    "ByteNotEqual",
    "ByteLessThan",
    "ByteLessEqual",
    "ByteGreaterThan",
    "ByteGreaterEqual",
    "BoolAnd",
    "BoolOr",
    "BoolNot",
    "BoolXor",
    "IntAnd",
    "IntOr",
    "IntXor",
    "IntNot",
    "IntLeftShift",
    "IntRightShift",
    "ByteAnd",
    "ByteOr",
    "ByteXor",
    "ByteNot",
    "ByteLeftShift",
    "ByteRightShift",
    "StringConcat",
    "StringLength",
    "StringSubstring",
    "StringCompare",
    "StringToInt",
    "StringToFloat",
    "IntToString",
    "FloatToString",
    "IntToFloat",
    "FloatToInt",
    "ByteToInt",
    "CharToByte",
    "ByteToChar",
    "BoolToByte",
    "CallIndirect",
    "Return",
    "Break",
    "Continue",
    "Unwrap",
    "NullCoalesce",
    "IsNull",
    "Print",
    "PrintLine",
    "ReadLine",
    "ReadChar",
    "ReadInt",
    "ReadFloat",
    "UnixTime",
    "UnixTimeMs",
    "UnixTimeNs",
    "NanoTime",
    "FormatDateTime",
    "ParseDateTime",
    "FileExists",
    "DirectoryExists",
    "CreateDir",
    "DeleteFileByName",
    "DeleteDir",
    "MoveFileByName",
    "CopyFileByName",
    "ListDir",
    "GetCurrentDir",
    "ChangeDir",
    "SleepMs",
    "SleepNs",
    "Exit",
    "GetProcessId",
    "GetEnvironmentVar",
    "SetEnvironmentVar",
    "Random",
    "RandomRange",
    "RandomFloat",
    "RandomFloatRange",
    "SeedRandom",
    "GetMemoryUsage",
    "GetPeakMemoryUsage",
    "ForceGarbageCollection",
    "GetProcessorCount",
    "GetOsName",
    "GetOsVersion",
    "GetArchitecture",
    "GetUsername",
    "GetHomeDir",
    "TypeOf",
    "Interop",
    "LoadLocal",
    "SetLocal",
    "LoadStatic",
    "SetStatic",
    "GetField",
    "SetField",
    "Call",
    "CallVirtual",
    "CallConstructor",
    "GetVTable",
    "SetVTable",
    "SafeCall",
    "IsType",
    "SizeOf",
];

/// How many literal arguments a command consumes, and of which shape.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Arity {
    /// No argument.
    None,
    /// One numeric/boolean/character literal.
    Numeric,
    /// One string literal.
    Text,
    /// One identifier-like offset or name reference.
    Slot,
}

impl OilCommand {
    pub fn arity(self) -> Arity {
        use self::OilCommand::*;
        match self {
            PushInt | PushFloat | PushBool | PushChar | PushByte | Rotate => Arity::Numeric,
            PushString => Arity::Text,
            LoadLocal | SetLocal | LoadStatic | SetStatic | GetField | SetField | Call
            | CallVirtual | CallConstructor | GetVTable | SetVTable | SafeCall | IsType
            | SizeOf => Arity::Slot,
            _ => Arity::None,
        }
    }
}

impl std::fmt::Display for OilCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// One parsed OIL command with the raw lexemes of its arguments.
///
/// Numeric interpretation of the arguments is deferred to the lowerer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PackedCommand {
    pub command: OilCommand,
    pub arguments: Vec<String>,
}

impl PackedCommand {
    pub fn new(command: OilCommand) -> PackedCommand {
        PackedCommand {
            command,
            arguments: Vec::new(),
        }
    }

    pub fn with_argument<S: Into<String>>(command: OilCommand, argument: S) -> PackedCommand {
        PackedCommand {
            command,
            arguments: vec![argument.into()],
        }
    }
}
