use util::EnumFromStr;
use util_derive::EnumFromStr;

use crate::databuf::DataBuffer;
use crate::error::RunError;
use crate::exec::CompiledFunction;

/// A VM value as seen by the runner.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    Byte(u8),
    Ptr(*mut std::ffi::c_void),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::Byte(v) => write!(f, "{}", v),
            Value::Ptr(v) => write!(f, "{:p}", v),
        }
    }
}

/// One VM stack frame; only the locals are visible to compiled code.
#[derive(Clone, Default, Debug)]
pub struct Frame {
    pub locals: Vec<Value>,
}

impl Frame {
    pub fn with_locals(locals: Vec<Value>) -> Frame {
        Frame { locals }
    }
}

/// The VM state a compiled function runs against: the frame stack it
/// reads locals from and the machine stack it pushes its result onto.
#[derive(Clone, Default, Debug)]
pub struct ExecutionData {
    pub stack_frames: Vec<Frame>,
    pub machine_stack: Vec<Value>,
}

impl ExecutionData {
    pub fn with_locals(locals: Vec<Value>) -> ExecutionData {
        ExecutionData {
            stack_frames: vec![Frame::with_locals(locals)],
            machine_stack: Vec::new(),
        }
    }
}

/// How the `Result` cell of the data buffer is to be reinterpreted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumFromStr)]
pub enum ResultType {
    Ptr,
    Float,
    Int64,
    Byte,
    Bool,
    Char,
    Void,
}

pub(crate) fn marshal(value: &Value) -> u64 {
    match *value {
        Value::Int(v) => v as u64,
        Value::Float(v) => v.to_bits(),
        Value::Bool(v) => v as u64,
        Value::Char(v) => u64::from(v as u32),
        Value::Byte(v) => u64::from(v),
        Value::Ptr(v) => v as u64,
    }
}

pub(crate) fn unmarshal(result: u64, result_type: ResultType) -> Option<Value> {
    match result_type {
        ResultType::Ptr => Some(Value::Ptr(result as *mut std::ffi::c_void)),
        ResultType::Float => Some(Value::Float(f64::from_bits(result))),
        ResultType::Int64 => Some(Value::Int(result as i64)),
        ResultType::Byte => Some(Value::Byte(result as u8)),
        // Zero is false, anything else is true.
        ResultType::Bool => Some(Value::Bool(result != 0)),
        ResultType::Char => Some(Value::Char((result as u8) as char)),
        ResultType::Void => None,
    }
}

/// Marshals the top frame's locals into a flat `u64` array, invokes the
/// compiled function and pushes the unmarshalled result onto the
/// machine stack.
pub fn run(
    function: &CompiledFunction,
    result_type: ResultType,
    data: &mut ExecutionData,
) -> Result<(), RunError> {
    let frame = data.stack_frames.last().ok_or(RunError::EmptyFrame)?;

    let mut argv: Vec<u64> = frame.locals.iter().map(marshal).collect();
    let mut buffer = DataBuffer::new();

    unsafe {
        function.invoke(&mut buffer, argv.len() as u64, argv.as_mut_ptr());
    }

    if let Some(value) = unmarshal(buffer.result, result_type) {
        data.machine_stack.push(value);
    }
    Ok(())
}
