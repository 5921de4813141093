use super::toks;
use crate::error::{Error, RunError};
use crate::executor::JitExecutorFactory;
use crate::runner::{ExecutionData, ResultType, Value};
use matches::assert_matches;

fn run_with(source: &str, result_type: ResultType, locals: Vec<Value>) -> Option<Value> {
    let factory = JitExecutorFactory::new();
    let mut executor = factory.create("test", toks(source), result_type);
    assert!(executor.try_compile(), "compilation failed for: {}", source);
    let mut data = ExecutionData::with_locals(locals);
    executor.run(&mut data).unwrap();
    data.machine_stack.pop()
}

fn run_oil(source: &str, result_type: ResultType) -> Option<Value> {
    run_with(source, result_type, vec![])
}

#[test]
fn empty_body_returns_nothing() {
    assert_eq!(run_oil("", ResultType::Void), None);
}

#[test]
fn integer_sum() {
    assert_eq!(
        run_oil("PushInt 2 PushInt 3 IntAdd", ResultType::Int64),
        Some(Value::Int(5))
    );
}

#[test]
fn float_multiplication_is_bit_exact() {
    assert_eq!(
        run_oil(
            "PushFloat 2.5 PushFloat 4.0 FloatMultiply",
            ResultType::Float
        ),
        Some(Value::Float(10.0))
    );
}

#[test]
fn local_passthrough() {
    assert_eq!(
        run_with("LoadLocal 0", ResultType::Int64, vec![Value::Int(7)]),
        Some(Value::Int(7))
    );
}

#[test]
fn byte_modulo() {
    assert_eq!(
        run_oil("PushByte 250 PushByte 7 ByteModulo", ResultType::Byte),
        Some(Value::Byte(5))
    );
}

#[test]
fn comparison_to_boolean() {
    assert_eq!(
        run_oil("PushInt 4 PushInt 5 IntLessThan", ResultType::Bool),
        Some(Value::Bool(true))
    );
    assert_eq!(
        run_oil("PushInt 5 PushInt 4 IntLessThan", ResultType::Bool),
        Some(Value::Bool(false))
    );
}

#[test]
fn integer_arithmetic() {
    assert_eq!(
        run_oil("PushInt 7 PushInt 2 IntSubtract", ResultType::Int64),
        Some(Value::Int(5))
    );
    assert_eq!(
        run_oil("PushInt -6 PushInt 7 IntMultiply", ResultType::Int64),
        Some(Value::Int(-42))
    );
    assert_eq!(
        run_oil("PushInt -7 PushInt 2 IntDivide", ResultType::Int64),
        Some(Value::Int(-3))
    );
    assert_eq!(
        run_oil("PushInt -7 PushInt 2 IntModulo", ResultType::Int64),
        Some(Value::Int(-1))
    );
    assert_eq!(
        run_oil("PushInt 5 IntNegate", ResultType::Int64),
        Some(Value::Int(-5))
    );
    assert_eq!(
        run_oil("PushInt 41 IntIncrement", ResultType::Int64),
        Some(Value::Int(42))
    );
}

#[test]
fn integer_bitwise() {
    assert_eq!(
        run_oil("PushInt 12 PushInt 10 IntAnd", ResultType::Int64),
        Some(Value::Int(8))
    );
    assert_eq!(
        run_oil("PushInt 12 PushInt 10 IntXor", ResultType::Int64),
        Some(Value::Int(6))
    );
    assert_eq!(
        run_oil("PushInt 1 PushInt 4 IntLeftShift", ResultType::Int64),
        Some(Value::Int(16))
    );
    // Arithmetic right shift keeps the sign.
    assert_eq!(
        run_oil("PushInt -8 PushInt 1 IntRightShift", ResultType::Int64),
        Some(Value::Int(-4))
    );
    assert_eq!(
        run_oil("PushInt 0 IntNot", ResultType::Int64),
        Some(Value::Int(-1))
    );
}

#[test]
fn float_arithmetic() {
    assert_eq!(
        run_oil("PushFloat 1.5 PushFloat 2.25 FloatAdd", ResultType::Float),
        Some(Value::Float(3.75))
    );
    assert_eq!(
        run_oil("PushFloat 1.0 PushFloat 8.0 FloatDivide", ResultType::Float),
        Some(Value::Float(0.125))
    );
    assert_eq!(
        run_oil("PushFloat 2.5 FloatNegate", ResultType::Float),
        Some(Value::Float(-2.5))
    );
    assert_eq!(
        run_oil(
            "PushFloat 1.5 PushFloat 2.5 FloatLessThan",
            ResultType::Bool
        ),
        Some(Value::Bool(true))
    );
}

#[test]
fn float_sqrt_goes_through_the_trampoline() {
    assert_eq!(
        run_oil("PushFloat 2.25 FloatSqrt", ResultType::Float),
        Some(Value::Float(1.5))
    );
}

#[test]
fn byte_wraparound() {
    assert_eq!(
        run_oil("PushByte 200 PushByte 100 ByteAdd", ResultType::Byte),
        Some(Value::Byte(44))
    );
    assert_eq!(
        run_oil("PushByte 3 PushByte 5 ByteSubtract", ResultType::Byte),
        Some(Value::Byte(254))
    );
    assert_eq!(
        run_oil("PushByte 250 PushByte 7 ByteDivide", ResultType::Byte),
        Some(Value::Byte(35))
    );
}

#[test]
fn boolean_logic() {
    assert_eq!(
        run_oil("PushBool true BoolNot", ResultType::Bool),
        Some(Value::Bool(false))
    );
    assert_eq!(
        run_oil("PushBool true PushBool false BoolAnd", ResultType::Bool),
        Some(Value::Bool(false))
    );
    assert_eq!(
        run_oil("PushBool true PushBool false BoolOr", ResultType::Bool),
        Some(Value::Bool(true))
    );
    assert_eq!(
        run_oil("PushBool true PushBool true BoolXor", ResultType::Bool),
        Some(Value::Bool(false))
    );
}

#[test]
fn conversions() {
    assert_eq!(
        run_oil("PushInt 3 IntToFloat", ResultType::Float),
        Some(Value::Float(3.0))
    );
    // Truncation toward zero.
    assert_eq!(
        run_oil("PushFloat 2.75 FloatToInt", ResultType::Int64),
        Some(Value::Int(2))
    );
    assert_eq!(
        run_oil("PushChar 'A' CharToByte", ResultType::Byte),
        Some(Value::Byte(65))
    );
}

#[test]
fn char_result() {
    assert_eq!(
        run_oil("PushChar 'A'", ResultType::Char),
        Some(Value::Char('A'))
    );
}

#[test]
fn stack_shuffling() {
    assert_eq!(
        run_oil("PushInt 1 PushInt 2 Swap Pop", ResultType::Int64),
        Some(Value::Int(2))
    );
    assert_eq!(
        run_oil("PushInt 8 Dup IntAdd", ResultType::Int64),
        Some(Value::Int(16))
    );
    // The top slot moves to depth two; 2 ends up on top.
    assert_eq!(
        run_oil("PushInt 1 PushInt 2 PushInt 3 Rotate 3", ResultType::Int64),
        Some(Value::Int(2))
    );
}

#[test]
fn null_handling() {
    assert_eq!(
        run_oil("PushNull PushInt 4 NullCoalesce", ResultType::Int64),
        Some(Value::Int(4))
    );
    assert_eq!(
        run_oil("PushInt 3 PushInt 4 NullCoalesce", ResultType::Int64),
        Some(Value::Int(3))
    );
    assert_eq!(
        run_oil("PushNull IsNull", ResultType::Bool),
        Some(Value::Bool(true))
    );
    assert_eq!(
        run_oil("PushInt 5 Unwrap", ResultType::Int64),
        Some(Value::Int(5))
    );
}

#[test]
fn more_comparisons() {
    assert_eq!(
        run_oil("PushInt 5 PushInt 5 IntGreaterEqual", ResultType::Bool),
        Some(Value::Bool(true))
    );
    assert_eq!(
        run_oil("PushInt 3 PushInt 3 IntEqual", ResultType::Bool),
        Some(Value::Bool(true))
    );
    assert_eq!(
        run_oil("PushInt 3 PushInt 4 IntNotEqual", ResultType::Bool),
        Some(Value::Bool(true))
    );
    assert_eq!(
        run_oil(
            "PushFloat 2.5 PushFloat 1.5 FloatGreaterThan",
            ResultType::Bool
        ),
        Some(Value::Bool(true))
    );
    assert_eq!(
        run_oil("PushByte 9 PushByte 10 ByteLessThan", ResultType::Bool),
        Some(Value::Bool(true))
    );
    // Byte comparisons are unsigned: 200 > 100 even though it would be
    // negative as a signed byte.
    assert_eq!(
        run_oil("PushByte 200 PushByte 100 ByteGreaterThan", ResultType::Bool),
        Some(Value::Bool(true))
    );
}

#[test]
fn byte_unary_and_shifts() {
    assert_eq!(
        run_oil("PushByte 255 ByteIncrement", ResultType::Byte),
        Some(Value::Byte(0))
    );
    assert_eq!(
        run_oil("PushByte 0 ByteDecrement", ResultType::Byte),
        Some(Value::Byte(255))
    );
    assert_eq!(
        run_oil("PushByte 1 ByteNegate", ResultType::Byte),
        Some(Value::Byte(255))
    );
    assert_eq!(
        run_oil("PushByte 3 PushByte 2 ByteLeftShift", ResultType::Byte),
        Some(Value::Byte(12))
    );
    assert_eq!(
        run_oil("PushByte 128 PushByte 7 ByteRightShift", ResultType::Byte),
        Some(Value::Byte(1))
    );
}

#[test]
fn string_compare_through_the_host() {
    assert_eq!(
        run_oil(
            "PushString \"abc\" PushString \"abd\" StringCompare",
            ResultType::Int64
        ),
        Some(Value::Int(-1))
    );
    assert_eq!(
        run_oil(
            "PushString \"same\" PushString \"same\" StringCompare",
            ResultType::Int64
        ),
        Some(Value::Int(0))
    );
}

#[test]
fn unix_time_is_sane() {
    // Some time after 2017 and before the heat death of the suite.
    match run_oil("UnixTime", ResultType::Int64) {
        Some(Value::Int(seconds)) => assert!(seconds > 1_500_000_000),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn explicit_return() {
    assert_eq!(
        run_oil("PushInt 9 Return PushInt 1", ResultType::Int64),
        Some(Value::Int(9))
    );
}

#[test]
fn set_local_is_visible_to_load_local() {
    assert_eq!(
        run_with(
            "PushInt 7 SetLocal 0 LoadLocal 0",
            ResultType::Int64,
            vec![Value::Int(0)]
        ),
        Some(Value::Int(7))
    );
}

#[test]
fn interned_strings_reach_the_host() {
    assert_eq!(
        run_oil("PushString \"hello\" StringLength", ResultType::Int64),
        Some(Value::Int(5))
    );
}

#[test]
fn process_id_from_the_host() {
    assert_eq!(
        run_oil("GetProcessId", ResultType::Int64),
        Some(Value::Int(i64::from(std::process::id())))
    );
}

#[test]
fn running_twice_pushes_twice() {
    let factory = JitExecutorFactory::new();
    let mut executor = factory.create("twice", toks("PushInt 1"), ResultType::Int64);
    assert!(executor.try_compile());
    assert!(executor.try_compile());

    let mut data = ExecutionData::with_locals(vec![]);
    executor.run(&mut data).unwrap();
    executor.run(&mut data).unwrap();
    assert_eq!(
        data.machine_stack,
        vec![Value::Int(1), Value::Int(1)]
    );
}

#[test]
fn run_requires_a_successful_compile() {
    let factory = JitExecutorFactory::new();
    let executor = factory.create("uncompiled", toks("PushInt 1"), ResultType::Int64);
    let mut data = ExecutionData::with_locals(vec![]);
    assert_matches!(
        executor.run(&mut data),
        Err(Error::Run(RunError::NotCompiled))
    );
}

#[test]
fn run_requires_a_frame() {
    let factory = JitExecutorFactory::new();
    let mut executor = factory.create("frameless", toks(""), ResultType::Void);
    assert!(executor.try_compile());
    let mut data = ExecutionData::default();
    assert_matches!(
        executor.run(&mut data),
        Err(Error::Run(RunError::EmptyFrame))
    );
}

#[test]
fn try_compile_reports_failure_without_diagnostics() {
    let factory = JitExecutorFactory::new();
    let mut executor = factory.create("broken", toks("Break"), ResultType::Void);
    assert!(!executor.try_compile());
    assert!(!executor.is_compiled());

    let mut executor = factory.create("unknown-arg", toks("Call 5"), ResultType::Void);
    assert!(!executor.try_compile());
}
