use crate::runner::{marshal, unmarshal, ResultType, Value};

#[test]
fn values_marshal_to_bit_patterns() {
    assert_eq!(marshal(&Value::Int(5)), 5);
    assert_eq!(marshal(&Value::Int(-1)), u64::max_value());
    assert_eq!(marshal(&Value::Float(2.5)), 2.5f64.to_bits());
    assert_eq!(marshal(&Value::Bool(true)), 1);
    assert_eq!(marshal(&Value::Bool(false)), 0);
    assert_eq!(marshal(&Value::Char('A')), 65);
    assert_eq!(marshal(&Value::Byte(250)), 250);
    assert_eq!(marshal(&Value::Ptr(std::ptr::null_mut())), 0);
}

#[test]
fn results_unmarshal_by_tag() {
    assert_eq!(
        unmarshal(5, ResultType::Int64),
        Some(Value::Int(5))
    );
    assert_eq!(
        unmarshal(u64::max_value(), ResultType::Int64),
        Some(Value::Int(-1))
    );
    assert_eq!(
        unmarshal(10.0f64.to_bits(), ResultType::Float),
        Some(Value::Float(10.0))
    );
    assert_eq!(unmarshal(0, ResultType::Bool), Some(Value::Bool(false)));
    assert_eq!(unmarshal(5, ResultType::Bool), Some(Value::Bool(true)));
    // Only the low byte is significant for BYTE and CHAR.
    assert_eq!(unmarshal(0x1FF, ResultType::Byte), Some(Value::Byte(0xFF)));
    assert_eq!(unmarshal(0x141, ResultType::Char), Some(Value::Char('A')));
    assert_eq!(unmarshal(7, ResultType::Void), None);
}

#[test]
fn result_type_parses_by_name() {
    assert_eq!("Int64".parse::<ResultType>().unwrap(), ResultType::Int64);
    assert_eq!("Void".parse::<ResultType>().unwrap(), ResultType::Void);
    assert!("int64".parse::<ResultType>().is_err());
}
