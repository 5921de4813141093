use crate::Op;
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodeError {
    UnsupportedInstruction(Op),
    UnsupportedOperands(Op),
    OperandWidthMismatch(Op),
    InvalidScale(u8),
    UnresolvedLabel(String),
    PatchOutOfRange(String),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncodeError::UnsupportedInstruction(op) => {
                write!(f, "Instruction {} cannot be encoded", op)
            }
            EncodeError::UnsupportedOperands(op) => {
                write!(f, "Unsupported operand combination for {}", op)
            }
            EncodeError::OperandWidthMismatch(op) => {
                write!(f, "Operand widths of {} do not agree", op)
            }
            EncodeError::InvalidScale(scale) => {
                write!(f, "Scale {} is not one of 1, 2, 4, 8", scale)
            }
            EncodeError::UnresolvedLabel(label) => write!(f, "Label not found: {}", label),
            EncodeError::PatchOutOfRange(label) => {
                write!(f, "Relative offset to label {} cannot be patched", label)
            }
        }
    }
}

impl StdError for EncodeError {}
