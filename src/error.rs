use crate::commands::OilCommand;
use oasm::EncodeError;
use std::error::Error as StdError;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    UnknownCommand(String),
    ArgumentMissing(OilCommand),
    UnexpectedEof,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::UnknownCommand(name) => write!(f, "Unknown command: {}", name),
            ParseError::ArgumentMissing(command) => {
                write!(f, "Argument of {} not found", command)
            }
            ParseError::UnexpectedEof => f.write_str("Token stream ended inside a command"),
        }
    }
}

impl StdError for ParseError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LowerError {
    UnsupportedCommand(OilCommand),
    InvalidArgument(OilCommand, String),
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LowerError::UnsupportedCommand(command) => {
                write!(f, "No lowering rule for {}", command)
            }
            LowerError::InvalidArgument(command, argument) => {
                write!(f, "Bad argument \"{}\" for {}", argument, command)
            }
        }
    }
}

impl StdError for LowerError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecError {
    AllocationFailed,
    ProtectionFailed,
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExecError::AllocationFailed => f.write_str("Mapping executable memory failed"),
            ExecError::ProtectionFailed => {
                f.write_str("Transitioning executable memory to read-execute failed")
            }
        }
    }
}

impl StdError for ExecError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunError {
    NotCompiled,
    EmptyFrame,
    UnsupportedArgumentType,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RunError::NotCompiled => f.write_str("Function was not compiled"),
            RunError::EmptyFrame => f.write_str("No stack frame to take locals from"),
            RunError::UnsupportedArgumentType => {
                f.write_str("A local value cannot be passed to compiled code")
            }
        }
    }
}

impl StdError for RunError {}

#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Parse(ParseError),
    Lower(LowerError),
    Encode(EncodeError),
    Exec(ExecError),
    Run(RunError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "{}", err),
            Error::Lower(err) => write!(f, "{}", err),
            Error::Encode(err) => write!(f, "{}", err),
            Error::Exec(err) => write!(f, "{}", err),
            Error::Run(err) => write!(f, "{}", err),
        }
    }
}

impl StdError for Error {}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<LowerError> for Error {
    fn from(err: LowerError) -> Error {
        Error::Lower(err)
    }
}

impl From<EncodeError> for Error {
    fn from(err: EncodeError) -> Error {
        Error::Encode(err)
    }
}

impl From<ExecError> for Error {
    fn from(err: ExecError) -> Error {
        Error::Exec(err)
    }
}

impl From<RunError> for Error {
    fn from(err: RunError) -> Error {
        Error::Run(err)
    }
}
