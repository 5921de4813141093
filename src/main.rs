#[macro_use]
extern crate clap;

use clap::Arg;
use ojit::{ExecutionData, JitExecutorFactory, ResultType, Value};
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum Error {
    Io(std::io::Error, PathBuf),
    Text(ojit::text::TextError),
    Compile,
    Run(ojit::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, path) => {
                writeln!(f, "Reading input file \"{}\" failed: {}", path.display(), err)
            }
            Error::Text(err) => {
                writeln!(f, "Lexing input failed:")?;
                write!(f, "{}", err)
            }
            Error::Compile => writeln!(f, "Compilation failed"),
            Error::Run(err) => writeln!(f, "Running compiled function failed: {}", err),
        }
    }
}

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the OIL input file to compile and run")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("result_type")
                .short("t")
                .long("result-type")
                .takes_value(true)
                .value_name("TYPE")
                .help("How to interpret the result cell (Ptr, Float, Int64, Byte, Bool, Char, Void)"),
        )
        .arg(
            Arg::with_name("local")
                .short("l")
                .long("local")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .value_name("VALUE")
                .help("Adds a local value visible to LoadLocal/SetLocal"),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let result_type = matches
        .value_of("result_type")
        .map(|text| match text.parse() {
            Ok(result_type) => result_type,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(2);
            }
        })
        .unwrap_or(ResultType::Int64);
    let locals = matches
        .values_of("local")
        .map(|values| values.map(parse_local).collect())
        .unwrap_or_else(Vec::new);

    if let Err(err) = run_file(input, result_type, locals) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn parse_local(text: &str) -> Value {
    if let Ok(value) = text.parse::<i64>() {
        return Value::Int(value);
    }
    if let Ok(value) = text.parse::<f64>() {
        return Value::Float(value);
    }
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Int(0),
    }
}

fn run_file(input: &str, result_type: ResultType, locals: Vec<Value>) -> Result<(), Error> {
    let input_path = Path::new(input);
    let source = std::fs::read_to_string(input_path)
        .map_err(|err| Error::Io(err, input_path.to_owned()))?;

    let tokens = ojit::text::tokenize(&source).map_err(Error::Text)?;

    let factory = JitExecutorFactory::new();
    let mut executor = factory.create(input, tokens, result_type);
    if !executor.try_compile() {
        return Err(Error::Compile);
    }

    let mut data = ExecutionData::with_locals(locals);
    executor.run(&mut data).map_err(Error::Run)?;

    if let Some(value) = data.machine_stack.last() {
        println!("{}", value);
    }
    Ok(())
}
