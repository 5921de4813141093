use std::sync::Arc;

use crate::error::{Error, RunError};
use crate::exec::CompiledFunction;
use crate::lower::Lowerer;
use crate::parser;
use crate::peephole;
use crate::runner::{self, ExecutionData, ResultType};
use crate::token::OwnedToken;
use crate::trampoline::ComplexOpHandler;

/// Compiles one OIL function body and runs the result.
pub struct JitExecutor {
    function_name: String,
    oil_body: Vec<OwnedToken>,
    result_type: ResultType,
    lowerer: Arc<Lowerer>,
    compiled: Option<CompiledFunction>,
}

impl JitExecutor {
    /// Runs the full pipeline: parse, lower, optimize, encode, map.
    ///
    /// Idempotent; returns `false` without diagnostics when any stage
    /// fails. A successful result is cached.
    pub fn try_compile(&mut self) -> bool {
        if self.compiled.is_some() {
            return true;
        }
        match self.compile() {
            Ok(function) => {
                self.compiled = Some(function);
                true
            }
            Err(_) => false,
        }
    }

    fn compile(&self) -> Result<CompiledFunction, Error> {
        let packed = parser::parse(&self.oil_body)?;
        let lowered = self.lowerer.lower(&packed)?;
        let optimized = peephole::optimize_push_pop(lowered);
        let (code, _labels) = oasm::encode(&optimized)?;
        Ok(CompiledFunction::new(code.as_bytes())?)
    }

    /// Invokes the compiled function against the VM state.
    ///
    /// Requires a prior successful [`try_compile`](#method.try_compile).
    pub fn run(&self, data: &mut ExecutionData) -> Result<(), Error> {
        let function = self
            .compiled
            .as_ref()
            .ok_or(Error::Run(RunError::NotCompiled))?;
        runner::run(function, self.result_type, data)?;
        Ok(())
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn result_type(&self) -> ResultType {
        self.result_type
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.is_some()
    }
}

/// Mints executors that share one command registry.
pub struct JitExecutorFactory {
    lowerer: Arc<Lowerer>,
}

impl JitExecutorFactory {
    pub fn new() -> JitExecutorFactory {
        JitExecutorFactory {
            lowerer: Arc::new(Lowerer::new()),
        }
    }

    /// A factory whose compiled code calls `handler` for complex
    /// operations instead of the built-in reference host.
    pub fn with_handler(handler: ComplexOpHandler) -> JitExecutorFactory {
        JitExecutorFactory {
            lowerer: Arc::new(Lowerer::with_handler(handler)),
        }
    }

    pub fn create(
        &self,
        function_name: &str,
        oil_body: Vec<OwnedToken>,
        result_type: ResultType,
    ) -> JitExecutor {
        JitExecutor {
            function_name: function_name.to_owned(),
            oil_body,
            result_type,
            lowerer: Arc::clone(&self.lowerer),
            compiled: None,
        }
    }
}

impl Default for JitExecutorFactory {
    fn default() -> JitExecutorFactory {
        JitExecutorFactory::new()
    }
}
