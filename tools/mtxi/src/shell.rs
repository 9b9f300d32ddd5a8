//! Statement evaluation against the reference runtime.

use mtx_host::{Host, HostError, Opcode, Value};
use mtx_matrix::{Matrix, MatrixLibrary, RenderConfig};
use mtx_rts::{GcStats, Runtime};
use thiserror::Error;
use tracing::debug;

use crate::config::ShellConfig;
use crate::parse::{parse_line, Expr, ParseError, Stmt};

/// Errors reported for one line of input.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("{}: {}", .0.code, .0.message)]
    Host(#[from] HostError),

    #[error("`{0}` is not defined")]
    Undefined(String),
}

/// The interactive session: a runtime with the matrix library loaded.
pub struct Shell {
    runtime: Runtime,
    render: RenderConfig,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Result<Self, HostError> {
        let mut runtime = Runtime::with_config(config.runtime);
        runtime.load_extension(&MatrixLibrary)?;
        Ok(Self {
            runtime,
            render: config.render,
        })
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Runs one line. Returns the text to print, if any.
    pub fn run_line(&mut self, line: &str) -> Result<Option<String>, ShellError> {
        let Some(stmt) = parse_line(line)? else {
            return Ok(None);
        };
        let (output, result) = match stmt {
            Stmt::Assign(name, expr) => {
                let value = self.eval(&expr)?;
                self.runtime.define(name, value.clone());
                (None, value)
            }
            Stmt::Expr(expr) => {
                let value = self.eval(&expr)?;
                (Some(self.show(&value)), value)
            }
        };
        if let Some(stats) = self.runtime.maybe_collect(&[result]) {
            debug!(%stats, "automatic collection");
        }
        Ok(output)
    }

    /// Runs a full collection.
    pub fn collect(&mut self) -> GcStats {
        self.runtime.collect(&[])
    }

    /// Display text of a value. Matrices use the configured layout.
    pub fn show(&self, value: &Value) -> String {
        if let Ok(object) = self.runtime.foreign_object(value) {
            if let Ok(object) = object.try_borrow() {
                if let Some(matrix) = object.as_any().downcast_ref::<Matrix>() {
                    return matrix.render_with(&self.render, &self.runtime);
                }
            }
        }
        self.runtime.print_string(value)
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, ShellError> {
        Ok(match expr {
            Expr::Nil => Value::Nil,
            Expr::Bool(b) => Value::Bool(*b),
            Expr::Number(n) => Value::Number(n.clone()),
            Expr::Str(s) => self.runtime.make_string(s.clone()),
            Expr::Var(name) => self
                .runtime
                .lookup(name)
                .cloned()
                .ok_or_else(|| ShellError::Undefined(name.clone()))?,
            Expr::Call(name, args) => {
                let args = self.eval_all(args)?;
                self.runtime.call(name, args)?
            }
            Expr::Member(target, name) => {
                let target = self.eval(target)?;
                self.runtime.get_member(&target, name)?
            }
            Expr::MethodCall(target, name, args) => {
                let target = self.eval(target)?;
                let args = self.eval_all(args)?;
                self.runtime.call_method(&target, name, args)?
            }
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                self.runtime.binary(*op, &lhs, &rhs)?
            }
            Expr::Negate(operand) => {
                let operand = self.eval(operand)?;
                let zero = self.runtime.integer(0);
                self.runtime.binary(Opcode::Subtract, &zero, &operand)?
            }
        })
    }

    fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, ShellError> {
        exprs.iter().map(|expr| self.eval(expr)).collect()
    }
}
