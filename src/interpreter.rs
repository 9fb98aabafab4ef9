//! API to control the interpreter.

use std::io::Write;

use thiserror::Error;
use tracing::debug;

use crate::diag;
use crate::eval::{Evaluator, RuntimeError};
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Errors surfaced by a run.
///
/// By the time either variant reaches the caller the diagnostics have
/// already been written to the error channel; the value exists so the
/// host can pick an exit status.
#[derive(Debug, Error)]
pub enum KirazError {
    /// One or more syntax errors; the program was discarded.
    #[error("{count} sözdizimi hatası nedeniyle program çalıştırılmadı")]
    Syntax { count: usize },

    /// Evaluation stopped at the first uncaught runtime error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Front-to-back pipeline over one resolved source text.
///
/// # Example
///
/// ```
/// # use kiraz::interpreter::Interpreter;
/// let mut out: Vec<u8> = Vec::new();
/// let mut err: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut out, &mut err);
///
/// let source = r#"
///     fonk kare => (n: sayi) { dön n * n }
///     yaz kare(6)
/// "#;
/// interp.run(source, "örnek.krz").expect("interpreter error");
///
/// assert_eq!(out, "36\n".as_bytes());
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, Out: Write, Err: Write> {
    output: &'t mut Out,
    errors: &'t mut Err,
}

impl<'t, Out: Write, Err: Write> Interpreter<'t, Out, Err> {
    pub fn new(output: &'t mut Out, errors: &'t mut Err) -> Interpreter<'t, Out, Err> {
        Interpreter { output, errors }
    }

    /// Run `source` to completion.
    ///
    /// A syntax error anywhere discards the whole program: the parser
    /// still scans to the end for further diagnostics, but what runs is
    /// an intentionally empty tree. Runtime errors are reported to the
    /// error channel and end the run.
    pub fn run(&mut self, source: &str, file_name: &str) -> Result<(), KirazError> {
        let tokens = Lexer::new(source, file_name).scan();
        debug!(file = file_name, tokens = tokens.len(), "scanned source");

        let mut parser = Parser::new(&tokens, &mut *self.errors);
        let program = parser.parse();
        let syntax_errors = parser.error_count();
        debug!(
            statements = program.statements.len(),
            syntax_errors, "parsed program"
        );

        let mut evaluator = Evaluator::new(&mut *self.output);
        let outcome = evaluator.run(&program);

        if syntax_errors > 0 {
            return Err(KirazError::Syntax {
                count: syntax_errors,
            });
        }

        match outcome {
            Ok(()) => Ok(()),
            Err(error) => {
                diag::report_runtime_error(&mut *self.errors, file_name, &error);
                Err(KirazError::Runtime(error))
            }
        }
    }

    /// Parse `source` and pretty-print the tree instead of running it.
    pub fn dump_ast(&mut self, source: &str, file_name: &str) -> Result<(), KirazError> {
        let tokens = Lexer::new(source, file_name).scan();

        let mut parser = Parser::new(&tokens, &mut *self.errors);
        let program = parser.parse();
        let syntax_errors = parser.error_count();
        if syntax_errors > 0 {
            return Err(KirazError::Syntax {
                count: syntax_errors,
            });
        }

        writeln!(self.output, "{:#?}", program).map_err(RuntimeError::from)?;
        Ok(())
    }
}
