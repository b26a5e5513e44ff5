//! The compile step
//!
//! A processor receives the ordered file list of one package and returns
//! the compiled text. It is a black box to the build: only the
//! [`ProcessOutput`] it reports matters.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::config::CompilerCommand;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub successful: bool,
    /// The compiled text.
    pub output: String,
    pub errors: Vec<String>,
    pub return_code: i32,
}

pub trait Processor {
    /// Compile `paths`, in order, into one output.
    ///
    /// `Err` means the processor could not run at all. A processor that ran
    /// and rejected its input reports it through [`ProcessOutput`].
    fn process(&self, paths: &[PathBuf]) -> io::Result<ProcessOutput>;
}

/// Runs an external program with the file list appended to its arguments.
#[derive(Debug, Clone)]
pub struct CommandProcessor {
    command: CompilerCommand,
}

impl CommandProcessor {
    pub fn new(command: CompilerCommand) -> Self {
        Self { command }
    }
}

impl Processor for CommandProcessor {
    fn process(&self, paths: &[PathBuf]) -> io::Result<ProcessOutput> {
        debug!(
            program = %self.command.program.display(),
            files = paths.len(),
            "running compiler"
        );

        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .args(paths)
            .output()?;

        let return_code = output.status.code().unwrap_or(-1);
        let errors: Vec<String> = String::from_utf8_lossy(&output.stderr)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        debug!(return_code, stderr_lines = errors.len(), "compiler finished");

        Ok(ProcessOutput {
            successful: output.status.success(),
            output: String::from_utf8_lossy(&output.stdout).into_owned(),
            errors,
            return_code,
        })
    }
}

/// Joins the files one after another, each ending with a newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatProcessor;

impl Processor for ConcatProcessor {
    fn process(&self, paths: &[PathBuf]) -> io::Result<ProcessOutput> {
        let mut result = ProcessOutput {
            successful: true,
            ..ProcessOutput::default()
        };

        for path in paths {
            match fs::read_to_string(path) {
                Ok(contents) => {
                    result.output.push_str(&contents);
                    if !contents.is_empty() && !contents.ends_with('\n') {
                        result.output.push('\n');
                    }
                }
                Err(e) => {
                    result.successful = false;
                    result.return_code = 1;
                    result.errors.push(format!("{}: {e}", path.display()));
                }
            }
        }

        Ok(result)
    }
}
