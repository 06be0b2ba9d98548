//! SafeCommandExecutor: whitelisted execution of the external release tools
//!
//! # Security Features
//!
//! - **Whitelist-based validation**: Only known release tooling can execute
//! - **Injection prevention**: Uses `std::process::Command`, never a shell
//! - **Argument safety**: Arguments are passed as a vector, never interpolated
//! - **Working directory validation**: Validates existence before execution
//!
//! # Example
//!
//! ```rust,no_run
//! use release_publisher::security::{CommandRunner, ExternalCommand, SafeCommandExecutor};
//!
//! let executor = SafeCommandExecutor::new(".").unwrap();
//! let command = ExternalCommand::new("python", ["-m", "build"]);
//! executor.run(&command).unwrap();
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Allowed commands whitelist for security.
///
/// Build backends, uploaders, the GitHub CLI and the docs deployer.
const ALLOWED_COMMANDS: &[&str] = &[
    "python", "python3", "gh", "git", "twine", "mike", "poetry", "uv", "hatch", "pdm", "flit",
];

/// Whether `program` may be executed by `SafeCommandExecutor`
pub fn is_allowed_command(program: &str) -> bool {
    ALLOWED_COMMANDS.contains(&program)
}

/// Errors that can occur during command execution
#[derive(Error, Debug)]
pub enum CommandError {
    /// Command is not in the allowed whitelist
    #[error("Command '{0}' is not in the allowed whitelist")]
    CommandNotAllowed(String),

    /// Working directory does not exist or is not accessible
    #[error("Working directory does not exist: {0}")]
    InvalidWorkingDirectory(PathBuf),

    /// Command could not be started (e.g., binary not found, permission denied)
    #[error("Command execution failed: {0}")]
    ExecutionFailed(String),

    /// Command ran and reported failure
    #[error("`{command}` exited with {status}")]
    NonZeroExit { command: String, status: String },
}

/// A single external command: program plus argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a configured template (`[program, args...]`) plus extra arguments.
    ///
    /// Returns `None` for an empty template.
    pub fn from_template<I, S>(template: &[String], extra: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (program, base_args) = template.split_first()?;
        let mut command = Self::new(program.clone(), base_args.iter().cloned());
        command.args.extend(extra.into_iter().map(Into::into));
        Some(command)
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Runs external commands on behalf of the publisher
pub trait CommandRunner {
    /// Reject `command` without running it. Called in dry runs too.
    fn check(&self, _command: &ExternalCommand) -> Result<(), CommandError> {
        Ok(())
    }

    /// Run `command` to completion; a non-zero exit is an error.
    fn run(&self, command: &ExternalCommand) -> Result<(), CommandError>;
}

/// Safe command executor with security controls
///
/// Child processes inherit stdout/stderr so tool output reaches the operator.
#[derive(Debug)]
pub struct SafeCommandExecutor {
    /// Working directory where commands will be executed
    working_dir: PathBuf,
}

impl SafeCommandExecutor {
    /// Create a new SafeCommandExecutor with working directory validation.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::InvalidWorkingDirectory` if the directory does not exist.
    pub fn new<P: AsRef<Path>>(working_dir: P) -> Result<Self, CommandError> {
        let working_dir = working_dir.as_ref().to_path_buf();

        if !working_dir.is_dir() {
            return Err(CommandError::InvalidWorkingDirectory(working_dir));
        }

        Ok(Self { working_dir })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl CommandRunner for SafeCommandExecutor {
    fn check(&self, command: &ExternalCommand) -> Result<(), CommandError> {
        if !is_allowed_command(&command.program) {
            return Err(CommandError::CommandNotAllowed(command.program.clone()));
        }
        Ok(())
    }

    fn run(&self, command: &ExternalCommand) -> Result<(), CommandError> {
        self.check(command)?;

        let status = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&self.working_dir)
            .status()
            .map_err(|e| CommandError::ExecutionFailed(format!("{}: {}", command.program, e)))?;

        if !status.success() {
            return Err(CommandError::NonZeroExit {
                command: command.to_string(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}
