use thiserror::Error;

pub type HalResult<T> = std::result::Result<T, HalError>;

#[derive(Error, Debug)]
pub enum HalError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command failed: {program} (exit={code:?}): {output}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        /// Combined stdout + stderr of the failed invocation.
        output: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("nix errno: {0}")]
    Nix(#[from] nix::errno::Errno),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    Other(String),
}

impl HalError {
    /// Text shown to the operator when a step fails.
    ///
    /// For a tool that ran and failed this is whatever the tool printed; for an
    /// invocation that never started it is the OS-level reason.
    pub fn diagnostic(&self) -> String {
        match self {
            HalError::CommandFailed { program, code, output } => {
                if output.is_empty() {
                    format!("{} exited with {:?}", program, code)
                } else {
                    output.clone()
                }
            }
            HalError::CommandNotFound(program) => {
                format!("{}: No such file or directory", program)
            }
            HalError::Io(err) => err.to_string(),
            HalError::Nix(errno) => errno.desc().to_string(),
            other => other.to_string(),
        }
    }
}
