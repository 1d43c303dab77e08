//! Shared fault taxonomy for every stage of the Sorrel pipeline.

use thiserror::Error;

/// One fault enum for the whole pipeline. The first three variants belong to
/// the compile-time stages and carry source lines; the rest are raised by the
/// VM and carry the instruction pointer at the faulting opcode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SorrelError {
    #[error("tokenize error at line {line}: {msg}")]
    Tokenize { line: u32, msg: String },
    #[error("parse error at line {line}: {msg}")]
    Parse { line: u32, msg: String },
    #[error("compile error: {msg}")]
    Emit { msg: String },
    #[error("type error at ip {ip}: {msg}")]
    Type { ip: usize, msg: String },
    #[error("stack error at ip {ip}: {msg}")]
    Stack { ip: usize, msg: String },
    #[error("memory error at ip {ip}: {msg}")]
    Memory { ip: usize, msg: String },
    #[error("domain error at ip {ip}: {msg}")]
    Domain { ip: usize, msg: String },
}

impl SorrelError {
    /// Source line for compile-stage faults, if this fault carries one.
    pub fn line(&self) -> Option<u32> {
        match self {
            SorrelError::Tokenize { line, .. } | SorrelError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Instruction pointer for runtime faults, if this fault carries one.
    pub fn ip(&self) -> Option<usize> {
        match self {
            SorrelError::Type { ip, .. }
            | SorrelError::Stack { ip, .. }
            | SorrelError::Memory { ip, .. }
            | SorrelError::Domain { ip, .. } => Some(*ip),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SorrelError>;
