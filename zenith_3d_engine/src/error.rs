//! Error types for the Zenith3D engine
//!
//! This module defines the error types used throughout the engine,
//! including shader loading, reflection, and GPU buffer management.

use std::fmt;
use crate::graphics_device::{BufferKind, ShaderStage};

/// Result type for Zenith3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Zenith3D engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (OpenGL driver, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (buffer, uniform, block, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, device, subsystems)
    InitializationFailed(String),

    /// A required shader stage source (vertex or fragment) could not be found
    MissingStageSource {
        shader: String,
        stage: ShaderStage,
    },

    /// A shader stage failed to compile
    CompileError {
        stage: ShaderStage,
        log: String,
    },

    /// The program failed to link
    LinkError(String),

    /// The vertex stage consumes none of the recognized per-vertex attributes
    NoAttributesFound(String),

    /// Every hardware binding point of this kind is in use
    ResourceExhausted {
        kind: BufferKind,
        capacity: u32,
    },

    /// Reflection was run against a program that is not a valid linked program
    InvariantViolation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::MissingStageSource { shader, stage } => {
                write!(f, "Missing {:?} stage source for shader '{}'", stage, shader)
            }
            Error::CompileError { stage, log } => {
                write!(f, "{:?} stage failed to compile: {}", stage, log)
            }
            Error::LinkError(log) => write!(f, "Program failed to link: {}", log),
            Error::NoAttributesFound(shader) => {
                write!(f, "No vertex attributes found in shader '{}'", shader)
            }
            Error::ResourceExhausted { kind, capacity } => {
                write!(f, "All {} {:?} binding points are in use", capacity, kind)
            }
            Error::InvariantViolation(msg) => write!(f, "Invariant violation: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
