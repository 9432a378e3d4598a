//! Boundary to the native-driver code generator.
//!
//! The replay core produces circuit data in the stable wire form and hands
//! it, together with the compiled entry-point metadata, to whatever
//! implements [`DriverGenerator`]. The implementations live with the code
//! generator; the core only consumes this interface.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ControllerResult;

/// Type of one entry-point argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgumentKind {
    /// Boolean flag.
    Bool,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Double,
    /// Pauli axis literal.
    Pauli,
    /// Integer range.
    Range,
    /// Measurement result.
    Result,
    /// UTF-8 string.
    String,
}

/// One argument of a compiled entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPointArgument {
    /// Argument name.
    pub name: String,
    /// Zero-based position in the signature.
    pub position: u32,
    /// Argument type.
    pub kind: ArgumentKind,
}

/// Compiler-produced metadata describing a compiled program's callable
/// signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPointDescriptor {
    /// Fully qualified entry-point name.
    pub name: String,
    /// The signature, in position order.
    pub arguments: Vec<EntryPointArgument>,
}

impl EntryPointDescriptor {
    /// Create a descriptor with an empty signature.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Append one argument at the next position.
    pub fn with_argument(mut self, name: impl Into<String>, kind: ArgumentKind) -> Self {
        let position = self.arguments.len() as u32;
        self.arguments.push(EntryPointArgument {
            name: name.into(),
            position,
            kind,
        });
        self
    }
}

/// The driver-generation stage.
///
/// Accepts a target source directory, a compiled entry-point descriptor
/// and the compiled bytecode payload, and asynchronously emits native
/// driver source files into that directory.
#[async_trait]
pub trait DriverGenerator: Send + Sync {
    /// Emit driver sources for `entry_point` into `source_dir`.
    async fn generate_driver_sources(
        &self,
        source_dir: &Path,
        entry_point: &EntryPointDescriptor,
        bytecode: &[u8],
    ) -> ControllerResult<()>;
}
