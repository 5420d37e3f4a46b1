//! Error types module
//!
//! Startup errors abort bootstrap; request errors are caught at the
//! dispatch boundary and never terminate the process.

use thiserror::Error;

/// Errors that abort the bootstrap pipeline.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration could not be loaded or deserialized.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The scan root names a package with no registered components.
    #[error("scan package '{0}' matches no registered components")]
    ScanRootNotFound(String),

    /// The registry was empty when the wiring pass started.
    #[error("no managed beans present at wiring time")]
    NoManagedBeans,

    /// A dependency target name had no registry entry (strict mode only).
    #[error("unresolved dependency: bean '{bean}' slot '{slot}' wants bean '{target}'")]
    UnresolvedDependency {
        bean: String,
        slot: String,
        target: String,
    },

    /// A registry entry existed but its type did not fit the slot (strict mode only).
    #[error("dependency type mismatch: bean '{bean}' slot '{slot}' cannot hold bean '{target}'")]
    DependencyTypeMismatch {
        bean: String,
        slot: String,
        target: String,
    },
}

/// A component factory failed; the component is skipped, bootstrap continues.
#[derive(Debug, Error)]
#[error("construction failed: {reason}")]
pub struct ConstructError {
    pub reason: String,
}

impl ConstructError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Parameter binding failed for one request.
#[derive(Debug, Error)]
pub enum BindError {
    /// A request parameter value could not be parsed into the declared kind.
    #[error("cannot coerce parameter '{name}'='{value}' into {kind}: {source}")]
    Coercion {
        name: String,
        value: String,
        kind: &'static str,
        source: std::num::ParseFloatError,
    },

    /// Integer variant of the above; kept separate for the error source type.
    #[error("cannot coerce parameter '{name}'='{value}' into {kind}: {source}")]
    IntCoercion {
        name: String,
        value: String,
        kind: &'static str,
        source: std::num::ParseIntError,
    },
}

/// A handler invocation failed; recovered at the dispatch boundary.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Controller-defined business failure.
    #[error("{0}")]
    Failed(String),

    /// The bound bean was not of the type the handler closure expects.
    #[error("handler '{handler}' invoked against a bean that is not a {expected}")]
    WrongBeanType {
        handler: &'static str,
        expected: &'static str,
    },

    /// The handler asked for an argument index that was never bound.
    #[error("handler '{handler}' has no bound argument at index {index}")]
    ArgIndex {
        handler: &'static str,
        index: usize,
    },

    /// The handler read a bound argument with the wrong accessor.
    #[error("handler '{handler}' argument {index} is not a {expected} value")]
    ArgKind {
        handler: &'static str,
        index: usize,
        expected: &'static str,
    },
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
