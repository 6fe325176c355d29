//! Error fixtures for classifier and boundary tests.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use crate::domain::AccountError;

/// A subsystem error type that wraps a sentinel through `#[source]`.
#[derive(Error, Debug)]
pub enum ReserveError {
    #[error("reserving utxos")]
    Utxo(#[source] AccountError),
    #[error("reservation store unavailable: {0}")]
    Store(String),
}

/// A root cause carrying a variable-length payload; it has no canonical
/// identity and cannot act as a registry key.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("batch rejected: {reasons:?}")]
pub struct BatchRejected {
    pub reasons: Vec<String>,
}

/// An error whose `source()` panics.
#[derive(Debug)]
pub struct PanickingSource;

impl fmt::Display for PanickingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("panicking source")
    }
}

impl StdError for PanickingSource {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        panic!("source() exploded")
    }
}

/// An error that reports itself as its own source.
#[derive(Debug)]
pub struct CyclicError;

impl fmt::Display for CyclicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cyclic error")
    }
}

impl StdError for CyclicError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self)
    }
}

/// An error whose `Display` panics.
#[derive(Debug)]
pub struct HostileDisplay;

impl fmt::Display for HostileDisplay {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("Display exploded")
    }
}

impl StdError for HostileDisplay {}

/// A layer with a panicking `Display` over a registered sentinel.
#[derive(Debug)]
pub struct HostileAnnotation(pub AccountError);

impl fmt::Display for HostileAnnotation {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("Display exploded")
    }
}

impl StdError for HostileAnnotation {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}
