//! Test utilities: error shapes the classifier has to survive.
//!
//! These stand in for errors produced by collaborating subsystems, including
//! hostile ones that a naive classifier would mishandle.

pub mod fixtures;

pub use fixtures::{
    BatchRejected, CyclicError, HostileAnnotation, HostileDisplay, PanickingSource, ReserveError,
};
