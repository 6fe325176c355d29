//! Resolves arbitrary errors to a registry entry and assembles the response.
//!
//! `classify` is total: whatever shape the input has, it returns a
//! well-formed body. It performs no I/O and emits no logs or metrics; the
//! HTTP boundary takes care of that.

use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};

use crate::domain::{
    AccessTokenError, AccountError, CoreError, Detailed, ErrorCodeEntry, ErrorKey, GeneralError,
    MockHsmError, QueryError, ResponseBody, SignersError, TxBuildError, TxSubmitError,
};

use super::registry::{self, DEFAULT_ENTRY};

/// Upper bound on `source()` hops followed before giving up on a chain.
pub const MAX_CHAIN_DEPTH: usize = 64;

/// Text logged in place of an error whose `Display` panicked.
pub const UNRENDERABLE: &str = "<error display panicked>";

/// Classifies `err` into a response body and the entry it resolved to.
///
/// The root cause selects the entry; detail text comes from the outermost
/// detail layer of the full chain. Unregistered roots, and any panic
/// raised by foreign error code while inspecting the chain, resolve to
/// [`DEFAULT_ENTRY`].
pub fn classify(err: &(dyn StdError + 'static)) -> (ResponseBody, ErrorCodeEntry) {
    panic::catch_unwind(AssertUnwindSafe(|| {
        let entry = identify(root_cause(err))
            .and_then(registry::lookup)
            .unwrap_or(DEFAULT_ENTRY);
        let body = ResponseBody::new(&entry, detail(err), registry::is_temporary(entry.code));
        (body, entry)
    }))
    .unwrap_or_else(|_| {
        let body = ResponseBody::new(
            &DEFAULT_ENTRY,
            String::new(),
            registry::is_temporary(DEFAULT_ENTRY.code),
        );
        (body, DEFAULT_ENTRY)
    })
}

/// Formats `err` for logging. A panicking `Display` renders as
/// [`UNRENDERABLE`].
pub fn render(err: &(dyn StdError + 'static)) -> String {
    panic::catch_unwind(AssertUnwindSafe(|| err.to_string()))
        .unwrap_or_else(|_| UNRENDERABLE.to_string())
}

/// Iterates `err` and its sources, outermost first, bounded by
/// [`MAX_CHAIN_DEPTH`].
pub fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&layer| layer.source()).take(MAX_CHAIN_DEPTH + 1)
}

/// The terminal error of the chain. A chain that never terminates resolves
/// to the last layer visited.
pub fn root_cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    chain(err).last().unwrap_or(err)
}

/// Detail text from the outermost detail layer, or an empty string.
pub fn detail(err: &(dyn StdError + 'static)) -> String {
    chain(err)
        .find_map(|layer| layer.downcast_ref::<Detailed>()?.detail_text())
        .map(str::to_owned)
        .unwrap_or_default()
}

/// Maps a root cause onto its canonical key, if it is a known sentinel.
pub fn identify(root: &(dyn StdError + 'static)) -> Option<ErrorKey> {
    if root.is::<tokio::time::error::Elapsed>() || root.is::<tower::timeout::error::Elapsed>() {
        return Some(ErrorKey::General(GeneralError::DeadlineExceeded));
    }

    sentinel::<GeneralError>(root)
        .or_else(|| sentinel::<CoreError>(root))
        .or_else(|| sentinel::<SignersError>(root))
        .or_else(|| sentinel::<AccessTokenError>(root))
        .or_else(|| sentinel::<QueryError>(root))
        .or_else(|| sentinel::<TxBuildError>(root))
        .or_else(|| sentinel::<TxSubmitError>(root))
        .or_else(|| sentinel::<AccountError>(root))
        .or_else(|| sentinel::<MockHsmError>(root))
}

fn sentinel<E>(root: &(dyn StdError + 'static)) -> Option<ErrorKey>
where
    E: StdError + Copy + Into<ErrorKey> + 'static,
{
    root.downcast_ref::<E>().map(|&err| err.into())
}
