//! Canonical sentinel errors for every subsystem family, plus the wrapping
//! layer subsystems use to annotate them on the way up.
//!
//! Each family is a `thiserror` enum of unit variants. A variant is a
//! sentinel: a comparable identity that the registry can key on. Subsystems
//! return these (directly, wrapped in their own error types through
//! `#[source]`, or through [`Detailed`]) and the classifier resolves the
//! chain back down to the sentinel.

use std::borrow::Cow;
use std::error::Error as StdError;

use thiserror::Error;

/// Boxed error as produced by middleware and collaborator boundaries.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// General, transport and data-store failures (CH000-CH099).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneralError {
    #[error("deadline exceeded")]
    DeadlineExceeded,
    #[error("user input not found")]
    UserInputNotFound,
    #[error("bad request body")]
    BadRequest,
    #[error("bad request header")]
    BadRequestHeader,
    #[error("not found")]
    NotFound,
    #[error("request limit exceeded")]
    RateLimited,
    #[error("leader election in progress")]
    LeaderElection,
    #[error("request could not be authenticated")]
    NotAuthenticated,
}

/// Core configuration and block signing (CH100-CH199).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreError {
    #[error("core is not configured")]
    Unconfigured,
    #[error("core is already configured")]
    AlreadyConfigured,
    #[error("generator returned an invalid response")]
    BadGenerator,
    #[error("invalid block xpub")]
    BadBlockPub,
    #[error("peer is on a different network")]
    WrongNetwork,
    #[error("requested height is too far ahead")]
    TheDistantFuture,
    #[error("invalid block signer url")]
    BadSignerUrl,
    #[error("invalid block signer pubkey")]
    BadSignerPubkey,
    #[error("quorum must be greater than 0 if there are signers")]
    BadQuorum,
    #[error("reset called on a production system")]
    ProdReset,
    #[error("no client tokens")]
    NoClientTokens,
    #[error("block has a consensus change")]
    ConsensusChange,
}

/// Signer management (CH200-CH299).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignersError {
    #[error("quorum must be greater than 1 and less than or equal to the length of xpubs")]
    BadQuorum,
    #[error("invalid xpub format")]
    BadXPub,
    #[error("at least one xpub is required")]
    NoXPubs,
    #[error("retrieved type does not match expected type")]
    BadType,
}

/// Access tokens (CH300-CH399).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessTokenError {
    #[error("invalid access token id")]
    BadId,
    #[error("type must be client or network")]
    BadType,
    #[error("duplicate access token id")]
    DuplicateId,
    #[error("cannot delete the token used to authenticate the request")]
    CurrentToken,
}

/// Query and filter evaluation (CH600-CH699).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryError {
    #[error("malformed pagination parameter after")]
    BadAfter,
    #[error("wrong number of parameters to query")]
    ParameterCountMismatch,
    #[error("invalid query filter")]
    BadFilter,
}

/// Transaction build (CH700-CH729).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxBuildError {
    #[error("transaction reference data does not match previous template's reference data")]
    BadRefData,
    #[error("invalid action type")]
    BadActionType,
    #[error("invalid alias")]
    BadAlias,
    #[error("invalid action")]
    BadAction,
}

/// Transaction submission (CH730-CH759).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxSubmitError {
    #[error("missing raw tx")]
    MissingRawTx,
    #[error("too many signing instructions in template")]
    BadInstructionCount,
    #[error("invalid tx input index")]
    BadTxInputIdx,
    #[error("invalid witness component")]
    BadWitnessComponent,
    #[error("transaction rejected")]
    Rejected,
    #[error("transaction lacks sighash commitment")]
    NoTxSighashCommitment,
}

/// Account actions (CH760-CH799).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountError {
    #[error("insufficient funds")]
    Insufficient,
    #[error("reservation found outputs already reserved")]
    Reserved,
}

/// Mock HSM key storage (CH800-CH899).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockHsmError {
    #[error("duplicate key alias")]
    DuplicateKeyAlias,
    #[error("invalid after")]
    InvalidAfter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayerKind {
    Annotation,
    Detail,
}

/// A wrapping layer around an underlying error.
///
/// An annotation only adds context to the message. A detail layer also
/// carries free-form text meant for the API client; the outermost detail
/// layer in a chain wins.
#[derive(Error, Debug)]
#[error("{text}: {source}")]
pub struct Detailed {
    text: Cow<'static, str>,
    kind: LayerKind,
    source: BoxError,
}

impl Detailed {
    /// Wraps `source` with client-facing detail text.
    pub fn detail(source: impl Into<BoxError>, detail: impl Into<Cow<'static, str>>) -> Self {
        Self {
            text: detail.into(),
            kind: LayerKind::Detail,
            source: source.into(),
        }
    }

    /// Wraps `source` with an annotation that does not reach the client.
    pub fn annotate(source: impl Into<BoxError>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            text: message.into(),
            kind: LayerKind::Annotation,
            source: source.into(),
        }
    }

    /// Detail text carried by this layer, if it is a non-empty detail layer.
    pub fn detail_text(&self) -> Option<&str> {
        match self.kind {
            LayerKind::Detail if !self.text.is_empty() => Some(&self.text),
            _ => None,
        }
    }
}

/// Wrapping helpers available on every sendable error.
pub trait ErrorExt: StdError + Send + Sync + Sized + 'static {
    fn with_detail(self, detail: impl Into<Cow<'static, str>>) -> Detailed {
        Detailed::detail(self, detail)
    }

    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Detailed {
        Detailed::annotate(self, message)
    }
}

impl<E: StdError + Send + Sync + 'static> ErrorExt for E {}

/// Wrapping helpers on `Result`, applied to the error side.
pub trait ResultExt<T> {
    fn with_detail(self, detail: impl Into<Cow<'static, str>>) -> Result<T, Detailed>;

    fn wrap_err(self, message: impl Into<Cow<'static, str>>) -> Result<T, Detailed>;
}

impl<T, E: StdError + Send + Sync + 'static> ResultExt<T> for Result<T, E> {
    fn with_detail(self, detail: impl Into<Cow<'static, str>>) -> Result<T, Detailed> {
        self.map_err(|err| Detailed::detail(err, detail))
    }

    fn wrap_err(self, message: impl Into<Cow<'static, str>>) -> Result<T, Detailed> {
        self.map_err(|err| Detailed::annotate(err, message))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
