//! Process-wide error registry.
//!
//! The table below is the single source of truth for published error codes.
//! A code's meaning never changes once published; new conditions take an
//! unused code inside their family's range.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::domain::{
    AccessTokenError, AccountError, CatalogEntry, CoreError, ErrorCodeEntry, ErrorFamily,
    ErrorKey, GeneralError, MockHsmError, QueryError, SignersError, TxBuildError, TxSubmitError,
};

/// Entry used whenever no specific entry applies.
pub const DEFAULT_ENTRY: ErrorCodeEntry = ErrorCodeEntry::new(500, "CH000", "API Error");

/// Codes for which a client retry may plausibly succeed.
const TEMPORARY_CODES: &[&str] = &[
    "CH000", // internal server error
    "CH001", // request timed out
    "CH761", // outputs currently reserved
];

const fn entry(
    key: ErrorKey,
    http_status: u16,
    code: &'static str,
    message: &'static str,
) -> (ErrorKey, ErrorCodeEntry) {
    (key, ErrorCodeEntry::new(http_status, code, message))
}

#[rustfmt::skip]
static TABLE: &[(ErrorKey, ErrorCodeEntry)] = &[
    // General (0xx)
    entry(ErrorKey::General(GeneralError::DeadlineExceeded), 408, "CH001", "Request timed out"),
    entry(ErrorKey::General(GeneralError::UserInputNotFound), 400, "CH002", "Not found"),
    entry(ErrorKey::General(GeneralError::BadRequest), 400, "CH003", "Invalid request body"),
    entry(ErrorKey::General(GeneralError::BadRequestHeader), 400, "CH004", "Invalid request header"),
    entry(ErrorKey::General(GeneralError::NotFound), 404, "CH006", "Not found"),
    entry(ErrorKey::General(GeneralError::RateLimited), 429, "CH007", "Request limit exceeded"),
    entry(ErrorKey::General(GeneralError::LeaderElection), 503, "CH008", "Electing a new leader for the core; try again soon"),
    entry(ErrorKey::General(GeneralError::NotAuthenticated), 401, "CH009", "Request could not be authenticated"),

    // Core (1xx)
    entry(ErrorKey::Core(CoreError::Unconfigured), 400, "CH100", "This core still needs to be configured"),
    entry(ErrorKey::Core(CoreError::AlreadyConfigured), 400, "CH101", "This core has already been configured"),
    entry(ErrorKey::Core(CoreError::BadGenerator), 400, "CH102", "Generator URL returned an invalid response"),
    entry(ErrorKey::Core(CoreError::BadBlockPub), 400, "CH103", "Provided Block XPub is invalid"),
    entry(ErrorKey::Core(CoreError::WrongNetwork), 502, "CH104", "A peer core is operating on a different blockchain network"),
    entry(ErrorKey::Core(CoreError::TheDistantFuture), 400, "CH105", "Requested height is too far ahead"),
    entry(ErrorKey::Core(CoreError::BadSignerUrl), 400, "CH106", "Block signer URL is invalid"),
    entry(ErrorKey::Core(CoreError::BadSignerPubkey), 400, "CH107", "Block signer pubkey is invalid"),
    entry(ErrorKey::Core(CoreError::BadQuorum), 400, "CH108", "Quorum must be greater than 0 if there are signers"),
    entry(ErrorKey::Core(CoreError::ProdReset), 400, "CH110", "Reset can only be called in a development system"),
    entry(ErrorKey::Core(CoreError::NoClientTokens), 400, "CH120", "Cannot enable client authentication with no client tokens"),
    entry(ErrorKey::Core(CoreError::ConsensusChange), 400, "CH150", "Refuse to sign block with consensus change"),

    // Signers (2xx)
    entry(ErrorKey::Signers(SignersError::BadQuorum), 400, "CH200", "Quorum must be greater than 1 and less than or equal to the length of xpubs"),
    entry(ErrorKey::Signers(SignersError::BadXPub), 400, "CH201", "Invalid xpub format"),
    entry(ErrorKey::Signers(SignersError::NoXPubs), 400, "CH202", "At least one xpub is required"),
    entry(ErrorKey::Signers(SignersError::BadType), 400, "CH203", "Retrieved type does not match expected type"),

    // Access tokens (3xx)
    entry(ErrorKey::AccessToken(AccessTokenError::BadId), 400, "CH300", "Malformed or empty access token id"),
    entry(ErrorKey::AccessToken(AccessTokenError::BadType), 400, "CH301", "Access tokens must be type client or network"),
    entry(ErrorKey::AccessToken(AccessTokenError::DuplicateId), 400, "CH302", "Access token id is already in use"),
    entry(ErrorKey::AccessToken(AccessTokenError::CurrentToken), 400, "CH310", "The access token used to authenticate this request cannot be deleted"),

    // Query (6xx)
    entry(ErrorKey::Query(QueryError::BadAfter), 400, "CH600", "Malformed pagination parameter `after`"),
    entry(ErrorKey::Query(QueryError::ParameterCountMismatch), 400, "CH601", "Incorrect number of parameters to filter"),
    entry(ErrorKey::Query(QueryError::BadFilter), 400, "CH602", "Malformed query filter"),

    // Transaction build (70x)
    entry(ErrorKey::TxBuild(TxBuildError::BadRefData), 400, "CH700", "Reference data does not match previous transaction's reference data"),
    entry(ErrorKey::TxBuild(TxBuildError::BadActionType), 400, "CH701", "Invalid action type"),
    entry(ErrorKey::TxBuild(TxBuildError::BadAlias), 400, "CH702", "Invalid alias on action"),
    entry(ErrorKey::TxBuild(TxBuildError::BadAction), 400, "CH703", "Invalid action object"),

    // Transaction submit (73x)
    entry(ErrorKey::TxSubmit(TxSubmitError::MissingRawTx), 400, "CH730", "Missing raw transaction"),
    entry(ErrorKey::TxSubmit(TxSubmitError::BadInstructionCount), 400, "CH731", "Too many signing instructions in template for transaction"),
    entry(ErrorKey::TxSubmit(TxSubmitError::BadTxInputIdx), 400, "CH732", "Invalid transaction input index"),
    entry(ErrorKey::TxSubmit(TxSubmitError::BadWitnessComponent), 400, "CH733", "Invalid witness component"),
    entry(ErrorKey::TxSubmit(TxSubmitError::Rejected), 400, "CH735", "Transaction rejected"),
    entry(ErrorKey::TxSubmit(TxSubmitError::NoTxSighashCommitment), 400, "CH736", "Transaction is not final, additional actions still allowed"),

    // Account actions (76x)
    entry(ErrorKey::Account(AccountError::Insufficient), 400, "CH760", "Insufficient funds for tx"),
    entry(ErrorKey::Account(AccountError::Reserved), 400, "CH761", "Some outputs are reserved; try again"),

    // Mock HSM (80x)
    entry(ErrorKey::MockHsm(MockHsmError::DuplicateKeyAlias), 400, "CH800", "Duplicate alias for Mock HSM key"),
    entry(ErrorKey::MockHsm(MockHsmError::InvalidAfter), 400, "CH801", "Invalid `after` in query"),
];

static INDEX: LazyLock<HashMap<ErrorKey, ErrorCodeEntry>> =
    LazyLock::new(|| TABLE.iter().copied().collect());

/// Looks up the entry registered for `key`.
pub fn lookup(key: ErrorKey) -> Option<ErrorCodeEntry> {
    INDEX.get(&key).copied()
}

/// All registered entries in declaration order.
pub fn entries() -> impl Iterator<Item = (ErrorKey, ErrorCodeEntry)> {
    TABLE.iter().copied()
}

pub fn find_by_code(code: &str) -> Option<(ErrorKey, ErrorCodeEntry)> {
    entries().find(|(_, entry)| entry.code == code)
}

/// Whether responses carrying `code` advise the client to retry.
pub fn is_temporary(code: &str) -> bool {
    TEMPORARY_CODES.contains(&code)
}

/// The published catalogue: the default entry followed by every registered
/// entry, each with its family and retry advice.
pub fn catalog() -> Vec<CatalogEntry> {
    let row = |family: ErrorFamily, entry: ErrorCodeEntry| CatalogEntry {
        family,
        status: entry.http_status,
        code: entry.code,
        message: entry.message,
        temporary: is_temporary(entry.code),
    };

    std::iter::once(row(ErrorFamily::General, DEFAULT_ENTRY))
        .chain(entries().map(|(key, entry)| row(key.family(), entry)))
        .collect()
}
