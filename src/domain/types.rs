//! Domain types for error classification and the JSON shapes the API emits.

use std::ops::RangeInclusive;

use serde::Serialize;

use super::error::{
    AccessTokenError, AccountError, CoreError, GeneralError, MockHsmError, QueryError,
    SignersError, TxBuildError, TxSubmitError,
};

/// Subsystem family owning a reserved range of error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorFamily {
    General,
    Core,
    Signers,
    AccessToken,
    Query,
    TxBuild,
    TxSubmit,
    Account,
    MockHsm,
}

impl ErrorFamily {
    pub const ALL: [ErrorFamily; 9] = [
        ErrorFamily::General,
        ErrorFamily::Core,
        ErrorFamily::Signers,
        ErrorFamily::AccessToken,
        ErrorFamily::Query,
        ErrorFamily::TxBuild,
        ErrorFamily::TxSubmit,
        ErrorFamily::Account,
        ErrorFamily::MockHsm,
    ];

    /// Numeric code range reserved for this family.
    pub const fn range(self) -> RangeInclusive<u16> {
        match self {
            ErrorFamily::General => 0..=99,
            ErrorFamily::Core => 100..=199,
            ErrorFamily::Signers => 200..=299,
            ErrorFamily::AccessToken => 300..=399,
            ErrorFamily::Query => 600..=699,
            ErrorFamily::TxBuild => 700..=729,
            ErrorFamily::TxSubmit => 730..=759,
            ErrorFamily::Account => 760..=799,
            ErrorFamily::MockHsm => 800..=899,
        }
    }
}

/// Canonical identity of a root cause: one sentinel variant of one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKey {
    General(GeneralError),
    Core(CoreError),
    Signers(SignersError),
    AccessToken(AccessTokenError),
    Query(QueryError),
    TxBuild(TxBuildError),
    TxSubmit(TxSubmitError),
    Account(AccountError),
    MockHsm(MockHsmError),
}

impl ErrorKey {
    pub const fn family(self) -> ErrorFamily {
        match self {
            ErrorKey::General(_) => ErrorFamily::General,
            ErrorKey::Core(_) => ErrorFamily::Core,
            ErrorKey::Signers(_) => ErrorFamily::Signers,
            ErrorKey::AccessToken(_) => ErrorFamily::AccessToken,
            ErrorKey::Query(_) => ErrorFamily::Query,
            ErrorKey::TxBuild(_) => ErrorFamily::TxBuild,
            ErrorKey::TxSubmit(_) => ErrorFamily::TxSubmit,
            ErrorKey::Account(_) => ErrorFamily::Account,
            ErrorKey::MockHsm(_) => ErrorFamily::MockHsm,
        }
    }
}

macro_rules! impl_key_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ErrorKey {
                fn from(err: $ty) -> Self {
                    ErrorKey::$variant(err)
                }
            }
        )*
    };
}

impl_key_from! {
    General => GeneralError,
    Core => CoreError,
    Signers => SignersError,
    AccessToken => AccessTokenError,
    Query => QueryError,
    TxBuild => TxBuildError,
    TxSubmit => TxSubmitError,
    Account => AccountError,
    MockHsm => MockHsmError,
}

/// Response template for one registered error.
///
/// `http_status` travels out of band on the status line and is never part
/// of the JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorCodeEntry {
    #[serde(skip)]
    pub http_status: u16,
    pub code: &'static str,
    pub message: &'static str,
}

impl ErrorCodeEntry {
    pub const fn new(http_status: u16, code: &'static str, message: &'static str) -> Self {
        Self {
            http_status,
            code,
            message,
        }
    }

    /// Numeric part of the code (`"CH761"` -> `761`).
    pub fn numeric(&self) -> Option<u16> {
        self.code.strip_prefix("CH")?.parse().ok()
    }
}

/// JSON error body sent to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseBody {
    pub code: &'static str,
    pub message: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
    pub temporary: bool,
}

impl ResponseBody {
    pub fn new(entry: &ErrorCodeEntry, detail: String, temporary: bool) -> Self {
        Self {
            code: entry.code,
            message: entry.message,
            detail,
            temporary,
        }
    }
}

/// One row of the published error catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub family: ErrorFamily,
    pub status: u16,
    pub code: &'static str,
    pub message: &'static str,
    pub temporary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_ranges_do_not_overlap() {
        for (i, a) in ErrorFamily::ALL.iter().enumerate() {
            for b in &ErrorFamily::ALL[i + 1..] {
                let (ra, rb) = (a.range(), b.range());
                assert!(
                    ra.end() < rb.start() || rb.end() < ra.start(),
                    "{a:?} overlaps {b:?}"
                );
            }
        }
    }

    #[test]
    fn test_key_family() {
        let key = ErrorKey::from(AccountError::Reserved);
        assert_eq!(key, ErrorKey::Account(AccountError::Reserved));
        assert_eq!(key.family(), ErrorFamily::Account);
        assert_eq!(
            ErrorKey::from(MockHsmError::InvalidAfter).family(),
            ErrorFamily::MockHsm
        );
    }

    #[test]
    fn test_entry_numeric() {
        assert_eq!(ErrorCodeEntry::new(400, "CH761", "x").numeric(), Some(761));
        assert_eq!(ErrorCodeEntry::new(500, "CH000", "x").numeric(), Some(0));
        assert_eq!(ErrorCodeEntry::new(400, "E-761", "x").numeric(), None);
    }

    #[test]
    fn test_response_body_omits_empty_detail() {
        let entry = ErrorCodeEntry::new(400, "CH201", "Invalid xpub format");
        let body = ResponseBody::new(&entry, String::new(), false);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "code": "CH201",
                "message": "Invalid xpub format",
                "temporary": false
            })
        );

        let body = ResponseBody::new(&entry, "xpub 2 is not base58".to_string(), false);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["detail"], "xpub 2 is not base58");
    }

    #[test]
    fn test_entry_serialization_skips_status() {
        let entry = ErrorCodeEntry::new(408, "CH001", "Request timed out");
        let json = serde_json::to_value(entry).unwrap();
        assert!(json.get("http_status").is_none());
        assert_eq!(json["code"], "CH001");
    }
}
