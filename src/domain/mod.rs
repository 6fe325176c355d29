//! Domain layer: sentinel errors, wrapping helpers and response types.

pub mod error;
pub mod types;

pub use error::{
    AccessTokenError, AccountError, BoxError, ConfigError, CoreError, Detailed, ErrorExt,
    GeneralError, MockHsmError, QueryError, ResultExt, SignersError, TxBuildError, TxSubmitError,
};
pub use types::{CatalogEntry, ErrorCodeEntry, ErrorFamily, ErrorKey, ResponseBody};
