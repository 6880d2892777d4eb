//! Stable error code strings for logs and CLI exit reports.

/// Every error enum implements this to expose a structured code.
pub trait TaxonErrorCode {
    /// Returns the code string (e.g., "UNKNOWN_STAMP").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const UNKNOWN_STAMP: &str = "UNKNOWN_STAMP";
pub const INVALID_ALIAS: &str = "INVALID_ALIAS";
pub const STAMP_ERROR: &str = "STAMP_ERROR";
pub const INVALID_TIME: &str = "INVALID_TIME";
pub const PATH_ERROR: &str = "PATH_ERROR";
pub const CONTRADICTION: &str = "CONTRADICTION";
pub const CHRONICLE_ERROR: &str = "CHRONICLE_ERROR";
pub const COMMIT_ERROR: &str = "COMMIT_ERROR";
pub const COMMIT_PERSISTENCE_FAILED: &str = "COMMIT_PERSISTENCE_FAILED";
pub const UNSUPPORTED_OBJECT_TYPE: &str = "UNSUPPORTED_OBJECT_TYPE";
pub const IBDF_ERROR: &str = "IBDF_ERROR";
pub const TAXONOMY_ERROR: &str = "TAXONOMY_ERROR";
pub const DIFFER_ERROR: &str = "DIFFER_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONCURRENCY_ERROR: &str = "CONCURRENCY_ERROR";
pub const CANCELLED: &str = "CANCELLED";
