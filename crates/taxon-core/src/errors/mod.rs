//! Error handling for taxon.
//! One error enum per subsystem, `thiserror` only, aggregated by [`TaxonError`].

pub mod chronicle_error;
pub mod commit_error;
pub mod config_error;
pub mod differ_error;
pub mod error_code;
pub mod ibdf_error;
pub mod path_error;
pub mod stamp_error;
pub mod storage_error;
pub mod taxonomy_error;

pub use chronicle_error::ChronicleError;
pub use commit_error::CommitError;
pub use config_error::ConfigError;
pub use differ_error::DifferError;
pub use error_code::TaxonErrorCode;
pub use ibdf_error::IbdfError;
pub use path_error::PathError;
pub use stamp_error::StampError;
pub use storage_error::StorageError;
pub use taxonomy_error::TaxonomyError;

/// How a caller should treat an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A caller bug or an integrity failure. Do not retry.
    Fatal,
    /// The caller may pick a resolution policy and continue.
    Recoverable,
    /// Only the current record is lost; the surrounding stream may continue.
    SkipRecord,
}

/// Top-level error aggregating every subsystem via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum TaxonError {
    #[error("stamp error: {0}")]
    Stamp(#[from] StampError),

    #[error("path error: {0}")]
    Path(#[from] PathError),

    #[error("chronicle error: {0}")]
    Chronicle(#[from] ChronicleError),

    #[error("commit error: {0}")]
    Commit(#[from] CommitError),

    #[error("ibdf error: {0}")]
    Ibdf(#[from] IbdfError),

    #[error("taxonomy error: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("differ error: {0}")]
    Differ(#[from] DifferError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),

    #[error("operation cancelled")]
    Cancelled,
}

/// Convenience alias used throughout the workspace.
pub type TaxonResult<T> = Result<T, TaxonError>;

impl TaxonError {
    pub fn severity(&self) -> Severity {
        match self {
            TaxonError::Chronicle(ChronicleError::Contradiction { .. }) => Severity::Recoverable,
            TaxonError::Ibdf(IbdfError::UnsupportedObjectType { .. }) => Severity::SkipRecord,
            TaxonError::Cancelled => Severity::Recoverable,
            _ => Severity::Fatal,
        }
    }
}

impl TaxonErrorCode for TaxonError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Stamp(e) => e.error_code(),
            Self::Path(e) => e.error_code(),
            Self::Chronicle(e) => e.error_code(),
            Self::Commit(e) => e.error_code(),
            Self::Ibdf(e) => e.error_code(),
            Self::Taxonomy(e) => e.error_code(),
            Self::Differ(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::ConcurrencyError(_) => error_code::CONCURRENCY_ERROR,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
