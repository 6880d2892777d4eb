//! Collaborator contracts consumed by the versioning core.

pub mod cancellation;
pub mod identifier;
pub mod path_source;
pub mod persistence;

pub use cancellation::{Cancellable, CancellationToken};
pub use identifier::IdentifierService;
pub use path_source::PathSource;
pub use persistence::PersistenceProvider;
