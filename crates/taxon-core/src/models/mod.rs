//! Value types shared by every subsystem.

pub mod chronicle;
pub mod commit;
pub mod coordinate;
pub mod path;
pub mod stamp;

pub use chronicle::{Characteristic, Chronicle, ChronologyKind, PayloadKind, Version, VersionPayload};
pub use commit::{CommitRecord, StampAlias, StampComment};
pub use coordinate::{PremiseType, StampCoordinate, StampPrecedence, TaxonomyCoordinate};
pub use path::{PathOrigin, PathRecord, RelativePosition, StampPosition};
pub use stamp::{Stamp, Status};
