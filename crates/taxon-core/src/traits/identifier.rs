use uuid::Uuid;

use crate::errors::TaxonResult;
use crate::ids::Nid;

/// Maps stable UUIDs to integer surrogates.
///
/// Both directions are total bijections once an identifier is registered.
/// The versioning core only consumes this contract; assigning a nid to a
/// UUID seen for the first time is the service's business.
pub trait IdentifierService: Send + Sync {
    fn nid_for_uuid(&self, uuid: &Uuid) -> TaxonResult<Nid>;
    fn uuid_for_nid(&self, nid: Nid) -> TaxonResult<Uuid>;
}
