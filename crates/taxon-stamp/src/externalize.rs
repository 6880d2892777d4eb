//! Conversion between registry stamps and their wire form.

use taxon_core::models::{Stamp, StampAlias, StampComment};
use taxon_core::traits::IdentifierService;
use taxon_core::{StampSequence, TaxonResult};
use taxon_ibdf::{ExternalStamp, ExternalStampAlias, ExternalStampComment};

use crate::StampRegistry;

impl StampRegistry {
    pub fn to_external(
        &self,
        sequence: StampSequence,
        ids: &dyn IdentifierService,
    ) -> TaxonResult<ExternalStamp> {
        let stamp = self.resolve(sequence)?;
        Ok(ExternalStamp {
            status: stamp.status,
            time: stamp.time,
            author: ids.uuid_for_nid(stamp.author)?,
            module: ids.uuid_for_nid(stamp.module)?,
            path: ids.uuid_for_nid(stamp.path)?,
        })
    }

    /// Register (or find) the local sequence for a wire stamp.
    pub fn from_external(
        &self,
        external: &ExternalStamp,
        ids: &dyn IdentifierService,
    ) -> TaxonResult<StampSequence> {
        let stamp = Stamp::new(
            external.status,
            external.time,
            ids.nid_for_uuid(&external.author)?,
            ids.nid_for_uuid(&external.module)?,
            ids.nid_for_uuid(&external.path)?,
        );
        Ok(self.get_stamp_sequence(&stamp))
    }

    pub fn alias_to_external(
        &self,
        alias: &StampAlias,
        ids: &dyn IdentifierService,
    ) -> TaxonResult<ExternalStampAlias> {
        Ok(ExternalStampAlias {
            alias: self.to_external(alias.alias, ids)?,
            primordial: self.to_external(alias.primordial, ids)?,
        })
    }

    pub fn alias_from_external(
        &self,
        external: &ExternalStampAlias,
        ids: &dyn IdentifierService,
    ) -> TaxonResult<StampAlias> {
        Ok(StampAlias {
            alias: self.from_external(&external.alias, ids)?,
            primordial: self.from_external(&external.primordial, ids)?,
        })
    }

    pub fn comment_to_external(
        &self,
        comment: &StampComment,
        ids: &dyn IdentifierService,
    ) -> TaxonResult<ExternalStampComment> {
        Ok(ExternalStampComment {
            stamp: self.to_external(comment.stamp, ids)?,
            comment: comment.comment.clone(),
        })
    }

    /// Register the wire stamp and attach the comment to it.
    pub fn import_comment(
        &self,
        external: &ExternalStampComment,
        ids: &dyn IdentifierService,
    ) -> TaxonResult<StampSequence> {
        let sequence = self.from_external(&external.stamp, ids)?;
        self.set_comment(sequence, external.comment.clone())?;
        Ok(sequence)
    }
}
