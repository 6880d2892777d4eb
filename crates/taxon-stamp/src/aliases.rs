//! Stamp aliases: a later stamp standing in for an earlier primordial one.
//!
//! Aliases are one hop only. A primordial is never itself an alias and an
//! alias is never the primordial of another alias.

use std::collections::HashMap;

use taxon_core::errors::{StampError, TaxonResult};
use taxon_core::models::StampAlias;
use taxon_core::StampSequence;

use crate::registry::StampRegistry;

impl StampRegistry {
    /// Validate and install one alias.
    pub fn add_alias(&self, alias: StampSequence, primordial: StampSequence) -> TaxonResult<()> {
        self.apply_aliases(&[StampAlias { alias, primordial }], || Ok(()))
    }

    /// Validate a batch of aliases, run `persist`, and install the batch.
    ///
    /// All three steps run under the alias lock. When validation or
    /// `persist` fails no alias from the batch is installed.
    pub fn apply_aliases<T, F>(&self, batch: &[StampAlias], persist: F) -> TaxonResult<T>
    where
        F: FnOnce() -> TaxonResult<T>,
    {
        let _guard = self.alias_lock.lock();

        let mut staged: HashMap<StampSequence, StampSequence> = HashMap::new();
        for entry in batch {
            if self.validate_alias(entry.alias, entry.primordial, &staged)? {
                staged.insert(entry.alias, entry.primordial);
            }
        }

        let persisted = persist()?;

        for entry in batch {
            if staged.remove(&entry.alias).is_none() {
                continue;
            }
            self.aliases.insert(entry.alias, entry.primordial);
            self.aliases_by_primordial
                .entry(entry.primordial)
                .or_default()
                .push(entry.alias);
        }
        if !batch.is_empty() {
            tracing::debug!(count = batch.len(), "installed stamp aliases");
        }
        Ok(persisted)
    }

    /// `Ok(true)` when the alias is new, `Ok(false)` when it is already
    /// installed (or staged) with the same primordial.
    fn validate_alias(
        &self,
        alias: StampSequence,
        primordial: StampSequence,
        staged: &HashMap<StampSequence, StampSequence>,
    ) -> TaxonResult<bool> {
        let invalid = |reason: &str| -> TaxonResult<bool> {
            Err(StampError::InvalidAlias {
                alias,
                primordial,
                reason: reason.to_string(),
            }
            .into())
        };

        let (Ok(alias_stamp), Ok(primordial_stamp)) =
            (self.resolve(alias), self.resolve(primordial))
        else {
            return invalid("unknown stamp sequence");
        };
        if alias == primordial {
            return invalid("a stamp cannot alias itself");
        }

        let existing = self
            .aliases
            .get(&alias)
            .map(|p| *p)
            .or_else(|| staged.get(&alias).copied());
        match existing {
            Some(p) if p == primordial => return Ok(false),
            Some(_) => return invalid("alias is already mapped to another primordial"),
            None => {}
        }

        if self.aliases.contains_key(&primordial) || staged.contains_key(&primordial) {
            return invalid("primordial is itself an alias");
        }
        let has_aliases = self
            .aliases_by_primordial
            .get(&alias)
            .is_some_and(|a| !a.is_empty())
            || staged.values().any(|p| *p == alias);
        if has_aliases {
            return invalid("alias is the primordial of other aliases");
        }
        if alias_stamp.status != primordial_stamp.status {
            return invalid("status differs from primordial");
        }
        if !alias_stamp.is_committed() || !primordial_stamp.is_committed() {
            return invalid("uncommitted or canceled stamps cannot be aliased");
        }
        if alias_stamp.time < primordial_stamp.time {
            return invalid("alias precedes its primordial");
        }
        Ok(true)
    }

    /// The primordial `sequence` aliases, or `sequence` itself.
    pub fn primordial_for(&self, sequence: StampSequence) -> StampSequence {
        self.aliases.get(&sequence).map(|p| *p).unwrap_or(sequence)
    }

    pub fn is_alias(&self, sequence: StampSequence) -> bool {
        self.aliases.contains_key(&sequence)
    }

    pub fn aliases_of(&self, primordial: StampSequence) -> Vec<StampSequence> {
        self.aliases_by_primordial
            .get(&primordial)
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    /// Every installed alias, ordered by alias sequence.
    pub fn all_aliases(&self) -> Vec<StampAlias> {
        let mut all: Vec<StampAlias> = self
            .aliases
            .iter()
            .map(|e| StampAlias {
                alias: *e.key(),
                primordial: *e.value(),
            })
            .collect();
        all.sort_by_key(|a| a.alias);
        all
    }
}
