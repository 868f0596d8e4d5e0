//! Decorates a collection's read operations with artwork substitution.
//!
//! `ArtOverlay` wraps any `CollectionRead` implementation, delegates every
//! call to it, and rewrites image fields in the results according to the
//! shared mapping table. The underlying store is never written to; records
//! are only mutated in transit. While the table hasn't loaded, the wrapper is
//! a pure pass-through.

use std::sync::Arc;

use eyre::Result;

use crate::{
    host::{CollectionRead, Document, IndexEntry, IndexOptions},
    mapping::{MappingCell, OverrideRecord},
};

/// The name of the image field in the host's index projection.
const IMG_FIELD: &str = "img";

/// A decorating wrapper around a host collection's read capability.
pub struct ArtOverlay<C> {
    inner: C,
    mapping: Arc<MappingCell>,
}

impl<C: CollectionRead> ArtOverlay<C> {
    /// Wraps `inner`, overlaying artwork from `mapping` onto everything it
    /// returns once the mapping has loaded.
    pub fn new(inner: C, mapping: Arc<MappingCell>) -> ArtOverlay<C> {
        ArtOverlay { inner, mapping }
    }

    /// Consumes the wrapper, giving back the undecorated collection.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: CollectionRead> CollectionRead for ArtOverlay<C> {
    fn collection_id(&self) -> &str {
        self.inner.collection_id()
    }

    fn get_index(&mut self, mut options: IndexOptions) -> Result<Vec<IndexEntry>> {
        // The host's minimal projection may not include the image field, and
        // we can't replace a field that was never fetched. This happens even
        // in pass-through mode, so an index cached before the mapping loads
        // still carries the field once the reconciliation pass re-reads it.
        ensure_img_field(&mut options);

        let mut index = self.inner.get_index(options)?;

        let collection_id = self.inner.collection_id();
        if let Some(table) = self.mapping.get() {
            if table.contains_collection(collection_id) {
                for entry in &mut index {
                    if let Some(record) = table.lookup(collection_id, &entry.id) {
                        apply_to_entry(entry, record);
                    }
                }
            }
        }

        Ok(index)
    }

    fn get_document(&mut self, id: &str) -> Result<Option<Document>> {
        let mut doc = self.inner.get_document(id)?;

        if let Some(doc) = doc.as_mut() {
            if let Some(record) = self.mapping.lookup(self.inner.collection_id(), id) {
                apply_to_document(doc, record);
            }
        }

        Ok(doc)
    }
}

/// Makes sure the image field is part of the requested projection. A missing
/// field list becomes one containing just the image field; an explicit list
/// that omits it gets it appended.
fn ensure_img_field(options: &mut IndexOptions) {
    match &mut options.fields {
        Some(fields) => {
            if !fields.iter().any(|field| field == IMG_FIELD) {
                fields.push(IMG_FIELD.to_string());
            }
        }
        None => options.fields = Some(vec![IMG_FIELD.to_string()]),
    }
}

/// Applies an override to a single index entry. The legacy thumbnail mirrors
/// are only updated where the host already defined them.
fn apply_to_entry(entry: &mut IndexEntry, record: &OverrideRecord) {
    let img = match record.image() {
        Some(img) => img,
        None => return,
    };

    entry.img = Some(img.to_string());

    if entry.thumb.is_some() {
        entry.thumb = Some(img.to_string());
    }

    if entry.thumbnail.is_some() {
        entry.thumbnail = Some(img.to_string());
    }
}

/// Applies an override to a full document: the live image, the source
/// snapshot's mirror of it, and, for actors only, the token-prototype texture
/// on both. Every nested assignment is guarded on the structure existing.
fn apply_to_document(doc: &mut Document, record: &OverrideRecord) {
    let img = match record.image() {
        Some(img) => img,
        None => return,
    };

    log::trace!("overlaying art for document '{}'", doc.id);

    doc.img = img.to_string();

    // Keeping the snapshot in step makes the host treat the replacement as
    // the document's native value rather than a transient change.
    if let Some(source) = doc.source.as_mut() {
        source.img = img.to_string();
    }

    // Actors carry their portrait onto the map via the token prototype, which
    // would otherwise keep showing the original image.
    if doc.is_actor() {
        if let Some(texture) = doc
            .prototype_token
            .as_mut()
            .and_then(|token| token.texture.as_mut())
        {
            texture.src = img.to_string();
        }

        if let Some(texture) = doc
            .source
            .as_mut()
            .and_then(|source| source.prototype_token.as_mut())
            .and_then(|token| token.texture.as_mut())
        {
            texture.src = img.to_string();
        }
    }
}
