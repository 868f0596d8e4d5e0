//! Types and traits describing the host's data-access surface.
//!
//! The crate never talks to a concrete host. Everything it needs from one is
//! captured here: the shape of the records coming back from compendium reads,
//! and the capabilities it decorates (`CollectionRead`) or drives during the
//! post-load reconciliation pass (`CollectionViews`, `SidebarView`).

use eyre::Result;
use serde::{Deserialize, Serialize};

/// Options for an index request. The only part of the host's option object we
/// care about is the field projection, since the overlay has to make sure the
/// image field is part of it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOptions {
    /// The fields the caller wants in each index entry. `None` means the host
    /// decides on its default (typically minimal) projection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

impl IndexOptions {
    /// Returns options with an explicit field projection.
    pub fn with_fields(fields: impl IntoIterator<Item = impl Into<String>>) -> IndexOptions {
        IndexOptions {
            fields: Some(fields.into_iter().map(Into::into).collect()),
        }
    }
}

/// A partial projection of a document, as returned by a bulk index read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// The record's identifier. Never modified by the overlay.
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    /// The image path. `None` when the projection didn't include it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<String>,

    /// Legacy thumbnail mirror used by older list views. `None` means the host
    /// didn't define the field, and the overlay must not introduce it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,

    /// Second legacy thumbnail mirror, same rules as `thumb`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// The texture of a token prototype.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTexture {
    pub src: String,
}

/// The token-prototype structure nested inside actor documents. Only the
/// texture source matters to us; the host keeps plenty more in here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrototypeToken {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture: Option<TokenTexture>,
}

/// The raw "source snapshot" mirror embedded in a full document. Some host
/// consumers re-derive display data from this instead of the live object, so
/// the overlay has to keep it in step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSource {
    pub img: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prototype_token: Option<PrototypeToken>,
}

/// A full document as returned by a single-document read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    /// The host's document type name, e.g. `"Actor"` or `"Item"`.
    pub document_name: String,

    /// The primary image: an actor's portrait or an item's icon.
    pub img: String,

    /// The raw source snapshot, when the host exposes one.
    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<DocumentSource>,

    /// Present on actor documents, and possibly (vestigially) on others. The
    /// overlay only touches it for actors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prototype_token: Option<PrototypeToken>,
}

impl Document {
    /// Returns true if this is an actor-typed document, i.e. one whose token
    /// prototype should track its portrait.
    pub fn is_actor(&self) -> bool {
        self.document_name == "Actor"
    }
}

/// The read capability of a host collection. This is the seam the overlay
/// decorates: implementations delegate to the host's actual storage, and the
/// overlay wraps them without them knowing.
pub trait CollectionRead {
    /// The collection's identifier, e.g. `"pack.items"`. This is the key used
    /// into the mapping table.
    fn collection_id(&self) -> &str;

    /// Retrieves the collection's index with the given projection options.
    fn get_index(&mut self, options: IndexOptions) -> Result<Vec<IndexEntry>>;

    /// Retrieves a single full document, or `None` if the identifier is
    /// unknown to the collection.
    fn get_document(&mut self, id: &str) -> Result<Option<Document>>;
}

/// The per-collection surface used by the one-time reconciliation pass after
/// the mapping has loaded.
pub trait CollectionViews {
    fn collection_id(&self) -> &str;

    /// Discards the collection's cached index so the next read goes through
    /// the (now active) overlay.
    fn clear_index_cache(&mut self);

    /// Re-renders any currently open viewers of this collection.
    fn render_viewers(&mut self);
}

/// The host's global compendium sidebar.
pub trait SidebarView {
    fn render(&mut self);
}
