//! Artwork overlay for compendium-style data stores.
//!
//! This crate implements a data-overlay interception pattern: it decorates the
//! two read operations of a host collection (bulk index retrieval and
//! single-document retrieval) so that image fields in the results are replaced
//! from a side lookup table, loaded once at startup. The store itself is never
//! modified, and every failure path degrades to handing the host's data back
//! untouched.
//!
//! Typical wiring, driven by the host's lifecycle:
//!
//! ```no_run
//! use compendium_art::{mapping, ArtModule};
//!
//! // "initializing": create the module and decorate collections before any
//! // reads happen.
//! let module = ArtModule::new();
//! # struct Pack;
//! # impl compendium_art::CollectionRead for Pack {
//! #     fn collection_id(&self) -> &str { "pack.items" }
//! #     fn get_index(
//! #         &mut self,
//! #         _: compendium_art::IndexOptions,
//! #     ) -> eyre::Result<Vec<compendium_art::IndexEntry>> { Ok(vec![]) }
//! #     fn get_document(
//! #         &mut self,
//! #         _: &str,
//! #     ) -> eyre::Result<Option<compendium_art::Document>> { Ok(None) }
//! # }
//! let _pack = module.wrap(Pack);
//!
//! // "ready": load the mapping, then reconcile caches and viewers.
//! module.load_mapping(&mapping::mapping_url("https://host/modules/my-art"));
//! ```

mod bootstrap;
mod host;
pub mod mapping;
mod overlay;

pub use bootstrap::ArtModule;
pub use host::{
    CollectionRead, CollectionViews, Document, DocumentSource, IndexEntry, IndexOptions,
    PrototypeToken, SidebarView, TokenTexture,
};
pub use mapping::{MappingCell, MappingTable, OverrideRecord};
pub use overlay::ArtOverlay;
