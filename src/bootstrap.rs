//! Wires the overlay into the host's lifecycle.
//!
//! The host signals "initializing" and "ready". On the first, it constructs an
//! `ArtModule` and wraps its collections; on the second, it loads the mapping
//! (inline or on a background thread) and runs the one-time reconciliation
//! pass, which flushes any index cached during the pass-through window and
//! asks open viewers to redraw.

use std::sync::Arc;
use std::thread::JoinHandle;

use crate::{
    host::{CollectionRead, CollectionViews, SidebarView},
    mapping::{self, MappingCell},
    overlay::ArtOverlay,
};

/// The process-scoped handle tying the loader and the overlays together.
///
/// All overlays created through one module share one mapping cell, so a
/// single load activates every one of them at once.
#[derive(Clone, Default)]
pub struct ArtModule {
    mapping: Arc<MappingCell>,
}

impl ArtModule {
    /// Creates a module with an empty, pending mapping cell. Call on the
    /// host's "initializing" signal, before any data is requested.
    pub fn new() -> ArtModule {
        ArtModule {
            mapping: Arc::new(MappingCell::new()),
        }
    }

    /// The shared mapping cell.
    pub fn mapping(&self) -> &Arc<MappingCell> {
        &self.mapping
    }

    /// Wraps a collection's read capability with the overlay. Until the
    /// mapping loads, the wrapper passes everything through untouched.
    pub fn wrap<C: CollectionRead>(&self, collection: C) -> ArtOverlay<C> {
        ArtOverlay::new(collection, Arc::clone(&self.mapping))
    }

    /// Fetches and parses the mapping resource, filling the shared cell on
    /// success. A failure is logged and leaves the cell empty for the rest of
    /// the process: the overlay is cosmetic and must never take the host down
    /// with it.
    pub fn load_mapping(&self, url: &str) {
        match mapping::fetch_mapping(url) {
            Ok(table) => {
                log::info!(
                    "art mapping loaded ({} collection(s)); overlay active",
                    table.collection_ids().len()
                );

                self.mapping.fill(table);
            }

            Err(error) => {
                log::warn!("unable to load art mapping, staying in pass-through: {error:?}");
            }
        }
    }

    /// Runs `load_mapping` on a background thread so the host's startup can
    /// carry on. Join the handle (or just observe `mapping().is_ready()`)
    /// before reconciling.
    pub fn spawn_load(&self, url: String) -> JoinHandle<()> {
        let module = self.clone();

        std::thread::spawn(move || {
            module.load_mapping(&url);
        })
    }

    /// The one-time pass after the load finishes: every collection the table
    /// covers gets its cached index discarded (it may have been built before
    /// the table was ready) and its open viewers re-rendered, and the sidebar
    /// is redrawn. Run exactly once; there is no recurring invalidation.
    pub fn reconcile<'a, I>(&self, collections: I, sidebar: &mut impl SidebarView)
    where
        I: IntoIterator<Item = &'a mut dyn CollectionViews>,
    {
        if let Some(table) = self.mapping.get() {
            for collection in collections {
                if table.contains_collection(collection.collection_id()) {
                    log::info!(
                        "refreshing collection '{}' after art mapping load",
                        collection.collection_id()
                    );

                    collection.clear_index_cache();
                    collection.render_viewers();
                }
            }
        }

        sidebar.render();
    }
}
