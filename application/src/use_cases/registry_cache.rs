//! Tool registry cache
//!
//! Holds the current [`ToolCatalog`] snapshot. A refresh builds a whole new
//! catalog from the tool host and swaps the pointer; readers that already
//! hold an `Arc` keep the snapshot they started with.

use crate::ports::tool_transport::TransportError;
use crate::use_cases::session::ToolSessionHandle;
use conductor_domain::ToolCatalog;
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Default)]
pub struct ToolRegistryCache {
    catalog: RwLock<Arc<ToolCatalog>>,
}

impl ToolRegistryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current read-only snapshot
    pub fn get(&self) -> Arc<ToolCatalog> {
        let guard = self.catalog.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Swap in a new snapshot
    pub fn replace(&self, catalog: ToolCatalog) -> Arc<ToolCatalog> {
        let catalog = Arc::new(catalog);
        let mut guard = self.catalog.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::clone(&catalog);
        catalog
    }

    /// Replace the snapshot with what the tool host currently lists.
    ///
    /// On error the previous snapshot is left in place.
    pub async fn refresh(
        &self,
        session: &ToolSessionHandle,
        cancel: &CancellationToken,
    ) -> Result<Arc<ToolCatalog>, TransportError> {
        let definitions = session.list_tools(cancel).await?;
        let (catalog, duplicates) = ToolCatalog::from_definitions(definitions);

        for name in &duplicates {
            warn!(tool = %name, "Duplicate tool name advertised, keeping the first definition");
        }
        info!(tool_count = catalog.len(), "Tool registry refreshed");

        Ok(self.replace(catalog))
    }

    /// Refresh, falling back to an empty registry if the host is unreachable.
    ///
    /// Cancellation keeps the current snapshot instead.
    pub async fn refresh_or_empty(
        &self,
        session: &ToolSessionHandle,
        cancel: &CancellationToken,
    ) -> Arc<ToolCatalog> {
        match self.refresh(session, cancel).await {
            Ok(catalog) => catalog,
            Err(TransportError::Cancelled) => self.get(),
            Err(e) => {
                warn!("Failed to fetch tools, continuing with none: {}", e);
                self.replace(ToolCatalog::new())
            }
        }
    }
}
