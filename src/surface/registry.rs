//! Identifier-based surface lookup.
//!
//! Callers that hold a surface handle should pass it directly to the
//! capturer. The registry serves callers that only know a surface by name.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::types::Surface;
use crate::error::{ExportError, ExportResult};

/// Surfaces currently available for capture, keyed by id
#[derive(Default, Clone)]
pub struct SurfaceRegistry {
    surfaces: HashMap<String, Arc<dyn Surface>>,
}

impl SurfaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface under its own id, returning any surface it replaced
    pub fn register(&mut self, surface: Arc<dyn Surface>) -> Option<Arc<dyn Surface>> {
        let id = surface.id().to_string();
        debug!(surface = %id, "registering surface");
        self.surfaces.insert(id, surface)
    }

    /// Remove a surface by id
    pub fn unregister(&mut self, id: &str) -> Option<Arc<dyn Surface>> {
        self.surfaces.remove(id)
    }

    /// Resolve an id to a mounted surface
    pub fn resolve(&self, id: &str) -> ExportResult<Arc<dyn Surface>> {
        self.surfaces
            .get(id)
            .filter(|surface| surface.layout().is_some())
            .cloned()
            .ok_or_else(|| ExportError::SurfaceNotFound(id.to_string()))
    }

    /// Number of registered surfaces
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl std::fmt::Debug for SurfaceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<&String> = self.surfaces.keys().collect();
        ids.sort();
        f.debug_struct("SurfaceRegistry").field("surfaces", &ids).finish()
    }
}
