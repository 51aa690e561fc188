//! per-caller type cache
//!
//! at most one in-flight resolution per type name. successes are kept for
//! the cache's lifetime, failures are not cached.

use crate::config::RegistryOptions;
use crate::error::Result;
use crate::gateway::{Gateway, Transport};
use crate::resolved::ResolvedType;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

/// type name -> resolved type, owned by the caller
#[derive(Debug, Default)]
pub struct TypeCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<Arc<ResolvedType>>>>>,
}

impl TypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(&self, type_name: &str) -> Arc<OnceCell<Arc<ResolvedType>>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.entry(type_name.to_string()).or_default().clone()
    }

    /// cached value, or run `resolve` once for concurrent callers
    ///
    /// callers waiting on a failed resolution retry with their own `resolve`.
    pub async fn get_or_try_insert_with<F, Fut>(
        &self,
        type_name: &str,
        resolve: F,
    ) -> Result<Arc<ResolvedType>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ResolvedType>>,
    {
        let cell = self.cell(type_name);
        let resolved = cell
            .get_or_try_init(move || async move { resolve().await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(resolved))
    }

    /// resolve a type through the gateway, reusing earlier results
    pub async fn resolve<T: Transport>(
        &self,
        gateway: &Gateway<T>,
        type_name: &str,
        options: &RegistryOptions,
    ) -> Result<Arc<ResolvedType>> {
        self.get_or_try_insert_with(type_name, || gateway.resolve_type(type_name, options))
            .await
    }

    /// already-resolved type, without waiting on in-flight work
    pub fn get(&self, type_name: &str) -> Option<Arc<ResolvedType>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(type_name).and_then(|cell| cell.get().cloned())
    }

    pub fn invalidate(&self, type_name: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(type_name);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    /// number of resolved types
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
