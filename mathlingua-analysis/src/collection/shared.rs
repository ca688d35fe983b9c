//! A collection shared across threads
//!
//! Writers (`add_source`/`remove_source`) exclude each other and every reader; readers run
//! concurrently.

use super::SourceCollection;
use crate::source::SourceFile;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default)]
pub struct SharedSourceCollection {
    inner: Arc<RwLock<SourceCollection>>,
}

impl SharedSourceCollection {
    pub fn new(collection: SourceCollection) -> Self {
        Self {
            inner: Arc::new(RwLock::new(collection)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, SourceCollection> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, SourceCollection> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_source(&self, file: SourceFile) {
        self.write().add_source(file);
    }

    pub fn remove_source(&self, path: &str) -> Option<SourceFile> {
        self.write().remove_source(path)
    }
}

impl From<SourceCollection> for SharedSourceCollection {
    fn from(collection: SourceCollection) -> Self {
        Self::new(collection)
    }
}
