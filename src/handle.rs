//! Opaque handles to loaded asset data
//!
//! The preload core never interprets what a loader produced. It only stores a
//! handle and gives it back to whoever asks for a variant.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which variant of a model a completion refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    Low,
    High,
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelVariant::Low => f.write_str("low"),
            ModelVariant::High => f.write_str("high"),
        }
    }
}

/// Cheaply clonable, type-erased handle to loaded data
///
/// Two handles are equal when they come from the same load, regardless of
/// payload contents.
#[derive(Clone)]
pub struct AssetHandle {
    id: Uuid,
    source: Arc<str>,
    payload: Arc<dyn Any + Send + Sync>,
}

impl AssetHandle {
    /// Wrap a loaded payload, remembering the path it came from
    pub fn new<T: Any + Send + Sync>(source: impl Into<String>, payload: T) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: Arc::from(source.into()),
            payload: Arc::new(payload),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Path the payload was loaded from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Borrow the payload as a concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }
}

impl PartialEq for AssetHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AssetHandle {}

impl fmt::Debug for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetHandle")
            .field("id", &self.id)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
