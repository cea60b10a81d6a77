//! folio_preload - Progressive asset preloading for a scroll-driven 3D site
//!
//! # Features
//! - Declarative asset registry (models with low/high variants, animations, textures)
//! - Loading state store with idempotent, monotonic completion tracking
//! - Fire-and-forget preload orchestration tuned by a performance mode
//! - Poll-driven progress subscription for the loading screen
//! - Variant selection that never "pops" a low-performance session to high-res
//! - Async runtime abstraction (Tokio or a controllable mock)
//!
//! # Quick Start
//!
//! ```ignore
//! use folio_preload::*;
//!
//! let store = LoadingStateStore::new(AssetRegistry::portfolio());
//! let preload = PreloadOrchestrator::new(
//!     store.clone(),
//!     AssetLoaders::from_root("public"),
//!     TokioSpawner::new(),
//! );
//! preload.begin_preload(PerformanceMode::High)?;
//!
//! let progress = ProgressSubscription::new(store.clone())
//!     .spawn_polling(&TokioSpawner::new(), Duration::from_millis(100));
//! let avatar = VariantSelector::new(store, PerformanceMode::High).select_model("avatar", false);
//! ```
//!
//! # Feature Flags
//!
//! - `runtime-tokio` (default): Tokio spawner, async file reads, delayed start
//!   and channel-based progress publishing

// Core modules
pub mod preload;
pub mod progress;
pub mod registry;
pub mod selector;
pub mod store;

// Support modules
pub mod config;
pub mod handle;
pub mod loader;
pub mod metrics;
pub mod performance;
pub mod runtime;

// Error types
mod error;
pub use error::{PreloadError, Result};

// Re-export registry and store types
pub use registry::{
    AnimationAssetDescriptor, AssetCategory, AssetRegistry, AssetRegistryBuilder,
    ModelAssetDescriptor, TextureAssetDescriptor,
};
pub use store::{AssetLoadStatus, LoadingSnapshot, LoadingStateStore, MarkOutcome, ModelLoadStatus};

// Re-export orchestration types
pub use preload::{AssetLoaders, PlannedFetch, PreloadOrchestrator, PreloadPlan};
pub use progress::ProgressSubscription;
pub use selector::{ModelBinding, VariantSelector};

// Re-export support types
pub use config::{DetectionThresholds, PreloadConfig};
pub use handle::{AssetHandle, ModelVariant};
pub use loader::{AssetLoader, FileLoader, GlbLoader, GlbModel, ImageLoader, MockLoader, Texture};
pub use metrics::{LoadMetrics, LoadMetricsHandle};
pub use performance::{
    DeviceProfile, FilePreferences, MemoryPreferences, PerformanceDetector, PerformanceMode,
    PreferenceStore, PERFORMANCE_MODE_KEY,
};

// Re-export runtime types
pub use runtime::{AsyncSpawner, MockSpawnBehavior, MockSpawner};
#[cfg(feature = "runtime-tokio")]
pub use runtime::TokioSpawner;

// Version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_portfolio_store_starts_empty() {
        let store = LoadingStateStore::new(AssetRegistry::portfolio());
        assert_eq!(store.snapshot().progress, 0);
        assert_eq!(store.total_count(), 11);
    }
}
