//! Preload orchestration
//!
//! Walks the registry once per session and issues fire-and-forget fetches for
//! the variants the current performance mode calls for. Completions report
//! straight into the [`LoadingStateStore`]; a failed fetch is logged, counted
//! in the metrics, and leaves its unit unloaded.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::error::{PreloadError, Result};
use crate::handle::{AssetHandle, ModelVariant};
use crate::loader::{AssetLoader, FileLoader, GlbLoader, ImageLoader};
use crate::performance::PerformanceMode;
use crate::registry::{AssetCategory, ANIMATION_DEFER_TIER, ESSENTIAL_TIER};
use crate::runtime::AsyncSpawner;
use crate::store::LoadingStateStore;

/// One loader per asset category
#[derive(Clone)]
pub struct AssetLoaders {
    pub models: Arc<dyn AssetLoader>,
    pub animations: Arc<dyn AssetLoader>,
    pub textures: Arc<dyn AssetLoader>,
}

impl AssetLoaders {
    /// GLB models, raw animation clips and decoded textures below `root`
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            models: Arc::new(GlbLoader::new(root)),
            animations: Arc::new(FileLoader::new(root)),
            textures: Arc::new(ImageLoader::new(root)),
        }
    }

    /// Use the same loader for every category
    pub fn uniform<L: AssetLoader + 'static>(loader: L) -> Self {
        let loader: Arc<dyn AssetLoader> = Arc::new(loader);
        Self {
            models: Arc::clone(&loader),
            animations: Arc::clone(&loader),
            textures: loader,
        }
    }
}

impl std::fmt::Debug for AssetLoaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoaders")
            .field("models", &self.models.name())
            .field("animations", &self.animations.name())
            .field("textures", &self.textures.name())
            .finish()
    }
}

/// A fetch handed to the spawner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedFetch {
    pub category: AssetCategory,
    pub key: String,
    /// Set for models only
    pub variant: Option<ModelVariant>,
    pub path: String,
}

/// What `begin_preload` decided for this session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadPlan {
    pub mode: PerformanceMode,
    pub fetches: Vec<PlannedFetch>,
    /// Models whose high-res slot is satisfied by the low-res completion
    pub high_res_skipped: Vec<String>,
    /// Animations marked loaded without ever being fetched
    pub animations_skipped: Vec<String>,
}

impl PreloadPlan {
    pub fn fetches_path(&self, path: &str) -> bool {
        self.fetches.iter().any(|fetch| fetch.path == path)
    }
}

/// Issues every preload fetch for a session
#[derive(Clone)]
pub struct PreloadOrchestrator<S: AsyncSpawner> {
    store: LoadingStateStore,
    loaders: AssetLoaders,
    spawner: S,
    started: Arc<AtomicBool>,
}

impl<S: AsyncSpawner + 'static> PreloadOrchestrator<S> {
    pub fn new(store: LoadingStateStore, loaders: AssetLoaders, spawner: S) -> Self {
        Self {
            store,
            loaders,
            spawner,
            started: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn store(&self) -> &LoadingStateStore {
        &self.store
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Issue all fetches for `mode` and return without waiting on any of them.
    ///
    /// Only the first call per orchestrator does anything.
    pub fn begin_preload(&self, mode: PerformanceMode) -> Result<PreloadPlan> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(PreloadError::AlreadyStarted);
        }

        log::debug!(
            "Preloading {} asset units in {mode} performance mode on {}",
            self.store.total_count(),
            self.spawner.runtime_name()
        );

        let registry = self.store.registry_arc();
        let mut plan = PreloadPlan {
            mode,
            fetches: Vec::new(),
            high_res_skipped: Vec::new(),
            animations_skipped: Vec::new(),
        };

        for (key, model) in registry.models() {
            let skip_high_res = mode.is_low() && model.priority > ESSENTIAL_TIER;

            // The short-circuit runs in the same task as the low-res completion,
            // after it, so low_res_ready is settled first.
            let store = self.store.clone();
            let model_key = key.clone();
            self.spawn_load(
                &mut plan,
                AssetCategory::Models,
                key,
                Some(ModelVariant::Low),
                &model.low_res_path,
                move |handle| {
                    store.mark_model_variant_loaded(&model_key, ModelVariant::Low, handle);
                    if skip_high_res {
                        store.mark_satisfied_without_high_res(&model_key);
                    }
                },
            );

            if skip_high_res {
                log::debug!("Skipping high-res fetch for models/{key}");
                plan.high_res_skipped.push(key.clone());
                continue;
            }

            let store = self.store.clone();
            let model_key = key.clone();
            self.spawn_load(
                &mut plan,
                AssetCategory::Models,
                key,
                Some(ModelVariant::High),
                &model.high_res_path,
                move |handle| {
                    store.mark_model_variant_loaded(&model_key, ModelVariant::High, handle);
                },
            );
        }

        for (key, animation) in registry.animations() {
            if mode.is_low() && animation.priority > ANIMATION_DEFER_TIER {
                log::debug!("Skipping deferred animation {key}");
                self.store.mark_animation_loaded(key, None);
                plan.animations_skipped.push(key.clone());
                continue;
            }

            let store = self.store.clone();
            let animation_key = key.clone();
            self.spawn_load(
                &mut plan,
                AssetCategory::Animations,
                key,
                None,
                &animation.path,
                move |handle| {
                    store.mark_animation_loaded(&animation_key, Some(handle));
                },
            );
        }

        for (key, texture) in registry.textures() {
            let store = self.store.clone();
            let texture_key = key.clone();
            self.spawn_load(
                &mut plan,
                AssetCategory::Textures,
                key,
                None,
                &texture.path,
                move |handle| {
                    store.mark_texture_loaded(&texture_key, handle);
                },
            );
        }

        Ok(plan)
    }

    fn spawn_load<F>(
        &self,
        plan: &mut PreloadPlan,
        category: AssetCategory,
        key: &str,
        variant: Option<ModelVariant>,
        path: &str,
        on_loaded: F,
    ) where
        F: FnOnce(AssetHandle) + Send + 'static,
    {
        plan.fetches.push(PlannedFetch {
            category,
            key: key.to_string(),
            variant,
            path: path.to_string(),
        });

        let loader = Arc::clone(match category {
            AssetCategory::Models => &self.loaders.models,
            AssetCategory::Animations => &self.loaders.animations,
            AssetCategory::Textures => &self.loaders.textures,
        });
        let metrics = self.store.metrics().clone();
        let path = path.to_string();

        self.spawner.spawn(async move {
            let started = Instant::now();
            let result = loader.load(&path).await;
            match result {
                Ok(handle) => {
                    metrics.record_load_time(path, started.elapsed());
                    on_loaded(handle);
                }
                Err(err) => {
                    log::warn!("Failed to preload {path} with {} loader: {err}", loader.name());
                    metrics.record_failure(path, err.to_string());
                }
            }
        });
    }
}

#[cfg(feature = "runtime-tokio")]
impl<S: AsyncSpawner + 'static> PreloadOrchestrator<S> {
    /// Begin preloading after `delay`, letting the first frame render.
    ///
    /// The single-run guard is checked when the delay elapses.
    pub fn begin_preload_after(&self, delay: std::time::Duration, mode: PerformanceMode) {
        let orchestrator = self.clone();
        self.spawner.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = orchestrator.begin_preload(mode) {
                log::warn!("Delayed preload not started: {err}");
            }
        });
    }
}
