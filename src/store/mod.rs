//! Loading state store
//!
//! Single source of truth for what has loaded. Every mutator takes the write
//! lock, applies its change and recomputes the aggregate snapshot before the
//! lock is released, so readers never observe a half-applied update.

mod snapshot;

pub use snapshot::LoadingSnapshot;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::handle::{AssetHandle, ModelVariant};
use crate::metrics::LoadMetricsHandle;
use crate::registry::{AssetCategory, AssetRegistry, LOW_RES_READY_TIER};

/// Load status of a model's two variants
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelLoadStatus {
    pub low_res_loaded: bool,
    pub high_res_loaded: bool,
    pub low_res_data: Option<AssetHandle>,
    pub high_res_data: Option<AssetHandle>,
}

impl ModelLoadStatus {
    pub fn is_loaded(&self, variant: ModelVariant) -> bool {
        match variant {
            ModelVariant::Low => self.low_res_loaded,
            ModelVariant::High => self.high_res_loaded,
        }
    }

    pub fn data(&self, variant: ModelVariant) -> Option<&AssetHandle> {
        match variant {
            ModelVariant::Low => self.low_res_data.as_ref(),
            ModelVariant::High => self.high_res_data.as_ref(),
        }
    }

    fn slot_mut(&mut self, variant: ModelVariant) -> (&mut bool, &mut Option<AssetHandle>) {
        match variant {
            ModelVariant::Low => (&mut self.low_res_loaded, &mut self.low_res_data),
            ModelVariant::High => (&mut self.high_res_loaded, &mut self.high_res_data),
        }
    }
}

/// Load status of a single-variant asset (animation or texture)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetLoadStatus {
    pub loaded: bool,
    pub data: Option<AssetHandle>,
}

/// What a mark call did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The slot went from not loaded to loaded
    Recorded,
    /// The slot was already loaded; counters untouched
    Duplicate,
    /// The key is not in the registry; nothing changed
    UnknownAsset,
}

impl MarkOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, MarkOutcome::Recorded)
    }
}

struct StoreState {
    models: HashMap<String, ModelLoadStatus>,
    animations: HashMap<String, AssetLoadStatus>,
    textures: HashMap<String, AssetLoadStatus>,
    loaded_count: usize,
    snapshot: LoadingSnapshot,
}

/// Shared, injectable loading state
///
/// Clones share the same underlying state.
#[derive(Clone)]
pub struct LoadingStateStore {
    registry: Arc<AssetRegistry>,
    state: Arc<RwLock<StoreState>>,
    metrics: LoadMetricsHandle,
}

impl LoadingStateStore {
    /// Create a store tracking every asset of the registry
    pub fn new(registry: AssetRegistry) -> Self {
        Self::with_registry(Arc::new(registry))
    }

    pub fn with_registry(registry: Arc<AssetRegistry>) -> Self {
        let models = registry
            .models()
            .keys()
            .map(|key| (key.clone(), ModelLoadStatus::default()))
            .collect();
        let animations = registry
            .animations()
            .keys()
            .map(|key| (key.clone(), AssetLoadStatus::default()))
            .collect();
        let textures = registry
            .textures()
            .keys()
            .map(|key| (key.clone(), AssetLoadStatus::default()))
            .collect();

        let mut state = StoreState {
            models,
            animations,
            textures,
            loaded_count: 0,
            snapshot: LoadingSnapshot::empty(registry.total_asset_units()),
        };
        state.snapshot = compute_snapshot(&registry, &state);

        Self {
            registry,
            state: Arc::new(RwLock::new(state)),
            metrics: LoadMetricsHandle::new(),
        }
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    pub fn registry_arc(&self) -> Arc<AssetRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn metrics(&self) -> &LoadMetricsHandle {
        &self.metrics
    }

    /// Fixed denominator, read once from the registry
    pub fn total_count(&self) -> usize {
        self.registry.total_asset_units()
    }

    pub fn loaded_count(&self) -> usize {
        self.state.read().loaded_count
    }

    /// Record that a model variant finished loading
    pub fn mark_model_variant_loaded(
        &self,
        key: &str,
        variant: ModelVariant,
        handle: AssetHandle,
    ) -> MarkOutcome {
        let mut state = self.state.write();
        let Some(status) = state.models.get_mut(key) else {
            return self.unknown(AssetCategory::Models, key);
        };

        let (loaded, data) = status.slot_mut(variant);
        let outcome = fill_slot(loaded, data, Some(handle));
        self.finish(&mut state, outcome, AssetCategory::Models, key)
    }

    /// Mark a model's high-res slot as done without data.
    ///
    /// Used when the high-res fetch is never issued for this session.
    pub fn mark_satisfied_without_high_res(&self, key: &str) -> MarkOutcome {
        let mut state = self.state.write();
        let Some(status) = state.models.get_mut(key) else {
            return self.unknown(AssetCategory::Models, key);
        };

        let (loaded, data) = status.slot_mut(ModelVariant::High);
        let outcome = fill_slot(loaded, data, None);
        self.finish(&mut state, outcome, AssetCategory::Models, key)
    }

    /// Record an animation as loaded; `None` when it was skipped rather than fetched
    pub fn mark_animation_loaded(&self, key: &str, handle: Option<AssetHandle>) -> MarkOutcome {
        let mut state = self.state.write();
        let Some(status) = state.animations.get_mut(key) else {
            return self.unknown(AssetCategory::Animations, key);
        };

        let outcome = fill_slot(&mut status.loaded, &mut status.data, handle);
        self.finish(&mut state, outcome, AssetCategory::Animations, key)
    }

    pub fn mark_texture_loaded(&self, key: &str, handle: AssetHandle) -> MarkOutcome {
        let mut state = self.state.write();
        let Some(status) = state.textures.get_mut(key) else {
            return self.unknown(AssetCategory::Textures, key);
        };

        let outcome = fill_slot(&mut status.loaded, &mut status.data, Some(handle));
        self.finish(&mut state, outcome, AssetCategory::Textures, key)
    }

    /// Recompute progress and aggregate flags from the per-asset statuses.
    ///
    /// Mutators already do this; calling it again is harmless.
    pub fn recompute_aggregates(&self) -> LoadingSnapshot {
        let mut state = self.state.write();
        let snapshot = compute_snapshot(&self.registry, &state);
        state.snapshot = snapshot;
        snapshot
    }

    /// Copy of the current aggregate fields
    pub fn snapshot(&self) -> LoadingSnapshot {
        self.state.read().snapshot
    }

    pub fn model_status(&self, key: &str) -> Option<ModelLoadStatus> {
        self.state.read().models.get(key).cloned()
    }

    pub fn animation_status(&self, key: &str) -> Option<AssetLoadStatus> {
        self.state.read().animations.get(key).cloned()
    }

    pub fn texture_status(&self, key: &str) -> Option<AssetLoadStatus> {
        self.state.read().textures.get(key).cloned()
    }

    fn finish(
        &self,
        state: &mut StoreState,
        outcome: MarkOutcome,
        category: AssetCategory,
        key: &str,
    ) -> MarkOutcome {
        match outcome {
            MarkOutcome::Recorded => {
                state.loaded_count += 1;
                let snapshot = compute_snapshot(&self.registry, state);
                state.snapshot = snapshot;
                log::debug!(
                    "{category}/{key} loaded ({}/{}, {}%)",
                    state.loaded_count,
                    state.snapshot.total_count,
                    state.snapshot.progress
                );
            }
            MarkOutcome::Duplicate => {
                self.metrics.record_duplicate();
                log::debug!("Ignoring duplicate completion for {category}/{key}");
            }
            MarkOutcome::UnknownAsset => {}
        }
        outcome
    }

    fn unknown(&self, category: AssetCategory, key: &str) -> MarkOutcome {
        self.metrics.record_unknown();
        log::warn!("Ignoring completion for unknown asset {category}/{key}");
        MarkOutcome::UnknownAsset
    }
}

impl std::fmt::Debug for LoadingStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingStateStore")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

// A loaded flag never goes back to false. A late handle may still fill an
// empty data slot, but it never counts twice.
fn fill_slot(loaded: &mut bool, data: &mut Option<AssetHandle>, handle: Option<AssetHandle>) -> MarkOutcome {
    if *loaded {
        if data.is_none() {
            *data = handle;
        }
        return MarkOutcome::Duplicate;
    }
    *loaded = true;
    *data = handle;
    MarkOutcome::Recorded
}

fn compute_snapshot(registry: &AssetRegistry, state: &StoreState) -> LoadingSnapshot {
    let total_count = registry.total_asset_units();

    let model_loaded = |key: &str, variant: ModelVariant| {
        state
            .models
            .get(key)
            .is_some_and(|status| status.is_loaded(variant))
    };
    let animation_loaded = |key: &str| state.animations.get(key).is_some_and(|s| s.loaded);
    let texture_loaded = |key: &str| state.textures.get(key).is_some_and(|s| s.loaded);

    let essential_models = registry
        .models()
        .iter()
        .filter(|(_, model)| model.priority <= LOW_RES_READY_TIER)
        .all(|(key, _)| model_loaded(key.as_str(), ModelVariant::Low));
    let essential_animations = registry
        .animations()
        .iter()
        .filter(|(_, animation)| animation.priority <= LOW_RES_READY_TIER)
        .all(|(key, _)| animation_loaded(key.as_str()));

    let high_res_ready = registry
        .models()
        .keys()
        .all(|key| model_loaded(key.as_str(), ModelVariant::High))
        && registry.animations().keys().all(|key| animation_loaded(key.as_str()))
        && registry.textures().keys().all(|key| texture_loaded(key.as_str()));

    LoadingSnapshot {
        progress: LoadingSnapshot::percent(state.loaded_count, total_count),
        loaded_count: state.loaded_count,
        total_count,
        low_res_ready: essential_models && essential_animations,
        high_res_ready,
        complete: high_res_ready,
    }
}
