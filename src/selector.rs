//! Model variant selection
//!
//! Scene components ask for "the model to draw right now" and get whichever
//! variant fits the session's performance mode, or `None` while nothing
//! usable has loaded. Selection never blocks.

use crate::handle::AssetHandle;
use crate::performance::{self, PerformanceMode, PreferenceStore};
use crate::store::LoadingStateStore;

/// Picks a loaded model variant for the current session
#[derive(Debug, Clone)]
pub struct VariantSelector {
    store: LoadingStateStore,
    mode: PerformanceMode,
}

impl VariantSelector {
    pub fn new(store: LoadingStateStore, mode: PerformanceMode) -> Self {
        Self { store, mode }
    }

    /// Use the saved preference; no saved value means high performance
    pub fn from_preferences(store: LoadingStateStore, preferences: &impl PreferenceStore) -> Self {
        let mode = performance::saved_mode(preferences).unwrap_or_default();
        Self::new(store, mode)
    }

    pub fn mode(&self) -> PerformanceMode {
        self.mode
    }

    fn stays_low(&self, prefer_high_res: bool) -> bool {
        !prefer_high_res && self.mode.is_low()
    }

    /// Handle to draw for `key`, or `None` when nothing usable has loaded.
    ///
    /// In low mode without a high-res preference the low variant is returned
    /// for the whole session, even if a high-res variant shows up later.
    pub fn select_model(&self, key: &str, prefer_high_res: bool) -> Option<AssetHandle> {
        let Some(status) = self.store.model_status(key) else {
            log::error!("Model {key} not found in registry");
            return None;
        };

        let stay_low = self.stays_low(prefer_high_res);

        if status.low_res_loaded && (stay_low || !status.high_res_loaded) {
            status.low_res_data
        } else if status.high_res_loaded && !stay_low {
            // A high slot satisfied without data still has the low variant to show.
            status.high_res_data.or(status.low_res_data)
        } else {
            None
        }
    }

    /// Bind one component to a model key
    pub fn bind(&self, key: impl Into<String>, prefer_high_res: bool) -> ModelBinding {
        ModelBinding {
            selector: self.clone(),
            key: key.into(),
            prefer_high_res,
            current: None,
            settled: false,
        }
    }
}

/// A component's view of one model, refreshed on each poll tick
///
/// Once the variant it ultimately wants has been obtained the binding stops
/// asking the store.
#[derive(Debug, Clone)]
pub struct ModelBinding {
    selector: VariantSelector,
    key: String,
    prefer_high_res: bool,
    current: Option<AssetHandle>,
    settled: bool,
}

impl ModelBinding {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn current(&self) -> Option<&AssetHandle> {
        self.current.as_ref()
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Re-evaluate the selection; returns the handle to draw
    pub fn refresh(&mut self) -> Option<&AssetHandle> {
        if self.settled {
            return self.current.as_ref();
        }

        if let Some(handle) = self.selector.select_model(&self.key, self.prefer_high_res) {
            self.current = Some(handle);
        }

        if let Some(status) = self.selector.store.model_status(&self.key) {
            self.settled = if self.selector.stays_low(self.prefer_high_res) {
                status.low_res_loaded
            } else {
                status.high_res_loaded
            };
        }

        self.current.as_ref()
    }
}

#[cfg(feature = "runtime-tokio")]
impl ModelBinding {
    /// Refresh every `interval` on the spawner and publish the handle to draw.
    ///
    /// The task ends once the binding settles or every receiver is dropped.
    pub fn spawn_polling<S>(
        mut self,
        spawner: &S,
        interval: std::time::Duration,
    ) -> tokio::sync::watch::Receiver<Option<AssetHandle>>
    where
        S: crate::runtime::AsyncSpawner,
    {
        let (tx, rx) = tokio::sync::watch::channel(self.refresh().cloned());

        spawner.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            while !self.is_settled() {
                tokio::select! {
                    _ = tx.closed() => {
                        log::debug!("Binding receivers for {} dropped, polling stops", self.key);
                        return;
                    }
                    _ = ticker.tick() => {}
                }

                let next = self.refresh().cloned();
                tx.send_if_modified(|current| {
                    if *current == next {
                        false
                    } else {
                        *current = next;
                        true
                    }
                });
            }
            log::debug!("Binding for {} settled", self.key);
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::ModelVariant;
    use crate::performance::{MemoryPreferences, PERFORMANCE_MODE_KEY};
    use crate::registry::AssetRegistry;

    fn store() -> LoadingStateStore {
        let registry = AssetRegistry::builder()
            .model("avatar", "models/low/me_low.glb", "models/me.glb", 1)
            .model("room", "models/low/Room_low.glb", "models/Room.glb", 2)
            .build()
            .unwrap();
        LoadingStateStore::new(registry)
    }

    fn load(store: &LoadingStateStore, key: &str, variant: ModelVariant) -> AssetHandle {
        let handle = AssetHandle::new(format!("{key}-{variant}"), ());
        store.mark_model_variant_loaded(key, variant, handle.clone());
        handle
    }

    #[test]
    fn test_nothing_loaded() {
        let selector = VariantSelector::new(store(), PerformanceMode::High);
        assert!(selector.select_model("avatar", false).is_none());
        assert!(selector.select_model("avatar", true).is_none());
    }

    #[test]
    fn test_unknown_model() {
        let selector = VariantSelector::new(store(), PerformanceMode::High);
        assert!(selector.select_model("ghost", true).is_none());
    }

    #[test]
    fn test_high_mode_upgrades() {
        let store = store();
        let selector = VariantSelector::new(store.clone(), PerformanceMode::High);

        let low = load(&store, "avatar", ModelVariant::Low);
        assert_eq!(selector.select_model("avatar", false), Some(low));

        let high = load(&store, "avatar", ModelVariant::High);
        assert_eq!(selector.select_model("avatar", false), Some(high));
    }

    #[test]
    fn test_low_mode_is_stable() {
        let store = store();
        let selector = VariantSelector::new(store.clone(), PerformanceMode::Low);

        let low = load(&store, "avatar", ModelVariant::Low);
        load(&store, "avatar", ModelVariant::High);
        assert_eq!(selector.select_model("avatar", false), Some(low));
    }

    #[test]
    fn test_prefer_high_overrides_low_mode() {
        let store = store();
        let selector = VariantSelector::new(store.clone(), PerformanceMode::Low);

        load(&store, "avatar", ModelVariant::Low);
        let high = load(&store, "avatar", ModelVariant::High);
        assert_eq!(selector.select_model("avatar", true), Some(high));
    }

    #[test]
    fn test_high_slot_without_data_falls_back() {
        let store = store();
        let selector = VariantSelector::new(store.clone(), PerformanceMode::High);

        let low = load(&store, "room", ModelVariant::Low);
        store.mark_satisfied_without_high_res("room");
        assert_eq!(selector.select_model("room", true), Some(low));
    }

    #[test]
    fn test_from_preferences() {
        let prefs = MemoryPreferences::new();
        assert_eq!(VariantSelector::from_preferences(store(), &prefs).mode(), PerformanceMode::High);

        prefs.set(PERFORMANCE_MODE_KEY, "low").unwrap();
        assert_eq!(VariantSelector::from_preferences(store(), &prefs).mode(), PerformanceMode::Low);
    }

    #[test]
    fn test_binding_settles() {
        let store = store();
        let selector = VariantSelector::new(store.clone(), PerformanceMode::High);
        let mut binding = selector.bind("avatar", false);

        assert!(binding.refresh().is_none());
        assert!(!binding.is_settled());

        let low = load(&store, "avatar", ModelVariant::Low);
        assert_eq!(binding.refresh(), Some(&low));
        assert!(!binding.is_settled());

        let high = load(&store, "avatar", ModelVariant::High);
        assert_eq!(binding.refresh(), Some(&high));
        assert!(binding.is_settled());
        assert_eq!(binding.key(), "avatar");
    }

    #[test]
    fn test_low_binding_settles_on_low() {
        let store = store();
        let selector = VariantSelector::new(store.clone(), PerformanceMode::Low);
        let mut binding = selector.bind("room", false);

        let low = load(&store, "room", ModelVariant::Low);
        assert_eq!(binding.refresh(), Some(&low));
        assert!(binding.is_settled());

        load(&store, "room", ModelVariant::High);
        assert_eq!(binding.refresh(), Some(&low));
    }
}
