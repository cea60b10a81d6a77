//! Integration tests for the loading store's progress accounting

use folio_preload::{
    AssetHandle, AssetRegistry, LoadingStateStore, MarkOutcome, ModelVariant,
};

fn registry(model_priority: u32) -> AssetRegistry {
    AssetRegistry::builder()
        .model("avatar", "models/low/me_low.glb", "models/me.glb", model_priority)
        .animation("typing", "animations/TypingSmall.fbx", 1)
        .build()
        .unwrap()
}

fn handle(path: &str) -> AssetHandle {
    AssetHandle::new(path, path.to_string())
}

#[test]
fn test_progress_steps_to_complete() {
    let store = LoadingStateStore::new(registry(1));
    assert_eq!(store.total_count(), 3);

    store.mark_model_variant_loaded("avatar", ModelVariant::Low, handle("models/low/me_low.glb"));
    assert_eq!(store.snapshot().loaded_count, 1);
    assert_eq!(store.snapshot().progress, 33);

    store.mark_model_variant_loaded("avatar", ModelVariant::High, handle("models/me.glb"));
    assert_eq!(store.snapshot().loaded_count, 2);
    assert_eq!(store.snapshot().progress, 67);

    store.mark_animation_loaded("typing", Some(handle("animations/TypingSmall.fbx")));
    let snap = store.snapshot();
    assert_eq!(snap.loaded_count, 3);
    assert_eq!(snap.progress, 100);
    assert!(snap.complete);
}

#[test]
fn test_duplicate_low_res_completion() {
    let store = LoadingStateStore::new(registry(1));

    store.mark_model_variant_loaded("avatar", ModelVariant::Low, handle("a"));
    store.mark_model_variant_loaded("avatar", ModelVariant::Low, handle("a"));

    assert_eq!(store.snapshot().loaded_count, 1);
}

#[test]
fn test_duplicate_of_every_mutator_counts_once() {
    let registry = AssetRegistry::builder()
        .model("room", "low.glb", "high.glb", 2)
        .animation("typing", "typing.fbx", 1)
        .texture("roomBaked", "room.jpg", 1)
        .build()
        .unwrap();
    let store = LoadingStateStore::new(registry);

    for _ in 0..2 {
        store.mark_model_variant_loaded("room", ModelVariant::Low, handle("low.glb"));
        store.mark_satisfied_without_high_res("room");
        store.mark_animation_loaded("typing", None);
        store.mark_texture_loaded("roomBaked", handle("room.jpg"));
    }

    assert_eq!(store.snapshot().loaded_count, 4);
    assert_eq!(store.metrics().duplicate_count(), 4);
}

#[test]
fn test_ghost_texture_changes_nothing() {
    let store = LoadingStateStore::new(registry(1));
    store.mark_model_variant_loaded("avatar", ModelVariant::Low, handle("low"));
    let before = store.snapshot();

    let outcome = store.mark_texture_loaded("ghost-key", handle("ghost.jpg"));

    assert_eq!(outcome, MarkOutcome::UnknownAsset);
    assert_eq!(store.snapshot(), before);
    assert!(store.texture_status("ghost-key").is_none());
}

// Drives the store with a fixed pseudo-random sequence of completions,
// duplicates and unknown keys, checking the invariants after every step.
#[test]
fn test_invariants_hold_for_any_completion_order() {
    let registry = AssetRegistry::portfolio();
    let model_keys: Vec<String> = registry.models().keys().cloned().collect();
    let animation_keys: Vec<String> = registry.animations().keys().cloned().collect();
    let texture_keys: Vec<String> = registry.textures().keys().cloned().collect();
    let store = LoadingStateStore::new(registry);
    let total = store.total_count();

    let mut seed: u64 = 0x5eed;
    let mut next = move |bound: usize| {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((seed >> 33) as usize) % bound
    };

    let mut previous = store.snapshot();
    let mut seen_loaded: Vec<(String, bool, bool)> = Vec::new();

    for _ in 0..200 {
        match next(6) {
            0 => {
                let key = &model_keys[next(model_keys.len())];
                store.mark_model_variant_loaded(key, ModelVariant::Low, handle(key));
            }
            1 => {
                let key = &model_keys[next(model_keys.len())];
                store.mark_model_variant_loaded(key, ModelVariant::High, handle(key));
            }
            2 => {
                let key = &model_keys[next(model_keys.len())];
                store.mark_satisfied_without_high_res(key);
            }
            3 => {
                let key = &animation_keys[next(animation_keys.len())];
                store.mark_animation_loaded(key, None);
            }
            4 => {
                let key = &texture_keys[next(texture_keys.len())];
                store.mark_texture_loaded(key, handle(key));
            }
            _ => {
                store.mark_animation_loaded("ghost", None);
            }
        }

        let snap = store.snapshot();
        assert!(snap.progress <= 100);
        assert!(snap.loaded_count >= previous.loaded_count);
        assert!(snap.progress >= previous.progress);
        assert_eq!(snap.total_count, total);
        let expected = ((snap.loaded_count as f64 / total as f64) * 100.0).round() as u8;
        assert_eq!(snap.progress, expected.min(100));

        for key in &model_keys {
            let status = store.model_status(key).unwrap();
            if let Some((_, low, high)) = seen_loaded.iter().find(|(k, _, _)| k == key) {
                assert!(!*low || status.low_res_loaded);
                assert!(!*high || status.high_res_loaded);
            }
            seen_loaded.retain(|(k, _, _)| k != key);
            seen_loaded.push((key.clone(), status.low_res_loaded, status.high_res_loaded));
        }

        previous = snap;
    }

    // finish whatever the sequence missed
    for key in &model_keys {
        store.mark_model_variant_loaded(key, ModelVariant::Low, handle(key));
        store.mark_model_variant_loaded(key, ModelVariant::High, handle(key));
    }
    for key in &animation_keys {
        store.mark_animation_loaded(key, None);
    }
    for key in &texture_keys {
        store.mark_texture_loaded(key, handle(key));
    }
    assert_eq!(store.snapshot().loaded_count, total);
    assert!(store.snapshot().complete);
}
