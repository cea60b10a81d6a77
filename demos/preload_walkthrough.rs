//! Walk through one preload session against a local asset directory.
//!
//! ```text
//! cargo run --example preload_walkthrough -- path/to/public
//! ```

use std::time::Duration;

use anyhow::Context;
use folio_preload::{
    AssetLoaders, AssetRegistry, DeviceProfile, FilePreferences, LoadingStateStore,
    PerformanceDetector, PreloadConfig, PreloadOrchestrator, ProgressSubscription, TokioSpawner,
    VariantSelector,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let root = std::env::args().nth(1).unwrap_or_else(|| "public".to_string());
    let config = PreloadConfig::default().with_asset_root(root);

    let preferences = FilePreferences::new(std::env::temp_dir().join("folio-preferences.json"));
    let detector = PerformanceDetector::new(preferences, config.thresholds.clone());
    let mode = detector
        .detect_and_persist(&DeviceProfile::current())
        .context("saving performance mode")?;
    println!("performance mode: {mode}");

    let store = LoadingStateStore::new(AssetRegistry::portfolio());
    let spawner = TokioSpawner::new();
    let preload = PreloadOrchestrator::new(
        store.clone(),
        AssetLoaders::from_root(&config.asset_root),
        spawner.clone(),
    );

    let mut progress = ProgressSubscription::new(store.clone())
        .spawn_polling(&spawner, config.progress_poll_interval);
    preload.begin_preload_after(config.start_delay, mode);

    let avatar = VariantSelector::new(store.clone(), mode)
        .bind("avatar", false)
        .spawn_polling(&spawner, config.binding_poll_interval);
    let wait = tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            let snap = *progress.borrow_and_update();
            let shown = avatar.borrow().as_ref().map(|handle| handle.source().to_string());
            println!(
                "{:>3}% ({}/{}) low={} high={} avatar={}",
                snap.progress,
                snap.loaded_count,
                snap.total_count,
                snap.low_res_ready,
                snap.high_res_ready,
                shown.as_deref().unwrap_or("-")
            );
            if snap.complete || progress.changed().await.is_err() {
                break snap;
            }
        }
    })
    .await;

    match wait {
        Ok(snap) if snap.complete => println!("all assets loaded"),
        _ => {
            let metrics = store.metrics();
            println!(
                "stopped at {}% with {} failed fetches",
                store.snapshot().progress,
                metrics.failure_count()
            );
        }
    }
    Ok(())
}
