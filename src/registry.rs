//! Asset registry
//!
//! The static table of every loadable asset. Models carry a low and a high
//! resolution path, animations and textures a single path. Every entry has a
//! priority tier where 1 is essential and higher tiers may be deferred.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PreloadError, Result};

/// Tier whose models always fetch their high-res variant, whatever the mode
pub const ESSENTIAL_TIER: u32 = 1;

/// Highest tier that gates `low_res_ready`
pub const LOW_RES_READY_TIER: u32 = 2;

/// Animations above this tier are skipped in low-performance mode
pub const ANIMATION_DEFER_TIER: u32 = 2;

/// Asset categories tracked by the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Models,
    Animations,
    Textures,
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetCategory::Models => "models",
            AssetCategory::Animations => "animations",
            AssetCategory::Textures => "textures",
        };
        f.write_str(name)
    }
}

/// A 3D model with a cheap and a full-fidelity variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelAssetDescriptor {
    pub low_res_path: String,
    pub high_res_path: String,
    pub priority: u32,
}

/// An animation clip; animations are not tiered by resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationAssetDescriptor {
    pub path: String,
    pub priority: u32,
}

/// A texture image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureAssetDescriptor {
    pub path: String,
    pub priority: u32,
}

/// Immutable category -> key -> descriptor table
///
/// Keys are kept ordered so preload issue order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRegistry {
    models: BTreeMap<String, ModelAssetDescriptor>,
    animations: BTreeMap<String, AnimationAssetDescriptor>,
    textures: BTreeMap<String, TextureAssetDescriptor>,
}

impl AssetRegistry {
    /// Start building a registry
    pub fn builder() -> AssetRegistryBuilder {
        AssetRegistryBuilder::default()
    }

    /// The registry shipped with the portfolio site
    ///
    /// An invalid table is logged and replaced by an empty registry.
    pub fn portfolio() -> Self {
        match portfolio_builder().build() {
            Ok(registry) => registry,
            Err(err) => {
                log::error!("Portfolio asset table rejected: {err}");
                Self::default()
            }
        }
    }

    pub fn models(&self) -> &BTreeMap<String, ModelAssetDescriptor> {
        &self.models
    }

    pub fn animations(&self) -> &BTreeMap<String, AnimationAssetDescriptor> {
        &self.animations
    }

    pub fn textures(&self) -> &BTreeMap<String, TextureAssetDescriptor> {
        &self.textures
    }

    pub fn model(&self, key: &str) -> Option<&ModelAssetDescriptor> {
        self.models.get(key)
    }

    pub fn animation(&self, key: &str) -> Option<&AnimationAssetDescriptor> {
        self.animations.get(key)
    }

    pub fn texture(&self, key: &str) -> Option<&TextureAssetDescriptor> {
        self.textures.get(key)
    }

    /// Check whether a key exists in the given category
    pub fn contains(&self, category: AssetCategory, key: &str) -> bool {
        match category {
            AssetCategory::Models => self.models.contains_key(key),
            AssetCategory::Animations => self.animations.contains_key(key),
            AssetCategory::Textures => self.textures.contains_key(key),
        }
    }

    /// Denominator for progress math.
    ///
    /// Each model counts twice since both variants are tracked independently.
    pub fn total_asset_units(&self) -> usize {
        self.models.len() * 2 + self.animations.len() + self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_asset_units() == 0
    }
}

/// Builder that validates priorities and key uniqueness
#[derive(Debug, Default)]
pub struct AssetRegistryBuilder {
    registry: AssetRegistry,
    problems: Vec<String>,
}

impl AssetRegistryBuilder {
    /// Add a model with both variants
    pub fn model(
        mut self,
        key: impl Into<String>,
        low_res_path: impl Into<String>,
        high_res_path: impl Into<String>,
        priority: u32,
    ) -> Self {
        let key = key.into();
        self.check(AssetCategory::Models, &key, priority);
        let descriptor = ModelAssetDescriptor {
            low_res_path: low_res_path.into(),
            high_res_path: high_res_path.into(),
            priority,
        };
        self.registry.models.insert(key, descriptor);
        self
    }

    pub fn animation(mut self, key: impl Into<String>, path: impl Into<String>, priority: u32) -> Self {
        let key = key.into();
        self.check(AssetCategory::Animations, &key, priority);
        let descriptor = AnimationAssetDescriptor {
            path: path.into(),
            priority,
        };
        self.registry.animations.insert(key, descriptor);
        self
    }

    pub fn texture(mut self, key: impl Into<String>, path: impl Into<String>, priority: u32) -> Self {
        let key = key.into();
        self.check(AssetCategory::Textures, &key, priority);
        let descriptor = TextureAssetDescriptor {
            path: path.into(),
            priority,
        };
        self.registry.textures.insert(key, descriptor);
        self
    }

    /// Finish the registry, reporting every invalid entry at once
    pub fn build(self) -> Result<AssetRegistry> {
        if self.problems.is_empty() {
            Ok(self.registry)
        } else {
            Err(PreloadError::InvalidRegistry(self.problems.join("; ")))
        }
    }

    fn check(&mut self, category: AssetCategory, key: &str, priority: u32) {
        if priority == 0 {
            self.problems
                .push(format!("{category}/{key}: priority must be at least 1"));
        }
        if self.registry.contains(category, key) {
            self.problems.push(format!("{category}/{key}: duplicate key"));
        }
    }
}

fn portfolio_builder() -> AssetRegistryBuilder {
    AssetRegistry::builder()
        .model("avatar", "models/low/me_low.glb", "models/me.glb", 1)
        .model("room", "models/low/Room_low.glb", "models/Room.glb", 2)
        .animation("typing", "animations/TypingSmall.fbx", 1)
        .animation("standing", "animations/Standing.fbx", 1)
        .animation("landing", "animations/Landing.fbx", 2)
        .animation("falling", "animations/Falling.fbx", 3)
        .animation("dancing", "animations/Dancing.fbx", 3)
        .animation("thumbsUp", "animations/ThumbsUp.fbx", 2)
        .texture("roomBaked", "textures/RoomBaked.jpg", 1)
}
