//! Building thumbnail lookup.

use std::collections::HashMap;

/// Image used for any group label without an entry.
pub const DEFAULT_BUILDING_IMAGE: &str = "/images/default_building.png";

/// Built-in group label to thumbnail entries.
const BUILTIN_IMAGES: &[(&str, &str)] = &[
    (
        "MAA Library - Digital Media Rooms",
        "/images/maa_building.jpg",
    ),
    ("Koerner Group Study Rooms", "/images/koerner_building.jpg"),
    (
        "Woodward Library Group Study Rooms",
        "/images/woodward_building.jpg",
    ),
    (
        "Research Commons Project Rooms",
        "/images/research_commons_building.jpg",
    ),
];

/// Maps building-group labels to thumbnail references.
///
/// Lookup is exact string match: no trimming, case folding or partial
/// matching. Unknown labels resolve to the default image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingImageIndex {
    images: HashMap<String, String>,
    default_image: String,
}

impl BuildingImageIndex {
    /// Creates an index with no entries, resolving everything to `default_image`.
    #[must_use]
    pub fn empty(default_image: impl Into<String>) -> Self {
        Self {
            images: HashMap::new(),
            default_image: default_image.into(),
        }
    }

    /// Adds or replaces an entry.
    #[must_use]
    pub fn with_image(mut self, group: impl Into<String>, image: impl Into<String>) -> Self {
        self.images.insert(group.into(), image.into());
        self
    }

    /// Replaces the default image.
    #[must_use]
    pub fn with_default_image(mut self, image: impl Into<String>) -> Self {
        self.default_image = image.into();
        self
    }

    /// Builds the index from configuration, layered over the built-in entries.
    #[must_use]
    pub fn from_config(config: &crate::config::ImageConfig) -> Self {
        let mut index = Self::default();
        if let Some(default_image) = &config.default_image {
            index.default_image.clone_from(default_image);
        }
        for (group, image) in &config.buildings {
            index.images.insert(group.clone(), image.clone());
        }
        index
    }

    /// Resolves a group label to its image, falling back to the default.
    #[must_use]
    pub fn resolve(&self, group: &str) -> &str {
        self.images
            .get(group)
            .map_or(self.default_image.as_str(), String::as_str)
    }

    /// Whether the label has its own entry.
    #[must_use]
    pub fn contains(&self, group: &str) -> bool {
        self.images.contains_key(group)
    }

    /// The fallback image.
    #[must_use]
    pub fn default_image(&self) -> &str {
        &self.default_image
    }

    /// Number of entries, not counting the default.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the index has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Iterates over entries in label order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut entries: Vec<_> = self
            .images
            .iter()
            .map(|(group, image)| (group.as_str(), image.as_str()))
            .collect();
        entries.sort_unstable();
        entries.into_iter()
    }
}

impl Default for BuildingImageIndex {
    fn default() -> Self {
        BUILTIN_IMAGES
            .iter()
            .fold(Self::empty(DEFAULT_BUILDING_IMAGE), |index, (group, image)| {
                index.with_image(*group, *image)
            })
    }
}
