#![forbid(unsafe_code)]

//! Coarse classification of modal type identifiers.
//!
//! Type identifiers follow the `<platform>-<size>-<placement>` convention
//! (`mo-small-center`, `pc-large-center`, `mo-large-full`). Classification is
//! by substring so that custom identifiers keep working as long as they carry
//! the size/placement word somewhere.

use std::fmt;

/// Size class of a modal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum SizeClass {
    #[default]
    Small,
    Medium,
    Large,
}

impl SizeClass {
    /// Classify a type identifier. First match wins in the order small,
    /// medium, large; identifiers with none of the words are small.
    #[must_use]
    pub fn classify(type_id: &str) -> Self {
        if type_id.contains("small") {
            Self::Small
        } else if type_id.contains("medium") {
            Self::Medium
        } else if type_id.contains("large") {
            Self::Large
        } else {
            Self::Small
        }
    }

    /// Number of filler paragraphs an instance of this size is built with.
    #[must_use]
    pub const fn paragraph_count(self) -> usize {
        match self {
            Self::Small => 1,
            Self::Medium => 2,
            Self::Large => 10,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the content sits inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Placement {
    #[default]
    Center,
    Bottom,
    Full,
}

impl Placement {
    /// Classify a type identifier by its placement word, defaulting to center.
    #[must_use]
    pub fn classify(type_id: &str) -> Self {
        if type_id.contains("center") {
            Self::Center
        } else if type_id.contains("bottom") {
            Self::Bottom
        } else if type_id.contains("full") {
            Self::Full
        } else {
            Self::Center
        }
    }

    /// Whether the footer gets the rounded bottom corner treatment.
    ///
    /// Only center placement shows the content as a floating card; bottom
    /// sheets and full-screen layouts end flush with the viewport.
    #[must_use]
    pub const fn rounds_footer(self) -> bool {
        matches!(self, Self::Center)
    }
}

/// Device family a modal type targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Mobile,
    Desktop,
}

impl Platform {
    /// Mobile iff `type_id` is one of the configured mobile types.
    #[must_use]
    pub fn of<S: AsRef<str>>(type_id: &str, mobile_types: &[S]) -> Self {
        if mobile_types.iter().any(|t| t.as_ref() == type_id) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Overlay fade-out delay per size class, as CSS time literals.
///
/// Larger content takes longer to animate out, so the backdrop waits longer
/// before it starts fading.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct OverlayDelays {
    pub small: String,
    pub medium: String,
    pub large: String,
}

impl Default for OverlayDelays {
    fn default() -> Self {
        Self {
            small: "50ms".into(),
            medium: "150ms".into(),
            large: "300ms".into(),
        }
    }
}

impl OverlayDelays {
    /// Delay literal for a size class.
    #[must_use]
    pub fn for_size(&self, size: SizeClass) -> &str {
        match size {
            SizeClass::Small => &self.small,
            SizeClass::Medium => &self.medium,
            SizeClass::Large => &self.large,
        }
    }
}
