#![forbid(unsafe_code)]

//! Modal definitions and the type registry.
//!
//! The [`DefinitionTable`] is built once from a validated [`ModalConfig`].
//! Every lookup the engine performs at runtime (type identifier → instance,
//! type → open/close animation class) goes through this table; nothing is
//! string-built while a modal is animating.

use std::fmt;

use ahash::AHashMap;

use crate::classes::ClassSet;
use crate::config::{ConfigError, DefinitionSpec, ModalConfig};
use crate::size::{Placement, Platform, SizeClass};

/// Index of a modal definition (and of its single instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(usize);

impl InstanceId {
    /// Wrap a raw index. Only meaningful for the table that produced it.
    #[inline]
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Raw index into the definition table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Content animation classes for one modal type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationClasses {
    pub open: String,
    pub close: String,
}

impl AnimationClasses {
    fn resolve(spec: &DefinitionSpec) -> Self {
        Self {
            open: spec
                .open_animation
                .clone()
                .unwrap_or_else(|| format!("modal-{}-open", spec.type_id)),
            close: spec
                .close_animation
                .clone()
                .unwrap_or_else(|| format!("modal-{}-close", spec.type_id)),
        }
    }
}

/// A resolved, immutable modal variant.
#[derive(Debug, Clone)]
pub struct ModalDefinition {
    id: InstanceId,
    type_id: String,
    container: ClassSet,
    content: ClassSet,
    animations: AnimationClasses,
    size: SizeClass,
    placement: Placement,
    platform: Platform,
}

impl ModalDefinition {
    #[must_use]
    pub fn id(&self) -> InstanceId {
        self.id
    }

    #[must_use]
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Structural container classes (without the shared base).
    #[must_use]
    pub fn container(&self) -> &ClassSet {
        &self.container
    }

    /// Structural content classes (without the shared base).
    #[must_use]
    pub fn content(&self) -> &ClassSet {
        &self.content
    }

    #[must_use]
    pub fn animations(&self) -> &AnimationClasses {
        &self.animations
    }

    #[must_use]
    pub fn size(&self) -> SizeClass {
        self.size
    }

    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.platform == Platform::Mobile
    }
}

/// Registry of modal definitions keyed by type identifier.
///
/// # Invariants
///
/// - `defs[i].id == InstanceId(i)` for every `i`.
/// - `index` maps every type identifier to its position; identifiers are unique.
/// - `fullscreen` and `parallax` point at existing definitions.
#[derive(Debug, Clone)]
pub struct DefinitionTable {
    defs: Vec<ModalDefinition>,
    index: AHashMap<String, InstanceId>,
    fullscreen: InstanceId,
    parallax: InstanceId,
}

impl DefinitionTable {
    /// Build the table, validating the configuration first.
    pub fn from_config(config: &ModalConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut defs = Vec::with_capacity(config.definitions.len());
        let mut index = AHashMap::with_capacity(config.definitions.len());
        for (i, spec) in config.definitions.iter().enumerate() {
            let id = InstanceId(i);
            index.insert(spec.type_id.clone(), id);
            defs.push(ModalDefinition {
                id,
                type_id: spec.type_id.clone(),
                container: ClassSet::parse(&spec.container),
                content: ClassSet::parse(&spec.content),
                animations: AnimationClasses::resolve(spec),
                size: SizeClass::classify(&spec.type_id),
                placement: Placement::classify(&spec.type_id),
                platform: Platform::of(&spec.type_id, &config.mobile_types),
            });
        }

        let resolve = |role: &'static str, type_id: &str| {
            index
                .get(type_id)
                .copied()
                .ok_or_else(|| ConfigError::UndefinedType {
                    role,
                    type_id: type_id.to_owned(),
                })
        };
        let fullscreen = resolve("full-screen", &config.fullscreen_type)?;
        let parallax = resolve("parallax", &config.parallax_type)?;

        Ok(Self {
            defs,
            index,
            fullscreen,
            parallax,
        })
    }

    /// Look up a type identifier.
    #[must_use]
    pub fn lookup(&self, type_id: &str) -> Option<InstanceId> {
        self.index.get(type_id).copied()
    }

    /// Definition for an id produced by this table.
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different table.
    #[must_use]
    pub fn get(&self, id: InstanceId) -> &ModalDefinition {
        &self.defs[id.0]
    }

    /// Type identifier for an id produced by this table.
    #[must_use]
    pub fn type_id(&self, id: InstanceId) -> &str {
        &self.defs[id.0].type_id
    }

    /// The full-screen fallback layout.
    #[must_use]
    pub fn fullscreen(&self) -> InstanceId {
        self.fullscreen
    }

    /// The type that drives the parallax effect.
    #[must_use]
    pub fn parallax(&self) -> InstanceId {
        self.parallax
    }

    /// Definitions in mount order.
    pub fn iter(&self) -> impl Iterator<Item = &ModalDefinition> {
        self.defs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DefinitionTable {
        DefinitionTable::from_config(&ModalConfig::default()).expect("default config is valid")
    }

    #[test]
    fn ids_follow_definition_order() {
        let table = table();
        for (i, def) in table.iter().enumerate() {
            assert_eq!(def.id().index(), i);
            assert_eq!(table.lookup(def.type_id()), Some(def.id()));
        }
        assert_eq!(table.len(), 7);
    }

    #[test]
    fn unknown_type_misses() {
        assert_eq!(table().lookup("pc-huge-center"), None);
    }

    #[test]
    fn animation_classes_resolved_at_build_time() {
        let table = table();
        let id = table.lookup("pc-small-center").expect("defined");
        let anim = table.get(id).animations();
        assert_eq!(anim.open, "modal-pc-small-center-open");
        assert_eq!(anim.close, "modal-pc-small-center-close");
    }

    #[test]
    fn animation_override_is_kept() {
        let mut config = ModalConfig::default();
        config.definitions[0] = config.definitions[0].clone().open_animation("pop-in");
        let table = DefinitionTable::from_config(&config).expect("valid");
        assert_eq!(table.get(table.lookup("mo-small-center").expect("defined")).animations().open, "pop-in");
    }

    #[test]
    fn categories() {
        let table = table();
        let bottom = table.get(table.lookup("mo-small-bottom").expect("defined"));
        assert!(bottom.is_mobile());
        assert_eq!(bottom.placement(), Placement::Bottom);
        assert_eq!(bottom.size(), SizeClass::Small);

        let full = table.get(table.fullscreen());
        assert_eq!(full.type_id(), "mo-large-full");
        assert!(!full.is_mobile());
        assert_eq!(table.parallax(), table.fullscreen());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ModalConfig::default().parallax_type("nope");
        assert!(DefinitionTable::from_config(&config).is_err());
    }
}
