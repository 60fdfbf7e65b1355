//! Shared paint resources referenced by weak handles from recorded ops.
//!
//! Records never own gradients, patterns or registered images. They store a
//! [`ResourceKey`], and playback looks it up here. A key whose resource was removed resolves to
//! `None`, which playback treats as a no-op for that single op.

use std::rc::Rc;

use slotmap::SlotMap;

use crate::foundation::core::PixelMap;
use crate::paint::{Gradient, Pattern};

slotmap::new_key_type! {
    /// Generational handle to a [`Resource`].
    pub struct ResourceKey;
}

/// A resource that style and image ops can reference.
#[derive(Clone, Debug)]
pub enum Resource {
    /// Gradient style.
    Gradient(Gradient),
    /// Pattern style.
    Pattern(Pattern),
    /// Image source for `drawImage`.
    Image(Rc<PixelMap>),
}

/// Slot map of live resources.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    items: SlotMap<ResourceKey, Resource>,
}

impl ResourceRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register any resource.
    pub fn insert(&mut self, resource: Resource) -> ResourceKey {
        self.items.insert(resource)
    }

    /// Register a gradient.
    pub fn insert_gradient(&mut self, gradient: Gradient) -> ResourceKey {
        self.insert(Resource::Gradient(gradient))
    }

    /// Register a pattern.
    pub fn insert_pattern(&mut self, pattern: Pattern) -> ResourceKey {
        self.insert(Resource::Pattern(pattern))
    }

    /// Register an image.
    pub fn insert_image(&mut self, image: Rc<PixelMap>) -> ResourceKey {
        self.insert(Resource::Image(image))
    }

    /// Look up any resource.
    pub fn get(&self, key: ResourceKey) -> Option<&Resource> {
        self.items.get(key)
    }

    /// Look up a gradient. `None` if missing or of another type.
    pub fn gradient(&self, key: ResourceKey) -> Option<&Gradient> {
        match self.items.get(key)? {
            Resource::Gradient(g) => Some(g),
            _ => None,
        }
    }

    /// Mutable gradient access, for adding color stops.
    pub fn gradient_mut(&mut self, key: ResourceKey) -> Option<&mut Gradient> {
        match self.items.get_mut(key)? {
            Resource::Gradient(g) => Some(g),
            _ => None,
        }
    }

    /// Look up a pattern.
    pub fn pattern(&self, key: ResourceKey) -> Option<&Pattern> {
        match self.items.get(key)? {
            Resource::Pattern(p) => Some(p),
            _ => None,
        }
    }

    /// Look up an image.
    pub fn image(&self, key: ResourceKey) -> Option<&Rc<PixelMap>> {
        match self.items.get(key)? {
            Resource::Image(img) => Some(img),
            _ => None,
        }
    }

    /// `true` while `key` resolves.
    pub fn contains(&self, key: ResourceKey) -> bool {
        self.items.contains_key(key)
    }

    /// Remove a resource. Ops already recorded against `key` become no-ops.
    pub fn remove(&mut self, key: ResourceKey) -> Option<Resource> {
        self.items.remove(key)
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when no resource is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resources/registry.rs"]
mod tests;
