//! Polymorphic references resolved through a type-tag registry
//!
//! A host describes the entities it can comment on (or that can author
//! comments) as a sum type `T` and registers one loader per type tag:
//!
//! ```ignore
//! enum Content { Article(Article), Video(Video) }
//!
//! let mut contents = MorphRegistry::new();
//! contents.register_type::<Article, _>(|key| articles.find(key).map(Content::Article));
//! contents.register_type::<Video, _>(|key| videos.find(key).map(Content::Video));
//! ```

use crate::error::{CommentsError, Result};
use crate::types::{EntityKey, MorphRef, MorphType};
use std::collections::HashMap;
use std::fmt;

/// An entity addressable by a polymorphic reference
pub trait Morph {
    /// Type tag stored in `*_type` columns
    const MORPH_TYPE: &'static str;

    /// Identifier stored in `*_id` columns
    fn morph_key(&self) -> EntityKey;

    /// The full reference
    fn morph_ref(&self) -> MorphRef {
        MorphRef::new(Self::MORPH_TYPE, self.morph_key())
    }
}

type Loader<T> = Box<dyn Fn(&EntityKey) -> Result<Option<T>> + Send + Sync>;

/// Type tag to loader map
pub struct MorphRegistry<T> {
    loaders: HashMap<MorphType, Loader<T>>,
}

impl<T> MorphRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Register a loader for a type tag, replacing any previous one
    pub fn register<F>(&mut self, tag: impl Into<MorphType>, loader: F) -> &mut Self
    where
        T: 'static,
        F: Fn(&EntityKey) -> Option<T> + Send + Sync + 'static,
    {
        self.register_fallible(tag, move |key| Ok(loader(key)))
    }

    /// Register a loader whose lookups can fail; errors surface unchanged
    pub fn register_fallible<F>(&mut self, tag: impl Into<MorphType>, loader: F) -> &mut Self
    where
        T: 'static,
        F: Fn(&EntityKey) -> Result<Option<T>> + Send + Sync + 'static,
    {
        let tag = tag.into();
        tracing::debug!(%tag, "registering morph loader");
        self.loaders.insert(tag, Box::new(loader));
        self
    }

    /// Register a loader under the tag of a `Morph` type
    pub fn register_type<M, F>(&mut self, loader: F) -> &mut Self
    where
        T: 'static,
        M: Morph,
        F: Fn(&EntityKey) -> Option<T> + Send + Sync + 'static,
    {
        self.register(M::MORPH_TYPE, loader)
    }

    /// Whether a loader exists for the tag
    pub fn contains(&self, tag: &MorphType) -> bool {
        self.loaders.contains_key(tag)
    }

    /// Registered tags, sorted
    pub fn types(&self) -> Vec<&MorphType> {
        let mut tags: Vec<_> = self.loaders.keys().collect();
        tags.sort();
        tags
    }

    /// Load the referenced entity. A registered tag whose loader finds
    /// nothing yields `Ok(None)`; an unregistered tag is an error.
    pub fn resolve(&self, target: &MorphRef) -> Result<Option<T>> {
        let loader = self
            .loaders
            .get(&target.morph_type)
            .ok_or_else(|| CommentsError::UnknownMorphType(target.morph_type.clone()))?;
        loader(&target.id)
    }
}

impl<T> Default for MorphRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MorphRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MorphRegistry")
            .field("types", &self.types())
            .finish()
    }
}
