//! Backend registry: maps backend tags to handler constructors.

use std::collections::BTreeMap;

use crate::array::ArrayHandler;
use crate::error::ImageError;
use crate::handler::{HandlerContext, ImageHandler};
use crate::skia::SkiaHandler;

/// Builds a handler for a render descriptor.
pub type HandlerConstructor = fn(HandlerContext) -> Result<Box<dyn ImageHandler>, ImageError>;

/// Tag used when no backend is requested.
pub const DEFAULT_BACKEND: &str = SkiaHandler::TAG;

/// Case-insensitive table of available backends.
#[derive(Debug, Clone)]
pub struct HandlerRegistry {
    constructors: BTreeMap<String, HandlerConstructor>,
}

impl HandlerRegistry {
    /// A registry with no backends.
    pub fn empty() -> Self {
        Self {
            constructors: BTreeMap::new(),
        }
    }

    /// Register `constructor` under `tag`, replacing any previous entry.
    pub fn register(&mut self, tag: &str, constructor: HandlerConstructor) -> &mut Self {
        self.constructors.insert(tag.to_ascii_lowercase(), constructor);
        self
    }

    /// True if a backend is registered under `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(&tag.to_ascii_lowercase())
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Build a handler with the backend registered under `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::UnknownBackend`] if `tag` is not registered, or
    /// whatever the constructor returns.
    pub fn create(
        &self,
        tag: &str,
        context: HandlerContext,
    ) -> Result<Box<dyn ImageHandler>, ImageError> {
        let constructor = self
            .constructors
            .get(&tag.to_ascii_lowercase())
            .ok_or_else(|| ImageError::UnknownBackend(tag.to_string()))?;
        constructor(context)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(SkiaHandler::TAG, SkiaHandler::boxed)
            .register(ArrayHandler::TAG, ArrayHandler::boxed);
        registry
    }
}
