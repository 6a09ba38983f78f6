//! Conversion registry.
//!
//! Maps conversion names to transform functions. Populated once at setup and
//! read-only afterwards; the executor resolves names against it at apply time.

use std::collections::HashMap;
use std::sync::Arc;

use image::DynamicImage;
use serde_json::Value as JsonValue;

use crate::error::{ConversionError, ConversionResult};

/// A registered transform: source image plus positional arguments in, result
/// image out. Transform internals are opaque to the pipeline.
pub type Conversion =
    dyn Fn(DynamicImage, &[JsonValue]) -> anyhow::Result<DynamicImage> + Send + Sync;

#[derive(Default)]
pub struct ConversionRegistry {
    conversions: HashMap<String, Arc<Conversion>>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a transform to a name. Last write wins: a later binding for the
    /// same name silently replaces the earlier one.
    pub fn register<F>(&mut self, name: impl Into<String>, conversion: F)
    where
        F: Fn(DynamicImage, &[JsonValue]) -> anyhow::Result<DynamicImage> + Send + Sync + 'static,
    {
        self.conversions.insert(name.into(), Arc::new(conversion));
    }

    /// Look up a transform by name. This is the only place conversion names
    /// are validated in the whole pipeline; unknown names surface here.
    pub fn get(&self, name: &str) -> ConversionResult<Arc<Conversion>> {
        self.conversions
            .get(name)
            .cloned()
            .ok_or_else(|| ConversionError::UnknownConversion(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.conversions.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};

    fn blank(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ConversionRegistry::new();
        registry.register("thumb", |image, _args| Ok(image.thumbnail(10, 10)));

        assert!(registry.contains("thumb"));

        let conversion = registry.get("thumb").unwrap();
        let result = conversion(blank(100, 100), &[]).unwrap();
        assert_eq!(result.width(), 10);
    }

    #[test]
    fn test_unknown_name_fails() {
        let registry = ConversionRegistry::new();

        let result = registry.get("missing");
        assert!(matches!(
            result,
            Err(ConversionError::UnknownConversion(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_later_registration_wins() {
        let mut registry = ConversionRegistry::new();
        registry.register("thumb", |image, _args| Ok(image.thumbnail(10, 10)));
        registry.register("thumb", |image, _args| Ok(image.thumbnail(20, 20)));

        let conversion = registry.get("thumb").unwrap();
        let result = conversion(blank(100, 100), &[]).unwrap();
        assert_eq!(result.width(), 20);
    }
}
