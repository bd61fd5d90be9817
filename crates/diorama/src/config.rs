//! Configuration types for the Diorama engine.
//!
//! All types implement [`serde::Deserialize`] with defaults on every field, so
//! an empty document yields [`EngineConfig::default`].
//!
//! # Overview
//!
//! - [`EngineConfig`] - Top-level configuration combining layout and size settings.
//! - [`LayoutConfig`] - Overlap resolution parameters and the empty-graph fallback box.
//! - [`KindSizes`] - Default node size per [`NodeKind`](diorama_core::kind::NodeKind).
//!
//! # Example
//!
//! ```
//! # use diorama::config::EngineConfig;
//! let config = EngineConfig::default();
//! assert_eq!(config.layout().min_gap(), 20.0);
//! assert_eq!(config.layout().max_passes(), 10);
//! assert!(config.validate().is_ok());
//! ```

use serde::Deserialize;

use diorama_core::{
    geometry::{Bounds, Point, Size},
    kind::{KindSizes, NodeKind},
};

use crate::{DioramaError, overlap::OverlapOptions};

/// Gap left between two nodes pushed apart by the overlap resolver.
pub const DEFAULT_MIN_GAP: f32 = 20.0;

/// Upper bound on overlap resolution passes.
pub const DEFAULT_MAX_PASSES: usize = 10;

/// Size of the box reported for an empty node set, centered at the origin.
pub const DEFAULT_EMPTY_SIZE: Size = Size::new(800.0, 600.0);

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Default node sizes section.
    #[serde(default)]
    sizes: KindSizes,
}

impl EngineConfig {
    /// Creates a new [`EngineConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `layout` - Overlap resolution and fallback settings.
    /// * `sizes` - Default size for each node kind.
    pub fn new(layout: LayoutConfig, sizes: KindSizes) -> Self {
        Self { layout, sizes }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the default node sizes.
    pub fn sizes(&self) -> &KindSizes {
        &self.sizes
    }

    /// Checks that every value can drive the engine.
    ///
    /// # Errors
    ///
    /// Returns [`DioramaError::Config`] if the gap is negative or not finite,
    /// the pass bound is zero, or any size is not strictly positive.
    pub fn validate(&self) -> Result<(), DioramaError> {
        let min_gap = self.layout.min_gap;
        if !min_gap.is_finite() || min_gap < 0.0 {
            return Err(DioramaError::Config(format!(
                "layout.min_gap must be a non-negative number, got {min_gap}"
            )));
        }

        if self.layout.max_passes == 0 {
            return Err(DioramaError::Config(
                "layout.max_passes must be at least 1".to_string(),
            ));
        }

        if !self.layout.empty_size.is_positive() {
            return Err(DioramaError::Config(
                "layout.empty_size must have positive width and height".to_string(),
            ));
        }

        for kind in NodeKind::ALL {
            if !self.sizes.size_for(kind).is_positive() {
                return Err(DioramaError::Config(format!(
                    "sizes.{kind} must have positive width and height"
                )));
            }
        }

        Ok(())
    }
}

/// Overlap resolution parameters and the empty-graph fallback.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap between nodes separated by the overlap resolver.
    min_gap: f32,

    /// Maximum number of overlap resolution passes.
    max_passes: usize,

    /// Size of the box reported for an empty node set.
    empty_size: Size,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_gap: DEFAULT_MIN_GAP,
            max_passes: DEFAULT_MAX_PASSES,
            empty_size: DEFAULT_EMPTY_SIZE,
        }
    }
}

impl LayoutConfig {
    /// Creates a new [`LayoutConfig`].
    pub fn new(min_gap: f32, max_passes: usize, empty_size: Size) -> Self {
        Self {
            min_gap,
            max_passes,
            empty_size,
        }
    }

    pub fn min_gap(&self) -> f32 {
        self.min_gap
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Returns the fallback box for an empty node set, centered at the origin.
    pub fn empty_bounds(&self) -> Bounds {
        Bounds::new_from_center(Point::default(), self.empty_size)
    }

    /// Returns the overlap resolver options described by this section.
    pub fn overlap_options(&self) -> OverlapOptions {
        OverlapOptions::new(self.min_gap, self.max_passes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.layout().min_gap(), DEFAULT_MIN_GAP);
        assert_eq!(config.layout().max_passes(), DEFAULT_MAX_PASSES);
        assert_eq!(
            config.layout().empty_bounds(),
            Bounds::new(-400.0, -300.0, 400.0, 300.0)
        );
        assert_eq!(
            config.sizes().size_for(NodeKind::Decision),
            NodeKind::Decision.default_size()
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"layout": {"min_gap": 8.0}, "sizes": {"note": {"width": 50.0, "height": 50.0}}}"#,
        )
        .unwrap();

        assert_eq!(config.layout().min_gap(), 8.0);
        assert_eq!(config.layout().max_passes(), DEFAULT_MAX_PASSES);
        assert_eq!(config.sizes().size_for(NodeKind::Note), Size::new(50.0, 50.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_gap() {
        let config = EngineConfig::new(
            LayoutConfig::new(-1.0, DEFAULT_MAX_PASSES, DEFAULT_EMPTY_SIZE),
            KindSizes::default(),
        );
        assert!(matches!(config.validate(), Err(DioramaError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_passes() {
        let config = EngineConfig::new(
            LayoutConfig::new(DEFAULT_MIN_GAP, 0, DEFAULT_EMPTY_SIZE),
            KindSizes::default(),
        );
        assert!(matches!(config.validate(), Err(DioramaError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_degenerate_kind_size() {
        let config = EngineConfig::new(
            LayoutConfig::default(),
            KindSizes::default().with_size(NodeKind::Data, Size::new(0.0, 10.0)),
        );

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sizes.data"));
    }
}
