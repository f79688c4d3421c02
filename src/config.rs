use std::sync::Arc;

use crate::interpreter::{colors::ColorManager, units::UnitManager};

/// Default number of iterations a single `while` loop may run.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Settings and registries shared by an evaluation.
///
/// The registries are populated by the host before interpretation starts and
/// are only read afterwards, so one `Config` can back many evaluations, also
/// concurrently. Color scripts run in nested evaluators that receive a clone
/// of the outer `Config`.
///
/// # Example
/// ```
/// use tokenscript::{config::Config, interpreter::colors::ColorManager};
///
/// let config = Config::default().with_max_iterations(10)
///                               .with_colors(ColorManager::new());
///
/// assert_eq!(config.max_iterations, 10);
/// assert!(config.units.is_unit("px"));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of iterations of one `while` loop.
    pub max_iterations: usize,
    /// Registered color formats and conversions.
    pub colors:         Arc<ColorManager>,
    /// Registered units.
    pub units:          Arc<UnitManager>,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_iterations: DEFAULT_MAX_ITERATIONS,
               colors:         Arc::new(ColorManager::new()),
               units:          Arc::new(UnitManager::default()), }
    }
}

impl Config {
    /// Replaces the loop iteration limit.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Replaces the color registry.
    #[must_use]
    pub fn with_colors(mut self, colors: ColorManager) -> Self {
        self.colors = Arc::new(colors);
        self
    }

    /// Replaces the unit registry.
    #[must_use]
    pub fn with_units(mut self, units: UnitManager) -> Self {
        self.units = Arc::new(units);
        self
    }
}
