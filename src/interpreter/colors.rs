/// The color registry.
///
/// Holds the registered formats, exposes their initializers, renders colors,
/// and runs conversions found in the conversion graph.
pub mod core;
/// The conversion graph and its breadth-first path search.
pub mod graph;
/// Color scripts: tokenscript programs run in a nested evaluator.
pub mod script;
/// Color specification documents, their validation, and URI
/// normalization.
pub mod spec;

pub use self::core::ColorManager;
