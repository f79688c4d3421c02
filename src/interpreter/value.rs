/// Boolean values.
pub mod boolean;
/// Colors.
///
/// A color is either a literal hex color or a channel map in a format
/// registered with the color manager. Channels of registered formats are
/// readable and writable as attributes.
pub mod color;
/// The `Value` enum, declared types, and coercion.
///
/// Ties the per-type symbols together: dispatches methods and attributes to
/// the right variant, checks values against declared types, and renders
/// values as text.
pub mod core;
/// Dictionaries.
pub mod dictionary;
/// Importing host data.
///
/// Converts JSON values supplied by the host into runtime values, the way
/// references are made available to programs.
pub mod import;
/// Lists, explicit and implicit.
pub mod list;
/// Method tables and the capabilities shared by all value types.
///
/// Declares the `SymbolType` trait, the `method_table!` macro that builds a
/// type's method table, and the arity checking done before every call.
pub mod method;
/// Plain numbers.
pub mod number;
/// Strings.
pub mod string;
/// Numbers with a unit.
pub mod unit;
