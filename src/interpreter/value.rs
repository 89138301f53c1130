/// The `Value` enum.
///
/// Defines the tagged runtime values together with their type tags, equality
/// and display form.
pub mod core;
/// Callable values.
///
/// Defines user-defined function values with their closure handle, and native
/// builtins with their arity.
pub mod function;
