/// Identifier resolution module.
///
/// Maps free-form element references (ids, names, paths, legacy composite
/// formats) onto a single node of the graph index.
mod resolver;

pub use resolver::{resolve_identifier, IdentifierResolver, Resolution};
