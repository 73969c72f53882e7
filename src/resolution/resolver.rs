use tracing::debug;

use crate::graph::GraphIndex;
use crate::types::{Node, NodeKind};

/// A node matched by the resolver, along with the strategy that found it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'g> {
    pub node: &'g Node,
    pub strategy: &'static str,
}

/// A resolution strategy: returns the first node it accepts, if any.
type Strategy = for<'g> fn(&ParsedIdentifier<'_>, &'g dyn GraphIndex) -> Option<&'g Node>;

/// The cascade, cheapest and least ambiguous first. The first hit wins.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("exact-id", exact_id),
    ("project-prefixed", project_prefixed),
    ("file-path", file_path),
    ("function-name", function_name),
    ("class-name", class_name),
];

/// Resolves free-form identifiers (ids, symbol names, `file:symbol:line`
/// composites, `a::b` qualified names, file paths) to a single graph node.
///
/// The resolver holds no state beyond the borrowed index and the active
/// project id, and never mutates the index.
pub struct IdentifierResolver<'g> {
    index: &'g dyn GraphIndex,
    project_id: String,
}

impl<'g> IdentifierResolver<'g> {
    /// Creates a resolver over `index`. An empty `project_id` disables the
    /// project-prefixed lookup.
    pub fn new(index: &'g dyn GraphIndex, project_id: &str) -> Self {
        Self {
            index,
            project_id: project_id.to_string(),
        }
    }

    /// Resolves `requested` to at most one node.
    ///
    /// Returns `None` for empty input or when no strategy matches.
    pub fn resolve(&self, requested: &str) -> Option<&'g Node> {
        self.resolve_detailed(requested).map(|r| r.node)
    }

    /// Like [`resolve`](Self::resolve), but also reports which strategy matched.
    pub fn resolve_detailed(&self, requested: &str) -> Option<Resolution<'g>> {
        let trimmed = requested.trim();
        if trimmed.is_empty() {
            return None;
        }

        let parsed = ParsedIdentifier::parse(trimmed, &self.project_id);
        for (name, strategy) in STRATEGIES {
            if let Some(node) = strategy(&parsed, self.index) {
                debug!(strategy = *name, requested = trimmed, node_id = %node.id, "resolved identifier");
                return Some(Resolution {
                    node,
                    strategy: *name,
                });
            }
        }

        debug!(requested = trimmed, "identifier did not resolve");
        None
    }
}

/// Resolves `requested` against `index` for the given active project.
pub fn resolve_identifier<'g>(
    requested: &str,
    index: &'g dyn GraphIndex,
    project_id: &str,
) -> Option<&'g Node> {
    IdentifierResolver::new(index, project_id).resolve(requested)
}

// ------------------------------------------------------------------
// Identifier parsing
// ------------------------------------------------------------------

/// The different views of a requested identifier that strategies match on.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedIdentifier<'a> {
    /// Trimmed input, otherwise untouched.
    pub raw: &'a str,
    pub project_id: &'a str,
    /// `raw` with backslashes turned into forward slashes.
    pub normalized: String,
    /// Final `/` segment of `normalized`.
    pub basename: String,
    /// Last `:` segment, or the whole input when there is no colon.
    pub tail: &'a str,
    /// The symbol in `file:symbol:line`, otherwise the tail.
    pub scoped_name: &'a str,
    /// Text after the last `::`, otherwise the scoped name.
    pub symbol_tail: &'a str,
}

impl<'a> ParsedIdentifier<'a> {
    pub fn parse(raw: &'a str, project_id: &'a str) -> Self {
        let normalized = raw.replace('\\', "/");
        let basename = basename(&normalized).to_string();

        let segments: Vec<&str> = raw.split(':').collect();
        let tail = if segments.len() >= 2 {
            segments[segments.len() - 1]
        } else {
            raw
        };
        let scoped_name = if segments.len() > 2 && is_line_number(tail) {
            segments[segments.len() - 2]
        } else {
            tail
        };
        let symbol_tail = match raw.rfind("::") {
            Some(pos) => &raw[pos + 2..],
            None => scoped_name,
        };

        Self {
            raw,
            project_id,
            normalized,
            basename,
            tail,
            scoped_name,
            symbol_tail,
        }
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn is_line_number(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

// ------------------------------------------------------------------
// Strategies
// ------------------------------------------------------------------

fn exact_id<'g>(id: &ParsedIdentifier<'_>, index: &'g dyn GraphIndex) -> Option<&'g Node> {
    index.get_node(id.raw)
}

fn project_prefixed<'g>(id: &ParsedIdentifier<'_>, index: &'g dyn GraphIndex) -> Option<&'g Node> {
    if id.project_id.is_empty() {
        return None;
    }
    let prefix = format!("{}:", id.project_id);
    if id.raw.starts_with(&prefix) {
        return None;
    }
    index.get_node(&format!("{prefix}{}", id.raw))
}

fn file_path<'g>(id: &ParsedIdentifier<'_>, index: &'g dyn GraphIndex) -> Option<&'g Node> {
    let id_suffix = format!(":{}", id.normalized);

    index.nodes_by_kind(NodeKind::File).into_iter().find(|node| {
        if node.id == id.raw || node.id.ends_with(&id_suffix) {
            return true;
        }

        let Some(path) = node.path() else {
            return false;
        };
        let node_path = path.replace('\\', "/");
        if node_path.is_empty() {
            return false;
        }

        // Suffix matching in both directions lets short inputs such as "b.ts"
        // match any file ending in it; the first such file in index order wins.
        node_path == id.normalized
            || node_path.ends_with(&id.normalized)
            || id.normalized.ends_with(&node_path)
            || basename(&node_path) == id.basename
    })
}

fn function_name<'g>(id: &ParsedIdentifier<'_>, index: &'g dyn GraphIndex) -> Option<&'g Node> {
    find_symbol(id, index, NodeKind::Function)
}

fn class_name<'g>(id: &ParsedIdentifier<'_>, index: &'g dyn GraphIndex) -> Option<&'g Node> {
    find_symbol(id, index, NodeKind::Class)
}

fn find_symbol<'g>(
    id: &ParsedIdentifier<'_>,
    index: &'g dyn GraphIndex,
    kind: NodeKind,
) -> Option<&'g Node> {
    let id_suffix = format!(":{}", id.raw);

    index.nodes_by_kind(kind).into_iter().find(|node| {
        let name_matches = node.name().is_some_and(|name| {
            !name.is_empty()
                && (name == id.raw
                    || name == id.tail
                    || name == id.scoped_name
                    || name == id.symbol_tail)
        });
        name_matches || node.id == id.raw || node.id.ends_with(&id_suffix)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_composite_with_line_number() {
        let parsed = ParsedIdentifier::parse("src/app.ts:handleRequest:42", "");
        assert_eq!(parsed.tail, "42");
        assert_eq!(parsed.scoped_name, "handleRequest");
        assert_eq!(parsed.symbol_tail, "handleRequest");
        assert_eq!(parsed.basename, "app.ts:handleRequest:42");
    }

    #[test]
    fn parse_two_segments_keeps_tail_as_scoped_name() {
        let parsed = ParsedIdentifier::parse("app.ts:42", "");
        assert_eq!(parsed.tail, "42");
        assert_eq!(parsed.scoped_name, "42");
    }

    #[test]
    fn parse_double_colon_symbol_tail() {
        let parsed = ParsedIdentifier::parse("crate::engine::Parser", "");
        assert_eq!(parsed.tail, "Parser");
        assert_eq!(parsed.scoped_name, "Parser");
        assert_eq!(parsed.symbol_tail, "Parser");
    }

    #[test]
    fn parse_plain_name_has_itself_as_tail() {
        let parsed = ParsedIdentifier::parse("formatDate", "");
        assert_eq!(parsed.tail, "formatDate");
        assert_eq!(parsed.scoped_name, "formatDate");
        assert_eq!(parsed.symbol_tail, "formatDate");
    }

    #[test]
    fn parse_normalizes_windows_separators() {
        let parsed = ParsedIdentifier::parse(r"src\utils\date.ts", "");
        assert_eq!(parsed.normalized, "src/utils/date.ts");
        assert_eq!(parsed.basename, "date.ts");
    }

    #[test]
    fn strategy_order_is_fixed() {
        let names: Vec<&str> = STRATEGIES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            [
                "exact-id",
                "project-prefixed",
                "file-path",
                "function-name",
                "class-name"
            ]
        );
    }
}
