//! MCP tool definitions and dispatch.
//!
//! Each tool maps to a resolver or search-engine call on [`GraphScout`]. Search
//! failures are rendered as tool output rather than JSON-RPC errors, so a
//! missing backend never looks like a broken server.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{GraphScoutError, Result, SearchFailure};
use crate::scout::GraphScout;
use crate::types::NodeKind;

/// Maximum character length for a tool response before truncation.
const MAX_RESPONSE_CHARS: usize = 15_000;

const DEFAULT_SEMANTIC_LIMIT: usize = 5;
const DEFAULT_MEANING_LIMIT: usize = 10;

/// A tool definition exposed by the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool's input parameters.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn type_property() -> Value {
    json!({
        "type": "string",
        "enum": ["function", "class", "file", "method", "interface", "module", "variable"],
        "description": "Element type to search (default: function)"
    })
}

/// Returns the list of all tool definitions exposed by this MCP server.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "resolve_element".to_string(),
            description: "Resolve an element reference (id, name, file path, or file:symbol:line) to a single graph node.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "element_id": {
                        "type": "string",
                        "description": "Element id, symbol name, qualified name, or file path"
                    }
                },
                "required": ["element_id"]
            }),
        },
        ToolDefinition {
            name: "semantic_search".to_string(),
            description: "Find code elements whose meaning is similar to a natural-language query.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Natural-language query" },
                    "type": type_property(),
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of results (default: 5)"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: "find_duplicates".to_string(),
            description: "Find near-duplicate implementations of an element, grouped by directory.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Element name or description" },
                    "type": type_property()
                },
                "required": ["name"]
            }),
        },
        ToolDefinition {
            name: "meaning_search".to_string(),
            description: "Search functions, classes and files at once for a described behavior.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "meaning": { "type": "string", "description": "Description of the behavior to find" },
                    "limit": {
                        "type": "number",
                        "description": "Maximum number of results (default: 10)"
                    }
                },
                "required": ["meaning"]
            }),
        },
        ToolDefinition {
            name: "suggest_refactoring".to_string(),
            description: "Check whether an element has enough similar code to be worth consolidating.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "element": { "type": "string", "description": "Element name or description" },
                    "type": type_property()
                },
                "required": ["element"]
            }),
        },
        ToolDefinition {
            name: "hybrid_search".to_string(),
            description: "Combine exact graph name matches with semantic matches into one ranked list.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Name fragment or query" },
                    "type": type_property()
                },
                "required": ["query"]
            }),
        },
        ToolDefinition {
            name: "graph_status".to_string(),
            description: "Return statistics about the loaded graph and whether semantic search is available.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

/// Dispatches a tool call to the appropriate handler.
///
/// `server_stats`, when given, is attached to the `graph_status` output.
pub async fn handle_tool_call(
    scout: &GraphScout,
    tool_name: &str,
    args: Value,
    server_stats: Option<Value>,
) -> Result<Value> {
    match tool_name {
        "resolve_element" => handle_resolve(scout, &args),
        "semantic_search" => handle_semantic_search(scout, &args).await,
        "find_duplicates" => handle_find_duplicates(scout, &args).await,
        "meaning_search" => handle_meaning_search(scout, &args).await,
        "suggest_refactoring" => handle_suggest_refactoring(scout, &args).await,
        "hybrid_search" => handle_hybrid_search(scout, &args).await,
        "graph_status" => handle_status(scout, server_stats),
        _ => Err(GraphScoutError::InvalidArgument {
            message: format!("unknown tool: {}", tool_name),
        }),
    }
}

/// Converts a search outcome into JSON: the response on success, or
/// `{"error": <code>, "message": ...}` on failure.
pub fn outcome_json<T: Serialize>(outcome: std::result::Result<T, SearchFailure>) -> Value {
    match outcome {
        Ok(response) => serde_json::to_value(response).unwrap_or(Value::Null),
        Err(failure) => json!({
            "error": failure.code(),
            "message": failure.to_string(),
        }),
    }
}

/// Truncates a string to the maximum response character limit, appending
/// a truncation notice if necessary.
fn truncate_response(s: &str) -> String {
    if s.len() <= MAX_RESPONSE_CHARS {
        s.to_string()
    } else {
        let mut end = MAX_RESPONSE_CHARS;
        while !s.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}\n\n[... truncated at {} chars]", &s[..end], end)
    }
}

fn text_content(text: &str) -> Value {
    json!({
        "content": [{ "type": "text", "text": truncate_response(text) }]
    })
}

fn json_content(value: &Value) -> Value {
    text_content(&serde_json::to_string_pretty(value).unwrap_or_default())
}

fn required_str<'v>(args: &'v Value, key: &str) -> Result<&'v str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| GraphScoutError::InvalidArgument {
            message: format!("missing required parameter: {key}"),
        })
}

fn optional_limit(args: &Value, default: usize) -> usize {
    args.get("limit")
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
        .unwrap_or(default)
}

fn optional_kind(args: &Value) -> Result<NodeKind> {
    match args.get("type").and_then(|v| v.as_str()) {
        None => Ok(NodeKind::Function),
        Some(raw) => NodeKind::from_str(raw).ok_or_else(|| GraphScoutError::InvalidArgument {
            message: format!("unknown element type: {raw}"),
        }),
    }
}

/// Handles `resolve_element` tool calls.
fn handle_resolve(scout: &GraphScout, args: &Value) -> Result<Value> {
    let element_id = required_str(args, "element_id")?;

    match scout.resolve_detailed(element_id) {
        Some(resolution) => {
            let node = resolution.node;
            let output = json!({
                "id": node.id,
                "type": node.kind.as_str(),
                "name": node.name(),
                "path": node.path(),
                "strategy": resolution.strategy,
            });
            Ok(json_content(&output))
        }
        None => Ok(text_content(&format!("Element not found: {}", element_id))),
    }
}

/// Handles `semantic_search` tool calls.
async fn handle_semantic_search(scout: &GraphScout, args: &Value) -> Result<Value> {
    let query = required_str(args, "query")?;
    let kind = optional_kind(args)?;
    let limit = optional_limit(args, DEFAULT_SEMANTIC_LIMIT);

    let outcome = scout.engine().semantic_search(query, kind, limit).await;
    Ok(json_content(&outcome_json(outcome)))
}

/// Handles `find_duplicates` tool calls.
async fn handle_find_duplicates(scout: &GraphScout, args: &Value) -> Result<Value> {
    let name = required_str(args, "name")?;
    let kind = optional_kind(args)?;

    let outcome = scout.engine().find_duplicates(name, kind).await;
    Ok(json_content(&outcome_json(outcome)))
}

/// Handles `meaning_search` tool calls.
async fn handle_meaning_search(scout: &GraphScout, args: &Value) -> Result<Value> {
    let meaning = required_str(args, "meaning")?;
    let limit = optional_limit(args, DEFAULT_MEANING_LIMIT);

    let outcome = scout.engine().meaning_search(meaning, limit).await;
    Ok(json_content(&outcome_json(outcome)))
}

/// Handles `suggest_refactoring` tool calls.
async fn handle_suggest_refactoring(scout: &GraphScout, args: &Value) -> Result<Value> {
    let element = required_str(args, "element")?;
    let kind = optional_kind(args)?;

    let outcome = scout.engine().suggest_refactor(element, kind).await;
    Ok(json_content(&outcome_json(outcome)))
}

/// Handles `hybrid_search` tool calls.
async fn handle_hybrid_search(scout: &GraphScout, args: &Value) -> Result<Value> {
    let query = required_str(args, "query")?;
    let kind = optional_kind(args)?;

    let outcome = scout.engine().hybrid_search(query, kind).await;
    Ok(json_content(&outcome_json(outcome)))
}

/// Handles `graph_status` tool calls.
fn handle_status(scout: &GraphScout, server_stats: Option<Value>) -> Result<Value> {
    let mut output = serde_json::to_value(scout.get_stats())?;
    if let (Some(stats), Some(map)) = (server_stats, output.as_object_mut()) {
        map.insert("server".to_string(), stats);
    }
    Ok(json_content(&output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definitions_complete() {
        let tools = get_tool_definitions();
        assert_eq!(tools.len(), 7);

        let tool_names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        for expected in [
            "resolve_element",
            "semantic_search",
            "find_duplicates",
            "meaning_search",
            "suggest_refactoring",
            "hybrid_search",
            "graph_status",
        ] {
            assert!(tool_names.contains(&expected), "missing tool {expected}");
        }
    }

    #[test]
    fn test_tool_definitions_have_schemas() {
        for tool in get_tool_definitions() {
            assert!(!tool.description.is_empty());
            assert_eq!(tool.input_schema["type"], "object");
        }
    }

    #[test]
    fn test_truncate_long_response() {
        let long = "x".repeat(20_000);
        let result = truncate_response(&long);
        assert!(result.len() < 20_000);
        assert!(result.contains("[... truncated at 15000 chars]"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        // A one-byte prefix puts every two-byte char boundary on an odd index.
        let long = format!("a{}", "é".repeat(10_000));
        let result = truncate_response(&long);
        assert!(result.contains("[... truncated at 14999 chars]"));
    }

    #[test]
    fn test_optional_kind_defaults_to_function() {
        assert_eq!(optional_kind(&json!({})).unwrap(), NodeKind::Function);
        assert_eq!(optional_kind(&json!({"type": "CLASS"})).unwrap(), NodeKind::Class);
        assert!(optional_kind(&json!({"type": "widget"})).is_err());
    }

    #[test]
    fn test_outcome_json_renders_failures() {
        let value = outcome_json::<Value>(Err(SearchFailure::BackendUnavailable));
        assert_eq!(value["error"], "backend_unavailable");
        assert!(value["message"].as_str().unwrap().contains("not available"));
    }
}
