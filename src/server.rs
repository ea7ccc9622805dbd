//! MCP server exposing the documentation search tools.

use crate::state::IndexState;
use crate::tools::reload::{ReloadRequest, handle_reload};
use crate::tools::search::{SearchRequest, handle_search};
use crate::tools::stats::handle_index_stats;
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    schemars::{self, JsonSchema, generate::SchemaSettings},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;

/// MCP Server for documentation search queries
#[derive(Clone)]
pub struct DocSearchServer {
    /// Shared, reloadable search index
    state: Arc<IndexState>,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for DocSearchServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocSearchServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl DocSearchServer {
    pub fn new(state: Arc<IndexState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared IndexState.
    pub fn state(&self) -> &Arc<IndexState> {
        &self.state
    }

    #[tool(
        description = "Full-text search over the loaded documentation. Matches query words against record titles, categories and body text, returning results ranked by relevance with a short snippet and the location to link to.",
        input_schema = inline_schema_for_type::<SearchRequest>()
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        handle_search(&self.state, request).await
    }

    #[tool(
        description = "Rebuild the search index from a generated search_index.js (or a built documentation directory containing one). Without a path, reloads the current index file.",
        input_schema = inline_schema_for_type::<ReloadRequest>()
    )]
    async fn reload_index(
        &self,
        Parameters(request): Parameters<ReloadRequest>,
    ) -> std::result::Result<String, String> {
        handle_reload(&self.state, request).await
    }

    #[tool(
        description = "Show where the current search index was loaded from and how many records, terms and postings it holds."
    )]
    async fn index_stats(&self) -> std::result::Result<String, String> {
        handle_index_stats(&self.state).await
    }
}

#[tool_handler]
impl ServerHandler for DocSearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_instructions(
                "docsearch-mcp: full-text search over generated documentation. \
                 Use search to find sections, pages, types and functions by keyword. \
                 If no index is loaded, call reload_index with the path to search_index.js.",
            )
    }
}

/// Generate an inline JSON schema for MCP tools
///
/// Unlike rmcp's default `schema_for_type()`, this function sets `inline_subschemas = true`
/// to generate inline definitions instead of $ref patterns.
pub fn inline_schema_for_type<T: JsonSchema>() -> Arc<JsonObject> {
    let mut settings = SchemaSettings::draft07();
    settings.transforms = vec![Box::new(schemars::transform::AddNullable::default())];
    settings.inline_subschemas = true;

    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");

    let json_object = match object {
        serde_json::Value::Object(object) => object,
        _ => panic!("Schema serialization produced non-object value"),
    };

    Arc::new(json_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn test_server_info_advertises_tools() {
        let server = DocSearchServer::new(Arc::new(IndexState::new(crate::Config::default())));
        let info = server.get_info();
        check!(info.capabilities.tools.is_some());
        check!(info.instructions.as_deref().is_some_and(|i| i.contains("reload_index")));
    }

    #[test]
    fn test_search_schema_lists_query() {
        let schema = inline_schema_for_type::<SearchRequest>();
        let properties = schema.get("properties").and_then(|p| p.as_object());
        check!(properties.is_some_and(|p| p.contains_key("query")));
        check!(properties.is_some_and(|p| p.contains_key("categories")));
    }
}
