//! MCP tools for the Xcode Janitor
//!
//! Each tool forwards its arguments to [`Janitor`] and returns the result as
//! pretty-printed JSON text. Failures come back as error results carrying the
//! `{code, message, hint}` envelope.

use janitor_service::{
    CheckMissingScalesRequest, CheckSwiftgenStatusRequest, DeleteAssetRequest,
    FindAssetUsageRequest, FindUnusedAssetsRequest, GetAssetInfoRequest, IndexAssetsRequest,
    Janitor, ServiceError,
};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Serialize;
use std::sync::Arc;

/// Xcode Janitor MCP Service
#[derive(Clone)]
pub struct JanitorService {
    /// Shared across tool calls so the index cache survives between them
    janitor: Arc<Janitor>,
    tool_router: ToolRouter<Self>,
}

impl JanitorService {
    pub fn new() -> Self {
        Self::with_janitor(Janitor::default())
    }

    pub fn with_janitor(janitor: Janitor) -> Self {
        Self {
            janitor: Arc::new(janitor),
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for JanitorService {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_handler]
impl ServerHandler for JanitorService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("Xcode Janitor audits .xcassets catalogs. Run 'index_assets' first, then 'find_unused_assets' for a report, 'find_asset_usage' before deleting anything, and 'delete_asset' with dry_run=true to preview. 'check_swiftgen_status' explains which assets are referenced through generated accessors.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

fn error_result(tool: &str, err: &ServiceError) -> CallToolResult {
    log::warn!("{tool} failed: {err}");
    let body = serde_json::json!({ "error": err.to_envelope() });
    let text = serde_json::to_string_pretty(&body).unwrap_or_else(|_| format!("Error: {err}"));
    CallToolResult::error(vec![Content::text(text)])
}

fn render<T: Serialize>(
    tool: &str,
    result: janitor_service::Result<T>,
) -> Result<CallToolResult, McpError> {
    let value = match result {
        Ok(value) => value,
        Err(err) => return Ok(error_result(tool, &err)),
    };
    match serde_json::to_string_pretty(&value) {
        Ok(text) => Ok(CallToolResult::success(vec![Content::text(text)])),
        Err(err) => Ok(error_result(tool, &ServiceError::from(err))),
    }
}

#[tool_router]
impl JanitorService {
    #[tool(description = "Index every .xcassets catalog under an Xcode project. Returns catalog paths and asset counts. Refreshes the cached index.")]
    pub async fn index_assets(
        &self,
        Parameters(request): Parameters<IndexAssetsRequest>,
    ) -> Result<CallToolResult, McpError> {
        render("index_assets", self.janitor.index_assets(request).await)
    }

    #[tool(description = "Find assets that no Swift, Objective-C or Interface Builder file references. SwiftGen-managed assets count as used only through their generated accessor. Writes a JSON report and an HTML report next to it.")]
    pub async fn find_unused_assets(
        &self,
        Parameters(request): Parameters<FindUnusedAssetsRequest>,
    ) -> Result<CallToolResult, McpError> {
        render(
            "find_unused_assets",
            self.janitor.find_unused_assets(request).await,
        )
    }

    #[tool(description = "List every reference to one asset with file, line and matched context. Includes generated accessor references for SwiftGen-managed assets.")]
    pub async fn find_asset_usage(
        &self,
        Parameters(request): Parameters<FindAssetUsageRequest>,
    ) -> Result<CallToolResult, McpError> {
        render(
            "find_asset_usage",
            self.janitor.find_asset_usage(request).await,
        )
    }

    #[tool(description = "Delete an asset directory from its catalog. Backs it up into <catalog>/.janitor-backup first unless create_backup=false. Use dry_run=true to see how many bytes would be freed.")]
    pub async fn delete_asset(
        &self,
        Parameters(request): Parameters<DeleteAssetRequest>,
    ) -> Result<CallToolResult, McpError> {
        render("delete_asset", self.janitor.delete_asset(request).await)
    }

    #[tool(description = "Report image sets that lack any of the 1x, 2x and 3x variants. Checks one asset when asset_name is given.")]
    pub async fn check_missing_scales(
        &self,
        Parameters(request): Parameters<CheckMissingScalesRequest>,
    ) -> Result<CallToolResult, McpError> {
        render(
            "check_missing_scales",
            self.janitor.check_missing_scales(request).await,
        )
    }

    #[tool(description = "Full record of one asset: type, catalog, scale files, dimensions, size and last modification.")]
    pub async fn get_asset_info(
        &self,
        Parameters(request): Parameters<GetAssetInfoRequest>,
    ) -> Result<CallToolResult, McpError> {
        render("get_asset_info", self.janitor.get_asset_info(request).await)
    }

    #[tool(description = "Detect a SwiftGen configuration and report which indexed assets are bound to generated accessors, with a per-catalog breakdown and a sample.")]
    pub async fn check_swiftgen_status(
        &self,
        Parameters(request): Parameters<CheckSwiftgenStatusRequest>,
    ) -> Result<CallToolResult, McpError> {
        render(
            "check_swiftgen_status",
            self.janitor.check_swiftgen_status(request).await,
        )
    }
}
