//! Xcode Janitor MCP Server
//!
//! Lets AI agents audit the asset catalogs of an Xcode project over MCP.
//!
//! ## Tools
//!
//! - `index_assets` - Index every `.xcassets` catalog under a project
//! - `find_unused_assets` - Report assets nothing references (JSON + HTML)
//! - `find_asset_usage` - Every reference to one asset
//! - `delete_asset` - Delete an asset, with dry run and backup
//! - `check_missing_scales` - Image sets missing 1x/2x/3x variants
//! - `get_asset_info` - Full record of one asset
//! - `check_swiftgen_status` - Which assets are reached through SwiftGen accessors
//!
//! ## Usage
//!
//! Add to your MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "xcode-janitor": {
//!       "command": "xcode-janitor-mcp"
//!     }
//!   }
//! }
//! ```

use anyhow::Result;
use rmcp::transport::stdio;
use rmcp::ServiceExt;

mod tools;

use tools::JanitorService;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    log::info!("Starting Xcode Janitor MCP server");

    let service = JanitorService::new();
    let server = service.serve(stdio()).await?;

    server.waiting().await?;

    log::info!("Xcode Janitor MCP server stopped");
    Ok(())
}
