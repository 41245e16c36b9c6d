//! Name-based entry point shared by the CLI and the MCP server.

use crate::error::{Result, ServiceError};
use crate::janitor::Janitor;
use janitor_protocol::ErrorEnvelope;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    IndexAssets,
    FindUnusedAssets,
    FindAssetUsage,
    DeleteAsset,
    CheckMissingScales,
    GetAssetInfo,
    CheckSwiftgenStatus,
}

impl ToolName {
    pub const ALL: [ToolName; 7] = [
        ToolName::IndexAssets,
        ToolName::FindUnusedAssets,
        ToolName::FindAssetUsage,
        ToolName::DeleteAsset,
        ToolName::CheckMissingScales,
        ToolName::GetAssetInfo,
        ToolName::CheckSwiftgenStatus,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ToolName::IndexAssets => "index_assets",
            ToolName::FindUnusedAssets => "find_unused_assets",
            ToolName::FindAssetUsage => "find_asset_usage",
            ToolName::DeleteAsset => "delete_asset",
            ToolName::CheckMissingScales => "check_missing_scales",
            ToolName::GetAssetInfo => "get_asset_info",
            ToolName::CheckSwiftgenStatus => "check_swiftgen_status",
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == name.trim())
            .ok_or_else(|| ServiceError::UnknownTool(name.to_string()))
    }
}

/// `{"tool": "...", "args": {...}}`; `args` may be omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolRequest {
    pub tool: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse {
    pub tool: String,
    pub status: ToolStatus,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    pub duration_ms: u64,
}

impl ToolResponse {
    pub fn is_error(&self) -> bool {
        self.status == ToolStatus::Error
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T> {
    let args = match args {
        Value::Null => Value::Object(serde_json::Map::new()),
        Value::Object(_) => args,
        other => {
            return Err(ServiceError::invalid_argument(
                "args",
                format!("expected an object, got {other}"),
            ))
        }
    };
    serde_json::from_value(args)
        .map_err(|err| ServiceError::invalid_argument("args", err.to_string()))
}

impl Janitor {
    /// Run the named operation on JSON arguments and return its JSON result.
    pub async fn dispatch(&self, tool: &str, args: Value) -> Result<Value> {
        let value = match ToolName::parse(tool)? {
            ToolName::IndexAssets => {
                serde_json::to_value(self.index_assets(parse_args(args)?).await?)?
            }
            ToolName::FindUnusedAssets => {
                serde_json::to_value(self.find_unused_assets(parse_args(args)?).await?)?
            }
            ToolName::FindAssetUsage => {
                serde_json::to_value(self.find_asset_usage(parse_args(args)?).await?)?
            }
            ToolName::DeleteAsset => {
                serde_json::to_value(self.delete_asset(parse_args(args)?).await?)?
            }
            ToolName::CheckMissingScales => {
                serde_json::to_value(self.check_missing_scales(parse_args(args)?).await?)?
            }
            ToolName::GetAssetInfo => {
                serde_json::to_value(self.get_asset_info(parse_args(args)?).await?)?
            }
            ToolName::CheckSwiftgenStatus => {
                serde_json::to_value(self.check_swiftgen_status(parse_args(args)?).await?)?
            }
        };
        Ok(value)
    }

    /// [`Janitor::dispatch`] with failures folded into the response envelope.
    pub async fn execute(&self, request: ToolRequest) -> ToolResponse {
        let started = Instant::now();
        let result = self.dispatch(&request.tool, request.args).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(data) => {
                log::debug!("{} finished in {duration_ms}ms", request.tool);
                ToolResponse {
                    tool: request.tool,
                    status: ToolStatus::Ok,
                    data,
                    error: None,
                    duration_ms,
                }
            }
            Err(err) => {
                log::warn!("{} failed: {err}", request.tool);
                ToolResponse {
                    tool: request.tool,
                    status: ToolStatus::Error,
                    data: Value::Null,
                    error: Some(err.to_envelope()),
                    duration_ms,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_round_trip_through_parse() {
        for tool in ToolName::ALL {
            assert_eq!(ToolName::parse(tool.as_str()).unwrap(), tool);
            assert_eq!(
                serde_json::to_value(tool).unwrap(),
                Value::String(tool.as_str().to_string())
            );
        }
        assert!(matches!(
            ToolName::parse("rm_rf"),
            Err(ServiceError::UnknownTool(_))
        ));
    }

    #[test]
    fn request_args_default_to_null() {
        let request: ToolRequest = serde_json::from_str(r#"{"tool":"index_assets"}"#).unwrap();
        assert_eq!(request.args, Value::Null);
    }

    #[tokio::test]
    async fn failures_become_envelopes() {
        let janitor = Janitor::default();

        let response = janitor
            .execute(ToolRequest {
                tool: "nope".to_string(),
                args: Value::Null,
            })
            .await;
        assert!(response.is_error());
        let envelope = response.error.unwrap();
        assert_eq!(envelope.code, "unknown_tool");
        assert!(envelope.hint.unwrap().contains("check_swiftgen_status"));

        let response = janitor
            .execute(ToolRequest {
                tool: "index_assets".to_string(),
                args: json!({}),
            })
            .await;
        assert_eq!(response.error.unwrap().code, "missing_argument");

        let response = janitor
            .execute(ToolRequest {
                tool: "delete_asset".to_string(),
                args: json!({"project_path": "/p", "asset_name": "x", "dry_run": "yes"}),
            })
            .await;
        assert_eq!(response.error.unwrap().code, "invalid_argument");

        let response = janitor
            .execute(ToolRequest {
                tool: "index_assets".to_string(),
                args: json!(["/p"]),
            })
            .await;
        assert_eq!(response.error.unwrap().code, "invalid_argument");
    }

    #[tokio::test]
    async fn missing_project_is_reported_by_code() {
        let response = Janitor::default()
            .execute(ToolRequest {
                tool: "index_assets".to_string(),
                args: json!({"project_path": "/definitely/not/here"}),
            })
            .await;
        assert_eq!(response.status, ToolStatus::Error);
        assert_eq!(response.error.unwrap().code, "project_not_found");
    }
}
