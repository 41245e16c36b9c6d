use janitor_service::{Janitor, ToolRequest, ToolStatus, UnusedReport};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn image_set(catalog: &Path, name: &str, scales: &[&str]) {
    let dir = catalog.join(format!("{name}.imageset"));
    fs::create_dir_all(&dir).expect("create image set");
    let images: Vec<String> = scales
        .iter()
        .map(|scale| {
            format!(r#"{{"filename":"{name}@{scale}.png","idiom":"universal","scale":"{scale}"}}"#)
        })
        .collect();
    fs::write(
        dir.join("Contents.json"),
        format!(r#"{{"images":[{}],"info":{{"author":"xcode","version":1}}}}"#, images.join(",")),
    )
    .expect("write descriptor");
    for scale in scales {
        fs::write(dir.join(format!("{name}@{scale}.png")), vec![0u8; 128]).expect("write image");
    }
}

/// Three image sets, one of them managed through SwiftGen.
fn project() -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    let catalog = temp.path().join("App/Assets.xcassets");
    image_set(&catalog, "hero", &["1x", "2x", "3x"]);
    image_set(&catalog, "badge", &["2x"]);
    image_set(&catalog, "stale_banner", &["1x", "2x", "3x"]);

    fs::write(
        temp.path().join("swiftgen.yml"),
        "xcassets:\n  inputs: App/Assets.xcassets\n  outputs:\n    - templateName: swift5\n      output: App/Generated/Assets.swift\n",
    )
    .expect("write config");
    fs::create_dir_all(temp.path().join("App/Generated")).expect("create generated");
    fs::write(
        temp.path().join("App/Generated/Assets.swift"),
        r#"internal enum Asset {
  internal enum Marketing {
    internal static let hero = ImageAsset(name: "hero")
  }
}
"#,
    )
    .expect("write generated");
    fs::write(
        temp.path().join("App/HomeView.swift"),
        "let header = Asset.Marketing.hero.image\nlet badge = UIImage(named: \"badge\")\n",
    )
    .expect("write source");
    fs::write(
        temp.path().join("App/Legacy.m"),
        "UIImage *img = [UIImage imageNamed:@\"badge\"];\n",
    )
    .expect("write objc");
    temp
}

fn root(temp: &TempDir) -> String {
    temp.path().to_str().expect("utf8 path").to_string()
}

async fn run(janitor: &Janitor, tool: &str, args: serde_json::Value) -> serde_json::Value {
    let response = janitor
        .execute(ToolRequest {
            tool: tool.to_string(),
            args,
        })
        .await;
    assert_eq!(response.status, ToolStatus::Ok, "{tool}: {:?}", response.error);
    response.data
}

#[tokio::test]
async fn index_then_report_unused_assets() {
    let temp = project();
    let janitor = Janitor::default();

    let summary = run(&janitor, "index_assets", json!({"project_path": root(&temp)})).await;
    assert_eq!(summary["catalogs_found"], 1);
    assert_eq!(summary["total_assets"], 3);

    let summary = run(
        &janitor,
        "find_unused_assets",
        json!({"project_path": root(&temp)}),
    )
    .await;
    assert_eq!(summary["unused_count"], 1);

    let json_path = temp.path().join("unused_assets_report.json");
    assert_eq!(summary["json_report"], json!(json_path));
    let report: UnusedReport =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("read report"))
            .expect("parse report");
    assert_eq!(report.summary.total_assets_scanned, 3);
    assert_eq!(report.unused_assets.len(), 1);
    assert_eq!(report.unused_assets[0].name, "stale_banner");

    let html = fs::read_to_string(temp.path().join("unused_assets_report.html")).expect("html");
    assert!(html.contains("stale_banner"));
}

#[tokio::test]
async fn custom_report_location_and_pattern() {
    let temp = project();
    let janitor = Janitor::default();
    let out = temp.path().join("out.json");

    let summary = run(
        &janitor,
        "find_unused_assets",
        json!({
            "project_path": root(&temp),
            "output_file": out.to_str().expect("utf8 path"),
            "pattern": "hero*",
        }),
    )
    .await;
    assert_eq!(summary["unused_count"], 0);
    assert!(out.exists());
    assert!(temp.path().join("out.html").exists());
}

#[tokio::test]
async fn usage_combines_literal_and_accessor_references() {
    let temp = project();
    let janitor = Janitor::default();

    let usage = run(
        &janitor,
        "find_asset_usage",
        json!({"project_path": root(&temp), "asset_name": "badge"}),
    )
    .await;
    assert_eq!(usage["usage_count"], 2);
    assert_eq!(usage["generator_managed"], false);

    let usage = run(
        &janitor,
        "find_asset_usage",
        json!({"project_path": root(&temp), "asset_name": "hero"}),
    )
    .await;
    assert_eq!(usage["generator_managed"], true);
    assert_eq!(usage["accessor_paths"], json!(["Asset.Marketing.hero"]));
    assert_eq!(usage["usage_count"], 1);
    assert_eq!(usage["references"][0]["line"], 1);
}

#[tokio::test]
async fn scales_info_and_generator_status() {
    let temp = project();
    let janitor = Janitor::default();

    let scales = run(
        &janitor,
        "check_missing_scales",
        json!({"project_path": root(&temp)}),
    )
    .await;
    assert_eq!(scales["assets_with_missing_scales"], 1);
    assert_eq!(scales["reports"][0]["asset"]["name"], "badge");
    assert_eq!(scales["reports"][0]["missing_scales"], json!(["1x", "3x"]));

    let info = run(
        &janitor,
        "get_asset_info",
        json!({"project_path": root(&temp), "asset_name": "hero"}),
    )
    .await;
    assert_eq!(info["asset"]["name"], "hero");

    let status = run(
        &janitor,
        "check_swiftgen_status",
        json!({"project_path": root(&temp)}),
    )
    .await;
    assert_eq!(status["config_found"], true);
    assert_eq!(status["total_assets"], 3);
    assert_eq!(status["managed_count"], 1);
    assert_eq!(status["unmanaged_count"], 2);
    assert_eq!(status["catalog_breakdown"]["App/Assets.xcassets"], 1);
    assert_eq!(
        status["managed_assets_sample"][0]["accessor_path"],
        "Asset.Marketing.hero"
    );
}

#[tokio::test]
async fn unknown_asset_is_a_structured_failure() {
    let temp = project();
    let response = Janitor::default()
        .execute(ToolRequest {
            tool: "delete_asset".to_string(),
            args: json!({"project_path": root(&temp), "asset_name": "ghost"}),
        })
        .await;
    assert_eq!(response.status, ToolStatus::Error);
    assert_eq!(response.error.expect("envelope").code, "asset_not_found");
}

#[tokio::test]
async fn deletion_with_backup_removes_the_asset_from_later_results() {
    let temp = project();
    let janitor = Janitor::default();

    let result = run(
        &janitor,
        "delete_asset",
        json!({"project_path": root(&temp), "asset_name": "stale_banner"}),
    )
    .await;
    assert_eq!(result["success"], true);
    assert_eq!(result["bytes_freed"].as_u64().map(|b| b > 384), Some(true));
    let backup = result["backup_path"].as_str().expect("backup path");
    assert!(Path::new(backup).join("Contents.json").exists());
    assert!(!temp
        .path()
        .join("App/Assets.xcassets/stale_banner.imageset")
        .exists());

    let summary = run(&janitor, "index_assets", json!({"project_path": root(&temp)})).await;
    assert_eq!(summary["total_assets"], 2);
}
