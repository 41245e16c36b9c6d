use janitor_indexer::{CatalogIndexer, ScanOptions};
use janitor_usage::{find_unused_assets, UnusedFilter};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn image_set(catalog: &Path, name: &str) {
    let dir = catalog.join(format!("{name}.imageset"));
    fs::create_dir_all(&dir).expect("create image set");
    fs::write(
        dir.join("Contents.json"),
        format!(
            r#"{{"images":[{{"filename":"{name}.png","idiom":"universal","scale":"1x"}}],"info":{{"author":"xcode","version":1}}}}"#
        ),
    )
    .expect("write descriptor");
    fs::write(dir.join(format!("{name}.png")), vec![0u8; 64]).expect("write image");
}

async fn unused_names(root: &Path) -> Vec<String> {
    let index = CatalogIndexer::new()
        .index_project(root.to_str().expect("utf8 path"))
        .expect("index");
    let mut names: Vec<String> = find_unused_assets(&index, root, &ScanOptions::default())
        .await
        .expect("classify")
        .into_iter()
        .map(|report| report.asset.name)
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn only_the_unreferenced_asset_is_reported() {
    let temp = TempDir::new().expect("tempdir");
    let catalog = temp.path().join("App/Assets.xcassets");
    image_set(&catalog, "icon_used");
    image_set(&catalog, "icon_unused");
    fs::write(
        temp.path().join("App/ContentView.swift"),
        "struct ContentView: View {\n    var body: some View {\n        Image(\"icon_used\")\n    }\n}\n",
    )
    .expect("write source");

    assert_eq!(unused_names(temp.path()).await, vec!["icon_unused"]);
}

#[tokio::test]
async fn references_in_vendored_code_do_not_count() {
    let temp = TempDir::new().expect("tempdir");
    image_set(&temp.path().join("Assets.xcassets"), "logo");
    fs::create_dir_all(temp.path().join("Pods/Kit")).expect("create pods");
    fs::write(temp.path().join("Pods/Kit/Kit.swift"), "UIImage(named: \"logo\")")
        .expect("write vendored source");

    assert_eq!(unused_names(temp.path()).await, vec!["logo"]);
}

#[tokio::test]
async fn objc_and_storyboard_references_count() {
    let temp = TempDir::new().expect("tempdir");
    let catalog = temp.path().join("Assets.xcassets");
    for name in ["from_objc", "from_storyboard", "orphan"] {
        image_set(&catalog, name);
    }
    fs::write(
        temp.path().join("Legacy.m"),
        "self.view.image = [UIImage imageNamed:@\"from_objc\"];\n",
    )
    .expect("write objc");
    fs::write(
        temp.path().join("Main.storyboard"),
        "<imageView image=\"from_storyboard\" id=\"a1\"/>\n<resources>\n  <image name=\"from_storyboard\" width=\"24\" height=\"24\"/>\n</resources>\n",
    )
    .expect("write storyboard");

    assert_eq!(unused_names(temp.path()).await, vec!["orphan"]);
}

#[tokio::test]
async fn generated_accessors_decide_for_managed_assets() {
    let temp = TempDir::new().expect("tempdir");
    let catalog = temp.path().join("Resources/Assets.xcassets");
    for name in ["accessor_used", "literal_only", "plain_literal"] {
        image_set(&catalog, name);
    }
    fs::write(
        temp.path().join("swiftgen.yml"),
        "output_dir: Generated/\nxcassets:\n  inputs: Resources/Assets.xcassets\n  outputs:\n    - templateName: swift5\n      output: Assets.swift\n",
    )
    .expect("write config");
    fs::create_dir_all(temp.path().join("Generated")).expect("create generated");
    fs::write(
        temp.path().join("Generated/Assets.swift"),
        r#"internal enum Asset {
  internal static let accessorUsed = ImageAsset(name: "accessor_used")
  internal static let literalOnly = ImageAsset(name: "literal_only")
}
"#,
    )
    .expect("write generated");
    fs::write(
        temp.path().join("View.swift"),
        "let a = Asset.accessorUsed.image\nlet b = UIImage(named: \"literal_only\")\nlet c = UIImage(named: \"plain_literal\")\n",
    )
    .expect("write source");

    assert_eq!(unused_names(temp.path()).await, vec!["literal_only"]);
}

#[tokio::test]
async fn post_filters_narrow_the_report() {
    let temp = TempDir::new().expect("tempdir");
    let catalog = temp.path().join("Assets.xcassets");
    for name in ["AppIcon", "LaunchImage", "TestImage"] {
        image_set(&catalog, name);
    }
    let index = CatalogIndexer::new()
        .index_project(temp.path().to_str().expect("utf8 path"))
        .expect("index");
    let unused = find_unused_assets(&index, temp.path(), &ScanOptions::default())
        .await
        .expect("classify");
    assert_eq!(unused.len(), 3);

    let filter = UnusedFilter {
        minimum_age_days: None,
        pattern: Some("*Image".to_string()),
    };
    let mut names: Vec<String> = filter
        .apply(&index, unused.clone())
        .into_iter()
        .map(|report| report.asset.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["LaunchImage", "TestImage"]);

    // Freshly written assets are younger than any positive threshold.
    let aged = UnusedFilter {
        minimum_age_days: Some(1),
        pattern: None,
    };
    assert!(aged.apply(&index, unused).is_empty());
}
