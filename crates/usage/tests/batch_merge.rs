use janitor_indexer::{FileScanner, ScanOptions};
use janitor_usage::{SymbolicMatcher, UsageScanner};
use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

const NAMES: [&str; 4] = ["icon", "logo", "hero", "badge"];

fn line_for(choice: usize) -> String {
    match choice % 5 {
        0 => format!("Image(\"{}\")", NAMES[choice % NAMES.len()]),
        1 => format!("UIImage(named: \"{}\")", NAMES[choice % NAMES.len()]),
        2 => "let x = Asset.icon.image".to_string(),
        3 => format!("UIColor(named: \"{}\")", NAMES[choice % NAMES.len()]),
        _ => "// nothing here".to_string(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn merged_index_is_independent_of_batch_size(
        files in prop::collection::vec(prop::collection::vec(0usize..40, 0..8), 1..30),
        batch in 1usize..16,
    ) {
        let temp = TempDir::new().expect("tempdir");
        for (i, lines) in files.iter().enumerate() {
            let content: Vec<String> = lines.iter().map(|c| line_for(*c)).collect();
            fs::write(temp.path().join(format!("File{i}.swift")), content.join("\n"))
                .expect("write source");
        }

        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        let scan = |batch_size: usize| {
            let options = ScanOptions::default().with_batch_size(batch_size);
            let source_files = FileScanner::with_options(temp.path(), &options).scan();
            let scanner = UsageScanner::new(options)
                .with_symbolic_paths(SymbolicMatcher::new(["Asset.icon"]));
            runtime
                .block_on(scanner.scan_files(source_files))
                .expect("scan")
        };

        let one = scan(1);
        let hundred = scan(100);
        let random = scan(batch);

        prop_assert_eq!(one.files_scanned(), files.len());
        prop_assert_eq!(one.sorted_references(), hundred.sorted_references());
        prop_assert_eq!(one.sorted_references(), random.sorted_references());
    }
}
