/// Files scanned concurrently per batch unless overridden.
pub const DEFAULT_SCAN_BATCH_SIZE: usize = 100;

const MAX_SCAN_BATCH_SIZE: usize = 1_000;

pub const SCAN_BATCH_SIZE_ENV: &str = "XCODE_JANITOR_SCAN_BATCH_SIZE";

fn parse_batch_size(raw: Option<&str>, default_value: usize) -> usize {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
        .clamp(1, MAX_SCAN_BATCH_SIZE)
}

pub fn scan_batch_size_from_env() -> usize {
    let raw = std::env::var(SCAN_BATCH_SIZE_ENV).ok();
    parse_batch_size(raw.as_deref(), DEFAULT_SCAN_BATCH_SIZE)
}
