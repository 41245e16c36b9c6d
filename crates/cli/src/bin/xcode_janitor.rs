use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    janitor_cli::main_entry().await
}
