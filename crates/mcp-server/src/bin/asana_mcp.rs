#[tokio::main]
async fn main() -> anyhow::Result<()> {
    asana_mcp::main_entry().await
}
