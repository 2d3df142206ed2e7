#[tokio::main]
async fn main() -> anyhow::Result<()> {
    item_handlers::cli::run_cli().await
}
