#[tokio::main]
async fn main() -> anyhow::Result<()> {
    feedscout_lib::main().await
}
