#[tokio::main]
async fn main() -> anyhow::Result<()> {
    resilens::cli::run().await
}
