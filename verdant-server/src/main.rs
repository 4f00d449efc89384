use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment.
    dotenvy::dotenv().ok();
    verdant_server::serve().await
}
