use anyhow::Result;

use auntrack::server::{self, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::load()?;
    log::info!("Starting auntrack server");

    server::serve(config).await
}
