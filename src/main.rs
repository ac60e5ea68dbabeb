use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    lunaflow_backend::start_server().await
}
