#[tokio::main]
async fn main() -> std::io::Result<()> {
    ticket_server::run_with_config().await
}
