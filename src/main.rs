#[tokio::main]
async fn main() -> std::io::Result<()> {
    segment_display::run_with_config().await
}
