#[tokio::main]
async fn main() {
    if let Err(e) = serenemind::run().await {
        eprintln!("serenemind: {}", e);
        std::process::exit(1);
    }
}
