//! OIDC OAuth adapter server
//!
//! Run with: cargo run --bin oidc-adapter -- serve

#[tokio::main]
async fn main() {
    // Load .env file before anything reads the environment
    let _ = dotenvy::dotenv();

    if let Err(e) = oidc_oauth_adapter::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
