//! Causal Reasoning Demo Server
//!
//! Serves simulated collider-graph reasoning across six fixed domains.
//! Two causes feed one effect; observing the effect and one cause lowers
//! the simulated likelihood of the other (explaining away).

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    println!("\n{}", "═".repeat(60));
    println!("🧠 Causal Reasoning Server v1.0.0");
    println!("{}", "═".repeat(60));
    println!("Domains: {}", causal_nexus::scenario::list_domains().join(" | "));
    println!("Started: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("{}\n", "═".repeat(60));

    causal_nexus::server::run_server().await
}
