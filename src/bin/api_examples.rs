//! API Usage Walkthrough
//!
//! Drives a running server through the three example calls: a schema
//! lookup, a single evaluation, and a four-model comparison.
//! Start the server first (cargo run), then: cargo run --bin api_examples

use anyhow::Result;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8000/api/v1";

async fn print_response(response: reqwest::Response) -> Result<()> {
    let body: Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let client = reqwest::Client::new();

    println!("\n1. Causal schema for the economics domain");
    let response = client
        .get(format!("{}/schema/economics", BASE_URL))
        .send()
        .await?;
    print_response(response).await?;

    println!("\n2. Evaluating a causal query in the economics scenario");
    let data = json!({
        "domain": "economics",
        "query_variable": "C2",
        "c1_state": 1,
        "e_state": 1,
        "model": "claude"
    });
    let response = client
        .post(format!("{}/evaluate_causal_reasoning", BASE_URL))
        .json(&data)
        .send()
        .await?;
    print_response(response).await?;

    println!("\n3. Comparing models on the same meteorology scenario");
    for model in ["gpt-4", "claude", "gemini", "gpt-3.5"] {
        let data = json!({
            "domain": "meteorology",
            "query_variable": "E",
            "c1_state": 1,
            "c2_state": 1,
            "model": model
        });
        let response = client
            .post(format!("{}/evaluate_causal_reasoning", BASE_URL))
            .json(&data)
            .send()
            .await?;
        println!("\n{} says:", model.to_uppercase());
        print_response(response).await?;
    }

    Ok(())
}
