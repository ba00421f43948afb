//! Model Comparison Walkthrough
//!
//! Samples the evaluator in-process across all four simulated models and
//! prints per-model statistics plus the explaining-away effect strength.
//! Run with: cargo run --bin model_comparison

use anyhow::Result;

use causal_nexus::evaluator::{
    evaluate, EvaluationRequest, ModelKind, Sampler, ThreadSampler, VariableState,
};

const SAMPLES: usize = 50;

struct Conditions {
    c1: Option<VariableState>,
    c2: Option<VariableState>,
    e: Option<VariableState>,
}

fn collect_samples(
    domain: &str,
    query_variable: &str,
    conditions: &Conditions,
    model: ModelKind,
    sampler: &dyn Sampler,
) -> Result<Vec<f64>> {
    let mut probabilities = Vec::with_capacity(SAMPLES);
    for _ in 0..SAMPLES {
        let request = EvaluationRequest {
            domain: domain.to_string(),
            query_variable: query_variable.to_string(),
            c1_state: conditions.c1,
            c2_state: conditions.c2,
            e_state: conditions.e,
            model,
        };
        probabilities.push(evaluate(&request, sampler)?.probability);
    }
    Ok(probabilities)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

fn main() -> Result<()> {
    let sampler = ThreadSampler;

    println!("\n{}", "═".repeat(60));
    println!("📊 Model Comparison ({} samples per model)", SAMPLES);
    println!("{}", "═".repeat(60));

    // 1. Disease onset probability given both causes present
    println!("\n[1/2] healthcare: P(Disease onset) with both causes present\n");
    let both_present = Conditions {
        c1: Some(VariableState::Present),
        c2: Some(VariableState::Present),
        e: None,
    };
    for model in ModelKind::ALL {
        let samples = collect_samples("healthcare", "E", &both_present, model, &sampler)?;
        println!(
            "   {:<8} mean {:.3}  std {:.3}",
            model.as_str(),
            mean(&samples),
            std_dev(&samples)
        );
    }

    // 2. Explaining-away strength: how much an observed competing cause
    //    lowers the queried cause, per model
    println!("\n[2/2] economics: explaining-away strength for C1 given E=1\n");
    let with_other = Conditions {
        c1: None,
        c2: Some(VariableState::Present),
        e: Some(VariableState::Present),
    };
    let without_other = Conditions {
        c1: None,
        c2: Some(VariableState::Absent),
        e: Some(VariableState::Present),
    };
    for model in ModelKind::ALL {
        let penalized = collect_samples("economics", "C1", &with_other, model, &sampler)?;
        let unpenalized = collect_samples("economics", "C1", &without_other, model, &sampler)?;
        println!(
            "   {:<8} effect strength {:+.3}",
            model.as_str(),
            mean(&unpenalized) - mean(&penalized)
        );
    }

    println!("\n✅ Done.\n");
    Ok(())
}
