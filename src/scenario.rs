//! Scenario Registry - Fixed collider-graph domains
//!
//! Maps each domain key to the human-readable labels of its two causes and
//! their shared effect. The table is built once at startup and is read-only
//! afterwards, so any number of request handlers can consult it in parallel.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::evaluator::QueryVariable;

/// A collider-graph scenario: two independent causes feeding one effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Label of the first cause
    #[serde(rename = "C1")]
    pub cause1: String,
    /// Label of the second cause
    #[serde(rename = "C2")]
    pub cause2: String,
    /// Label of the shared effect
    #[serde(rename = "E")]
    pub effect: String,
    /// One-line summary of what the domain studies
    pub description: String,
}

impl Scenario {
    fn new(cause1: &str, cause2: &str, effect: &str, description: &str) -> Self {
        Self {
            cause1: cause1.to_string(),
            cause2: cause2.to_string(),
            effect: effect.to_string(),
            description: description.to_string(),
        }
    }

    /// Human-readable label of the queried variable.
    pub fn label(&self, variable: QueryVariable) -> &str {
        match variable {
            QueryVariable::C1 => &self.cause1,
            QueryVariable::C2 => &self.cause2,
            QueryVariable::E => &self.effect,
        }
    }
}

lazy_static::lazy_static! {
    /// Global scenario table, one entry per supported domain.
    static ref SCENARIOS: HashMap<&'static str, Scenario> = {
        let mut table = HashMap::new();
        table.insert("economics", Scenario::new(
            "Economic recession",
            "Market competition",
            "Business failure",
            "Studies how economic recession and market competition affect business survival",
        ));
        table.insert("meteorology", Scenario::new(
            "Low pressure system",
            "High humidity",
            "Rainfall",
            "Studies how low pressure systems and high humidity affect rainfall",
        ));
        table.insert("sociology", Scenario::new(
            "Social isolation",
            "Financial stress",
            "Depression",
            "Studies how social isolation and financial stress affect depression",
        ));
        table.insert("healthcare", Scenario::new(
            "Genetic predisposition",
            "Environmental factors",
            "Disease onset",
            "Studies how genetic predisposition and environmental factors affect disease onset",
        ));
        table.insert("education", Scenario::new(
            "Study habits",
            "Teacher quality",
            "Academic performance",
            "Studies how study habits and teacher quality affect academic performance",
        ));
        table.insert("technology", Scenario::new(
            "Technical innovation",
            "Market demand",
            "Product success",
            "Studies how technical innovation and market demand affect product success",
        ));
        table
    };
}

/// Look up a domain by exact, case-sensitive key.
pub fn lookup(domain: &str) -> Option<&'static Scenario> {
    SCENARIOS.get(domain)
}

/// Every registered domain key, in no particular order.
pub fn list_domains() -> Vec<&'static str> {
    SCENARIOS.keys().copied().collect()
}

/// Render the human-readable schema block for a domain.
pub fn render_schema(domain: &str, scenario: &Scenario) -> String {
    format!(
        "Causal Schema for {}:\n- Cause 1 (C1): {}\n- Cause 2 (C2): {}\n- Effect (E): {}",
        domain, scenario.cause1, scenario.cause2, scenario.effect
    )
}
