//! Evaluator - Simulated causal reasoning over a collider graph
//!
//! The core of the service: renders a prompt for the requested scenario,
//! draws a biased pseudo-random probability, and assembles the response
//! payload. Stateless; every call is independent of every other call.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scenario::{self, Scenario};

// ──────────────────────────────────────────────────────────────────────────────
// IDENTIFIERS
// ──────────────────────────────────────────────────────────────────────────────

/// Simulated model identities, from closest to normative reasoning (gpt-4,
/// claude) to most biased (gpt-3.5, gemini).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "gpt-4")]
    Gpt4,
    #[serde(rename = "claude")]
    Claude,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "gpt-3.5")]
    Gpt35,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Gpt4,
        ModelKind::Claude,
        ModelKind::Gemini,
        ModelKind::Gpt35,
    ];

    /// Fixed additive bias applied on top of the base draw.
    pub fn bias(self) -> f64 {
        match self {
            ModelKind::Gpt4 => 0.10,
            ModelKind::Claude => 0.05,
            ModelKind::Gemini => -0.15,
            ModelKind::Gpt35 => -0.10,
        }
    }

    /// Wire name, as it appears in requests and explanations.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Gpt4 => "gpt-4",
            ModelKind::Claude => "claude",
            ModelKind::Gemini => "gemini",
            ModelKind::Gpt35 => "gpt-3.5",
        }
    }
}

impl Default for ModelKind {
    fn default() -> Self {
        ModelKind::Gpt4
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The variable a request asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryVariable {
    C1,
    C2,
    E,
}

impl QueryVariable {
    /// Parse the open wire string into the closed set.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "C1" => Some(Self::C1),
            "C2" => Some(Self::C2),
            "E" => Some(Self::E),
            _ => None,
        }
    }

    /// The sibling cause, used by the explaining-away check. `None` for E.
    fn other_cause(self) -> Option<Self> {
        match self {
            Self::C1 => Some(Self::C2),
            Self::C2 => Some(Self::C1),
            Self::E => None,
        }
    }
}

/// Observed state of a single variable. The wire carries the integers 0/1;
/// anything else is rejected at the serde boundary, before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VariableState {
    Absent,
    Present,
}

impl TryFrom<u8> for VariableState {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Absent),
            1 => Ok(Self::Present),
            other => Err(format!("variable state must be 0 or 1, got {}", other)),
        }
    }
}

impl From<VariableState> for u8 {
    fn from(state: VariableState) -> u8 {
        match state {
            VariableState::Absent => 0,
            VariableState::Present => 1,
        }
    }
}

/// Observed states for all three variables; `None` means unobserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct States {
    #[serde(rename = "C1")]
    pub c1: Option<VariableState>,
    #[serde(rename = "C2")]
    pub c2: Option<VariableState>,
    #[serde(rename = "E")]
    pub e: Option<VariableState>,
}

impl States {
    fn get(&self, variable: QueryVariable) -> Option<VariableState> {
        match variable {
            QueryVariable::C1 => self.c1,
            QueryVariable::C2 => self.c2,
            QueryVariable::E => self.e,
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// REQUEST / RESPONSE
// ──────────────────────────────────────────────────────────────────────────────

/// An evaluation request as decoded off the wire. `query_variable` stays an
/// open string here; `evaluate` validates it against the closed set so the
/// caller gets the documented error payload instead of a decode failure.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub domain: String,
    pub query_variable: String,
    pub c1_state: Option<VariableState>,
    pub c2_state: Option<VariableState>,
    pub e_state: Option<VariableState>,
    #[serde(default)]
    pub model: ModelKind,
}

/// Assembled evaluation payload, serialized verbatim to the client.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub prompt: String,
    pub domain: String,
    pub scenario: Scenario,
    pub states: States,
    pub query_variable: QueryVariable,
    pub model: ModelKind,
    pub probability: f64,
    pub explanation: String,
}

/// Recoverable evaluation failures, reported to the client as ordinary
/// `{"error": …}` payloads. Neither aborts anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("Domain {0} not found")]
    DomainNotFound(String),
    #[error("Invalid query variable {0}")]
    InvalidQueryVariable(String),
}

// ──────────────────────────────────────────────────────────────────────────────
// SAMPLING
// ──────────────────────────────────────────────────────────────────────────────

/// Uniform draw source behind the simulated models. Injectable so tests can
/// substitute a fixed sequence while production uses a real generator.
pub trait Sampler: Send + Sync {
    /// A uniform draw in [0, 1).
    fn draw(&self) -> f64;
}

/// Production source backed by the thread-local generator.
pub struct ThreadSampler;

impl Sampler for ThreadSampler {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

// ──────────────────────────────────────────────────────────────────────────────
// EVALUATION
// ──────────────────────────────────────────────────────────────────────────────

/// Evaluate a causal-reasoning request against the scenario registry.
///
/// Unknown domains and malformed query variables come back as `EvalError`
/// values for the transport layer to serialize; nothing here panics.
pub fn evaluate(request: &EvaluationRequest, sampler: &dyn Sampler) -> Result<Evaluation, EvalError> {
    let scenario = scenario::lookup(&request.domain)
        .ok_or_else(|| EvalError::DomainNotFound(request.domain.clone()))?;

    let query = QueryVariable::parse(&request.query_variable)
        .ok_or_else(|| EvalError::InvalidQueryVariable(request.query_variable.clone()))?;

    let states = States {
        c1: request.c1_state,
        c2: request.c2_state,
        e: request.e_state,
    };

    let prompt = render_prompt(&request.domain, scenario, &states, query);
    let probability = simulate(query, &states, request.model, sampler);
    let explanation = format!(
        "Based on the {} model's analysis, the likelihood of {} being present is {:.2}%.",
        request.model,
        scenario.label(query),
        probability * 100.0,
    );

    Ok(Evaluation {
        prompt,
        domain: request.domain.clone(),
        scenario: scenario.clone(),
        states,
        query_variable: query,
        model: request.model,
        probability,
        explanation,
    })
}

/// Simulated model response for a collider query.
///
/// The base draw lands in [0.25, 0.75). Observing the effect together with
/// the other cause shrinks it by 0.7 (explaining away) before the model bias
/// is added. The final value is clamped into [0, 1].
fn simulate(query: QueryVariable, states: &States, model: ModelKind, sampler: &dyn Sampler) -> f64 {
    let mut base = sampler.draw() * 0.5 + 0.25;

    // Explaining away fires only on exact observations: effect present AND
    // the sibling cause present. Unknown or absent states never trigger it.
    if states.e == Some(VariableState::Present) {
        if let Some(other) = query.other_cause() {
            if states.get(other) == Some(VariableState::Present) {
                base *= 0.7;
            }
        }
    }

    (base + model.bias()).clamp(0.0, 1.0)
}

fn describe(state: Option<VariableState>) -> &'static str {
    match state {
        Some(VariableState::Present) => "is present",
        Some(VariableState::Absent) => "is absent",
        None => "state unknown",
    }
}

fn render_prompt(domain: &str, scenario: &Scenario, states: &States, query: QueryVariable) -> String {
    format!(
        "Domain: {}\nCausal scenario:\n- {} (C1) {}\n- {} (C2) {}\n- {} (E) {}\n\nQuery: What is the likelihood of {} being present?",
        domain,
        scenario.cause1,
        describe(states.c1),
        scenario.cause2,
        describe(states.c2),
        scenario.effect,
        describe(states.e),
        scenario.label(query),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sampler that always returns the same draw, making the arithmetic
    /// fully deterministic.
    struct FixedSampler(f64);

    impl Sampler for FixedSampler {
        fn draw(&self) -> f64 {
            self.0
        }
    }

    fn request(domain: &str, query: &str) -> EvaluationRequest {
        EvaluationRequest {
            domain: domain.to_string(),
            query_variable: query.to_string(),
            c1_state: None,
            c2_state: None,
            e_state: None,
            model: ModelKind::default(),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {} got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_base_draw_plus_bias() {
        // draw 0.5 -> base 0.5, then each model shifts it by its bias
        let mut req = request("economics", "E");
        let sampler = FixedSampler(0.5);

        let expected = [
            (ModelKind::Gpt4, 0.60),
            (ModelKind::Claude, 0.55),
            (ModelKind::Gemini, 0.35),
            (ModelKind::Gpt35, 0.40),
        ];
        for (model, probability) in expected {
            req.model = model;
            let evaluation = evaluate(&req, &sampler).unwrap();
            assert_close(evaluation.probability, probability);
        }
    }

    #[test]
    fn test_explaining_away_multiplies_before_bias() {
        // query C1 with E and C2 both observed present:
        // 0.5 * 0.7 + 0.10 = 0.45, not (0.5 + 0.10) * 0.7
        let mut req = request("economics", "C1");
        req.e_state = Some(VariableState::Present);
        req.c2_state = Some(VariableState::Present);

        let evaluation = evaluate(&req, &FixedSampler(0.5)).unwrap();
        assert_close(evaluation.probability, 0.45);
    }

    #[test]
    fn test_explaining_away_requires_exact_observations() {
        let sampler = FixedSampler(0.5);

        // Other cause unobserved: no penalty
        let mut req = request("economics", "C1");
        req.e_state = Some(VariableState::Present);
        let evaluation = evaluate(&req, &sampler).unwrap();
        assert_close(evaluation.probability, 0.60);

        // Other cause observed absent: no penalty
        req.c2_state = Some(VariableState::Absent);
        let evaluation = evaluate(&req, &sampler).unwrap();
        assert_close(evaluation.probability, 0.60);

        // Effect absent, other cause present: no penalty
        let mut req = request("economics", "C2");
        req.e_state = Some(VariableState::Absent);
        req.c1_state = Some(VariableState::Present);
        let evaluation = evaluate(&req, &sampler).unwrap();
        assert_close(evaluation.probability, 0.60);

        // Query E never takes the penalty, even with both causes present
        let mut req = request("economics", "E");
        req.c1_state = Some(VariableState::Present);
        req.c2_state = Some(VariableState::Present);
        req.e_state = Some(VariableState::Present);
        let evaluation = evaluate(&req, &sampler).unwrap();
        assert_close(evaluation.probability, 0.60);
    }

    #[test]
    fn test_explaining_away_symmetric_across_causes() {
        let sampler = FixedSampler(0.5);

        let mut req = request("sociology", "C2");
        req.e_state = Some(VariableState::Present);
        req.c1_state = Some(VariableState::Present);
        req.model = ModelKind::Claude;

        let evaluation = evaluate(&req, &sampler).unwrap();
        assert_close(evaluation.probability, 0.5 * 0.7 + 0.05);
    }

    #[test]
    fn test_probability_clamped_for_pathological_draws() {
        // The sampler contract says [0, 1), but the clamp holds regardless.
        let mut req = request("economics", "E");

        req.model = ModelKind::Gpt4;
        let evaluation = evaluate(&req, &FixedSampler(2.0)).unwrap();
        assert_close(evaluation.probability, 1.0);

        req.model = ModelKind::Gemini;
        let evaluation = evaluate(&req, &FixedSampler(-1.0)).unwrap();
        assert_close(evaluation.probability, 0.0);
    }

    #[test]
    fn test_probability_in_bounds_for_all_inputs() {
        let sampler = ThreadSampler;
        for domain in scenario::list_domains() {
            for query in ["C1", "C2", "E"] {
                for model in ModelKind::ALL {
                    let mut req = request(domain, query);
                    req.model = model;
                    req.c1_state = Some(VariableState::Present);
                    req.e_state = Some(VariableState::Present);
                    let evaluation = evaluate(&req, &sampler).unwrap();
                    assert!(
                        (0.0..=1.0).contains(&evaluation.probability),
                        "{} out of bounds for {}/{}/{}",
                        evaluation.probability,
                        domain,
                        query,
                        model
                    );
                }
            }
        }
    }

    #[test]
    fn test_unknown_domain_error_text() {
        let req = request("nope", "C1");
        let err = evaluate(&req, &FixedSampler(0.5)).unwrap_err();
        assert_eq!(err, EvalError::DomainNotFound("nope".to_string()));
        assert_eq!(err.to_string(), "Domain nope not found");
    }

    #[test]
    fn test_invalid_query_variable_error_text() {
        let req = request("economics", "C3");
        let err = evaluate(&req, &FixedSampler(0.5)).unwrap_err();
        assert_eq!(err, EvalError::InvalidQueryVariable("C3".to_string()));
        assert_eq!(err.to_string(), "Invalid query variable C3");
    }

    #[test]
    fn test_prompt_rendering() {
        let mut req = request("economics", "C2");
        req.c1_state = Some(VariableState::Present);
        req.e_state = Some(VariableState::Present);

        let evaluation = evaluate(&req, &FixedSampler(0.5)).unwrap();
        assert_eq!(
            evaluation.prompt,
            "Domain: economics\n\
             Causal scenario:\n\
             - Economic recession (C1) is present\n\
             - Market competition (C2) state unknown\n\
             - Business failure (E) is present\n\
             \n\
             Query: What is the likelihood of Market competition being present?"
        );
    }

    #[test]
    fn test_explanation_names_model_and_label() {
        let mut req = request("economics", "C2");
        req.model = ModelKind::Claude;

        let evaluation = evaluate(&req, &FixedSampler(0.5)).unwrap();
        assert_eq!(
            evaluation.explanation,
            "Based on the claude model's analysis, the likelihood of Market competition being present is 55.00%."
        );
    }

    #[test]
    fn test_result_echoes_request() {
        let mut req = request("healthcare", "E");
        req.c1_state = Some(VariableState::Present);
        req.c2_state = Some(VariableState::Absent);
        req.model = ModelKind::Gemini;

        let evaluation = evaluate(&req, &FixedSampler(0.5)).unwrap();
        assert_eq!(evaluation.domain, "healthcare");
        assert_eq!(evaluation.query_variable, QueryVariable::E);
        assert_eq!(evaluation.model, ModelKind::Gemini);
        assert_eq!(evaluation.states.c1, Some(VariableState::Present));
        assert_eq!(evaluation.states.c2, Some(VariableState::Absent));
        assert_eq!(evaluation.states.e, None);
        assert_eq!(evaluation.scenario.effect, "Disease onset");
    }

    #[test]
    fn test_states_wire_shape() {
        let states = States {
            c1: Some(VariableState::Present),
            c2: None,
            e: Some(VariableState::Absent),
        };
        let json = serde_json::to_value(states).unwrap();
        assert_eq!(json["C1"], 1);
        assert!(json["C2"].is_null());
        assert_eq!(json["E"], 0);
    }

    #[test]
    fn test_state_decoding_rejects_out_of_range() {
        assert!(serde_json::from_str::<VariableState>("0").is_ok());
        assert!(serde_json::from_str::<VariableState>("1").is_ok());
        assert!(serde_json::from_str::<VariableState>("2").is_err());
        assert!(serde_json::from_str::<VariableState>("-1").is_err());
    }

    #[test]
    fn test_request_decoding_defaults() {
        let req: EvaluationRequest =
            serde_json::from_str(r#"{"domain": "economics", "query_variable": "C1"}"#).unwrap();
        assert_eq!(req.model, ModelKind::Gpt4);
        assert_eq!(req.c1_state, None);
        assert_eq!(req.c2_state, None);
        assert_eq!(req.e_state, None);
    }

    #[test]
    fn test_model_wire_names() {
        for model in ModelKind::ALL {
            let json = serde_json::to_value(model).unwrap();
            assert_eq!(json, model.as_str());
        }
        assert!(serde_json::from_str::<ModelKind>(r#""gpt-5""#).is_err());
    }
}
