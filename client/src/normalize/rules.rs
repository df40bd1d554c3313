use serde_json::{Map, Value};
use shared::Label;

/// What a label rule decided. A `None` confidence means the body carried no
/// usable number and the configured default applies.
pub struct Verdict {
    pub label: Label,
    pub confidence: Option<f64>,
}

/// One entry of the label cascade. The backend contract was never versioned,
/// so the rules are duck-typing over field names; keeping them in an explicit
/// ordered table makes the first-match-wins guarantee testable on its own.
pub struct LabelRule {
    pub field: &'static str,
    matches: fn(&Value) -> bool,
    extract: fn(&Value, &Map<String, Value>) -> Verdict,
}

impl LabelRule {
    pub fn evaluate(&self, body: &Map<String, Value>) -> Option<Verdict> {
        let value = body.get(self.field)?;
        if !(self.matches)(value) {
            return None;
        }
        Some((self.extract)(value, body))
    }
}

/// Evaluated top to bottom; the first rule whose field matches settles the
/// label, even when later fields are also present.
pub const LABEL_RULES: &[LabelRule] = &[
    LabelRule {
        field: "Prediction",
        matches: truthy,
        extract: capitalized_prediction,
    },
    LabelRule {
        field: "prediction",
        matches: present,
        extract: lowercase_prediction,
    },
    LabelRule {
        field: "is_fake",
        matches: present,
        extract: fake_flag,
    },
    LabelRule {
        field: "result",
        matches: present,
        extract: result_field,
    },
];

fn present(_value: &Value) -> bool {
    true
}

/// JavaScript-style truthiness, which is what the original clients applied
/// to these fields: null, false, 0 and "" are falsy, everything else is not.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn capitalized_prediction(value: &Value, body: &Map<String, Value>) -> Verdict {
    let label = value
        .as_str()
        .and_then(Label::from_text)
        .unwrap_or(Label::Unknown);
    Verdict {
        label,
        confidence: confidence_from(body, &["confidence", "Confidence"]),
    }
}

fn lowercase_prediction(value: &Value, body: &Map<String, Value>) -> Verdict {
    let is_fake = matches!(value, Value::Bool(true)) || value.as_str() == Some("fake");
    Verdict {
        label: Label::from_bool(is_fake),
        confidence: confidence_from(body, &["confidence"]),
    }
}

fn fake_flag(value: &Value, body: &Map<String, Value>) -> Verdict {
    Verdict {
        label: Label::from_bool(truthy(value)),
        confidence: confidence_from(body, &["confidence"]),
    }
}

fn result_field(value: &Value, body: &Map<String, Value>) -> Verdict {
    let label = match value {
        Value::String(text) => Label::from_text(text).unwrap_or(Label::Unknown),
        Value::Bool(true) => Label::Fake,
        _ => Label::Real,
    };
    Verdict {
        label,
        confidence: confidence_from(body, &["score", "confidence"]),
    }
}

fn confidence_from(body: &Map<String, Value>, fields: &[&str]) -> Option<f64> {
    fields.iter().find_map(|field| body.get(*field).and_then(numeric))
}

/// Backends have sent confidence both as a number and as a numeric string.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
