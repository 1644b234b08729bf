use crate::value::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("matcher for `{0}` has already run; clone it to evaluate again")]
    AlreadyRun(String),

    #[error("matcher for `{0}` cannot take trial values after it has run")]
    AlreadyConfigured(String),

    #[error("matcher for `{0}` has not been evaluated against a subject yet")]
    EvaluationNotRun(String),

    #[error("{model} does not satisfy the subject contract for `{attribute}`: {reason}")]
    ContractViolation {
        model: String,
        attribute: String,
        reason: String,
    },
}

impl MatchError {
    /// Contract violation for an attribute the subject has no accessor for.
    pub fn unknown_attribute(model: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::ContractViolation {
            model: model.into(),
            attribute: attribute.into(),
            reason: "no such attribute".to_string(),
        }
    }

    /// Contract violation for a value the attribute cannot hold.
    pub fn type_mismatch(
        model: impl Into<String>,
        attribute: impl Into<String>,
        value: &Value,
    ) -> Self {
        Self::ContractViolation {
            model: model.into(),
            attribute: attribute.into(),
            reason: format!("cannot assign {}", value),
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_attribute_names_model_and_attribute() {
        let err = MatchError::unknown_attribute("User", "nickname");
        assert_eq!(
            err.to_string(),
            "User does not satisfy the subject contract for `nickname`: no such attribute"
        );
    }

    #[test]
    fn already_run_suggests_cloning() {
        let err = MatchError::AlreadyRun("name".to_string());
        assert!(err.to_string().contains("clone it"));
    }
}
