//! Human-readable messages and structured reports for a matcher.
//!
//! Messages name the subject and attribute and list the offending values
//! in literal form:
//!
//! ```text
//!  expected User#name to accept the value: 123
//!  expected User#name to reject the values: "abc", :abc
//! be valid when name is: "abc", 123
//! ```

use crate::error::Result;
use crate::matcher::{Evaluation, Matcher, Observation};
use crate::subject::Subject;
use crate::value::{join_literals, Value};
use serde::{Deserialize, Serialize};

fn expectation(evaluation: &Evaluation, attribute: &str, verb: &str, values: &[Value]) -> String {
    let plural = if values.len() == 1 { "" } else { "s" };
    format!(
        " expected {}#{} to {} the value{}: {}",
        evaluation.model,
        attribute,
        verb,
        plural,
        join_literals(values)
    )
}

impl Matcher {
    /// Message for a failed positive expectation, listing rejected values.
    pub fn failure_message(&self) -> Result<String> {
        let evaluation = self.evaluation()?;
        let rejected: Vec<Value> = evaluation.rejected().cloned().collect();
        Ok(expectation(evaluation, self.attribute(), "accept", &rejected))
    }

    /// Message for a failed negative expectation, listing accepted values.
    pub fn negative_failure_message(&self) -> Result<String> {
        let evaluation = self.evaluation()?;
        let accepted: Vec<Value> = evaluation.accepted().cloned().collect();
        Ok(expectation(evaluation, self.attribute(), "reject", &accepted))
    }

    /// Alias of [`Matcher::negative_failure_message`].
    pub fn failure_message_when_negated(&self) -> Result<String> {
        self.negative_failure_message()
    }

    /// Describe the expectation using the trial values as configured.
    ///
    /// In default-value mode the value is only known after a run, so this
    /// fails with [`MatchError::EvaluationNotRun`](crate::MatchError) until
    /// then. Use [`Matcher::describe_against`] to resolve it from a subject.
    pub fn description(&self) -> Result<String> {
        let values: &[Value] = match self.configured_values() {
            Some(values) => values,
            None => self.evaluation()?.trial_values.as_slice(),
        };
        Ok(format!(
            "be valid when {} is: {}",
            self.attribute(),
            join_literals(values)
        ))
    }

    /// Describe the expectation, resolving default-value mode on a clone.
    ///
    /// This matcher is never run here: when the trial values are not yet
    /// known, a clone runs against `subject` instead, so a later call to
    /// [`Matcher::matches`] still performs this instance's only run.
    pub fn describe_against<S>(&self, subject: &mut S) -> Result<String>
    where
        S: Subject + ?Sized,
    {
        if self.configured_values().is_some() || self.has_run() {
            return self.description();
        }

        tracing::debug!(
            attribute = %self.attribute(),
            "resolving description on a clone"
        );
        let mut trial = self.clone();
        trial.run(subject)?;
        trial.description()
    }

    /// Structured snapshot of the run.
    pub fn report(&self) -> Result<MatchReport> {
        let evaluation = self.evaluation()?;
        let (accepted, rejected): (Vec<&Observation>, Vec<&Observation>) =
            evaluation.observations.iter().partition(|o| o.accepted);

        Ok(MatchReport {
            model: evaluation.model.clone(),
            attribute: self.attribute().to_string(),
            accepted: accepted.into_iter().map(|o| o.value.clone()).collect(),
            rejected: rejected
                .into_iter()
                .map(|o| Rejection {
                    value: o.value.clone(),
                    errors: o.error_text.clone(),
                })
                .collect(),
        })
    }
}

/// Serializable outcome of a run, split into accepted and rejected buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub model: String,
    pub attribute: String,
    pub accepted: Vec<Value>,
    pub rejected: Vec<Rejection>,
}

/// A rejected trial value and the subject's messages for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
}

impl MatchReport {
    pub fn is_match(&self) -> bool {
        self.rejected.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
