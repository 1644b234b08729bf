//! Trial runner and match evaluation.
//!
//! A [`Matcher`] starts `Unevaluated`, and the first evaluation against a
//! subject assigns each trial value in turn, records one [`Observation`]
//! per value and freezes them as `Evaluated`. Every later query reads the
//! frozen observations; nothing ever evaluates the same instance twice.
//! A run that breaks off on a contract violation leaves the instance
//! `Failed`, since the subject may already have been checked for some
//! values. Cloning yields a fresh `Unevaluated` instance with the same
//! configuration.

use crate::error::{MatchError, Result};
use crate::subject::Subject;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// Outcome of assigning one trial value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub value: Value,
    pub accepted: bool,
    /// The subject's messages for the attribute when the value was rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,
}

/// Frozen result of one run.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Evaluation {
    pub(crate) model: String,
    pub(crate) trial_values: Vec<Value>,
    pub(crate) observations: Vec<Observation>,
}

impl Evaluation {
    pub(crate) fn accepted(&self) -> impl Iterator<Item = &Value> {
        self.observations
            .iter()
            .filter(|o| o.accepted)
            .map(|o| &o.value)
    }

    pub(crate) fn rejected(&self) -> impl Iterator<Item = &Value> {
        self.observations
            .iter()
            .filter(|o| !o.accepted)
            .map(|o| &o.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Unevaluated,
    Evaluated(Evaluation),
    Failed,
}

/// Checks whether a subject accepts trial values for one attribute.
///
/// ```rust
/// use valid_attribute::prelude::*;
///
/// let mut user = FnSubject::new("User").attribute("name", Value::Nil);
/// let mut matcher = have_valid("name").when(values!["abc", 123]).unwrap();
///
/// assert!(matcher.matches(&mut user).unwrap());
/// assert!(!matcher.does_not_match(&mut user).unwrap());
/// assert_eq!(
///     matcher.negative_failure_message().unwrap(),
///     " expected User#name to reject the values: \"abc\", 123"
/// );
/// ```
#[derive(Debug)]
pub struct Matcher {
    attribute: String,
    values: Option<Vec<Value>>,
    model_name: Option<String>,
    state: State,
    is_clone: bool,
}

/// Start a matcher for `attribute` in default-value mode.
///
/// Without [`Matcher::when`], the single trial value is whatever the
/// attribute holds when the matcher first runs.
pub fn have_valid(attribute: impl Into<String>) -> Matcher {
    Matcher::new(attribute)
}

impl Matcher {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            values: None,
            model_name: None,
            state: State::Unevaluated,
            is_clone: false,
        }
    }

    /// Set the trial values, in the order they will be assigned.
    ///
    /// Duplicates are kept. An empty list leaves the matcher in
    /// default-value mode. Fails with [`MatchError::AlreadyConfigured`]
    /// once the matcher has run.
    pub fn when<I, V>(mut self, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        if self.has_run() {
            return Err(MatchError::AlreadyConfigured(self.attribute));
        }
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.values = if values.is_empty() { None } else { Some(values) };
        Ok(self)
    }

    /// Override the subject name used in messages.
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = Some(name.into());
        self
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Trial values given to [`Matcher::when`], if any.
    pub fn configured_values(&self) -> Option<&[Value]> {
        self.values.as_deref()
    }

    /// True once a run was attempted, whether it finished or failed.
    pub fn has_run(&self) -> bool {
        !matches!(self.state, State::Unevaluated)
    }

    /// True if the run broke off with an error. Only a clone can run again.
    pub fn has_failed(&self) -> bool {
        matches!(self.state, State::Failed)
    }

    /// True only for instances produced by [`Clone::clone`].
    pub fn is_clone(&self) -> bool {
        self.is_clone
    }

    /// Observations from the run, empty before it.
    pub fn observations(&self) -> &[Observation] {
        match &self.state {
            State::Evaluated(evaluation) => &evaluation.observations,
            State::Unevaluated | State::Failed => &[],
        }
    }

    /// Values the subject accepted, in trial order.
    pub fn accepted_values(&self) -> Result<Vec<Value>> {
        Ok(self.evaluation()?.accepted().cloned().collect())
    }

    /// Values the subject rejected, in trial order.
    pub fn rejected_values(&self) -> Result<Vec<Value>> {
        Ok(self.evaluation()?.rejected().cloned().collect())
    }

    /// Assign every trial value to the subject and record the outcomes.
    ///
    /// Runs at most once per instance; a second call fails with
    /// [`MatchError::AlreadyRun`], including after a failed run. Clone the
    /// matcher for another run.
    pub fn run<S>(&mut self, subject: &mut S) -> Result<&[Observation]>
    where
        S: Subject + ?Sized,
    {
        if self.has_run() {
            return Err(MatchError::AlreadyRun(self.attribute.clone()));
        }

        match self.evaluate(subject) {
            Ok(evaluation) => {
                tracing::debug!(
                    model = %evaluation.model,
                    attribute = %self.attribute,
                    accepted = evaluation.accepted().count(),
                    rejected = evaluation.rejected().count(),
                    clone = self.is_clone,
                    "matcher evaluated"
                );
                self.state = State::Evaluated(evaluation);
                Ok(self.observations())
            }
            Err(err) => {
                tracing::warn!(
                    attribute = %self.attribute,
                    error = %err,
                    "matcher run failed"
                );
                self.state = State::Failed;
                Err(err)
            }
        }
    }

    fn evaluate<S>(&self, subject: &mut S) -> Result<Evaluation>
    where
        S: Subject + ?Sized,
    {
        let trial_values = match &self.values {
            Some(values) => values.clone(),
            None => vec![subject.read_attribute(&self.attribute)?],
        };
        let model = self
            .model_name
            .clone()
            .unwrap_or_else(|| subject.model_name());

        let mut observations = Vec::with_capacity(trial_values.len());
        for value in &trial_values {
            subject.write_attribute(&self.attribute, value.clone())?;
            let accepted = subject.is_valid();
            let error_text = if accepted {
                None
            } else {
                subject.errors().messages_for(&self.attribute)
            };

            tracing::debug!(
                model = %model,
                attribute = %self.attribute,
                value = %value,
                accepted,
                error = error_text.as_deref().unwrap_or(""),
                "trial value evaluated"
            );

            observations.push(Observation {
                value: value.clone(),
                accepted,
                error_text,
            });
        }

        Ok(Evaluation {
            model,
            trial_values,
            observations,
        })
    }

    /// True iff the subject accepted every trial value.
    pub fn matches<S>(&mut self, subject: &mut S) -> Result<bool>
    where
        S: Subject + ?Sized,
    {
        Ok(self.ensure_run(subject)?.rejected().next().is_none())
    }

    /// True iff the subject rejected every trial value.
    ///
    /// A mixed outcome is neither a match nor a negated match.
    pub fn does_not_match<S>(&mut self, subject: &mut S) -> Result<bool>
    where
        S: Subject + ?Sized,
    {
        Ok(self.ensure_run(subject)?.accepted().next().is_none())
    }

    fn ensure_run<S>(&mut self, subject: &mut S) -> Result<&Evaluation>
    where
        S: Subject + ?Sized,
    {
        match self.state {
            State::Unevaluated => {
                self.run(subject)?;
            }
            State::Evaluated(_) => {
                tracing::trace!(attribute = %self.attribute, "reusing recorded observations");
            }
            State::Failed => return Err(MatchError::AlreadyRun(self.attribute.clone())),
        }
        self.evaluation()
    }

    pub(crate) fn evaluation(&self) -> Result<&Evaluation> {
        match &self.state {
            State::Evaluated(evaluation) => Ok(evaluation),
            State::Unevaluated | State::Failed => {
                Err(MatchError::EvaluationNotRun(self.attribute.clone()))
            }
        }
    }
}

/// Copies the configuration into a fresh, unevaluated matcher.
///
/// The copy is flagged by [`Matcher::is_clone`] and can run once on its
/// own without affecting the original.
impl Clone for Matcher {
    fn clone(&self) -> Self {
        Self {
            attribute: self.attribute.clone(),
            values: self.values.clone(),
            model_name: self.model_name.clone(),
            state: State::Unevaluated,
            is_clone: true,
        }
    }
}
