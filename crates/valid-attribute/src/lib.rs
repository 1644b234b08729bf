//! # valid-attribute
//!
//! A matcher for testing whether a model's validation accepts or rejects
//! specific values for one of its attributes.
//!
//! The matcher assigns each trial value to the attribute, runs the
//! subject's validity check once per value, and reports which values were
//! accepted and which were rejected.
//!
//! ## Example
//!
//! ```rust
//! use valid_attribute::prelude::*;
//!
//! let mut user = FnSubject::new("User")
//!     .attribute("name", Value::Nil)
//!     .validity(|attrs| attrs["name"].as_str().map_or(false, |s| !s.is_empty()))
//!     .errors_for(|_| AttributeErrors::single("name", "can't be blank"));
//!
//! let mut matcher = have_valid("name").when(values!["abc", "", Value::Nil]).unwrap();
//!
//! assert!(!matcher.matches(&mut user).unwrap());
//! assert_eq!(
//!     matcher.failure_message().unwrap(),
//!     " expected User#name to accept the values: \"\", nil"
//! );
//! assert_eq!(
//!     matcher.description().unwrap(),
//!     "be valid when name is: \"abc\", \"\", nil"
//! );
//! ```
//!
//! ## Evaluation rules
//!
//! - Each matcher runs against a subject at most once. `matches`,
//!   `does_not_match` and the message builders all read the same recorded
//!   observations.
//! - `matches` holds when every value was accepted, `does_not_match` when
//!   every value was rejected. A mixed outcome satisfies neither.
//! - A run that hits a contract violation leaves the matcher failed; it
//!   will not touch the subject again.
//! - Cloning a matcher gives a fresh, unevaluated copy flagged by
//!   [`Matcher::is_clone`].

mod attribute_errors;
mod error;
mod matcher;
mod report;
mod subject;
mod value;

pub use attribute_errors::AttributeErrors;
pub use error::{MatchError, Result};
pub use matcher::{have_valid, Matcher, Observation};
pub use report::{MatchReport, Rejection};
pub use subject::{AttributeMap, Attributes, FnSubject, Model, Subject, Validate};
pub use value::{join_literals, Value};

/// Prelude module for matcher users
pub mod prelude {
    pub use crate::attribute_errors::AttributeErrors;
    pub use crate::error::MatchError;
    pub use crate::matcher::{have_valid, Matcher, Observation};
    pub use crate::subject::{Attributes, FnSubject, Model, Subject, Validate};
    pub use crate::value::Value;
    pub use crate::values;
}
