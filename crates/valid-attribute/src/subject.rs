//! The capability contract a matcher exercises.
//!
//! A subject needs three things: a validity check, the error collection
//! that check leaves behind, and a read/write accessor for attributes by
//! name. Types can implement [`Subject`] directly, wrap themselves in
//! [`Model`] by implementing [`Validate`] and [`Attributes`], or skip the
//! traits entirely and assemble an [`FnSubject`] from closures.

use crate::attribute_errors::AttributeErrors;
use crate::error::{MatchError, Result};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;

/// An object whose validation logic can be exercised one attribute at a time.
///
/// ## Example
///
/// ```rust
/// use valid_attribute::prelude::*;
///
/// struct User {
///     name: Value,
///     errors: AttributeErrors,
/// }
///
/// impl Subject for User {
///     fn is_valid(&mut self) -> bool {
///         self.errors.clear();
///         if self.name.is_nil() {
///             self.errors.add("name", "can't be blank");
///         }
///         self.errors.is_empty()
///     }
///
///     fn errors(&self) -> &AttributeErrors {
///         &self.errors
///     }
///
///     fn read_attribute(&self, attribute: &str) -> Result<Value, MatchError> {
///         match attribute {
///             "name" => Ok(self.name.clone()),
///             _ => Err(MatchError::unknown_attribute("User", attribute)),
///         }
///     }
///
///     fn write_attribute(&mut self, attribute: &str, value: Value) -> Result<(), MatchError> {
///         match attribute {
///             "name" => {
///                 self.name = value;
///                 Ok(())
///             }
///             _ => Err(MatchError::unknown_attribute("User", attribute)),
///         }
///     }
/// }
///
/// let mut user = User { name: Value::Nil, errors: AttributeErrors::new() };
/// let mut matcher = have_valid("name").when(values!["abc"]).unwrap();
/// assert!(matcher.matches(&mut user).unwrap());
/// ```
pub trait Subject {
    /// Name shown in failure messages, e.g. `User` in `User#name`.
    fn model_name(&self) -> String {
        short_type_name(std::any::type_name::<Self>()).to_string()
    }

    /// Run the subject's validation. May have side effects.
    fn is_valid(&mut self) -> bool;

    /// Errors left behind by the most recent validity check.
    fn errors(&self) -> &AttributeErrors;

    /// Read an attribute's current value.
    fn read_attribute(&self, attribute: &str) -> Result<Value>;

    /// Assign a value to an attribute.
    fn write_attribute(&mut self, attribute: &str, value: Value) -> Result<()>;
}

/// `my_app::models::User` -> `User`, `Wrapper<a::B>` -> `Wrapper`.
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Validation half of the [`Model`] adapter.
pub trait Validate {
    fn validate(&self) -> std::result::Result<(), AttributeErrors>;
}

/// Accessor half of the [`Model`] adapter.
///
/// Implementations report unknown attributes or values of the wrong shape
/// with [`MatchError::unknown_attribute`] / [`MatchError::type_mismatch`].
pub trait Attributes {
    fn get_attribute(&self, attribute: &str) -> Result<Value>;

    fn set_attribute(&mut self, attribute: &str, value: Value) -> Result<()>;
}

/// Adapter turning a `Validate + Attributes` type into a [`Subject`].
///
/// Errors from the last validity check are kept so they can be read back
/// through [`Subject::errors`].
#[derive(Debug, Clone)]
pub struct Model<T> {
    inner: T,
    errors: AttributeErrors,
}

impl<T> Model<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            errors: AttributeErrors::new(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Validate + Attributes> Subject for Model<T> {
    fn model_name(&self) -> String {
        short_type_name(std::any::type_name::<T>()).to_string()
    }

    fn is_valid(&mut self) -> bool {
        match self.inner.validate() {
            Ok(()) => {
                self.errors.clear();
                true
            }
            Err(errors) => {
                self.errors = errors;
                false
            }
        }
    }

    fn errors(&self) -> &AttributeErrors {
        &self.errors
    }

    fn read_attribute(&self, attribute: &str) -> Result<Value> {
        self.inner.get_attribute(attribute)
    }

    fn write_attribute(&mut self, attribute: &str, value: Value) -> Result<()> {
        self.inner.set_attribute(attribute, value)
    }
}

/// Attribute storage backing an [`FnSubject`].
pub type AttributeMap = HashMap<String, Value>;

type ValidityFn<'a> = Box<dyn FnMut(&AttributeMap) -> bool + 'a>;
type ErrorsFn<'a> = Box<dyn FnMut(&AttributeMap) -> AttributeErrors + 'a>;

/// A subject assembled from closures instead of a trait implementation.
///
/// The accessor is an [`AttributeMap`]; only attributes declared with
/// [`FnSubject::attribute`] can be read or written.
///
/// ```rust
/// use valid_attribute::prelude::*;
///
/// let mut subject = FnSubject::new("User")
///     .attribute("name", Value::Nil)
///     .validity(|attrs| attrs.get("name").map_or(false, |v| !v.is_nil()))
///     .errors_for(|_| AttributeErrors::single("name", "can't be blank"));
///
/// let mut matcher = have_valid("name").when(values![Value::Nil]).unwrap();
/// assert!(matcher.does_not_match(&mut subject).unwrap());
/// ```
pub struct FnSubject<'a> {
    model_name: String,
    attributes: AttributeMap,
    validity: ValidityFn<'a>,
    errors_for: ErrorsFn<'a>,
    errors: AttributeErrors,
}

impl<'a> FnSubject<'a> {
    /// A subject that accepts everything until told otherwise.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            attributes: AttributeMap::new(),
            validity: Box::new(accept_all),
            errors_for: Box::new(no_errors),
            errors: AttributeErrors::new(),
        }
    }

    /// Declare an attribute and its initial value.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the validity check.
    pub fn validity(mut self, check: impl FnMut(&AttributeMap) -> bool + 'a) -> Self {
        self.validity = Box::new(check);
        self
    }

    /// Set how errors are produced after a failed check.
    pub fn errors_for(mut self, errors: impl FnMut(&AttributeMap) -> AttributeErrors + 'a) -> Self {
        self.errors_for = Box::new(errors);
        self
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

fn accept_all(_: &AttributeMap) -> bool {
    true
}

fn no_errors(_: &AttributeMap) -> AttributeErrors {
    AttributeErrors::new()
}

impl fmt::Debug for FnSubject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSubject")
            .field("model_name", &self.model_name)
            .field("attributes", &self.attributes)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl Subject for FnSubject<'_> {
    fn model_name(&self) -> String {
        self.model_name.clone()
    }

    fn is_valid(&mut self) -> bool {
        let valid = (self.validity)(&self.attributes);
        self.errors = if valid {
            AttributeErrors::new()
        } else {
            (self.errors_for)(&self.attributes)
        };
        valid
    }

    fn errors(&self) -> &AttributeErrors {
        &self.errors
    }

    fn read_attribute(&self, attribute: &str) -> Result<Value> {
        self.attributes
            .get(attribute)
            .cloned()
            .ok_or_else(|| MatchError::unknown_attribute(&self.model_name, attribute))
    }

    fn write_attribute(&mut self, attribute: &str, value: Value) -> Result<()> {
        match self.attributes.get_mut(attribute) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(MatchError::unknown_attribute(&self.model_name, attribute)),
        }
    }
}
