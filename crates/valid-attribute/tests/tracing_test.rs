use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing_subscriber::layer::SubscriberExt;
use valid_attribute::prelude::*;

#[derive(Debug, Clone)]
struct CapturedEvent {
    message: String,
    fields: HashMap<String, String>,
}

/// Layer that records every event it sees.
#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut fields = HashMap::new();
        let mut visitor = FieldVisitor { fields: &mut fields };
        event.record(&mut visitor);

        let message = fields.remove("message").unwrap_or_default();
        self.events
            .lock()
            .unwrap()
            .push(CapturedEvent { message, fields });
    }
}

struct FieldVisitor<'a> {
    fields: &'a mut HashMap<String, String>,
}

impl<'a> tracing::field::Visit for FieldVisitor<'a> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }
}

fn mixed_user() -> FnSubject<'static> {
    FnSubject::new("User")
        .attribute("name", Value::Nil)
        .validity(|attrs| attrs["name"].as_str().is_some())
        .errors_for(|_| AttributeErrors::single("name", "must be text"))
}

#[test]
fn one_event_per_trial_value() {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut user = mixed_user();
        let mut matcher = have_valid("name").when(values!["abc", 123]).unwrap();
        matcher.matches(&mut user).unwrap();
        matcher.does_not_match(&mut user).unwrap();
    });

    let trials = capture.with_message("trial value evaluated");
    assert_eq!(trials.len(), 2);
    assert_eq!(trials[0].fields["value"], "\"abc\"");
    assert_eq!(trials[0].fields["accepted"], "true");
    assert_eq!(trials[1].fields["value"], "123");
    assert_eq!(trials[1].fields["accepted"], "false");
    assert_eq!(trials[1].fields["error"], "must be text");

    let summaries = capture.with_message("matcher evaluated");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].fields["accepted"], "1");
    assert_eq!(summaries[0].fields["rejected"], "1");
    assert_eq!(summaries[0].fields["clone"], "false");
}

#[test]
fn clone_run_for_description_is_logged() {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut user = mixed_user().attribute("name", "abc");
        let matcher = have_valid("name");
        matcher.describe_against(&mut user).unwrap();
    });

    assert_eq!(capture.with_message("resolving description on a clone").len(), 1);
    let summaries = capture.with_message("matcher evaluated");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].fields["clone"], "true");
}

#[test]
fn failed_run_is_logged_once_and_not_retried() {
    let capture = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut user = mixed_user();
        let mut matcher = have_valid("email").when(values!["a@b.c"]).unwrap();
        assert!(matches!(
            matcher.matches(&mut user),
            Err(MatchError::ContractViolation { .. })
        ));
        assert!(matcher.has_failed());
        assert!(matches!(
            matcher.does_not_match(&mut user),
            Err(MatchError::AlreadyRun(_))
        ));
    });

    let failures = capture.with_message("matcher run failed");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].fields["attribute"], "email");
    assert!(capture.with_message("matcher evaluated").is_empty());
}
