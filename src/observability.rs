use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("mentorai.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("mentorai.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("mentorai.client.request_duration_seconds");

pub(crate) static SESSION_TURNS: Counter = Counter::new("mentorai.session.turns");
pub(crate) static SESSION_TURN_ERRORS: Counter = Counter::new("mentorai.session.turn_errors");
pub(crate) static SESSION_VALIDATION_REJECTIONS: Counter =
    Counter::new("mentorai.session.validation_rejections");
pub(crate) static SESSION_BUSY_REJECTIONS: Counter =
    Counter::new("mentorai.session.busy_rejections");

pub(crate) static CATALOG_FETCH_FAILURES: Counter =
    Counter::new("mentorai.catalog.fetch_failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_TURN_ERRORS);
    collector.register_counter(&SESSION_VALIDATION_REJECTIONS);
    collector.register_counter(&SESSION_BUSY_REJECTIONS);

    collector.register_counter(&CATALOG_FETCH_FAILURES);
}
