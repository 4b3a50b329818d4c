use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("tutorius.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("tutorius.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("tutorius.client.request_duration_seconds");

pub(crate) static EXCHANGES: Counter = Counter::new("tutorius.exchange.started");
pub(crate) static EXCHANGE_ERRORS: Counter = Counter::new("tutorius.exchange.errors");
pub(crate) static EXCHANGE_SKIPPED: Counter = Counter::new("tutorius.exchange.skipped");
pub(crate) static EXCHANGE_BUSY: Counter = Counter::new("tutorius.exchange.busy");
pub(crate) static EXCHANGE_DURATION: Moments =
    Moments::new("tutorius.exchange.duration_seconds");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&EXCHANGES);
    collector.register_counter(&EXCHANGE_ERRORS);
    collector.register_counter(&EXCHANGE_SKIPPED);
    collector.register_counter(&EXCHANGE_BUSY);
    collector.register_moments(&EXCHANGE_DURATION);
}
