//! Progress notification port
//!
//! Lets the presentation layer show a pending indicator while a request
//! is in flight.

/// Callbacks around a single outbound request
pub trait ExchangeProgressNotifier: Send + Sync {
    /// Called right before the request is issued.
    fn on_request_start(&self, message: &str);

    /// Called once the request resolved, successfully or not.
    fn on_request_end(&self, success: bool);
}

/// No-op notifier for when progress reporting is not needed
pub struct NoExchangeProgress;

impl ExchangeProgressNotifier for NoExchangeProgress {
    fn on_request_start(&self, _message: &str) {}
    fn on_request_end(&self, _success: bool) {}
}
