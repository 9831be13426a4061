/// Checkers domain types and rules.
pub mod rules;
/// Services that connect sessions to storage and time.
pub mod service;
/// The state machine of a match.
pub mod session;
/// Assorted utilities.
pub mod util;
