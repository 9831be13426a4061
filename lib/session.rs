mod action;
mod chat;
mod clocks;
mod config;
mod outcome;
mod participant;
mod rejection;
mod state;

pub use action::*;
pub use chat::*;
pub use clocks::*;
pub use config::*;
pub use outcome::*;
pub use participant::*;
pub use rejection::*;
pub use state::*;
