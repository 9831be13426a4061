mod arbiter;
mod clock;
mod config;
mod memory;
mod repository;

pub use arbiter::*;
pub use clock::*;
pub use config::*;
pub use memory::*;
pub use repository::*;
