pub mod config;
pub mod error;
pub mod roster;
pub mod types;

pub use config::Config;
pub use error::PipelineError;
pub use roster::{Roster, RosterEntry};
pub use types::*;
