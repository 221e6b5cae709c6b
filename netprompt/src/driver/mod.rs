//! Session driver: prompt discovery and command execution.
//!
//! [`Session`] sequences the reachability probe, transport login, and
//! prompt discovery, then runs commands delimited by the discovered prompt.

mod builder;
pub mod detect;
pub mod exec;
mod options;
pub(crate) mod response;
mod session;

pub use builder::SessionBuilder;
pub use detect::{DiscoveredPrompt, MAX_PROMPT_ATTEMPTS, find_prompt};
pub use exec::{DEFAULT_MAX_TRIES, run_command};
pub use options::SessionOptions;
pub use response::Response;
pub use session::{Session, SessionState};
