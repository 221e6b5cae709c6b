//! # netprompt
//!
//! Async SSH prompt discovery and command execution for network devices.
//!
//! Network devices give no structured signal that a command has finished;
//! the only signal is the prompt coming back. netprompt infers a device's
//! prompt from its output using an ordered list of vendor patterns,
//! validates the guess with a blank-line round trip, and then uses the
//! validated prompt to delimit command output.
//!
//! ## Features
//!
//! - Async SSH connections via russh
//! - Ordered, externalizable prompt patterns (Aruba, ClearPass, IOS-XR, generic Cisco)
//! - Validated prompt discovery with bounded retries
//! - Bounded command reads that report truncated output instead of hiding it
//! - TCP reachability probe before login
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netprompt::SessionBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), netprompt::Error> {
//!     let mut session = SessionBuilder::new("192.168.1.1")
//!         .username("admin")
//!         .password("secret")
//!         .build()?;
//!
//!     session.connect().await?;
//!     println!("prompt: {:?}", session.prompt());
//!
//!     let response = session.exec("show version").await?;
//!     println!("{}", response.body());
//!
//!     session.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod driver;
pub mod error;
pub mod platform;
pub mod transport;

// Re-export main types for convenience
pub use driver::{DiscoveredPrompt, Response, Session, SessionBuilder, SessionOptions, SessionState};
pub use error::Error;
pub use platform::{PatternRegistry, PatternSpec, PromptPattern};
pub use transport::{AuthMethod, Connector, SshConfig, Transport, probe};
