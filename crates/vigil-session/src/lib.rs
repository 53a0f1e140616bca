//! # vigil-session
//!
//! The session lifecycle state machine: the top-level controller that
//! sequences gate → consent → monitor → submission → audit review and owns
//! the attempt identity for its lifetime.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vigil_session::{SessionConfig, SessionController};
//!
//! let mut session = SessionController::new(config, store, sync);
//! session.detect(user_agent)?;
//! session.confirm_start()?;
//! session.handle_signal(SensorSignal::Fullscreen(true))?;
//! session.submit(answers)?;
//! ```

pub mod config;
pub mod controller;

pub use config::SessionConfig;
pub use controller::{Phase, SessionController};
