//! # vigil-monitor
//!
//! Environment integrity monitor for a live assessment: translates raw
//! fullscreen, visibility, clipboard, and connectivity signals into
//! structured trust events, drives the lockdown overlay, and runs the
//! countdown timer.
//!
//! The monitor holds no log state of its own; every sensor callback
//! funnels through the store's append path, so the trail stays the single
//! source of truth.

pub mod monitor;
pub mod signal;
pub mod timer;

pub use monitor::IntegrityMonitor;
pub use signal::{ClipboardAction, SensorSignal, SignalOutcome};
pub use timer::{CountdownTimer, TimerStatus};
