//! Session engine - owns a game and drives it through time
//!
//! - [`session`]: synchronous `Session`, one mutation entry point per trigger
//! - [`scheduler`]: deferred gravity tasks with identity and episode tags
//! - [`runtime`]: tokio task wrapper serializing requests through a queue

pub mod runtime;
pub mod scheduler;
pub mod session;

pub use runtime::{spawn_session, EngineError, RuntimeConfig, SessionHandle};
pub use scheduler::{GravityTask, Scheduler, TaskId};
pub use session::{RestartOptions, Session};
