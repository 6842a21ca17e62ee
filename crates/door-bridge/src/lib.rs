//! `door-bridge` — HTTP clients for the door flow's external collaborators.
//!
//! Two services live behind this crate: the Taskwarrior bridge (a thin HTTP
//! wrapper around the local `task` binary) and the TickTick open API. Both
//! clients are async, typed, and carry no retry logic; callers decide
//! whether a failure is fatal (task creation) or best-effort (hit pushes).

pub mod error;
pub mod taskwarrior;
pub mod ticktick;

pub use error::{BridgeError, Result};
pub use taskwarrior::{CreatedTask, TaskBridgeClient, TaskSpec};
pub use ticktick::{CreatedTicktickTask, NewTask, TickTickClient};
