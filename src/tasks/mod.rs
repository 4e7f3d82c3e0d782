//! Task scheduling with automatic rollover.
//!
//! Open tasks left in the past creep forward a day at a time; after
//! repeated rollovers they are pushed a month out. Completed tasks linger
//! for a short retention window, then disappear. See [`rollover`] for the
//! exact rules and [`TaskScheduler`] for the owning collection.

mod model;
pub mod rollover;
mod scheduler;

pub use model::{ScheduledTask, TaskId};
pub use rollover::{Disposition, RolloverPolicy, RolloverReport};
pub use scheduler::TaskScheduler;
