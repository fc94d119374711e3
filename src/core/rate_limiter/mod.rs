//! Rate-limited request scheduler
//!
//! Enforces per-minute request and token ceilings, a daily request ceiling with
//! per-caller caps, and a concurrency ceiling. Work that cannot start right away
//! waits in a bounded priority queue drained by a periodic tick.

mod admission;
mod job;
mod ledger;
mod limiter;
mod queue;
mod scheduler;
mod types;
mod utils;
mod window;


// Re-export public types
pub use admission::{AdmissionController, Now};
pub use ledger::{CallerUsage, UsageLedger};
pub use limiter::RateLimitManager;
pub use queue::{PriorityQueue, QueueFull, QueuedRequest};
pub use scheduler::SchedulerHandle;
pub use types::{Ceiling, RateLimitStatus, RequestPriority, SubmitOptions, WindowUsage};
pub use window::{GlobalWindow, WindowStatus};
