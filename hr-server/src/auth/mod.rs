//! Access gate: session tokens, caller resolution, capability checks

pub mod gate;
pub mod rate_limit;
pub mod session;

pub use gate::{require, resolve_caller};
pub use rate_limit::RateLimiter;
pub use session::{Caller, SessionKeys};
