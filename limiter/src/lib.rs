use std::{sync::Arc, time::Duration};

use middleware::{fixed::FixedWindowLimiter, global::GlobalLimiter};
use policy::WindowPolicy;
use store::FixedWindowStore;

pub mod policy;
pub mod store;

pub mod middleware {
    pub mod fixed;
    pub mod global;
}

pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub fn global_middleware(permits_per_second: u32) -> GlobalLimiter {
    GlobalLimiter::new(permits_per_second)
}

pub fn window_middleware(store: Arc<FixedWindowStore>, policy: WindowPolicy) -> FixedWindowLimiter {
    FixedWindowLimiter::new(store, policy)
}
