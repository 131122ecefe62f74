//! Fixed-window click limiter.
//!
//! One accepted action per window, tracked per user within a session.
//! Rejections carry the remaining wait so the caller can surface it, and
//! they never consume the window. Time comes from `tokio::time::Instant`
//! so paused-clock tests observe the limiter deterministically.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

/// Per-user fixed-window rate gate for pick input.
#[derive(Debug)]
pub struct ClickLimiter {
    window: Duration,
    last_accepted: HashMap<u64, Instant>,
}

impl ClickLimiter {
    /// Creates a limiter allowing one action per `window`.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: HashMap::new(),
        }
    }

    /// Checks whether an action from `user` is inside the open window.
    ///
    /// An accepted action starts the user's next window. A rejected action
    /// leaves the window untouched.
    ///
    /// # Arguments
    /// - `user` - Discord id of the acting user
    ///
    /// # Returns
    /// - `Ok(())` - Action accepted; the window restarts now
    /// - `Err(Duration)` - Action rejected; remaining wait time
    pub fn check(&mut self, user: u64) -> Result<(), Duration> {
        let now = Instant::now();
        if let Some(last) = self.last_accepted.get(&user) {
            let open_at = *last + self.window;
            if now < open_at {
                return Err(open_at - now);
            }
        }
        self.last_accepted.insert(user, now);
        Ok(())
    }
}
