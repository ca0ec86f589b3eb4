use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::StrategyError;

/// Shared flag checked inside the enumeration and LP loops. Cloning shares the
/// flag, so a clone handed to another thread can stop a running build.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn check(&self) -> Result<(), StrategyError> {
        if self.is_cancelled() {
            Err(StrategyError::Cancelled)
        } else {
            Ok(())
        }
    }
}
