#[cfg(feature = "parking-lot")]
pub use parking_lot::{Mutex, MutexGuard};
#[cfg(not(feature = "parking-lot"))]
pub use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, mapping std poisoning into [`crate::Error::LockPoisoned`].
macro_rules! lock {
    ($mutex:expr) => {{
        #[cfg(feature = "parking-lot")]
        {
            $mutex.lock()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            $mutex.lock()?
        }
    }};
}

pub(crate) use lock;
