use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use uuid::Uuid;

/// Allows at most one export in flight. Cloned handles share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ExportGuard {
    in_flight: Arc<AtomicBool>,
}

impl ExportGuard {
    /// Claims the export slot, or `None` if another export holds it.
    pub fn try_acquire(&self) -> Option<ExportTicket> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        Some(ExportTicket {
            token: Uuid::new_v4(),
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Proof of holding the export slot. Releases it on drop, including when the
/// export fails or its task is cancelled.
#[derive(Debug)]
pub struct ExportTicket {
    token: Uuid,
    in_flight: Arc<AtomicBool>,
}

impl ExportTicket {
    /// Request token identifying this export in logs.
    pub fn token(&self) -> Uuid {
        self.token
    }

    /// Runs `job` on the blocking pool with the ticket moved inside, so the
    /// slot stays claimed until `job` returns even if the caller stops
    /// waiting for it.
    pub fn run_blocking<T, F>(self, job: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        tokio::task::spawn_blocking(move || {
            let _held = self;
            job()
        })
    }
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}
