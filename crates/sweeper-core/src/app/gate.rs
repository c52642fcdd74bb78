//! AdmissionGate - 同時実行数の上限
//!
//! `tokio::sync::Semaphore` の薄いラッパー。permit は [`Admission`] が所有し、
//! drop された時点で必ず返却される（panic を含むすべての終了経路）。
//!
//! # 計測
//! - `in_flight`: いま permit を持っているタスク数
//! - `peak`: 実行中に観測された `in_flight` の最大値（上限テスト用）

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

#[derive(Clone)]
pub struct AdmissionGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

/// A held admission slot. Dropping it releases the slot.
pub struct Admission {
    gate: Arc<GateInner>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for Admission {
    fn drop(&mut self) {
        // runs before `_permit` is dropped, so `in_flight` never exceeds held permits
        self.gate.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl AdmissionGate {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(GateInner {
                semaphore: Arc::new(Semaphore::new(capacity)),
                capacity,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }),
        }
    }

    /// Wait for a free slot.
    ///
    /// Fails only if the semaphore was closed, which this type never does.
    pub async fn acquire(&self) -> Result<Admission, AcquireError> {
        let permit = Arc::clone(&self.inner.semaphore).acquire_owned().await?;
        let now = self.inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(now, Ordering::SeqCst);
        Ok(Admission {
            gate: Arc::clone(&self.inner),
            _permit: permit,
        })
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }
}
