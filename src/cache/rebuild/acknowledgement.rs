use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use crate::cache::rebuild::RebuildStatus;

/// RebuildAcknowledgement resolves when the rebuild pool has finished a submitted task.
/// The original caller of the logical-expiration strategy never waits on it, the stale
/// value has already been returned; it exists so the pool itself is testable.
pub(crate) struct RebuildAcknowledgement {
    handle: RebuildAcknowledgementHandle,
}

pub(crate) struct RebuildAcknowledgementHandle {
    done: AtomicBool,
    status: Arc<Mutex<RebuildStatus>>,
    waker_state: Arc<Mutex<WakerState>>,
}

pub(crate) struct WakerState {
    waker: Option<Waker>,
}

impl RebuildAcknowledgement {
    pub(crate) fn new() -> Arc<RebuildAcknowledgement> {
        Arc::new(
            RebuildAcknowledgement {
                handle: RebuildAcknowledgementHandle {
                    done: AtomicBool::new(false),
                    status: Arc::new(Mutex::new(RebuildStatus::Pending)),
                    waker_state: Arc::new(Mutex::new(WakerState {
                        waker: None
                    })),
                },
            }
        )
    }

    pub(crate) fn done(&self, status: RebuildStatus) {
        self.handle.done(status);
    }

    pub(crate) fn handle(&self) -> &RebuildAcknowledgementHandle {
        &self.handle
    }
}

impl RebuildAcknowledgementHandle {
    pub(crate) fn done(&self, status: RebuildStatus) {
        self.done.store(true, Ordering::Release);
        *self.status.lock() = status;
        if let Some(waker) = &self.waker_state.lock().waker {
            waker.wake_by_ref();
        }
    }
}

impl Future for &RebuildAcknowledgementHandle {
    type Output = RebuildStatus;

    fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
        let mut guard = self.waker_state.lock();
        match guard.waker.as_ref() {
            Some(waker) => {
                if !waker.will_wake(context.waker()) {
                    guard.waker = Some(context.waker().clone());
                }
            }
            None => {
                guard.waker = Some(context.waker().clone());
            }
        }

        if self.done.load(Ordering::Acquire) {
            return Poll::Ready(*self.status.lock());
        }
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::rebuild::acknowledgement::RebuildAcknowledgement;
    use crate::cache::rebuild::RebuildStatus;

    #[tokio::test]
    async fn acknowledge_a_completed_rebuild() {
        let acknowledgement = RebuildAcknowledgement::new();
        tokio::spawn({
            let acknowledgement = acknowledgement.clone();
            async move {
                acknowledgement.done(RebuildStatus::Completed);
            }
        });

        let status = acknowledgement.handle().await;
        assert_eq!(RebuildStatus::Completed, status);
    }

    #[tokio::test]
    async fn acknowledge_a_failed_rebuild() {
        let acknowledgement = RebuildAcknowledgement::new();
        tokio::spawn({
            let acknowledgement = acknowledgement.clone();
            async move {
                acknowledgement.done(RebuildStatus::Failed);
            }
        });

        let status = acknowledgement.handle().await;
        assert_eq!(RebuildStatus::Failed, status);
    }
}
