//! Completion handles for caller-owned asynchronous work.
//!
//! The machine hands a handle to the refresh / load-more callback. The caller settles it exactly
//! once, either from inside the callback or later (possibly from another thread). Settling
//! consumes the handle, so a second settlement cannot be expressed. The outcome travels back
//! through a channel and is applied the next time the machine is polled.

use std::sync::mpsc::Sender;

/// Identifies one issued refresh or load-more request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    RefreshSucceeded,
    RefreshFailed,
    LoadedMore,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Settlement {
    pub(crate) request: RequestId,
    pub(crate) outcome: Outcome,
}

#[derive(Debug)]
struct Settler {
    request: RequestId,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    kind: &'static str,
    tx: Sender<Settlement>,
    settled: bool,
}

impl Settler {
    fn settle(&mut self, outcome: Outcome) {
        self.settled = true;
        if self
            .tx
            .send(Settlement {
                request: self.request,
                outcome,
            })
            .is_err()
        {
            ptrace!(
                request = self.request.0,
                kind = self.kind,
                "settlement after the machine was dropped"
            );
        }
    }
}

impl Drop for Settler {
    fn drop(&mut self) {
        if !self.settled {
            pwarn!(
                request = self.request.0,
                kind = self.kind,
                "completion handle dropped without settling; the request stays in flight"
            );
        }
    }
}

/// Passed to the refresh callback. Call [`success`](Self::success) or
/// [`failure`](Self::failure) once the refresh is over.
#[derive(Debug)]
pub struct RefreshCompletion {
    inner: Settler,
}

impl RefreshCompletion {
    pub(crate) fn new(request: RequestId, tx: Sender<Settlement>) -> Self {
        Self {
            inner: Settler {
                request,
                kind: "refresh",
                tx,
                settled: false,
            },
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.inner.request
    }

    /// Shows the "refreshed" confirmation, then reverts to idle after the hold delay.
    pub fn success(mut self) {
        self.inner.settle(Outcome::RefreshSucceeded);
    }

    /// Reverts the list to idle without a confirmation.
    pub fn failure(mut self) {
        self.inner.settle(Outcome::RefreshFailed);
    }
}

/// Passed to the load-more callback. Call [`done`](Self::done) once the page is appended.
#[derive(Debug)]
pub struct LoadMoreCompletion {
    inner: Settler,
}

impl LoadMoreCompletion {
    pub(crate) fn new(request: RequestId, tx: Sender<Settlement>) -> Self {
        Self {
            inner: Settler {
                request,
                kind: "load_more",
                tx,
                settled: false,
            },
        }
    }

    pub fn request_id(&self) -> RequestId {
        self.inner.request
    }

    pub fn done(mut self) {
        self.inner.settle(Outcome::LoadedMore);
    }
}
