//! Result stream consumption.
//!
//! A drain runs until the producers close the stream; that is the only
//! way it ends.

use crate::results::{CollectedState, RequestResult};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

/// A stream of results with a well-defined end.
///
/// `next_result` suspends until a result is available and returns `None`
/// once every producer has closed its side. Any many-producer,
/// single-consumer queue can back a source.
#[async_trait]
pub trait ResultSource: Send {
    async fn next_result(&mut self) -> Option<RequestResult>;
}

#[async_trait]
impl ResultSource for mpsc::Receiver<RequestResult> {
    async fn next_result(&mut self) -> Option<RequestResult> {
        self.recv().await
    }
}

#[async_trait]
impl ResultSource for mpsc::UnboundedReceiver<RequestResult> {
    async fn next_result(&mut self) -> Option<RequestResult> {
        self.recv().await
    }
}

/// Consume `source` until it is closed and return the finalized aggregate.
///
/// Every result is applied exactly once, in arrival order. Draining a
/// source that is already closed and exhausted returns an empty state.
pub async fn drain<S>(source: &mut S) -> CollectedState
where
    S: ResultSource + ?Sized,
{
    let mut state = CollectedState::new();
    debug!("Draining result stream");

    while let Some(result) = source.next_result().await {
        state.record(&result);
    }

    debug!(
        "Result stream closed after {} results ({} successes, {} failures)",
        state.total(),
        state.success_count(),
        state.failure_count()
    );
    state
}
