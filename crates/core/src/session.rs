//! Latest-wins coordination between the UI and in-flight gallery queries.

use sitepin_scheduler::{CancellationToken, RequestId, RequestSequence};

/// Pairs each submitted query with a request id and a cancellation token.
///
/// Submitting a new query cancels the previous one's token, and the consumer
/// applies a finished result only while `accept` still holds for its id. The
/// engine itself stays pure; this is the integration-layer guard against a
/// slow, superseded query overwriting a newer result on screen.
#[derive(Debug, Default)]
pub struct QuerySession {
    sequence: RequestSequence,
    active: Option<(RequestId, CancellationToken)>,
}

impl QuerySession {
    pub fn new() -> Self {
        Self { sequence: RequestSequence::new(), active: None }
    }

    /// Register a new query, superseding and cancelling any active one.
    pub fn submit(&mut self) -> (RequestId, CancellationToken) {
        if let Some((_, token)) = &self.active {
            token.cancel();
        }

        let id = self.sequence.begin();
        let token = CancellationToken::new();
        self.active = Some((id, token.clone()));
        (id, token)
    }

    /// Whether a finished query's result may still be applied.
    pub fn accept(&self, id: RequestId) -> bool {
        self.sequence.is_current(id)
    }

    /// Cancel the active query and invalidate every outstanding request.
    /// Called when the selection driving the query is cleared.
    pub fn clear(&mut self) {
        if let Some((_, token)) = self.active.take() {
            token.cancel();
        }
        self.sequence.invalidate();
    }
}
