use runtime::budget::FrameBudget;
use runtime::work_queue::{WorkId, WorkQueue, WorkQueueFull};

use crate::request::TileRequest;

/// Streaming work queue with deterministic ordering and backpressure.
///
/// A thin wrapper over `runtime::WorkQueue` so streaming can own its
/// scheduling policy without duplicating queue logic.
#[derive(Debug)]
pub struct StreamingQueue {
    inner: WorkQueue<TileRequest>,
}

impl StreamingQueue {
    pub fn new(max_pending: usize) -> Self {
        Self {
            inner: WorkQueue::with_max_len(max_pending),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn try_submit(
        &mut self,
        priority: i32,
        cost_units: u32,
        req: TileRequest,
    ) -> Result<WorkId, WorkQueueFull> {
        self.inner.try_push_with_cost(priority, cost_units, req)
    }

    pub fn cancel(&mut self, id: WorkId) -> bool {
        self.inner.cancel(id)
    }

    pub fn pop_next_with_budget(
        &mut self,
        budget: &mut FrameBudget,
    ) -> Option<(WorkId, TileRequest)> {
        let (id, _priority, req) = self.inner.pop_next_with_budget(budget)?;
        Some((id, req))
    }
}
