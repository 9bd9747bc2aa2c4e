use runtime::budget::FrameBudget;
use runtime::work_queue::{WorkId, WorkQueueFull};

use crate::gate::{GateKind, GateSet};
use crate::queue::StreamingQueue;
use crate::request::TileRequest;

/// Why a movement-driven submission was not queued.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The addressed subsystem's gate is held by a camera in motion.
    Suppressed(GateKind),
    Full(WorkQueueFull),
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Suppressed(kind) => {
                write!(f, "subsystem {} is gated by a flight", kind.name())
            }
            SubmitError::Full(full) => full.fmt(f),
        }
    }
}

impl std::error::Error for SubmitError {}

/// High-level streaming orchestration: gates + request queue.
///
/// Queue ordering is handled by `runtime::WorkQueue`; the gates decide
/// whether movement-driven work is admitted at all.
#[derive(Debug)]
pub struct Pipeline {
    gates: GateSet,
    queue: StreamingQueue,
}

impl Pipeline {
    pub fn new(max_pending: usize) -> Self {
        Self {
            gates: GateSet::new(),
            queue: StreamingQueue::new(max_pending),
        }
    }

    pub fn gates(&self) -> &GateSet {
        &self.gates
    }

    pub fn gates_mut(&mut self) -> &mut GateSet {
        &mut self.gates
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Submit background work triggered by camera movement.
    ///
    /// Refused while the addressed subsystem's gate is held; the caller is
    /// expected to retry from fresh view state once the flight ends.
    pub fn submit_movement(
        &mut self,
        req: TileRequest,
        priority: i32,
        cost_units: u32,
    ) -> Result<WorkId, SubmitError> {
        if self.gates.gate(req.subsystem).is_held() {
            return Err(SubmitError::Suppressed(req.subsystem));
        }
        self.queue
            .try_submit(priority, cost_units, req)
            .map_err(SubmitError::Full)
    }

    /// Submit work that does not depend on the camera (explicit prefetch,
    /// editor actions). Gates do not apply.
    pub fn submit_explicit(
        &mut self,
        req: TileRequest,
        priority: i32,
        cost_units: u32,
    ) -> Result<WorkId, WorkQueueFull> {
        self.queue.try_submit(priority, cost_units, req)
    }

    /// Cancel a previously submitted request.
    pub fn cancel(&mut self, id: WorkId) -> bool {
        self.queue.cancel(id)
    }

    pub fn pop_next_with_budget(
        &mut self,
        budget: &mut FrameBudget,
    ) -> Option<(WorkId, TileRequest)> {
        self.queue.pop_next_with_budget(budget)
    }
}
