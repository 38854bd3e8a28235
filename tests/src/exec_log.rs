use crate::TransportOp;

use std::sync::{Arc, Mutex};

/// Read access to a [`MemoryTransport`](crate::MemoryTransport)'s
/// operation log.
pub struct ExecLog {
    ops: Arc<Mutex<Vec<TransportOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<TransportOp>>>) -> Self {
        Self { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&TransportOp) -> bool,
    {
        self.ops.lock().unwrap().iter().filter(|op| predicate(op)).count()
    }

    pub fn reads(&self) -> usize {
        self.count(|op| matches!(op, TransportOp::Read { .. }))
    }

    /// Snapshot of every logged operation, oldest first.
    pub fn ops(&self) -> Vec<TransportOp> {
        self.ops.lock().unwrap().clone()
    }

    /// The most recent operation.
    #[track_caller]
    pub fn last(&self) -> TransportOp {
        self.ops
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no operations logged")
    }

    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }
}
