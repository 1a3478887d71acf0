//! Errors raised by the estimation aggregate.

use crate::id::TaskId;

/// Result alias for aggregate operations.
pub type Result<T> = std::result::Result<T, EstimationError>;

/// Failures of operations that target a task by identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EstimationError {
    /// No task with this identifier
    #[error("task '{0}' not found")]
    TaskNotFound(TaskId),

    /// A task with this identifier is already present
    #[error("task '{0}' already exists")]
    DuplicateTask(TaskId),

    /// Destination of a move falls outside the ordering
    #[error("cannot move task '{id}' from position {from} by {offset}: ordering has {len} tasks")]
    MoveOutOfBounds {
        /// Task being moved
        id: TaskId,
        /// Current position
        from: usize,
        /// Requested offset
        offset: isize,
        /// Ordering length
        len: usize,
    },
}
