pub(crate) mod acknowledgement;
pub(crate) mod pool;

/// RebuildStatus is the terminal state of a background rebuild task.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum RebuildStatus {
    Pending,
    Completed,
    Failed,
}
