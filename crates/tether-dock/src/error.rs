use crate::dockable::DockState;
use crate::host::HostError;
use crate::tree::NodeId;

/// Error types for docking management operations.
///
/// The event entry points never fail; these only come out of explicit calls
/// such as [`DockingContext::tear_out`](crate::DockingContext::tear_out).
#[derive(Debug, Clone, PartialEq)]
pub enum DockError {
    /// Node not found in tree.
    NodeNotFound(NodeId),
    /// Node is not a registered dockable.
    NotADockable(NodeId),
    /// Another dockable is already being dragged.
    DragInProgress(NodeId),
    /// The dockable's current state does not allow the operation.
    InvalidState { node: NodeId, state: DockState },
    /// The dockable does not own a top-level window.
    NoWindow(NodeId),
    /// The windowing host refused the request.
    Host(HostError),
}

impl std::fmt::Display for DockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DockError::NodeNotFound(id) => write!(f, "Node {:?} not found", id),
            DockError::NotADockable(id) => write!(f, "Node {:?} is not a dockable", id),
            DockError::DragInProgress(id) => write!(f, "Dockable {:?} is already being dragged", id),
            DockError::InvalidState { node, state } => {
                write!(f, "Dockable {:?} cannot do that while {}", node, state)
            }
            DockError::NoWindow(id) => write!(f, "Dockable {:?} has no window", id),
            DockError::Host(err) => write!(f, "Host error: {}", err),
        }
    }
}

impl std::error::Error for DockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DockError::Host(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HostError> for DockError {
    fn from(err: HostError) -> Self {
        DockError::Host(err)
    }
}

/// Result type for dock operations.
pub type DockResult<T> = Result<T, DockError>;
