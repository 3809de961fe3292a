use thiserror::Error;

/// A hook asked to abort the traversal.
///
/// No further hooks run once a hook returns an error; the walk returns
/// through every enclosing routine without calling their exit hooks.
#[derive(Debug, Error)]
pub enum TraverseError {
    #[error("visitor failed: {0}")]
    Visitor(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("{0}")]
    Message(String),
}

impl TraverseError {
    /// Wrap an error raised by visitor code.
    pub fn visitor(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Visitor(Box::new(error))
    }

    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

/// Result of every hook and walk routine.
pub type TraverseResult = Result<(), TraverseError>;
