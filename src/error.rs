use std::fmt;

/// Registry lookup and schema validation error
///
/// Lookup failures always carry the valid alternatives so callers can show
/// the user what they could have asked for instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The requested service is not registered
    NodeNotFound {
        /// Service identifier as requested
        node: String,
        /// Registered service identifiers
        available: Vec<String>,
    },
    /// The service exists but has no operation matching the request
    OperationNotFound {
        /// Service identifier
        node: String,
        /// Operation code or display name as requested
        operation: String,
        /// Registered operation codes of the service
        available: Vec<String>,
    },
    /// A schema handed to the registry violates a structural invariant
    InvalidSchema {
        /// Where the violation was found, e.g. `gmail/message/send/to`
        location: String,
        /// What is wrong
        message: String,
    },
}

impl RegistryError {
    /// Valid alternatives for a failed lookup (empty for schema errors)
    pub fn available(&self) -> &[String] {
        match self {
            RegistryError::NodeNotFound { available, .. }
            | RegistryError::OperationNotFound { available, .. } => available,
            RegistryError::InvalidSchema { .. } => &[],
        }
    }

    pub(crate) fn invalid(location: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::InvalidSchema {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NodeNotFound { node, available } => {
                write!(
                    f,
                    "Node '{}' not found. Available nodes: {}",
                    node,
                    available.join(", ")
                )
            }
            RegistryError::OperationNotFound {
                node,
                operation,
                available,
            } => {
                write!(
                    f,
                    "Operation '{}' not found for node '{}'. Available operations: {}",
                    operation,
                    node,
                    available.join(", ")
                )
            }
            RegistryError::InvalidSchema { location, message } => {
                write!(f, "Invalid schema at {}: {}", location, message)
            }
        }
    }
}

impl std::error::Error for RegistryError {}
