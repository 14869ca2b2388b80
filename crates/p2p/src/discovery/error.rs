//! Discovery errors.

/// An error building the discovery service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryBuilderError {
    /// No listen address was provided.
    #[error("discovery listen address not set")]
    ListenAddressNotSet,
    /// No identity key was provided.
    #[error("discovery identity key not set")]
    KeyNotSet,
    /// The local record could not be assembled.
    #[error("failed to build the local discovery record")]
    EnrBuildFailed,
    /// The discv5 service rejected its configuration.
    #[error("failed to create the discv5 service")]
    Discv5CreationFailed,
}
