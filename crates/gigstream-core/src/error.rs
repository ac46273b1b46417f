use std::fmt;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    ContractNotConfigured,
    RpcTransport,
    RpcRejected,
    ObjectNotFound,
    MissingContent,
    DiscoveryFailed,
    ProfileNotFound,
    InvalidInput,
    SubmissionFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::ContractNotConfigured => "E1002",
            Self::RpcTransport => "E2001",
            Self::RpcRejected => "E2002",
            Self::ObjectNotFound => "E3001",
            Self::MissingContent => "E3002",
            Self::DiscoveryFailed => "E3003",
            Self::ProfileNotFound => "E3004",
            Self::InvalidInput => "E4001",
            Self::SubmissionFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::ContractNotConfigured => "Contract identifiers not configured",
            Self::RpcTransport => "Ledger RPC transport failure",
            Self::RpcRejected => "Ledger RPC rejected the request",
            Self::ObjectNotFound => "Ledger object not found",
            Self::MissingContent => "Ledger object has no move content",
            Self::DiscoveryFailed => "Failed to load job listings from blockchain",
            Self::ProfileNotFound => "Profile not found",
            Self::InvalidInput => "Invalid input",
            Self::SubmissionFailed => "Transaction submission failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in gigstream.toml and retry."),
            Self::ContractNotConfigured => Some(
                "Set contract.package_id and contract.platform_object_id in gigstream.toml.",
            ),
            Self::RpcTransport => Some("Check network.rpc_url and your connectivity, then retry."),
            Self::RpcRejected => Some("Verify the package id and event/object identifiers."),
            Self::ObjectNotFound => None,
            Self::MissingContent => Some("Only move objects carry decodable fields."),
            Self::DiscoveryFailed => Some("Retry the refresh; the event query failed as a whole."),
            Self::ProfileNotFound => Some("Create the profile first with `gs tx client-profile`."),
            Self::InvalidInput => Some("Fill in all required fields and retry."),
            Self::SubmissionFailed => Some("Inspect the wallet error and resubmit."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised by a [`crate::ledger::LedgerQuery`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The request never produced a usable response.
    #[error("ledger transport error calling {method}: {details}")]
    Transport { method: String, details: String },

    /// The node answered with a JSON-RPC error object.
    #[error("ledger rejected {method} (code {code}): {message}")]
    Rpc {
        method: String,
        code: i64,
        message: String,
    },

    /// The response did not have the expected shape.
    #[error("malformed ledger response for {method}: {details}")]
    Malformed { method: String, details: String },

    /// The object id does not resolve to a live object.
    #[error("object {object_id} not found: {reason}")]
    ObjectNotFound { object_id: String, reason: String },

    /// The object exists but carries no move struct fields.
    #[error("object {object_id} has no move content")]
    MissingContent { object_id: String },
}

impl LedgerError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Transport { .. } => ErrorCode::RpcTransport,
            Self::Rpc { .. } | Self::Malformed { .. } => ErrorCode::RpcRejected,
            Self::ObjectNotFound { .. } => ErrorCode::ObjectNotFound,
            Self::MissingContent { .. } => ErrorCode::MissingContent,
        }
    }

    /// Transport errors are the only ones worth retrying.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Whole-operation failures of the projection builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    /// The event query used for enumeration failed.
    #[error("failed to discover {event_type} events: {source}")]
    Discovery {
        event_type: String,
        #[source]
        source: LedgerError,
    },
}

impl ProjectionError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Discovery { .. } => ErrorCode::DiscoveryFailed,
        }
    }
}
