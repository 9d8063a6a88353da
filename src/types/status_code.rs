use thiserror::Error;

/// How a run that did not fail came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecStatus {
    Running,
    Stopped,
    Returned,
    Reverted,
}

/// Fatal conditions that abort an invocation.
///
/// The `Display` text of each variant is the exact ASCII payload handed back
/// to the host as the failure output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FailStatus {
    #[error("invalid op")]
    InvalidOpcode,
    #[error("invalid jump")]
    BadJumpDestination,
    #[error("stack underflow")]
    StackUnderflow,
    #[error("stack overflow")]
    StackOverflow,
    #[error("bad return")]
    BadReturnBounds,
    #[error("bad memory access")]
    InvalidMemoryAccess,
}

impl FailStatus {
    /// The reason bytes reported to the host.
    pub fn reason_bytes(self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use crate::types::FailStatus;

    #[test]
    fn reason_bytes_are_stable() {
        assert_eq!(FailStatus::InvalidOpcode.reason_bytes(), b"invalid op");
        assert_eq!(FailStatus::BadJumpDestination.reason_bytes(), b"invalid jump");
        assert_eq!(FailStatus::StackUnderflow.reason_bytes(), b"stack underflow");
        assert_eq!(FailStatus::StackOverflow.reason_bytes(), b"stack overflow");
        assert_eq!(FailStatus::BadReturnBounds.reason_bytes(), b"bad return");
        assert_eq!(
            FailStatus::InvalidMemoryAccess.reason_bytes(),
            b"bad memory access"
        );
    }
}
