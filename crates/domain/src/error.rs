//! Common error types used across the workspace.
//!
//! Each layer defines typed errors and converts with `#[from]`/`#[source]`.
//! Gateway implementations raise [`GatewayError`]; the application core
//! wraps those in [`RobovacError`] with enough context to log and to answer
//! the caller of a control request. Nothing here is ever fatal to the
//! process: every failure path degrades to "drop the intent, keep serving
//! the cached snapshot".

use crate::id::{BoundaryId, Serial};

/// Failure raised by a robot-gateway implementation.
///
/// The gateway is an opaque RPC boundary; these variants are deliberately
/// coarse and carry only what is useful in a log line.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The cloud rejected the account credentials.
    #[error("cloud rejected the credentials")]
    Unauthorized,
    /// The robot is offline or the cloud could not reach it.
    #[error("robot is offline or unreachable")]
    Unreachable,
    /// The cloud refused a command (wrong state, unsupported, …).
    #[error("cloud rejected the command: {0}")]
    Rejected(String),
    /// Network-level failure talking to the cloud.
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Domain invariant violations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("serial must not be empty")]
    EmptySerial,
}

/// Top-level error for the robovac core.
#[derive(Debug, thiserror::Error)]
pub enum RobovacError {
    /// Login to the device cloud failed. Discovery yields zero robots and
    /// the process keeps running.
    #[error("authentication with the robot cloud failed")]
    Auth(#[source] GatewayError),

    /// A per-robot map or boundary fetch failed during discovery. The robot
    /// proceeds with whatever boundaries were obtained before the failure.
    #[error("discovery failed for robot {}", .serial.masked())]
    Discovery {
        serial: Serial,
        #[source]
        source: GatewayError,
    },

    /// A control action failed remotely. Surfaced to the immediate caller,
    /// never retried.
    #[error("remote operation `{operation}` failed for robot {}", .serial.masked())]
    RemoteOperation {
        serial: Serial,
        operation: &'static str,
        #[source]
        source: GatewayError,
    },

    /// A control request addressed a robot the registry does not own.
    #[error("unknown robot {}", .0.masked())]
    UnknownRobot(Serial),

    /// A control request addressed a region the robot does not own.
    #[error("unknown region {0}")]
    UnknownRegion(BoundaryId),

    /// Invariant violation while building domain values.
    #[error("validation error")]
    Validation(#[from] ValidationError),
}
