//! # robovac-app
//!
//! Application core — state synchronization, action sequencing, and
//! **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound
//!   ports): [`ports::RobotGateway`] (the opaque device cloud) and
//!   [`ports::EventPublisher`] (the fan-out bus).
//! - Provide the core components:
//!   - [`cache::StateCache`] — debounced remote-state refresh
//!   - [`scheduler::RefreshScheduler`] — periodic refresh policy & timers
//!   - [`sequencer::ActionSequencer`] — one intent → one remote operation
//!   - [`room_queue::RoomQueue`] — deferred "clean this room next" slot
//!   - [`registry::Registry`] — robots and their representations
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//! - Wire them per cycle in [`engine::Engine`] and bootstrap through
//!   [`discovery`]
//!
//! ## Dependency rule
//! Depends on `robovac-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the
//! reverse.

pub mod cache;
pub mod discovery;
pub mod engine;
pub mod event_bus;
pub mod ports;
pub mod registry;
pub mod representation;
pub mod room_queue;
pub mod scheduler;
pub mod sequencer;

#[cfg(test)]
pub(crate) mod testing;
