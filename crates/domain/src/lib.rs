//! # robovac-domain
//!
//! Pure domain model for the robovac vacuum-bridge daemon.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **Robot** (identity fixed at discovery) and its mutable
//!   remote-state snapshot (capability flags, battery, spot settings, …)
//! - Define the explicit **`CleaningState`** derived from capability flags
//! - Define **`BoundaryRegion`s** (named sub-areas that clean independently)
//! - Define **Intents** (control requests: start, stop, go to dock, …)
//! - Define **Events** (representation-update records for the fan-out bus)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod boundary;
pub mod error;
pub mod event;
pub mod id;
pub mod intent;
pub mod robot;
pub mod state;
pub mod time;
