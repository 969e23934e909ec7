//! Snapshot services: pipeline, persistence and delivery.

pub mod delivery;
pub mod snapshot;
pub mod snapshot_store;
