//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types with the derived figures screens show
//! - `wire.rs` — Raw serde structs matching backend responses
//! - `convert.rs` — `From` conversions from wire to domain
//! - `state.rs` — View-state machines and forms, free of I/O
//! - `client.rs` — Sub-client with HTTP methods driving the state machines

pub mod aim;
pub mod kyc;
pub mod profile;
pub mod scheme;
pub mod wallet;
