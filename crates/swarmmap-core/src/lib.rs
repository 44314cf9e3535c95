//! SwarmMap Core Types and Definitions
//!
//! This crate provides the foundational types shared by the SwarmMap crates:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Topology**: Cluster snapshot records ([`topology`] module)
//! - **Gateway bridges**: Host ownership of bridge networks ([`gwbridge`] module)
//! - **Stroke**: Edge rendering hints ([`stroke::StrokeStyle`])

pub mod geometry;
pub mod gwbridge;
pub mod identifier;
pub mod stroke;
pub mod topology;
