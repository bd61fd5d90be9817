//! Diorama Core Types and Definitions
//!
//! This crate provides the data model shared by the Diorama presentation and
//! layout engine. It includes:
//!
//! - **Identifiers**: Owned string identifiers for nodes and edges ([`identifier::Id`])
//! - **Geometry**: Points, sizes, and axis-aligned boxes ([`geometry`] module)
//! - **Kinds**: Node categories, default sizes, and edge anchors ([`kind`] module)
//! - **Graph**: Ordered nodes and directed edges ([`graph`] module)
//!
//! Every type here is a plain value. Nothing in this crate mutates a graph in
//! place; operations that change a graph return a new one.

pub mod geometry;
pub mod graph;
pub mod identifier;
pub mod kind;
