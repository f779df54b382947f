//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL procedure gateway and credential store on
//!   Diesel.
//!
//! Adapters translate between domain types and store representations and
//! contain no business logic.

pub mod persistence;
