//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **remote**: the hosted backend's REST, auth and storage services.
//!
//! Adapters translate between wire rows and domain types. They contain no
//! business logic.

pub mod remote;
