//! Hosted backend adapters.
//!
//! This module provides a reqwest client for the backend's REST, auth and
//! storage services plus thin implementations of the domain ports on top of
//! it.

mod auth;
mod catalogue;
mod client;
mod commands;
mod dashboard;
mod dto;
mod error;
mod profiles;
mod query;
mod storage;

pub use auth::RemoteAuth;
pub use catalogue::RemoteCatalogue;
pub use client::{RemoteClient, RemoteClientConfig};
pub use commands::RemoteCommands;
pub use dashboard::RemoteDashboardStats;
pub use error::{NO_ROWS_CODE, RemoteError};
pub use profiles::RemoteProfiles;
pub use query::{Direction, TableQuery};
pub use storage::RemoteStorage;
