//! Typed client and console for the EdTech Solutions training centre.
//!
//! Persistence, authentication and storage live on the hosted backend. This
//! crate wraps them behind ports in [`domain::ports`], implements those ports
//! over HTTPS in [`outbound::remote`], and exposes the use cases to operators
//! through [`inbound::cli`].

pub mod config;
pub mod context;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod provisioning;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
