//! Inbound adapters that translate operator input into domain calls.
//!
//! The command-line surface lives under [`cli`]; it only talks to the domain
//! through [`crate::context::ConsoleContext`].

pub mod cli;
