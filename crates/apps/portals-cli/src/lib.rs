//! Portals command-line client.
//!
//! Looks APIs up in the on-chain registry and calls them through
//! [`portals_x402::PortalsClient`], rendering results as text or JSON.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod output;
