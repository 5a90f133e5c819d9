//! Shared test utilities for the openspec-mcp workspace.
//!
//! This crate provides fixtures for exercising the server without a real
//! OpenSpec installation. It is a dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`fake`] - [`FakeOpenSpec`], a scriptable stand-in for the `openspec` CLI
//! - [`project`] - [`TestProject`], a temporary project directory

pub mod fake;
pub mod project;

pub use fake::FakeOpenSpec;
pub use project::TestProject;
