//! Security utilities for credential handling.
//!
//! # Security Guarantees
//! - Passwords are held in `Zeroizing` containers for automatic memory clearing
//! - Passwords are never accepted on the command line or written to logs
//! - Terminal prompting is isolated behind `CredentialProvider`
//!
//! # Module Structure
//! - `credentials`: provider trait, terminal prompt and fixed-secret providers

mod credentials;

pub use credentials::{CredentialProvider, PromptCredentials, StaticCredentials};
