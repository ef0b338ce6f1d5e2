//! Configuration management for modinv.
//!
//! modinv reads one optional, user-wide file, the global configuration
//! (`~/.modinv/config.toml`). Project state lives in the build list snapshot
//! and the version index, which are data files rather than configuration.
//!
//! # Modules
//!
//! - `global` - loading and locating the global configuration

pub mod global;

pub use global::GlobalConfig;
