//! Infrastructure layer for the master application.
//!
//! Contains the adapters at the edges: input sources, remote transports, and
//! file-system configuration storage.
//!
//! **Dependency rule**: this layer may depend on `application` and `vkvm_core`,
//! but MUST NOT be imported by the domain layer.

pub mod input_capture;
pub mod remote;
pub mod storage;
