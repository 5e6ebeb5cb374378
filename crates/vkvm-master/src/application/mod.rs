//! Application layer use cases for the master application.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules) and the infrastructure (OS/network/storage).
//!
//! Use cases in this layer:
//!
//! - **Orchestrate** domain objects to fulfil a user goal (e.g., "send this
//!   key press to whichever remote is active, remapped per its profile").
//! - **Depend on abstractions** (traits) rather than concrete implementations,
//!   so the infrastructure can be swapped without changing this code.
//! - **Contain no OS calls, no network I/O, no file system access**.
//!
//! # Sub-modules
//!
//! - **`route_input`**    – Receives raw input events, runs them through the
//!   active profile's combo tracker and forwards the result.  This runs on
//!   every keystroke and pointer movement.
//!
//! - **`switch_session`** – Owns the active remote session and switches
//!   profiles when a hotkey is pressed.

pub mod route_input;
pub mod switch_session;
