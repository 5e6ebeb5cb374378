//! Domain logic for vkvm.
//!
//! Everything here is pure: no sockets, no input grabbing, no clocks.  The
//! master crate feeds raw transitions in and transmits whatever comes out.
//!
//! # What lives where (for beginners)
//!
//! - [`descriptor`] parses the `Alt_L+Tab` strings found in configuration.
//! - [`profile`] validates a remote profile and compiles its remap rules.
//! - [`combo`] is the state machine that turns one key/button transition into
//!   the sequence of transitions to send to the remote.
//! - [`pointer`] turns recentered local pointer samples into a bounded remote
//!   pointer position.

pub mod combo;
pub mod descriptor;
pub mod pointer;
pub mod profile;
