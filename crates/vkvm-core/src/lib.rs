//! # vkvm-core
//!
//! Shared library for vkvm containing the key/button definition registry,
//! remote profiles, the combo tracker, and the pointer coordinate mapper.
//!
//! It has no dependencies on OS APIs, input devices, or network sockets.
//!
//! # Architecture overview (for beginners)
//!
//! vkvm is a software KVM: while a remote profile is active, the local
//! keyboard and mouse are grabbed and every key press, button press and
//! pointer movement is forwarded to a remote desktop session instead.
//! Pressing a profile's hotkey switches to that remote; pressing the active
//! profile's hotkey again ends the program.
//!
//! On the way out, events can be remapped: a profile may say that `Alt_L`
//! on the local keyboard should arrive as `Meta_L` on the remote, or that
//! `Alt_L+Tab` should arrive as `Super_L+Tab`.
//!
//! - **`registry`** – Names ↔ X11 KeySyms and button numbers.
//!
//! - **`domain`** – Descriptor parsing, profile validation, the combo tracker
//!   that performs remapping, and the coordinate mapper.

pub mod domain;
pub mod registry;

// Re-export the most-used types at the crate root so callers can write
// `vkvm_core::ComboTracker` instead of `vkvm_core::domain::combo::ComboTracker`.
pub use domain::combo::ComboTracker;
pub use domain::descriptor::Descriptor;
pub use domain::pointer::{screen_offset, CoordinateMapper, Screen};
pub use domain::profile::{
    load_profiles, ConnectionTarget, Profile, ProfileError, ProfileSpec, RemapRule,
};
pub use registry::{is_modifier, DefinitionRegistry, EventDefinition, RegistryError};
