//! Remote transport implementations.
//!
//! The wire protocol to a real remote desktop server lives outside this
//! repository; what ships here is [`dry_run::DryRunRemote`], which accepts
//! every event and logs it, for checking hotkeys and keymaps end to end.

pub mod dry_run;

pub use dry_run::DryRunRemote;
