//! Ignore-list settings for the nodelete chat plugin.
//!
//! The store ([`SettingsHandler`]) owns the persisted flags and the ordered,
//! duplicate-free [`IgnoreList`]. The settings surface
//! ([`IgnoreSettingsView`]) mirrors the list, resolves each entry against the
//! host's identity cache and gates clearing the list behind a confirmation.

mod error;
mod gate;
mod ignore_list;
pub mod labels;
mod opener;
mod persist;
mod resolve;
pub mod storage;
mod user;
mod view;

pub use error::{Error, Result};
pub use gate::{ClearGate, ConfirmationRequest, GateOutcome, GateState};
pub use ignore_list::IgnoreList;
pub use opener::{FetchingProfile, Navigator, OpenOutcome, ProfileFetcher, ProfileOpener};
pub use persist::{
    FileBackend, IgnoreSettings, MemoryBackend, Settings, SettingsBackend, SettingsChange,
    SettingsFlag, SettingsHandler,
};
pub use resolve::{
    discriminator_suffix, resolve, resolve_all, static_avatar_url, DisplayRecord, ProfileCache,
    ResolvedList, FALLBACK_AVATAR_URL, NO_DISCRIMINATOR, RESOLVE_HINT,
};
pub use storage::{DataPath, DataPathType, Directory};
pub use user::{Profile, UserId};
pub use view::{ActionResponse, Host, IgnoreSettingsAction, IgnoreSettingsView, Row, Section};
