mod backend;
mod change;
mod settings_handler;

pub use backend::{FileBackend, MemoryBackend, SettingsBackend};
pub use change::SettingsChange;
pub use settings_handler::{IgnoreSettings, Settings, SettingsFlag, SettingsHandler};
