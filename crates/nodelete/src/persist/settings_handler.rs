use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, error, info};

use super::change::Subscribers;
use crate::{DataPath, Error, FileBackend, IgnoreList, Result, SettingsBackend, SettingsChange, UserId};

const DEFAULT_TIMESTAMPS: bool = false;
const DEFAULT_EW: bool = false;
const DEFAULT_IGNORE_BOTS: bool = false;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct Settings {
    /// Show when a preserved message was deleted or edited.
    #[serde(default = "default_timestamps")]
    pub timestamps: bool,
    /// Alternate format for the edited/deleted timestamp.
    #[serde(default = "default_ew")]
    pub ew: bool,
    #[serde(default)]
    pub ignore: IgnoreSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
pub struct IgnoreSettings {
    #[serde(default = "default_ignore_bots")]
    pub bots: bool,
    #[serde(default)]
    pub users: IgnoreList,
}

fn default_timestamps() -> bool {
    DEFAULT_TIMESTAMPS
}

fn default_ew() -> bool {
    DEFAULT_EW
}

fn default_ignore_bots() -> bool {
    DEFAULT_IGNORE_BOTS
}

impl Default for IgnoreSettings {
    fn default() -> Self {
        Self {
            bots: default_ignore_bots(),
            users: IgnoreList::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timestamps: default_timestamps(),
            ew: default_ew(),
            ignore: IgnoreSettings::default(),
        }
    }
}

/// The boolean switches on the settings surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SettingsFlag {
    Timestamps,
    #[strum(to_string = "ew", serialize = "edited-format")]
    EditedFormat,
    IgnoreBots,
}

impl Settings {
    pub fn flag(&self, flag: SettingsFlag) -> bool {
        match flag {
            SettingsFlag::Timestamps => self.timestamps,
            SettingsFlag::EditedFormat => self.ew,
            SettingsFlag::IgnoreBots => self.ignore.bots,
        }
    }

    fn flag_mut(&mut self, flag: SettingsFlag) -> &mut bool {
        match flag {
            SettingsFlag::Timestamps => &mut self.timestamps,
            SettingsFlag::EditedFormat => &mut self.ew,
            SettingsFlag::IgnoreBots => &mut self.ignore.bots,
        }
    }
}

/// Single source of truth for the plugin settings.
///
/// Every setter writes through the backend before the in-memory copy is
/// replaced, and subscribers only hear about a change once it is stored. A
/// failed write leaves the in-memory settings untouched.
///
/// When stored settings exist but cannot be read, the handler runs on
/// defaults and refuses every write, so the unreadable file is never
/// replaced by defaults.
pub struct SettingsHandler {
    backend: Box<dyn SettingsBackend>,
    current_settings: Settings,
    subscribers: Subscribers,
    read_only: bool,
}

impl SettingsHandler {
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            current_settings: Settings::default(),
            subscribers: Subscribers::default(),
            read_only: false,
        }
    }

    pub fn from_data_path(path: &DataPath) -> Self {
        Self::new(FileBackend::new(path))
    }

    pub fn load(mut self) -> Self {
        match self.backend.load() {
            Ok(Some(settings)) => {
                info!(
                    "loaded settings with {} ignored users",
                    settings.ignore.users.len()
                );
                self.current_settings = settings;
            }
            Ok(None) => {
                info!("no stored settings yet, using defaults");
                self.current_settings = Settings::default();
            }
            Err(err) => {
                error!("Could not read settings ({err}). Using defaults, writes disabled");
                self.current_settings = Settings::default();
                self.read_only = true;
            }
        }

        self
    }

    /// Whether the stored settings were unreadable at load time.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn settings(&self) -> &Settings {
        &self.current_settings
    }

    pub fn subscribe(&mut self) -> Receiver<SettingsChange> {
        self.subscribers.subscribe()
    }

    /// Apply `update_fn` to a copy of the settings and commit it.
    ///
    /// `update_fn` returns the change to announce, or `None` when nothing
    /// changed, in which case nothing is written. Returns whether a change
    /// was committed.
    fn update<F>(&mut self, update_fn: F) -> Result<bool>
    where
        F: FnOnce(&mut Settings) -> Option<SettingsChange>,
    {
        let mut next = self.current_settings.clone();
        let Some(change) = update_fn(&mut next) else {
            return Ok(false);
        };

        if self.read_only {
            return Err(Error::Generic(
                "stored settings could not be read, refusing to overwrite them".to_owned(),
            ));
        }

        self.backend.save(&next)?;
        self.current_settings = next;
        debug!("settings change committed: {:?}", change);
        self.subscribers.notify(&change);

        Ok(true)
    }

    pub fn flag(&self, flag: SettingsFlag) -> bool {
        self.current_settings.flag(flag)
    }

    pub fn set_flag(&mut self, flag: SettingsFlag, value: bool) -> Result<bool> {
        self.update(|settings| {
            let slot = settings.flag_mut(flag);
            if *slot == value {
                return None;
            }

            *slot = value;
            Some(SettingsChange::Flag(flag, value))
        })
    }

    pub fn timestamps(&self) -> bool {
        self.current_settings.timestamps
    }

    pub fn set_timestamps(&mut self, value: bool) -> Result<bool> {
        self.set_flag(SettingsFlag::Timestamps, value)
    }

    pub fn ew(&self) -> bool {
        self.current_settings.ew
    }

    pub fn set_ew(&mut self, value: bool) -> Result<bool> {
        self.set_flag(SettingsFlag::EditedFormat, value)
    }

    pub fn ignore_bots(&self) -> bool {
        self.current_settings.ignore.bots
    }

    pub fn set_ignore_bots(&mut self, value: bool) -> Result<bool> {
        self.set_flag(SettingsFlag::IgnoreBots, value)
    }

    pub fn ignored_users(&self) -> &IgnoreList {
        &self.current_settings.ignore.users
    }

    pub fn is_ignored(&self, id: &UserId) -> bool {
        self.current_settings.ignore.users.contains(id)
    }

    fn update_users<F>(&mut self, mutate: F) -> Result<bool>
    where
        F: FnOnce(&mut IgnoreList) -> bool,
    {
        self.update(|settings| {
            let users = &mut settings.ignore.users;
            if !mutate(users) {
                return None;
            }

            Some(SettingsChange::IgnoredUsers(users.clone()))
        })
    }

    pub fn add_ignored_user(&mut self, id: UserId) -> Result<bool> {
        self.update_users(|users| users.add(id))
    }

    pub fn remove_ignored_user(&mut self, id: &UserId) -> Result<bool> {
        self.update_users(|users| users.remove(id))
    }

    pub fn clear_ignored_users(&mut self) -> Result<bool> {
        self.update_users(IgnoreList::clear)
    }
}
