use std::{cell::RefCell, io, rc::Rc};

use tracing::info;

use crate::{storage, DataPath, DataPathType, Directory, Error, Result, Settings};

const SETTINGS_FILE: &str = "nodelete.json";

/// Durable key-value substrate behind [`crate::SettingsHandler`].
pub trait SettingsBackend {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<Settings>>;

    fn save(&mut self, settings: &Settings) -> Result<()>;
}

/// Settings stored as a json document in the settings data directory.
pub struct FileBackend {
    directory: Directory,
    file_name: String,
}

impl FileBackend {
    pub fn new(path: &DataPath) -> Self {
        Self {
            directory: Directory::new(path.path(DataPathType::Setting)),
            file_name: SETTINGS_FILE.to_owned(),
        }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }
}

impl SettingsBackend for FileBackend {
    fn load(&self) -> Result<Option<Settings>> {
        let contents = match self.directory.get_file(&self.file_name) {
            Ok(contents) => contents,
            Err(Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err),
        };

        Ok(Some(serde_json::from_str::<Settings>(&contents)?))
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        let serialized = serde_json::to_string(settings)?;
        storage::write_file(&self.directory.file_path, &self.file_name, &serialized)?;
        info!("wrote settings {}", serialized);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryState {
    stored: Option<Settings>,
    fail_writes: bool,
    writes: usize,
}

/// In-process backend. Clones share the same storage, which lets a caller
/// keep a handle for inspection after giving one to a handler.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        let backend = Self::default();
        backend.state.borrow_mut().stored = Some(settings);
        backend
    }

    pub fn stored(&self) -> Option<Settings> {
        self.state.borrow().stored.clone()
    }

    /// Number of successful saves so far.
    pub fn writes(&self) -> usize {
        self.state.borrow().writes
    }

    /// Make subsequent saves fail with an io error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.borrow_mut().fail_writes = fail;
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Settings>> {
        Ok(self.state.borrow().stored.clone())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_writes {
            return Err(Error::Io(io::Error::other(
                "memory backend is refusing writes",
            )));
        }

        state.stored = Some(settings.clone());
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserId;
    use pretty_assertions::assert_eq;

    #[test]
    fn file_backend_missing_file_is_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = FileBackend::new(&DataPath::new(tmp.path()));
        assert!(backend.load().unwrap().is_none());
    }

    #[test]
    fn file_backend_save_then_load() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut backend = FileBackend::new(&DataPath::new(tmp.path()));

        let mut settings = Settings::default();
        settings.ew = true;
        settings.ignore.users.add(UserId::from("42"));
        backend.save(&settings).unwrap();

        assert_eq!(backend.load().unwrap(), Some(settings));
    }

    #[test]
    fn file_backend_reports_bad_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let backend = FileBackend::new(&DataPath::new(tmp.path()));
        storage::write_file(&backend.directory().file_path, SETTINGS_FILE, "{not json").unwrap();

        assert!(matches!(backend.load(), Err(Error::Json(_))));
    }

    #[test]
    fn memory_backend_refuses_writes_when_told() {
        let backend = MemoryBackend::new();
        let mut handle = backend.clone();

        backend.set_fail_writes(true);
        assert!(handle.save(&Settings::default()).is_err());
        assert_eq!(backend.writes(), 0);
        assert!(backend.stored().is_none());

        backend.set_fail_writes(false);
        assert!(handle.save(&Settings::default()).is_ok());
        assert_eq!(backend.writes(), 1);
        assert_eq!(backend.stored(), Some(Settings::default()));
    }
}
