use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use nodelete::{
    resolve, Error, FetchingProfile, Navigator, Profile, ProfileCache, ProfileFetcher, Result,
    UserId,
};
use poll_promise::Promise;

/// Read a json array of profiles, as exported by the host's identity cache.
pub fn load_profiles(path: &Path) -> Result<HashMap<UserId, Profile>> {
    let contents = fs::read_to_string(path)?;
    let profiles: Vec<Profile> = serde_json::from_str(&contents)?;

    Ok(profiles
        .into_iter()
        .map(|profile| (profile.id.clone(), profile))
        .collect())
}

/// Snapshot of the profile export taken at startup.
#[derive(Default)]
pub struct ProfileFile {
    path: Option<PathBuf>,
    cached: HashMap<UserId, Profile>,
}

impl ProfileFile {
    pub fn open(path: Option<PathBuf>) -> Self {
        let cached = match path.as_deref().map(load_profiles) {
            Some(Ok(cached)) => cached,
            Some(Err(err)) => {
                tracing::error!("could not read profile cache: {err}");
                HashMap::new()
            }
            None => HashMap::new(),
        };

        Self { path, cached }
    }
}

impl ProfileCache for ProfileFile {
    fn lookup_cached(&self, id: &UserId) -> Option<Profile> {
        self.cached.lookup_cached(id)
    }
}

impl ProfileFetcher for ProfileFile {
    /// Re-reads the export on a worker thread, picking up profiles the host
    /// wrote after startup.
    fn fetch_profile(&self, id: &UserId) -> FetchingProfile {
        let Some(path) = self.path.clone() else {
            return Promise::from_ready(Err(Error::Generic(
                "no profile cache configured".to_owned(),
            )));
        };

        let id = id.clone();
        Promise::spawn_thread("fetch_profile", move || {
            load_profiles(&path)?
                .remove(&id)
                .ok_or_else(|| Error::Generic(format!("unknown user {id}")))
        })
    }
}

impl ProfileFile {
    /// Look in the startup snapshot first, then in the export as it is now.
    pub fn lookup_fresh(&self, id: &UserId) -> Option<Profile> {
        self.lookup_cached(id).or_else(|| {
            let path = self.path.as_deref()?;
            load_profiles(path).ok()?.remove(id)
        })
    }
}

/// Shows a profile by printing it.
pub struct PrintNavigator<'a> {
    pub profiles: &'a ProfileFile,
    pub shown: usize,
}

impl Navigator for PrintNavigator<'_> {
    fn show_profile(&mut self, id: &UserId) {
        let mut fresh = HashMap::new();
        if let Some(profile) = self.profiles.lookup_fresh(id) {
            fresh.insert(id.clone(), profile);
        }

        let record = resolve(id, &fresh);
        println!("{} ({})", record.display_name, record.id);
        println!("  avatar: {}", record.avatar_url);
        self.shown += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_profiles(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("profiles.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn loads_profiles_with_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_profiles(
            tmp.path(),
            r#"[{"id":"1","username":"alice"},{"id":"2","username":"bob","discriminator":"42","avatar_url":"x.gif"}]"#,
        );

        let profiles = load_profiles(&path).unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[&UserId::from("1")].discriminator, "0");
        assert_eq!(profiles[&UserId::from("2")].avatar_url, "x.gif");
    }

    #[test]
    fn fetch_picks_up_later_writes() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = write_profiles(tmp.path(), "[]");
        let file = ProfileFile::open(Some(path.clone()));
        assert!(file.lookup_cached(&"7".into()).is_none());

        write_profiles(tmp.path(), r#"[{"id":"7","username":"late"}]"#);
        let fetched = file.fetch_profile(&"7".into()).block_and_take().unwrap();
        assert_eq!(fetched.username, "late");
    }

    #[test]
    fn fetch_without_file_fails() {
        let file = ProfileFile::open(None);
        assert!(file.fetch_profile(&"7".into()).block_and_take().is_err());
    }
}
