use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Profile, UserId};

/// Avatar shown for users the identity cache does not know about.
pub const FALLBACK_AVATAR_URL: &str = "https://cdn.discordapp.com/embed/avatars/1.png?size=48";

/// Appended to the first unresolved row of a render pass.
pub const RESOLVE_HINT: &str = ", press the avatar";

/// Discriminator of accounts on the unique-username scheme. Never shown.
pub const NO_DISCRIMINATOR: &str = "0";

static ANIMATED_EXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.(gif|webp)").expect("animated extension regex"));

/// Read-only view of the host's identity cache.
pub trait ProfileCache {
    fn lookup_cached(&self, id: &UserId) -> Option<Profile>;
}

impl ProfileCache for HashMap<UserId, Profile> {
    fn lookup_cached(&self, id: &UserId) -> Option<Profile> {
        self.get(id).cloned()
    }
}

/// Render-time presentation of an ignored user. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRecord {
    pub id: UserId,
    /// Full row label: username, the resolve hint if any, then the
    /// discriminator suffix.
    pub display_name: String,
    /// `#1234`, or `None` for the unique-username scheme.
    pub discriminator_suffix: Option<String>,
    pub avatar_url: String,
    /// `false` when the record is a synthesized fallback.
    pub resolved: bool,
}

impl DisplayRecord {
    fn from_profile(id: &UserId, profile: Profile) -> Self {
        // a cached profile without an avatar still counts as resolved
        let avatar_url = if profile.avatar_url.is_empty() {
            FALLBACK_AVATAR_URL.to_owned()
        } else {
            static_avatar_url(&profile.avatar_url)
        };

        Self::build(
            id.clone(),
            profile.username,
            &profile.discriminator,
            avatar_url,
            true,
        )
    }

    fn fallback(id: &UserId, with_hint: bool) -> Self {
        let mut username = format!("{id} Uncached");
        if with_hint {
            username.push_str(RESOLVE_HINT);
        }

        Self::build(
            id.clone(),
            username,
            NO_DISCRIMINATOR,
            FALLBACK_AVATAR_URL.to_owned(),
            false,
        )
    }

    fn build(
        id: UserId,
        username: String,
        discriminator: &str,
        avatar_url: String,
        resolved: bool,
    ) -> Self {
        let discriminator_suffix = discriminator_suffix(discriminator);
        let display_name = match &discriminator_suffix {
            Some(suffix) => format!("{username}{suffix}"),
            None => username,
        };

        Self {
            id,
            display_name,
            discriminator_suffix,
            avatar_url,
            resolved,
        }
    }
}

/// `None` for the unique-username scheme, where the discriminator is `"0"`
/// or missing.
pub fn discriminator_suffix(discriminator: &str) -> Option<String> {
    if discriminator.is_empty() || discriminator == NO_DISCRIMINATOR {
        None
    } else {
        Some(format!("#{discriminator}"))
    }
}

/// Swap the first animated image extension for `.png`.
pub fn static_avatar_url(url: &str) -> String {
    ANIMATED_EXT.replace(url, ".png").into_owned()
}

/// Resolve a single id without taking part in a render pass, so no hint.
pub fn resolve(id: &UserId, cache: &dyn ProfileCache) -> DisplayRecord {
    match cache.lookup_cached(id) {
        Some(profile) => DisplayRecord::from_profile(id, profile),
        None => DisplayRecord::fallback(id, false),
    }
}

/// The outcome of resolving a whole list in one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedList {
    pub records: Vec<DisplayRecord>,
    /// Whether some record carries the resolve hint.
    pub hint_assigned: bool,
}

/// Resolve every id in list order. Only the first unresolved id gets the
/// resolve hint.
pub fn resolve_all<'a, I>(ids: I, cache: &dyn ProfileCache) -> ResolvedList
where
    I: IntoIterator<Item = &'a UserId>,
{
    ids.into_iter()
        .fold(ResolvedList::default(), |mut acc, id| {
            let record = match cache.lookup_cached(id) {
                Some(profile) => DisplayRecord::from_profile(id, profile),
                None => {
                    let with_hint = !acc.hint_assigned;
                    acc.hint_assigned = true;
                    DisplayRecord::fallback(id, with_hint)
                }
            };

            acc.records.push(record);
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cache() -> HashMap<UserId, Profile> {
        let mut cache = HashMap::new();
        for profile in [
            Profile::new(
                "1",
                "alice",
                "0",
                "https://cdn.example/avatars/1/a_abc.gif?size=26",
            ),
            Profile::new("2", "bob", "1234", "https://cdn.example/avatars/2/def.png"),
            Profile::new("3", "carol", "0", ""),
        ] {
            cache.insert(profile.id.clone(), profile);
        }
        cache
    }

    fn ids(ids: &[&str]) -> Vec<UserId> {
        ids.iter().map(|id| UserId::from(*id)).collect()
    }

    #[test]
    fn cached_user_without_discriminator() {
        let record = resolve(&"1".into(), &cache());
        assert!(record.resolved);
        assert_eq!(record.display_name, "alice");
        assert_eq!(record.discriminator_suffix, None);
        assert_eq!(
            record.avatar_url,
            "https://cdn.example/avatars/1/a_abc.png?size=26"
        );
    }

    #[test]
    fn cached_user_with_discriminator() {
        let record = resolve(&"2".into(), &cache());
        assert!(record.resolved);
        assert_eq!(record.display_name, "bob#1234");
        assert_eq!(record.discriminator_suffix.as_deref(), Some("#1234"));
        assert_eq!(record.avatar_url, "https://cdn.example/avatars/2/def.png");
    }

    #[test]
    fn cached_user_without_avatar_keeps_resolved() {
        let record = resolve(&"3".into(), &cache());
        assert!(record.resolved);
        assert_eq!(record.avatar_url, FALLBACK_AVATAR_URL);
    }

    #[test]
    fn uncached_user_gets_fallback_without_hint() {
        let record = resolve(&"999".into(), &cache());
        assert!(!record.resolved);
        assert_eq!(record.display_name, "999 Uncached");
        assert_eq!(record.discriminator_suffix, None);
        assert_eq!(record.avatar_url, FALLBACK_AVATAR_URL);
    }

    #[test]
    fn only_first_uncached_gets_hint() {
        let list = ids(&["1", "x", "2", "y", "z"]);
        let resolved = resolve_all(&list, &cache());

        assert!(resolved.hint_assigned);
        let unresolved = resolved.records.iter().filter(|r| !r.resolved).count();
        assert_eq!(unresolved, 3);

        let names: Vec<&str> = resolved
            .records
            .iter()
            .map(|r| r.display_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "alice",
                "x Uncached, press the avatar",
                "bob#1234",
                "y Uncached",
                "z Uncached",
            ]
        );
    }

    #[test]
    fn fully_cached_list_assigns_no_hint() {
        let list = ids(&["2", "1"]);
        let resolved = resolve_all(&list, &cache());
        assert!(!resolved.hint_assigned);
        assert!(resolved.records.iter().all(|r| r.resolved));
        assert_eq!(resolved.records[0].display_name, "bob#1234");
    }

    #[test]
    fn each_pass_starts_fresh() {
        let list = ids(&["x", "y"]);
        let first = resolve_all(&list, &cache());
        let second = resolve_all(&list, &cache());
        assert_eq!(first, second);
        assert!(second.records[0].display_name.ends_with(RESOLVE_HINT));
    }

    #[test]
    fn empty_discriminator_has_no_suffix() {
        assert_eq!(discriminator_suffix(""), None);
        assert_eq!(discriminator_suffix("0"), None);
        assert_eq!(discriminator_suffix("0042").as_deref(), Some("#0042"));

        let mut cache = cache();
        cache.insert("4".into(), Profile::new("4", "dave", "", ""));
        let record = resolve(&"4".into(), &cache);
        assert_eq!(record.display_name, "dave");
        assert_eq!(record.discriminator_suffix, None);
    }

    #[test]
    fn only_first_animated_extension_is_rewritten() {
        assert_eq!(static_avatar_url("a.webp"), "a.png");
        assert_eq!(static_avatar_url("a.gif/b.gif"), "a.png/b.gif");
        assert_eq!(static_avatar_url("a.jpg"), "a.jpg");
    }
}
