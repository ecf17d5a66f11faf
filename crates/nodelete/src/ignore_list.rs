use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::UserId;

/// Ordered, duplicate-free list of ignored users.
///
/// Entries keep their insertion order. Loading a list that contains
/// duplicates keeps the first occurrence of each id.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<UserId>", into = "Vec<UserId>")]
pub struct IgnoreList {
    users: Vec<UserId>,
}

impl std::fmt::Debug for IgnoreList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.users.iter().map(UserId::as_str))
            .finish()
    }
}

impl IgnoreList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.users.contains(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserId> {
        self.users.iter()
    }

    pub fn as_slice(&self) -> &[UserId] {
        &self.users
    }

    /// Appends `id` unless it is already present. Returns whether the list changed.
    pub fn add(&mut self, id: UserId) -> bool {
        if self.contains(&id) {
            return false;
        }

        self.users.push(id);
        true
    }

    /// Drops every occurrence of `id`. Absent ids are a no-op.
    /// Returns whether the list changed.
    pub fn remove(&mut self, id: &UserId) -> bool {
        let before = self.users.len();
        self.users.retain(|existing| existing != id);
        before != self.users.len()
    }

    /// Empties the list. Returns whether the list changed.
    pub fn clear(&mut self) -> bool {
        if self.users.is_empty() {
            return false;
        }

        self.users.clear();
        true
    }
}

impl FromIterator<UserId> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let users = iter
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();

        Self { users }
    }
}

impl From<Vec<UserId>> for IgnoreList {
    fn from(users: Vec<UserId>) -> Self {
        users.into_iter().collect()
    }
}

impl From<IgnoreList> for Vec<UserId> {
    fn from(list: IgnoreList) -> Self {
        list.users
    }
}

impl<'a> IntoIterator for &'a IgnoreList {
    type Item = &'a UserId;
    type IntoIter = std::slice::Iter<'a, UserId>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn list(ids: &[&str]) -> IgnoreList {
        ids.iter().map(|id| UserId::from(*id)).collect()
    }

    fn ids(list: &IgnoreList) -> Vec<&str> {
        list.iter().map(UserId::as_str).collect()
    }

    #[test]
    fn add_appends_and_skips_duplicates() {
        let mut l = list(&["a", "b"]);
        assert!(l.add("c".into()));
        assert!(!l.add("a".into()));
        assert_eq!(ids(&l), vec!["a", "b", "c"]);
    }

    #[test]
    fn remove_keeps_order_of_the_rest() {
        let mut l = list(&["a", "b", "c", "d"]);
        assert!(l.remove(&"b".into()));
        assert_eq!(l.len(), 3);
        assert_eq!(ids(&l), vec!["a", "c", "d"]);
    }

    #[test]
    fn remove_absent_is_noop() {
        let mut l = list(&["a", "b"]);
        let before = l.clone();
        assert!(!l.remove(&"zzz".into()));
        assert_eq!(l, before);
    }

    #[test]
    fn clear_on_empty_is_identity() {
        let mut l = IgnoreList::new();
        assert!(!l.clear());
        assert!(l.is_empty());

        let mut l = list(&["a"]);
        assert!(l.clear());
        assert!(l.is_empty());
    }

    #[test]
    fn deserialize_drops_later_duplicates() {
        let l: IgnoreList = serde_json::from_str(r#"["a","b","a","c","b"]"#).unwrap();
        assert_eq!(ids(&l), vec!["a", "b", "c"]);
        assert_eq!(serde_json::to_string(&l).unwrap(), r#"["a","b","c"]"#);
    }

    #[test]
    fn any_string_is_accepted() {
        let mut l = IgnoreList::new();
        assert!(l.add("".into()));
        assert!(l.add("not a snowflake 🙃".into()));
        assert_eq!(l.len(), 2);
    }
}
