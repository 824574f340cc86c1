// Interfaces that must never be brought down

use serde::Serialize;
use std::collections::BTreeSet;

pub const LOOPBACK: &str = "lo";

/// Names protected from deactivation. Built once per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExclusionSet {
    names: BTreeSet<String>,
}

impl ExclusionSet {
    /// Seed with `loopback`, add the comma-separated `user_list` entries
    /// (trimmed, empties dropped) and the default route interface if known.
    pub fn build(loopback: &str, user_list: &str, default_route: Option<&str>) -> Self {
        let mut names = BTreeSet::new();
        names.insert(loopback.to_string());

        names.extend(
            user_list
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
        );

        if let Some(name) = default_route {
            names.insert(name.to_string());
        }

        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_set_is_loopback() {
        let set = ExclusionSet::build(LOOPBACK, "", None);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["lo"]);
    }

    #[test]
    fn test_user_list_is_trimmed() {
        let set = ExclusionSet::build(LOOPBACK, " wg0 ,, docker0,  ,eth1", Some("enp0s3"));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec!["docker0", "enp0s3", "eth1", "lo", "wg0"]
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let set = ExclusionSet::build(LOOPBACK, "lo,enp0s3", Some("enp0s3"));
        assert_eq!(set.iter().count(), 2);
        assert!(set.contains("lo"));
        assert!(set.contains("enp0s3"));
    }

    #[test]
    fn test_custom_loopback_name() {
        let set = ExclusionSet::build("lo0", "", None);
        assert!(set.contains("lo0"));
        assert!(!set.contains("lo"));
    }
}
