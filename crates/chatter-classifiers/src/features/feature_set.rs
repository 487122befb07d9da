use std::collections::BTreeMap;

/// Boolean presence indicators for one record, keyed by feature name.
///
/// Only names flagged `true` reach the vectorizer; a `false` entry is kept so
/// that callers can inspect the full extraction result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    features: BTreeMap<String, bool>,
}

impl FeatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `name` as present.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.features.insert(name.into(), true);
    }

    pub fn set(&mut self, name: impl Into<String>, present: bool) {
        self.features.insert(name.into(), present);
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.features.get(name).copied()
    }

    /// True when `name` is present with a `true` flag.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.features.iter().map(|(name, &flag)| (name.as_str(), flag))
    }

    /// Names flagged `true`, in lexical order.
    pub fn present(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, flag)| *flag).map(|(name, _)| name)
    }

    pub fn merge(&mut self, other: FeatureSet) {
        self.features.extend(other.features);
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = FeatureSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_skips_false_flags() {
        let mut set: FeatureSet = ["moon", "to"].into_iter().collect();
        set.set("bio_contains_link=True", false);

        assert_eq!(set.len(), 3);
        assert!(set.contains("moon"));
        assert!(!set.contains("bio_contains_link=True"));
        assert_eq!(set.get("bio_contains_link=True"), Some(false));
        assert_eq!(set.present().collect::<Vec<_>>(), vec!["moon", "to"]);
    }

    #[test]
    fn test_merge_overwrites_flags() {
        let mut a: FeatureSet = ["x"].into_iter().collect();
        let mut b = FeatureSet::new();
        b.set("x", false);
        b.insert("y");
        a.merge(b);
        assert!(!a.contains("x"));
        assert!(a.contains("y"));
    }
}
