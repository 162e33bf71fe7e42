use crate::calendar::DateKey;
use std::collections::HashSet;

/// The set of days chosen for commits, in the order they were picked.
///
/// Equality ignores order: two selections are equal if they contain the same
/// days.
#[derive(Clone, Debug, Default)]
pub(crate) struct Selection {
    keys: Vec<DateKey>,
    /// The same keys as `keys`, for membership tests
    members: HashSet<DateKey>,
}

impl Selection {
    pub(crate) fn new() -> Selection {
        Selection::default()
    }

    /// Returns a new selection with `key` added if it was absent or removed if
    /// it was present.  Newly-added keys go at the end.
    #[must_use]
    pub(crate) fn toggle(&self, key: DateKey) -> Selection {
        let mut sel = self.clone();
        if sel.members.remove(&key) {
            sel.keys.retain(|&k| k != key);
        } else {
            sel.members.insert(key);
            sel.keys.push(key);
        }
        sel
    }

    pub(crate) fn contains(&self, key: DateKey) -> bool {
        self.members.contains(&key)
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn keys(&self) -> &[DateKey] {
        &self.keys
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, DateKey> {
        self.keys.iter()
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Selection) -> bool {
        self.members == other.members
    }
}

impl Eq for Selection {}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a DateKey;
    type IntoIter = std::slice::Iter<'a, DateKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<DateKey> for Selection {
    fn from_iter<I: IntoIterator<Item = DateKey>>(iter: I) -> Selection {
        let mut sel = Selection::new();
        for key in iter {
            if sel.members.insert(key) {
                sel.keys.push(key);
            }
        }
        sel
    }
}
