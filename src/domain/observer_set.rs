//! Ordered collection of notification targets.
//!
//! [`ObserverSet`] applies a fallible notification to every target in
//! insertion order. A failing target never stops delivery to the rest.
//! The pruning variant additionally drops every target whose call failed
//! and hands the dropped targets back so the caller can log them.

/// Ordered, duplicate-tolerant set of notification targets.
///
/// No identity check happens on [`Self::add`]; callers that care about
/// duplicates pre-check. [`Self::remove_if`] removes every match.
#[derive(Debug, Clone)]
pub struct ObserverSet<T> {
    entries: Vec<T>,
}

impl<T> ObserverSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends `target` unconditionally.
    pub fn add(&mut self, target: T) {
        self.entries.push(target);
    }

    /// Removes all entries matching `matcher`.
    ///
    /// Returns `true` if at least one entry was removed.
    pub fn remove_if(&mut self, mut matcher: impl FnMut(&T) -> bool) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| !matcher(entry));
        self.entries.len() != before
    }

    /// Invokes `action` on every target in insertion order, dropping each
    /// target whose call fails.
    ///
    /// Returns the dropped targets paired with their errors, in order.
    pub fn for_each_pruning<E>(
        &mut self,
        mut action: impl FnMut(&T) -> Result<(), E>,
    ) -> Vec<(T, E)> {
        let mut dropped = Vec::new();
        let entries = std::mem::take(&mut self.entries);
        for entry in entries {
            match action(&entry) {
                Ok(()) => self.entries.push(entry),
                Err(err) => dropped.push((entry, err)),
            }
        }
        dropped
    }

    /// Invokes `action` on every target in insertion order without
    /// removing anything.
    ///
    /// Returns the failing targets paired with their errors, in order.
    pub fn for_each<E>(&self, mut action: impl FnMut(&T) -> Result<(), E>) -> Vec<(&T, E)> {
        self.entries
            .iter()
            .filter_map(|entry| action(entry).err().map(|err| (entry, err)))
            .collect()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the set holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T> Default for ObserverSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_keeps_duplicates() {
        let mut set = ObserverSet::new();
        set.add(1);
        set.add(1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn remove_if_removes_all_matches() {
        let mut set = ObserverSet::new();
        set.add(1);
        set.add(2);
        set.add(1);
        assert!(set.remove_if(|v| *v == 1));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![2]);
        assert!(!set.remove_if(|v| *v == 1));
    }

    #[test]
    fn pruning_attempts_every_target() {
        let mut set = ObserverSet::new();
        for v in 1..=4 {
            set.add(v);
        }
        let mut seen = Vec::new();
        let dropped = set.for_each_pruning(|v| {
            seen.push(*v);
            if v % 2 == 0 { Err("even") } else { Ok(()) }
        });
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(dropped, vec![(2, "even"), (4, "even")]);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn for_each_reports_without_removing() {
        let mut set = ObserverSet::new();
        set.add("ok");
        set.add("bad");
        let failures = set.for_each(|v| if *v == "bad" { Err(()) } else { Ok(()) });
        assert_eq!(failures.len(), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn clear_empties() {
        let mut set = ObserverSet::new();
        set.add(());
        set.clear();
        assert!(set.is_empty());
    }
}
