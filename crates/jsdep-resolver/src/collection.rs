//! Dependency-first sequence of package sets

use std::path::Path;
use std::slice;

use crate::dependency_set::DependencySet;

/// Every package of a resolved tree, deepest first, entry root last.
///
/// Besides plain indexing, the collection keeps a cursor for forward
/// iteration. [`peek_previous`](Self::peek_previous) and
/// [`peek_root`](Self::peek_root) never move it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySetCollection {
    sets: Vec<DependencySet>,
    cursor: usize,
}

impl DependencySetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn push(&mut self, set: DependencySet) {
        self.sets.push(set);
    }

    /// Insert at the front. The cursor keeps pointing at the same set, or
    /// stays past the end if iteration was done.
    pub fn prepend(&mut self, set: DependencySet) {
        let had_sets = !self.sets.is_empty();
        self.sets.insert(0, set);
        if had_sets {
            self.cursor += 1;
        }
    }

    pub fn get(&self, index: usize) -> Option<&DependencySet> {
        self.sets.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut DependencySet> {
        self.sets.get_mut(index)
    }

    /// Replace the set at `index`, returning the old one. An index past the
    /// end appends instead.
    pub fn set(&mut self, index: usize, set: DependencySet) -> Option<DependencySet> {
        match self.sets.get_mut(index) {
            Some(slot) => Some(std::mem::replace(slot, set)),
            None => {
                self.sets.push(set);
                None
            }
        }
    }

    /// Remove the set at `index`, shifting later sets down.
    pub fn unset(&mut self, index: usize) -> Option<DependencySet> {
        if index >= self.sets.len() {
            return None;
        }
        if index < self.cursor {
            self.cursor -= 1;
        }
        Some(self.sets.remove(index))
    }

    pub fn iter(&self) -> slice::Iter<'_, DependencySet> {
        self.sets.iter()
    }

    /// Index of the first set whose root is `root`.
    pub fn index_of(&self, root: &Path) -> Option<usize> {
        self.sets.iter().position(|set| set.root() == root)
    }

    /// Drop sets equal to an earlier one, keeping the first.
    pub fn dedup(&mut self) {
        let mut index = 0;
        while index < self.sets.len() {
            if self.sets[..index].contains(&self.sets[index]) {
                self.unset(index);
            } else {
                index += 1;
            }
        }
    }

    // Cursor

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// The set under the cursor, `None` once iteration is done.
    pub fn current(&self) -> Option<&DependencySet> {
        self.sets.get(self.cursor)
    }

    /// Move the cursor forward, returning the set it now points at.
    pub fn advance(&mut self) -> Option<&DependencySet> {
        if self.cursor < self.sets.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// The set just before the cursor.
    pub fn peek_previous(&self) -> Option<&DependencySet> {
        self.cursor
            .checked_sub(1)
            .and_then(|index| self.sets.get(index))
    }

    /// The entry root's set, always the last one.
    pub fn peek_root(&self) -> Option<&DependencySet> {
        self.sets.last()
    }
}

impl<'a> IntoIterator for &'a DependencySetCollection {
    type Item = &'a DependencySet;
    type IntoIter = slice::Iter<'a, DependencySet>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<DependencySet> for DependencySetCollection {
    fn from_iter<I: IntoIterator<Item = DependencySet>>(iter: I) -> Self {
        Self {
            sets: iter.into_iter().collect(),
            cursor: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn roots(collection: &DependencySetCollection) -> Vec<&Path> {
        collection.iter().map(DependencySet::root).collect()
    }

    fn abc() -> DependencySetCollection {
        ["a.js", "b.js", "c.js"].into_iter().map(DependencySet::new).collect()
    }

    #[test]
    fn test_cursor_and_peeks() {
        let mut collection = abc();

        assert_eq!(collection.current().map(DependencySet::root), Some(Path::new("a.js")));
        assert!(collection.peek_previous().is_none());

        assert_eq!(collection.advance().map(DependencySet::root), Some(Path::new("b.js")));
        assert_eq!(collection.peek_previous().map(DependencySet::root), Some(Path::new("a.js")));
        assert_eq!(collection.peek_root().map(DependencySet::root), Some(Path::new("c.js")));
        assert_eq!(collection.position(), 1);

        collection.advance();
        assert!(collection.advance().is_none());
        assert!(collection.advance().is_none());
        assert_eq!(collection.position(), 3);
        assert_eq!(collection.peek_previous().map(DependencySet::root), Some(Path::new("c.js")));

        collection.rewind();
        assert_eq!(collection.current().map(DependencySet::root), Some(Path::new("a.js")));
    }

    #[test]
    fn test_prepend_and_unset_keep_cursor() {
        let mut collection = abc();
        collection.advance();

        collection.prepend(DependencySet::new("z.js"));
        assert_eq!(collection.current().map(DependencySet::root), Some(Path::new("b.js")));

        let removed = collection.unset(0).unwrap();
        assert_eq!(removed.root(), Path::new("z.js"));
        assert_eq!(collection.current().map(DependencySet::root), Some(Path::new("b.js")));

        assert!(collection.unset(10).is_none());

        let mut collection = abc();
        collection.prepend(DependencySet::new("z.js"));
        assert_eq!(collection.current().map(DependencySet::root), Some(Path::new("a.js")));
        assert_eq!(collection.peek_previous().map(DependencySet::root), Some(Path::new("z.js")));

        let mut empty = DependencySetCollection::default();
        empty.prepend(DependencySet::new("z.js"));
        assert_eq!(empty.current().map(DependencySet::root), Some(Path::new("z.js")));
    }

    #[test]
    fn test_set_replaces_or_appends() {
        let mut collection = abc();
        let old = collection.set(1, DependencySet::new("x.js")).unwrap();
        assert_eq!(old.root(), Path::new("b.js"));
        assert!(collection.set(7, DependencySet::new("y.js")).is_none());
        assert_eq!(
            roots(&collection),
            vec![Path::new("a.js"), Path::new("x.js"), Path::new("c.js"), Path::new("y.js")]
        );
    }

    #[test]
    fn test_dedup_keeps_first() {
        let mut collection = abc();
        collection.push(DependencySet::new("a.js"));
        collection.push(DependencySet::new("b.js").with_dependency("other.js"));
        collection.dedup();

        assert_eq!(
            roots(&collection),
            vec![Path::new("a.js"), Path::new("b.js"), Path::new("c.js"), Path::new("b.js")]
        );
        assert_eq!(collection.index_of(Path::new("c.js")), Some(2));
    }
}
