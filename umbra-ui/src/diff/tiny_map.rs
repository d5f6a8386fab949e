use smallvec::SmallVec;
use umbra_types::Tag;

/// Flat, insertion-ordered map from non-zero tag to value, specialised for
/// the handful of entries a single diff frame produces.
///
/// Lookup is a linear scan over an inline buffer; erasure is logical (the
/// tag is zeroed) and physical compaction is amortised: it runs when erased
/// entries reach half the backing store, or is forced when iteration would
/// otherwise start in the middle of a run of holes.
pub(crate) struct TinyMap<V> {
    entries: SmallVec<[(Tag, V); 16]>,
    erased: usize,
    erased_at_front: usize,
}

impl<V> TinyMap<V> {
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
            erased: 0,
            erased_at_front: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len() - self.erased
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends without a uniqueness check; callers must ensure no live
    /// duplicate exists.
    pub fn insert(&mut self, tag: Tag, value: V) {
        debug_assert!(!tag.is_none(), "tag 0 cannot key a TinyMap entry");
        self.entries.push((tag, value));
    }

    pub fn contains(&mut self, tag: Tag) -> bool {
        self.position(tag).is_some()
    }

    pub fn get(&mut self, tag: Tag) -> Option<&V> {
        self.position(tag).map(|index| &self.entries[index].1)
    }

    pub fn get_mut(&mut self, tag: Tag) -> Option<&mut V> {
        self.position(tag).map(|index| &mut self.entries[index].1)
    }

    /// Logically erases the entry for `tag`. Returns false when no live
    /// entry carries it.
    pub fn remove(&mut self, tag: Tag) -> bool {
        match self.position(tag) {
            Some(index) => {
                self.erase_at(index);
                true
            }
            None => false,
        }
    }

    /// Iterates live entries in insertion order. Compacts first unless all
    /// erasures form a contiguous prefix, which is skipped instead.
    pub fn iter(&mut self) -> impl Iterator<Item = (Tag, &V)> {
        self.clean(self.erased_at_front != self.erased);
        self.entries[self.erased_at_front..]
            .iter()
            .map(|(tag, value)| (*tag, value))
    }

    /// Physically drops entries rejected by `keep` along with any
    /// accumulated holes.
    pub fn retain(&mut self, mut keep: impl FnMut(&V) -> bool) {
        self.entries.retain(|(tag, value)| !tag.is_none() && keep(value));
        self.erased = 0;
        self.erased_at_front = 0;
    }

    fn position(&mut self, tag: Tag) -> Option<usize> {
        debug_assert!(!tag.is_none(), "tag 0 cannot be looked up in a TinyMap");
        self.clean(false);
        self.entries[self.erased_at_front..]
            .iter()
            .position(|(entry_tag, _)| *entry_tag == tag)
            .map(|offset| offset + self.erased_at_front)
    }

    fn erase_at(&mut self, index: usize) {
        self.entries[index].0 = Tag::NONE;
        if index == self.erased_at_front {
            self.erased_at_front += 1;
        }
        self.erased += 1;
    }

    fn clean(&mut self, force: bool) {
        if (self.erased < self.entries.len() / 2 && !force)
            || self.entries.is_empty()
            || self.erased == 0
            || self.erased == self.erased_at_front
        {
            return;
        }

        if self.erased == self.entries.len() {
            self.entries.clear();
        } else {
            self.entries.retain(|(tag, _)| !tag.is_none());
        }
        self.erased = 0;
        self.erased_at_front = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: i32) -> TinyMap<i32> {
        let mut map = TinyMap::new();
        for i in 1..=n {
            map.insert(Tag(i), i * 10);
        }
        map
    }

    #[test]
    fn test_insert_and_find() {
        let mut map = filled(4);
        assert_eq!(map.get(Tag(3)), Some(&30));
        assert_eq!(map.get(Tag(5)), None);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_erase_middle_leaves_hole() {
        let mut map = filled(4);
        assert!(map.remove(Tag(2)));
        assert_eq!(map.get(Tag(2)), None);
        assert_eq!(map.get(Tag(4)), Some(&40));
        assert_eq!(map.len(), 3);
        // One middle erasure out of four is below the compaction threshold.
        assert_eq!(map.entries.len(), 4);
    }

    #[test]
    fn test_erase_front_tracked_without_compaction() {
        let mut map = filled(4);
        assert!(map.remove(Tag(1)));
        assert!(map.remove(Tag(2)));
        assert_eq!(map.erased_at_front, 2);

        // A contiguous erased prefix is skipped, not compacted.
        let tags: Vec<Tag> = map.iter().map(|(tag, _)| tag).collect();
        assert_eq!(tags, vec![Tag(3), Tag(4)]);
        assert_eq!(map.entries.len(), 4);
    }

    #[test]
    fn test_compaction_at_half_threshold() {
        let mut map = filled(4);
        assert!(map.remove(Tag(2)));
        assert!(map.remove(Tag(3)));
        // Next lookup crosses the half-erased threshold and compacts.
        assert_eq!(map.get(Tag(4)), Some(&40));
        assert_eq!(map.entries.len(), 2);
        assert_eq!(map.erased, 0);
    }

    #[test]
    fn test_iteration_forces_compaction_of_middle_holes() {
        let mut map = filled(5);
        assert!(map.remove(Tag(3)));

        let tags: Vec<Tag> = map.iter().map(|(tag, _)| tag).collect();
        assert_eq!(tags, vec![Tag(1), Tag(2), Tag(4), Tag(5)]);
        assert_eq!(map.entries.len(), 4);
    }

    #[test]
    fn test_erase_everything() {
        let mut map = filled(3);
        for i in 1..=3 {
            assert!(map.remove(Tag(i)));
        }
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut map = filled(2);
        assert!(!map.remove(Tag(9)));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_reinsert_after_erase() {
        let mut map = filled(2);
        assert!(map.remove(Tag(1)));
        map.insert(Tag(1), 99);
        assert_eq!(map.get(Tag(1)), Some(&99));
    }
}
