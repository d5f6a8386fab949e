use bitflags::bitflags;

use crate::view::ShadowView;

/// The five imperative instructions a host applies to migrate its view
/// hierarchy between tree versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Delete,
    Insert,
    Remove,
    Update,
}

bitflags! {
    /// One-hot mask per mutation kind, used by the reparenting side-table
    /// to track which operations exist and which should be erased.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MutationMask: u8 {
        const CREATE = 1 << 0;
        const DELETE = 1 << 1;
        const INSERT = 1 << 2;
        const REMOVE = 1 << 3;
        const UPDATE = 1 << 4;
    }
}

impl MutationKind {
    pub fn mask(self) -> MutationMask {
        match self {
            MutationKind::Create => MutationMask::CREATE,
            MutationKind::Delete => MutationMask::DELETE,
            MutationKind::Insert => MutationMask::INSERT,
            MutationKind::Remove => MutationMask::REMOVE,
            MutationKind::Update => MutationMask::UPDATE,
        }
    }
}

/// One mounting instruction. Field population is fixed per kind; the
/// constructors below are the only way mutations are made.
///
/// `index` is a child slot in the parent's ordering where that is
/// meaningful (Insert/Remove, and Update when the slot is known), else -1.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowViewMutation {
    pub kind: MutationKind,
    pub parent: ShadowView,
    pub old_child: ShadowView,
    pub new_child: ShadowView,
    pub index: i32,
}

impl ShadowViewMutation {
    pub fn create(new_child: ShadowView) -> Self {
        Self {
            kind: MutationKind::Create,
            parent: ShadowView::default(),
            old_child: ShadowView::default(),
            new_child,
            index: -1,
        }
    }

    pub fn delete(old_child: ShadowView) -> Self {
        Self {
            kind: MutationKind::Delete,
            parent: ShadowView::default(),
            old_child,
            new_child: ShadowView::default(),
            index: -1,
        }
    }

    pub fn insert(parent: ShadowView, new_child: ShadowView, index: i32) -> Self {
        Self {
            kind: MutationKind::Insert,
            parent,
            old_child: ShadowView::default(),
            new_child,
            index,
        }
    }

    pub fn remove(parent: ShadowView, old_child: ShadowView, index: i32) -> Self {
        Self {
            kind: MutationKind::Remove,
            parent,
            old_child,
            new_child: ShadowView::default(),
            index,
        }
    }

    pub fn update(
        parent: ShadowView,
        old_child: ShadowView,
        new_child: ShadowView,
        index: i32,
    ) -> Self {
        Self {
            kind: MutationKind::Update,
            parent,
            old_child,
            new_child,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_types::Tag;

    fn view(tag: i32) -> ShadowView {
        ShadowView {
            tag: Tag(tag),
            ..Default::default()
        }
    }

    #[test]
    fn test_masks_are_one_hot() {
        let kinds = [
            MutationKind::Create,
            MutationKind::Delete,
            MutationKind::Insert,
            MutationKind::Remove,
            MutationKind::Update,
        ];
        for kind in kinds {
            assert_eq!(kind.mask().bits().count_ones(), 1);
        }
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert!((a.mask() & b.mask()).is_empty());
            }
        }
    }

    #[test]
    fn test_create_population() {
        let mutation = ShadowViewMutation::create(view(3));
        assert_eq!(mutation.kind, MutationKind::Create);
        assert!(mutation.parent.tag.is_none());
        assert!(mutation.old_child.tag.is_none());
        assert_eq!(mutation.new_child.tag, Tag(3));
        assert_eq!(mutation.index, -1);
    }

    #[test]
    fn test_delete_population() {
        let mutation = ShadowViewMutation::delete(view(3));
        assert_eq!(mutation.kind, MutationKind::Delete);
        assert_eq!(mutation.old_child.tag, Tag(3));
        assert!(mutation.new_child.tag.is_none());
        assert_eq!(mutation.index, -1);
    }

    #[test]
    fn test_insert_remove_population() {
        let insert = ShadowViewMutation::insert(view(1), view(3), 2);
        assert_eq!(insert.parent.tag, Tag(1));
        assert_eq!(insert.new_child.tag, Tag(3));
        assert!(insert.old_child.tag.is_none());
        assert_eq!(insert.index, 2);

        let remove = ShadowViewMutation::remove(view(1), view(3), 2);
        assert_eq!(remove.parent.tag, Tag(1));
        assert_eq!(remove.old_child.tag, Tag(3));
        assert!(remove.new_child.tag.is_none());
        assert_eq!(remove.index, 2);
    }
}
