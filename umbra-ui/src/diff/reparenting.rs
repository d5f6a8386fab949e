use tracing::trace;
use umbra_types::{ShadowNode, Tag};

use super::tiny_map::TinyMap;
use crate::mutation::{MutationKind, MutationMask, ShadowViewMutation};

/// Pending operations recorded for one tag during a diff invocation.
#[derive(Debug)]
pub(crate) struct OperationsOnTag<'a> {
    op_exists: MutationMask,
    should_erase_op: MutationMask,
    /// Index of the first Remove or Insert seen for this tag, whichever
    /// came first.
    remove_insert_index: i32,
    /// Parent tag of that first Remove or Insert.
    parent_tag: Tag,
    old_node: Option<&'a ShadowNode>,
    new_node: Option<&'a ShadowNode>,
}

impl Default for OperationsOnTag<'_> {
    fn default() -> Self {
        Self {
            op_exists: MutationMask::empty(),
            should_erase_op: MutationMask::empty(),
            remove_insert_index: -1,
            parent_tag: Tag::NONE,
            old_node: None,
            new_node: None,
        }
    }
}

/// Side-channel that recognises a node leaving one parent and arriving
/// under another within the same diff, so the redundant Delete/Create pair
/// (and, for a same-spot match, the Remove/Insert pair too) can be pruned
/// from the final mutation list.
///
/// When disabled every decision call answers "emit everything" and the
/// pruning pass is a no-op; the resulting list is still correct, merely
/// less compact.
pub(crate) struct ReparentingMetadata<'a> {
    enabled: bool,
    /// Records whose `should_erase_op` is non-empty and not yet consumed
    /// by the pruning pass.
    pending_erasures: usize,
    tags_to_operations: TinyMap<OperationsOnTag<'a>>,
}

impl<'a> ReparentingMetadata<'a> {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            pending_erasures: 0,
            tags_to_operations: TinyMap::new(),
        }
    }

    /// Consulted before emitting Remove + Delete for a node vanishing from
    /// the old side. Returns `(emit_remove, emit_delete, update_node)`.
    pub fn should_remove_delete_update(
        &mut self,
        parent_tag: Tag,
        node: &'a ShadowNode,
        index: i32,
    ) -> (bool, bool, Option<&'a ShadowNode>) {
        if !self.enabled {
            return (true, true, None);
        }

        let tag = node.tag();

        if let Some(record) = self.tags_to_operations.get_mut(tag) {
            debug_assert!(
                record.should_erase_op.is_empty(),
                "second sighting of tag {tag} after its erasures were decided"
            );

            // The other side already saw this tag as an Insert. If that
            // insert landed in the same slot of the same parent, the node
            // never actually moved and both structural ops cancel.
            let matched_same_spot = record.op_exists.contains(MutationMask::INSERT)
                && record.remove_insert_index == index
                && record.parent_tag == parent_tag;
            let should_remove = !matched_same_spot;

            record.should_erase_op |= record.op_exists & MutationMask::CREATE;
            if !should_remove {
                record.should_erase_op |= record.op_exists & MutationMask::INSERT;
            }

            let update_node = record.new_node;
            if !record.should_erase_op.is_empty() {
                self.pending_erasures += 1;
                trace!("reparenting: tag [{}] left parent [{}]", tag, parent_tag);
            }

            return (should_remove, false, update_node);
        }

        let record = OperationsOnTag {
            op_exists: MutationMask::REMOVE | MutationMask::DELETE,
            remove_insert_index: index,
            parent_tag,
            old_node: Some(node),
            ..Default::default()
        };
        self.tags_to_operations.insert(tag, record);

        (true, true, None)
    }

    /// Consulted before emitting Create + Insert for a node appearing on
    /// the new side. Returns `(emit_insert, emit_create, update_node)`.
    pub fn should_create_insert_update(
        &mut self,
        parent_tag: Tag,
        node: &'a ShadowNode,
        index: i32,
    ) -> (bool, bool, Option<&'a ShadowNode>) {
        if !self.enabled {
            return (true, true, None);
        }

        let tag = node.tag();

        if let Some(record) = self.tags_to_operations.get_mut(tag) {
            debug_assert!(
                record.should_erase_op.is_empty(),
                "second sighting of tag {tag} after its erasures were decided"
            );

            let matched_same_spot = record.op_exists.contains(MutationMask::REMOVE)
                && record.remove_insert_index == index
                && record.parent_tag == parent_tag;
            let should_insert = !matched_same_spot;

            record.should_erase_op |= record.op_exists & MutationMask::DELETE;
            if !should_insert {
                record.should_erase_op |= record.op_exists & MutationMask::REMOVE;
            }

            let update_node = record.old_node;
            if !record.should_erase_op.is_empty() {
                self.pending_erasures += 1;
                trace!(
                    "reparenting: tag [{}] arrived under parent [{}]",
                    tag,
                    parent_tag
                );
            }

            return (should_insert, false, update_node);
        }

        let record = OperationsOnTag {
            op_exists: MutationMask::CREATE | MutationMask::INSERT,
            remove_insert_index: index,
            parent_tag,
            new_node: Some(node),
            ..Default::default()
        };
        self.tags_to_operations.insert(tag, record);

        (true, true, None)
    }

    /// Consulted by the create sweep for a node that has already been
    /// inserted. Returns `(emit_create, update_node)`.
    pub fn should_create_update(&mut self, node: &'a ShadowNode) -> (bool, Option<&'a ShadowNode>) {
        if !self.enabled {
            return (true, None);
        }

        let tag = node.tag();
        let Some(record) = self.tags_to_operations.get_mut(tag) else {
            debug_assert!(false, "create sweep consulted tag {tag} never marked inserted");
            return (true, None);
        };

        if record.op_exists.contains(MutationMask::DELETE) {
            record.should_erase_op |= MutationMask::DELETE;
            record.new_node = Some(node);
            let update_node = record.old_node;
            self.pending_erasures += 1;
            trace!("reparenting: tag [{}] recreated elsewhere, delete cancelled", tag);
            return (false, update_node);
        }

        record.op_exists |= MutationMask::CREATE;
        (true, None)
    }

    /// Records an Insert intent produced by the reordering walk. Such an
    /// insert executes unconditionally and cannot be cancelled.
    pub fn mark_inserted(&mut self, parent_tag: Tag, node: &'a ShadowNode, index: i32) {
        if !self.enabled {
            return;
        }

        let tag = node.tag();

        if let Some(record) = self.tags_to_operations.get_mut(tag) {
            // The element moved here from elsewhere in the hierarchy.
            record.op_exists |= MutationMask::INSERT;
            return;
        }

        let record = OperationsOnTag {
            op_exists: MutationMask::INSERT,
            remove_insert_index: index,
            parent_tag,
            ..Default::default()
        };
        self.tags_to_operations.insert(tag, record);
    }

    /// Drops mutations obviated by detected reparenting. Runs once, after
    /// the top-level diff returns.
    pub fn prune(&mut self, mutations: &mut Vec<ShadowViewMutation>) {
        if !self.enabled || self.pending_erasures == 0 {
            return;
        }

        // Records with nothing to erase only slow the scan down.
        self.tags_to_operations
            .retain(|record| !record.should_erase_op.is_empty());

        mutations.retain(|mutation| {
            if self.pending_erasures == 0 {
                return true;
            }

            let tag = match mutation.kind {
                MutationKind::Create | MutationKind::Insert => mutation.new_child.tag,
                _ => mutation.old_child.tag,
            };

            let Some(record) = self.tags_to_operations.get_mut(tag) else {
                return true;
            };

            let should_drop = record.should_erase_op.contains(mutation.kind.mask());
            record.should_erase_op.remove(mutation.kind.mask());
            if record.should_erase_op.is_empty() {
                self.tags_to_operations.remove(tag);
                self.pending_erasures -= 1;
            }

            !should_drop
        });
    }
}
