mod flatten;
mod reparenting;
mod tiny_map;

pub use self::flatten::slice_child_shadow_node_view_pairs;

use tracing::trace;
use umbra_types::{same_family, ShadowNode, Tag};

use self::reparenting::ReparentingMetadata;
use self::tiny_map::TinyMap;
use crate::mutation::ShadowViewMutation;
use crate::view::{ShadowView, ShadowViewNodePair};

/// Computes the ordered mutation list that migrates a host from the old
/// tree to the new one.
///
/// The two roots must belong to the same family; handing in unrelated
/// trees is a caller bug. With `enable_reparenting_detection` a subtree
/// moving between parents keeps its host-side identity (Remove + Insert
/// instead of a full Delete/Create round trip); without it the list is
/// still correct, merely less compact.
pub fn calculate_shadow_view_mutations(
    old_root: &ShadowNode,
    new_root: &ShadowNode,
    enable_reparenting_detection: bool,
) -> Vec<ShadowViewMutation> {
    assert!(
        same_family(old_root, new_root),
        "diff roots must belong to the same family"
    );

    let mut mutations = Vec::with_capacity(256);
    let mut metadata = ReparentingMetadata::new(enable_reparenting_detection);

    let old_root_view = ShadowView::from(old_root);
    let new_root_view = ShadowView::from(new_root);

    if old_root_view != new_root_view {
        mutations.push(ShadowViewMutation::update(
            ShadowView::default(),
            old_root_view.clone(),
            new_root_view,
            -1,
        ));
    }

    diff_children(
        &mut mutations,
        &mut metadata,
        old_root_view,
        slice_child_shadow_node_view_pairs(old_root),
        slice_child_shadow_node_view_pairs(new_root),
    );

    metadata.prune(&mut mutations);

    mutations
}

/// Stable reorder by the nodes' Z-order hints. A list where every hint is
/// zero is already in its final order and is left untouched.
fn reorder_in_place_if_needed(pairs: &mut [ShadowViewNodePair<'_>]) {
    if pairs.len() < 2 {
        return;
    }

    if pairs.iter().all(|pair| pair.node.order_index() == 0) {
        return;
    }

    pairs.sort_by_key(|pair| pair.node.order_index());
}

fn diff_children<'a>(
    mutations: &mut Vec<ShadowViewMutation>,
    metadata: &mut ReparentingMetadata<'a>,
    parent_view: ShadowView,
    mut old_pairs: Vec<ShadowViewNodePair<'a>>,
    mut new_pairs: Vec<ShadowViewNodePair<'a>>,
) {
    if old_pairs.is_empty() && new_pairs.is_empty() {
        return;
    }

    reorder_in_place_if_needed(&mut old_pairs);
    reorder_in_place_if_needed(&mut new_pairs);

    // Mutations are bucketed per kind and concatenated in a fixed order at
    // the end; the order is part of the contract with the host.
    let mut create_mutations: Vec<ShadowViewMutation> = Vec::new();
    let mut delete_mutations: Vec<ShadowViewMutation> = Vec::new();
    let mut insert_mutations: Vec<ShadowViewMutation> = Vec::new();
    let mut remove_mutations: Vec<ShadowViewMutation> = Vec::new();
    let mut update_mutations: Vec<ShadowViewMutation> = Vec::new();
    let mut downward_mutations: Vec<ShadowViewMutation> = Vec::new();
    let mut destructive_downward_mutations: Vec<ShadowViewMutation> = Vec::new();

    // Stage one: lockstep walk over the common prefix. Matching tags mean
    // the same view survived in place; only an update and the subtree
    // recursion are needed.
    let mut index = 0;
    while index < old_pairs.len() && index < new_pairs.len() {
        let old_pair = &old_pairs[index];
        let new_pair = &new_pairs[index];

        if old_pair.view.tag != new_pair.view.tag {
            trace!(
                "differ: tags diverge at {}: [{}] vs [{}]",
                index,
                old_pair.view.tag,
                new_pair.view.tag
            );
            break;
        }

        if old_pair.view != new_pair.view {
            update_mutations.push(ShadowViewMutation::update(
                parent_view.clone(),
                old_pair.view.clone(),
                new_pair.view.clone(),
                index as i32,
            ));
        }

        let old_grandchildren = slice_child_shadow_node_view_pairs(old_pair.node);
        let new_grandchildren = slice_child_shadow_node_view_pairs(new_pair.node);
        // Teardown under a vanishing subtree must land in the bucket that
        // executes before structural changes at this level.
        let bucket = if new_grandchildren.is_empty() {
            &mut destructive_downward_mutations
        } else {
            &mut downward_mutations
        };
        diff_children(
            bucket,
            metadata,
            old_pair.view.clone(),
            old_grandchildren,
            new_grandchildren,
        );

        index += 1;
    }

    if index == new_pairs.len() {
        // The new list is exhausted: everything left on the old side goes
        // away (or turns out to have been reparented).
        for (old_index, old_pair) in old_pairs.iter().enumerate().skip(index) {
            trace!(
                "differ: dropping tag [{}] and its subtree",
                old_pair.view.tag
            );

            let (should_remove, should_delete, update_node) = metadata
                .should_remove_delete_update(parent_view.tag, old_pair.node, old_index as i32);

            if should_delete {
                delete_mutations.push(ShadowViewMutation::delete(old_pair.view.clone()));
            }
            if should_remove {
                remove_mutations.push(ShadowViewMutation::remove(
                    parent_view.clone(),
                    old_pair.view.clone(),
                    old_index as i32,
                ));
            }
            if let Some(update_node) = update_node {
                let new_tree_view = ShadowView::from(update_node);
                if new_tree_view != old_pair.view {
                    update_mutations.push(ShadowViewMutation::update(
                        parent_view.clone(),
                        old_pair.view.clone(),
                        new_tree_view,
                        -1,
                    ));
                }
            }

            diff_children(
                &mut destructive_downward_mutations,
                metadata,
                old_pair.view.clone(),
                slice_child_shadow_node_view_pairs(old_pair.node),
                Vec::new(),
            );
        }
    } else if index == old_pairs.len() {
        // The old list is exhausted: everything left on the new side is
        // freshly created (or arrives from another parent).
        for (new_index, new_pair) in new_pairs.iter().enumerate().skip(index) {
            trace!(
                "differ: introducing tag [{}] and its subtree",
                new_pair.view.tag
            );

            let (should_insert, should_create, update_node) = metadata
                .should_create_insert_update(parent_view.tag, new_pair.node, new_index as i32);

            if should_insert {
                insert_mutations.push(ShadowViewMutation::insert(
                    parent_view.clone(),
                    new_pair.view.clone(),
                    new_index as i32,
                ));
            }
            if should_create {
                create_mutations.push(ShadowViewMutation::create(new_pair.view.clone()));
            }
            if let Some(update_node) = update_node {
                let old_tree_view = ShadowView::from(update_node);
                if old_tree_view != new_pair.view {
                    update_mutations.push(ShadowViewMutation::update(
                        parent_view.clone(),
                        old_tree_view,
                        new_pair.view.clone(),
                        -1,
                    ));
                }
            }

            diff_children(
                &mut downward_mutations,
                metadata,
                new_pair.view.clone(),
                Vec::new(),
                slice_child_shadow_node_view_pairs(new_pair.node),
            );
        }
    } else {
        // Both lists still have unmatched members: walk them together,
        // resolving moves, disappearances, and insertions as they come.
        let mut new_remaining_pairs = TinyMap::new();
        for new_pair in &new_pairs[index..] {
            new_remaining_pairs.insert(new_pair.view.tag, new_pair);
        }
        let mut new_inserted_pairs: TinyMap<&ShadowViewNodePair<'a>> = TinyMap::new();

        let mut old_index = index;
        let mut new_index = index;
        while new_index < new_pairs.len() || old_index < old_pairs.len() {
            // Both cursors on the same tag: the view survived, advance both.
            if new_index < new_pairs.len() && old_index < old_pairs.len() {
                let old_pair = &old_pairs[old_index];
                let new_pair = &new_pairs[new_index];

                if old_pair.view.tag == new_pair.view.tag {
                    trace!(
                        "differ: matched tags at {}/{}: [{}]",
                        old_index,
                        new_index,
                        old_pair.view.tag
                    );

                    if old_pair.view != new_pair.view {
                        update_mutations.push(ShadowViewMutation::update(
                            parent_view.clone(),
                            old_pair.view.clone(),
                            new_pair.view.clone(),
                            new_index as i32,
                        ));
                    }

                    new_remaining_pairs.remove(old_pair.view.tag);

                    let old_grandchildren = slice_child_shadow_node_view_pairs(old_pair.node);
                    let new_grandchildren = slice_child_shadow_node_view_pairs(new_pair.node);
                    let bucket = if new_grandchildren.is_empty() {
                        &mut destructive_downward_mutations
                    } else {
                        &mut downward_mutations
                    };
                    diff_children(
                        bucket,
                        metadata,
                        old_pair.view.clone(),
                        old_grandchildren,
                        new_grandchildren,
                    );

                    new_index += 1;
                    old_index += 1;
                    continue;
                }
            }

            if old_index < old_pairs.len() {
                let old_pair = &old_pairs[old_index];
                let old_tag = old_pair.view.tag;

                // The tag was already inserted at its new position earlier
                // in this walk; all that is left is removing it from the
                // old slot.
                if let Some(inserted_pair) = new_inserted_pairs.get(old_tag).copied() {
                    trace!(
                        "differ: removing tag [{}] already inserted at a new position",
                        old_tag
                    );

                    remove_mutations.push(ShadowViewMutation::remove(
                        parent_view.clone(),
                        old_pair.view.clone(),
                        old_index as i32,
                    ));

                    if old_pair.view != inserted_pair.view {
                        update_mutations.push(ShadowViewMutation::update(
                            parent_view.clone(),
                            old_pair.view.clone(),
                            inserted_pair.view.clone(),
                            -1,
                        ));
                    }

                    let old_grandchildren = slice_child_shadow_node_view_pairs(old_pair.node);
                    let new_grandchildren =
                        slice_child_shadow_node_view_pairs(inserted_pair.node);
                    let bucket = if new_grandchildren.is_empty() {
                        &mut destructive_downward_mutations
                    } else {
                        &mut downward_mutations
                    };
                    diff_children(
                        bucket,
                        metadata,
                        old_pair.view.clone(),
                        old_grandchildren,
                        new_grandchildren,
                    );

                    new_inserted_pairs.remove(old_tag);
                    old_index += 1;
                    continue;
                }

                // Not in the new list at all: remove and delete, unless the
                // metadata knows it resurfaced under another parent.
                if !new_remaining_pairs.contains(old_tag) {
                    trace!(
                        "differ: removing tag [{}] absent from the new list",
                        old_tag
                    );

                    // Position and parent cannot match anything here: this
                    // Remove happens amid reordering and always executes.
                    let (_, should_delete, update_node) =
                        metadata.should_remove_delete_update(Tag::NONE, old_pair.node, -1);

                    remove_mutations.push(ShadowViewMutation::remove(
                        parent_view.clone(),
                        old_pair.view.clone(),
                        old_index as i32,
                    ));

                    if should_delete {
                        delete_mutations.push(ShadowViewMutation::delete(old_pair.view.clone()));
                    }
                    if let Some(update_node) = update_node {
                        let new_tree_view = ShadowView::from(update_node);
                        if new_tree_view != old_pair.view {
                            update_mutations.push(ShadowViewMutation::update(
                                parent_view.clone(),
                                old_pair.view.clone(),
                                new_tree_view,
                                -1,
                            ));
                        }
                    }

                    diff_children(
                        &mut destructive_downward_mutations,
                        metadata,
                        old_pair.view.clone(),
                        slice_child_shadow_node_view_pairs(old_pair.node),
                        Vec::new(),
                    );

                    old_index += 1;
                    continue;
                }
            }

            // The new node has no counterpart at the old cursor yet: insert
            // it now; whether it also needs a Create is settled in the
            // sweep below once the old side has been fully consumed.
            let new_pair = &new_pairs[new_index];
            trace!(
                "differ: inserting tag [{}] at {}",
                new_pair.view.tag,
                new_index
            );

            metadata.mark_inserted(parent_view.tag, new_pair.node, new_index as i32);
            insert_mutations.push(ShadowViewMutation::insert(
                parent_view.clone(),
                new_pair.view.clone(),
                new_index as i32,
            ));
            new_inserted_pairs.insert(new_pair.view.tag, new_pair);
            new_index += 1;
        }

        // Create sweep: whatever is still marked inserted was never found
        // on the old side and needs its view (and subtree) built.
        for (tag, inserted_pair) in new_inserted_pairs.iter() {
            // Erased entries surface as zero tags; skip them rather than
            // trusting compaction alone.
            if tag.is_none() {
                continue;
            }
            let inserted_pair: &ShadowViewNodePair<'a> = inserted_pair;

            let (should_create, update_node) = metadata.should_create_update(inserted_pair.node);

            if should_create {
                create_mutations.push(ShadowViewMutation::create(inserted_pair.view.clone()));
            }
            if let Some(update_node) = update_node {
                let old_tree_view = ShadowView::from(update_node);
                if old_tree_view != inserted_pair.view {
                    update_mutations.push(ShadowViewMutation::update(
                        parent_view.clone(),
                        old_tree_view,
                        inserted_pair.view.clone(),
                        -1,
                    ));
                }
            }

            diff_children(
                &mut downward_mutations,
                metadata,
                inserted_pair.view.clone(),
                Vec::new(),
                slice_child_shadow_node_view_pairs(inserted_pair.node),
            );
        }
    }

    // All mutations in the order a naive host can apply safely. Removes go
    // out highest-index-first so earlier indices stay valid as each one
    // lands.
    mutations.extend(destructive_downward_mutations);
    mutations.extend(update_mutations);
    mutations.extend(remove_mutations.into_iter().rev());
    mutations.extend(delete_mutations);
    mutations.extend(create_mutations);
    mutations.extend(downward_mutations);
    mutations.extend(insert_mutations);
}
