use std::collections::BTreeMap;
use std::fmt::Write;

use umbra_types::{ShadowNode, Tag};

use crate::diff::slice_child_shadow_node_view_pairs;
use crate::mutation::{MutationKind, ShadowViewMutation};
use crate::view::ShadowView;

/// One host view: the last snapshot it was given plus its ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct StubView {
    pub view: ShadowView,
    pub children: Vec<Tag>,
}

/// Model of a native view hierarchy driven purely by mutation streams.
///
/// This is not a renderer: it exists to observe what a host would end up
/// with. Mutations are applied under the consumer contract — in list
/// order, with Insert indices taken against the already-shrunk child
/// vector — and any contract violation panics so misbehaving streams fail
/// loudly in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct StubViewTree {
    root: Tag,
    views: BTreeMap<Tag, StubView>,
}

impl StubViewTree {
    pub fn new(root_view: ShadowView) -> Self {
        let root = root_view.tag;
        let mut views = BTreeMap::new();
        views.insert(
            root,
            StubView {
                view: root_view,
                children: Vec::new(),
            },
        );
        Self { root, views }
    }

    /// Builds the host hierarchy a fully mounted `node` would produce:
    /// the flattened children of every view, recursively.
    pub fn from_shadow_node(node: &ShadowNode) -> Self {
        let mut tree = Self::new(ShadowView::from(node));
        tree.mount_children(node.tag(), node);
        tree
    }

    fn mount_children(&mut self, parent_tag: Tag, node: &ShadowNode) {
        for pair in slice_child_shadow_node_view_pairs(node) {
            let tag = pair.view.tag;
            self.views.insert(
                tag,
                StubView {
                    view: pair.view.clone(),
                    children: Vec::new(),
                },
            );
            self.views
                .get_mut(&parent_tag)
                .unwrap_or_else(|| panic!("parent [{parent_tag}] is not mounted"))
                .children
                .push(tag);
            self.mount_children(tag, pair.node);
        }
    }

    pub fn root(&self) -> Tag {
        self.root
    }

    pub fn get(&self, tag: Tag) -> Option<&StubView> {
        self.views.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn apply_all(&mut self, mutations: &[ShadowViewMutation]) {
        for mutation in mutations {
            self.apply(mutation);
        }
    }

    pub fn apply(&mut self, mutation: &ShadowViewMutation) {
        match mutation.kind {
            MutationKind::Create => {
                let tag = mutation.new_child.tag;
                let previous = self.views.insert(
                    tag,
                    StubView {
                        view: mutation.new_child.clone(),
                        children: Vec::new(),
                    },
                );
                assert!(previous.is_none(), "create for live tag [{tag}]");
            }
            MutationKind::Delete => {
                let tag = mutation.old_child.tag;
                let removed = self.views.remove(&tag);
                assert!(removed.is_some(), "delete for unknown tag [{tag}]");
            }
            MutationKind::Insert => {
                let parent_tag = mutation.parent.tag;
                let tag = mutation.new_child.tag;

                // Insertion may re-parent a surviving view; refresh its
                // snapshot either way.
                self.views
                    .get_mut(&tag)
                    .unwrap_or_else(|| panic!("insert of tag [{tag}] before its create"))
                    .view = mutation.new_child.clone();

                let children = &mut self
                    .views
                    .get_mut(&parent_tag)
                    .unwrap_or_else(|| panic!("insert under unknown parent [{parent_tag}]"))
                    .children;
                let index = mutation.index as usize;
                assert!(
                    index <= children.len(),
                    "insert of tag [{tag}] at {index} past the end of parent [{parent_tag}]"
                );
                children.insert(index, tag);
            }
            MutationKind::Remove => {
                let parent_tag = mutation.parent.tag;
                let tag = mutation.old_child.tag;
                let children = &mut self
                    .views
                    .get_mut(&parent_tag)
                    .unwrap_or_else(|| panic!("remove under unknown parent [{parent_tag}]"))
                    .children;
                let index = mutation.index as usize;
                assert_eq!(
                    children.get(index),
                    Some(&tag),
                    "remove of tag [{tag}] at {index} does not match parent [{parent_tag}]"
                );
                children.remove(index);
            }
            MutationKind::Update => {
                let tag = mutation.old_child.tag;
                self.views
                    .get_mut(&tag)
                    .unwrap_or_else(|| panic!("update of unknown tag [{tag}]"))
                    .view = mutation.new_child.clone();
            }
        }
    }

    /// Indented dump of the hierarchy for debugging failed comparisons.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        self.describe_view(self.root, 0, &mut out);
        out
    }

    fn describe_view(&self, tag: Tag, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        match self.views.get(&tag) {
            Some(stub) => {
                let _ = writeln!(
                    out,
                    "{}{}(tag={}) {{",
                    indent, stub.view.component_name, tag
                );
                for &child in &stub.children {
                    self.describe_view(child, depth + 1, out);
                }
                let _ = writeln!(out, "{indent}}}");
            }
            None => {
                let _ = writeln!(out, "{indent}(missing tag={tag})");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_types::{NodeTraits, ShadowNodeBuilder};

    fn view(tag: i32) -> ShadowView {
        ShadowView {
            tag: Tag(tag),
            ..Default::default()
        }
    }

    fn root_view() -> ShadowView {
        view(1)
    }

    #[test]
    fn test_create_insert_remove_delete_round() {
        let mut tree = StubViewTree::new(root_view());

        tree.apply(&ShadowViewMutation::create(view(2)));
        tree.apply(&ShadowViewMutation::insert(root_view(), view(2), 0));
        assert_eq!(tree.get(Tag(1)).unwrap().children, vec![Tag(2)]);

        tree.apply(&ShadowViewMutation::remove(root_view(), view(2), 0));
        tree.apply(&ShadowViewMutation::delete(view(2)));
        assert!(tree.get(Tag(1)).unwrap().children.is_empty());
        assert!(tree.get(Tag(2)).is_none());
    }

    #[test]
    #[should_panic(expected = "before its create")]
    fn test_insert_without_create_panics() {
        let mut tree = StubViewTree::new(root_view());
        tree.apply(&ShadowViewMutation::insert(root_view(), view(2), 0));
    }

    #[test]
    #[should_panic(expected = "does not match parent")]
    fn test_remove_wrong_index_panics() {
        let mut tree = StubViewTree::new(root_view());
        tree.apply(&ShadowViewMutation::create(view(2)));
        tree.apply(&ShadowViewMutation::insert(root_view(), view(2), 0));
        tree.apply(&ShadowViewMutation::remove(root_view(), view(2), 1));
    }

    #[test]
    fn test_from_shadow_node_flattens_wrappers() {
        let inner = ShadowNodeBuilder::new(Tag(3), "View")
            .unwrap()
            .build()
            .unwrap();
        let wrapper = ShadowNodeBuilder::new(Tag(2), "Wrapper")
            .unwrap()
            .traits(NodeTraits::empty())
            .child(inner)
            .build()
            .unwrap();
        let root = ShadowNodeBuilder::new(Tag(1), "RootView")
            .unwrap()
            .traits(NodeTraits::root_traits())
            .child(wrapper)
            .build()
            .unwrap();

        let tree = StubViewTree::from_shadow_node(&root);
        // The wrapper forms no view: the host sees its child directly
        // under the root.
        assert_eq!(tree.get(Tag(1)).unwrap().children, vec![Tag(3)]);
        assert!(tree.get(Tag(2)).is_none());
    }
}
