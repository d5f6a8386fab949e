use umbra_types::{NodeTraits, Point, ShadowNode};

use crate::view::{ShadowView, ShadowViewNodePair};

/// Produces the ordered list of descendants the host must materialise as
/// views under `node`, with accumulated layout offsets folded into their
/// frames.
///
/// Wrappers that do not form views contribute their children directly as
/// siblings; stacking contexts are opaque from above and terminate the
/// walk.
pub fn slice_child_shadow_node_view_pairs(node: &ShadowNode) -> Vec<ShadowViewNodePair<'_>> {
    let mut pairs = Vec::new();

    // A leaf view owns its own children; they are not this flattener's
    // business.
    if node.traits().contains(NodeTraits::FORMS_VIEW)
        && !node.traits().contains(NodeTraits::FORMS_STACKING_CONTEXT)
    {
        return pairs;
    }

    slice_recursively(&mut pairs, Point::ZERO, node);

    pairs
}

fn slice_recursively<'a>(
    pairs: &mut Vec<ShadowViewNodePair<'a>>,
    layout_offset: Point,
    node: &'a ShadowNode,
) {
    for child in node.children() {
        // Hidden subtrees are not mounted. Android keeps them because its
        // mounting infrastructure handles visibility natively.
        #[cfg(not(target_os = "android"))]
        if child.traits().contains(NodeTraits::HIDDEN) {
            continue;
        }

        let mut view = ShadowView::from(child.as_ref());
        let mut origin = layout_offset;
        if !view.layout_metrics.is_empty() {
            origin += view.layout_metrics.frame.origin;
            view.layout_metrics.frame.origin += layout_offset;
        }

        if child.traits().contains(NodeTraits::FORMS_STACKING_CONTEXT) {
            pairs.push(ShadowViewNodePair { view, node: child });
        } else {
            if child.traits().contains(NodeTraits::FORMS_VIEW) {
                pairs.push(ShadowViewNodePair { view, node: child });
            }

            slice_recursively(pairs, origin, child);
        }
    }
}
