use std::sync::Arc;

use umbra_types::{
    ComponentName, EventEmitter, LayoutMetrics, ShadowNode, StateData, Tag, ViewProps,
    ROOT_COMPONENT_NAME,
};

/// Value-type snapshot of a shadow node, carried inside mutations.
///
/// The default value is the "no view" sentinel used as the parent of root
/// updates and as the empty slot in mutation records.
#[derive(Debug, Clone)]
pub struct ShadowView {
    pub tag: Tag,
    pub component_name: ComponentName,
    pub props: Arc<ViewProps>,
    pub event_emitter: Option<Arc<EventEmitter>>,
    pub layout_metrics: LayoutMetrics,
    pub state: Option<Arc<StateData>>,
}

impl Default for ShadowView {
    fn default() -> Self {
        Self {
            tag: Tag::NONE,
            component_name: ROOT_COMPONENT_NAME.into(),
            props: Arc::new(ViewProps::default()),
            event_emitter: None,
            layout_metrics: LayoutMetrics::EMPTY,
            state: None,
        }
    }
}

impl From<&ShadowNode> for ShadowView {
    fn from(node: &ShadowNode) -> Self {
        Self {
            tag: node.tag(),
            component_name: node.component_name().clone(),
            props: node.props().clone(),
            event_emitter: node.event_emitter().cloned(),
            layout_metrics: node.layout_metrics(),
            state: node.state().cloned(),
        }
    }
}

impl PartialEq for ShadowView {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
            && self.component_name == other.component_name
            && self.props == other.props
            && emitter_eq(&self.event_emitter, &other.event_emitter)
            && self.layout_metrics == other.layout_metrics
            && self.state == other.state
    }
}

// Emitters carry no comparable payload; identity is the only meaningful
// equivalence.
fn emitter_eq(a: &Option<Arc<EventEmitter>>, b: &Option<Arc<EventEmitter>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

/// A flattened view snapshot together with the node it was projected from.
/// The view travels into mutations; the node pointer drives recursion.
#[derive(Debug, Clone)]
pub struct ShadowViewNodePair<'a> {
    pub view: ShadowView,
    pub node: &'a ShadowNode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use umbra_types::{Color, ShadowNodeBuilder};

    #[test]
    fn test_default_view_is_sentinel() {
        let view = ShadowView::default();
        assert!(view.tag.is_none());
        assert_eq!(&*view.component_name, ROOT_COMPONENT_NAME);
        assert!(view.layout_metrics.is_empty());
    }

    #[test]
    fn test_projection_compares_props_by_value() {
        let node = ShadowNodeBuilder::new(Tag(1), "View")
            .unwrap()
            .props(ViewProps::with_background_color(Color::BLACK))
            .build()
            .unwrap();
        let other = ShadowNodeBuilder::from_family(node.family().clone())
            .props(ViewProps::with_background_color(Color::BLACK))
            .build()
            .unwrap();
        assert_eq!(ShadowView::from(node.as_ref()), ShadowView::from(other.as_ref()));
    }

    #[test]
    fn test_emitters_compare_by_identity() {
        let emitter = Arc::new(EventEmitter::new());
        let family = umbra_types::NodeFamily::new(Tag(1), "View");
        let a = ShadowNodeBuilder::from_family(family.clone())
            .event_emitter(emitter.clone())
            .build()
            .unwrap();
        let b = ShadowNodeBuilder::from_family(family.clone())
            .event_emitter(emitter)
            .build()
            .unwrap();
        let c = ShadowNodeBuilder::from_family(family)
            .event_emitter(Arc::new(EventEmitter::new()))
            .build()
            .unwrap();

        assert_eq!(ShadowView::from(a.as_ref()), ShadowView::from(b.as_ref()));
        assert_ne!(ShadowView::from(a.as_ref()), ShadowView::from(c.as_ref()));
    }
}
