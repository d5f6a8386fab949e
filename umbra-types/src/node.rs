use std::sync::Arc;

use smartstring::{LazyCompact, SmartString};

use crate::layout::LayoutMetrics;
use crate::props::{EventEmitter, StateData, ViewProps};
use crate::tag::Tag;
use crate::traits::NodeTraits;

/// Component name of surface roots
pub const ROOT_COMPONENT_NAME: &str = "RootView";

pub type ComponentName = SmartString<LazyCompact>;

/// Identity class shared by every version of a logical element.
///
/// Cloning a tree for a new commit reuses the same family allocations, so
/// two nodes represent the same element iff their families are pointer-equal.
#[derive(Debug)]
pub struct NodeFamily {
    pub tag: Tag,
    pub component_name: ComponentName,
}

impl NodeFamily {
    pub fn new(tag: Tag, component_name: impl Into<ComponentName>) -> Arc<Self> {
        Arc::new(Self {
            tag,
            component_name: component_name.into(),
        })
    }
}

/// Immutable description of a UI element: identity, props, children,
/// pre-computed layout, and the trait bits the mounting layer dispatches on.
///
/// Nodes are sealed at construction and never mutated; new tree versions are
/// built from fresh nodes sharing families with their predecessors.
#[derive(Debug, Clone)]
pub struct ShadowNode {
    pub(crate) family: Arc<NodeFamily>,
    pub(crate) props: Arc<ViewProps>,
    pub(crate) event_emitter: Option<Arc<EventEmitter>>,
    pub(crate) state: Option<Arc<StateData>>,
    pub(crate) children: Arc<Vec<Arc<ShadowNode>>>,
    pub(crate) layout_metrics: LayoutMetrics,
    pub(crate) order_index: i32,
    pub(crate) traits: NodeTraits,
}

impl ShadowNode {
    pub fn tag(&self) -> Tag {
        self.family.tag
    }

    pub fn component_name(&self) -> &ComponentName {
        &self.family.component_name
    }

    pub fn family(&self) -> &Arc<NodeFamily> {
        &self.family
    }

    pub fn props(&self) -> &Arc<ViewProps> {
        &self.props
    }

    pub fn event_emitter(&self) -> Option<&Arc<EventEmitter>> {
        self.event_emitter.as_ref()
    }

    pub fn state(&self) -> Option<&Arc<StateData>> {
        self.state.as_ref()
    }

    pub fn children(&self) -> &[Arc<ShadowNode>] {
        &self.children
    }

    pub fn layout_metrics(&self) -> LayoutMetrics {
        self.layout_metrics
    }

    /// Z-order hint consumed by the differ's reorder pass. Zero means
    /// "source order".
    pub fn order_index(&self) -> i32 {
        self.order_index
    }

    pub fn traits(&self) -> NodeTraits {
        self.traits
    }
}

/// Two nodes represent the same logical element across tree versions iff
/// they share a family allocation.
pub fn same_family(a: &ShadowNode, b: &ShadowNode) -> bool {
    Arc::ptr_eq(&a.family, &b.family)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ShadowNodeBuilder;

    #[test]
    fn test_same_family_across_versions() {
        let family = NodeFamily::new(Tag(1), "View");
        let old = ShadowNodeBuilder::from_family(family.clone())
            .build()
            .unwrap();
        let new = ShadowNodeBuilder::from_family(family).build().unwrap();
        assert!(same_family(&old, &new));
    }

    #[test]
    fn test_distinct_families_with_same_tag() {
        let old = ShadowNodeBuilder::new(Tag(1), "View")
            .unwrap()
            .build()
            .unwrap();
        let new = ShadowNodeBuilder::new(Tag(1), "View")
            .unwrap()
            .build()
            .unwrap();
        assert!(!same_family(&old, &new));
    }
}
