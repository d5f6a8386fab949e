use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::layout::LayoutMetrics;
use crate::node::{ComponentName, NodeFamily, ShadowNode};
use crate::props::{EventEmitter, StateData, ViewProps};
use crate::tag::Tag;
use crate::traits::NodeTraits;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    #[error("tag 0 is reserved as the erased sentinel and cannot identify a node")]
    ZeroTag,

    #[error("duplicate tag {0} among the children of tag {1}")]
    DuplicateChildTag(Tag, Tag),
}

/// Fluent construction for sealed shadow nodes.
///
/// Trees are built leaves-first; `build` seals the node. New versions of an
/// existing element are built with `from_family` so both versions compare as
/// the same identity.
pub struct ShadowNodeBuilder {
    family: Arc<NodeFamily>,
    props: Arc<ViewProps>,
    event_emitter: Option<Arc<EventEmitter>>,
    state: Option<Arc<StateData>>,
    children: Vec<Arc<ShadowNode>>,
    layout_metrics: LayoutMetrics,
    order_index: i32,
    traits: NodeTraits,
}

impl ShadowNodeBuilder {
    pub fn new(tag: Tag, component_name: impl Into<ComponentName>) -> Result<Self, TreeError> {
        if tag.is_none() {
            return Err(TreeError::ZeroTag);
        }
        Ok(Self::from_family(NodeFamily::new(tag, component_name)))
    }

    pub fn from_family(family: Arc<NodeFamily>) -> Self {
        Self {
            family,
            props: Arc::new(ViewProps::default()),
            event_emitter: None,
            state: None,
            children: Vec::new(),
            layout_metrics: LayoutMetrics::EMPTY,
            order_index: 0,
            traits: NodeTraits::FORMS_VIEW,
        }
    }

    pub fn props(mut self, props: ViewProps) -> Self {
        self.props = Arc::new(props);
        self
    }

    pub fn shared_props(mut self, props: Arc<ViewProps>) -> Self {
        self.props = props;
        self
    }

    pub fn event_emitter(mut self, emitter: Arc<EventEmitter>) -> Self {
        self.event_emitter = Some(emitter);
        self
    }

    pub fn state(mut self, state: StateData) -> Self {
        self.state = Some(Arc::new(state));
        self
    }

    pub fn layout_metrics(mut self, metrics: LayoutMetrics) -> Self {
        self.layout_metrics = metrics;
        self
    }

    pub fn order_index(mut self, order_index: i32) -> Self {
        self.order_index = order_index;
        self
    }

    pub fn traits(mut self, traits: NodeTraits) -> Self {
        self.traits = traits;
        self
    }

    pub fn child(mut self, child: Arc<ShadowNode>) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Arc<ShadowNode>>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn build(self) -> Result<Arc<ShadowNode>, TreeError> {
        let mut seen = HashSet::with_capacity(self.children.len());
        for child in &self.children {
            if !seen.insert(child.tag()) {
                return Err(TreeError::DuplicateChildTag(child.tag(), self.family.tag));
            }
        }

        Ok(Arc::new(ShadowNode {
            family: self.family,
            props: self.props,
            event_emitter: self.event_emitter,
            state: self.state,
            children: Arc::new(self.children),
            layout_metrics: self.layout_metrics,
            order_index: self.order_index,
            traits: self.traits,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_tag_rejected() {
        let result = ShadowNodeBuilder::new(Tag::NONE, "View");
        assert!(matches!(result, Err(TreeError::ZeroTag)));
    }

    #[test]
    fn test_duplicate_child_tags_rejected() {
        let a = ShadowNodeBuilder::new(Tag(2), "View")
            .unwrap()
            .build()
            .unwrap();
        let a_again = ShadowNodeBuilder::new(Tag(2), "View")
            .unwrap()
            .build()
            .unwrap();
        let result = ShadowNodeBuilder::new(Tag(1), "View")
            .unwrap()
            .child(a)
            .child(a_again)
            .build();
        assert_eq!(
            result.err(),
            Some(TreeError::DuplicateChildTag(Tag(2), Tag(1)))
        );
    }

    #[test]
    fn test_builder_defaults() {
        let node = ShadowNodeBuilder::new(Tag(7), "View")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(node.tag(), Tag(7));
        assert_eq!(node.order_index(), 0);
        assert!(node.layout_metrics().is_empty());
        assert!(node.traits().contains(NodeTraits::FORMS_VIEW));
        assert!(node.children().is_empty());
    }
}
