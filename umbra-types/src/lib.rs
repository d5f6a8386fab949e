pub mod builder;
pub mod layout;
pub mod node;
pub mod props;
pub mod tag;
pub mod traits;
pub mod transform;

pub use builder::{ShadowNodeBuilder, TreeError};
pub use layout::{LayoutMetrics, Point, Rect, Size};
pub use node::{same_family, ComponentName, NodeFamily, ShadowNode, ROOT_COMPONENT_NAME};
pub use props::{Color, EventEmitter, StateData, ViewProps};
pub use tag::Tag;
pub use traits::NodeTraits;
pub use transform::Transform;
