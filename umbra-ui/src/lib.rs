pub mod diff;
pub mod mutation;
pub mod stub;
pub mod view;

pub use diff::{calculate_shadow_view_mutations, slice_child_shadow_node_view_pairs};
pub use mutation::{MutationKind, ShadowViewMutation};
pub use stub::StubViewTree;
pub use view::{ShadowView, ShadowViewNodePair};
