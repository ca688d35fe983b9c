//! Phase-2 validators for every group kind
//!
//! Each submodule owns the typed node of one family of groups together with the validator
//! that builds it from a phase-1 [`Group`](super::tree::Group).

pub mod defines;
pub mod other;
pub mod results;
pub mod shared;
pub mod states;

pub use defines::{validate_defines, DefinesGroup};
pub use other::{
    validate_foundation, validate_mutually, validate_resource, validate_topic, FoundationGroup,
    FoundationItem, MutuallyGroup, ResourceGroup, TopicGroup,
};
pub use results::{validate_result, ResultGroup, ResultKind};
pub use shared::{
    Field, MemberGroup, MetadataItem, MetadataSection, ProvidingItem, ProvidingSection,
    ReferenceGroup, SourceReference, ViewGroup,
};
pub use states::{validate_states, StatesGroup};
