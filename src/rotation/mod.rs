pub mod exclusion;
pub mod selector;

pub use exclusion::ExclusionSet;
pub use selector::{NoTargetReason, no_target_reason, select_next};
