pub mod links;
pub mod resource_status;
pub mod storage;
pub mod warning;

pub use links::{LinkCategory, LinkEntry, LinkMap, RawLink, RawLinks};
pub use resource_status::ResourceStatus;
pub use warning::ValidationWarning;
