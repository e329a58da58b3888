pub mod instance;
pub mod snapshot;

pub use instance::InstanceId;
pub use snapshot::ProductSnapshot;
