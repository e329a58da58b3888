pub mod cycle;
pub mod tasks;

pub use cycle::RefreshCoordinator;
pub use tasks::FetchTaskRegistry;
