pub(crate) mod delivery;
pub(crate) mod pipeline;
pub(crate) mod registry;

// Re-export key components
pub use delivery::{ConcurrentDelivery, DeliveryStrategy, Fanout, SequentialDelivery};
pub use registry::{Registry, RegistryBuilder, RouteBuilder};
