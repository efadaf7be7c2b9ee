pub mod server;
pub mod subscriber;
pub mod supervisor;

pub use server::Server;
pub use subscriber::{Subscriber, SubscriberHandle};
pub use supervisor::{SubscriberInfo, SubscriberSupervisor, SubscriberSupervisorHandle};
