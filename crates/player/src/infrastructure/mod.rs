pub mod http_client;
pub mod messaging;
pub mod platform;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use http_client::HttpApiAdapter;
pub use messaging::EventBus;
