// netprov-api: Async Rust clients for the intent controller and policy controller APIs

pub mod error;
pub mod intent;
pub mod policy;
pub mod transport;

pub use error::Error;
pub use intent::IntentClient;
pub use policy::PolicyClient;
pub use transport::{TlsMode, TransportConfig};
