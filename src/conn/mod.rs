pub mod discovery;
pub mod transport;

pub use discovery::{default_candidates, detect_port, resolve_port};
pub use transport::{Serial, Transport};
