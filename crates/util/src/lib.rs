pub mod encoding;
pub mod http;
pub mod redaction;

pub use encoding::*;
pub use redaction::*;
