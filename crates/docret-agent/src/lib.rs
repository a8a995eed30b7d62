pub mod responder;

pub use responder::{Answer, Responder, Source};
