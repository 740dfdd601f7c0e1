mod errors;
mod text_decoder;

pub use errors::DecodeError;
pub use text_decoder::{decode, RawLine, SourceEncoding};
