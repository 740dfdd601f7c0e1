use thiserror::Error;

use crate::decoder::SourceEncoding;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Decode error: no candidate encodings were configured")]
    NoCandidates,
    #[error("Decode error: input is not valid in any of [{}]", join(.attempted))]
    Exhausted {
        attempted: Vec<SourceEncoding>
    }
}

fn join(encodings: &[SourceEncoding]) -> String {
    encodings.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
