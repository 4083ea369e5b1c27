// src/reader/mod.rs
mod batch;
mod dive;
mod session;
mod source;

pub use batch::BatchDecoder;
pub use dive::{decode_dive, DiveDecode};
pub use session::{
    DecodeOutcome, Diagnostic, DiagnosticKind, DiveSessionDecoder, SessionRecords, SessionState,
};
pub use source::ByteSource;
