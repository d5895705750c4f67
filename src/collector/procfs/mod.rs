//! Parsers for Linux `/proc` filesystem text.
//!
//! Pure functions over strings: each kernel source's ad-hoc grammar is
//! isolated behind a named parse function returning a structured record,
//! so malformed-input edge cases can be unit-tested independently of the
//! exposition emitter.

pub mod parser;
