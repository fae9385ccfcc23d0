//! Synthesizes case accessors for Swift enums: for every case a computed
//! `var` named after it, typed as an optional of the payload, readable and
//! settable without a `switch`.
//!
//! The engine is [`augment::augment`]; parsing, rendering and file handling
//! live around it.

pub mod ir;
pub mod index;
pub mod synth;
pub mod augment;
pub mod parser;
pub mod codegen;
pub mod rewrite;
pub mod config;
pub mod driver;
pub mod cli;
pub mod error;

pub use augment::augment;
