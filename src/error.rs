//! Errors raised around the synthesis engine. The engine itself cannot fail.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{line}:{column}: unterminated string literal")]
    UnterminatedString { line: usize, column: usize },

    #[error("{line}:{column}: unterminated block comment")]
    UnterminatedComment { line: usize, column: usize },

    #[error("{line}:{column}: unexpected `{found}`, expected `{expected}`")]
    Unbalanced { line: usize, column: usize, found: char, expected: char },

    #[error("{line}:{column}: `{open}` is never closed")]
    Unclosed { line: usize, column: usize, open: char },

    #[error("{line}:{column}: unexpected end of input in {context}")]
    UnexpectedEof { line: usize, column: usize, context: &'static str },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("invalid config {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("invalid exclude pattern `{pattern}`: {source}")]
    Exclude { pattern: String, source: glob::PatternError },
}

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("{}:{source}", path.display())]
    Parse { path: PathBuf, source: ParseError },

    #[error("invalid glob pattern `{pattern}`: {source}")]
    Pattern { pattern: String, source: glob::PatternError },

    #[error("glob error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("glob pattern matched no files: {0}")]
    NoMatches(String),
}
