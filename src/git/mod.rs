//! Record suppliers: a git2-backed repository reader and a `git log` text parser.

pub mod log_parser;
pub mod repository;

pub use log_parser::{git_log_args, LogParser, ParsedLog, GIT_LOG_FORMAT};
pub use repository::GitRepository;
