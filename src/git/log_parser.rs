use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{debug, warn};

use crate::error_handling::{ErrorReporter, GraphError, InputValidator};
use crate::models::{CommitRecord, GraphInput};

pub const FIELD_SEP: char = '\x01';
pub const ENTRY_SEP: char = '\x02';

/// `--pretty=format:` string understood by [`LogParser`].
pub const GIT_LOG_FORMAT: &str = "%H\x01%P\x01%d\x01%an\x01%ae\x01%ad\x01%s\x01%b\x02";

/// Arguments for a `git log` run whose output [`LogParser::parse`] accepts.
pub fn git_log_args(limit: Option<usize>) -> Vec<String> {
    let mut args = vec![
        "log".to_string(),
        "--all".to_string(),
        "--topo-order".to_string(),
        "--date=iso-strict".to_string(),
        format!("--pretty=format:{}", GIT_LOG_FORMAT),
    ];
    if let Some(limit) = limit {
        args.push(format!("--max-count={}", limit));
    }
    args
}

/// Records read from one log dump.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub commits: Vec<CommitRecord>,
    /// Branch named by a `HEAD -> branch` decoration.
    pub head_branch: Option<String>,
    pub skipped: usize,
}

impl ParsedLog {
    pub fn into_input(self, remotes: Vec<String>) -> GraphInput {
        GraphInput {
            commits: self.commits,
            current_branch: self.head_branch,
            remotes,
            ..Default::default()
        }
    }
}

enum Decoration<'a> {
    Head(&'a str),
    Branch(&'a str),
    Tag(&'a str),
    Ignored,
}

pub struct LogParser {
    decorations: Regex,
}

impl LogParser {
    pub fn new() -> Result<Self, GraphError> {
        Ok(Self {
            decorations: Regex::new(r"^\s*\((?P<refs>.*)\)\s*$")?,
        })
    }

    /// Parse a whole log. Malformed entries are skipped with a warning.
    pub fn parse(&self, output: &str) -> ParsedLog {
        let mut parsed = ParsedLog::default();

        for (entry_idx, entry) in output.split(ENTRY_SEP).enumerate() {
            if entry.trim().is_empty() {
                continue;
            }
            match self.parse_entry(entry_idx, entry, &mut parsed.head_branch) {
                Ok(record) => parsed.commits.push(record),
                Err(e) => {
                    ErrorReporter::log_error(&e, "Skipping log entry");
                    parsed.skipped += 1;
                }
            }
        }

        if parsed.skipped > 0 {
            warn!("Skipped {} malformed log entries", parsed.skipped);
        }
        debug!("Parsed {} commits from log output", parsed.commits.len());
        parsed
    }

    fn parse_entry(
        &self,
        entry_idx: usize,
        entry: &str,
        head_branch: &mut Option<String>,
    ) -> Result<CommitRecord, GraphError> {
        let fields: Vec<&str> = entry.trim_start_matches(&['\n', '\r'][..]).split(FIELD_SEP).collect();
        if fields.len() < 7 {
            return Err(GraphError::parse(
                entry_idx,
                format!("expected at least 7 fields, found {}", fields.len()),
            ));
        }

        let hash = fields[0].trim();
        InputValidator::validate_commit_id(hash)
            .map_err(|e| GraphError::parse(entry_idx, e.to_string()))?;

        let mut record = CommitRecord::new(hash, &[]);
        record.parents = fields[1].split_whitespace().map(str::to_string).collect();
        record.subject = fields[6].trim().to_string();
        record.author = match fields[4].trim() {
            "" => fields[3].trim().to_string(),
            email => format!("{} <{}>", fields[3].trim(), email),
        };
        record.date = parse_date(fields[5]);

        for decoration in self.split_decorations(fields[2]) {
            match classify_decoration(decoration) {
                Decoration::Head(branch) => {
                    if head_branch.is_none() {
                        *head_branch = Some(branch.to_string());
                    }
                    record.branches.push(branch.to_string());
                }
                Decoration::Branch(branch) => record.branches.push(branch.to_string()),
                Decoration::Tag(tag) => record.tags.push(tag.to_string()),
                Decoration::Ignored => {}
            }
        }

        Ok(record)
    }

    /// `" (HEAD -> main, tag: v1.1, origin/master)"` into its comma separated items.
    fn split_decorations<'a>(&self, raw: &'a str) -> Vec<&'a str> {
        let inner = match self.decorations.captures(raw).and_then(|c| c.name("refs")) {
            Some(refs) => refs.as_str(),
            None => raw.trim(),
        };
        inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect()
    }
}

fn classify_decoration(item: &str) -> Decoration<'_> {
    if let Some(branch) = item.strip_prefix("HEAD -> ") {
        return Decoration::Head(branch.trim());
    }
    if let Some(tag) = item.strip_prefix("tag: ") {
        return Decoration::Tag(tag.trim());
    }
    if item == "HEAD" || item.ends_with("/HEAD") {
        return Decoration::Ignored;
    }
    if item.starts_with("refs/")
        && !["refs/heads/", "refs/remotes/", "refs/tags/"]
            .iter()
            .any(|prefix| item.starts_with(prefix))
    {
        // refs/stash, refs/notes/..
        return Decoration::Ignored;
    }
    Decoration::Branch(item)
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => Some(date.with_timezone(&Utc)),
        Err(e) => {
            debug!("Unparseable commit date '{}': {}", raw, e);
            None
        }
    }
}
