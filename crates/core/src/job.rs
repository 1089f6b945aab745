//! Work Experience parsing.
//!
//! Each `###` entry is read by a forward-only state machine:
//!
//! ```text
//! SeekCompany -> SeekLocation -> SeekDates -> Description -> Bullets
//! ```
//!
//! Optional fields are recognized by shape (bold wrapping, a `MM/YYYY` date)
//! rather than by line position. The machine never backtracks: when the
//! company line is not bold, the company stays empty and that line is read
//! as the location instead.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::model::{BulletGroup, Job};

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{2}/\d{4}").expect("valid date regex"));
static GROUP_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\*([^*]+?):\*\*$|^\*\*([^*]+?)\*\*:$").expect("valid group heading regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SeekCompany,
    SeekLocation,
    SeekDates,
    Description,
    Bullets,
}

/// How bullets inside a job are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grouping {
    /// `**Heading:**` and `#### Heading` lines open named groups.
    #[default]
    Headed,
    /// Headings are ignored; every bullet lands in one unnamed group.
    Flat,
}

/// Parses the body of a Work Experience section into jobs.
///
/// Lines before the first `### ` heading are ignored; a body without any
/// heading yields no jobs.
pub fn parse_jobs<S>(body: &[S], grouping: Grouping) -> Vec<Job>
where
    S: AsRef<str>,
{
    let mut jobs = Vec::new();
    let mut current: Option<JobParser> = None;

    for raw in body {
        let line = raw.as_ref();
        if let Some(title) = line.strip_prefix("### ") {
            if let Some(parser) = current.take() {
                jobs.push(parser.finish());
            }
            current = Some(JobParser::new(title.trim(), grouping));
            continue;
        }

        match current.as_mut() {
            Some(parser) => parser.feed(line),
            None => trace!(line, "dropping line before first job heading"),
        }
    }

    if let Some(parser) = current {
        jobs.push(parser.finish());
    }

    jobs
}

struct JobParser {
    state: State,
    grouping: Grouping,
    job: Job,
    description: Vec<String>,
    group: Option<BulletGroup>,
}

impl JobParser {
    fn new(title: &str, grouping: Grouping) -> Self {
        Self {
            state: State::SeekCompany,
            grouping,
            job: Job {
                title: title.to_string(),
                ..Job::default()
            },
            description: Vec::new(),
            group: None,
        }
    }

    fn feed(&mut self, raw: &str) {
        let line = raw.trim();

        loop {
            match self.state {
                State::SeekCompany => {
                    if line.is_empty() {
                        return;
                    }
                    self.state = State::SeekLocation;
                    if let Some(company) = bold_wrapped(line) {
                        self.job.company = company.to_string();
                        return;
                    }
                }
                State::SeekLocation => {
                    if line.is_empty() {
                        return;
                    }
                    self.state = State::SeekDates;
                    if !(line.starts_with("**") || line.starts_with(['-', '#'])) {
                        self.job.location = line.to_string();
                        return;
                    }
                }
                State::SeekDates => {
                    if line.is_empty() {
                        return;
                    }
                    self.state = State::Description;
                    if DATE.is_match(line) {
                        self.job.dates = line.to_string();
                        return;
                    }
                }
                State::Description => {
                    if line.starts_with("**") || line.starts_with("####") || line.starts_with("- ")
                    {
                        self.state = State::Bullets;
                        continue;
                    }
                    if !line.is_empty() {
                        self.description.push(line.to_string());
                    }
                    return;
                }
                State::Bullets => {
                    self.feed_bullet_line(line);
                    return;
                }
            }
        }
    }

    fn feed_bullet_line(&mut self, line: &str) {
        if let Some(heading) = group_heading(line) {
            if self.grouping == Grouping::Headed {
                self.close_group();
                self.group = Some(BulletGroup {
                    heading: Some(heading.to_string()),
                    bullets: Vec::new(),
                });
            }
            return;
        }

        if let Some(text) = line.strip_prefix("- ") {
            self.group
                .get_or_insert_with(BulletGroup::default)
                .bullets
                .push(text.trim().to_string());
            return;
        }

        if !line.is_empty() {
            trace!(line, job = %self.job.title, "dropping unrecognized job line");
        }
    }

    fn close_group(&mut self) {
        if let Some(group) = self.group.take() {
            self.job.groups.push(group);
        }
    }

    fn finish(mut self) -> Job {
        self.close_group();
        self.job.company_description = self.description.join(" ");
        debug!(
            title = %self.job.title,
            company = %self.job.company,
            groups = self.job.groups.len(),
            "parsed job entry"
        );
        self.job
    }
}

/// Returns the inner text of a line fully wrapped in `**…**`.
fn bold_wrapped(line: &str) -> Option<&str> {
    let inner = line.strip_prefix("**")?.strip_suffix("**")?;
    let inner = inner.trim_matches('*').trim();
    (!inner.is_empty()).then_some(inner)
}

fn group_heading(line: &str) -> Option<&str> {
    if let Some(heading) = line.strip_prefix("#### ") {
        return Some(heading.trim());
    }
    let caps = GROUP_HEADING.captures(line)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().trim())
}
