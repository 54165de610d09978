use crate::scheduler::{JobId, JobState};

/// A request line after parsing. Raw strings never travel past this point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `JOB <text>`; the text is trimmed but may be empty here
    Job(String),
    /// `STATUS <id>`; `None` for an integer that can never name a job
    /// (zero, negative, or too large)
    Status(Option<JobId>),
    /// `FETCH`
    Fetch,
    /// `DONE <id>`
    Done(JobId),
    /// Anything that is not one of the above, with a short reason for logs
    Invalid(&'static str),
}

impl Command {
    /// Parse one framed line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (keyword, args) = match line.split_once(|c: char| c.is_ascii_whitespace()) {
            Some((keyword, args)) => (keyword, args.trim()),
            None => (line, ""),
        };

        let command = match keyword {
            "JOB" => Command::Job(args.to_string()),
            "STATUS" => {
                parse_status_id(args).map_or(Command::Invalid("bad job id"), Command::Status)
            }
            "DONE" => parse_id(args).map_or(Command::Invalid("bad job id"), Command::Done),
            "FETCH" if args.is_empty() => Command::Fetch,
            "FETCH" => Command::Invalid("FETCH takes no arguments"),
            _ => Command::Invalid("unknown command"),
        };
        Some(command)
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Job(text) => write!(f, "JOB {text}"),
            Command::Status(Some(id)) => write!(f, "STATUS {id}"),
            Command::Status(None) => write!(f, "STATUS 0"),
            Command::Fetch => write!(f, "FETCH"),
            Command::Done(id) => write!(f, "DONE {id}"),
            Command::Invalid(reason) => write!(f, "INVALID {reason}"),
        }
    }
}

fn parse_id(args: &str) -> Option<JobId> {
    if args.is_empty() || !args.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    args.parse().ok()
}

/// Like [`parse_id`] but accepts any integer, with an optional sign.
fn parse_status_id(args: &str) -> Option<Option<JobId>> {
    let (negative, digits) = match args.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, args.strip_prefix('+').unwrap_or(args)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if negative {
        return Some(None);
    }
    Some(digits.parse().ok().filter(|id| *id > 0))
}

/// A reply line sent back on the connection that issued the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `ID <id>`
    Id(JobId),
    /// `waiting` | `running` | `completed`, or `unknown` for `None`
    Status(Option<JobState>),
    /// `JOB <id> <text>`
    Job { id: JobId, text: String },
    NoJob,
    Ok,
    Err,
}

impl Response {
    /// Parse a reply line as read by a client or worker.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let response = match line {
            "waiting" => Response::Status(Some(JobState::Waiting)),
            "running" => Response::Status(Some(JobState::Running)),
            "completed" => Response::Status(Some(JobState::Completed)),
            "unknown" => Response::Status(None),
            "NOJOB" => Response::NoJob,
            "OK" => Response::Ok,
            "ERR" => Response::Err,
            _ => {
                if let Some(id) = line.strip_prefix("ID ") {
                    Response::Id(parse_id(id.trim())?)
                } else if let Some(rest) = line.strip_prefix("JOB ") {
                    let (id, text) = rest.trim_start().split_once(' ')?;
                    Response::Job {
                        id: parse_id(id)?,
                        text: text.to_string(),
                    }
                } else {
                    return None;
                }
            }
        };
        Some(response)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Response::Id(id) => write!(f, "ID {id}"),
            Response::Status(Some(state)) => write!(f, "{state}"),
            Response::Status(None) => write!(f, "unknown"),
            Response::Job { id, text } => write!(f, "JOB {id} {text}"),
            Response::NoJob => write!(f, "NOJOB"),
            Response::Ok => write!(f, "OK"),
            Response::Err => write!(f, "ERR"),
        }
    }
}
