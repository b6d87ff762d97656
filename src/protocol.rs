//! Parsing of manager commands.
//!
//! The manager speaks a line-oriented protocol: each command starts with an
//! upper-case keyword, optionally followed by a space and arguments. Each verb
//! has a fixed grammar: how many fields a line carries, their type, and the
//! character separating them. `BOARD` is the only multi-line verb; each of its
//! following lines is one `x,y,type` group until a `DONE` line.
//!
//! ## Supported Commands
//!
//! - `START n`, `RECTSTART w,h`, `RESTART`, `END`, `ABOUT`
//! - `TURN x,y`, `BEGIN`, `BOARD` ... `DONE`, `TAKEBACK x,y`, `PLAY x,y`
//! - `INFO timeout_turn|timeout_match|max_memory|time_left|game_type|rule n`
//! - `INFO folder path`, `INFO evaluate x,y`

/// Every command the manager can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Start,
    RectStart,
    Restart,
    Turn,
    Begin,
    Board,
    InfoTimeoutTurn,
    InfoTimeoutMatch,
    InfoMaxMemory,
    InfoTimeLeft,
    InfoGameType,
    InfoRule,
    InfoFolder,
    InfoEvaluate,
    Takeback,
    Play,
    End,
    About,
}

/// Type of every field of a verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Text,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            FieldType::Integer => "int32",
            FieldType::Text => "string",
        }
    }
}

/// Grammar of one verb.
#[derive(Debug, Clone, Copy)]
pub struct VerbSpec {
    pub keyword: &'static str,
    pub verb: Verb,
    /// Fields per line (per group for multi-line verbs)
    pub fields: usize,
    pub kind: FieldType,
    pub separator: char,
    /// Line ending a multi-line verb
    pub terminator: Option<&'static str>,
}

const fn grammar(keyword: &'static str, verb: Verb, fields: usize, kind: FieldType) -> VerbSpec {
    VerbSpec {
        keyword,
        verb,
        fields,
        kind,
        separator: ',',
        terminator: None,
    }
}

/// The grammar table.
pub const VERBS: &[VerbSpec] = &[
    grammar("START", Verb::Start, 1, FieldType::Integer),
    grammar("RECTSTART", Verb::RectStart, 2, FieldType::Integer),
    grammar("RESTART", Verb::Restart, 0, FieldType::Integer),
    grammar("TURN", Verb::Turn, 2, FieldType::Integer),
    grammar("BEGIN", Verb::Begin, 0, FieldType::Integer),
    VerbSpec {
        terminator: Some("DONE"),
        ..grammar("BOARD", Verb::Board, 3, FieldType::Integer)
    },
    grammar("INFO timeout_turn", Verb::InfoTimeoutTurn, 1, FieldType::Integer),
    grammar("INFO timeout_match", Verb::InfoTimeoutMatch, 1, FieldType::Integer),
    grammar("INFO max_memory", Verb::InfoMaxMemory, 1, FieldType::Integer),
    grammar("INFO time_left", Verb::InfoTimeLeft, 1, FieldType::Integer),
    grammar("INFO game_type", Verb::InfoGameType, 1, FieldType::Integer),
    grammar("INFO rule", Verb::InfoRule, 1, FieldType::Integer),
    grammar("INFO folder", Verb::InfoFolder, 1, FieldType::Text),
    grammar("INFO evaluate", Verb::InfoEvaluate, 2, FieldType::Integer),
    grammar("TAKEBACK", Verb::Takeback, 2, FieldType::Integer),
    grammar("PLAY", Verb::Play, 2, FieldType::Integer),
    grammar("END", Verb::End, 0, FieldType::Integer),
    grammar("ABOUT", Verb::About, 0, FieldType::Integer),
];

/// One parsed argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Int(i32),
    Text(String),
}

impl Arg {
    /// Integer value; text arguments read as 0.
    pub fn int(&self) -> i32 {
        match self {
            Arg::Int(v) => *v,
            Arg::Text(_) => 0,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Arg::Text(s) => s,
            Arg::Int(_) => "",
        }
    }
}

/// A verb with its typed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    pub args: Vec<Arg>,
}

impl Command {
    /// Integer argument `i`, or 0 if missing.
    pub fn int(&self, i: usize) -> i32 {
        self.args.get(i).map_or(0, Arg::int)
    }
}

/// Why a command could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No keyword matches the line
    Unknown(String),
    /// Wrong number of fields
    ArgumentCount {
        verb: &'static str,
        expected: usize,
        given: usize,
    },
    /// A field does not have the verb's type
    ArgumentType {
        verb: &'static str,
        token: String,
        expected: &'static str,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Unknown(command) => write!(f, "unknown command: {command}"),
            ParseError::ArgumentCount {
                verb,
                expected,
                given,
            } => write!(
                f,
                "invalid argument count for {verb}: expected {expected}, given {given}"
            ),
            ParseError::ArgumentType {
                verb,
                token,
                expected,
            } => write!(f, "wrong argument type for {verb}: {token} is not {expected}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Find the verb a line starts with.
///
/// A keyword matches if the line is exactly the keyword or continues with a
/// space; the longest matching keyword wins.
pub fn lookup(line: &str) -> Option<&'static VerbSpec> {
    VERBS
        .iter()
        .filter(|s| {
            line.strip_prefix(s.keyword)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
        })
        .max_by_key(|s| s.keyword.len())
}

/// Parse one command line.
///
/// Multi-line verbs pull their remaining lines from `more`, stopping at the
/// terminator line or when `more` runs dry.
pub fn parse_command<I>(line: &str, more: &mut I) -> Result<Command, ParseError>
where
    I: Iterator<Item = String>,
{
    let line = line.trim();
    let grammar = lookup(line).ok_or_else(|| ParseError::Unknown(line.to_string()))?;
    let rest = &line[grammar.keyword.len()..];

    if let Some(terminator) = grammar.terminator {
        // The whole block is consumed even when a line is bad, and the first
        // error is reported once the terminator has been read.
        let mut error = (!rest.is_empty()).then(|| ParseError::ArgumentCount {
            verb: grammar.keyword,
            expected: 0,
            given: rest[1..].split(grammar.separator).count(),
        });
        let mut args = Vec::new();
        for next in more.by_ref() {
            let next = next.trim();
            if next == terminator {
                break;
            }
            if error.is_some() {
                continue;
            }
            match parse_arguments(grammar, next) {
                Ok(line_args) => args.extend(line_args),
                Err(e) => error = Some(e),
            }
        }
        if let Some(e) = error {
            return Err(e);
        }
        return Ok(Command {
            verb: grammar.verb,
            args,
        });
    }

    if rest.is_empty() {
        if grammar.fields > 0 {
            return Err(ParseError::ArgumentCount {
                verb: grammar.keyword,
                expected: grammar.fields,
                given: 0,
            });
        }
        return Ok(Command {
            verb: grammar.verb,
            args: Vec::new(),
        });
    }

    Ok(Command {
        verb: grammar.verb,
        args: parse_arguments(grammar, &rest[1..])?,
    })
}

/// Split and convert the fields of one argument line.
pub fn parse_arguments(grammar: &VerbSpec, text: &str) -> Result<Vec<Arg>, ParseError> {
    let text = text.trim();
    let fields: Vec<&str> = match grammar.fields {
        0 if text.is_empty() => Vec::new(),
        1 => vec![text],
        _ => text.split(grammar.separator).collect(),
    };
    if fields.len() != grammar.fields {
        return Err(ParseError::ArgumentCount {
            verb: grammar.keyword,
            expected: grammar.fields,
            given: fields.len(),
        });
    }

    fields
        .into_iter()
        .map(|field| {
            let field = field.trim();
            match grammar.kind {
                FieldType::Integer => field.parse::<i32>().map(Arg::Int).map_err(|_| {
                    ParseError::ArgumentType {
                        verb: grammar.keyword,
                        token: field.to_string(),
                        expected: grammar.kind.name(),
                    }
                }),
                FieldType::Text => Ok(Arg::Text(field.to_string())),
            }
        })
        .collect()
}
