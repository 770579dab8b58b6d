use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::builder::ContentBuilder;
use crate::compiler;
use crate::error::ContentError;
use crate::types::{Agent, Role, Species, UtteranceRef};

/// Atomic statement kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Topic {
    Dummy,
    Estimate,
    Comingout,
    Divination,
    Divined,
    Identified,
    Guard,
    Guarded,
    Vote,
    Voted,
    Attack,
    Attacked,
    Agree,
    Disagree,
    #[serde(rename = "Over")]
    Over,
    #[serde(rename = "Skip")]
    Skip,
    /// The node is compound; see [`Content::operator`].
    Operator,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Dummy => "DUMMY",
            Topic::Estimate => "ESTIMATE",
            Topic::Comingout => "COMINGOUT",
            Topic::Divination => "DIVINATION",
            Topic::Divined => "DIVINED",
            Topic::Identified => "IDENTIFIED",
            Topic::Guard => "GUARD",
            Topic::Guarded => "GUARDED",
            Topic::Vote => "VOTE",
            Topic::Voted => "VOTED",
            Topic::Attack => "ATTACK",
            Topic::Attacked => "ATTACKED",
            Topic::Agree => "AGREE",
            Topic::Disagree => "DISAGREE",
            Topic::Over => "Over",
            Topic::Skip => "Skip",
            Topic::Operator => "OPERATOR",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "DUMMY" => Topic::Dummy,
            "ESTIMATE" => Topic::Estimate,
            "COMINGOUT" => Topic::Comingout,
            "DIVINATION" => Topic::Divination,
            "DIVINED" => Topic::Divined,
            "IDENTIFIED" => Topic::Identified,
            "GUARD" => Topic::Guard,
            "GUARDED" => Topic::Guarded,
            "VOTE" => Topic::Vote,
            "VOTED" => Topic::Voted,
            "ATTACK" => Topic::Attack,
            "ATTACKED" => Topic::Attacked,
            "AGREE" => Topic::Agree,
            "DISAGREE" => Topic::Disagree,
            "Over" => Topic::Over,
            "Skip" => Topic::Skip,
            "OPERATOR" => Topic::Operator,
            _ => return Err(ContentError::UnknownKeyword(s.to_string())),
        })
    }
}

/// Compound statement connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    Nop,
    Request,
    Inquire,
    Because,
    Day,
    Not,
    And,
    Or,
    Xor,
}

/// How many operands an operator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Nop => "NOP",
            Operator::Request => "REQUEST",
            Operator::Inquire => "INQUIRE",
            Operator::Because => "BECAUSE",
            Operator::Day => "DAY",
            Operator::Not => "NOT",
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Operator::Nop => Arity::Exactly(0),
            Operator::Request | Operator::Inquire | Operator::Not | Operator::Day => {
                Arity::Exactly(1)
            }
            Operator::Because | Operator::Xor => Arity::Exactly(2),
            Operator::And | Operator::Or => Arity::AtLeast(1),
        }
    }

    /// REQUEST and INQUIRE address their operand to the target rather
    /// than to the speaker.
    pub fn addresses_target(self) -> bool {
        matches!(self, Operator::Request | Operator::Inquire)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "NOP" => Operator::Nop,
            "REQUEST" => Operator::Request,
            "INQUIRE" => Operator::Inquire,
            "BECAUSE" => Operator::Because,
            "DAY" => Operator::Day,
            "NOT" => Operator::Not,
            "AND" => Operator::And,
            "OR" => Operator::Or,
            "XOR" => Operator::Xor,
            _ => return Err(ContentError::UnknownKeyword(s.to_string())),
        })
    }
}

/// A completed statement tree.
///
/// Values are immutable once built. `text` always holds the canonical
/// rendering, and equality compares nothing else.
#[derive(Debug, Clone)]
pub struct Content {
    pub(crate) topic: Topic,
    pub(crate) subject: Agent,
    pub(crate) target: Agent,
    pub(crate) role: Role,
    pub(crate) result: Species,
    pub(crate) utterance: UtteranceRef,
    pub(crate) operator: Operator,
    pub(crate) children: Vec<Content>,
    pub(crate) day: i32,
    pub(crate) text: String,
}

impl Content {
    pub fn new(builder: ContentBuilder) -> Self {
        builder.build()
    }

    /// Parses chat text. Text matching no statement form yields `Skip`.
    pub fn compile(text: &str) -> Self {
        compiler::compile(text)
    }

    /// Compiles every top-level parenthesized group found in `text`.
    pub fn contents_of(text: &str) -> Vec<Content> {
        compiler::contents_of(text)
    }

    pub fn empty() -> Self {
        ContentBuilder::empty().build()
    }

    pub fn skip() -> Self {
        ContentBuilder::skip().build()
    }

    pub fn over() -> Self {
        ContentBuilder::over().build()
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn subject(&self) -> Agent {
        self.subject
    }

    pub fn target(&self) -> Agent {
        self.target
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn result(&self) -> Species {
        self.result
    }

    pub fn utterance(&self) -> &UtteranceRef {
        &self.utterance
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn children(&self) -> &[Content] {
        &self.children
    }

    pub fn day(&self) -> i32 {
        self.day
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_operator(&self) -> bool {
        self.topic == Topic::Operator
    }

    /// Copy of this statement spoken by `subject`, with its subtree
    /// re-completed and re-rendered.
    pub fn with_subject(&self, subject: Agent) -> Content {
        self.clone().replace_subject(subject)
    }

    /// Drops a leading `Agent[NN]`/`ANY` token from rendered text.
    pub fn strip_subject(text: &str) -> &str {
        crate::printer::strip_subject(text)
    }
}

impl PartialEq for Content {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Content {}

impl Hash for Content {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl fmt::Display for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromStr for Content {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(compiler::compile(s))
    }
}

impl From<ContentBuilder> for Content {
    fn from(builder: ContentBuilder) -> Self {
        builder.build()
    }
}
