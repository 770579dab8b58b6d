use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ast::{Content, Operator, Topic};
use crate::builder::ContentBuilder;
use crate::compiler;
use crate::error::ContentError;

/// A player handle.
///
/// Index 0 doubles as "no agent" and "subject left unspecified"; 0xFF is
/// the wildcard `ANY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Agent(u32);

impl Agent {
    pub const NONE: Agent = Agent(0);
    pub const UNSPEC: Agent = Agent::NONE;
    pub const ANY: Agent = Agent(0xff);

    pub fn new(index: i64) -> Result<Self, ContentError> {
        u32::try_from(index)
            .map(Agent)
            .map_err(|_| ContentError::InvalidAgentIndex(index))
    }

    pub(crate) const fn from_index(index: u32) -> Self {
        Agent(index)
    }

    pub const fn index(self) -> u32 {
        self.0
    }

    pub fn is_unspec(self) -> bool {
        self == Agent::UNSPEC
    }

    pub fn is_any(self) -> bool {
        self == Agent::ANY
    }

    /// Reads an `Agent[NN]` or `ANY` token. Anything else is `UNSPEC`.
    pub fn compile(token: &str) -> Agent {
        crate::parser::agent_token(token.trim()).unwrap_or(Agent::UNSPEC)
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Agent[{:02}]", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Unc,
    Bodyguard,
    Fox,
    Freemason,
    Medium,
    Possessed,
    Seer,
    Villager,
    Werewolf,
    Any,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Unc => "UNC",
            Role::Bodyguard => "BODYGUARD",
            Role::Fox => "FOX",
            Role::Freemason => "FREEMASON",
            Role::Medium => "MEDIUM",
            Role::Possessed => "POSSESSED",
            Role::Seer => "SEER",
            Role::Villager => "VILLAGER",
            Role::Werewolf => "WEREWOLF",
            Role::Any => "ANY",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "UNC" => Role::Unc,
            "BODYGUARD" => Role::Bodyguard,
            "FOX" => Role::Fox,
            "FREEMASON" => Role::Freemason,
            "MEDIUM" => Role::Medium,
            "POSSESSED" => Role::Possessed,
            "SEER" => Role::Seer,
            "VILLAGER" => Role::Villager,
            "WEREWOLF" => Role::Werewolf,
            "ANY" => Role::Any,
            other => return Err(ContentError::UnknownRole(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Species {
    #[default]
    Unc,
    Human,
    Werewolf,
    Any,
}

impl Species {
    pub fn as_str(self) -> &'static str {
        match self {
            Species::Unc => "UNC",
            Species::Human => "HUMAN",
            Species::Werewolf => "WEREWOLF",
            Species::Any => "ANY",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "UNC" => Species::Unc,
            "HUMAN" => Species::Human,
            "WEREWOLF" => Species::Werewolf,
            "ANY" => Species::Any,
            other => return Err(ContentError::UnknownSpecies(other.to_string())),
        })
    }
}

/// Alive/dead state as reported in the game snapshot's status map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    #[default]
    Unc,
    Alive,
    Dead,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Unc => "UNC",
            Status::Alive => "ALIVE",
            Status::Dead => "DEAD",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "UNC" => Status::Unc,
            "ALIVE" => Status::Alive,
            "DEAD" => Status::Dead,
            other => return Err(ContentError::UnknownStatus(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UtteranceKind {
    #[default]
    Talk,
    Whisper,
}

impl UtteranceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UtteranceKind::Talk => "TALK",
            UtteranceKind::Whisper => "WHISPER",
        }
    }
}

impl fmt::Display for UtteranceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UtteranceKind {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TALK" => Ok(UtteranceKind::Talk),
            "WHISPER" => Ok(UtteranceKind::Whisper),
            other => Err(ContentError::UnknownUtteranceKind(other.to_string())),
        }
    }
}

/// Talk/whisper record exactly as the game server sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtteranceRecord {
    pub day: i32,
    pub agent: i64,
    pub idx: i32,
    pub text: String,
    pub turn: i32,
}

/// An already-issued talk or whisper, referenced by AGREE/DISAGREE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtteranceRef {
    pub kind: UtteranceKind,
    pub day: i32,
    pub speaker: Agent,
    pub index: i32,
    pub text: String,
    pub turn: i32,
}

impl Default for UtteranceRef {
    fn default() -> Self {
        Self {
            kind: UtteranceKind::Talk,
            day: -1,
            speaker: Agent::NONE,
            index: -1,
            text: String::new(),
            turn: -1,
        }
    }
}

impl UtteranceRef {
    /// A bare back-reference carrying only what AGREE/DISAGREE print.
    pub fn reference(kind: UtteranceKind, day: i32, index: i32) -> Self {
        Self {
            kind,
            day,
            index,
            ..Self::default()
        }
    }

    pub fn from_record(kind: UtteranceKind, record: UtteranceRecord) -> Result<Self, ContentError> {
        Ok(Self {
            kind,
            day: record.day,
            speaker: Agent::new(record.agent)?,
            index: record.idx,
            text: record.text,
            turn: record.turn,
        })
    }

    /// Compiles the chat payload of this utterance.
    pub fn content(&self) -> Content {
        compiler::compile(&self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeRecord {
    pub agent: i64,
    pub day: i32,
    pub target: i64,
    pub result: String,
}

/// A divination or medium result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judge {
    pub agent: Agent,
    pub day: i32,
    pub target: Agent,
    pub result: Species,
}

impl Judge {
    pub fn from_record(record: &JudgeRecord) -> Result<Self, ContentError> {
        Ok(Self {
            agent: Agent::new(record.agent)?,
            day: record.day,
            target: Agent::new(record.target)?,
            result: record.result.parse()?,
        })
    }

    /// `DIVINED <target> <result>`, as a seer reports it.
    pub fn divined_content(&self) -> Content {
        ContentBuilder::divined(self.target, self.result).build()
    }

    /// `IDENTIFIED <target> <result>`, as a medium reports it.
    pub fn identified_content(&self) -> Content {
        ContentBuilder::identified(self.target, self.result).build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub agent: i64,
    pub day: i32,
    pub target: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vote {
    pub agent: Agent,
    pub day: i32,
    pub target: Agent,
}

impl Vote {
    pub fn from_record(record: &VoteRecord) -> Result<Self, ContentError> {
        Ok(Self {
            agent: Agent::new(record.agent)?,
            day: record.day,
            target: Agent::new(record.target)?,
        })
    }

    /// `<agent> VOTED <target>`.
    pub fn voted_content(&self) -> Content {
        ContentBuilder::voted(self.target).subject(self.agent).build()
    }
}

/// JSON view of a statement tree, handed to the bindings.
#[derive(Debug, Clone, Serialize)]
pub struct ContentView {
    pub topic: Topic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Agent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Agent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Species>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utterance: Option<UtteranceRef>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<ContentView>,
    pub text: String,
}

impl From<&Content> for ContentView {
    fn from(content: &Content) -> Self {
        let topic = content.topic();
        let agreement = matches!(topic, Topic::Agree | Topic::Disagree);
        let targeted = matches!(
            topic,
            Topic::Estimate
                | Topic::Comingout
                | Topic::Divined
                | Topic::Identified
                | Topic::Attack
                | Topic::Attacked
                | Topic::Divination
                | Topic::Guard
                | Topic::Guarded
                | Topic::Vote
                | Topic::Voted
        ) || matches!(content.operator(), Operator::Request | Operator::Inquire);

        Self {
            topic,
            operator: (topic == Topic::Operator).then_some(content.operator()),
            subject: (!content.subject().is_unspec()).then_some(content.subject()),
            target: targeted.then_some(content.target()),
            role: (content.role() != Role::Unc).then_some(content.role()),
            result: (content.result() != Species::Unc).then_some(content.result()),
            day: (content.operator() == Operator::Day).then_some(content.day()),
            utterance: agreement.then(|| content.utterance().clone()),
            children: content.children().iter().map(ContentView::from).collect(),
            text: content.text().to_string(),
        }
    }
}
