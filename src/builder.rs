use crate::ast::{Content, Operator, Topic};
use crate::error::ContentError;
use crate::types::{Agent, Role, Species, UtteranceKind, UtteranceRef};

/// Staging value for one statement shape.
///
/// Every constructor pins the tag and the fields that shape requires;
/// the subject defaults to `UNSPEC` and is set with [`subject`](Self::subject).
/// Operands are cloned in, so the caller's trees are never shared with the
/// new parent.
#[derive(Debug, Clone)]
pub struct ContentBuilder {
    pub(crate) topic: Topic,
    pub(crate) subject: Agent,
    pub(crate) target: Agent,
    pub(crate) role: Role,
    pub(crate) result: Species,
    pub(crate) utterance: UtteranceRef,
    pub(crate) operator: Operator,
    pub(crate) children: Vec<Content>,
    pub(crate) day: i32,
}

impl Default for ContentBuilder {
    fn default() -> Self {
        Self {
            topic: Topic::Dummy,
            subject: Agent::UNSPEC,
            target: Agent::ANY,
            role: Role::Unc,
            result: Species::Unc,
            utterance: UtteranceRef::default(),
            operator: Operator::Nop,
            children: Vec::new(),
            day: -1,
        }
    }
}

impl ContentBuilder {
    fn atomic(topic: Topic) -> Self {
        Self {
            topic,
            ..Self::default()
        }
    }

    fn targeted(topic: Topic, target: Agent) -> Self {
        Self {
            topic,
            target,
            ..Self::default()
        }
    }

    /// Operator node over already-built operands. Arity is the caller's
    /// responsibility.
    pub(crate) fn compound(operator: Operator, children: Vec<Content>) -> Self {
        Self {
            topic: Topic::Operator,
            operator,
            children,
            ..Self::default()
        }
    }

    pub(crate) fn target(mut self, target: Agent) -> Self {
        self.target = target;
        self
    }

    pub(crate) fn with_day(mut self, day: i32) -> Self {
        self.day = day;
        self
    }

    pub fn subject(mut self, subject: Agent) -> Self {
        self.subject = subject;
        self
    }

    /// Completes the subtree and renders its canonical text.
    pub fn build(self) -> Content {
        Content {
            topic: self.topic,
            subject: self.subject,
            target: self.target,
            role: self.role,
            result: self.result,
            utterance: self.utterance,
            operator: self.operator,
            children: self.children,
            day: self.day,
            text: String::new(),
        }
        .finish()
    }

    pub fn empty() -> Self {
        Self::atomic(Topic::Dummy)
    }

    pub fn skip() -> Self {
        Self::atomic(Topic::Skip)
    }

    pub fn over() -> Self {
        Self::atomic(Topic::Over)
    }

    pub fn agree(kind: UtteranceKind, day: i32, index: i32) -> Self {
        Self {
            topic: Topic::Agree,
            utterance: UtteranceRef::reference(kind, day, index),
            ..Self::default()
        }
    }

    pub fn disagree(kind: UtteranceKind, day: i32, index: i32) -> Self {
        Self {
            topic: Topic::Disagree,
            ..Self::agree(kind, day, index)
        }
    }

    pub fn attack(target: Agent) -> Self {
        Self::targeted(Topic::Attack, target)
    }

    pub fn attacked(target: Agent) -> Self {
        Self::targeted(Topic::Attacked, target)
    }

    pub fn divination(target: Agent) -> Self {
        Self::targeted(Topic::Divination, target)
    }

    pub fn guard(target: Agent) -> Self {
        Self::targeted(Topic::Guard, target)
    }

    pub fn guarded(target: Agent) -> Self {
        Self::targeted(Topic::Guarded, target)
    }

    pub fn vote(target: Agent) -> Self {
        Self::targeted(Topic::Vote, target)
    }

    pub fn voted(target: Agent) -> Self {
        Self::targeted(Topic::Voted, target)
    }

    pub fn divined(target: Agent, result: Species) -> Self {
        Self {
            result,
            ..Self::targeted(Topic::Divined, target)
        }
    }

    pub fn identified(target: Agent, result: Species) -> Self {
        Self {
            result,
            ..Self::targeted(Topic::Identified, target)
        }
    }

    pub fn comingout(target: Agent, role: Role) -> Self {
        Self {
            role,
            ..Self::targeted(Topic::Comingout, target)
        }
    }

    pub fn estimate(target: Agent, role: Role) -> Self {
        Self {
            role,
            ..Self::targeted(Topic::Estimate, target)
        }
    }

    pub fn request(target: Agent, action: &Content) -> Self {
        Self::compound(Operator::Request, vec![action.clone()]).target(target)
    }

    pub fn inquire(target: Agent, action: &Content) -> Self {
        Self::compound(Operator::Inquire, vec![action.clone()]).target(target)
    }

    pub fn because(reason: &Content, action: &Content) -> Self {
        Self::compound(Operator::Because, vec![reason.clone(), action.clone()])
    }

    pub fn xor(disjunct1: &Content, disjunct2: &Content) -> Self {
        Self::compound(Operator::Xor, vec![disjunct1.clone(), disjunct2.clone()])
    }

    pub fn and(contents: &[Content]) -> Result<Self, ContentError> {
        Self::junction(Operator::And, contents)
    }

    pub fn or(contents: &[Content]) -> Result<Self, ContentError> {
        Self::junction(Operator::Or, contents)
    }

    fn junction(operator: Operator, contents: &[Content]) -> Result<Self, ContentError> {
        if contents.is_empty() {
            return Err(ContentError::EmptyOperandList { operator });
        }
        Ok(Self::compound(operator, contents.to_vec()))
    }

    pub fn not(content: &Content) -> Self {
        Self::compound(Operator::Not, vec![content.clone()])
    }

    pub fn day(day: i32, content: &Content) -> Self {
        Self::compound(Operator::Day, vec![content.clone()]).with_day(day)
    }
}
