use winnow::ascii::{digit1, multispace0, multispace1};
use winnow::combinator::{alt, eof, fail, opt, preceded, terminated};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{rest, take_while};

use crate::ast::{Operator, Topic};
use crate::types::{Agent, Role, Species, UtteranceKind};

/// The leading part of one statement form, matched against the whole
/// input. Parenthesized operands are handed back unparsed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Head<'a> {
    Literal(Topic),
    Agree {
        subject: Agent,
        topic: Topic,
        kind: UtteranceKind,
        day: i32,
        index: i32,
    },
    Role {
        subject: Agent,
        topic: Topic,
        target: Agent,
        role: Role,
    },
    Species {
        subject: Agent,
        topic: Topic,
        target: Agent,
        result: Species,
    },
    Action {
        subject: Agent,
        topic: Topic,
        target: Agent,
    },
    Addressed {
        subject: Agent,
        operator: Operator,
        target: Agent,
        operands: &'a str,
    },
    Connective {
        subject: Agent,
        operator: Operator,
        operands: &'a str,
    },
    Day {
        subject: Agent,
        day: i32,
        operands: &'a str,
    },
}

pub(crate) fn parse_head(text: &str) -> Option<Head<'_>> {
    let mut input = text;
    alt((literal, statement)).parse_next(&mut input).ok()
}

pub(crate) fn agent_token(text: &str) -> Option<Agent> {
    let mut input = text;
    terminated(agent, eof).parse_next(&mut input).ok()
}

/// `Agent[NN]` or `ANY`.
pub(crate) fn agent(input: &mut &str) -> ModalResult<Agent> {
    alt((
        "ANY".value(Agent::ANY),
        preceded("Agent[", terminated(digit1.try_map(str::parse::<u32>), "]"))
            .map(Agent::from_index),
    ))
    .parse_next(input)
}

fn literal<'a>(input: &mut &'a str) -> ModalResult<Head<'a>> {
    terminated(
        alt(("Skip".value(Topic::Skip), "Over".value(Topic::Over))),
        eof,
    )
    .map(Head::Literal)
    .parse_next(input)
}

fn statement<'a>(input: &mut &'a str) -> ModalResult<Head<'a>> {
    let subject = opt(terminated(agent, multispace0))
        .parse_next(input)?
        .unwrap_or(Agent::UNSPEC);
    let word = keyword(input)?;

    let head = if let Ok(topic) = word.parse::<Topic>() {
        topic_tail(input, subject, topic)?
    } else if let Ok(operator) = word.parse::<Operator>() {
        operator_tail(input, subject, operator)?
    } else {
        return fail(input);
    };
    end(input)?;
    Ok(head)
}

fn topic_tail<'a>(input: &mut &'a str, subject: Agent, topic: Topic) -> ModalResult<Head<'a>> {
    match topic {
        Topic::Agree | Topic::Disagree => {
            let kind = preceded(multispace1, keyword.try_map(str::parse::<UtteranceKind>))
                .parse_next(input)?;
            let day = preceded((multispace1, opt("day")), number).parse_next(input)?;
            let index = preceded((multispace1, opt("ID:")), number).parse_next(input)?;
            Ok(Head::Agree {
                subject,
                topic,
                kind,
                day,
                index,
            })
        }
        Topic::Estimate | Topic::Comingout => {
            let target = target(input)?;
            let role = preceded(multispace1, keyword.try_map(str::parse::<Role>)).parse_next(input)?;
            Ok(Head::Role {
                subject,
                topic,
                target,
                role,
            })
        }
        Topic::Divined | Topic::Identified => {
            let target = target(input)?;
            let result =
                preceded(multispace1, keyword.try_map(str::parse::<Species>)).parse_next(input)?;
            Ok(Head::Species {
                subject,
                topic,
                target,
                result,
            })
        }
        Topic::Attack
        | Topic::Attacked
        | Topic::Divination
        | Topic::Guard
        | Topic::Guarded
        | Topic::Vote
        | Topic::Voted => {
            let target = target(input)?;
            Ok(Head::Action {
                subject,
                topic,
                target,
            })
        }
        Topic::Dummy | Topic::Over | Topic::Skip | Topic::Operator => fail(input),
    }
}

fn operator_tail<'a>(
    input: &mut &'a str,
    subject: Agent,
    operator: Operator,
) -> ModalResult<Head<'a>> {
    match operator {
        Operator::Request | Operator::Inquire => {
            let start = *input;
            match (target, operands).parse_next(input) {
                Ok((addressee, group)) => Ok(Head::Addressed {
                    subject,
                    operator,
                    target: addressee,
                    operands: group,
                }),
                // A bare `REQUEST (...)` names no addressee.
                Err(_) if operator == Operator::Request => {
                    *input = start;
                    let operands = operands(input)?;
                    Ok(Head::Connective {
                        subject,
                        operator,
                        operands,
                    })
                }
                Err(err) => Err(err),
            }
        }
        Operator::Because | Operator::And | Operator::Or | Operator::Xor | Operator::Not => {
            let operands = operands(input)?;
            Ok(Head::Connective {
                subject,
                operator,
                operands,
            })
        }
        Operator::Day => {
            let day = preceded(multispace1, number).parse_next(input)?;
            let operands = operands(input)?;
            Ok(Head::Day {
                subject,
                day,
                operands,
            })
        }
        Operator::Nop => fail(input),
    }
}

fn keyword<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_uppercase()).parse_next(input)
}

fn target(input: &mut &str) -> ModalResult<Agent> {
    preceded(multispace1, agent).parse_next(input)
}

/// Decimal integer; days and indices print as `-1` when unset.
fn number(input: &mut &str) -> ModalResult<i32> {
    (opt('-'), digit1)
        .take()
        .try_map(str::parse::<i32>)
        .parse_next(input)
}

/// Everything after the keyword fields, which must open and close with
/// a parenthesis.
fn operands<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded(multispace1, rest)
        .verify(|operands: &str| operands.starts_with('(') && operands.ends_with(')'))
        .parse_next(input)
}

fn end(input: &mut &str) -> ModalResult<()> {
    eof.void().parse_next(input)
}

/// Splits `text` into the interiors of its top-level parenthesized groups.
///
/// Text between groups, a `)` with no opener and a group left open are
/// all skipped.
pub(crate) fn top_level_groups(text: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => {
                if depth == 0 {
                    start = idx + 1;
                }
                depth += 1;
            }
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    groups.push(&text[start..idx]);
                }
            }
            _ => {}
        }
    }

    groups
}
