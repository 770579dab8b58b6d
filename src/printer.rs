use crate::ast::{Content, Operator, Topic};
use crate::parser;
use crate::types::Agent;

pub const SKIP: &str = "Skip";
pub const OVER: &str = "Over";

/// Canonical text of a node whose children are already finished.
pub(crate) fn render(content: &Content) -> String {
    let subject = subject_prefix(content.subject);
    let target = target_token(content.target);

    match content.topic {
        Topic::Dummy => String::new(),
        Topic::Skip => SKIP.to_string(),
        Topic::Over => OVER.to_string(),
        Topic::Agree | Topic::Disagree => {
            let utterance = &content.utterance;
            format!(
                "{subject}{} {} {} {}",
                content.topic, utterance.kind, utterance.day, utterance.index
            )
        }
        Topic::Estimate | Topic::Comingout => {
            format!("{subject}{} {target} {}", content.topic, content.role)
        }
        Topic::Divined | Topic::Identified => {
            format!("{subject}{} {target} {}", content.topic, content.result)
        }
        Topic::Attack
        | Topic::Attacked
        | Topic::Divination
        | Topic::Guard
        | Topic::Guarded
        | Topic::Vote
        | Topic::Voted => format!("{subject}{} {target}", content.topic),
        Topic::Operator => render_compound(content, subject, &target),
    }
}

fn render_compound(content: &Content, mut out: String, target: &str) -> String {
    out.push_str(content.operator.as_str());
    match content.operator {
        Operator::Request | Operator::Inquire => {
            out.push(' ');
            out.push_str(target);
        }
        Operator::Day => {
            out.push(' ');
            out.push_str(&content.day.to_string());
        }
        _ => {}
    }

    let implied = if content.operator.addresses_target() {
        content.target
    } else {
        content.subject
    };
    for child in &content.children {
        let text = if child.subject == implied {
            strip_subject(&child.text)
        } else {
            &child.text
        };
        out.push_str(" (");
        out.push_str(text);
        out.push(')');
    }
    out
}

fn subject_prefix(subject: Agent) -> String {
    if subject.is_unspec() {
        String::new()
    } else if subject.is_any() {
        "ANY ".to_string()
    } else {
        format!("{subject} ")
    }
}

fn target_token(target: Agent) -> String {
    if target.is_any() || target.is_unspec() {
        "ANY".to_string()
    } else {
        target.to_string()
    }
}

/// Drops a leading agent token and the whitespace after it, but only when
/// what follows starts with an uppercase keyword.
pub(crate) fn strip_subject(text: &str) -> &str {
    let mut input = text;
    if parser::agent(&mut input).is_err() {
        return text;
    }
    let rest = input.trim_start();
    if rest.len() == input.len() || !rest.starts_with(|c: char| c.is_ascii_uppercase()) {
        return text;
    }
    rest
}
