use tracing::{debug, trace};

use crate::ast::{Content, Operator};
use crate::builder::ContentBuilder;
use crate::parser::{self, Head};
use crate::types::{Agent, UtteranceRef};

#[derive(Debug, Clone)]
pub struct CompileOptions {
    /// Deepest parenthesized nesting accepted before the input is
    /// treated as unparseable.
    pub max_depth: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { max_depth: 32 }
    }
}

/// Parses one chat payload into a completed statement.
///
/// Never fails: text that matches no statement form compiles to `Skip`,
/// the same value an agent gets by saying `Skip` outright.
pub fn compile(text: &str) -> Content {
    compile_with(text, &CompileOptions::default())
}

pub fn compile_with(text: &str, options: &CompileOptions) -> Content {
    CompilerState::new(options).compile(text, 0)
}

/// Compiles every top-level parenthesized group in `text`, ignoring
/// whatever lies between groups.
pub fn contents_of(text: &str) -> Vec<Content> {
    let options = CompileOptions::default();
    let state = CompilerState::new(&options);
    parser::top_level_groups(text)
        .into_iter()
        .map(|group| state.compile(group, 1))
        .collect()
}

struct CompilerState<'o> {
    options: &'o CompileOptions,
}

impl<'o> CompilerState<'o> {
    fn new(options: &'o CompileOptions) -> Self {
        Self { options }
    }

    fn compile(&self, text: &str, depth: usize) -> Content {
        let trimmed = text.trim();
        match self.try_compile(trimmed, depth) {
            Some(content) => content,
            None => {
                debug!(text = trimmed, depth, "unparseable statement, using Skip");
                Content::skip()
            }
        }
    }

    fn try_compile(&self, text: &str, depth: usize) -> Option<Content> {
        let head = parser::parse_head(text)?;
        trace!(?head, "matched statement form");

        let builder = match head {
            Head::Literal(topic) => ContentBuilder {
                topic,
                ..ContentBuilder::default()
            },
            Head::Agree {
                subject,
                topic,
                kind,
                day,
                index,
            } => ContentBuilder {
                topic,
                utterance: UtteranceRef::reference(kind, day, index),
                ..ContentBuilder::default()
            }
            .subject(subject),
            Head::Role {
                subject,
                topic,
                target,
                role,
            } => ContentBuilder {
                topic,
                role,
                ..ContentBuilder::default()
            }
            .target(target)
            .subject(subject),
            Head::Species {
                subject,
                topic,
                target,
                result,
            } => ContentBuilder {
                topic,
                result,
                ..ContentBuilder::default()
            }
            .target(target)
            .subject(subject),
            Head::Action {
                subject,
                topic,
                target,
            } => ContentBuilder {
                topic,
                ..ContentBuilder::default()
            }
            .target(target)
            .subject(subject),
            Head::Addressed {
                subject,
                operator,
                target,
                operands,
            } => {
                let children = self.operands(operator, operands, depth)?;
                ContentBuilder::compound(operator, children)
                    .target(target)
                    .subject(subject)
            }
            Head::Connective {
                subject,
                operator,
                operands,
            } => {
                let children = self.operands(operator, operands, depth)?;
                let mut builder = ContentBuilder::compound(operator, children).subject(subject);
                if operator == Operator::Request {
                    let first = builder.children[0].subject();
                    builder = builder.target(if first.is_unspec() { Agent::ANY } else { first });
                }
                builder
            }
            Head::Day {
                subject,
                day,
                operands,
            } => {
                let children = self.operands(Operator::Day, operands, depth)?;
                ContentBuilder::compound(Operator::Day, children)
                    .with_day(day)
                    .subject(subject)
            }
        };

        Some(builder.build())
    }

    /// Compiles each top-level group of `operands` one level deeper.
    fn operands(&self, operator: Operator, operands: &str, depth: usize) -> Option<Vec<Content>> {
        if depth >= self.options.max_depth {
            debug!(depth, "statement nested too deeply");
            return None;
        }
        let groups = parser::top_level_groups(operands);
        if !operator.arity().accepts(groups.len()) {
            debug!(%operator, operands = groups.len(), "wrong number of operands");
            return None;
        }
        Some(
            groups
                .into_iter()
                .map(|group| self.compile(group, depth + 1))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Topic;
    use crate::types::{Role, Species, UtteranceKind};
    use proptest::prelude::*;

    fn agent(index: i64) -> Agent {
        Agent::new(index).unwrap()
    }

    #[test]
    fn parses_builder_output_back_to_equal_value() {
        let built = ContentBuilder::vote(agent(2)).subject(agent(1)).build();
        let parsed = compile("Agent[01] VOTE Agent[02]");
        assert_eq!(parsed, built);
        assert_eq!(parsed.topic(), Topic::Vote);
        assert_eq!(parsed.subject(), agent(1));
        assert_eq!(parsed.target(), agent(2));
    }

    #[test]
    fn default_subject_is_omitted() {
        let parsed = compile("VOTE Agent[02]");
        assert_eq!(parsed.subject(), Agent::UNSPEC);
        assert_eq!(parsed.text(), "VOTE Agent[02]");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(compile("  \tESTIMATE Agent[03] WEREWOLF \n").text(), "ESTIMATE Agent[03] WEREWOLF");
    }

    #[test]
    fn garbage_degrades_to_skip() {
        let content = compile("not a valid statement");
        assert_eq!(content.topic(), Topic::Skip);
        assert_eq!(content.text(), "Skip");
        assert_eq!(compile("").topic(), Topic::Skip);
    }

    #[test]
    fn malformed_operands_degrade_to_skip() {
        for text in [
            "NOT (VOTE Agent[02]) (VOTE Agent[03])",
            "BECAUSE (VOTE Agent[02])",
            "AND ((VOTE Agent[02])",
            "AND (VOTE Agent[02]",
            "REQUEST (VOTE Agent[02]) (VOTE Agent[03])",
            "DAY 99999999999 (VOTE Agent[02])",
        ] {
            assert_eq!(compile(text).topic(), Topic::Skip, "{text}");
        }
    }

    #[test]
    fn stray_text_around_operands_is_ignored() {
        let content = compile("AND (VOTE Agent[02]) or (VOTE Agent[03])");
        assert_eq!(content.operator(), Operator::And);
        assert_eq!(content.text(), "AND (VOTE Agent[02]) (VOTE Agent[03])");

        let content = compile("AND (VOTE Agent[02]))");
        assert_eq!(content.operator(), Operator::And);
        assert_eq!(content.text(), "AND (VOTE Agent[02])");
    }

    #[test]
    fn subject_may_touch_keyword() {
        let content = compile("Agent[01]VOTE Agent[02]");
        assert_eq!(content.subject(), agent(1));
        assert_eq!(content.text(), "Agent[01] VOTE Agent[02]");
    }

    #[test]
    fn unset_days_round_trip() {
        let vote = ContentBuilder::vote(agent(2)).build();
        let day = ContentBuilder::day(-1, &vote).build();
        assert_eq!(day.text(), "DAY -1 (VOTE Agent[02])");
        assert_eq!(compile(day.text()), day);

        let agree = ContentBuilder::agree(UtteranceKind::Talk, -1, -1).build();
        assert_eq!(agree.text(), "AGREE TALK -1 -1");
        assert_eq!(compile(agree.text()), agree);
    }

    #[test]
    fn unparseable_operand_becomes_skip_operand() {
        let content = compile("NOT (hello there)");
        assert_eq!(content.operator(), Operator::Not);
        assert_eq!(content.children()[0].topic(), Topic::Skip);
        assert_eq!(content.text(), "NOT (Skip)");
    }

    #[test]
    fn agree_reads_server_form() {
        let content = compile("Agent[04] DISAGREE WHISPER day3 ID:17");
        assert_eq!(content.topic(), Topic::Disagree);
        assert_eq!(content.utterance().kind, UtteranceKind::Whisper);
        assert_eq!(content.utterance().day, 3);
        assert_eq!(content.utterance().index, 17);
        assert_eq!(content.text(), "Agent[04] DISAGREE WHISPER 3 17");
    }

    #[test]
    fn nested_groups_are_balanced() {
        let content = compile("DAY 2 (AND (VOTE Agent[02]) (VOTE Agent[03]))");
        let and = &content.children()[0];
        assert_eq!(and.operator(), Operator::And);
        assert_eq!(and.children().len(), 2);
        assert!(and.children().iter().all(|c| c.topic() == Topic::Vote));
        assert_eq!(and.children()[1].target(), agent(3));
    }

    #[test]
    fn bare_request_targets_first_operand_subject() {
        let content = compile("REQUEST (VOTE Agent[03])");
        assert_eq!(content.target(), Agent::ANY);
        assert_eq!(content.children()[0].subject(), Agent::ANY);
        assert_eq!(content.text(), "REQUEST ANY (VOTE Agent[03])");

        let content = compile("Agent[01] REQUEST (Agent[02] VOTE Agent[03])");
        assert_eq!(content.target(), agent(2));
        assert_eq!(content.text(), "Agent[01] REQUEST Agent[02] (VOTE Agent[03])");
    }

    #[test]
    fn parsed_operands_are_completed() {
        let content = compile("Agent[01] BECAUSE (Agent[01] VOTED Agent[03]) (VOTE Agent[03])");
        assert_eq!(content.children()[1].subject(), agent(1));
        assert_eq!(content.text(), "Agent[01] BECAUSE (VOTED Agent[03]) (VOTE Agent[03])");
    }

    #[test]
    fn depth_limit_degrades_to_skip() {
        let options = CompileOptions { max_depth: 2 };
        let shallow = "NOT (NOT (VOTE Agent[01]))";
        let deep = "NOT (NOT (NOT (VOTE Agent[01])))";

        assert_eq!(compile_with(shallow, &options).text(), shallow);
        assert_eq!(compile_with(deep, &options).text(), "NOT (NOT (Skip))");
        assert_eq!(compile(deep).text(), deep);
    }

    #[test]
    fn contents_of_picks_groups_from_free_text() {
        let contents = contents_of("I think (VOTE Agent[02]) and (Agent[03] COMINGOUT Agent[03] SEER)!");
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].text(), "VOTE Agent[02]");
        assert_eq!(contents[1].role(), Role::Seer);
        assert!(contents_of("no groups here").is_empty());
    }

    fn addressee() -> impl Strategy<Value = Agent> {
        prop_oneof![
            Just(Agent::UNSPEC),
            Just(Agent::ANY),
            (1u32..=15).prop_map(Agent::from_index)
        ]
    }

    fn speaker() -> impl Strategy<Value = Agent> {
        prop_oneof![
            Just(Agent::UNSPEC),
            Just(Agent::ANY),
            (1u32..=15).prop_map(Agent::from_index)
        ]
    }

    fn leaf() -> impl Strategy<Value = Content> {
        let roles = prop::sample::select(vec![Role::Seer, Role::Medium, Role::Werewolf, Role::Villager, Role::Any]);
        let species = prop::sample::select(vec![Species::Human, Species::Werewolf]);
        prop_oneof![
            (addressee(), speaker()).prop_map(|(t, s)| ContentBuilder::vote(t).subject(s).build()),
            (addressee(), speaker()).prop_map(|(t, s)| ContentBuilder::guarded(t).subject(s).build()),
            (addressee(), roles, speaker())
                .prop_map(|(t, r, s)| ContentBuilder::comingout(t, r).subject(s).build()),
            (addressee(), species, speaker())
                .prop_map(|(t, r, s)| ContentBuilder::divined(t, r).subject(s).build()),
            (-1i32..15, -1i32..100, speaker()).prop_map(|(d, i, s)| {
                ContentBuilder::agree(UtteranceKind::Talk, d, i).subject(s).build()
            }),
            Just(Content::skip()),
        ]
    }

    fn statement() -> impl Strategy<Value = Content> {
        leaf().prop_recursive(4, 32, 3, |inner| {
            prop_oneof![
                (addressee(), inner.clone(), speaker())
                    .prop_map(|(t, c, s)| ContentBuilder::request(t, &c).subject(s).build()),
                (addressee(), inner.clone(), speaker())
                    .prop_map(|(t, c, s)| ContentBuilder::inquire(t, &c).subject(s).build()),
                (inner.clone(), inner.clone(), speaker())
                    .prop_map(|(a, b, s)| ContentBuilder::because(&a, &b).subject(s).build()),
                (prop::collection::vec(inner.clone(), 1..4), speaker()).prop_map(|(cs, s)| {
                    ContentBuilder::or(&cs).expect("non-empty operands").subject(s).build()
                }),
                (inner.clone(), speaker())
                    .prop_map(|(c, s)| ContentBuilder::not(&c).subject(s).build()),
                (-1i32..10, inner, speaker())
                    .prop_map(|(d, c, s)| ContentBuilder::day(d, &c).subject(s).build()),
            ]
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Arbitrary chat never panics the parser.
        #[test]
        fn compile_never_panics(input in "\\PC{0,80}") {
            let _ = compile(&input);
        }

        /// Paren-heavy input never panics the parser either.
        #[test]
        fn compile_never_panics_on_parens(input in "[()A-Z\\[\\]0-9 ]{0,60}") {
            let _ = compile(&input);
        }

        /// Builder output parses back to the same canonical text.
        #[test]
        fn builder_text_round_trips(content in statement()) {
            let parsed = compile(content.text());
            prop_assert_eq!(parsed.text(), content.text());
        }

        /// Compiled text is already canonical.
        #[test]
        fn compiled_text_is_stable(content in statement()) {
            let once = compile(content.text());
            let twice = compile(once.text());
            prop_assert_eq!(once, twice);
        }
    }
}
