use crate::ast::Content;
use crate::printer;
use crate::types::Agent;

impl Content {
    /// Resolves implicit subjects below this node, then renders it.
    ///
    /// Running it again on a finished tree changes nothing.
    pub(crate) fn finish(mut self) -> Self {
        // An addressee left unspecified prints as `ANY`, so it is `ANY`.
        if self.operator.addresses_target() && self.target.is_unspec() {
            self.target = Agent::ANY;
        }
        self.complete_inner_subjects();
        self.text = printer::render(&self);
        self
    }

    pub(crate) fn replace_subject(mut self, subject: Agent) -> Self {
        self.subject = subject;
        self.finish()
    }

    fn complete_inner_subjects(&mut self) {
        let context = self.inner_subject();
        let children = std::mem::take(&mut self.children);
        self.children = children
            .into_iter()
            .map(|child| match context {
                Some(subject) if child.subject.is_unspec() => child.replace_subject(subject),
                _ => child.finish(),
            })
            .collect();
    }

    /// Speaker an unspecified operand inherits, if any.
    fn inner_subject(&self) -> Option<Agent> {
        if self.operator.addresses_target() {
            Some(self.target)
        } else if !self.subject.is_unspec() {
            Some(self.subject)
        } else {
            None
        }
    }
}
