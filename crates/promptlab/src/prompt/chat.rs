//! Multi-message templates.

use super::template::{PromptTemplate, Variables};
use crate::{Message, Result, Role};

/// One entry of a [`ChatPromptTemplate`].
#[derive(Debug, Clone, PartialEq, Eq)]
enum MessageTemplate {
    /// A message emitted as-is.
    Fixed(Message),
    /// A message whose content is rendered from a template.
    Template { role: Role, template: PromptTemplate },
}

impl MessageTemplate {
    fn render(&self, vars: &Variables) -> Result<Message> {
        match self {
            MessageTemplate::Fixed(message) => Ok(message.clone()),
            MessageTemplate::Template { role, template } => {
                Ok(Message::new(*role, template.format(vars)?))
            }
        }
    }
}

/// An ordered list of message templates rendered together.
///
/// ```ignore
/// let prompt = ChatPromptTemplate::new()
///     .system("You are a chef.")
///     .human("How do I make {dish}?");
/// let messages = prompt.format_messages(&Variables::new().with("dish", "risotto"))?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatPromptTemplate {
    entries: Vec<MessageTemplate>,
}

impl ChatPromptTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single human message rendered from `template`.
    pub fn from_template(template: &str) -> Self {
        Self::new().human(template)
    }

    pub fn system(self, template: &str) -> Self {
        self.templated(Role::System, template)
    }

    pub fn human(self, template: &str) -> Self {
        self.templated(Role::Human, template)
    }

    pub fn ai(self, template: &str) -> Self {
        self.templated(Role::Ai, template)
    }

    /// Append a fixed message. Its content is never treated as a template.
    pub fn message(mut self, message: Message) -> Self {
        self.entries.push(MessageTemplate::Fixed(message));
        self
    }

    fn templated(mut self, role: Role, template: &str) -> Self {
        self.entries.push(MessageTemplate::Template {
            role,
            template: PromptTemplate::new(template),
        });
        self
    }

    /// Union of every entry's placeholders, in first-seen order.
    pub fn input_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if let MessageTemplate::Template { template, .. } = entry {
                for name in template.input_variables() {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
        }
        names
    }

    /// Render every entry in order.
    pub fn format_messages(&self, vars: &Variables) -> Result<Vec<Message>> {
        self.entries.iter().map(|e| e.render(vars)).collect()
    }
}
