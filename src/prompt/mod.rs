use std::fmt;

/// How a prompt collects its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptType {
    /// Pick one label out of a list; the answer is the zero-based index.
    #[default]
    Select,
    /// Free text.
    Text,
    /// Integer input.
    Number,
}

/// A collected answer, keyed by descriptor name in [`crate::form::Answers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Zero-based index into the choices of a select prompt.
    Index(usize),
    /// Text typed by the user.
    Text(String),
    /// Number typed by the user.
    Number(i64),
}

/// Default value offered when the user accepts without editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initial {
    /// Default for a text prompt.
    Text(String),
    /// Default for a number prompt, or the default index of a select prompt.
    Number(i64),
}

impl From<&str> for Initial {
    fn from(value: &str) -> Self {
        Initial::Text(value.to_string())
    }
}

impl From<String> for Initial {
    fn from(value: String) -> Self {
        Initial::Text(value)
    }
}

impl From<i64> for Initial {
    fn from(value: i64) -> Self {
        Initial::Number(value)
    }
}

impl From<i32> for Initial {
    fn from(value: i32) -> Self {
        Initial::Number(i64::from(value))
    }
}

type DeriveChoices = dyn Fn(Option<&Answer>) -> Vec<String>;

/// Labels offered by a select prompt.
///
/// `Derived` choices are computed from the answer to the preceding prompt,
/// which lets a later question depend on an earlier one.
pub enum Choices {
    /// A fixed, ordered list of labels.
    Literal(Vec<String>),
    /// Labels computed from the answer to the preceding prompt.
    Derived(Box<DeriveChoices>),
}

impl Choices {
    /// Wraps a closure computing labels from the previous answer.
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(Option<&Answer>) -> Vec<String> + 'static,
    {
        Choices::Derived(Box::new(f))
    }

    /// Resolves the labels given the answer to the preceding prompt.
    pub fn resolve(&self, previous: Option<&Answer>) -> Vec<String> {
        match self {
            Choices::Literal(labels) => labels.clone(),
            Choices::Derived(f) => f(previous),
        }
    }
}

impl Default for Choices {
    fn default() -> Self {
        Choices::Literal(Vec::new())
    }
}

impl fmt::Debug for Choices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choices::Literal(labels) => f.debug_tuple("Literal").field(labels).finish(),
            Choices::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl From<Vec<String>> for Choices {
    fn from(labels: Vec<String>) -> Self {
        Choices::Literal(labels)
    }
}

impl From<Vec<&str>> for Choices {
    fn from(labels: Vec<&str>) -> Self {
        Choices::Literal(labels.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Choices {
    fn from(labels: [&str; N]) -> Self {
        Choices::Literal(labels.iter().map(|s| s.to_string()).collect())
    }
}

/// One question of the interactive form.
#[derive(Debug, Default)]
pub struct PromptDescriptor {
    /// Key under which the answer is stored.
    pub name: String,
    /// Whether the answer is an index, text or a number.
    pub kind: PromptType,
    /// Text shown to the user.
    pub message: String,
    /// Labels of a select prompt; ignored for text and number prompts.
    pub choices: Choices,
    /// Value offered when the user accepts without editing.
    pub initial: Option<Initial>,
    /// Inactive prompts are not shown; the form records their default instead.
    pub active: bool,
    /// The separator-delimited key this prompt was derived from, if any.
    pub property: Option<String>,
}

/// Fluent builder for [`PromptDescriptor`].
///
/// ```
/// use minecraft_server_generator::prompt::{Prompt, PromptType};
///
/// let prompt = Prompt::from_key("max-players")
///     .kind(PromptType::Number)
///     .initial(20)
///     .build();
/// assert_eq!(prompt.name, "maxPlayers");
/// assert_eq!(prompt.message, "Max players");
/// ```
#[derive(Debug)]
pub struct Prompt {
    descriptor: PromptDescriptor,
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt {
    /// Starts a prompt with empty name and message.
    pub fn new() -> Self {
        Self {
            descriptor: PromptDescriptor {
                active: true,
                ..PromptDescriptor::default()
            },
        }
    }

    /// Starts a prompt whose name and message are derived from `key`.
    ///
    /// An empty key behaves like [`Prompt::new`].
    pub fn from_key(key: &str) -> Self {
        let mut prompt = Self::new();
        if key.is_empty() {
            return prompt;
        }
        prompt.descriptor.name = derive_name(key);
        prompt.descriptor.message = derive_message(key);
        prompt.descriptor.property = Some(key.to_string());
        prompt
    }

    /// Sets the answer key, replacing any name derived from the shorthand key.
    ///
    /// # Arguments
    ///
    /// * `name` - Key under which the form stores the answer.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.descriptor.name = name.into();
        self
    }

    /// Sets how the answer is collected.
    pub fn kind(mut self, kind: PromptType) -> Self {
        self.descriptor.kind = kind;
        self
    }

    /// Sets the text shown to the user, replacing any derived message.
    ///
    /// # Arguments
    ///
    /// * `message` - Human-readable question text.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.descriptor.message = message.into();
        self
    }

    /// Sets the labels of a select prompt.
    ///
    /// # Arguments
    ///
    /// * `choices` - A list of labels, or [`Choices::derived`] to compute
    ///   them from the previous answer.
    pub fn choices(mut self, choices: impl Into<Choices>) -> Self {
        self.descriptor.choices = choices.into();
        self
    }

    /// Sets the default value: text, a number, or the default index of a select.
    pub fn initial(mut self, initial: impl Into<Initial>) -> Self {
        self.descriptor.initial = Some(initial.into());
        self
    }

    /// Shows (`true`, the default) or hides the prompt.
    ///
    /// A hidden prompt stays in the form and answers with its default.
    pub fn active(mut self, active: bool) -> Self {
        self.descriptor.active = active;
        self
    }

    /// Finishes the builder.
    ///
    /// # Returns
    ///
    /// * `PromptDescriptor` - The assembled question, ready for [`crate::form::run_form`].
    pub fn build(self) -> PromptDescriptor {
        self.descriptor
    }
}

impl From<Prompt> for PromptDescriptor {
    fn from(prompt: Prompt) -> Self {
        prompt.build()
    }
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '.'
}

/// Camel-cases a shorthand key: `"rcon.port"` becomes `"rconPort"`.
///
/// A separator followed by a character is dropped and the character
/// upper-cased. A trailing separator is kept as is.
pub fn derive_name(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    while let Some(c) = chars.next() {
        if is_separator(c) {
            if let Some(next) = chars.next() {
                name.extend(next.to_uppercase());
                continue;
            }
        }
        name.push(c);
    }
    name
}

/// Turns a shorthand key into display text: `"max-players"` becomes `"Max players"`.
pub fn derive_message(key: &str) -> String {
    key.chars()
        .enumerate()
        .map(|(i, c)| match c {
            c if is_separator(c) => ' ',
            c if i == 0 && c.is_ascii_lowercase() => c.to_ascii_uppercase(),
            c => c,
        })
        .collect()
}
