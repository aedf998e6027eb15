use std::collections::HashMap;

use dialoguer::{Input, Select};
use thiserror::Error;

use crate::prompt::{Answer, Initial, PromptDescriptor, PromptType};

/// Errors raised while walking a form.
#[derive(Debug, Error)]
pub enum FormError {
    /// The terminal prompt failed (closed stdin, not a tty, ...).
    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    /// A select prompt resolved to an empty list of labels.
    #[error("prompt `{name}` has no choices")]
    EmptyChoices { name: String },
    /// A descriptor reached the form without a name.
    #[error("prompt at position {position} has no name")]
    UnnamedPrompt { position: usize },
}

/// Collected answers, keyed by descriptor name.
///
/// Inserting under an existing name replaces the earlier answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    values: HashMap<String, Answer>,
}

impl Answers {
    /// Creates an empty answer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `answer` under `name`.
    ///
    /// # Arguments
    ///
    /// * `name` - Descriptor name the answer belongs to.
    /// * `answer` - The collected value.
    pub fn insert(&mut self, name: impl Into<String>, answer: Answer) {
        self.values.insert(name.into(), answer);
    }

    /// Looks up the raw answer recorded under `name`.
    pub fn get(&self, name: &str) -> Option<&Answer> {
        self.values.get(name)
    }

    /// The selected index, if `name` was answered by a select prompt.
    pub fn index(&self, name: &str) -> Option<usize> {
        match self.values.get(name)? {
            Answer::Index(i) => Some(*i),
            _ => None,
        }
    }

    /// The typed text, if `name` was answered by a text prompt.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.values.get(name)? {
            Answer::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The typed number, if `name` was answered by a number prompt.
    pub fn number(&self, name: &str) -> Option<i64> {
        match self.values.get(name)? {
            Answer::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Number of recorded answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Something that can ask the user a single question.
pub trait PromptBackend {
    /// Asks the user to pick one of `items`.
    ///
    /// # Arguments
    ///
    /// * `message` - Question text.
    /// * `items` - Labels to choose from, never empty.
    /// * `default` - Index highlighted initially, always within `items`.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Zero-based index of the chosen label.
    /// * `Err(FormError)` - The terminal could not be read.
    fn select(&mut self, message: &str, items: &[String], default: usize) -> Result<usize, FormError>;

    /// Asks for free text, offering `default` when the user just presses enter.
    fn text(&mut self, message: &str, default: &str) -> Result<String, FormError>;

    /// Asks for an integer, offering `default` when the user just presses enter.
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - The parsed number.
    /// * `Err(FormError)` - The terminal could not be read.
    fn number(&mut self, message: &str, default: i64) -> Result<i64, FormError>;
}

/// Asks questions on the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalBackend;

impl PromptBackend for TerminalBackend {
    fn select(&mut self, message: &str, items: &[String], default: usize) -> Result<usize, FormError> {
        Ok(Select::new()
            .with_prompt(message)
            .items(items)
            .default(default)
            .interact()?)
    }

    fn text(&mut self, message: &str, default: &str) -> Result<String, FormError> {
        Ok(Input::<String>::new()
            .with_prompt(message)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()?)
    }

    fn number(&mut self, message: &str, default: i64) -> Result<i64, FormError> {
        Ok(Input::<i64>::new()
            .with_prompt(message)
            .default(default)
            .interact_text()?)
    }
}

/// Walks `descriptors` in order and collects one answer per prompt.
///
/// Derived choices receive the answer recorded for the preceding descriptor.
/// Inactive descriptors are not asked; their default value is recorded.
pub fn run_form<B: PromptBackend + ?Sized>(
    descriptors: &[PromptDescriptor],
    backend: &mut B,
) -> Result<Answers, FormError> {
    let mut answers = Answers::new();
    let mut previous: Option<Answer> = None;

    for (position, descriptor) in descriptors.iter().enumerate() {
        if descriptor.name.is_empty() {
            return Err(FormError::UnnamedPrompt { position });
        }

        let answer = match descriptor.kind {
            PromptType::Select => {
                let items = descriptor.choices.resolve(previous.as_ref());
                if items.is_empty() {
                    return Err(FormError::EmptyChoices {
                        name: descriptor.name.clone(),
                    });
                }
                let default = select_default(descriptor).min(items.len() - 1);
                if descriptor.active {
                    Answer::Index(backend.select(&descriptor.message, &items, default)?)
                } else {
                    Answer::Index(default)
                }
            }
            PromptType::Text => {
                let default = text_default(descriptor);
                if descriptor.active {
                    Answer::Text(backend.text(&descriptor.message, &default)?)
                } else {
                    Answer::Text(default)
                }
            }
            PromptType::Number => {
                let default = number_default(descriptor);
                if descriptor.active {
                    Answer::Number(backend.number(&descriptor.message, default)?)
                } else {
                    Answer::Number(default)
                }
            }
        };

        answers.insert(descriptor.name.clone(), answer.clone());
        previous = Some(answer);
    }

    Ok(answers)
}

fn select_default(descriptor: &PromptDescriptor) -> usize {
    match descriptor.initial {
        Some(Initial::Number(n)) if n > 0 => n as usize,
        _ => 0,
    }
}

fn text_default(descriptor: &PromptDescriptor) -> String {
    match &descriptor.initial {
        Some(Initial::Text(s)) => s.clone(),
        Some(Initial::Number(n)) => n.to_string(),
        None => String::new(),
    }
}

fn number_default(descriptor: &PromptDescriptor) -> i64 {
    match &descriptor.initial {
        Some(Initial::Number(n)) => *n,
        Some(Initial::Text(s)) => s.trim().parse().unwrap_or(0),
        None => 0,
    }
}
