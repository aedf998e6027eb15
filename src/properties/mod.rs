use crate::form::Answers;
use crate::prompt::{Answer, Initial, PromptDescriptor, PromptType};

/// Contents of `eula.txt`.
pub const EULA: &str = "eula=true\n";

/// Appended after the collected properties.
const TRAILER: &[(&str, &str)] = &[("enable-query", "true")];

/// A single `key=value` entry of `server.properties`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyLine {
    pub key: String,
    pub value: String,
}

impl PropertyLine {
    fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Escapes every UTF-16 code unit of `target` as `\uXXXX`.
///
/// `server.properties` is read as ISO-8859-1, so the MOTD is written fully
/// escaped to survive any character set.
pub fn escape_unicode(target: &str) -> String {
    target
        .encode_utf16()
        .map(|unit| format!("\\u{:04x}", unit))
        .collect()
}

/// One line per descriptor that was built from a property key, in order.
///
/// Select answers are written as the chosen label; text and number answers
/// verbatim. A missing answer falls back to the descriptor's initial value.
pub fn property_lines(descriptors: &[PromptDescriptor], answers: &Answers) -> Vec<PropertyLine> {
    let mut lines = Vec::new();
    let mut previous: Option<&Answer> = None;

    for descriptor in descriptors {
        let answer = answers.get(&descriptor.name);
        if let Some(key) = &descriptor.property {
            lines.push(PropertyLine::new(key.as_str(), property_value(descriptor, answer, previous)));
        }
        previous = answer;
    }
    lines
}

fn property_value(descriptor: &PromptDescriptor, answer: Option<&Answer>, previous: Option<&Answer>) -> String {
    match (descriptor.kind, answer) {
        (PromptType::Select, Some(Answer::Index(index))) => descriptor
            .choices
            .resolve(previous)
            .into_iter()
            .nth(*index)
            .unwrap_or_else(|| index.to_string()),
        (_, Some(Answer::Text(text))) => text.clone(),
        (_, Some(Answer::Number(n))) => n.to_string(),
        (PromptType::Select, _) => descriptor.choices.resolve(previous).into_iter().next().unwrap_or_default(),
        (_, _) => match &descriptor.initial {
            Some(Initial::Text(text)) => text.clone(),
            Some(Initial::Number(n)) => n.to_string(),
            None => String::new(),
        },
    }
}

/// Renders `server.properties`: the escaped MOTD, every property answer, then the trailer.
pub fn render_server_properties(motd: &str, descriptors: &[PromptDescriptor], answers: &Answers) -> String {
    let mut lines = vec![PropertyLine::new("motd", escape_unicode(motd))];
    lines.extend(property_lines(descriptors, answers));
    lines.extend(TRAILER.iter().map(|(k, v)| PropertyLine::new(*k, *v)));

    lines
        .iter()
        .map(|line| format!("{}={}\n", line.key, line.value))
        .collect()
}
