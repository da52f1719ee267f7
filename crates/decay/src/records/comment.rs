// ensdf modules
use ensdf_utils::{f, ColumnExt};

// internal modules
use crate::decoder::BODY_START;
use crate::error::Result;
use crate::records::Record;

// external crates
use serde::Serialize;

/// Free-text comment block
///
/// Only used to derive X-ray and Auger lines when the scheme is built with
/// [RelaxationMode::Ensdf](crate::RelaxationMode::Ensdf).
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    /// Raw line block
    #[serde(skip)]
    pub record: Record,
    /// Record tag the comment is attached to, blank for general comments
    pub subject: char,
    /// Comment text from column 10 onwards, one entry per line
    pub text: Vec<String>,
}

impl Comment {
    /// Build from a comment line block
    pub fn new(record: Record) -> Self {
        let subject = record
            .lines
            .first()
            .map_or(' ', |line| line.column_char(8).to_ascii_uppercase());

        let text = record
            .lines
            .iter()
            .map(|line| line.columns_from(BODY_START).trim_end().to_string())
            .collect();

        Self {
            record,
            subject,
            text,
        }
    }

    /// Serialise to a JSON format string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl std::fmt::Display for Comment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut s = "Comment\n".to_string();
        s += &f!("  Subject          {}\n", self.subject);
        s += &f!("  Lines            {}", self.text.len());
        write!(f, "{s}")
    }
}
