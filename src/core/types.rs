use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::parsing::ParseError;
use crate::utils::validation::{is_placeholder_type, sort_type_tokens};

/// Layout of an MLST result file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// Single line: `sample, scheme, type, locus(a,b), ...`
    Standard,
    /// Header line of locus names plus one data line (SRST2 style)
    Srst2,
}

impl FromStr for FileType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "srst2" => Ok(Self::Srst2),
            _ => Err(ParseError::UnknownFileType(s.to_string())),
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Srst2 => write!(f, "srst2"),
        }
    }
}

/// A lone reported sequence type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeToken {
    Numeric(u64),
    Placeholder(String),
}

impl std::fmt::Display for TypeToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(st) => write!(f, "{st}"),
            Self::Placeholder(marker) => write!(f, "{marker}"),
        }
    }
}

/// The sequence type(s) as reported in an MLST record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportedType {
    /// One type, parsed as an integer unless it is a placeholder
    Single(TypeToken),
    /// Several types, kept as the raw strings
    Multiple(Vec<String>),
}

impl ReportedType {
    /// Normalize a raw type field.
    ///
    /// `/` is an alternate delimiter and is rewritten to `,` first. A lone type
    /// is integer-parsed, a delimited list is not. Callers compare via
    /// [`ReportedType::sorted_tokens`], which hides the difference.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidType` if a lone, non-placeholder type is not
    /// an integer.
    pub fn normalize(raw: &str) -> Result<Self, ParseError> {
        let normalized = raw.trim().replace('/', ",");

        if !normalized.contains(',') {
            if is_placeholder_type(&normalized) {
                return Ok(Self::Single(TypeToken::Placeholder(normalized)));
            }
            let st = normalized
                .parse()
                .map_err(|_| ParseError::InvalidType(normalized.clone()))?;
            return Ok(Self::Single(TypeToken::Numeric(st)));
        }

        Ok(Self::Multiple(
            normalized.split(',').map(str::to_string).collect(),
        ))
    }

    /// Tokens in reported order
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Single(token) => vec![token.to_string()],
            Self::Multiple(tokens) => tokens.clone(),
        }
    }

    /// Tokens sorted numerically with placeholders last
    #[must_use]
    pub fn sorted_tokens(&self) -> Vec<String> {
        let mut tokens = self.tokens();
        sort_type_tokens(&mut tokens);
        tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multiple(tokens) => tokens.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the first reported token is undetermined
    #[must_use]
    pub fn leads_with_placeholder(&self) -> bool {
        match self {
            Self::Single(token) => matches!(token, TypeToken::Placeholder(_)),
            Self::Multiple(tokens) => tokens.first().is_some_and(|t| is_placeholder_type(t)),
        }
    }

    /// Whether any reported token is undetermined
    #[must_use]
    pub fn has_placeholder(&self) -> bool {
        match self {
            Self::Single(token) => matches!(token, TypeToken::Placeholder(_)),
            Self::Multiple(tokens) => tokens.iter().any(|t| is_placeholder_type(t)),
        }
    }
}
