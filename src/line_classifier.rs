/*!
 * Classification of raw input lines.
 *
 * A line is translatable when it carries the UI dialogue marker (`UI_DM` by default)
 * and does not carry the exclusion marker (`--` by default). Translatable lines are
 * split on their first `=` into a key and the payload that is sent to the provider;
 * every other line is passed through untouched.
 */

use serde::{Deserialize, Serialize};

use crate::errors::FormatError;

/// Line terminator of a translatable line, reused when the line is rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`, also used for a final line without terminator
    Lf,
    /// `\r\n`
    CrLf,
}

impl LineEnding {
    fn of(raw: &str) -> Self {
        if raw.ends_with("\r\n") { Self::CrLf } else { Self::Lf }
    }

    /// The terminator text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// One input line after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLine {
    /// A dialogue entry whose value must be translated
    Translatable {
        /// Declaration key, right-trimmed
        key: String,
        /// Value without quotes and trailing sentinel
        payload: String,
        /// 0-based position in the input
        line_index: usize,
        /// Terminator of the original line
        ending: LineEnding,
    },
    /// Any other line, reproduced verbatim
    Passthrough {
        /// The raw line including its terminator
        raw: String,
        /// 0-based position in the input
        line_index: usize,
    },
}

impl ClassifiedLine {
    /// Position of the line in the input
    pub fn line_index(&self) -> usize {
        match self {
            Self::Translatable { line_index, .. } | Self::Passthrough { line_index, .. } => *line_index,
        }
    }

    /// Whether the line goes to the translation provider
    pub fn is_translatable(&self) -> bool {
        matches!(self, Self::Translatable { .. })
    }
}

/// What to do with a marked line that has no `=` separator
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FormatErrorPolicy {
    /// Pass the line through unchanged and report it
    #[default]
    Skip,
    /// Fail the whole run before translating anything
    Abort,
}

/// Classified input document
#[derive(Debug, Clone, Default)]
pub struct ClassifiedDocument {
    /// One entry per input line, in input order
    pub lines: Vec<ClassifiedLine>,
    /// Format errors that were turned into passthrough lines
    pub skipped: Vec<FormatError>,
}

impl ClassifiedDocument {
    /// Number of lines that will be sent for translation
    pub fn translatable_count(&self) -> usize {
        self.lines.iter().filter(|line| line.is_translatable()).count()
    }
}

/// Decides which lines need translation and extracts their payload
#[derive(Debug, Clone)]
pub struct LineClassifier {
    translate_marker: String,
    exclusion_marker: String,
    sentinel: Option<char>,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new("UI_DM", "--", Some(','))
    }
}

impl LineClassifier {
    /// Create a classifier with explicit markers
    pub fn new(translate_marker: impl Into<String>, exclusion_marker: impl Into<String>, sentinel: Option<char>) -> Self {
        Self {
            translate_marker: translate_marker.into(),
            exclusion_marker: exclusion_marker.into(),
            sentinel,
        }
    }

    /// Whether the raw line is selected for translation
    pub fn requires_translation(&self, raw: &str) -> bool {
        raw.contains(&self.translate_marker) && !raw.contains(&self.exclusion_marker)
    }

    /// Classify a single raw line
    pub fn classify(&self, raw: &str, line_index: usize) -> Result<ClassifiedLine, FormatError> {
        if !self.requires_translation(raw) {
            return Ok(ClassifiedLine::Passthrough {
                raw: raw.to_string(),
                line_index,
            });
        }

        let (key, value) = raw.split_once('=').ok_or_else(|| FormatError::MissingSeparator {
            line_index,
            line: raw.trim_end_matches(['\r', '\n']).to_string(),
        })?;

        Ok(ClassifiedLine::Translatable {
            key: key.trim_end().to_string(),
            payload: self.extract_payload(value),
            line_index,
            ending: LineEnding::of(raw),
        })
    }

    /// Classify every line of a document, applying the format error policy
    pub fn classify_all<S: AsRef<str>>(&self, lines: &[S], policy: FormatErrorPolicy) -> Result<ClassifiedDocument, FormatError> {
        let mut document = ClassifiedDocument {
            lines: Vec::with_capacity(lines.len()),
            skipped: Vec::new(),
        };

        for (line_index, raw) in lines.iter().enumerate() {
            let raw = raw.as_ref();
            match self.classify(raw, line_index) {
                Ok(classified) => document.lines.push(classified),
                Err(e) if policy == FormatErrorPolicy::Skip => {
                    document.lines.push(ClassifiedLine::Passthrough {
                        raw: raw.to_string(),
                        line_index,
                    });
                    document.skipped.push(e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(document)
    }

    // The sentinel is only removed when it is actually there, so values written
    // without a trailing comma keep their last character.
    fn extract_payload(&self, value: &str) -> String {
        let mut value = value.trim();
        if let Some(sentinel) = self.sentinel {
            value = value.strip_suffix(sentinel).unwrap_or(value).trim_end();
        }
        value.replace('"', "")
    }
}
