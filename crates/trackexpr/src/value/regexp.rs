//! Regular expression values

use regex::{Regex, RegexBuilder};

/// A compiled regular expression together with its source and flags.
///
/// Flags `i`, `m` and `s` configure matching; `g` makes `replace` and
/// `split`-style helpers act on every match; `u` and `y` are accepted and
/// recorded.
#[derive(Debug, Clone)]
pub struct RegExpValue {
    /// Pattern text
    pub source: String,

    /// Normalised flag letters
    pub flags: String,

    /// Compiled matcher
    pub regex: Regex,
}

impl RegExpValue {
    /// Compile `source` with `flags`.
    pub fn new(source: &str, flags: &str) -> Result<Self, String> {
        let mut builder = RegexBuilder::new(source);
        for flag in flags.chars() {
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                'g' | 'u' | 'y' => {}
                other => return Err(format!("Invalid flags supplied to RegExp constructor '{}'", other)),
            }
        }
        let regex = builder
            .build()
            .map_err(|e| format!("Invalid regular expression: /{}/: {}", source, e))?;

        let mut normalised: Vec<char> = flags.chars().collect();
        normalised.sort_unstable();
        normalised.dedup();

        Ok(Self {
            source: source.to_string(),
            flags: normalised.into_iter().collect(),
            regex,
        })
    }

    /// Whether the `g` flag is set.
    pub fn is_global(&self) -> bool {
        self.flags.contains('g')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_flag() {
        let re = RegExpValue::new("^abc$", "i").unwrap();
        assert!(re.regex.is_match("ABC"));
    }

    #[test]
    fn test_flags_normalised() {
        let re = RegExpValue::new("a", "gig").unwrap();
        assert_eq!(re.flags, "gi");
        assert!(re.is_global());
    }

    #[test]
    fn test_invalid_flag() {
        assert!(RegExpValue::new("a", "q").is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = RegExpValue::new("(", "").unwrap_err();
        assert!(err.contains("Invalid regular expression"));
    }
}
