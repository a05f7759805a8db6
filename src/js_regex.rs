use super::*;

/// A compiled pattern with JS `RegExp.prototype.test` semantics (unanchored
/// search, look-around supported). Shorthand classes such as `\d` follow the
/// backend and match Unicode digits.
#[derive(Debug, Clone)]
pub(crate) struct Regex {
    source: String,
    backend: fancy_regex::Regex,
}

impl Regex {
    pub(crate) fn new(pattern: &str) -> Result<Self> {
        let backend = fancy_regex::Regex::new(pattern).map_err(|err| Error::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self {
            source: pattern.to_string(),
            backend,
        })
    }

    pub(crate) fn is_match(&self, input: &str) -> Result<bool> {
        self.backend
            .is_match(input)
            .map_err(|err| Error::PatternRuntime {
                pattern: self.source.clone(),
                message: err.to_string(),
            })
    }
}
