use super::*;

const ALPHA: &str = r"^[a-zA-Z]+$";
const ALPHA_NUMERIC: &str = r"^[a-zA-Z0-9]+$";
// `\d` is Unicode-aware in the backend; digits are spelled `[0-9]` throughout.
const INTEGER: &str = r"^[-+]?[0-9]+$";
const NUMBER: &str = r"^[-+]?[0-9]*(?:[.,][0-9]+)?$";
// visa, mastercard (incl. 2-series), discover, amex, diners, jcb
const CARD: &str = r"^(?:4[0-9]{12}(?:[0-9]{3})?|5[1-5][0-9]{14}|(?:222[1-9]|2[3-6][0-9]{2}|27[0-1][0-9]|2720)[0-9]{12}|6(?:011|5[0-9][0-9])[0-9]{12}|3[47][0-9]{13}|3(?:0[0-5]|[68][0-9])[0-9]{11}|(?:2131|1800|35[0-9]{3})[0-9]{11})$";
const CVV: &str = r"^([0-9]){3,4}$";
// WHATWG valid e-mail address
const EMAIL: &str = r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$";
const URL: &str = r#"^((?:(https?|ftps?|file|ssh|sftp)://|www[0-9]{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)(?:[^\s()<>]+|\((?:[^\s()<>]+|(?:\([^\s()<>]+\)))*\))+(?:\((?:[^\s()<>]+|(?:\([^\s()<>]+\)))*\)|[^\s`!()\[\]{};:'".,<>?\x{ab}\x{bb}\x{201c}\x{201d}\x{2018}\x{2019}]))$"#;
const DOMAIN: &str = r"^([a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,8}$";
const DATETIME: &str = r"^([0-2][0-9]{3})-([0-1][0-9])-([0-3][0-9])T([0-5][0-9]):([0-5][0-9]):([0-5][0-9])(Z|([-+]([0-1][0-9]):00))$";
// YYYY-MM-DD, rejecting 02-30 and 31 in short months
const DATE: &str = r"(?:19|20)[0-9]{2}-(?:(?:0[1-9]|1[0-2])-(?:0[1-9]|1[0-9]|2[0-9])|(?:(?!02)(?:0[1-9]|1[0-2])-(?:30))|(?:(?:0[13578]|1[02])-31))$";
const TIME: &str = r"^(0[0-9]|1[0-9]|2[0-3])(:[0-5][0-9]){2}$";
const DATE_ISO: &str = r"^[0-9]{4}[/\-][0-9]{1,2}[/\-][0-9]{1,2}$";
const MONTH_DAY_YEAR: &str = r"^(0[1-9]|1[012])[- /.](0[1-9]|[12][0-9]|3[01])[- /.][0-9]{4}$";
const DAY_MONTH_YEAR: &str = r"^(0[1-9]|[12][0-9]|3[01])[- /.](0[1-9]|1[012])[- /.][0-9]{4}$";
const COLOR: &str = r"^#?([a-fA-F0-9]{6}|[a-fA-F0-9]{3})$";

/// A named pattern a field value is tested against.
#[derive(Debug, Clone)]
pub struct Pattern {
    kind: PatternKind,
}

#[derive(Debug, Clone)]
enum PatternKind {
    Regex(Regex),
    // Passes when any member matches.
    AnyOf(Vec<Regex>),
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self> {
        Ok(Self {
            kind: PatternKind::Regex(Regex::new(source)?),
        })
    }

    /// Passes when any of `sources` matches; `website` is `domain` or `url`.
    pub fn any_of(sources: &[&str]) -> Result<Self> {
        let members = sources
            .iter()
            .map(|source| Regex::new(source))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            kind: PatternKind::AnyOf(members),
        })
    }

    /// Unanchored test, like `RegExp.prototype.test`: anchors must be part of the source.
    pub fn test(&self, input: &str) -> Result<bool> {
        match &self.kind {
            PatternKind::Regex(regex) => regex.is_match(input),
            PatternKind::AnyOf(members) => {
                for regex in members {
                    if regex.is_match(input)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

/// Pattern name to compiled pattern. Lookups are exact and case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    entries: BTreeMap<String, Pattern>,
}

impl PatternSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in patterns shipped with every validator.
    pub fn defaults() -> Result<Self> {
        let mut set = Self::empty();
        for (name, source) in [
            ("alpha", ALPHA),
            ("alpha_numeric", ALPHA_NUMERIC),
            ("integer", INTEGER),
            ("number", NUMBER),
            ("card", CARD),
            ("cvv", CVV),
            ("email", EMAIL),
            ("url", URL),
            ("domain", DOMAIN),
            ("datetime", DATETIME),
            ("date", DATE),
            ("time", TIME),
            ("dateISO", DATE_ISO),
            ("month_day_year", MONTH_DAY_YEAR),
            ("day_month_year", DAY_MONTH_YEAR),
            ("color", COLOR),
        ] {
            set.insert(name, Pattern::new(source)?);
        }
        set.insert("website", Pattern::any_of(&[DOMAIN, URL])?);
        Ok(set)
    }

    pub fn insert(&mut self, name: impl Into<String>, pattern: Pattern) -> Option<Pattern> {
        self.entries.insert(name.into(), pattern)
    }

    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of `other` replace same-named entries here; new names are added.
    pub fn merge(&mut self, other: PatternSet) {
        self.entries.extend(other.entries);
    }
}
