use super::*;

/// When a field re-validates on its own `change` event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ValidateOn {
    #[default]
    #[serde(rename = "fieldChange")]
    FieldChange,
    /// Only submit and explicit calls validate.
    #[serde(rename = "none", alias = "manual")]
    Manual,
}

/// `aria-live` politeness written onto global error regions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum A11yLevel {
    #[default]
    Assertive,
    Polite,
    Off,
}

impl A11yLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assertive => "assertive",
            Self::Polite => "polite",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for A11yLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merged validator settings. Fixed once a [`FormValidator`] is built.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub validate_on: ValidateOn,
    pub live_validate: bool,
    pub validate_on_blur: bool,
    pub label_error_class: String,
    pub input_error_class: String,
    pub form_error_selector: String,
    pub form_error_class: String,
    pub a11y_attributes: bool,
    pub a11y_error_level: A11yLevel,
    pub patterns: PatternSet,
    pub validators: ValidatorRegistry,
}

impl ValidatorConfig {
    pub fn defaults() -> Result<Self> {
        Ok(Self {
            validate_on: ValidateOn::FieldChange,
            live_validate: false,
            validate_on_blur: false,
            label_error_class: "is-invalid-label".into(),
            input_error_class: "is-invalid-input".into(),
            form_error_selector: ".form-error".into(),
            form_error_class: "is-visible".into(),
            a11y_attributes: true,
            a11y_error_level: A11yLevel::Assertive,
            patterns: PatternSet::defaults()?,
            validators: ValidatorRegistry::with_builtins(),
        })
    }

    /// Scalars in `overrides` replace ours; patterns and validators merge by name.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self> {
        let ConfigOverrides {
            validate_on,
            label_error_class,
            input_error_class,
            form_error_selector,
            form_error_class,
            a11y_attributes,
            a11y_error_level,
            live_validate,
            validate_on_blur,
            patterns,
            validators,
        } = overrides;

        if let Some(value) = validate_on {
            self.validate_on = value;
        }
        if let Some(value) = live_validate {
            self.live_validate = value;
        }
        if let Some(value) = validate_on_blur {
            self.validate_on_blur = value;
        }
        for (slot, value) in [
            (&mut self.label_error_class, label_error_class),
            (&mut self.input_error_class, input_error_class),
            (&mut self.form_error_class, form_error_class),
        ] {
            if let Some(value) = value {
                if value.split_whitespace().count() != 1 {
                    return Err(Error::InvalidConfig(format!(
                        "class name {value:?} must be a single token"
                    )));
                }
                *slot = value;
            }
        }
        if let Some(selector) = form_error_selector {
            SelectorList::parse(&selector)?;
            self.form_error_selector = selector;
        }
        if let Some(value) = a11y_attributes {
            self.a11y_attributes = value;
        }
        if let Some(value) = a11y_error_level {
            self.a11y_error_level = value;
        }

        let mut compiled = PatternSet::empty();
        for (name, source) in patterns {
            compiled.insert(name, Pattern::new(&source)?);
        }
        self.patterns.merge(compiled);
        self.validators.merge(validators);
        Ok(self)
    }
}

/// Caller-supplied settings layered over [`ValidatorConfig::defaults`].
///
/// Deserializes from the camelCase JSON option object:
///
/// ```
/// use form_abide::{A11yLevel, ConfigOverrides};
///
/// let overrides = ConfigOverrides::from_json(
///     r#"{"liveValidate": true, "a11yErrorLevel": "polite", "patterns": {"zip": "^\\d{5}$"}}"#,
/// )?;
/// assert_eq!(overrides.live_validate, Some(true));
/// assert_eq!(overrides.a11y_error_level, Some(A11yLevel::Polite));
/// # Ok::<(), form_abide::Error>(())
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default)]
    pub validate_on: Option<ValidateOn>,
    #[serde(default)]
    pub label_error_class: Option<String>,
    #[serde(default)]
    pub input_error_class: Option<String>,
    #[serde(default)]
    pub form_error_selector: Option<String>,
    #[serde(default)]
    pub form_error_class: Option<String>,
    #[serde(default)]
    pub a11y_attributes: Option<bool>,
    #[serde(default)]
    pub a11y_error_level: Option<A11yLevel>,
    #[serde(default)]
    pub live_validate: Option<bool>,
    #[serde(default)]
    pub validate_on_blur: Option<bool>,
    /// Pattern name to regex source; compiled when the config is merged.
    #[serde(default)]
    pub patterns: BTreeMap<String, String>,
    #[serde(skip)]
    pub validators: ValidatorRegistry,
}

impl ConfigOverrides {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| Error::InvalidConfig(err.to_string()))
    }

    pub fn pattern(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.patterns.insert(name.into(), source.into());
        self
    }

    pub fn validator<V>(mut self, name: impl Into<String>, validator: V) -> Self
    where
        V: FieldValidator + 'static,
    {
        self.validators.register(name, validator);
        self
    }
}
