use super::*;

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::js_regex::Regex;

mod a11y;
mod config;
mod events;
mod lookup;
mod patterns;
mod registry;

pub use config::{A11yLevel, ConfigOverrides, ValidateOn, ValidatorConfig};
pub use events::EventOutcome;
pub use patterns::{Pattern, PatternSet};
pub use registry::{FieldValidator, ValidatorRegistry};

use lookup::field_id;
use registry::EQUAL_TO;

const GLOBAL_ERROR_SELECTOR: &str = "[data-abide-error]";
const FIELD_SELECTOR: &str = r#"input:not([type="submit"]), textarea, select"#;

// Stack headroom for equal-to propagation through long dependency chains.
const RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Radio,
    Checkbox,
    Select,
    Text,
}

fn field_kind(element: &Element) -> FieldKind {
    if is_radio_input(element) {
        FieldKind::Radio
    } else if is_checkbox_input(element) {
        FieldKind::Checkbox
    } else if element.is_tag("select") {
        FieldKind::Select
    } else {
        FieldKind::Text
    }
}

/// Attribute-driven validator bound to one container element.
///
/// The validator keeps only node handles; every association between fields,
/// labels and error regions is looked up again on each pass, so the document
/// may change between calls. Call [`FormValidator::rescan`] after adding or
/// removing fields.
#[derive(Debug)]
pub struct FormValidator {
    container: NodeId,
    config: ValidatorConfig,
    fields: Vec<NodeId>,
    global_errors: Vec<NodeId>,
    listeners: HashSet<(NodeId, UiEventKind)>,
    attached: bool,
}

impl FormValidator {
    pub fn new(doc: &mut Document, container: NodeId, overrides: ConfigOverrides) -> Result<Self> {
        doc.dom.expect_element(container, "FormValidator::new")?;
        let config = ValidatorConfig::defaults()?.with_overrides(overrides)?;
        let mut validator = Self {
            container,
            config,
            fields: Vec::new(),
            global_errors: Vec::new(),
            listeners: HashSet::new(),
            attached: true,
        };
        validator.rescan(doc)?;
        debug!(
            container = %doc.describe(container),
            fields = validator.fields.len(),
            global_errors = validator.global_errors.len(),
            patterns = ?validator.config.patterns.names().collect::<Vec<_>>(),
            validators = ?validator.config.validators.names().collect::<Vec<_>>(),
            "validator attached"
        );
        Ok(validator)
    }

    /// Re-collects fields and global error regions, checks their validator
    /// names, injects accessibility attributes and re-wires events.
    pub fn rescan(&mut self, doc: &mut Document) -> Result<()> {
        let fields = doc.query_selector_from(self.container, FIELD_SELECTOR)?;
        for field in &fields {
            self.check_validator_names(doc, *field)?;
        }
        self.fields = fields;
        self.global_errors = doc.query_selector_from(self.container, GLOBAL_ERROR_SELECTOR)?;

        if self.config.a11y_attributes {
            for field in self.fields.clone() {
                self.add_a11y_attributes(doc, field)?;
            }
            for region in self.global_errors.clone() {
                self.add_global_error_a11y_attributes(doc, region)?;
            }
        }
        if self.attached {
            self.wire_events();
        }
        Ok(())
    }

    fn check_validator_names(&self, doc: &Document, field: NodeId) -> Result<()> {
        let Some(names) = doc.attr(field, "data-validator") else {
            return Ok(());
        };
        match names
            .split_whitespace()
            .find(|name| !self.config.validators.contains(name))
        {
            Some(unknown) => Err(Error::UnknownValidator {
                name: unknown.to_string(),
                field: doc.describe(field),
            }),
            None => Ok(()),
        }
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn fields(&self) -> &[NodeId] {
        &self.fields
    }

    pub fn global_errors(&self) -> &[NodeId] {
        &self.global_errors
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    fn is_skipped(doc: &Document, field: NodeId) -> bool {
        match doc.dom.element(field) {
            Some(element) => {
                element.attrs.contains_key("data-abide-ignore")
                    || is_hidden_input(element)
                    || element.disabled
            }
            None => true,
        }
    }

    /// Validates one field, updates its error state and notifies
    /// `valid.zf.abide` or `invalid.zf.abide`. Fields depending on it through
    /// `data-equalto` are re-validated when it passes.
    pub fn validate_field(&self, doc: &mut Document, field: NodeId) -> Result<bool> {
        let mut visited = HashSet::new();
        self.validate_field_in_pass(doc, field, &mut visited)
    }

    fn validate_field_in_pass(
        &self,
        doc: &mut Document,
        field: NodeId,
        visited: &mut HashSet<NodeId>,
    ) -> Result<bool> {
        visited.insert(field);
        if Self::is_skipped(doc, field) {
            trace!(field = %doc.describe(field), "skipped");
            return Ok(true);
        }

        let element = doc.dom.expect_element(field, "validate_field")?;
        let kind = field_kind(element);
        let required = element.required;

        let clear_require = self.required_check(doc, field)?;
        let validated = match kind {
            FieldKind::Radio | FieldKind::Checkbox | FieldKind::Select => clear_require,
            FieldKind::Text => self.validate_text(doc, field, None)?,
        };
        let custom = match doc.attr(field, "data-validator") {
            Some(names) if !names.trim().is_empty() => {
                self.match_validation(doc, field, &names, required)?
            }
            _ => true,
        };
        let equal = match doc.attr(field, "data-equalto") {
            Some(target) if !target.is_empty() => {
                let validator = self.config.validators.get(EQUAL_TO).ok_or_else(|| {
                    Error::UnknownValidator {
                        name: EQUAL_TO.to_string(),
                        field: doc.describe(field),
                    }
                })?;
                validator.validate(doc, field, required, doc.parent(field))
            }
            _ => true,
        };

        let valid = clear_require && validated && custom && equal;
        trace!(
            field = %doc.describe(field),
            clear_require,
            validated,
            custom,
            equal,
            valid,
            "field checks"
        );

        if valid {
            if let Some(id) = field_id(doc, field) {
                for dependent in self.equal_to_dependents(doc, &id)? {
                    if visited.contains(&dependent) {
                        continue;
                    }
                    debug!(
                        source = %doc.describe(field),
                        dependent = %doc.describe(dependent),
                        "re-validating equal-to dependent"
                    );
                    stacker::maybe_grow(RED_ZONE, STACK_GROWTH, || {
                        self.validate_field_in_pass(doc, dependent, visited)
                    })?;
                }
            }
        }

        if valid {
            self.remove_error_classes(doc, field)?;
            doc.dispatch_event(field, "valid.zf.abide")?;
        } else {
            self.add_error_classes(doc, field)?;
            doc.dispatch_event(field, "invalid.zf.abide")?;
        }
        Ok(valid)
    }

    /// The `required` constraint alone. Radios answer for their whole group.
    pub fn required_check(&self, doc: &Document, field: NodeId) -> Result<bool> {
        let element = doc.dom.expect_element(field, "required_check")?;
        match field_kind(element) {
            FieldKind::Radio => {
                let name = element.attrs.get("name").map(String::as_str).unwrap_or_default();
                self.validate_radio(doc, name)
            }
            _ if !element.required => Ok(true),
            FieldKind::Checkbox => Ok(element.checked),
            FieldKind::Select => Ok(doc
                .selected_option(field)
                .is_some_and(|option| !doc.dom.option_effective_value(option).is_empty())),
            FieldKind::Text => Ok(!doc.value(field)?.trim().is_empty()),
        }
    }

    /// A radio group is required when any member is; then one must be checked.
    pub fn validate_radio(&self, doc: &Document, group_name: &str) -> Result<bool> {
        let group = self.radio_group(doc, group_name)?;
        let required = group
            .iter()
            .any(|radio| doc.dom.element(*radio).is_some_and(|e| e.required));
        if !required {
            return Ok(true);
        }
        Ok(group
            .iter()
            .any(|radio| doc.dom.element(*radio).is_some_and(|e| e.checked)))
    }

    /// Tests the field value against a pattern resolved from `explicit`, the
    /// `pattern` attribute or the `type` attribute, in that order. A name that
    /// is neither a known pattern nor the field type is compiled as a regex.
    pub fn validate_text(
        &self,
        doc: &Document,
        field: NodeId,
        explicit: Option<&str>,
    ) -> Result<bool> {
        let element = doc.dom.expect_element(field, "validate_text")?;
        let type_attr = element.attrs.get("type").map(String::as_str);
        let resolved = explicit
            .filter(|name| !name.is_empty())
            .or_else(|| {
                element
                    .attrs
                    .get("pattern")
                    .map(String::as_str)
                    .filter(|name| !name.is_empty())
            })
            .or(type_attr);
        let value = doc.value(field)?;

        if value.is_empty() {
            return Ok(!element.required);
        }
        let Some(name) = resolved else {
            return Ok(true);
        };
        if let Some(pattern) = self.config.patterns.get(name) {
            return pattern.test(&value);
        }
        if Some(name) != type_attr {
            return Regex::new(name)?.is_match(&value);
        }
        Ok(true)
    }

    /// Runs every validator named in `names` (space separated); all must pass.
    pub fn match_validation(
        &self,
        doc: &Document,
        field: NodeId,
        names: &str,
        required: bool,
    ) -> Result<bool> {
        let parent = doc.parent(field);
        let mut all_passed = true;
        for name in names.split_whitespace() {
            let validator =
                self.config
                    .validators
                    .get(name)
                    .ok_or_else(|| Error::UnknownValidator {
                        name: name.to_string(),
                        field: doc.describe(field),
                    })?;
            if !validator.validate(doc, field, required, parent) {
                trace!(field = %doc.describe(field), validator = name, "custom validator failed");
                all_passed = false;
            }
        }
        Ok(all_passed)
    }

    pub fn add_error_classes(&self, doc: &mut Document, field: NodeId) -> Result<()> {
        if let Some(label) = self.find_label(doc, field)? {
            doc.class_add(label, &self.config.label_error_class)?;
        }
        for region in self.find_form_error(doc, field)? {
            doc.class_add(region, &self.config.form_error_class)?;
        }
        doc.class_add(field, &self.config.input_error_class)?;
        doc.set_attr(field, "data-invalid", "")?;
        doc.set_attr(field, "aria-invalid", "true")
    }

    /// Inverse of [`FormValidator::add_error_classes`]. A named radio clears its whole group.
    pub fn remove_error_classes(&self, doc: &mut Document, field: NodeId) -> Result<()> {
        let element = doc.dom.expect_element(field, "remove_error_classes")?;
        if is_radio_input(element) {
            if let Some(name) = element.attrs.get("name").filter(|name| !name.is_empty()) {
                let name = name.clone();
                return self.remove_radio_error_classes(doc, &name);
            }
        }

        if let Some(label) = self.find_label(doc, field)? {
            doc.class_remove(label, &self.config.label_error_class)?;
        }
        for region in self.find_form_error(doc, field)? {
            doc.class_remove(region, &self.config.form_error_class)?;
        }
        self.clear_field_error_marks(doc, field)
    }

    pub fn remove_radio_error_classes(&self, doc: &mut Document, group_name: &str) -> Result<()> {
        let radios = self.radio_group(doc, group_name)?;
        for label in self.find_radio_labels(doc, &radios)? {
            doc.class_remove(label, &self.config.label_error_class)?;
        }
        for radio in radios {
            for region in self.find_form_error(doc, radio)? {
                doc.class_remove(region, &self.config.form_error_class)?;
            }
            self.clear_field_error_marks(doc, radio)?;
        }
        Ok(())
    }

    fn clear_field_error_marks(&self, doc: &mut Document, field: NodeId) -> Result<()> {
        doc.class_remove(field, &self.config.input_error_class)?;
        doc.remove_attr(field, "data-invalid")?;
        doc.remove_attr(field, "aria-invalid")
    }

    /// Validates every field, shows or hides the global error regions and
    /// notifies `formvalid.zf.abide` or `forminvalid.zf.abide` on the container.
    pub fn validate_form(&self, doc: &mut Document) -> Result<bool> {
        let mut valid = true;
        for field in &self.fields {
            if !self.validate_field(doc, *field)? {
                valid = false;
            }
        }

        for region in doc.query_selector_from(self.container, GLOBAL_ERROR_SELECTOR)? {
            if self.config.a11y_attributes {
                self.add_global_error_a11y_attributes(doc, region)?;
            }
            doc.set_style_property(region, "display", if valid { "none" } else { "block" })?;
        }

        let notification = if valid {
            "formvalid.zf.abide"
        } else {
            "forminvalid.zf.abide"
        };
        doc.dispatch_event(self.container, notification)?;
        debug!(container = %doc.describe(self.container), valid, "form validated");
        Ok(valid)
    }

    /// Clears error state, hides global errors, and empties the values and
    /// checked state of every non-ignored field in the container. Selects fall
    /// back to their empty-valued option.
    pub fn reset_form(&self, doc: &mut Document) -> Result<()> {
        let descendants = doc.dom.descendant_elements(self.container);
        for node in &descendants {
            if doc.tag_name(*node) == Some("small") {
                continue;
            }
            doc.class_remove(*node, &self.config.label_error_class)?;
            doc.class_remove(*node, &self.config.input_error_class)?;
        }

        for region in doc.query_selector_all(&self.config.form_error_selector)? {
            doc.class_remove(region, &self.config.form_error_class)?;
        }
        self.hide_global_errors(doc)?;

        for node in descendants {
            let Some(element) = doc.dom.element(node) else {
                continue;
            };
            if element.attrs.contains_key("data-abide-ignore") {
                continue;
            }
            let is_select = element.is_tag("select");
            let clears_value = is_text_entry_input(element) || element.is_tag("textarea");
            let clears_checked = is_radio_input(element) || is_checkbox_input(element);
            if !(is_select || clears_value || clears_checked) {
                continue;
            }

            doc.remove_attr(node, "data-invalid")?;
            doc.remove_attr(node, "aria-invalid")?;
            if is_select {
                doc.dom.clear_select(node)?;
            } else if clears_value {
                doc.set_value(node, "")?;
                if doc.has_attr(node, "value") {
                    doc.set_attr(node, "value", "")?;
                }
            } else {
                doc.remove_attr(node, "checked")?;
            }
        }

        doc.dispatch_event(self.container, "formreset.zf.abide")?;
        debug!(container = %doc.describe(self.container), "form reset");
        Ok(())
    }

    fn hide_global_errors(&self, doc: &mut Document) -> Result<()> {
        for region in doc.query_selector_from(self.container, GLOBAL_ERROR_SELECTOR)? {
            doc.set_style_property(region, "display", "none")?;
        }
        Ok(())
    }

    /// Hides global errors and strips error state from every field, keeping
    /// values and checked state. Events are ignored afterwards.
    pub fn destroy(&mut self, doc: &mut Document) -> Result<()> {
        self.hide_global_errors(doc)?;
        for field in &self.fields {
            self.remove_error_classes(doc, *field)?;
        }
        self.listeners.clear();
        self.attached = false;
        debug!(container = %doc.describe(self.container), "validator destroyed");
        Ok(())
    }
}
