use super::*;

impl FormValidator {
    /// Error regions for `field`: its siblings matching the form-error selector,
    /// else matches under its parent, plus every `[data-form-error-for]` naming
    /// the field's id. Order is preserved and duplicates dropped.
    pub fn find_form_error(&self, doc: &Document, field: NodeId) -> Result<Vec<NodeId>> {
        let selector = self.config.form_error_selector.as_str();
        let mut found = Vec::new();
        for sibling in doc.element_siblings(field) {
            if doc.matches_selector(sibling, selector)? {
                found.push(sibling);
            }
        }

        if found.is_empty() {
            if let Some(parent) = doc.parent(field) {
                found = doc.query_selector_from(parent, selector)?;
            }
        }

        if let Some(id) = field_id(doc, field) {
            for region in doc.query_selector_all("[data-form-error-for]")? {
                if doc.attr(region, "data-form-error-for").as_deref() == Some(id.as_str()) {
                    found.push(region);
                }
            }
        }

        let mut seen = HashSet::new();
        found.retain(|node| seen.insert(*node));
        Ok(found)
    }

    /// `label[for=<id>]` inside the container, else the closest ancestor label.
    pub fn find_label(&self, doc: &Document, field: NodeId) -> Result<Option<NodeId>> {
        if let Some(id) = field_id(doc, field) {
            let by_for = doc
                .query_selector_from(self.container, "label[for]")?
                .into_iter()
                .find(|label| doc.attr(*label, "for").as_deref() == Some(id.as_str()));
            if by_for.is_some() {
                return Ok(by_for);
            }
        }
        doc.closest(field, "label")
    }

    /// Labels of each radio; radios without one are skipped.
    pub fn find_radio_labels(&self, doc: &Document, radios: &[NodeId]) -> Result<Vec<NodeId>> {
        let mut labels = Vec::new();
        for radio in radios {
            if let Some(label) = self.find_label(doc, *radio)? {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        Ok(labels)
    }

    /// Radios in the container named `group_name`, in document order.
    pub fn radio_group(&self, doc: &Document, group_name: &str) -> Result<Vec<NodeId>> {
        Ok(doc
            .query_selector_from(self.container, r#"input[type="radio"]"#)?
            .into_iter()
            .filter(|radio| doc.attr(*radio, "name").as_deref() == Some(group_name))
            .collect())
    }

    /// Elements anywhere in the document whose `data-equalto` names `id`.
    pub(crate) fn equal_to_dependents(&self, doc: &Document, id: &str) -> Result<Vec<NodeId>> {
        Ok(doc
            .query_selector_all("[data-equalto]")?
            .into_iter()
            .filter(|node| doc.attr(*node, "data-equalto").as_deref() == Some(id))
            .collect())
    }
}

pub(crate) fn field_id(doc: &Document, field: NodeId) -> Option<String> {
    doc.attr(field, "id").filter(|id| !id.is_empty())
}
