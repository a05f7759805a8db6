use super::*;

impl FormValidator {
    /// Links `field` to its error regions: `aria-describedby` toward the first
    /// region, `for` on region labels, and `role="alert"` on every region.
    /// Attributes the page already set are kept.
    pub fn add_a11y_attributes(&self, doc: &mut Document, field: NodeId) -> Result<()> {
        let errors = self.find_form_error(doc, field)?;
        let Some(first) = errors.first().copied() else {
            return Ok(());
        };

        if !doc.has_attr(field, "aria-describedby") {
            let error_id = match field_id(doc, first) {
                Some(id) => id,
                None => {
                    let id = doc.generate_id("abide-error");
                    doc.set_attr(first, "id", &id)?;
                    id
                }
            };
            doc.set_attr(field, "aria-describedby", &error_id)?;
        }

        let unlinked_labels = errors
            .iter()
            .copied()
            .filter(|node| doc.tag_name(*node) == Some("label") && !doc.has_attr(*node, "for"))
            .collect::<Vec<_>>();
        if !unlinked_labels.is_empty() {
            let input_id = match field_id(doc, field) {
                Some(id) => id,
                None => {
                    let id = doc.generate_id("abide-input");
                    doc.set_attr(field, "id", &id)?;
                    id
                }
            };
            for label in unlinked_labels {
                doc.set_attr(label, "for", &input_id)?;
            }
        }

        for region in errors {
            if !doc.has_attr(region, "role") {
                doc.set_attr(region, "role", "alert")?;
            }
        }
        Ok(())
    }

    pub fn add_global_error_a11y_attributes(&self, doc: &mut Document, region: NodeId) -> Result<()> {
        if !doc.has_attr(region, "aria-live") {
            doc.set_attr(region, "aria-live", self.config.a11y_error_level.as_str())?;
        }
        Ok(())
    }
}
