use super::*;

/// What a validator did with one [`UiEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing is wired for this event, or the validator was destroyed.
    Ignored,
    FieldValidated { field: NodeId, valid: bool },
    /// A submit was validated; `prevent_default` is set when the form is invalid.
    FormValidated { valid: bool, prevent_default: bool },
    FormReset,
}

impl EventOutcome {
    pub fn prevent_default(&self) -> bool {
        matches!(
            self,
            Self::FormValidated {
                prevent_default: true,
                ..
            }
        )
    }
}

impl FormValidator {
    pub(crate) fn wire_events(&mut self) {
        self.listeners.clear();
        self.listeners.insert((self.container, UiEventKind::Submit));
        self.listeners.insert((self.container, UiEventKind::Reset));

        let mut field_kinds = Vec::new();
        if self.config.validate_on == ValidateOn::FieldChange {
            field_kinds.push(UiEventKind::Change);
        }
        if self.config.live_validate {
            field_kinds.push(UiEventKind::Input);
        }
        if self.config.validate_on_blur {
            field_kinds.push(UiEventKind::Blur);
        }
        for field in &self.fields {
            for kind in &field_kinds {
                self.listeners.insert((*field, *kind));
            }
        }
    }

    /// Whether a handler is wired for `kind` on `node`.
    pub fn listens_to(&self, node: NodeId, kind: UiEventKind) -> bool {
        self.listeners.contains(&(node, kind))
    }

    pub fn handle_event(&mut self, doc: &mut Document, event: &UiEvent) -> Result<EventOutcome> {
        if !self.listens_to(event.target, event.kind) {
            trace!(kind = %event.kind, target = %doc.describe(event.target), "event not wired");
            return Ok(EventOutcome::Ignored);
        }

        match event.kind {
            UiEventKind::Submit => {
                let valid = self.validate_form(doc)?;
                Ok(EventOutcome::FormValidated {
                    valid,
                    prevent_default: !valid,
                })
            }
            UiEventKind::Reset => {
                self.reset_form(doc)?;
                Ok(EventOutcome::FormReset)
            }
            UiEventKind::Change | UiEventKind::Input | UiEventKind::Blur => {
                let valid = self.validate_field(doc, event.target)?;
                Ok(EventOutcome::FieldValidated {
                    field: event.target,
                    valid,
                })
            }
        }
    }

    /// Handles a batch from one user action, in order.
    pub fn handle_events(
        &mut self,
        doc: &mut Document,
        events: &[UiEvent],
    ) -> Result<Vec<EventOutcome>> {
        events
            .iter()
            .map(|event| self.handle_event(doc, event))
            .collect()
    }
}
