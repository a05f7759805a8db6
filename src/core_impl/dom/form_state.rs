use super::*;

impl Dom {
    /// Derives live state the parser cannot set per element: textarea values
    /// from their body, one selected option per single select (the last
    /// `selected` wins), and one checked radio per group.
    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        for node in self.all_elements() {
            let Some(element) = self.element(node) else {
                continue;
            };
            if element.is_tag("textarea") {
                let body = self.text_content(node);
                self.expect_element_mut(node, "textarea")?.value = body;
            } else if element.is_tag("select") && !element.attrs.contains_key("multiple") {
                let last_selected = self
                    .select_options(node)
                    .into_iter()
                    .rev()
                    .find(|option| self.element(*option).is_some_and(|e| e.selected));
                if let Some(keep) = last_selected {
                    self.deselect_other_options(node, keep);
                }
            }
        }
        for node in self.all_elements() {
            let checked_radio = self
                .element(node)
                .is_some_and(|e| is_radio_input(e) && e.attrs.contains_key("checked"));
            if checked_radio {
                self.set_checked(node, true)?;
            }
        }
        Ok(())
    }

    fn value_mismatch(&self, node_id: NodeId, expected: &str) -> Error {
        Error::TypeMismatch {
            target: describe_node(self, node_id),
            expected: expected.into(),
            actual: self.tag_name(node_id).unwrap_or_default().to_string(),
        }
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self.expect_element(node_id, "value")?;
        match element.tag_name.as_str() {
            "select" => Ok(self
                .selected_option(node_id)
                .map(|option| self.option_effective_value(option))
                .unwrap_or_default()),
            "option" => Ok(self.option_effective_value(node_id)),
            "input" | "textarea" => Ok(element.value.clone()),
            _ => Err(self.value_mismatch(node_id, "input, select, textarea or option")),
        }
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        let tag_name = self.expect_element(node_id, "value")?.tag_name.clone();
        match tag_name.as_str() {
            "select" => self.select_option(node_id, value),
            "input" | "textarea" => {
                self.expect_element_mut(node_id, "value")?.value = value.to_string();
                Ok(())
            }
            _ => Err(self.value_mismatch(node_id, "input, select or textarea")),
        }
    }

    pub(crate) fn checked(&self, node_id: NodeId) -> Result<bool> {
        Ok(self.expect_element(node_id, "checked")?.checked)
    }

    /// Checking a radio unchecks the other radios of its group.
    pub(crate) fn set_checked(&mut self, node_id: NodeId, checked: bool) -> Result<()> {
        if checked && is_radio_input(self.expect_element(node_id, "checked")?) {
            for other in self.radio_group_peers(node_id) {
                if let Some(element) = self.element_mut(other) {
                    element.checked = false;
                }
            }
        }
        self.expect_element_mut(node_id, "checked")?.checked = checked;
        Ok(())
    }

    /// Other radios sharing `radio`'s non-empty name and form owner.
    fn radio_group_peers(&self, radio: NodeId) -> Vec<NodeId> {
        let name = self.attr(radio, "name").unwrap_or_default();
        if name.is_empty() {
            return Vec::new();
        }
        let owner = self.closest_tag(radio, "form");
        self.all_elements()
            .into_iter()
            .filter(|node| *node != radio)
            .filter(|node| self.element(*node).is_some_and(is_radio_input))
            .filter(|node| self.attr(*node, "name").as_deref() == Some(name.as_str()))
            .filter(|node| self.closest_tag(*node, "form") == owner)
            .collect()
    }

    /// `<option>` descendants of `select_node`, optgroups included.
    pub(crate) fn select_options(&self, select_node: NodeId) -> Vec<NodeId> {
        let mut options = self.descendant_elements(select_node);
        options.retain(|node| self.element(*node).is_some_and(|e| e.is_tag("option")));
        options
    }

    /// The `value` attribute, else the trimmed text.
    pub(crate) fn option_effective_value(&self, option_node: NodeId) -> String {
        self.attr(option_node, "value")
            .unwrap_or_else(|| self.text_content(option_node).trim().to_string())
    }

    /// The option a single-choice select currently shows: the first selected
    /// option, else the first option. `None` for an empty select.
    pub(crate) fn selected_option(&self, select_node: NodeId) -> Option<NodeId> {
        let options = self.select_options(select_node);
        let selected = options
            .iter()
            .copied()
            .find(|option| self.element(*option).is_some_and(|e| e.selected));
        match selected {
            Some(option) => Some(option),
            None if self.has_attr(select_node, "multiple") => None,
            None => options.first().copied(),
        }
    }

    pub(crate) fn select_option(&mut self, select_node: NodeId, value: &str) -> Result<()> {
        if !self.expect_element(select_node, "select")?.is_tag("select") {
            return Err(self.value_mismatch(select_node, "select"));
        }
        let matched = self
            .select_options(select_node)
            .into_iter()
            .find(|option| self.option_effective_value(*option) == value)
            .ok_or_else(|| {
                Error::SelectorNotFound(format!(
                    "{} option with value {}",
                    describe_node(self, select_node),
                    quote_attr_value(value)
                ))
            })?;
        self.expect_element_mut(matched, "option")?.selected = true;
        self.deselect_other_options(select_node, matched);
        Ok(())
    }

    /// Selects the option whose value is empty, or deselects every option when
    /// there is none.
    pub(crate) fn clear_select(&mut self, select_node: NodeId) -> Result<()> {
        let options = self.select_options(select_node);
        let empty = options
            .iter()
            .copied()
            .find(|option| self.option_effective_value(*option).is_empty());
        for option in options {
            self.expect_element_mut(option, "option")?.selected = Some(option) == empty;
        }
        Ok(())
    }

    pub(crate) fn sync_select_after_option_selected(&mut self, option_node: NodeId) {
        if !self.element(option_node).is_some_and(|e| e.is_tag("option")) {
            return;
        }
        match self.closest_tag(option_node, "select") {
            Some(select) if !self.has_attr(select, "multiple") => {
                self.deselect_other_options(select, option_node)
            }
            _ => {}
        }
    }

    fn deselect_other_options(&mut self, select_node: NodeId, keep: NodeId) {
        for option in self.select_options(select_node) {
            if option != keep {
                if let Some(element) = self.element_mut(option) {
                    element.selected = false;
                }
            }
        }
    }

    pub(crate) fn style_property(&self, node_id: NodeId, name: &str) -> Result<Option<String>> {
        let style = self.expect_element(node_id, "style")?.inline_style();
        Ok(style.get(&name.to_ascii_lowercase()).map(str::to_string))
    }

    /// Updates one inline declaration; an empty `value` removes it.
    pub(crate) fn set_style_property(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self.expect_element_mut(node_id, "style")?;
        let mut style = element.inline_style();
        style.set(name, value);
        element.attrs.insert("style".to_string(), style.to_string());
        Ok(())
    }

    /// False when the node or an ancestor has `hidden` or an inline `display: none`.
    pub(crate) fn is_displayed(&self, node_id: NodeId) -> bool {
        !std::iter::once(node_id)
            .chain(self.ancestors(node_id))
            .filter_map(|node| self.element(node))
            .any(|element| {
                element.attrs.contains_key("hidden")
                    || element
                        .inline_style()
                        .get("display")
                        .is_some_and(|display| display.eq_ignore_ascii_case("none"))
            })
    }
}
