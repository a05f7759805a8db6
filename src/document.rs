use super::*;

/// A parsed HTML document with live form-control state, notification
/// listeners and a bounded trace log.
///
/// Queries take CSS selectors or [`NodeId`] handles. User actions such as
/// [`Document::type_text`] mutate state the way a browser would and return the
/// [`UiEvent`]s that fired, so a caller can hand them to a validator.
#[derive(Debug)]
pub struct Document {
    pub(crate) dom: Dom,
    listeners: ListenerStore,
    trace_state: TraceState,
    rng: RngState,
}

impl Document {
    pub fn from_html(html: &str) -> Result<Self> {
        let dom = parse_html(html)?;
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            trace_state: TraceState::default(),
            rng: RngState::default(),
        })
    }

    /// Parses `html` as a fragment and appends its nodes under `parent`.
    /// Returns the top-level elements that were inserted.
    pub fn append_html(&mut self, parent: NodeId, html: &str) -> Result<Vec<NodeId>> {
        let fragment = parse_html(html)?;
        let inserted = self.dom.import_fragment(parent, &fragment)?;
        for node in &inserted {
            // Radios arriving with `checked` take over their group.
            for element in self.dom.subtree_elements(*node) {
                let checked_radio = self
                    .dom
                    .element(element)
                    .is_some_and(|e| is_radio_input(e) && e.attrs.contains_key("checked"));
                if checked_radio {
                    self.dom.set_checked(element, true)?;
                }
            }
        }
        self.trace_action_line(format!(
            "[action] append_html parent={} inserted={}",
            self.describe(parent),
            inserted.len()
        ));
        Ok(inserted)
    }

    pub fn root(&self) -> NodeId {
        self.dom.root
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        self.dom.query_selector(selector)
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all(selector)
    }

    /// Descendants of `root` matching `selector`, in document order.
    pub fn query_selector_from(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all_from(root, selector)
    }

    /// Like [`Document::query_selector`] but a missing match is an error.
    pub fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.dom.by_id(id)
    }

    pub fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        self.dom.closest(node, selector)
    }

    pub fn matches_selector(&self, node: NodeId, selector: &str) -> Result<bool> {
        self.dom.matches_selector(node, selector)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.dom.parent(node)
    }

    /// Element children of `node`.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.dom.child_elements(node)
    }

    pub fn element_siblings(&self, node: NodeId) -> Vec<NodeId> {
        self.dom.element_siblings(node)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.dom.tag_name(node)
    }

    pub fn text_content(&self, node: NodeId) -> String {
        self.dom.text_content(node)
    }

    /// Short label such as `input#email` or `input[name=color]`, used in
    /// trace lines and error messages.
    pub fn describe(&self, node: NodeId) -> String {
        describe_node(&self.dom, node)
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.dom.attr(node, name)
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.dom.has_attr(node, name)
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.dom.set_attr(node, name, value)
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<()> {
        self.dom.remove_attr(node, name)
    }

    pub fn has_class(&self, node: NodeId, class_name: &str) -> bool {
        self.dom.class_contains(node, class_name)
    }

    pub fn class_add(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        self.dom.class_add(node, class_name)
    }

    pub fn class_remove(&mut self, node: NodeId, class_name: &str) -> Result<()> {
        self.dom.class_remove(node, class_name)
    }

    /// Current value of a form control. A select reports the value of its
    /// selected option, falling back to the first option.
    pub fn value(&self, node: NodeId) -> Result<String> {
        self.dom.value(node)
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> Result<()> {
        self.dom.set_value(node, value)
    }

    pub fn checked(&self, node: NodeId) -> Result<bool> {
        self.dom.checked(node)
    }

    /// Sets checkedness. Checking a radio unchecks the other radios with the
    /// same name in the same form.
    pub fn set_checked(&mut self, node: NodeId, checked: bool) -> Result<()> {
        self.dom.set_checked(node, checked)
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.dom.is_disabled_control(node)
    }

    pub fn select_option(&mut self, select: NodeId, value: &str) -> Result<()> {
        self.dom.select_option(select, value)
    }

    pub fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        self.dom.selected_option(select)
    }

    pub fn style_property(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        self.dom.style_property(node, name)
    }

    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.dom.set_style_property(node, name, value)
    }

    pub fn is_displayed(&self, node: NodeId) -> bool {
        self.dom.is_displayed(node)
    }

    /// Replaces the value of a text input or textarea. Fires `input` then `change`.
    /// Disabled controls are left untouched and fire nothing.
    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<Vec<UiEvent>> {
        let target = self.select_one(selector)?;
        let element = self.dom.expect_element(target, "type_text")?;
        let accepts_text = element.is_tag("textarea") || is_text_entry_input(element);
        if !accepts_text {
            return Err(Error::TypeMismatch {
                target: selector.to_string(),
                expected: "text input or textarea".into(),
                actual: element
                    .input_type()
                    .map(|kind| format!("input[type={kind}]"))
                    .unwrap_or_else(|| element.tag_name.clone()),
            });
        }
        if self.dom.is_disabled_control(target) {
            return Ok(Vec::new());
        }

        self.dom.set_value(target, text)?;
        self.trace_action_line(format!(
            "[action] type_text target={} value={}",
            self.describe(target),
            quote_attr_value(text)
        ));
        Ok(vec![
            UiEvent::new(UiEventKind::Input, target),
            UiEvent::new(UiEventKind::Change, target),
        ])
    }

    /// Sets a checkbox or radio. Fires `input` then `change` when the state changed.
    pub fn check(&mut self, selector: &str, checked: bool) -> Result<Vec<UiEvent>> {
        let target = self.select_one(selector)?;
        let element = self.dom.expect_element(target, "check")?;
        if !(is_checkbox_input(element) || is_radio_input(element)) {
            return Err(Error::TypeMismatch {
                target: selector.to_string(),
                expected: "checkbox or radio".into(),
                actual: element.tag_name.clone(),
            });
        }
        if self.dom.is_disabled_control(target) || element.checked == checked {
            return Ok(Vec::new());
        }

        self.dom.set_checked(target, checked)?;
        self.trace_action_line(format!(
            "[action] check target={} checked={checked}",
            self.describe(target)
        ));
        Ok(vec![
            UiEvent::new(UiEventKind::Input, target),
            UiEvent::new(UiEventKind::Change, target),
        ])
    }

    /// Selects the option whose value is `value`. Fires `input` then `change`.
    pub fn choose(&mut self, selector: &str, value: &str) -> Result<Vec<UiEvent>> {
        let target = self.select_one(selector)?;
        if self.dom.is_disabled_control(target) {
            return Ok(Vec::new());
        }
        self.dom.select_option(target, value)?;
        self.trace_action_line(format!(
            "[action] choose target={} value={}",
            self.describe(target),
            quote_attr_value(value)
        ));
        Ok(vec![
            UiEvent::new(UiEventKind::Input, target),
            UiEvent::new(UiEventKind::Change, target),
        ])
    }

    pub fn blur(&mut self, selector: &str) -> Result<Vec<UiEvent>> {
        let target = self.select_one(selector)?;
        self.trace_action_line(format!("[action] blur target={}", self.describe(target)));
        Ok(vec![UiEvent::new(UiEventKind::Blur, target)])
    }

    /// Submits the form matched by `selector`, or the form owning the matched
    /// submit control.
    pub fn submit(&mut self, selector: &str) -> Result<Vec<UiEvent>> {
        let form = self.resolve_form(selector, "submit")?;
        self.trace_action_line(format!("[action] submit target={}", self.describe(form)));
        Ok(vec![UiEvent::new(UiEventKind::Submit, form)])
    }

    /// Fires `reset` on the form. Field values are not restored here; a bound
    /// validator clears them when it handles the event.
    pub fn reset(&mut self, selector: &str) -> Result<Vec<UiEvent>> {
        let form = self.resolve_form(selector, "reset")?;
        self.trace_action_line(format!("[action] reset target={}", self.describe(form)));
        Ok(vec![UiEvent::new(UiEventKind::Reset, form)])
    }

    fn resolve_form(&self, selector: &str, operation: &str) -> Result<NodeId> {
        let target = self.select_one(selector)?;
        let element = self.dom.expect_element(target, operation)?;
        if element.is_tag("form") {
            return Ok(target);
        }
        self.dom
            .closest_tag(target, "form")
            .ok_or_else(|| Error::TypeMismatch {
                target: selector.to_string(),
                expected: "form or control inside a form".into(),
                actual: element.tag_name.clone(),
            })
    }

    pub fn add_event_listener<F>(&mut self, node: NodeId, event_type: &str, listener: F)
    where
        F: FnMut(&DomEvent) + 'static,
    {
        self.listeners
            .add(node, event_type.to_string(), Box::new(listener));
    }

    /// Removes every listener for `event_type` on `node`, returning how many were dropped.
    pub fn remove_event_listeners(&mut self, node: NodeId, event_type: &str) -> usize {
        self.listeners.remove_all(node, event_type)
    }

    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners.count(node, event_type)
    }

    /// Dispatches a notification on `target` and bubbles it through every ancestor.
    pub fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<DomEvent> {
        if !self.dom.contains_node(target) {
            return Err(Error::NotAnElement(format!("dispatch {event_type}")));
        }
        self.trace_event_line(format!(
            "[event] {event_type} target={}",
            self.describe(target)
        ));

        let mut path = vec![target];
        let mut cursor = self.dom.parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        let mut event = DomEvent {
            event_type: event_type.to_string(),
            target,
            current_target: target,
        };
        for node in path {
            event.current_target = node;
            let mut listeners = self.listeners.take(node, event_type);
            for listener in listeners.iter_mut() {
                listener(&event);
            }
            self.listeners.restore(node, event_type, listeners);
        }
        event.current_target = target;
        Ok(event)
    }

    /// Generates an id of the form `<6 base-36 chars>-<namespace>` that is not
    /// yet used in the document.
    pub fn generate_id(&mut self, namespace: &str) -> String {
        const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        const SPAN: u64 = 36u64.pow(6);
        loop {
            let mut n = self.rng.next_u64() % SPAN;
            let mut prefix = [b'0'; 6];
            for slot in prefix.iter_mut().rev() {
                *slot = ALPHABET[(n % 36) as usize];
                n /= 36;
            }
            let prefix = String::from_utf8_lossy(&prefix);
            let id = if namespace.is_empty() {
                prefix.into_owned()
            } else {
                format!("{prefix}-{namespace}")
            };
            if self.dom.by_id(&id).is_none() {
                return id;
            }
        }
    }

    pub fn set_random_seed(&mut self, seed: u64) {
        self.rng.seed(seed);
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_state.logs).into()
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_state.to_stderr = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_state.events = enabled;
    }

    pub fn set_trace_actions(&mut self, enabled: bool) {
        self.trace_state.actions = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::InvalidConfig(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_state.log_limit = max_entries;
        while self.trace_state.logs.len() > max_entries {
            self.trace_state.logs.pop_front();
        }
        Ok(())
    }

    pub(crate) fn trace_event_line(&mut self, line: String) {
        if self.trace_state.events {
            self.trace_state.push(line);
        }
    }

    pub(crate) fn trace_action_line(&mut self, line: String) {
        if self.trace_state.actions {
            self.trace_state.push(line);
        }
    }
}
