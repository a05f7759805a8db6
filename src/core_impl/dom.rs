use super::*;

mod form_state;
mod query;

/// Mirrors a boolean attribute onto the element's live state.
fn sync_flag(element: &mut Element, name: &str, present: bool) {
    match name {
        "checked" => element.checked = present,
        "selected" => element.selected = present,
        "disabled" => element.disabled = present,
        "required" => element.required = present,
        _ => {}
    }
}

impl Dom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                node_type: NodeType::Document,
            }],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    fn push_node(&mut self, parent: NodeId, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            node_type,
        });
        self.nodes[parent.0].children.push(id);
        if let Some(id_attr) = self.element(id).and_then(|e| e.attrs.get("id")).cloned() {
            self.index_id(&id_attr, id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        self.push_node(parent, NodeType::Element(Element::new(tag_name, attrs)))
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.push_node(parent, NodeType::Text(text))
    }

    pub(crate) fn contains_node(&self, node_id: NodeId) -> bool {
        node_id.0 < self.nodes.len()
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn expect_element(&self, node_id: NodeId, operation: &str) -> Result<&Element> {
        self.element(node_id)
            .ok_or_else(|| Error::NotAnElement(operation.to_string()))
    }

    pub(crate) fn expect_element_mut(
        &mut self,
        node_id: NodeId,
        operation: &str,
    ) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::NotAnElement(operation.to_string()))
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    /// Parents of `node_id` up to and including the document root.
    pub(crate) fn ancestors(&self, node_id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node_id), |node| self.parent(*node))
    }

    pub(crate) fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub(crate) fn child_elements(&self, node_id: NodeId) -> Vec<NodeId> {
        self.children(node_id)
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    /// Element siblings of `node_id` in document order, excluding the node itself.
    pub(crate) fn element_siblings(&self, node_id: NodeId) -> Vec<NodeId> {
        self.parent(node_id)
            .map(|parent| self.child_elements(parent))
            .unwrap_or_default()
            .into_iter()
            .filter(|sibling| *sibling != node_id)
            .collect()
    }

    pub(crate) fn closest_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        self.ancestors(node_id)
            .find(|ancestor| self.element(*ancestor).is_some_and(|e| e.is_tag(tag)))
    }

    /// Every node under `node_id` in document order, `node_id` first.
    fn preorder(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut pending = vec![node_id];
        while let Some(current) = pending.pop() {
            order.push(current);
            pending.extend(self.children(current).iter().rev());
        }
        order
    }

    /// Elements of the subtree rooted at `node_id`, including it, in document order.
    pub(crate) fn subtree_elements(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut nodes = self.preorder(node_id);
        nodes.retain(|node| self.element(*node).is_some());
        nodes
    }

    /// Like [`Dom::subtree_elements`] without `node_id` itself.
    pub(crate) fn descendant_elements(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut nodes = self.subtree_elements(node_id);
        nodes.retain(|node| *node != node_id);
        nodes
    }

    pub(crate) fn all_elements(&self) -> Vec<NodeId> {
        self.subtree_elements(self.root)
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        self.preorder(node_id)
            .into_iter()
            .filter_map(|node| match &self.nodes[node.0].node_type {
                NodeType::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id)?.first().copied()
    }

    pub(crate) fn by_id_all(&self, id: &str) -> Vec<NodeId> {
        self.id_index.get(id).cloned().unwrap_or_default()
    }

    fn index_id(&mut self, id: &str, node_id: NodeId) {
        if id.is_empty() {
            return;
        }
        let holders = self.id_index.entry(id.to_string()).or_default();
        // Document order decides which duplicate id wins.
        if let Err(slot) = holders.binary_search(&node_id) {
            holders.insert(slot, node_id);
        }
    }

    fn unindex_id(&mut self, id: &str, node_id: NodeId) {
        if let Some(holders) = self.id_index.get_mut(id) {
            holders.retain(|holder| *holder != node_id);
            if holders.is_empty() {
                self.id_index.remove(id);
            }
        }
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)?
            .attrs
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    pub(crate) fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|e| e.attrs.contains_key(&name.to_ascii_lowercase()))
    }

    /// Sets an attribute and keeps the live state, the id index and select
    /// exclusivity in step with it.
    pub(crate) fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self.expect_element_mut(node_id, "setAttribute")?;
        let previous = element.attrs.insert(name.clone(), value.to_string());
        if name == "value" {
            element.value = value.to_string();
        }
        sync_flag(element, &name, true);

        match name.as_str() {
            "id" => {
                if let Some(old) = previous {
                    self.unindex_id(&old, node_id);
                }
                self.index_id(value, node_id);
            }
            "selected" => self.sync_select_after_option_selected(node_id),
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self.expect_element_mut(node_id, "removeAttribute")?;
        let removed = element.attrs.remove(&name);
        sync_flag(element, &name, false);
        if name == "id" {
            if let Some(old) = removed {
                self.unindex_id(&old, node_id);
            }
        }
        Ok(())
    }

    pub(crate) fn class_contains(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|element| element.has_class(class_name))
    }

    pub(crate) fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        self.expect_element_mut(node_id, "classList")?
            .edit_classes(|classes| {
                if !classes.iter().any(|name| name == class_name) {
                    classes.push(class_name.to_string());
                }
            });
        Ok(())
    }

    pub(crate) fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        self.expect_element_mut(node_id, "classList")?
            .edit_classes(|classes| classes.retain(|name| name != class_name));
        Ok(())
    }

    pub(crate) fn is_disabled_control(&self, node_id: NodeId) -> bool {
        self.element(node_id)
            .is_some_and(|element| is_form_control(element) && element.disabled)
    }

    /// Copies the children of `fragment`'s root under `parent`, returning the
    /// top-level elements that were inserted.
    pub(crate) fn import_fragment(&mut self, parent: NodeId, fragment: &Dom) -> Result<Vec<NodeId>> {
        let accepts_children = self
            .nodes
            .get(parent.0)
            .is_some_and(|node| !matches!(node.node_type, NodeType::Text(_)));
        if !accepts_children {
            return Err(Error::NotAnElement("appendHtml".into()));
        }
        let mut inserted = Vec::new();
        for &child in fragment.children(fragment.root) {
            let copied = self.import_node(parent, fragment, child);
            if self.element(copied).is_some() {
                inserted.push(copied);
            }
        }
        Ok(inserted)
    }

    fn import_node(&mut self, parent: NodeId, fragment: &Dom, source: NodeId) -> NodeId {
        let copied = match &fragment.nodes[source.0].node_type {
            NodeType::Element(element) => self.push_node(parent, NodeType::Element(element.clone())),
            NodeType::Text(text) => self.create_text(parent, text.clone()),
            NodeType::Document => parent,
        };
        for &child in fragment.children(source) {
            self.import_node(copied, fragment, child);
        }
        copied
    }
}
