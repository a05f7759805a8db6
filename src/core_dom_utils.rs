use super::*;

/// Handle to a node inside a [`Document`]. Stable for the document's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

/// An element with its attributes and the live form state derived from them.
/// `value`, `checked` and `selected` diverge from the attributes once the user acts.
#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) checked: bool,
    pub(crate) selected: bool,
    pub(crate) disabled: bool,
    pub(crate) required: bool,
}

impl Element {
    pub(crate) fn new(tag_name: String, attrs: HashMap<String, String>) -> Self {
        let flag = |name: &str| attrs.contains_key(name);
        Self {
            value: attrs.get("value").cloned().unwrap_or_default(),
            checked: flag("checked"),
            selected: flag("selected"),
            disabled: flag("disabled"),
            required: flag("required"),
            tag_name,
            attrs,
        }
    }

    pub(crate) fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Lowercased `type` attribute of an `<input>`; `text` when absent.
    pub(crate) fn input_type(&self) -> Option<String> {
        if !self.is_tag("input") {
            return None;
        }
        let declared = self
            .attrs
            .get("type")
            .map(|kind| kind.trim().to_ascii_lowercase())
            .unwrap_or_default();
        Some(if declared.is_empty() {
            "text".to_string()
        } else {
            declared
        })
    }

    pub(crate) fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_whitespace()
    }

    pub(crate) fn has_class(&self, class_name: &str) -> bool {
        self.classes().any(|token| token == class_name)
    }

    /// Rewrites the class list through `edit`; an empty list drops the attribute.
    pub(crate) fn edit_classes(&mut self, edit: impl FnOnce(&mut Vec<String>)) {
        let mut classes = self.classes().map(str::to_string).collect::<Vec<_>>();
        edit(&mut classes);
        if classes.is_empty() {
            self.attrs.remove("class");
        } else {
            self.attrs.insert("class".to_string(), classes.join(" "));
        }
    }

    pub(crate) fn inline_style(&self) -> InlineStyle {
        InlineStyle::parse(self.attrs.get("style").map(String::as_str).unwrap_or_default())
    }
}

/// Declarations of a `style` attribute in source order, property names lowercased.
/// A repeated property keeps its last value at its last position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub(crate) fn parse(style: &str) -> Self {
        let mut parsed = Self::default();
        for (name, value) in style.split(';').filter_map(|decl| decl.split_once(':')) {
            let name = name.trim().to_ascii_lowercase();
            if !name.is_empty() {
                parsed.declarations.retain(|(existing, _)| *existing != name);
                parsed.declarations.push((name, value.trim().to_string()));
            }
        }
        parsed
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Replaces `name` in place, appends it when new, and removes it when `value` is empty.
    pub(crate) fn set(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.declarations.iter().position(|(key, _)| *key == name) {
            Some(pos) if value.is_empty() => {
                self.declarations.remove(pos);
            }
            Some(pos) => self.declarations[pos].1 = value.to_string(),
            None if !value.is_empty() => self.declarations.push((name, value.to_string())),
            None => {}
        }
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (name, value)) in self.declarations.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}: {value};")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) id_index: HashMap<String, Vec<NodeId>>,
}

/// Short label for logs and errors: `tag#id`, `tag[name=...]`, or the bare tag.
pub(crate) fn describe_node(dom: &Dom, node_id: NodeId) -> String {
    let Some(element) = dom.element(node_id) else {
        return node_id.to_string();
    };
    let non_empty = |key: &str| element.attrs.get(key).filter(|value| !value.is_empty());
    match (non_empty("id"), non_empty("name")) {
        (Some(id), _) => format!("{}#{id}", element.tag_name),
        (None, Some(name)) => format!("{}[name={name}]", element.tag_name),
        (None, None) => element.tag_name.clone(),
    }
}
