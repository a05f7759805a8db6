use super::*;

pub(crate) const EQUAL_TO: &str = "equalTo";

/// A named custom check referenced from a field's `data-validator` list.
///
/// Receives the document, the field, whether the field carries `required`,
/// and the field's parent node. Closures with the same signature implement it.
pub trait FieldValidator {
    fn validate(&self, doc: &Document, field: NodeId, required: bool, parent: Option<NodeId>)
    -> bool;
}

impl<F> FieldValidator for F
where
    F: Fn(&Document, NodeId, bool, Option<NodeId>) -> bool,
{
    fn validate(
        &self,
        doc: &Document,
        field: NodeId,
        required: bool,
        parent: Option<NodeId>,
    ) -> bool {
        self(doc, field, required, parent)
    }
}

/// Validator name to implementation.
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    entries: BTreeMap<String, Rc<dyn FieldValidator>>,
}

impl ValidatorRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding only the built-in `equalTo` check.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(EQUAL_TO, equal_to);
        registry
    }

    /// Adds `validator` under `name`, replacing any previous entry.
    pub fn register<V>(&mut self, name: impl Into<String>, validator: V)
    where
        V: FieldValidator + 'static,
    {
        self.entries.insert(name.into(), Rc::new(validator));
    }

    pub fn get(&self, name: &str) -> Option<&dyn FieldValidator> {
        self.entries.get(name).map(|validator| validator.as_ref())
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

    pub fn merge(&mut self, other: ValidatorRegistry) {
        self.entries.extend(other.entries);
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// The field's value must equal the value of the element whose id is in
/// `data-equalto`. A missing target fails the check.
pub(crate) fn equal_to(
    doc: &Document,
    field: NodeId,
    _required: bool,
    _parent: Option<NodeId>,
) -> bool {
    let Some(target_id) = doc.attr(field, "data-equalto") else {
        return true;
    };
    let Some(target) = doc.by_id(&target_id) else {
        warn!(
            field = %doc.describe(field),
            target = %target_id,
            "data-equalto target does not exist"
        );
        return false;
    };
    match (doc.value(field), doc.value(target)) {
        (Ok(own), Ok(expected)) => own == expected,
        _ => false,
    }
}
