use super::*;

impl Dom {
    fn matches_compound(&self, node_id: NodeId, compound: &Compound) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };
        if compound
            .tag
            .as_ref()
            .is_some_and(|tag| !element.tag_name.eq_ignore_ascii_case(tag))
        {
            return false;
        }
        compound.filters.iter().all(|filter| match filter {
            Filter::Id(id) => element.attrs.get("id") == Some(id),
            Filter::Class(class_name) => element.has_class(class_name),
            Filter::HasAttr(name) => element.attrs.contains_key(name),
            Filter::AttrEquals(name, value) => element.attrs.get(name) == Some(value),
            Filter::Not(inner) => !self.matches_list(node_id, inner),
        })
    }

    fn matches_complex(&self, node_id: NodeId, complex: &ComplexSelector) -> bool {
        self.matches_compound(node_id, &complex.subject)
            && self.matches_context(node_id, &complex.context)
    }

    /// Checks the compounds left of `node_id`, nearest first. An ancestor
    /// step tries every ancestor before giving up.
    fn matches_context(&self, node_id: NodeId, context: &[(Relation, Compound)]) -> bool {
        let Some(((relation, compound), outer)) = context.split_first() else {
            return true;
        };
        let fits = |candidate: NodeId| {
            self.matches_compound(candidate, compound) && self.matches_context(candidate, outer)
        };
        match relation {
            Relation::Parent => self.parent(node_id).is_some_and(fits),
            Relation::Ancestor => self.ancestors(node_id).any(fits),
        }
    }

    fn matches_list(&self, node_id: NodeId, list: &SelectorList) -> bool {
        list.alternatives
            .iter()
            .any(|complex| self.matches_complex(node_id, complex))
    }

    pub(crate) fn matches_selector(&self, node_id: NodeId, selector: &str) -> Result<bool> {
        let list = SelectorList::parse(selector)?;
        Ok(self.matches_list(node_id, &list))
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        if let Some(id) = list.lone_id() {
            return Ok(self.by_id_all(id));
        }
        let mut candidates = self.all_elements();
        candidates.retain(|candidate| self.matches_list(*candidate, &list));
        Ok(candidates)
    }

    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Matches `selector` against the descendants of `root` (the root itself excluded).
    pub(crate) fn query_selector_all_from(
        &self,
        root: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selector)?;
        let mut candidates = self.descendant_elements(root);
        candidates.retain(|candidate| self.matches_list(*candidate, &list));
        Ok(candidates)
    }

    pub(crate) fn query_selector_from(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all_from(root, selector)?.into_iter().next())
    }

    pub(crate) fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let list = SelectorList::parse(selector)?;
        Ok(std::iter::once(node_id)
            .chain(self.ancestors(node_id))
            .find(|candidate| self.matches_list(*candidate, &list)))
    }
}
