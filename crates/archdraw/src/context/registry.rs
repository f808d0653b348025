//! Node registry: the elements created in one context.

use log::debug;

use archdraw_core::{
    identifier::{BoundaryId, ContextId, ElementId},
    semantic::{Element, ElementKind},
    style::Attributes,
};

use crate::error::ReferenceError;

/// Dense store of the elements of one context, indexed by handle.
#[derive(Debug)]
pub(super) struct NodeRegistry {
    context: ContextId,
    elements: Vec<Element>,
}

impl NodeRegistry {
    pub(super) fn new(context: ContextId) -> Self {
        Self {
            context,
            elements: Vec::new(),
        }
    }

    /// Registers an element under `parent` and returns its fresh handle.
    pub(super) fn create(
        &mut self,
        kind: ElementKind,
        label: String,
        detail: String,
        style: Attributes,
        parent: Option<BoundaryId>,
    ) -> ElementId {
        let id = ElementId::new(self.context, self.elements.len());
        debug!(element = id.to_string(), kind:% = kind, label, parent:? = parent; "Registering element");

        self.elements
            .push(Element::new(id, kind, label, detail, style, parent));
        id
    }

    pub(super) fn get(&self, id: ElementId) -> Result<&Element, ReferenceError> {
        self.check(id)?;
        Ok(&self.elements[id.index()])
    }

    pub(super) fn get_mut(&mut self, id: ElementId) -> Result<&mut Element, ReferenceError> {
        self.check(id)?;
        Ok(&mut self.elements[id.index()])
    }

    pub(super) fn len(&self) -> usize {
        self.elements.len()
    }

    pub(super) fn into_elements(self) -> Vec<Element> {
        self.elements
    }

    fn check(&self, id: ElementId) -> Result<(), ReferenceError> {
        if id.context() == self.context && id.index() < self.elements.len() {
            Ok(())
        } else {
            Err(ReferenceError::UnknownElement {
                element: id,
                owner: id.context(),
                context: self.context,
            })
        }
    }
}
