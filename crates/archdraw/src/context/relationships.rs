//! Relationship collector and chained declarations.

use log::debug;

use archdraw_core::{
    identifier::{ContextId, ElementId, RelationshipId},
    semantic::Relationship,
    style::Attributes,
};

use super::DiagramContext;
use crate::ArchdrawError;

/// Flat, ordered list of the relationships declared in one context.
///
/// Endpoints are validated by the context before anything is recorded here.
#[derive(Debug)]
pub(super) struct RelationshipCollector {
    context: ContextId,
    relationships: Vec<Relationship>,
}

impl RelationshipCollector {
    pub(super) fn new(context: ContextId) -> Self {
        Self {
            context,
            relationships: Vec::new(),
        }
    }

    pub(super) fn add(
        &mut self,
        source: ElementId,
        target: ElementId,
        label: String,
        style: Attributes,
    ) -> RelationshipId {
        let id = RelationshipId::new(self.context, self.relationships.len());
        debug!(relationship = id.to_string(), source = source.to_string(), target = target.to_string(), label; "Recording relationship");

        self.relationships
            .push(Relationship::new(id, source, target, label, style));
        id
    }

    pub(super) fn len(&self) -> usize {
        self.relationships.len()
    }

    pub(super) fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    pub(super) fn into_relationships(self) -> Vec<Relationship> {
        self.relationships
    }
}

/// Chained relationship declaration.
///
/// Each call to [`Chain::to`] connects the current element to the next one
/// and moves the chain forward, so `a -> b -> c` becomes two ordinary
/// relationships. Nothing beyond those relationship records is stored.
///
/// ```standalone_crate
/// use archdraw::{DiagramContext, semantic::{Direction, ElementKind}, style::{Attributes, GraphStyle}};
///
/// let mut ctx = DiagramContext::open("Chain", Direction::LeftToRight, GraphStyle::default())?;
/// let user = ctx.create_element(ElementKind::Person, "User", "", Attributes::new());
/// let browser = ctx.create_element(ElementKind::Container, "Browser", "", Attributes::new());
/// let app = ctx.create_element(ElementKind::Container, "App", "", Attributes::new());
///
/// let links = ctx
///     .chain(user)
///     .to(browser, "Accesses", Attributes::new())?
///     .to(app, "HTTP Requests", Attributes::new())?
///     .finish();
///
/// assert_eq!(links.len(), 2);
/// assert_eq!(ctx.relationship_count(), 2);
/// # Ok::<(), archdraw::ArchdrawError>(())
/// ```
#[derive(Debug)]
pub struct Chain<'a> {
    ctx: &'a mut DiagramContext,
    current: ElementId,
    links: Vec<RelationshipId>,
}

impl<'a> Chain<'a> {
    pub(super) fn new(ctx: &'a mut DiagramContext, start: ElementId) -> Self {
        Self {
            ctx,
            current: start,
            links: Vec::new(),
        }
    }

    /// Connects the current element to `next` and continues from `next`.
    ///
    /// # Errors
    ///
    /// Returns [`ArchdrawError::Reference`] if either endpoint does not
    /// belong to the context; nothing is recorded in that case.
    pub fn to(
        mut self,
        next: ElementId,
        label: impl Into<String>,
        style: Attributes,
    ) -> Result<Self, ArchdrawError> {
        let id = self.ctx.connect(self.current, next, label, style)?;
        self.links.push(id);
        self.current = next;
        Ok(self)
    }

    /// Element the next link starts from.
    pub fn current(&self) -> ElementId {
        self.current
    }

    /// Ends the chain, returning the relationships it declared.
    pub fn finish(self) -> Vec<RelationshipId> {
        self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_relationships_are_kept() {
        let ctx = ContextId::next();
        let mut collector = RelationshipCollector::new(ctx);
        let a = ElementId::new(ctx, 0);
        let b = ElementId::new(ctx, 1);

        let first = collector.add(a, b, "Routes to".to_string(), Attributes::new());
        let second = collector.add(a, b, "Routes to".to_string(), Attributes::new());

        assert_ne!(first, second);
        assert_eq!(collector.len(), 2);
        assert!(collector.iter().all(|r| r.source() == a && r.target() == b));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let ctx = ContextId::next();
        let mut collector = RelationshipCollector::new(ctx);
        let a = ElementId::new(ctx, 0);
        let b = ElementId::new(ctx, 1);

        collector.add(a, b, "first".to_string(), Attributes::new());
        collector.add(b, a, "second".to_string(), Attributes::new());

        let labels: Vec<String> = collector
            .into_relationships()
            .iter()
            .map(|r| r.label().to_string())
            .collect();
        assert_eq!(labels, vec!["first", "second"]);
    }
}
