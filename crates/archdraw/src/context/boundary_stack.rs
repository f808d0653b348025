//! Boundary stack and the scope guard that keeps it balanced.

use std::ops::{Deref, DerefMut};

use log::{debug, warn};

use archdraw_core::{
    identifier::{BoundaryId, ContextId},
    semantic::{Boundary, Member},
    style::Attributes,
};

use super::DiagramContext;
use crate::error::{ReferenceError, ScopeError};

/// Containment forest of one context plus the stack of open boundaries.
///
/// Only the boundary on top of the stack accepts new children; with an empty
/// stack new members go to the diagram root. Boundaries owned by a
/// [`BoundaryGuard`] are flagged so that only the guard closes them.
#[derive(Debug)]
pub(super) struct BoundaryStack {
    context: ContextId,
    boundaries: Vec<Boundary>,
    roots: Vec<Member>,
    open: Vec<(BoundaryId, bool)>,
}

impl BoundaryStack {
    pub(super) fn new(context: ContextId) -> Self {
        Self {
            context,
            boundaries: Vec::new(),
            roots: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Innermost open boundary.
    pub(super) fn current(&self) -> Option<BoundaryId> {
        self.open.last().map(|(id, _)| *id)
    }

    /// Number of open boundaries.
    pub(super) fn depth(&self) -> usize {
        self.open.len()
    }

    pub(super) fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Appends `member` to the innermost open boundary or to the root.
    pub(super) fn attach(&mut self, member: Member) {
        match self.current() {
            Some(top) => self.boundaries[top.index()].push_child(member),
            None => self.roots.push(member),
        }
    }

    /// Creates a boundary under the current top and makes it the new top.
    pub(super) fn push(&mut self, name: String, style: Attributes, guarded: bool) -> BoundaryId {
        let id = BoundaryId::new(self.context, self.boundaries.len());
        let parent = self.current();
        debug!(boundary = id.to_string(), name, parent:? = parent, guarded, depth = self.open.len() + 1; "Opening boundary");

        self.attach(Member::Boundary(id));
        self.boundaries.push(Boundary::new(id, name, style, parent));
        self.open.push((id, guarded));
        id
    }

    /// Closes the top boundary unless a guard owns it.
    pub(super) fn pop(&mut self) -> Result<BoundaryId, ScopeError> {
        let (id, guarded) = *self.open.last().ok_or(ScopeError::EmptyBoundaryStack)?;
        if guarded {
            return Err(ScopeError::GuardedBoundary { boundary: id });
        }
        self.open.pop();
        debug!(boundary = id.to_string(), depth = self.open.len(); "Closing boundary");
        Ok(id)
    }

    /// Closes `id` and every boundary opened after it. No-op if `id` is not open.
    pub(super) fn release(&mut self, id: BoundaryId) {
        let Some(position) = self.open.iter().position(|(open, _)| *open == id) else {
            return;
        };

        let dangling = self.open.len() - position - 1;
        if dangling > 0 {
            warn!(boundary = id.to_string(), dangling; "Releasing boundaries left open inside a guarded boundary");
        }

        self.open.truncate(position);
        debug!(boundary = id.to_string(), depth = self.open.len(); "Boundary released");
    }

    pub(super) fn get(&self, id: BoundaryId) -> Result<&Boundary, ReferenceError> {
        self.check(id)?;
        Ok(&self.boundaries[id.index()])
    }

    pub(super) fn get_mut(&mut self, id: BoundaryId) -> Result<&mut Boundary, ReferenceError> {
        self.check(id)?;
        Ok(&mut self.boundaries[id.index()])
    }

    /// Splits into the boundary store and the root member list.
    pub(super) fn into_forest(self) -> (Vec<Boundary>, Vec<Member>) {
        (self.boundaries, self.roots)
    }

    fn check(&self, id: BoundaryId) -> Result<(), ReferenceError> {
        if id.context() == self.context && id.index() < self.boundaries.len() {
            Ok(())
        } else {
            Err(ReferenceError::UnknownBoundary {
                boundary: id,
                owner: id.context(),
                context: self.context,
            })
        }
    }
}

/// Scope guard for an open boundary.
///
/// Created by [`DiagramContext::push_boundary`]. While the guard is alive it
/// dereferences to the context, so elements and nested boundaries created
/// through it land inside the boundary. Dropping the guard closes the
/// boundary on every exit path, including early returns through `?` and
/// panics. Only the guard closes its boundary: [`DiagramContext::pop_boundary`]
/// called through the guard fails with a scope error instead.
///
/// ```standalone_crate
/// use archdraw::{DiagramContext, semantic::{Direction, ElementKind}, style::{Attributes, GraphStyle}};
///
/// let mut ctx = DiagramContext::open("Guarded", Direction::default(), GraphStyle::default())?;
/// {
///     let mut servers = ctx.push_boundary("Servers", Attributes::new());
///     servers.create_element(ElementKind::Server, "api", "", Attributes::new());
///     assert_eq!(servers.depth(), 1);
/// }
/// assert_eq!(ctx.depth(), 0);
/// # Ok::<(), archdraw::ArchdrawError>(())
/// ```
#[derive(Debug)]
pub struct BoundaryGuard<'a> {
    ctx: &'a mut DiagramContext,
    id: BoundaryId,
}

impl<'a> BoundaryGuard<'a> {
    pub(super) fn new(ctx: &'a mut DiagramContext, id: BoundaryId) -> Self {
        Self { ctx, id }
    }

    /// Handle of the guarded boundary.
    pub fn id(&self) -> BoundaryId {
        self.id
    }
}

impl Deref for BoundaryGuard<'_> {
    type Target = DiagramContext;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for BoundaryGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for BoundaryGuard<'_> {
    fn drop(&mut self) {
        self.ctx.boundaries.release(self.id);
    }
}
