//! Diagram build sessions.
//!
//! A [`DiagramContext`] owns everything created while one diagram is being
//! built: the node registry, the boundary stack with its containment forest,
//! and the relationship collector. Construction calls go through the context
//! (or a [`BoundaryGuard`] that dereferences to it); there is no ambient
//! "current diagram".
//!
//! At most one context may be open in the process, whichever thread opened
//! it. The slot is released when the context is closed, finished or dropped.

mod boundary_stack;
mod registry;
mod relationships;

pub use boundary_stack::BoundaryGuard;
pub use relationships::Chain;

use std::{
    path::Path,
    sync::atomic::{AtomicBool, Ordering},
};

use log::{debug, info, trace};

use archdraw_core::{
    identifier::{BoundaryId, ContextId, ElementId, RelationshipId},
    semantic::{Boundary, Diagram, Direction, Element, ElementKind, Member, Relationship},
    style::{Attributes, GraphStyle},
};

use crate::{
    error::{ArchdrawError, ScopeError},
    render::RenderBackend,
};

use boundary_stack::BoundaryStack;
use registry::NodeRegistry;
use relationships::RelationshipCollector;

static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Claim on the process-wide active-context slot.
#[derive(Debug)]
struct ActiveSlot(());

impl ActiveSlot {
    fn acquire() -> Result<Self, ScopeError> {
        ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ScopeError::ContextActive)?;
        Ok(Self(()))
    }
}

impl Drop for ActiveSlot {
    fn drop(&mut self) {
        ACTIVE.store(false, Ordering::Release);
    }
}


/// The build session of one diagram.
///
/// # Examples
///
/// ```standalone_crate
/// use archdraw::{
///     DiagramContext,
///     semantic::{Direction, ElementKind},
///     style::{Attributes, GraphStyle},
/// };
///
/// let mut ctx = DiagramContext::open("Storage", Direction::TopToBottom, GraphStyle::default())?;
///
/// let server = ctx.with_boundary("B1", Attributes::new(), |ctx| {
///     Ok::<_, archdraw::ArchdrawError>(
///         ctx.create_element(ElementKind::Server, "S1", "", Attributes::new()),
///     )
/// })?;
/// let store = ctx.create_element(ElementKind::Storage, "Store", "", Attributes::new());
/// ctx.connect(server, store, "writes", Attributes::new())?;
///
/// let diagram = ctx.finish()?;
/// assert_eq!(diagram.top_level_boundaries().count(), 1);
/// assert_eq!(diagram.top_level_elements().count(), 1);
/// assert_eq!(diagram.relationships().len(), 1);
/// # Ok::<(), archdraw::ArchdrawError>(())
/// ```
#[derive(Debug)]
pub struct DiagramContext {
    id: ContextId,
    title: String,
    direction: Direction,
    style: GraphStyle,
    registry: NodeRegistry,
    boundaries: BoundaryStack,
    relationships: RelationshipCollector,
    _slot: ActiveSlot,
}

impl DiagramContext {
    /// Opens a new diagram build session.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::ContextActive`] if another context is still open
    /// anywhere in the process.
    pub fn open(
        title: impl Into<String>,
        direction: Direction,
        style: GraphStyle,
    ) -> Result<Self, ArchdrawError> {
        let slot = ActiveSlot::acquire()?;
        let id = ContextId::next();
        let title = title.into();
        info!(context = id.to_string(), title, direction:% = direction; "Opening diagram context");

        Ok(Self {
            id,
            title,
            direction,
            style,
            registry: NodeRegistry::new(id),
            boundaries: BoundaryStack::new(id),
            relationships: RelationshipCollector::new(id),
            _slot: slot,
        })
    }

    /// Identity of this session.
    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Diagram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Requested layout direction.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Global style configuration.
    pub fn style(&self) -> &GraphStyle {
        &self.style
    }

    /// Number of currently open boundaries.
    pub fn depth(&self) -> usize {
        self.boundaries.depth()
    }

    /// Innermost open boundary, the parent of anything created next.
    pub fn current_boundary(&self) -> Option<BoundaryId> {
        self.boundaries.current()
    }

    /// Number of elements created so far.
    pub fn element_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of boundaries created so far, open or closed.
    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    /// Number of relationships declared so far.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Relationships declared so far, in declaration order.
    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    /// Looks up an element created in this context.
    ///
    /// # Errors
    ///
    /// Returns [`ArchdrawError::Reference`] for handles of other contexts.
    pub fn element(&self, id: ElementId) -> Result<&Element, ArchdrawError> {
        Ok(self.registry.get(id)?)
    }

    /// Looks up a boundary created in this context.
    ///
    /// # Errors
    ///
    /// Returns [`ArchdrawError::Reference`] for handles of other contexts.
    pub fn boundary(&self, id: BoundaryId) -> Result<&Boundary, ArchdrawError> {
        Ok(self.boundaries.get(id)?)
    }

    /// Creates an element inside the innermost open boundary, or at the root.
    pub fn create_element(
        &mut self,
        kind: ElementKind,
        label: impl Into<String>,
        detail: impl Into<String>,
        style: Attributes,
    ) -> ElementId {
        let parent = self.boundaries.current();
        let id = self
            .registry
            .create(kind, label.into(), detail.into(), style, parent);
        self.boundaries.attach(Member::Element(id));
        id
    }

    /// Opens a boundary and returns a guard that closes it when dropped.
    pub fn push_boundary(&mut self, name: impl Into<String>, style: Attributes) -> BoundaryGuard<'_> {
        let id = self.boundaries.push(name.into(), style, true);
        BoundaryGuard::new(self, id)
    }

    /// Opens a boundary without a guard.
    ///
    /// The caller must balance it with [`DiagramContext::pop_boundary`];
    /// [`DiagramContext::finish`] fails while it is still open.
    pub fn open_boundary(&mut self, name: impl Into<String>, style: Attributes) -> BoundaryId {
        self.boundaries.push(name.into(), style, false)
    }

    /// Closes the innermost open boundary.
    ///
    /// Only boundaries opened with [`DiagramContext::open_boundary`] can be
    /// popped. A boundary owned by a [`BoundaryGuard`] stays open until the
    /// guard is dropped, so popping through the guard cannot move later
    /// elements out of it.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::EmptyBoundaryStack`] if no boundary is open, or
    /// [`ScopeError::GuardedBoundary`] if the innermost boundary belongs to a
    /// guard.
    pub fn pop_boundary(&mut self) -> Result<BoundaryId, ArchdrawError> {
        Ok(self.boundaries.pop()?)
    }

    /// Runs `build` inside a new boundary.
    ///
    /// The boundary is closed before the result of `build` is returned,
    /// whether it succeeded or failed.
    pub fn with_boundary<T, E, F>(
        &mut self,
        name: impl Into<String>,
        style: Attributes,
        build: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut DiagramContext) -> Result<T, E>,
    {
        let mut guard = self.push_boundary(name, style);
        build(&mut *guard)
    }

    /// Declares a directed relationship from `source` to `target`.
    ///
    /// Multiple relationships between the same pair are kept as separate
    /// records.
    ///
    /// # Errors
    ///
    /// Returns [`ArchdrawError::Reference`] if either endpoint was not created
    /// in this context. The diagram is left unchanged.
    pub fn connect(
        &mut self,
        source: ElementId,
        target: ElementId,
        label: impl Into<String>,
        style: Attributes,
    ) -> Result<RelationshipId, ArchdrawError> {
        self.registry.get(source)?;
        self.registry.get(target)?;
        Ok(self
            .relationships
            .add(source, target, label.into(), style))
    }

    /// Starts a chained declaration at `start`.
    pub fn chain(&mut self, start: ElementId) -> Chain<'_> {
        Chain::new(self, start)
    }

    /// Sets a style attribute on an element before the diagram is closed.
    ///
    /// # Errors
    ///
    /// Returns [`ArchdrawError::Reference`] for handles of other contexts.
    pub fn style_element(
        &mut self,
        id: ElementId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ArchdrawError> {
        self.registry.get_mut(id)?.style_mut().set(key, value);
        Ok(())
    }

    /// Sets a style attribute on a boundary before the diagram is closed.
    ///
    /// # Errors
    ///
    /// Returns [`ArchdrawError::Reference`] for handles of other contexts.
    pub fn style_boundary(
        &mut self,
        id: BoundaryId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ArchdrawError> {
        self.boundaries.get_mut(id)?.style_mut().set(key, value);
        Ok(())
    }

    /// Finalizes the session into a [`Diagram`] without rendering it.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::UnclosedBoundaries`] if boundaries opened with
    /// [`DiagramContext::open_boundary`] are still open.
    pub fn finish(self) -> Result<Diagram, ArchdrawError> {
        let open = self.boundaries.depth();
        if open > 0 {
            return Err(ScopeError::UnclosedBoundaries {
                title: self.title,
                open,
            }
            .into());
        }

        let (boundaries, roots) = self.boundaries.into_forest();
        let diagram = Diagram::new(
            self.id,
            self.title,
            self.direction,
            self.style,
            self.registry.into_elements(),
            boundaries,
            roots,
            self.relationships.into_relationships(),
        );

        debug!(
            elements = diagram.elements().len(),
            boundaries = diagram.boundaries().len(),
            relationships = diagram.relationships().len();
            "Diagram finalized"
        );
        trace!(diagram:?; "Finalized diagram");

        Ok(diagram)
    }

    /// Finalizes the session and renders it to `output` with `backend`.
    ///
    /// Returns the finalized diagram on success.
    ///
    /// # Errors
    ///
    /// Returns [`ArchdrawError::Scope`] if boundaries are still open, in which
    /// case the backend is not invoked, or [`ArchdrawError::Render`] if the
    /// backend fails.
    pub fn close<B>(self, backend: &B, output: impl AsRef<Path>) -> Result<Diagram, ArchdrawError>
    where
        B: RenderBackend + ?Sized,
    {
        let output = output.as_ref();
        let diagram = self.finish()?;

        info!(title = diagram.title(), output = output.display().to_string(); "Rendering diagram");
        backend.render(&diagram, output)?;
        info!(output = output.display().to_string(); "Diagram rendered successfully");

        Ok(diagram)
    }
}
