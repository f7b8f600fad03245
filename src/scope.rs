use std::sync::Arc;

use crate::value::Fields;

/// One level of nested attributes, e.g. a request inside a service.
///
/// Nodes are immutable once built and linked to their parent by `Arc`, so a
/// chain can be shared and read from any number of threads without locking.
/// A child never copies its ancestors' fields; precedence is resolved when a
/// record is encoded.
#[derive(Debug, Default)]
pub struct Scope {
    parent: Option<Arc<Scope>>,
    fields: Fields,
}

impl Scope {
    /// Build a new node below `parent`. `fields` may be empty.
    pub fn extend(parent: Option<Arc<Scope>>, fields: Fields) -> Arc<Scope> {
        Arc::new(Scope { parent, fields })
    }

    pub fn parent(&self) -> Option<&Arc<Scope>> {
        self.parent.as_ref()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// This node followed by its ancestors, nearest first.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Number of nodes in the chain ending at this one.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }
}

pub struct Ancestors<'a> {
    next: Option<&'a Scope>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let scope = self.next?;
        self.next = scope.parent.as_deref();
        Some(scope)
    }
}

/// Carries the current [`Scope`] alongside a logical operation.
///
/// A `Ctx` is a cheap, clonable handle. Attaching fields returns a new
/// carrier and leaves this one untouched, so a parent operation keeps
/// seeing only its own fields.
///
/// ```
/// use ctxlog::{fields, Ctx};
///
/// let service = Ctx::background().with(fields! { "service" => "auth" });
/// let request = service.with(fields! { "request_id" => 7 });
///
/// assert_eq!(service.scope().unwrap().depth(), 1);
/// assert_eq!(request.scope().unwrap().depth(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ctx {
    scope: Option<Arc<Scope>>,
}

impl Ctx {
    /// An empty carrier with no scope attached.
    pub fn background() -> Ctx {
        Ctx::default()
    }

    /// A new carrier whose scope is a child of this one's, holding `fields`.
    pub fn with(&self, fields: Fields) -> Ctx {
        self.attach(Scope::extend(self.scope.clone(), fields))
    }

    /// A new carrier holding `scope`.
    pub fn attach(&self, scope: Arc<Scope>) -> Ctx {
        Ctx { scope: Some(scope) }
    }

    pub fn scope(&self) -> Option<&Arc<Scope>> {
        self.scope.as_ref()
    }
}
