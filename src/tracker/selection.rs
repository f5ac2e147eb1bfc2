use std::sync::Arc;

use crate::store::entities::{Project, Store};

/// Tracks which project commands act on. Distinct from the persisted
/// last-open name: the selection holds a name and re-resolves it against
/// the store on every use, so a name that stopped referring to a project
/// simply resolves to nothing instead of faulting.
#[derive(Debug, Default)]
pub struct Selection {
    current: Option<Arc<str>>,
}

impl Selection {
    pub fn select(&mut self, name: Arc<str>) {
        self.current = Some(name);
    }

    pub fn name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn resolve<'a>(&self, store: &'a Store) -> Option<&'a Project> {
        store.find_project(self.current.as_deref()?)
    }

    pub fn resolve_mut<'a>(&self, store: &'a mut Store) -> Option<&'a mut Project> {
        store.find_project_mut(self.current.as_deref()?)
    }
}
