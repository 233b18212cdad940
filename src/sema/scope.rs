use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::ast::resolved::DeclId;
use crate::sema::Sema;

/// One level of the scope chain.
#[derive(Debug, Default)]
pub struct Scope {
    names: HashMap<String, DeclId>,
}

impl Scope {
    pub fn get(&self, name: &str) -> Option<DeclId> {
        self.names.get(name).copied()
    }

    /// Returns `false` when `name` is already bound at this level.
    pub fn insert(&mut self, name: &str, id: DeclId) -> bool {
        if self.names.contains_key(name) {
            return false;
        }
        self.names.insert(name.to_string(), id);
        true
    }
}

/// Keeps a scope pushed for as long as it lives. All resolution inside the
/// scope goes through the guard, which derefs to the analyzer.
pub struct ScopeGuard<'s, 'a> {
    sema: &'s mut Sema<'a>,
}

impl<'s, 'a> ScopeGuard<'s, 'a> {
    pub(super) fn new(sema: &'s mut Sema<'a>) -> Self {
        sema.scopes.push(Scope::default());
        trace!(depth = sema.scopes.len(), "entered scope");
        ScopeGuard { sema }
    }
}

impl<'a> Deref for ScopeGuard<'_, 'a> {
    type Target = Sema<'a>;

    fn deref(&self) -> &Sema<'a> {
        self.sema
    }
}

impl<'a> DerefMut for ScopeGuard<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Sema<'a> {
        self.sema
    }
}

impl Drop for ScopeGuard<'_, '_> {
    fn drop(&mut self) {
        self.sema.scopes.pop();
        trace!(depth = self.sema.scopes.len(), "left scope");
    }
}
