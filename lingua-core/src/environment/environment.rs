use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::utils::prelude::SrcSpan;

use super::prelude::Value;

pub type Scope = Rc<RefCell<Environment>>;

/// One symbol table in the lexical scope chain.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Environment {
    pub store: HashMap<String, Value>,
    pub parent: Option<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            parent: None,
        }
    }

    pub fn new_scope() -> Scope {
        Rc::new(RefCell::new(Self::new()))
    }

    /// A fresh table whose lookups fall back to `parent`.
    pub fn child_of(parent: &Scope) -> Scope {
        Rc::new(RefCell::new(Self {
            store: HashMap::new(),
            parent: Some(parent.clone()),
        }))
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.parent.as_ref()?.borrow().get(name),
        }
    }

    /// Binds `name` in this table, shadowing any outer binding.
    pub fn set(&mut self, name: String, value: Value) {
        self.store.insert(name, value);
    }
}

/// A traceback frame. Frames are independent of scoping: a call's frame
/// points at its caller even though its scope points at the definition site.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub display_name: String,
    pub parent: Option<Rc<Context>>,
    pub parent_entry: Option<SrcSpan>,
}

impl Context {
    pub fn root() -> Rc<Self> {
        Rc::new(Self {
            display_name: "<program>".into(),
            parent: None,
            parent_entry: None,
        })
    }

    pub fn child(parent: &Rc<Context>, display_name: &str, entry: SrcSpan) -> Rc<Self> {
        Rc::new(Self {
            display_name: display_name.into(),
            parent: Some(parent.clone()),
            parent_entry: Some(entry),
        })
    }

    /// `(frame name, span)` pairs from this frame outwards. The first span is
    /// `location`; each further one is where the inner frame was entered.
    pub fn frames(&self, location: SrcSpan) -> Vec<(String, SrcSpan)> {
        let mut frames = vec![(self.display_name.clone(), location)];
        let mut context = self;

        while let (Some(parent), Some(entry)) = (&context.parent, context.parent_entry) {
            frames.push((parent.display_name.clone(), entry));
            context = &**parent;
        }

        frames
    }

    pub fn depth(&self) -> usize {
        match &self.parent {
            Some(parent) => parent.depth() + 1,
            None => 0,
        }
    }
}
