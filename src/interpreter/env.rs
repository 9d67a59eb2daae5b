use crate::interpreter::class::ClassId;
use crate::interpreter::value::Value;

use rustc_hash::FxHashMap;

use std::cell::RefCell;
use std::rc::Rc;

/// The instance a method runs against, and the bean that defined the method.
/// `super` resolves from `owner`, not from the instance's own bean.
#[derive(Debug, Clone)]
pub struct Receiver {
    pub this: Value,
    pub owner: ClassId,
}

/// One scope frame. Frames are shared by the calls and closures that hold them.
#[derive(Debug, Default)]
pub struct Env {
    parent: Option<Rc<Env>>,
    bindings: RefCell<FxHashMap<String, Value>>,
    receiver: Option<Receiver>,
}

impl Env {
    pub fn new() -> Rc<Env> {
        Rc::new(Env::default())
    }

    pub fn with_parent(parent: &Rc<Env>) -> Rc<Env> {
        Rc::new(Env {
            parent: Some(parent.clone()),
            ..Env::default()
        })
    }

    pub fn for_method(parent: &Rc<Env>, receiver: Receiver) -> Rc<Env> {
        Rc::new(Env {
            parent: Some(parent.clone()),
            receiver: Some(receiver),
            ..Env::default()
        })
    }

    /// Binds `name` in this frame, replacing any earlier binding here.
    pub fn define(&self, name: &str, value: Value) {
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let mut env = self;
        loop {
            if let Some(value) = env.bindings.borrow().get(name) {
                return Some(value.clone());
            }
            env = env.parent.as_deref()?;
        }
    }

    pub fn get_local(&self, name: &str) -> Option<Value> {
        self.bindings.borrow().get(name).cloned()
    }

    /// Updates the nearest existing binding. Hands the value back if there is none.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), Value> {
        let mut env = self;
        loop {
            if let Some(slot) = env.bindings.borrow_mut().get_mut(name) {
                *slot = value;
                return Ok(());
            }
            match env.parent.as_deref() {
                Some(parent) => env = parent,
                None => return Err(value),
            }
        }
    }

    pub fn receiver(&self) -> Option<&Receiver> {
        let mut env = self;
        loop {
            if let Some(receiver) = &env.receiver {
                return Some(receiver);
            }
            env = env.parent.as_deref()?;
        }
    }

    /// Names bound directly in this frame, sorted.
    pub fn local_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.bindings.borrow().keys().cloned().collect();
        names.sort();
        names
    }
}
