use crate::ast::Function;
use crate::interpreter::class::ClassId;
use crate::interpreter::ensure_sufficient_stack;
use crate::interpreter::env::{Env, Receiver};
use crate::interpreter::module::Namespace;
use crate::stdlib::Builtin;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// nested containers deeper than this print as `...`
const MAX_DISPLAY_DEPTH: usize = 32;

#[derive(Clone)]
pub enum Value {
    Null,
    Number(f64),
    String(String),
    Boolean(bool),
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<RefCell<ObjectMap>>),
    Function(Rc<Closure>),
    Instance(Rc<RefCell<Instance>>),
    Class(ClassRef),
    Native(&'static Builtin),
    Module(Rc<Namespace>),
    Recipe(Rc<crate::ast::Recipe>),
}

/// String-keyed map that remembers insertion order.
#[derive(Debug, Clone, Default)]
pub struct ObjectMap {
    entries: Vec<(String, Value)>,
}

impl ObjectMap {
    pub fn new() -> Self {
        ObjectMap::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn insert(&mut self, key: String, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A user brew together with the frame it was declared in.
pub struct Closure {
    pub decl: Rc<Function>,
    pub env: Rc<Env>,
    /// Source unit the body belongs to, for error positions.
    pub unit: usize,
    pub receiver: Option<Receiver>,
}

impl Closure {
    pub fn name(&self) -> &str {
        &self.decl.name.0
    }
}

#[derive(Debug, Clone)]
pub struct Instance {
    pub class: ClassRef,
    pub fields: ObjectMap,
}

#[derive(Debug, Clone)]
pub struct ClassRef {
    pub id: ClassId,
    pub name: Rc<str>,
}

impl Value {
    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn object(map: ObjectMap) -> Value {
        Value::Object(Rc::new(RefCell::new(map)))
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    /// `false`, `null` and `0` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0,
            _ => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) | Value::Native(_) => "function",
            Value::Instance(_) => "instance",
            Value::Class(_) => "bean",
            Value::Module(_) => "module",
            Value::Recipe(_) => "recipe",
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_) | Value::Native(_) | Value::Class(_))
    }

    /// Structural for data, identity for everything with behaviour.
    pub fn equals(&self, other: &Value) -> bool {
        self.equals_tracked(other, &mut vec![])
    }

    // container pairs already under comparison count as equal, so cycles end
    fn equals_tracked(&self, other: &Value, seen: &mut Vec<(*const (), *const ())>) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                if Rc::ptr_eq(a, b) || !enter_pair(seen, Rc::as_ptr(a).cast(), Rc::as_ptr(b).cast()) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && ensure_sufficient_stack(|| {
                        a.iter().zip(b.iter()).all(|(x, y)| x.equals_tracked(y, seen))
                    })
            }
            (Value::Object(a), Value::Object(b)) => {
                if Rc::ptr_eq(a, b) || !enter_pair(seen, Rc::as_ptr(a).cast(), Rc::as_ptr(b).cast()) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && ensure_sufficient_stack(|| {
                        a.iter()
                            .all(|(key, x)| b.get(key).is_some_and(|y| x.equals_tracked(y, seen)))
                    })
            }
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => a.id == b.id,
            (Value::Native(a), Value::Native(b)) => std::ptr::eq(a.func as *const (), b.func as *const ()),
            (Value::Module(a), Value::Module(b)) => Rc::ptr_eq(a, b),
            (Value::Recipe(a), Value::Recipe(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Address of the shared container behind an array, object or instance.
    fn container_ptr(&self) -> Option<*const ()> {
        match self {
            Value::Array(rc) => Some(Rc::as_ptr(rc).cast()),
            Value::Object(rc) => Some(Rc::as_ptr(rc).cast()),
            Value::Instance(rc) => Some(Rc::as_ptr(rc).cast()),
            _ => None,
        }
    }

    // `open` holds the containers currently being printed; revisiting one elides it
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, depth: usize, open: &mut Vec<*const ()>) -> fmt::Result {
        let Some(ptr) = self.container_ptr() else {
            return match self {
                Value::String(s) if depth > 0 => write!(f, "{:?}", s),
                _ => write!(f, "{}", self),
            };
        };
        if depth >= MAX_DISPLAY_DEPTH || open.contains(&ptr) {
            return self.fmt_elided(f);
        }

        open.push(ptr);
        let result = match self {
            Value::Array(elements) => fmt_elements(f, &elements.borrow(), depth, open),
            Value::Object(map) => fmt_entries(f, &map.borrow(), depth, false, open),
            Value::Instance(instance) => {
                let instance = instance.borrow();
                write!(f, "{} ", instance.class.name)
                    .and_then(|_| fmt_entries(f, &instance.fields, depth, true, open))
            }
            _ => Ok(()),
        };
        open.pop();
        result
    }

    fn fmt_elided(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Array(_) => write!(f, "[...]"),
            Value::Object(_) => write!(f, "{{...}}"),
            Value::Instance(instance) => write!(f, "{} {{...}}", instance.borrow().class.name),
            _ => write!(f, "{}", self),
        }
    }
}

/// Records that `a` and `b` are being compared. False if they already were.
fn enter_pair(seen: &mut Vec<(*const (), *const ())>, a: *const (), b: *const ()) -> bool {
    if seen.contains(&(a, b)) {
        return false;
    }
    seen.push((a, b));
    true
}

fn fmt_elements(
    f: &mut fmt::Formatter<'_>,
    elements: &[Value],
    depth: usize,
    open: &mut Vec<*const ()>,
) -> fmt::Result {
    write!(f, "[")?;
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        element.fmt_nested(f, depth + 1, open)?;
    }
    write!(f, "]")
}

// objects print as `{a: 1}`, instance fields as `{ a: 1 }`
fn fmt_entries(
    f: &mut fmt::Formatter<'_>,
    map: &ObjectMap,
    depth: usize,
    padded: bool,
    open: &mut Vec<*const ()>,
) -> fmt::Result {
    if map.is_empty() {
        return write!(f, "{{}}");
    }
    let pad = if padded { " " } else { "" };
    write!(f, "{{{}", pad)?;
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}: ", key)?;
        value.fmt_nested(f, depth + 1, open)?;
    }
    write!(f, "{}}}", pad)
}

pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // no "-0"
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Array(_) | Value::Object(_) | Value::Instance(_) => self.fmt_nested(f, 0, &mut vec![]),
            Value::Function(closure) => write!(f, "<brew {}>", closure.name()),
            Value::Native(builtin) => write!(f, "<brew {}>", builtin.name),
            Value::Class(class) => write!(f, "<bean {}>", class.name),
            Value::Module(module) => write!(f, "<module {}>", module.name),
            Value::Recipe(recipe) => write!(f, "<recipe {}>", recipe.name.0),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            _ => write!(f, "{}", self),
        }
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.name())
            .field("arity", &self.decl.args.len())
            .field("unit", &self.unit)
            .finish()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_forms() {
        let mut map = ObjectMap::new();
        map.insert("size".to_string(), Value::string("large"));
        map.insert("shots".to_string(), Value::Number(2.0));
        let nested = Value::array(vec![
            Value::Number(1.0),
            Value::string("a"),
            Value::Null,
            Value::object(map),
        ]);
        assert_eq!(
            nested.to_string(),
            "[1, \"a\", null, {size: \"large\", shots: 2}]"
        );
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::object(ObjectMap::new()).to_string(), "{}");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(Value::array(vec![]).is_truthy());
    }

    #[test]
    fn test_structural_equality() {
        let a = Value::array(vec![Value::Number(1.0), Value::array(vec![Value::string("x")])]);
        let b = Value::array(vec![Value::Number(1.0), Value::array(vec![Value::string("x")])]);
        assert!(a.equals(&b));
        assert!(!a.equals(&Value::array(vec![])));
        assert!(!Value::Number(1.0).equals(&Value::string("1")));
    }

    #[test]
    fn test_shared_but_acyclic_containers_print_in_full() {
        let shared = Value::array(vec![Value::Number(1.0)]);
        let outer = Value::array(vec![shared.clone(), shared]);
        assert_eq!(outer.to_string(), "[[1], [1]]");
    }

    #[test]
    fn test_self_containing_array_is_elided() {
        let cup = Value::array(vec![]);
        if let Value::Array(elements) = &cup {
            elements.borrow_mut().push(cup.clone());
            elements.borrow_mut().push(cup.clone());
        }
        assert_eq!(cup.to_string(), "[[...], [...]]");
        assert!(cup.equals(&cup.clone()));
    }

    #[test]
    fn test_object_map_keeps_insertion_order() {
        let mut map = ObjectMap::new();
        map.insert("b".to_string(), Value::Null);
        map.insert("a".to_string(), Value::Null);
        map.insert("b".to_string(), Value::Number(1.0));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(map.get("b"), Some(&Value::Number(1.0)));
    }
}
