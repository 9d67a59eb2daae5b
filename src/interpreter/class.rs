use crate::ast::{Class, Function, Recipe};
use crate::error::{Spill, SpillKind};
use crate::interpreter::Interpreter;
use crate::interpreter::env::{Env, Receiver};
use crate::interpreter::value::{ClassRef, Closure, Instance, ObjectMap, Value};

use rustc_hash::FxHashMap;

use std::cell::RefCell;
use std::rc::Rc;

/// Handle into the interpreter's bean arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub usize);

pub struct ClassInfo {
    pub name: Rc<str>,
    pub parent: Option<ClassId>,
    /// Recipe named in the `blend` clause. Advisory only.
    pub recipe: Option<Rc<Recipe>>,
    pub decl: Rc<Class>,
    /// Frame the bean was declared in; methods and field defaults close over it.
    pub env: Rc<Env>,
    pub unit: usize,
    pub methods: FxHashMap<String, Rc<Function>>,
}

impl Interpreter {
    pub(crate) fn class(&self, id: ClassId) -> &ClassInfo {
        &self.classes[id.0]
    }

    pub(crate) fn declare_class(&mut self, decl: &Rc<Class>, env: &Rc<Env>) -> Result<(), Spill> {
        let (mut parent, mut recipe) = (None, None);
        if let Some((blend, _)) = &decl.parent {
            match env.get(blend) {
                Some(Value::Class(class)) => parent = Some(class.id),
                Some(Value::Recipe(r)) => recipe = Some(r),
                Some(other) => {
                    return Err(Spill::type_mismatch(format!(
                        "Bean {} cannot blend `{}`, which is a {}",
                        decl.name.0,
                        blend,
                        other.type_name()
                    )));
                }
                None => {
                    return Err(Spill::new(
                        SpillKind::UnboundName,
                        format!("Bean {} not found", blend),
                    ));
                }
            }
        }

        let methods: FxHashMap<String, Rc<Function>> = decl
            .methods
            .iter()
            .map(|(_, method)| (method.name.0.clone(), method.clone()))
            .collect();
        let id = ClassId(self.classes.len());
        let name: Rc<str> = Rc::from(decl.name.0.as_str());
        self.classes.push(ClassInfo {
            name: name.clone(),
            parent,
            recipe: recipe.clone(),
            decl: decl.clone(),
            env: env.clone(),
            unit: self.current_unit,
            methods,
        });

        if let Some(recipe) = recipe {
            for signature in &recipe.methods {
                if self.find_method(id, &signature.name).is_none() {
                    tracing::warn!(
                        bean = %name,
                        recipe = %recipe.name.0,
                        method = %signature.name,
                        "bean does not provide a method its recipe lists"
                    );
                }
            }
        }

        tracing::debug!(bean = %name, id = id.0, parent = ?parent, "registered bean");
        env.define(&decl.name.0, Value::Class(ClassRef { id, name }));
        Ok(())
    }

    /// First definition of `name` on the bean or its ancestors, with the bean that defines it.
    pub(crate) fn find_method(&self, start: ClassId, name: &str) -> Option<(ClassId, Rc<Function>)> {
        let mut current = Some(start);
        while let Some(id) = current {
            let info = self.class(id);
            if let Some(method) = info.methods.get(name) {
                return Some((id, method.clone()));
            }
            current = info.parent;
        }
        None
    }

    /// Root first, `id` last.
    fn ancestry(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = vec![id];
        while let Some(parent) = self.class(chain[chain.len() - 1]).parent {
            chain.push(parent);
        }
        chain.reverse();
        chain
    }

    pub(crate) fn bind_method(&self, this: Value, owner: ClassId, method: Rc<Function>) -> Value {
        let info = self.class(owner);
        Value::Function(Rc::new(Closure {
            decl: method,
            env: info.env.clone(),
            unit: info.unit,
            receiver: Some(Receiver { this, owner }),
        }))
    }

    pub(crate) fn instantiate(&mut self, class: &ClassRef, args: Vec<Value>) -> Result<Value, Spill> {
        let instance = Value::Instance(Rc::new(RefCell::new(Instance {
            class: class.clone(),
            fields: ObjectMap::new(),
        })));

        // ancestors' defaults first so descendants override them
        for owner in self.ancestry(class.id) {
            let (decl, env, unit) = {
                let info = self.class(owner);
                (info.decl.clone(), info.env.clone(), info.unit)
            };
            let field_env = Env::for_method(
                &env,
                Receiver {
                    this: instance.clone(),
                    owner,
                },
            );
            for field in &decl.fields {
                let value = self.in_unit(unit, |this| this.eval_expr(&field.default, &field_env))?;
                if let Value::Instance(fields) = &instance {
                    fields.borrow_mut().fields.insert(field.name.0.clone(), value);
                }
            }
        }

        match self.find_method(class.id, "init") {
            Some((owner, init)) => {
                let constructor = self.bind_method(instance.clone(), owner, init);
                self.call_value(constructor, args)?;
            }
            None if !args.is_empty() => {
                return Err(Spill::type_mismatch(format!(
                    "Bean {} has no init, but got {} constructor arguments",
                    class.name,
                    args.len()
                )));
            }
            None => {}
        }
        Ok(instance)
    }

    /// `super(args)` and `super.method(args)`, resolved from the bean that
    /// defined the running method.
    pub(crate) fn call_super(
        &mut self,
        method: Option<&str>,
        args: Vec<Value>,
        env: &Rc<Env>,
    ) -> Result<Value, Spill> {
        let Some(receiver) = env.receiver().cloned() else {
            return Err(Spill::new(
                SpillKind::UnboundName,
                "Cannot use 'super' outside of a bean",
            ));
        };
        let name = method.unwrap_or("init");
        let (owner_name, parent) = {
            let owner = self.class(receiver.owner);
            (owner.name.clone(), owner.parent)
        };
        let found = parent.and_then(|parent| self.find_method(parent, name));

        match found {
            Some((defining, function)) => {
                let bound = self.bind_method(receiver.this, defining, function);
                self.call_value(bound, args)
            }
            // a missing parent constructor is a no-op
            None if method.is_none() && args.is_empty() => Ok(Value::Null),
            None if method.is_none() => Err(Spill::type_mismatch(format!(
                "Bean {} has no parent init, but got {} arguments",
                owner_name,
                args.len()
            ))),
            None => Err(Spill::new(
                SpillKind::UndefinedMethod,
                format!("No parent of bean {} defines `{}`", owner_name, name),
            )),
        }
    }
}
