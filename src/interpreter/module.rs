use crate::error::{Spill, SpillKind};
use crate::interpreter::env::Env;
use crate::interpreter::value::Value;
use crate::interpreter::{Interpreter, SourceUnit};
use crate::parser::parse_program;
use crate::stdlib::io::SOURCE_EXTENSIONS;

use rustc_hash::FxHashMap;

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A loaded unit's top-level bindings. Importers can read but not assign them.
#[derive(Debug)]
pub struct Namespace {
    pub name: String,
    pub path: PathBuf,
    env: Rc<Env>,
}

impl Namespace {
    pub fn get(&self, name: &str) -> Option<Value> {
        self.env.get_local(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.env.local_names()
    }
}

/// Per-interpreter import state, keyed by canonical path.
#[derive(Debug, Default)]
pub struct ModuleCache {
    loaded: FxHashMap<PathBuf, Rc<Namespace>>,
    // imports currently executing, outermost first
    in_progress: Vec<PathBuf>,
}

impl ModuleCache {
    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    pub fn clear(&mut self) {
        self.loaded.clear();
    }

    pub(crate) fn enter(&mut self, path: PathBuf) {
        self.in_progress.push(path);
    }

    pub(crate) fn leave(&mut self) {
        self.in_progress.pop();
    }

    fn cycle_through(&self, path: &Path) -> Option<String> {
        let start = self.in_progress.iter().position(|p| p == path)?;
        let chain: Vec<String> = self.in_progress[start..]
            .iter()
            .chain(std::iter::once(&path.to_path_buf()))
            .map(|p| display_name(p))
            .collect();
        Some(chain.join(" -> "))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// `path` relative to `dir`, trying the source extensions when it has none.
fn resolve(dir: &Path, path: &str) -> Result<PathBuf, Spill> {
    let candidate = dir.join(path);
    let candidate = if !candidate.exists() && candidate.extension().is_none() {
        SOURCE_EXTENSIONS
            .iter()
            .map(|ext| candidate.with_extension(ext))
            .find(|with_ext| with_ext.exists())
            .unwrap_or(candidate)
    } else {
        candidate
    };
    fs::canonicalize(&candidate).map_err(|err| {
        let mut spill = Spill::from(err);
        spill.message = format!("Could not read module file '{}': {}", path, spill.message);
        spill
    })
}

impl Interpreter {
    pub(crate) fn import(&mut self, path: &str) -> Result<Rc<Namespace>, Spill> {
        let resolved = resolve(&self.units[self.current_unit].dir, path)?;

        if let Some(namespace) = self.modules.loaded.get(&resolved) {
            tracing::debug!(module = %resolved.display(), "module cache hit");
            return Ok(namespace.clone());
        }
        if let Some(chain) = self.modules.cycle_through(&resolved) {
            return Err(Spill::new(
                SpillKind::CircularImport,
                format!("Circular import: {}", chain),
            ));
        }

        let source = fs::read_to_string(&resolved)?;
        let program = parse_program(&source).map_err(|err| {
            Spill::new(
                SpillKind::ImportFailed,
                format!("Module '{}' failed to compile: {}", path, err),
            )
        })?;

        tracing::debug!(module = %resolved.display(), "loading module");
        let unit = self.add_unit(SourceUnit::new(&source, Some(&resolved)));
        let env = Env::new();
        self.modules.enter(resolved.clone());
        let result = self.in_unit(unit, |this| this.exec_program(&program, &env));
        self.modules.leave();
        result?;

        let name = resolved
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string());
        let namespace = Rc::new(Namespace {
            name,
            path: resolved.clone(),
            env,
        });
        self.modules.loaded.insert(resolved, namespace.clone());
        Ok(namespace)
    }
}

/// Name an import binds when it has no `as` clause.
pub fn default_binding(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
