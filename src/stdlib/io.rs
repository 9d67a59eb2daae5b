use crate::error::Spill;
use crate::interpreter::value::Value;
use crate::stdlib::{Arity, Category, NativeContext, NativeFn, Registry, string_arg};

use std::fs;
use std::path::Path;

/// Extensions `scan_pantry` lists.
pub const SOURCE_EXTENSIONS: [&str; 2] = ["brewco", "coffee"];

pub fn add_io_functions(registry: &mut Registry) {
    let mut add = |name: &'static str, arity: Arity, summary: &'static str, func: NativeFn| {
        registry.insert(Category::File, name, arity, summary, func)
    };

    // sip_file(path: string) -> string
    add("sip_file", Arity::Exact(1), "whole contents of a file", sip_file);
    // pour_to_file(path: string, content: any) -> boolean
    add("pour_to_file", Arity::Exact(2), "write a file, replacing it", pour_to_file);
    // recipe_exists(path: string) -> boolean
    add("recipe_exists", Arity::Exact(1), "true if the path exists", recipe_exists);
    // scan_pantry(dir: string) -> [string]
    add("scan_pantry", Arity::Exact(1), "sorted names of the brew sources in a directory", scan_pantry);

    registry.alias("read_file", "sip_file");
    registry.alias("write_file", "pour_to_file");
    registry.alias("file_exists", "recipe_exists");
    registry.alias("scan_directory", "scan_pantry");
}

fn with_path(err: std::io::Error, action: &str, path: &str) -> Spill {
    let mut spill = Spill::from(err);
    spill.message = format!("could not {} '{}': {}", action, path, spill.message);
    spill
}

fn sip_file(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let path = string_arg("sip_file", args, 0)?;
    let contents = fs::read_to_string(path).map_err(|err| with_path(err, "read", path))?;
    Ok(Value::String(contents))
}

fn pour_to_file(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let path = string_arg("pour_to_file", args, 0)?;
    let contents = args[1].to_string();
    fs::write(path, contents).map_err(|err| with_path(err, "write", path))?;
    Ok(Value::Boolean(true))
}

fn recipe_exists(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let path = string_arg("recipe_exists", args, 0)?;
    Ok(Value::Boolean(Path::new(path).exists()))
}

fn scan_pantry(_: &mut NativeContext, args: &[Value]) -> Result<Value, Spill> {
    let dir = string_arg("scan_pantry", args, 0)?;
    let mut names = vec![];
    for entry in fs::read_dir(dir).map_err(|err| with_path(err, "scan", dir))? {
        let path = entry.map_err(|err| with_path(err, "scan", dir))?.path();
        let is_source = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        if !is_source {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(Value::array(names.into_iter().map(Value::String).collect()))
}
