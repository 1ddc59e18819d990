//! Case file model.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use schemata_value::{Map, Value};

/// One `*.json` file under `cases/`.
#[derive(Debug)]
pub struct CaseFile {
    pub path: PathBuf,
    pub groups: Vec<Group>,
}

/// A schema and the instances checked against it.
#[derive(Debug)]
pub struct Group {
    pub description: String,
    pub schema: Value,
    pub tests: Vec<Instance>,
}

#[derive(Debug)]
pub struct Instance {
    pub description: String,
    pub data: Value,
    pub valid: bool,
}

impl CaseFile {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let document = schemata_value::from_slice(&bytes)
            .with_context(|| format!("Failed to decode {}", path.display()))?;
        let groups = document
            .as_array()
            .ok_or_else(|| anyhow!("expected an array of groups"))?
            .iter()
            .enumerate()
            .map(|(i, group)| Group::parse(group).with_context(|| format!("group {i}")))
            .collect::<Result<_>>()?;
        Ok(Self {
            path: path.to_path_buf(),
            groups,
        })
    }
}

impl Group {
    fn parse(value: &Value) -> Result<Self> {
        let object = object(value)?;
        let tests = member(object, "tests")?
            .as_array()
            .ok_or_else(|| anyhow!("'tests' must be an array"))?
            .iter()
            .enumerate()
            .map(|(i, test)| Instance::parse(test).with_context(|| format!("test {i}")))
            .collect::<Result<_>>()?;
        Ok(Self {
            description: description(object)?,
            schema: member(object, "schema")?.clone(),
            tests,
        })
    }
}

impl Instance {
    fn parse(value: &Value) -> Result<Self> {
        let object = object(value)?;
        let valid = member(object, "valid")?
            .as_bool()
            .ok_or_else(|| anyhow!("'valid' must be a boolean"))?;
        Ok(Self {
            description: description(object)?,
            data: member(object, "data")?.clone(),
            valid,
        })
    }
}

fn object(value: &Value) -> Result<&Map> {
    match value.as_object() {
        Some(object) => Ok(object),
        None => bail!("expected an object, got {}", value.kind()),
    }
}

fn member<'a>(object: &'a Map, key: &str) -> Result<&'a Value> {
    object
        .get(key)
        .ok_or_else(|| anyhow!("missing '{key}'"))
}

fn description(object: &Map) -> Result<String> {
    member(object, "description")?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("'description' must be a string"))
}
