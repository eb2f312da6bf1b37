//! Runtime value types and the variable environment

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Opaque reference to a model owned by the execution backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelHandle(pub String);

/// Runtime value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Val {
    Num(f64),
    Str(String),
    Model(ModelHandle),
}

impl Val {
    /// Numeric view used by ordering comparisons and loop counts.
    ///
    /// Strings coerce when their trimmed text parses as a float.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Val::Num(n) => Some(*n),
            Val::Str(s) => s.trim().parse::<f64>().ok(),
            Val::Model(_) => None,
        }
    }

    /// Non-negative integer view, for loop counts
    pub fn as_count(&self) -> Option<u64> {
        let n = self.as_number()?;
        if n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n < u64::MAX as f64 {
            Some(n as u64)
        } else {
            None
        }
    }

    /// Plain text form, as handed to external tools
    pub fn to_arg(&self) -> String {
        match self {
            Val::Num(n) => n.to_string(),
            Val::Str(s) => s.clone(),
            Val::Model(ModelHandle(id)) => id.clone(),
        }
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Num(n) => write!(f, "{}", n),
            Val::Str(s) => write!(f, "\"{}\"", s),
            Val::Model(ModelHandle(id)) => write!(f, "<model {}>", id),
        }
    }
}

impl From<f64> for Val {
    fn from(n: f64) -> Self {
        Val::Num(n)
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Self {
        Val::Str(s.to_string())
    }
}

/* ===================== Environment ===================== */

/// Flat name → value mapping shared by a program and all of its nested blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    vars: HashMap<String, Val>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Val> {
        self.vars.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Bind `name`, creating or overwriting it
    pub fn bind(&mut self, name: impl Into<String>, value: Val) {
        self.vars.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Val)> {
        self.vars.iter()
    }

    /// Name-ordered copy of the bindings
    pub fn snapshot(&self) -> BTreeMap<String, Val> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn into_inner(self) -> HashMap<String, Val> {
        self.vars
    }
}

impl From<HashMap<String, Val>> for Environment {
    fn from(vars: HashMap<String, Val>) -> Self {
        Self { vars }
    }
}
