// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structured configuration element: a named node with string attributes and
// nested children. Values are stored as text and parsed on access, so the same
// tree can be loaded from any on-disk syntax (JSON via serde here).

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SonowerkError};

/// One node of a configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigElement {
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<ConfigElement>,
}

impl ConfigElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse an element tree from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialise the element tree as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // -- Children -------------------------------------------------------------

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&ConfigElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First direct child with the given name, created if absent.
    pub fn child_mut_or_insert(&mut self, name: &str) -> &mut ConfigElement {
        let pos = match self.children.iter().position(|c| c.name == name) {
            Some(pos) => pos,
            None => {
                self.children.push(ConfigElement::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[pos]
    }

    /// Recursive search for the first element named `name` (self included).
    pub fn find_nested(&self, name: &str) -> Option<&ConfigElement> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_nested(name))
    }

    // -- Attribute access -----------------------------------------------------

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: &str, value: impl ToString) {
        self.attributes.insert(key.to_string(), value.to_string());
    }

    /// Store a boolean as `TRUE` / `FALSE`.
    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.set_attribute(key, if value { "TRUE" } else { "FALSE" });
    }

    /// Store a pair of values separated by a single space.
    pub fn set_pair<T: ToString>(&mut self, key: &str, value: [T; 2]) {
        let [a, b] = value;
        self.set_attribute(key, format!("{} {}", a.to_string(), b.to_string()));
    }

    /// Read a boolean attribute. Accepts `TRUE`/`FALSE` in any case as well
    /// as `1`/`0`. Absent attributes yield `Ok(None)`.
    pub fn bool_attribute(&self, key: &str) -> Result<Option<bool>> {
        let Some(raw) = self.attribute(key) else {
            return Ok(None);
        };
        match raw.trim().to_ascii_uppercase().as_str() {
            "TRUE" | "1" => Ok(Some(true)),
            "FALSE" | "0" => Ok(Some(false)),
            _ => Err(self.invalid(key, raw)),
        }
    }

    /// Read a scalar attribute (`f64`, `i32`, ...).
    pub fn scalar_attribute<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.attribute(key) else {
            return Ok(None);
        };
        raw.trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| self.invalid(key, raw))
    }

    /// Read a whitespace-separated pair of values.
    pub fn pair_attribute<T: FromStr + Copy>(&self, key: &str) -> Result<Option<[T; 2]>> {
        let Some(raw) = self.attribute(key) else {
            return Ok(None);
        };
        let parsed: Vec<T> = raw
            .split_whitespace()
            .map(|tok| tok.parse::<T>().map_err(|_| self.invalid(key, raw)))
            .collect::<Result<_>>()?;
        match parsed.as_slice() {
            [a, b] => Ok(Some([*a, *b])),
            _ => Err(self.invalid(key, raw)),
        }
    }

    /// Read a string attribute, treating an empty value as absent.
    pub fn string_attribute(&self, key: &str) -> Option<String> {
        self.attribute(key)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    }

    fn invalid(&self, key: &str, raw: &str) -> SonowerkError {
        SonowerkError::InvalidAttribute {
            element: self.name.clone(),
            attribute: key.to_string(),
            value: raw.to_string(),
        }
    }
}
