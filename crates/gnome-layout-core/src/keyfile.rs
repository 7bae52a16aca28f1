//! Flat key-file codec
//!
//! Layout files and `dconf dump` output share the GLib key-file shape:
//!
//! ```text
//! [/]
//! enabled-extensions=['a@x.org', 'b@y.org']
//!
//! [extensions/dash-to-dock]
//! dock-position='BOTTOM'
//! ```
//!
//! Values are kept as raw text. Section and key order is preserved so that a
//! file written back looks like the one that was read. Comments are dropped.

use std::fmt;

use crate::error::{Error, Result};

/// One `[section]` with its entries in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Section name without brackets
    pub name: String,

    /// `(key, raw value)` pairs
    pub entries: Vec<(String, String)>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Look up a raw value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: String) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }
}

/// Parsed key file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFile {
    sections: Vec<Section>,
}

impl KeyFile {
    /// Create an empty key file
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse key-file text; `context` names the source in error messages
    pub fn parse(content: &str, context: &str) -> Result<Self> {
        let mut file = Self::new();
        let mut current: Option<usize> = None;

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest.strip_suffix(']').ok_or_else(|| {
                    Error::parse(context, format!("line {line_no}: unterminated section header"))
                })?;
                if name.is_empty() {
                    return Err(Error::parse(
                        context,
                        format!("line {line_no}: empty section name"),
                    ));
                }
                current = Some(file.section_index_or_insert(name));
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                Error::parse(context, format!("line {line_no}: expected key=value"))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::parse(context, format!("line {line_no}: empty key")));
            }

            let section = current.ok_or_else(|| {
                Error::parse(
                    context,
                    format!("line {line_no}: key '{key}' outside of any section"),
                )
            })?;
            file.sections[section].set(key, value.trim_start().to_string());
        }

        Ok(file)
    }

    /// Look up a raw value
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Set a raw value, creating the section when needed
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
        let index = self.section_index_or_insert(section);
        self.sections[index].set(key, value.into());
    }

    /// Remove a key, dropping its section when it becomes empty
    pub fn remove(&mut self, section: &str, key: &str) -> Option<String> {
        let index = self.sections.iter().position(|s| s.name == section)?;
        let entries = &mut self.sections[index].entries;
        let pos = entries.iter().position(|(k, _)| k == key)?;
        let (_, value) = entries.remove(pos);
        if entries.is_empty() {
            self.sections.remove(index);
        }
        Some(value)
    }

    /// Find a section by name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// All sections in file order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// True when no section holds an entry
    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.entries.is_empty())
    }

    fn section_index_or_insert(&mut self, name: &str) -> usize {
        match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        }
    }
}

impl fmt::Display for KeyFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for section in self.sections.iter().filter(|s| !s.entries.is_empty()) {
            if !first {
                writeln!(f)?;
            }
            first = false;
            writeln!(f, "[{}]", section.name)?;
            for (key, value) in &section.entries {
                writeln!(f, "{key}={value}")?;
            }
        }
        Ok(())
    }
}
