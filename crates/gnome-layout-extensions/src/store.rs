//! Layout persistence
//!
//! Each layout is a key file `<dir>/<name>.conf`. The extension list lives in
//! section `[/]` under `enabled-extensions`; any other sections are shell
//! settings captured alongside it:
//!
//! ```text
//! [/]
//! enabled-extensions=['appindicatorsupport@rgcjonas.gmail.com', 'dash-to-dock@micxgx.gmail.com']
//!
//! [extensions/dash-to-dock]
//! dock-position='BOTTOM'
//! ```

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use gnome_layout_core::gvariant::{format_string_array, parse_string_array};
use gnome_layout_core::types::{extension_set_from_lines, validate_layout_name};
use gnome_layout_core::{Error, KeyFile, Layout, Result, SystemState};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Section holding the extension lists
pub const ROOT_SECTION: &str = "/";
/// Key of the enabled extension list
pub const ENABLED_KEY: &str = "enabled-extensions";
/// Key of the disabled extension list, managed by the shell itself
pub const DISABLED_KEY: &str = "disabled-extensions";

const LAYOUT_EXTENSION: &str = "conf";

/// Directory of named layout files
#[derive(Debug, Clone)]
pub struct LayoutStore {
    dir: PathBuf,
}

impl LayoutStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for a layout name
    pub fn layout_path(&self, name: &str) -> Result<PathBuf> {
        validate_layout_name(name)?;
        Ok(self.dir.join(format!("{name}.{LAYOUT_EXTENSION}")))
    }

    /// Whether a layout with this name exists
    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.layout_path(name)?.is_file())
    }

    /// Names of all stored layouts, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(LAYOUT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_layout_name(stem).is_ok() {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Load a layout
    pub fn load(&self, name: &str) -> Result<Layout> {
        let path = self.layout_path(name)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::layout_not_found(name)),
            Err(e) => return Err(e.into()),
        };

        let context = path.display().to_string();
        let mut file = KeyFile::parse(&content, &context)?;

        let raw = file.remove(ROOT_SECTION, ENABLED_KEY).ok_or_else(|| {
            Error::parse(&context, format!("missing [{ROOT_SECTION}] {ENABLED_KEY}"))
        })?;
        let members = parse_string_array(&raw)?;
        let enabled_extensions = extension_set_from_lines(members.iter().map(String::as_str));
        file.remove(ROOT_SECTION, DISABLED_KEY);

        debug!(
            "Loaded layout '{}' with {} extensions",
            name,
            enabled_extensions.len()
        );
        Ok(Layout::new(name, enabled_extensions)?.with_settings(file))
    }

    /// Save the enabled extensions of `state` under a new name
    pub fn save(&self, name: &str, state: &SystemState) -> Result<Layout> {
        self.save_with_settings(name, state, KeyFile::new())
    }

    /// Save a new layout together with captured shell settings
    pub fn save_with_settings(
        &self,
        name: &str,
        state: &SystemState,
        settings: KeyFile,
    ) -> Result<Layout> {
        let layout = Layout::snapshot(name, state)?.with_settings(settings);
        self.write(&layout, false)?;
        info!("Saved layout '{}'", name);
        Ok(layout)
    }

    /// Replace a layout (or create it) with the enabled extensions of `state`
    pub fn overwrite(&self, name: &str, state: &SystemState) -> Result<Layout> {
        self.overwrite_with_settings(name, state, KeyFile::new())
    }

    /// Replace a layout together with captured shell settings
    pub fn overwrite_with_settings(
        &self,
        name: &str,
        state: &SystemState,
        settings: KeyFile,
    ) -> Result<Layout> {
        let layout = Layout::snapshot(name, state)?.with_settings(settings);
        self.write(&layout, true)?;
        info!("Overwrote layout '{}'", name);
        Ok(layout)
    }

    /// Delete a layout; returns false when there was nothing to delete
    pub fn remove(&self, name: &str) -> Result<bool> {
        let path = self.layout_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed layout '{}'", name);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Layout '{}' was already absent", name);
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, layout: &Layout, replace: bool) -> Result<()> {
        let path = self.layout_path(&layout.name)?;
        if !replace && path.exists() {
            return Err(Error::name_conflict(&layout.name));
        }

        fs::create_dir_all(&self.dir)?;
        let mut temp = NamedTempFile::new_in(&self.dir)?;
        temp.write_all(render_layout(layout).as_bytes())?;

        if replace {
            temp.persist(&path).map_err(|e| Error::Io(e.error))?;
        } else {
            temp.persist_noclobber(&path).map_err(|e| {
                if e.error.kind() == ErrorKind::AlreadyExists {
                    Error::name_conflict(&layout.name)
                } else {
                    Error::Io(e.error)
                }
            })?;
        }
        Ok(())
    }
}

/// Key-file text of a layout; `[/]` always comes first
pub fn render_layout(layout: &Layout) -> String {
    let mut file = KeyFile::new();
    file.set(
        ROOT_SECTION,
        ENABLED_KEY,
        format_string_array(&layout.enabled_extensions),
    );
    for section in layout.settings.sections() {
        for (key, value) in &section.entries {
            if section.name == ROOT_SECTION && (key == ENABLED_KEY || key == DISABLED_KEY) {
                continue;
            }
            file.set(&section.name, key, value.clone());
        }
    }
    file.to_string()
}
