//! TOML page fixture: the markup the headless host simulates.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Button,
    Audio,
    Video,
    Text,
}

impl ElementKind {
    pub fn is_media(self) -> bool {
        matches!(self, ElementKind::Audio | ElementKind::Video)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementSpec {
    pub id: String,
    pub kind: ElementKind,
    pub label: Option<String>,
    /// Media source; relative paths resolve against the fixture's directory.
    pub src: Option<PathBuf>,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageFixture {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

fn default_title() -> String { "Untitled page".into() }

impl PageFixture {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let fixture = Self::parse(&content, base).map_err(|e| format!("{}: {e}", path.display()))?;
        info!("Loaded page '{}' ({} elements) from {}", fixture.title, fixture.elements.len(), path.display());
        Ok(fixture)
    }

    /// Parse fixture text, resolving relative media sources against `base`.
    pub fn parse(content: &str, base: &Path) -> Result<Self, String> {
        let mut fixture: PageFixture = toml::from_str(content).map_err(|e| format!("parse: {e}"))?;

        let mut seen = HashSet::new();
        for el in &mut fixture.elements {
            if !seen.insert(el.id.clone()) {
                warn!("Duplicate element id '{}'; lookups return the first one", el.id);
            }
            if let Some(src) = el.src.as_mut() {
                if src.is_relative() {
                    *src = base.join(&*src);
                }
            }
        }
        Ok(fixture)
    }

    #[cfg(test)]
    fn element(&self, id: &str) -> Option<&ElementSpec> {
        self.elements.iter().find(|el| el.id == id)
    }
}
