use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layer::{BuiltinKind, LayerKind, Rgb};

/// Layer kind to base color mapping.
///
/// Built-in kinds live in a fixed array; custom kinds are kept in
/// registration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    builtin: [Rgb; 7],
    custom: Vec<(String, Rgb)>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            builtin: BuiltinKind::ALL.map(BuiltinKind::default_color),
            custom: Vec::new(),
        }
    }
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin(&self, kind: BuiltinKind) -> Rgb {
        self.builtin[kind.index()]
    }

    pub fn set_builtin(&mut self, kind: BuiltinKind, color: Rgb) {
        self.builtin[kind.index()] = color;
    }

    pub fn custom(&self, name: &str) -> Option<Rgb> {
        self.custom
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| *c)
    }

    /// Register or recolor a custom kind.
    pub fn set_custom(&mut self, name: &str, color: Rgb) {
        match self.custom.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = color,
            None => self.custom.push((name.to_string(), color)),
        }
    }

    /// Base color for a layer kind. Custom kinds named after a built-in
    /// legend label share that built-in's color.
    pub fn color_of(&self, kind: &LayerKind) -> Result<Rgb> {
        match kind {
            LayerKind::Custom { name } => self
                .custom(name)
                .or_else(|| BuiltinKind::from_display_name(name).map(|b| self.builtin(b)))
                .ok_or_else(|| Error::UnknownLayerKind(name.clone())),
            other => other
                .builtin()
                .map(|b| self.builtin(b))
                .ok_or_else(|| Error::UnknownLayerKind(other.display_name().to_string())),
        }
    }

    /// Recolor a kind by name. Registered custom names take precedence over
    /// built-in names.
    pub fn set_by_name(&mut self, name: &str, color: Rgb) -> Result<()> {
        if let Some(entry) = self.custom.iter_mut().find(|(n, _)| n == name) {
            entry.1 = color;
            return Ok(());
        }
        match BuiltinKind::from_name(name) {
            Some(kind) => {
                self.set_builtin(kind, color);
                Ok(())
            }
            None => Err(Error::UnknownLayerKind(name.to_string())),
        }
    }
}
