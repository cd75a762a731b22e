//! Transform configuration.
//!
//! `Options` is the caller-facing surface: everything optional except the
//! factory identifier, deserializable from camelCase JSON so a config file
//! maps 1:1 onto the struct. `normalize` resolves defaults into an immutable
//! `NormalizedOptions` without ever writing back into the caller's value, so
//! one `Options` can safely drive many transforms.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Caller-supplied transform options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Identifier emitted as the element-construction call target for known
    /// tags, e.g. `DOM` or `mercury.h`. Required.
    pub factory: Option<String>,
    /// Merge-helper function wrapped around the attribute list when spread
    /// attributes are present (default: `Object.assign`).
    pub spread_fn: Option<String>,
    /// Call-target template for unknown tags; `{tag}` is replaced by the
    /// tag's source text (default: `{tag}`).
    pub unknown_tag_pattern: Option<String>,
    /// Pass unknown tags to the factory as a first argument instead of
    /// calling them through `unknown_tag_pattern`.
    pub pass_unknown_tags_to_factory: bool,
    /// With `pass_unknown_tags_to_factory`, quote the unknown tag name.
    pub unknown_tags_as_string: bool,
    /// Emit children wrapped in one array literal instead of as successive
    /// call arguments (default: true).
    pub array_children: Option<bool>,
    /// Attribute key substitutions applied before key quoting, e.g.
    /// `class` -> `className`.
    pub rename_attrs: Option<HashMap<String, String>>,
    /// Filename suffixes rewritten by the filter-transform adapter
    /// (default: `.js`, `.jsx`, `.es`, `.es6`).
    pub extensions: Option<Vec<String>>,
}

/// Validated configuration with all defaults resolved. Read-only during a
/// transform.
#[derive(Debug, Clone)]
pub struct NormalizedOptions {
    pub factory: String,
    pub spread_fn: String,
    pub unknown_tag_pattern: String,
    pub pass_unknown_tags_to_factory: bool,
    pub unknown_tags_as_string: bool,
    pub array_children: bool,
    pub rename_attrs: HashMap<String, String>,
    pub extensions: Vec<String>,
}

impl Options {
    /// Resolve defaults into a validated configuration.
    ///
    /// Fails with `Error::Configuration` when the factory identifier is
    /// absent. Never mutates `self`.
    pub fn normalize(&self) -> Result<NormalizedOptions, Error> {
        let factory = match &self.factory {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                return Err(Error::Configuration(
                    "missing `factory` identifier for element construction".into(),
                ))
            }
        };

        Ok(NormalizedOptions {
            factory,
            spread_fn: self
                .spread_fn
                .clone()
                .unwrap_or_else(|| "Object.assign".into()),
            unknown_tag_pattern: self
                .unknown_tag_pattern
                .clone()
                .unwrap_or_else(|| "{tag}".into()),
            pass_unknown_tags_to_factory: self.pass_unknown_tags_to_factory,
            unknown_tags_as_string: self.unknown_tags_as_string,
            array_children: self.array_children.unwrap_or(true),
            rename_attrs: self.rename_attrs.clone().unwrap_or_default(),
            extensions: self.extensions.clone().unwrap_or_else(default_extensions),
        })
    }
}

/// Filename suffixes the filter-transform adapter rewrites by default.
pub fn default_extensions() -> Vec<String> {
    [".js", ".jsx", ".es", ".es6"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}
