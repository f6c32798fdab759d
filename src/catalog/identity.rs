use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};

/// Stable identifier for an example: its path under the catalog root without
/// the extension, `/`-separated on every platform (e.g. `fractals/menger`).
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExampleName(pub String);

impl ExampleName {
    /// Derive the name from a path relative to the catalog root.
    ///
    /// Returns `None` for paths that escape the root or are not valid UTF-8.
    pub fn from_relative(relative: &Path) -> Option<Self> {
        let stem = relative.with_extension("");
        let mut parts = Vec::new();
        for component in stem.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_str()?),
                Component::CurDir => {}
                _ => return None,
            }
        }
        if parts.is_empty() {
            return None;
        }
        Some(ExampleName(parts.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExampleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_drops_extension_and_joins_with_slash() {
        let name = ExampleName::from_relative(Path::new("fractals/menger.es")).unwrap();
        assert_eq!(name.as_str(), "fractals/menger");
        let same = ExampleName::from_relative(Path::new("./fractals/menger.json")).unwrap();
        assert_eq!(name, same);
    }

    #[test]
    fn escaping_paths_have_no_name() {
        assert!(ExampleName::from_relative(Path::new("../outside.es")).is_none());
        assert!(ExampleName::from_relative(Path::new("/abs/path.es")).is_none());
    }

    #[test]
    fn name_serializes_as_plain_string() {
        let name = ExampleName("spirals/nautilus".to_string());
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"spirals/nautilus\"");
        let back: ExampleName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
    }
}
