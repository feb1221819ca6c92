//! Nested description of a directory tree, as produced by an external directory scanner.
//!
//! In JSON form every directory is an object whose values are either `null` (a file)
//! or another object (a subdirectory):
//!
//! ```json
//! { "docs": { "readme.md": null }, "notes.txt": null }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::Result;

/// Contents of one directory: child name to `None` for a file, `Some` for a subdirectory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Listing(BTreeMap<String, Option<Listing>>);

impl Listing {
    pub fn new() -> Listing {
        Listing::default()
    }

    /// Parses a JSON listing. Values other than `null` and objects are rejected.
    ///
    /// Nesting depth is not limited: the parser grows its stack on the heap as needed.
    pub fn from_json(json: &str) -> Result<Listing> {
        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let listing = Listing::deserialize(serde_stacker::Deserializer::new(&mut de))?;
        de.end()?;
        Ok(listing)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn with_file(mut self, name: &str) -> Listing {
        self.0.insert(name.to_owned(), None);
        self
    }

    pub fn with_dir(mut self, name: &str, contents: Listing) -> Listing {
        self.0.insert(name.to_owned(), Some(contents));
        self
    }

    /// Iterates the direct children; `None` marks a file.
    pub fn entries(&self) -> impl Iterator<Item = (&str, Option<&Listing>)> {
        self.0
            .iter()
            .map(|(name, child)| (name.as_str(), child.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
