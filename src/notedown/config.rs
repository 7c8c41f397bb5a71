//! Document configuration
//!
//! The header fields rendered by the `Header` directive. They are supplied
//! from outside the compiler core, typically from a small YAML file next to
//! the document; every field defaults to empty and the header renders only
//! what is present.

use serde::{Deserialize, Serialize};

/// The document header fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Assignment title.
    pub title: String,
    /// Student name.
    pub name: String,
    /// Student id.
    pub id: String,
    /// Class name.
    pub course: String,
    pub semester: String,
    pub instructor: String,
}

impl DocumentConfig {
    /// Load a config from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_full() {
        let config = DocumentConfig::from_yaml_str(
            "title: Problem Set 3\nname: Ada Lovelace\nid: \"12345\"\ncourse: CS 101\nsemester: Fall 2025\ninstructor: Prof. Byron\n",
        )
        .unwrap();
        assert_eq!(config.title, "Problem Set 3");
        assert_eq!(config.name, "Ada Lovelace");
        assert_eq!(config.id, "12345");
        assert_eq!(config.course, "CS 101");
        assert_eq!(config.semester, "Fall 2025");
        assert_eq!(config.instructor, "Prof. Byron");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let config = DocumentConfig::from_yaml_str("title: Only a title\n").unwrap();
        assert_eq!(config.title, "Only a title");
        assert_eq!(config.name, "");
        assert_eq!(config.instructor, "");
    }
}
