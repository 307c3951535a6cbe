//! Package manifest loading.
//!
//! Package metadata lives in a static TOML file next to the native
//! sources. It is parsed, never executed.
//!
//! ```toml
//! [package]
//! name = "matting"
//! version = "1.1.0"
//! uri = "https://example.org/matting"
//! author = "Jane Doe"
//! email = "jane@example.org"
//! summary = "Alpha matting"
//! license = "MIT"
//! readme = "README.md"
//! requires = ["numpy>=1.16.0"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default manifest filename at the project root.
pub const MANIFEST_FILE: &str = "package.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    package: PackageManifest,
}

/// Read-only package metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    /// Long description file, relative to the manifest.
    #[serde(default)]
    pub readme: Option<PathBuf>,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl PackageManifest {
    /// Load and validate the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| {
            Error::Manifest(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&source)
    }

    /// Parse and validate manifest source.
    pub fn parse(source: &str) -> Result<Self> {
        let file: ManifestFile = toml::from_str(source)?;
        let manifest = file.package;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Manifest("package name is empty".to_string()));
        }
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(Error::Manifest(format!(
                "package name '{}' may only contain ASCII letters, digits, '-' and '_'",
                self.name
            )));
        }
        if self.version.trim().is_empty() {
            return Err(Error::Manifest("package version is empty".to_string()));
        }
        Ok(())
    }

    /// Name of the generated metadata directory.
    pub fn metadata_dir_name(&self) -> String {
        format!("{}.pkg-info", self.name)
    }

    /// Name of the metadata directory inside the install prefix.
    pub fn installed_metadata_dir_name(&self) -> String {
        format!("{}-{}.pkg-info", self.name, self.version)
    }

    /// Read the long description, if a readme is declared.
    pub fn long_description(&self, root: &Path) -> Result<Option<String>> {
        let Some(readme) = &self.readme else {
            return Ok(None);
        };
        let path = root.join(readme);
        fs::read_to_string(&path).map(Some).map_err(|e| {
            Error::Manifest(format!("cannot read readme {}: {}", path.display(), e))
        })
    }

    /// Render the `PKG-INFO` metadata file.
    pub fn render_pkg_info(&self, long_description: Option<&str>) -> String {
        let mut out = String::new();
        out.push_str("Metadata-Version: 2.1\n");
        out.push_str(&format!("Name: {}\n", self.name));
        out.push_str(&format!("Version: {}\n", self.version));

        let optional = [
            ("Summary", &self.summary),
            ("Home-page", &self.uri),
            ("Author", &self.author),
            ("Author-email", &self.email),
            ("License", &self.license),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                out.push_str(&format!("{key}: {value}\n"));
            }
        }
        if !self.keywords.is_empty() {
            out.push_str(&format!("Keywords: {}\n", self.keywords.join(",")));
        }
        for requirement in &self.requires {
            out.push_str(&format!("Requires-Dist: {requirement}\n"));
        }
        if let Some(description) = long_description {
            out.push_str("Description-Content-Type: text/markdown\n\n");
            out.push_str(description);
            if !description.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[package]
name = "matting"
version = "1.1.0"
author = "Jane Doe"
summary = "Alpha matting"
license = "MIT"
requires = ["numpy>=1.16.0", "pillow>=5.2.0"]
"#;

    #[test]
    fn test_parse() {
        let manifest = PackageManifest::parse(SAMPLE).unwrap();
        assert_eq!(manifest.name, "matting");
        assert_eq!(manifest.version, "1.1.0");
        assert_eq!(manifest.requires.len(), 2);
        assert!(manifest.uri.is_none());
        assert_eq!(manifest.metadata_dir_name(), "matting.pkg-info");
        assert_eq!(manifest.installed_metadata_dir_name(), "matting-1.1.0.pkg-info");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let source = "[package]\nname = \"matting\"\nversion = \"1\"\ncmdclass = \"x\"\n";
        assert!(matches!(
            PackageManifest::parse(source),
            Err(Error::ManifestParse(_))
        ));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let source = "[package]\nname = \"../evil\"\nversion = \"1\"\n";
        assert!(matches!(PackageManifest::parse(source), Err(Error::Manifest(_))));
    }

    #[test]
    fn test_empty_version_rejected() {
        let source = "[package]\nname = \"matting\"\nversion = \" \"\n";
        assert!(matches!(PackageManifest::parse(source), Err(Error::Manifest(_))));
    }

    #[test]
    fn test_pkg_info() {
        let manifest = PackageManifest::parse(SAMPLE).unwrap();
        let info = manifest.render_pkg_info(Some("# Matting"));
        assert!(info.starts_with("Metadata-Version: 2.1\nName: matting\nVersion: 1.1.0\n"));
        assert!(info.contains("Author: Jane Doe\n"));
        assert!(!info.contains("Home-page"));
        assert!(info.contains("Requires-Dist: pillow>=5.2.0\n"));
        assert!(info.ends_with("# Matting\n"));
    }

    #[test]
    fn test_long_description() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let mut manifest = PackageManifest::parse(SAMPLE).unwrap();
        assert_eq!(manifest.long_description(temp.path()).unwrap(), None);

        manifest.readme = Some(PathBuf::from("README.md"));
        assert!(manifest.long_description(temp.path()).is_err());

        fs::write(temp.path().join("README.md"), "hello").unwrap();
        assert_eq!(
            manifest.long_description(temp.path()).unwrap().as_deref(),
            Some("hello")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let err = PackageManifest::load(&temp.path().join(MANIFEST_FILE)).unwrap_err();
        assert!(matches!(err, Error::Manifest(_)));
    }
}
