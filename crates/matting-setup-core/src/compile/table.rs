//! Per-platform compile command templates.

use std::collections::BTreeMap;

use super::platform::Platform;
use super::types::{BuildConfig, CompileCommand, Toolchain};

/// Compiler invocation for one platform, waiting for its sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    pub compiler: String,
    pub toolchain: Toolchain,
    pub flags: Vec<String>,
    pub link_flags: Vec<String>,

    /// Output filename, from [`BuildConfig::artifact_name`].
    pub output: String,
}

impl CommandTemplate {
    /// Bind sources into a runnable command.
    pub fn bind(&self, sources: &[String]) -> CompileCommand {
        CompileCommand {
            compiler: self.compiler.clone(),
            toolchain: self.toolchain,
            flags: self.flags.clone(),
            sources: sources.to_vec(),
            link_flags: self.link_flags.clone(),
            output: self.output.clone(),
        }
    }
}

/// Immutable mapping from platform to compile command template.
///
/// A platform without an entry is unsupported.
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: BTreeMap<Platform, CommandTemplate>,
    sources: Vec<String>,
}

impl CommandTable {
    /// Build the table for every supported platform from `config`.
    pub fn from_config(config: &BuildConfig) -> Self {
        let entries = Platform::ALL
            .into_iter()
            .map(|platform| (platform, Self::template_for(config, platform)))
            .collect();

        Self {
            entries,
            sources: config.sources.clone(),
        }
    }

    /// Drop the entry for `platform`, marking it unsupported.
    pub fn without(mut self, platform: Platform) -> Self {
        self.entries.remove(&platform);
        self
    }

    /// Template for `platform`, if supported.
    pub fn get(&self, platform: Platform) -> Option<&CommandTemplate> {
        self.entries.get(&platform)
    }

    /// Supported platforms, in table order.
    pub fn platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.entries.keys().copied()
    }

    /// Source files bound into every command.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    fn template_for(config: &BuildConfig, platform: Platform) -> CommandTemplate {
        let output = config.artifact_name(platform);
        if platform == Platform::Windows && config.use_msvc {
            return CommandTemplate {
                compiler: "cl".to_string(),
                toolchain: Toolchain::Msvc,
                flags: vec!["/LD".to_string(), "/O2".to_string()],
                link_flags: Vec::new(),
                output,
            };
        }

        let link_flags = if platform.needs_pic() {
            vec!["-fPIC".to_string(), "-lm".to_string()]
        } else {
            Vec::new()
        };

        CommandTemplate {
            compiler: config.compiler.clone(),
            toolchain: Toolchain::Gnu,
            flags: config.flags.clone(),
            link_flags,
            output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_entry_per_platform() {
        let table = CommandTable::from_config(&BuildConfig::default());
        assert_eq!(table.platforms().collect::<Vec<_>>(), Platform::ALL.to_vec());
    }

    #[test]
    fn test_pic_only_off_windows() {
        let table = CommandTable::from_config(&BuildConfig::default());
        assert!(table.get(Platform::Windows).unwrap().link_flags.is_empty());
        for platform in [Platform::Linux, Platform::Darwin] {
            assert_eq!(table.get(platform).unwrap().link_flags, ["-fPIC", "-lm"]);
        }
    }

    #[test]
    fn test_shared_flags_identical() {
        let table = CommandTable::from_config(&BuildConfig::default());
        let windows = &table.get(Platform::Windows).unwrap().flags;
        let linux = &table.get(Platform::Linux).unwrap().flags;
        assert_eq!(windows, linux);
        assert!(linux.contains(&"-shared".to_string()));
    }

    #[test]
    fn test_msvc_replaces_windows_entry() {
        let table = CommandTable::from_config(&BuildConfig::default().with_msvc(true));
        let windows = table.get(Platform::Windows).unwrap();
        assert_eq!(windows.compiler, "cl");
        assert_eq!(windows.toolchain, Toolchain::Msvc);
        assert_eq!(table.get(Platform::Linux).unwrap().compiler, "gcc");
    }

    #[test]
    fn test_output_matches_package_data_names() {
        let mut config = BuildConfig::default().with_msvc(true);
        config.library = "trimap".to_string();
        let table = CommandTable::from_config(&config);
        for platform in Platform::ALL {
            let output = &table.get(platform).unwrap().output;
            assert_eq!(*output, config.artifact_name(platform));
            assert!(config.artifact_names().contains(output));
        }
    }

    #[test]
    fn test_without_removes_entry() {
        let table = CommandTable::from_config(&BuildConfig::default()).without(Platform::Darwin);
        assert!(table.get(Platform::Darwin).is_none());
        assert!(table.get(Platform::Linux).is_some());
    }
}
