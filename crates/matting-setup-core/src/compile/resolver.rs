//! Platform to compile command resolution.

use tracing::debug;

use crate::error::{Error, Result};

use super::platform::Platform;
use super::table::CommandTable;
use super::types::CompileCommand;

/// Resolves a platform identifier against a [`CommandTable`].
///
/// Resolution is a pure lookup: it never touches the filesystem or spawns
/// a process, so an unsupported platform fails before any side effect.
pub struct PlatformResolver<'a> {
    table: &'a CommandTable,
}

impl<'a> PlatformResolver<'a> {
    pub fn new(table: &'a CommandTable) -> Self {
        Self { table }
    }

    /// Resolve `identifier` (e.g. `linux`) to a bound compile command.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedPlatform`] if the identifier is unknown
    /// or the table has no entry for it.
    pub fn resolve(&self, identifier: &str) -> Result<(Platform, CompileCommand)> {
        let platform: Platform = identifier.parse()?;
        let template = self
            .table
            .get(platform)
            .ok_or_else(|| Error::UnsupportedPlatform(identifier.to_string()))?;

        let command = template.bind(self.table.sources());
        debug!(%platform, command = %command, "resolved compile command");
        Ok((platform, command))
    }
}
