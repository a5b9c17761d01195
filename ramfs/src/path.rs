//! Path resolution logic
//!
//! This module turns textual paths into entry ids. Resolution never creates
//! entries and never moves the cursor.

use crate::error::{FsError, FsResult};
use crate::table::EntryTable;
use core_types::EntryId;

/// Path separator
pub const SEPARATOR: char = '/';

/// Path resolver
///
/// Stateless helpers over an [`EntryTable`].
pub struct PathResolver;

impl PathResolver {
    /// Returns true if the path starts at the root
    pub fn is_absolute(path: &str) -> bool {
        path.starts_with(SEPARATOR)
    }

    /// Splits a path into its non-empty segments
    ///
    /// # Examples
    ///
    /// ```
    /// use ramfs::PathResolver;
    ///
    /// let segments: Vec<&str> = PathResolver::segments("/docs//notes/").collect();
    /// assert_eq!(segments, vec!["docs", "notes"]);
    /// ```
    pub fn segments(path: &str) -> impl Iterator<Item = &str> {
        path.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// Returns the name a creation call uses for `path`
    ///
    /// Leading separators are stripped; the rest is kept verbatim, embedded
    /// separators included.
    pub fn creation_name(path: &str) -> &str {
        path.trim_start_matches(SEPARATOR)
    }

    /// Finds a child of `dir` by exact name, first match in insertion order
    pub fn find_child(table: &EntryTable, dir: EntryId, name: &str) -> Option<EntryId> {
        let entry = table.get(dir).ok()?;
        entry
            .children()
            .iter()
            .copied()
            .find(|child| table.get(*child).map_or(false, |c| c.name() == name))
    }

    /// Resolves `path` to an entry id
    ///
    /// Absolute paths start at the root; relative paths start at `base`. Each
    /// segment must match a child of the entry reached so far. A path with no
    /// segments resolves to its starting point.
    pub fn resolve(table: &EntryTable, base: EntryId, path: &str) -> FsResult<EntryId> {
        let mut current = if Self::is_absolute(path) {
            EntryId::ROOT
        } else {
            table.get(base)?;
            base
        };

        for segment in Self::segments(path) {
            current = Self::find_child(table, current, segment)
                .ok_or_else(|| FsError::NotFound(path.to_string()))?;
        }

        Ok(current)
    }
}
