//! CLI Commands for RAMFS
//!
//! This module implements command-line interface commands over the RAMFS
//! service.

use ramfs::{EntryKind, SharedRamFs};
use services_ramfs::{FileSystemOperations, RamFsService};

/// Log lines shown by `log` without an argument
const DEFAULT_LOG_LINES: usize = 10;

/// CLI Command handler
pub struct CommandHandler {
    /// RAMFS service
    pub fs_service: RamFsService,
}

impl CommandHandler {
    /// Creates a command handler over a fresh store
    pub fn new() -> Self {
        Self::with_store(SharedRamFs::default())
    }

    /// Creates a command handler over an existing store
    pub fn with_store(fs: SharedRamFs) -> Self {
        Self {
            fs_service: RamFsService::with_store(fs),
        }
    }

    /// Lists directory contents
    ///
    /// Example: `ls docs`
    pub fn ls(&self, path: &str) -> Result<String, String> {
        let entries = self
            .fs_service
            .ls(path)
            .map_err(|e| format!("ls failed: {}", e))?;

        let lines: Vec<String> = entries
            .iter()
            .map(|e| match e.kind {
                EntryKind::Directory => format!("{}/", e.name),
                EntryKind::File => format!("{}  {}", e.name, e.size),
            })
            .collect();
        Ok(lines.join("\n"))
    }

    /// Creates a directory
    ///
    /// Example: `mkdir docs`
    pub fn mkdir(&mut self, path: &str) -> Result<String, String> {
        let id = self
            .fs_service
            .mkdir(path)
            .map_err(|e| format!("mkdir failed: {}", e))?;

        Ok(format!("Created directory: {}", id))
    }

    /// Changes the current directory
    ///
    /// Example: `cd ..`
    pub fn cd(&mut self, path: &str) -> Result<String, String> {
        self.fs_service
            .cd(path)
            .map_err(|e| format!("cd failed: {}", e))?;
        Ok(String::new())
    }

    /// Prints the current directory
    pub fn pwd(&self) -> Result<String, String> {
        self.fs_service
            .pwd()
            .map_err(|e| format!("pwd failed: {}", e))
    }

    /// Reads file contents
    ///
    /// Example: `cat docs/notes.txt`
    pub fn cat(&self, path: &str) -> Result<String, String> {
        let bytes = self
            .fs_service
            .cat(path)
            .map_err(|e| format!("cat failed: {}", e))?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Creates an empty file
    ///
    /// Example: `touch notes.txt`
    pub fn touch(&mut self, path: &str) -> Result<String, String> {
        let id = self
            .fs_service
            .touch(path)
            .map_err(|e| format!("touch failed: {}", e))?;

        Ok(format!("Created file: {}", id))
    }

    /// Replaces file contents, creating the file when missing
    ///
    /// Example: `write notes.txt buy milk`
    pub fn write(&mut self, path: &str, text: &str) -> Result<String, String> {
        self.fs_service
            .write(path, text.as_bytes())
            .map_err(|e| format!("write failed: {}", e))?;

        Ok(format!("Wrote {} bytes to {}", text.len(), path))
    }

    /// Removes an entry and everything below it
    ///
    /// Example: `rm docs`
    pub fn rm(&mut self, path: &str) -> Result<String, String> {
        let removed = self
            .fs_service
            .rm(path)
            .map_err(|e| format!("rm failed: {}", e))?;

        Ok(format!("Removed {} entries", removed))
    }

    /// Renames an entry in place
    ///
    /// Example: `mv notes.txt todo.txt`
    pub fn mv(&mut self, path: &str, new_name: &str) -> Result<String, String> {
        self.fs_service
            .mv(path, new_name)
            .map_err(|e| format!("mv failed: {}", e))?;

        Ok(format!("Renamed {} to {}", path, new_name))
    }

    /// Copies a file into a new entry in the current directory
    ///
    /// Example: `cp notes.txt backup.txt`
    pub fn cp(&mut self, src: &str, dst: &str) -> Result<String, String> {
        let id = self
            .fs_service
            .cp(src, dst)
            .map_err(|e| format!("cp failed: {}", e))?;

        Ok(format!("Copied {} to {} ({})", src, dst, id))
    }

    /// Searches the whole tree for names containing a pattern
    ///
    /// Example: `find .txt`
    pub fn find(&self, pattern: &str) -> Result<String, String> {
        let paths = self
            .fs_service
            .find(pattern)
            .map_err(|e| format!("find failed: {}", e))?;

        Ok(paths.join("\n"))
    }

    /// Reports space used below a path
    ///
    /// Example: `du docs`
    pub fn du(&self, path: &str) -> Result<String, String> {
        let usage = self
            .fs_service
            .du(path)
            .map_err(|e| format!("du failed: {}", e))?;

        Ok(format!(
            "{} bytes in {} files, {} directories",
            usage.bytes, usage.files, usage.directories
        ))
    }

    /// Displays entry information
    ///
    /// Example: `stat docs/notes.txt`
    pub fn stat(&self, path: &str) -> Result<String, String> {
        let stat_info = self
            .fs_service
            .stat(path)
            .map_err(|e| format!("stat failed: {}", e))?;

        let mut output = format!("Path: {}\n", stat_info.path);
        output.push_str(&format!("Entry: {}\n", stat_info.id));
        output.push_str(&format!("Kind: {}\n", stat_info.kind));
        output.push_str(&format!("Parent: {}\n", stat_info.parent));
        match stat_info.entry_count {
            Some(count) => output.push_str(&format!("Entries: {}", count)),
            None => output.push_str(&format!(
                "Size: {} bytes (capacity {})",
                stat_info.size, stat_info.capacity
            )),
        }

        Ok(output)
    }

    /// Shows the most recent log entries of the store
    ///
    /// Example: `log 20`
    pub fn log(&self, count: &str) -> Result<String, String> {
        let count = if count.is_empty() {
            DEFAULT_LOG_LINES
        } else {
            count
                .parse::<usize>()
                .map_err(|_| format!("log failed: not a number: {}", count))?
        };

        let fs = self.fs_service.store().lock();
        let lines = fs.log().render();
        let skip = lines.len().saturating_sub(count);
        Ok(lines[skip..].join("\n"))
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mkdir_command() {
        let mut handler = CommandHandler::new();
        let result = handler.mkdir("docs");
        assert_eq!(result.unwrap(), "Created directory: entry:1");
    }

    #[test]
    fn test_ls_command() {
        let mut handler = CommandHandler::new();
        handler.mkdir("docs").unwrap();
        handler.write("notes.txt", "hello").unwrap();

        let listing = handler.ls("/").unwrap();
        assert_eq!(listing, "docs/\nnotes.txt  5");
    }

    #[test]
    fn test_write_and_cat_command() {
        let mut handler = CommandHandler::new();
        handler.write("file.txt", "some text").unwrap();
        assert_eq!(handler.cat("file.txt").unwrap(), "some text");
    }

    #[test]
    fn test_cat_nonexistent_file() {
        let handler = CommandHandler::new();
        let result = handler.cat("nonexistent.txt");
        assert_eq!(
            result.unwrap_err(),
            "cat failed: File not found: nonexistent.txt"
        );
    }

    #[test]
    fn test_cd_and_pwd_command() {
        let mut handler = CommandHandler::new();
        handler.mkdir("docs").unwrap();
        handler.cd("docs").unwrap();
        assert_eq!(handler.pwd().unwrap(), "/docs");
        handler.cd("..").unwrap();
        assert_eq!(handler.pwd().unwrap(), "/");
        assert!(handler.cd("missing").unwrap_err().starts_with("cd failed"));
    }

    #[test]
    fn test_rm_command() {
        let mut handler = CommandHandler::new();
        handler.mkdir("docs").unwrap();
        handler.cd("docs").unwrap();
        handler.touch("a").unwrap();
        handler.cd("/").unwrap();
        assert_eq!(handler.rm("docs").unwrap(), "Removed 2 entries");
    }

    #[test]
    fn test_mv_and_cp_command() {
        let mut handler = CommandHandler::new();
        handler.write("a", "data").unwrap();
        handler.mv("a", "b").unwrap();
        handler.cp("b", "c").unwrap();
        assert_eq!(handler.cat("c").unwrap(), "data");
        assert!(handler.cat("a").is_err());
    }

    #[test]
    fn test_find_and_du_command() {
        let mut handler = CommandHandler::new();
        handler.write("one.txt", "1").unwrap();
        handler.write("two.txt", "22").unwrap();
        handler.touch("other").unwrap();

        assert_eq!(handler.find(".txt").unwrap(), "/one.txt\n/two.txt");
        assert_eq!(
            handler.du("/").unwrap(),
            "3 bytes in 3 files, 1 directories"
        );
    }

    #[test]
    fn test_stat_command() {
        let mut handler = CommandHandler::new();
        handler.write("file.txt", "abc").unwrap();

        let output = handler.stat("file.txt").unwrap();
        assert!(output.contains("Path: /file.txt"));
        assert!(output.contains("Kind: file"));
        assert!(output.contains("Size: 3 bytes (capacity 1027)"));

        let root = handler.stat("/").unwrap();
        assert!(root.contains("Entries: 1"));
    }

    #[test]
    fn test_log_command() {
        let mut handler = CommandHandler::new();
        handler.touch("a").unwrap();
        handler.rm("a").unwrap();

        let output = handler.log("1").unwrap();
        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("[INFO] ramfs: deleted"));
        assert!(handler.log("many").is_err());
    }
}
