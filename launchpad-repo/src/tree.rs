//! Bounded directory tree rendering
//!
//! [`tree_lines`] walks lazily and yields one rendered line per entry:
//!
//! ```text
//! ├── package.json
//! ├── src/
//! │   ├── index.js
//! │   └── routes/
//! └── README.md
//! ```

use launchpad_core::LaunchpadResult;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::filter::should_list_entry;

const BRANCH: &str = "├── ";
const CORNER: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

/// Depth and width limits for the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Number of directory levels listed, the root's children being level one
    pub max_depth: usize,
    /// Entries kept per directory after filtering
    pub max_entries: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            max_entries: 20,
        }
    }
}

#[derive(Debug)]
struct TreeEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

struct Frame {
    entries: Peekable<std::vec::IntoIter<TreeEntry>>,
    prefix: String,
    depth: usize,
}

/// Lazy, finite sequence of rendered tree lines
pub struct TreeLines {
    stack: Vec<Frame>,
    options: TreeOptions,
}

/// Start a walk at `root`. Only a failure to list `root` itself is an error.
pub fn tree_lines(root: &Path, options: TreeOptions) -> LaunchpadResult<TreeLines> {
    let entries = list_dir(root, &options)?;
    let mut stack = Vec::new();
    if options.max_depth > 0 {
        stack.push(Frame {
            entries: entries.into_iter().peekable(),
            prefix: String::new(),
            depth: 0,
        });
    }
    Ok(TreeLines { stack, options })
}

/// Render the whole tree as one newline separated string
pub fn render_tree(root: &Path, options: TreeOptions) -> LaunchpadResult<String> {
    Ok(tree_lines(root, options)?.collect::<Vec<_>>().join("\n"))
}

/// One directory level: filtered, sorted by name, capped. Symlinks are never
/// followed and render as plain entries.
fn list_dir(dir: &Path, options: &TreeOptions) -> std::io::Result<Vec<TreeEntry>> {
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || should_list_entry(&e.file_name().to_string_lossy()));

    let mut entries = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            // depth 0 means `dir` itself could not be listed
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                debug!(path = ?e.path(), error = %e, "Skipping entry that cannot be stat'ed");
                continue;
            }
        };

        entries.push(TreeEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: entry.file_type().is_dir(),
            path: entry.into_path(),
        });
        if entries.len() == options.max_entries {
            break;
        }
    }

    Ok(entries)
}

impl Iterator for TreeLines {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(entry) = frame.entries.next() else {
                self.stack.pop();
                continue;
            };

            let is_last = frame.entries.peek().is_none();
            let line = format!(
                "{}{}{}{}",
                frame.prefix,
                if is_last { CORNER } else { BRANCH },
                entry.name,
                if entry.is_dir { "/" } else { "" }
            );

            let child_depth = frame.depth + 1;
            if entry.is_dir && child_depth < self.options.max_depth {
                let child_prefix = format!("{}{}", frame.prefix, if is_last { BLANK } else { PIPE });
                match list_dir(&entry.path, &self.options) {
                    Ok(children) if !children.is_empty() => self.stack.push(Frame {
                        entries: children.into_iter().peekable(),
                        prefix: child_prefix,
                        depth: child_depth,
                    }),
                    Ok(_) => {}
                    Err(e) => {
                        debug!(path = %entry.path.display(), error = %e, "Skipping unreadable directory")
                    }
                }
            }

            return Some(line);
        }
    }
}
