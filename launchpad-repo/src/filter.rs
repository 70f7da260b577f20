//! File filtering utilities for the directory tree

/// Dot-prefixed names that still show up in the tree
pub const VISIBLE_DOTFILES: &[&str] = &[".env", ".env.example", ".env.local", ".gitignore"];

/// Check if a directory entry should appear in the rendered tree
pub fn should_list_entry(name: &str) -> bool {
    !name.starts_with('.') || VISIBLE_DOTFILES.contains(&name)
}

/// Turn a filename into a map key: every non-alphanumeric character becomes `_`
pub fn sanitize_key(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
