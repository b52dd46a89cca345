/// Lowercase extension of the last path segment, without the dot.
///
/// Dotfiles such as `.env` have no extension.
#[must_use]
pub fn extension(path: &str) -> Option<String> {
    let name = crate::models::file::file_name(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Map file extension to language identifier.
#[must_use]
pub fn ext_to_lang(ext: &str) -> Option<&'static str> {
    let lang = match ext.to_ascii_lowercase().as_str() {
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "tsx",
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "py" | "pyi" => "python",
        "go" => "go",
        "rs" => "rust",
        "rb" => "ruby",
        "java" => "java",
        "cs" => "csharp",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" => "cpp",
        "md" | "mdx" | "markdown" => "markdown",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "html" | "htm" => "html",
        "css" | "scss" | "sass" => "css",
        "sh" | "bash" => "bash",
        "sql" => "sql",
        _ => return None,
    };
    Some(lang)
}

/// Detect the language of a path from its extension.
#[must_use]
pub fn detect_language(path: &str) -> Option<&'static str> {
    extension(path).and_then(|ext| ext_to_lang(&ext))
}

/// Whether the language is a programming language (as opposed to markup,
/// data or documentation).
#[must_use]
pub fn is_source_language(lang: &str) -> bool {
    matches!(
        lang,
        "typescript"
            | "tsx"
            | "javascript"
            | "python"
            | "go"
            | "rust"
            | "ruby"
            | "java"
            | "csharp"
            | "c"
            | "cpp"
    )
}
