use crate::error::{ContextError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Programming language of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Ruby,
    Swift,
    Kotlin,
    Lua,
    Shell,
    Unknown,
}

/// One row of the language table. The first extension is the one used for
/// scratch files.
struct Entry {
    language: Language,
    label: &'static str,
    aliases: &'static [&'static str],
    extensions: &'static [&'static str],
}

const fn entry(
    language: Language,
    label: &'static str,
    aliases: &'static [&'static str],
    extensions: &'static [&'static str],
) -> Entry {
    Entry {
        language,
        label,
        aliases,
        extensions,
    }
}

static LANGUAGES: &[Entry] = &[
    entry(Language::Rust, "rust", &[], &["rs"]),
    entry(Language::Python, "python", &[], &["py", "pyw"]),
    entry(Language::JavaScript, "javascript", &["javascriptreact"], &["js", "mjs", "cjs", "jsx"]),
    entry(Language::TypeScript, "typescript", &["typescriptreact"], &["ts", "tsx"]),
    entry(Language::Go, "go", &[], &["go"]),
    entry(Language::Java, "java", &[], &["java"]),
    entry(Language::C, "c", &[], &["c", "h"]),
    entry(Language::Cpp, "cpp", &[], &["cpp", "cc", "cxx", "hpp", "hh", "hxx"]),
    entry(Language::CSharp, "csharp", &["cs"], &["cs"]),
    entry(Language::Ruby, "ruby", &[], &["rb"]),
    entry(Language::Swift, "swift", &[], &["swift"]),
    entry(Language::Kotlin, "kotlin", &[], &["kt", "kts"]),
    entry(Language::Lua, "lua", &[], &["lua"]),
    entry(Language::Shell, "sh", &["bash", "zsh", "shell"], &["sh", "bash", "zsh"]),
];

impl Language {
    fn entry(self) -> Option<&'static Entry> {
        LANGUAGES.iter().find(|s| s.language == self)
    }

    fn lookup(matches: impl Fn(&Entry) -> bool) -> Self {
        LANGUAGES
            .iter()
            .find(|s| matches(s))
            .map_or(Language::Unknown, |s| s.language)
    }

    /// Language for a file extension (case-insensitive, no dot)
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        Self::lookup(|s| s.extensions.contains(&ext.as_str()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(Language::Unknown, Self::from_extension)
    }

    /// Language for an editor filetype label such as `typescriptreact`
    pub fn from_label(label: &str) -> Self {
        let label = label.to_ascii_lowercase();
        Self::lookup(|s| s.label == label || s.aliases.contains(&label.as_str()))
    }

    /// Canonical filetype label
    pub fn as_str(self) -> &'static str {
        self.entry().map_or("unknown", |s| s.label)
    }

    /// Whether a tree-sitter grammar is linked in for this language
    pub fn supports_ast(self) -> bool {
        self.tree_sitter_language().is_ok()
    }

    pub fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        let grammar = match self {
            Language::Rust => tree_sitter_rust::LANGUAGE,
            Language::Python => tree_sitter_python::LANGUAGE,
            Language::JavaScript => tree_sitter_javascript::LANGUAGE,
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
            _ => return Err(ContextError::unsupported_language(self.as_str())),
        };
        Ok(grammar.into())
    }
}

/// Filetypes without a [`Language`] that still deserve a real extension
const OTHER_EXTENSIONS: &[(&str, &str)] = &[
    ("php", "php"),
    ("vim", "vim"),
    ("html", "html"),
    ("css", "css"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("toml", "toml"),
    ("markdown", "md"),
    ("sql", "sql"),
];

/// Filetype label → temp-file extension mapping.
///
/// Built-in pairs are overlaid with user overrides; unknown labels map to
/// the default extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionTable {
    /// Extension for labels that appear nowhere else
    pub default_extension: String,

    /// User overrides, consulted before the built-in table
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

impl Default for ExtensionTable {
    fn default() -> Self {
        Self {
            default_extension: "txt".to_string(),
            overrides: HashMap::new(),
        }
    }
}

impl ExtensionTable {
    pub fn new(default_extension: impl Into<String>, overrides: HashMap<String, String>) -> Self {
        Self {
            default_extension: default_extension.into(),
            overrides,
        }
    }

    /// Extension (without the dot) for a filetype label
    pub fn infer(&self, label: &str) -> String {
        let key = label.to_lowercase();
        if let Some((_, ext)) = self
            .overrides
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&key))
        {
            return ext.trim_start_matches('.').to_string();
        }
        if let Some(ext) = Language::from_label(&key).entry().map(|s| s.extensions[0]) {
            return ext.to_string();
        }
        OTHER_EXTENSIONS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, ext)| (*ext).to_string())
            .unwrap_or_else(|| self.default_extension.trim_start_matches('.').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extensions_and_paths() {
        assert_eq!(Language::from_extension("RS"), Language::Rust);
        assert_eq!(Language::from_extension("pyw"), Language::Python);
        assert_eq!(Language::from_extension("lua"), Language::Lua);
        assert_eq!(Language::from_extension("zig"), Language::Unknown);
        assert_eq!(Language::from_path("src/app.tsx"), Language::TypeScript);
        assert_eq!(Language::from_path("Makefile"), Language::Unknown);
    }

    #[test]
    fn labels_and_aliases() {
        assert_eq!(Language::from_label("typescriptreact"), Language::TypeScript);
        assert_eq!(Language::from_label("bash"), Language::Shell);
        assert_eq!(Language::from_label("cs"), Language::CSharp);
        assert_eq!(Language::from_label("markdown"), Language::Unknown);
        assert_eq!(Language::Shell.as_str(), "sh");
        assert_eq!(Language::Unknown.as_str(), "unknown");
    }

    #[test]
    fn grammars() {
        for language in [
            Language::Rust,
            Language::Python,
            Language::JavaScript,
            Language::TypeScript,
        ] {
            assert!(language.supports_ast(), "{language:?}");
        }
        assert!(matches!(
            Language::Go.tree_sitter_language(),
            Err(ContextError::UnsupportedLanguage(_))
        ));
        assert!(!Language::Lua.supports_ast());
    }

    #[test]
    fn infer_uses_builtin_table() {
        let table = ExtensionTable::default();
        assert_eq!(table.infer("python"), "py");
        assert_eq!(table.infer("Rust"), "rs");
        assert_eq!(table.infer("javascriptreact"), "js");
        assert_eq!(table.infer("zsh"), "sh");
        assert_eq!(table.infer("markdown"), "md");
    }

    #[test]
    fn infer_falls_back_to_default() {
        let table = ExtensionTable::new("md", HashMap::new());
        assert_eq!(table.infer("brainfuck"), "md");
        assert_eq!(table.infer(""), "md");
    }

    #[test]
    fn overrides_win_and_lose_their_dot() {
        let mut overrides = HashMap::new();
        overrides.insert("Python".to_string(), ".pyi".to_string());
        let table = ExtensionTable::new("txt", overrides);
        assert_eq!(table.infer("python"), "pyi");
        assert_eq!(table.infer("lua"), "lua");
    }
}
