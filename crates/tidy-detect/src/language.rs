//! Programming-language identification for code files.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Jsx,
    Tsx,
    Java,
    CSharp,
    Cpp,
    C,
    Go,
    Rust,
    Ruby,
    Php,
    Swift,
    Kotlin,
    Scala,
    Shell,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Jsx => "jsx",
            Self::Tsx => "tsx",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Ruby => "ruby",
            Self::Php => "php",
            Self::Swift => "swift",
            Self::Kotlin => "kotlin",
            Self::Scala => "scala",
            Self::Shell => "shell",
        }
    }

    /// Language for a file extension, without the dot, any case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lang = match ext.to_ascii_lowercase().as_str() {
            "py" | "pyw" => Self::Python,
            "js" | "mjs" | "cjs" => Self::JavaScript,
            "ts" | "mts" => Self::TypeScript,
            "jsx" => Self::Jsx,
            "tsx" => Self::Tsx,
            "java" => Self::Java,
            "cs" => Self::CSharp,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Self::Cpp,
            "c" | "h" => Self::C,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "rb" => Self::Ruby,
            "php" => Self::Php,
            "swift" => Self::Swift,
            "kt" | "kts" => Self::Kotlin,
            "scala" => Self::Scala,
            "sh" | "bash" | "zsh" => Self::Shell,
            _ => return None,
        };
        Some(lang)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|e| e.to_str()).and_then(Self::from_extension)
    }

    /// Interpreter named on a `#!` first line.
    pub fn from_shebang(content: &str) -> Option<Self> {
        let first = content.lines().next()?;
        let caps = RE_SHEBANG.captures(first)?;
        let lang = match &caps[1] {
            "python" | "python2" | "python3" => Self::Python,
            "node" | "deno" => Self::JavaScript,
            "ruby" => Self::Ruby,
            "php" => Self::Php,
            _ => Self::Shell,
        };
        Some(lang)
    }

    /// Best guess from the text alone: shebang first, then keyword fingerprints.
    pub fn from_content(content: &str) -> Option<Self> {
        Self::from_shebang(content)
            .or_else(|| FINGERPRINTS.iter().find(|(_, re)| re.is_match(content)).map(|(lang, _)| *lang))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static RE_SHEBANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#!\s*\S*?(?:/env\s+)?\b(python[23]?|node|deno|ruby|php|bash|sh|zsh|dash)\b").unwrap());

// Checked in order; the first fingerprint that matches wins.
static FINGERPRINTS: LazyLock<Vec<(Language, Regex)>> = LazyLock::new(|| {
    [
        (Language::Php, r"<\?php"),
        (Language::Rust, r"(?m)^\s*(?:pub\s+)?fn\s+\w+|^\s*use\s+(?:std|crate)::|\blet\s+mut\s"),
        (Language::Go, r"(?m)^package\s+\w+\s*$"),
        (Language::CSharp, r"(?m)^using\s+System"),
        (Language::Java, r"(?m)\bpublic\s+(?:final\s+|abstract\s+)?class\s+\w+|System\.out\.println|^import\s+java\."),
        (Language::Cpp, r"#include\s*<(?:iostream|vector|string|map|memory)>|\bstd::"),
        (Language::C, r#"(?m)^#include\s*[<"]"#),
        (
            Language::Python,
            r"(?m)^\s*def\s+\w+\s*\([^)]*\)\s*(?:->[^:\n]+)?:|^\s*(?:from\s+[\w.]+\s+)?import\s+[\w., ]+$|^\s*class\s+\w+(?:\([^)]*\))?:",
        ),
        (Language::TypeScript, r"\binterface\s+\w+\s*\{|:\s*(?:string|number|boolean)\b"),
        (Language::JavaScript, r"\bconsole\.log\(|\bfunction\s+\w+\s*\(|\b(?:const|let|var)\s+\w+\s*=|=>|\brequire\("),
        (Language::Ruby, r#"(?m)^\s*require\s+['"]|^\s*end\s*$"#),
        (Language::Shell, r"(?m)^\s*(?:echo|export|fi|then|done)\b"),
    ]
    .into_iter()
    .map(|(lang, p)| (lang, Regex::new(p).unwrap()))
    .collect()
});

/// Language of a code file: extension table first, content second.
pub fn detect_language(path: &Path, content: &str) -> Option<Language> {
    Language::from_path(path).or_else(|| Language::from_content(content))
}
