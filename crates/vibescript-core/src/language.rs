// SPDX-License-Identifier: Apache-2.0
//! Supported languages and their governed file naming conventions.
//!
//! Every language contributes three governed suffixes built from its source
//! extension: `.vibe.<ext>` (task files), `.human.<ext>` and `.lock.<ext>`.

/// Comment prefix used when a file's language cannot be determined.
pub const DEFAULT_COMMENT_PREFIX: &str = "//";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Ruby,
    Go,
    Rust,
    Php,
    Java,
    CSharp,
    Swift,
    Kotlin,
    Scala,
    Elixir,
    Dart,
    Lua,
    Shell,
    Clojure,
    Haskell,
    Crystal,
    R,
    Julia,
    Zig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub comment_prefix: &'static str,
    pub extension: &'static str,
    pub test_patterns: &'static [&'static str],
}

impl Language {
    pub const ALL: [Self; 22] = [
        Self::TypeScript,
        Self::JavaScript,
        Self::Python,
        Self::Ruby,
        Self::Go,
        Self::Rust,
        Self::Php,
        Self::Java,
        Self::CSharp,
        Self::Swift,
        Self::Kotlin,
        Self::Scala,
        Self::Elixir,
        Self::Dart,
        Self::Lua,
        Self::Shell,
        Self::Clojure,
        Self::Haskell,
        Self::Crystal,
        Self::R,
        Self::Julia,
        Self::Zig,
    ];

    #[must_use]
    pub const fn spec(self) -> LanguageSpec {
        const fn row(
            id: &'static str,
            name: &'static str,
            comment_prefix: &'static str,
            extension: &'static str,
            test_patterns: &'static [&'static str],
        ) -> LanguageSpec {
            LanguageSpec {
                id,
                name,
                comment_prefix,
                extension,
                test_patterns,
            }
        }

        match self {
            Self::TypeScript => row("typescript", "TypeScript", "//", "ts", &[".test.ts", ".spec.ts", "__tests__/"]),
            Self::JavaScript => row("javascript", "JavaScript", "//", "js", &[".test.js", ".spec.js", "__tests__/"]),
            Self::Python => row("python", "Python", "#", "py", &["test_", "_test.py", "tests/"]),
            Self::Ruby => row("ruby", "Ruby", "#", "rb", &["_test.rb", "_spec.rb", "test/", "spec/"]),
            Self::Go => row("go", "Go", "//", "go", &["_test.go"]),
            Self::Rust => row("rust", "Rust", "//", "rs", &["_test.rs", "tests/"]),
            Self::Php => row("php", "PHP", "//", "php", &["Test.php", "_test.php", "tests/"]),
            Self::Java => row("java", "Java", "//", "java", &["Test.java", "test/"]),
            Self::CSharp => row("csharp", "C#", "//", "cs", &["Tests.cs", "Test.cs", "test/"]),
            Self::Swift => row("swift", "Swift", "//", "swift", &["Tests.swift", "Test.swift"]),
            Self::Kotlin => row("kotlin", "Kotlin", "//", "kt", &["Test.kt", "test/"]),
            Self::Scala => row("scala", "Scala", "//", "scala", &["Spec.scala", "Test.scala"]),
            Self::Elixir => row("elixir", "Elixir", "#", "ex", &["_test.exs", "test/"]),
            Self::Dart => row("dart", "Dart", "//", "dart", &["_test.dart", "test/"]),
            Self::Lua => row("lua", "Lua", "--", "lua", &["_test.lua", "_spec.lua", "test/", "spec/"]),
            Self::Shell => row("shell", "Shell", "#", "sh", &["_test.sh", "test/"]),
            Self::Clojure => row("clojure", "Clojure", ";", "clj", &["_test.clj", "test/"]),
            Self::Haskell => row("haskell", "Haskell", "--", "hs", &["Spec.hs", "Test.hs", "test/"]),
            Self::Crystal => row("crystal", "Crystal", "#", "cr", &["_spec.cr", "spec/"]),
            Self::R => row("r", "R", "#", "R", &["test_", "test-", "tests/"]),
            Self::Julia => row("julia", "Julia", "#", "jl", &["_test.jl", "test/"]),
            Self::Zig => row("zig", "Zig", "//", "zig", &["_test.zig", "test/"]),
        }
    }

    #[must_use]
    pub const fn comment_prefix(self) -> &'static str {
        self.spec().comment_prefix
    }

    #[must_use]
    pub fn task_suffix(self) -> String {
        format!(".vibe.{}", self.spec().extension)
    }

    #[must_use]
    pub fn human_suffix(self) -> String {
        format!(".human.{}", self.spec().extension)
    }

    #[must_use]
    pub fn lock_suffix(self) -> String {
        format!(".lock.{}", self.spec().extension)
    }

    /// Language whose governed suffix (`.vibe`, `.human`, `.lock`) ends `path`.
    #[must_use]
    pub fn detect(path: &str) -> Option<Self> {
        let path = path.replace('\\', "/");
        Self::ALL.into_iter().find(|lang| {
            path.ends_with(&lang.task_suffix())
                || path.ends_with(&lang.human_suffix())
                || path.ends_with(&lang.lock_suffix())
        })
    }

    /// [`Language::detect`], falling back to the plain source extension.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::detect(path).or_else(|| {
            let path = path.replace('\\', "/");
            Self::ALL
                .into_iter()
                .find(|lang| path.ends_with(&format!(".{}", lang.spec().extension)))
        })
    }
}

#[must_use]
pub fn comment_prefix_for(path: Option<&str>) -> &'static str {
    path.and_then(Language::from_path)
        .map_or(DEFAULT_COMMENT_PREFIX, Language::comment_prefix)
}

#[must_use]
pub fn is_task_file(path: &str) -> bool {
    let path = path.replace('\\', "/");
    Language::ALL
        .into_iter()
        .any(|lang| path.ends_with(&lang.task_suffix()))
}

/// Test naming conventions of the file's language, or of every language when
/// the file carries no governed suffix.
#[must_use]
pub fn is_test_file(path: &str) -> bool {
    let path = path.replace('\\', "/");
    match Language::detect(&path) {
        Some(lang) => lang
            .spec()
            .test_patterns
            .iter()
            .any(|pattern| path.contains(pattern)),
        None => Language::ALL.into_iter().any(|lang| {
            lang.spec()
                .test_patterns
                .iter()
                .any(|pattern| path.contains(pattern))
        }),
    }
}
