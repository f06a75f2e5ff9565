//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Repository fetch constants
pub mod fetch {
    /// File extensions eligible for analysis
    pub const SUPPORTED_EXTENSIONS: &[&str] =
        &["js", "jsx", "ts", "tsx", "py", "java", "go", "rs", "rb"];

    /// Path substrings that exclude a file from fetching
    pub const EXCLUDE_PATTERNS: &[&str] = &[
        "node_modules",
        "dist",
        "build",
        ".git",
        "coverage",
        "__pycache__",
        ".next",
        ".vercel",
    ];

    /// Maximum number of files fetched per repository
    pub const MAX_FILES: usize = 500;

    /// Per-blob size ceiling in bytes (1 MiB)
    pub const MAX_FILE_SIZE: u64 = 1_048_576;
}

/// Structural analysis constants
pub mod analysis {
    /// Maximum lines captured in a function source excerpt
    pub const EXCERPT_MAX_LINES: usize = 20;
}

/// Generation protocol constants
pub mod generation {
    /// Maximum attempts for the long-form README call
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Fixed backoff between attempts (seconds)
    pub const RETRY_BACKOFF_SECS: u64 = 2;

    /// Stream inactivity window: an attempt fails if no chunk arrives
    /// within this many seconds
    pub const STREAM_IDLE_TIMEOUT_SECS: u64 = 30;

    /// Minimum accepted length of generated text before an attempt
    /// counts as successful
    pub const MIN_VIABLE_CHARS: usize = 300;

    /// Existing README excerpt embedded in the README prompt
    pub const README_EXCERPT_CHARS: usize = 1200;

    /// Existing README excerpt embedded in secondary prompts
    pub const SHORT_README_EXCERPT_CHARS: usize = 1000;

    /// Manifest file excerpt in the README prompt
    pub const MANIFEST_EXCERPT_CHARS: usize = 400;

    /// Manifest file excerpt in the install prompt
    pub const INSTALL_MANIFEST_EXCERPT_CHARS: usize = 500;

    /// Entry-point file excerpt in the usage prompt
    pub const ENTRY_EXCERPT_CHARS: usize = 300;

    /// Code excerpt for per-symbol summaries
    pub const SUMMARY_CODE_CHARS: usize = 1500;

    /// Number of file paths listed in the README prompt
    pub const FILE_LIST_LIMIT: usize = 10;

    /// Manifest filenames excerpted in the README prompt
    pub const README_MANIFEST_FILES: &[&str] = &[
        "package.json",
        "requirements.txt",
        "setup.py",
        "pyproject.toml",
    ];

    /// Manifest filenames considered for install instructions
    pub const MANIFEST_FILES: &[&str] = &[
        "package.json",
        "requirements.txt",
        "setup.py",
        "Cargo.toml",
        "go.mod",
        "pom.xml",
        "build.gradle",
        "Gemfile",
        "composer.json",
        "pyproject.toml",
    ];
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout for non-streaming calls (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 30;
}
