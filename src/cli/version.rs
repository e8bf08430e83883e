//! Version and usage text.

/// The current version of multiq, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const USAGE: &str = "\
Usage: multiq [OPTIONS] [QUESTION ...]

Ask several questions at once and stream the answers.
With no QUESTION arguments, questions are read from stdin, one per line.

Options:
      --summarize   Print a short answer after each finished answer
      --chat N      Open a follow-up chat about answer N (type /exit to leave)
  -V, --version     Print version
  -h, --help        Print this help

Environment:
  MULTIQ_BACKEND_URL   Backend base URL (default http://localhost:5000)
  MULTIQ_TIMEOUT_SECS  Request timeout in seconds (default 120)
  RUST_LOG             Log filter (default multiq=info)";

pub fn version_line() -> String {
    format!("multiq {}", VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_format() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
        assert!(version_line().starts_with("multiq "));
    }

    #[test]
    fn test_usage_mentions_every_option() {
        for flag in ["--summarize", "--chat", "--version", "--help"] {
            assert!(USAGE.contains(flag), "missing {}", flag);
        }
    }
}
