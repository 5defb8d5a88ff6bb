//! Where diagram text comes from.

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

/// Failure to obtain diagram text.
#[derive(Debug, thiserror::Error)]
pub enum DiagramSourceError {
    /// The file could not be read.
    #[error("failed to read diagram {}: {source}", .path.display())]
    Io {
        /// The file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A `file:` URL that does not denote a local path.
    #[error("file url could not be converted to a path: {url}")]
    InvalidFileUrl {
        /// The URL.
        url: String,
    },

    /// HTTP request failed.
    #[error("http GET {url}: {source}")]
    Http {
        /// The URL.
        url: String,
        /// Underlying client error.
        source: Box<ureq::Error>,
    },

    /// Reading the HTTP response body failed.
    #[error("failed to read response body from {url}: {source}")]
    Body {
        /// The URL.
        url: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// URL scheme other than `file`, `http` or `https`.
    #[error("unsupported url scheme `{scheme}` for {url}")]
    UnsupportedScheme {
        /// The scheme.
        scheme: String,
        /// The URL.
        url: String,
    },

    /// The content is not UTF-8.
    #[error("diagram {name} is not valid UTF-8")]
    NotUtf8 {
        /// Diagram name.
        name: String,
        /// Decoding error.
        source: std::string::FromUtf8Error,
    },
}

/// A diagram to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramSource {
    /// A local file.
    Path(PathBuf),
    /// A `file`, `http` or `https` URL.
    Url(Url),
    /// In-memory text.
    Text {
        /// Name used in descriptions and error messages.
        name: String,
        /// The diagram text.
        content: String,
    },
}

impl DiagramSource {
    /// A local file.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// A local file given as a string.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Self {
        Self::Path(PathBuf::from(file_name))
    }

    /// A URL.
    #[must_use]
    pub fn from_url(url: Url) -> Self {
        Self::Url(url)
    }

    /// In-memory text.
    #[must_use]
    pub fn from_text(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Text {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Returns the short name of the diagram: the file name, the last URL
    /// path segment, or the given name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Path(path) => file_name(path),
            Self::Url(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|s| !s.is_empty())
                .map_or_else(|| url.to_string(), ToString::to_string),
            Self::Text { name, .. } => name.clone(),
        }
    }

    /// Reads the diagram text.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or is not UTF-8.
    pub fn read(&self) -> Result<String, DiagramSourceError> {
        let bytes = match self {
            Self::Path(path) => read_file(path)?,
            Self::Url(url) => fetch_bytes(url)?,
            Self::Text { content, .. } => return Ok(content.clone()),
        };
        String::from_utf8(bytes).map_err(|source| DiagramSourceError::NotUtf8 {
            name: self.name(),
            source,
        })
    }
}

impl From<PathBuf> for DiagramSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for DiagramSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Url> for DiagramSource {
    fn from(url: Url) -> Self {
        Self::Url(url)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

fn read_file(path: &Path) -> Result<Vec<u8>, DiagramSourceError> {
    debug!("Reading diagram {}", path.display());
    std::fs::read(path).map_err(|source| DiagramSourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn fetch_bytes(url: &Url) -> Result<Vec<u8>, DiagramSourceError> {
    match url.scheme() {
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| DiagramSourceError::InvalidFileUrl {
                    url: url.to_string(),
                })?;
            read_file(&path)
        }
        "http" | "https" => {
            debug!("Fetching diagram {url}");
            let resp = ureq::get(url.as_str())
                .call()
                .map_err(|e| DiagramSourceError::Http {
                    url: url.to_string(),
                    source: Box::new(e),
                })?;
            let mut reader = resp.into_body().into_reader();
            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .map_err(|source| DiagramSourceError::Body {
                    url: url.to_string(),
                    source,
                })?;
            Ok(buf)
        }
        other => Err(DiagramSourceError::UnsupportedScheme {
            scheme: other.to_string(),
            url: url.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn names() {
        assert_eq!(DiagramSource::from_file_name("docs/arch.puml").name(), "arch.puml");
        assert_eq!(
            DiagramSource::from_url(Url::parse("https://example.com/d/arch.puml").unwrap()).name(),
            "arch.puml"
        );
        assert_eq!(DiagramSource::from_text("inline", "").name(), "inline");
    }

    #[test]
    fn reads_path_and_file_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[A] <<..a..>>").unwrap();

        let by_path = DiagramSource::from_path(file.path()).read().unwrap();
        let url = Url::from_file_path(file.path()).unwrap();
        let by_url = DiagramSource::from_url(url).read().unwrap();

        assert_eq!(by_path, "[A] <<..a..>>");
        assert_eq!(by_url, by_path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DiagramSource::from_path(dir.path().join("missing.puml"))
            .read()
            .unwrap_err();
        assert!(matches!(err, DiagramSourceError::Io { .. }));
    }

    #[test]
    fn unsupported_scheme() {
        let url = Url::parse("ftp://example.com/arch.puml").unwrap();
        let err = DiagramSource::from_url(url).read().unwrap_err();
        assert!(matches!(err, DiagramSourceError::UnsupportedScheme { ref scheme, .. } if scheme == "ftp"));
    }

    #[test]
    fn non_utf8_content() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        let err = DiagramSource::from_path(file.path()).read().unwrap_err();
        assert!(matches!(err, DiagramSourceError::NotUtf8 { .. }));
    }
}
