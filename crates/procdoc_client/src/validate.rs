use std::fmt;
use std::path::{Path, PathBuf};

/// Per-file size cap, matching the server's request limit.
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;
pub const TRANSCRIPTION_EXTENSIONS: &[&str] = &["txt", "vtt"];
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    pub provider: String,
    pub model: String,
    pub agent_type: String,
    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
            agent_type: "rpa_general".to_string(),
            api_key: None,
        }
    }
}

/// Everything needed for one `POST /upload`.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub transcription: Option<PathBuf>,
    pub screenshots: Vec<PathBuf>,
    /// Skip screenshots entirely and document from the transcription alone.
    pub transcription_only: bool,
    pub ai: AiConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadIssue {
    /// Transcription-only mode without a transcription file.
    MissingTranscription,
    /// Neither a transcription nor any screenshot was supplied.
    NoFiles,
    UnsupportedExtension {
        path: PathBuf,
        allowed: &'static [&'static str],
    },
    FileTooLarge {
        path: PathBuf,
        max_bytes: u64,
        actual: u64,
    },
    Unreadable {
        path: PathBuf,
        message: String,
    },
}

impl fmt::Display for UploadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadIssue::MissingTranscription => {
                write!(f, "transcription-only mode requires a transcription file")
            }
            UploadIssue::NoFiles => write!(f, "no files to upload"),
            UploadIssue::UnsupportedExtension { path, allowed } => {
                write!(
                    f,
                    "{} has an unsupported extension (allowed: {})",
                    path.display(),
                    allowed.join(", ")
                )
            }
            UploadIssue::FileTooLarge {
                path,
                max_bytes,
                actual,
            } => write!(
                f,
                "{} is too large ({actual} bytes, max {max_bytes})",
                path.display()
            ),
            UploadIssue::Unreadable { path, message } => {
                write!(f, "{} is unreadable: {message}", path.display())
            }
        }
    }
}

/// Mirror of the server's upload rules, so a doomed upload fails fast on
/// the client. Empty result means the request is worth sending.
pub fn validate_upload(request: &UploadRequest) -> Vec<UploadIssue> {
    let mut issues = Vec::new();

    if let Some(path) = &request.transcription {
        check_file(path, TRANSCRIPTION_EXTENSIONS, &mut issues);
    }
    for path in &request.screenshots {
        check_file(path, IMAGE_EXTENSIONS, &mut issues);
    }

    if request.transcription_only {
        if request.transcription.is_none() {
            issues.push(UploadIssue::MissingTranscription);
        }
    } else if request.transcription.is_none() && request.screenshots.is_empty() {
        issues.push(UploadIssue::NoFiles);
    }

    issues
}

fn check_file(path: &Path, allowed: &'static [&'static str], issues: &mut Vec<UploadIssue>) {
    let extension_ok = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false);
    if !extension_ok {
        issues.push(UploadIssue::UnsupportedExtension {
            path: path.to_path_buf(),
            allowed,
        });
        return;
    }

    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_UPLOAD_BYTES => issues.push(UploadIssue::FileTooLarge {
            path: path.to_path_buf(),
            max_bytes: MAX_UPLOAD_BYTES,
            actual: meta.len(),
        }),
        Ok(_) => {}
        Err(err) => issues.push(UploadIssue::Unreadable {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{validate_upload, UploadIssue, UploadRequest, IMAGE_EXTENSIONS};

    fn temp_file(suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(b"content").expect("write");
        file
    }

    #[test]
    fn accepts_a_plain_transcription_upload() {
        let transcription = temp_file(".txt");
        let request = UploadRequest {
            transcription: Some(transcription.path().to_path_buf()),
            ..UploadRequest::default()
        };
        assert!(validate_upload(&request).is_empty());
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let screenshot = temp_file(".PNG");
        let request = UploadRequest {
            screenshots: vec![screenshot.path().to_path_buf()],
            ..UploadRequest::default()
        };
        assert!(validate_upload(&request).is_empty());
    }

    #[test]
    fn rejects_unsupported_screenshot_extension() {
        let screenshot = temp_file(".gif");
        let request = UploadRequest {
            screenshots: vec![screenshot.path().to_path_buf()],
            ..UploadRequest::default()
        };
        let issues = validate_upload(&request);
        assert_eq!(
            issues,
            vec![UploadIssue::UnsupportedExtension {
                path: screenshot.path().to_path_buf(),
                allowed: IMAGE_EXTENSIONS,
            }]
        );
    }

    #[test]
    fn transcription_only_requires_a_transcription() {
        let request = UploadRequest {
            transcription_only: true,
            ..UploadRequest::default()
        };
        assert_eq!(
            validate_upload(&request),
            vec![UploadIssue::MissingTranscription]
        );
    }

    #[test]
    fn rejects_an_empty_request() {
        let request = UploadRequest::default();
        assert_eq!(validate_upload(&request), vec![UploadIssue::NoFiles]);
    }

    #[test]
    fn missing_file_reports_unreadable() {
        let request = UploadRequest {
            transcription: Some("/nonexistent/notes.txt".into()),
            ..UploadRequest::default()
        };
        let issues = validate_upload(&request);
        assert_eq!(issues.len(), 1);
        assert!(matches!(issues[0], UploadIssue::Unreadable { .. }));
    }
}
