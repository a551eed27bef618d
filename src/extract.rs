use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SourceFormat {
    Text,
    Markdown,
    Pdf,
    Docx,
}

impl SourceFormat {
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "txt" => Ok(Self::Text),
            "md" => Ok(Self::Markdown),
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(ExtractError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Markdown => "md",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported document format '.{extension}': {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error(
        "{format} extraction is not available in this build; rebuild with `--features {feature}`"
    )]
    MissingCapability {
        format: &'static str,
        feature: &'static str,
    },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to extract text from {}: {message}", .path.display())]
    Corrupt { path: PathBuf, message: String },
}

pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let format = SourceFormat::from_path(path)?;
    debug!(path = %path.display(), format = format.as_str(), "extracting text");

    match format {
        SourceFormat::Text | SourceFormat::Markdown => read_utf8(path),
        SourceFormat::Pdf => extract_pdf(path),
        SourceFormat::Docx => extract_docx(path),
    }
}

fn read_utf8(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|error| ExtractError::Corrupt {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}

#[cfg(feature = "pdf")]
fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }

    let text = pdf_extract::extract_text(path).map_err(|error| ExtractError::Corrupt {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;

    // Form feeds separate pages.
    let pages = text
        .split('\u{c}')
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect::<Vec<&str>>();
    Ok(pages.join("\n\n"))
}

#[cfg(not(feature = "pdf"))]
fn extract_pdf(_path: &Path) -> Result<String, ExtractError> {
    Err(ExtractError::MissingCapability {
        format: "PDF",
        feature: "pdf",
    })
}

#[cfg(feature = "docx")]
fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    use std::io::Read;

    let corrupt = |message: String| ExtractError::Corrupt {
        path: path.to_path_buf(),
        message,
    };

    let file = fs::File::open(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|error| corrupt(error.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|error| corrupt(error.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|error| corrupt(error.to_string()))?;

    let paragraphs = docx_paragraphs(&xml).map_err(|error| corrupt(error.to_string()))?;
    Ok(paragraphs.join("\n\n"))
}

#[cfg(not(feature = "docx"))]
fn extract_docx(_path: &Path) -> Result<String, ExtractError> {
    Err(ExtractError::MissingCapability {
        format: "DOCX",
        feature: "docx",
    })
}

/// Text of every `w:p`, with its runs concatenated.
#[cfg(feature = "docx")]
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, roxmltree::Error> {
    const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

    let document = roxmltree::Document::parse(xml)?;
    let paragraphs = document
        .descendants()
        .filter(|node| node.has_tag_name((W_NS, "p")))
        .map(|paragraph| {
            paragraph
                .descendants()
                .filter_map(|node| {
                    if node.has_tag_name((W_NS, "t")) {
                        node.text()
                    } else if node.has_tag_name((W_NS, "tab")) {
                        Some("\t")
                    } else {
                        None
                    }
                })
                .collect::<String>()
        })
        .collect();

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn format_is_chosen_by_lowercased_extension() {
        assert_eq!(
            SourceFormat::from_path(Path::new("notes.TXT")).unwrap(),
            SourceFormat::Text
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("a/b/readme.md")).unwrap(),
            SourceFormat::Markdown
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("brochure.Docx")).unwrap(),
            SourceFormat::Docx
        );
    }

    #[test]
    fn unknown_extensions_are_unsupported() {
        let error = extract_text(Path::new("slides.pptx")).unwrap_err();
        assert!(matches!(
            error,
            ExtractError::UnsupportedFormat { ref extension, .. } if extension == "pptx"
        ));

        let error = SourceFormat::from_path(Path::new("Makefile")).unwrap_err();
        assert!(matches!(error, ExtractError::UnsupportedFormat { .. }));
    }

    #[test]
    fn text_and_markdown_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "# Titre\n\nCorps du texte.").unwrap();

        assert_eq!(extract_text(&path).unwrap(), "# Titre\n\nCorps du texte.");
    }

    #[test]
    fn invalid_utf8_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(
            extract_text(&path).unwrap_err(),
            ExtractError::Corrupt { .. }
        ));
    }

    #[test]
    fn missing_files_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let error = extract_text(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(error, ExtractError::Io { .. }));
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn pdf_without_feature_is_a_missing_capability() {
        let error = extract_text(Path::new("rapport.pdf")).unwrap_err();
        assert!(matches!(
            error,
            ExtractError::MissingCapability { feature: "pdf", .. }
        ));
    }

    #[cfg(feature = "docx")]
    #[test]
    fn docx_paragraph_runs_are_joined() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Notre </w:t></w:r><w:r><w:t>Histoire:</w:t></w:r></w:p>
    <w:p><w:r><w:t>Fondée en 1990.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let paragraphs = docx_paragraphs(xml).unwrap();
        assert_eq!(paragraphs, vec!["Notre Histoire:", "Fondée en 1990."]);
    }

    #[cfg(feature = "docx")]
    #[test]
    fn docx_archives_are_read_from_disk() {
        use zip::write::SimpleFileOptions;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.docx");
        let file = fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file(
                "word/document.xml",
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored),
            )
            .unwrap();
        writer
            .write_all(
                br#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Contact:</w:t></w:r></w:p><w:p><w:r><w:t>Appelez-nous.</w:t></w:r></w:p></w:body></w:document>"#,
            )
            .unwrap();
        writer.finish().unwrap();

        assert_eq!(extract_text(&path).unwrap(), "Contact:\n\nAppelez-nous.");
    }
}
