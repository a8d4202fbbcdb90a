//! Local image embedding.
//!
//! Images referenced by a local path are read, typed by content and turned
//! into `data:` URIs so the article carries them inline. Anything that is not
//! a readable local file keeps its original source.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use percent_encoding::percent_decode_str;

use crate::util::is_remote;

/// How many leading bytes are inspected when looking for an SVG root element.
const SVG_SNIFF_LEN: usize = 1024;

/// Failure to embed a local image.
///
/// Never escapes the renderer: the image keeps its original source instead.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The file exists but could not be read.
    #[error("failed to read image {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The content type could not be determined from the file's bytes.
    #[error("unrecognized content type for image {}", .0.display())]
    UnknownType(PathBuf),
}

/// Content-based MIME type detection.
pub trait MimeSniffer {
    /// Best-guess MIME type for `bytes`, or `None` when the content is not
    /// recognized.
    fn sniff(&self, bytes: &[u8]) -> Option<String>;
}

/// Magic-byte [`MimeSniffer`] covering common web image formats.
#[derive(Clone, Copy, Debug, Default)]
pub struct MagicSniffer;

impl MimeSniffer for MagicSniffer {
    fn sniff(&self, bytes: &[u8]) -> Option<String> {
        sniff_signature(bytes)
            .or_else(|| sniff_iso_media(bytes))
            .or_else(|| sniff_svg(bytes))
            .map(str::to_owned)
    }
}

fn sniff_signature(bytes: &[u8]) -> Option<&'static str> {
    const SIGNATURES: &[(&[u8], &str)] = &[
        (b"\x89PNG\r\n\x1a\n", "image/png"),
        (b"\xff\xd8\xff", "image/jpeg"),
        (b"GIF87a", "image/gif"),
        (b"GIF89a", "image/gif"),
        (b"II*\0", "image/tiff"),
        (b"MM\0*", "image/tiff"),
        (b"\0\0\x01\0", "image/vnd.microsoft.icon"),
        (b"%PDF-", "application/pdf"),
    ];

    if let Some((_, mime)) = SIGNATURES.iter().find(|(sig, _)| bytes.starts_with(sig)) {
        return Some(*mime);
    }
    if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    // BMP file header is 14 bytes; "BM" alone is too weak on short files.
    if bytes.len() >= 14 && bytes.starts_with(b"BM") {
        return Some("image/bmp");
    }
    None
}

/// AVIF and HEIF images are ISO base media files identified by their `ftyp` brand.
fn sniff_iso_media(bytes: &[u8]) -> Option<&'static str> {
    if bytes.len() < 12 || &bytes[4..8] != b"ftyp" {
        return None;
    }
    match &bytes[8..12] {
        b"avif" | b"avis" => Some("image/avif"),
        b"heic" | b"heix" | b"hevc" | b"hevx" => Some("image/heic"),
        b"mif1" | b"msf1" => Some("image/heif"),
        _ => None,
    }
}

fn sniff_svg(bytes: &[u8]) -> Option<&'static str> {
    let head = &bytes[..bytes.len().min(SVG_SNIFF_LEN)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();

    let is_svg = text.starts_with("<svg")
        || ((text.starts_with("<?xml") || text.starts_with("<!--") || text.starts_with("<!DOCTYPE"))
            && text.contains("<svg"));
    is_svg.then_some("image/svg+xml")
}

/// Turns local image sources into `data:` URIs.
///
/// Relative sources are looked up in the document's directory first (see
/// [`with_base_dir`](Self::with_base_dir)), then relative to the working
/// directory. Percent-encoded paths are tried decoded as well.
#[derive(Clone, Debug)]
pub struct AssetInliner<S = MagicSniffer> {
    sniffer: S,
    base_dir: Option<PathBuf>,
    enabled: bool,
}

impl AssetInliner<MagicSniffer> {
    /// Create an inliner using the magic-byte sniffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_sniffer(MagicSniffer)
    }
}

impl Default for AssetInliner<MagicSniffer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MimeSniffer> AssetInliner<S> {
    /// Create an inliner with a custom MIME sniffer.
    #[must_use]
    pub fn with_sniffer(sniffer: S) -> Self {
        Self {
            sniffer,
            base_dir: None,
            enabled: true,
        }
    }

    /// Set the directory relative image paths are resolved against.
    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Enable or disable embedding. Disabled inliners pass every source through.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Find the local file an image source refers to.
    ///
    /// Returns `None` for remote sources, `data:` URIs and paths that do not
    /// name an existing file.
    #[must_use]
    pub fn locate(&self, src: &str) -> Option<PathBuf> {
        if !self.enabled || src.is_empty() || is_remote(src) {
            return None;
        }

        let raw = src.strip_prefix("file://").unwrap_or(src);
        let decoded = percent_decode_str(raw).decode_utf8().ok();

        let mut names = vec![raw];
        if let Some(decoded) = decoded.as_deref()
            && decoded != raw
        {
            names.push(decoded);
        }

        names.into_iter().find_map(|name| self.find_file(Path::new(name)))
    }

    fn find_file(&self, path: &Path) -> Option<PathBuf> {
        if path.is_relative()
            && let Some(base) = &self.base_dir
        {
            let candidate = base.join(path);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        path.is_file().then(|| path.to_path_buf())
    }

    /// Read a file and encode it as a `data:` URI.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Read`] if the file cannot be read and
    /// [`AssetError::UnknownType`] if its content is not recognized.
    pub fn embed(&self, path: &Path) -> Result<String, AssetError> {
        let bytes = std::fs::read(path).map_err(|source| AssetError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mime = self
            .sniffer
            .sniff(&bytes)
            .ok_or_else(|| AssetError::UnknownType(path.to_path_buf()))?;
        Ok(format!("data:{mime};base64,{}", BASE64_STANDARD.encode(&bytes)))
    }

    /// Resolve an image source for output.
    ///
    /// Local files become `data:` URIs. Everything else, including files that
    /// fail to embed, is returned unchanged.
    #[must_use]
    pub fn resolve<'a>(&self, src: &'a str) -> Cow<'a, str> {
        let Some(path) = self.locate(src) else {
            return Cow::Borrowed(src);
        };
        match self.embed(&path) {
            Ok(uri) => {
                tracing::debug!(path = %path.display(), bytes = uri.len(), "Embedded image");
                Cow::Owned(uri)
            }
            Err(e) => {
                tracing::warn!(src, error = %e, "Keeping image source unchanged");
                Cow::Borrowed(src)
            }
        }
    }
}
