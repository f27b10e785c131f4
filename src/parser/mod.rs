pub mod articles;
pub mod flat;
pub mod text;

use std::borrow::Cow;
use std::fmt::Write as _;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::bytes::Regex;
use scraper::Html;
use tracing::debug;

/// How far into the body a `<meta charset>` declaration is looked for.
const META_SNIFF_LEN: usize = 1024;

static HEADER_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([A-Za-z0-9_:.\-]+)"#).unwrap());
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([A-Za-z0-9_:.\-]+)"#).unwrap()
});

/// Raw page as fetched. Only lives for the duration of one run.
#[derive(Debug, Clone)]
pub struct Document {
    url: String,
    bytes: Vec<u8>,
    content_type: Option<String>,
}

impl Document {
    pub fn new(url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Document {
            url: url.into(),
            bytes: bytes.into(),
            content_type: None,
        }
    }

    /// Attach the response `Content-Type`, whose charset drives decoding.
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encoding of the body: BOM, then the `Content-Type` charset, then a
    /// `<meta charset>` near the top, then UTF-8 if the bytes are valid,
    /// otherwise windows-1252.
    pub fn encoding(&self) -> &'static Encoding {
        if let Some((encoding, _)) = Encoding::for_bom(&self.bytes) {
            return encoding;
        }
        let declared = self
            .content_type
            .as_deref()
            .and_then(|ct| label_encoding(&HEADER_CHARSET_RE, ct.as_bytes()))
            .or_else(|| {
                let head = &self.bytes[..self.bytes.len().min(META_SNIFF_LEN)];
                label_encoding(&META_CHARSET_RE, head)
            });
        match declared {
            Some(encoding) => encoding,
            None if std::str::from_utf8(&self.bytes).is_ok() => UTF_8,
            None => WINDOWS_1252,
        }
    }

    /// Body decoded to text. Malformed sequences become U+FFFD.
    pub fn text(&self) -> Cow<'_, str> {
        let (text, used, had_errors) = self.encoding().decode(&self.bytes);
        debug!("Decoded {} as {}", self.url, used.name());
        if had_errors {
            debug!("{} contains bytes invalid for {}", self.url, used.name());
        }
        text
    }

    /// html5ever recovers from any malformed input, so this never fails.
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.text())
    }
}

fn label_encoding(re: &Regex, haystack: &[u8]) -> Option<&'static Encoding> {
    let label = re.captures(haystack)?.get(1)?.as_bytes();
    // UTF-16 labels in a byte-oriented declaration mean UTF-8 (WHATWG)
    Encoding::for_label(label).map(Encoding::output_encoding)
}

/// One normalized block of extracted text. `index` is the 1-based position
/// among matched articles; flat extraction leaves it unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionUnit {
    pub index: Option<usize>,
    pub text: String,
}

impl ExtractionUnit {
    pub fn indexed(index: usize, text: String) -> Self {
        ExtractionUnit {
            index: Some(index),
            text,
        }
    }

    pub fn unlabeled(text: String) -> Self {
        ExtractionUnit { index: None, text }
    }
}

/// Concatenate units in order. Indexed units get an `Articulo N:` header and
/// a trailing blank line; unlabeled units are separated by a blank line.
pub fn render_aggregate(units: &[ExtractionUnit]) -> String {
    let mut out = String::new();
    let mut prev_unlabeled = false;
    for unit in units {
        match unit.index {
            Some(index) => {
                let _ = write!(out, "Articulo {}:\n{}\n\n", index, unit.text);
                prev_unlabeled = false;
            }
            None => {
                if prev_unlabeled {
                    out.push_str("\n\n");
                }
                out.push_str(&unit.text);
                prev_unlabeled = true;
            }
        }
    }
    out
}

// ── Tests ──
