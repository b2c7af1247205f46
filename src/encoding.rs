//! Filename and content encoding detection.
//!
//! Voicebank archives are routinely produced on Japanese Windows systems and store
//! entry names in Shift_JIS (or another legacy code page) without flagging it.
//! All names of one archive are fed to `chardetng` together so that a single
//! encoding is chosen for the whole archive.

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, BIG5, EUC_KR, GBK, SHIFT_JIS, UTF_8};
use std::borrow::Cow;
use tracing::{debug, warn};

use crate::error::{ImportError, ImportResult};

/// Best guess for the encoding of an archive's entry names.
#[derive(Debug, Clone, Copy)]
pub struct Detection {
    pub encoding: &'static Encoding,
    /// `false` when the classifier had little signal to go on
    pub confident: bool,
}

impl Detection {
    /// Decodes an entry name strictly; `None` if the bytes are invalid in this encoding.
    pub fn decode_name<'a>(&self, raw: &'a [u8]) -> Option<Cow<'a, str>> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(raw)
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }
}

/// Multi-byte encodings tried, in order, when the classifier settles on a
/// single-byte code page. Shift_JIS first: most voicebanks are Japanese.
pub const CJK_FALLBACKS: &[&Encoding] = &[SHIFT_JIS, GBK, BIG5, EUC_KR];

/// Guesses one encoding for every name in `names`.
///
/// Archives whose names are all ASCII are reported as UTF-8. Short kana names
/// give `chardetng` too little signal and it tends to pick a Latin code page,
/// which decodes any byte string into mojibake. When that happens and the names
/// also decode strictly in one of `CJK_FALLBACKS`, that encoding wins.
/// Fails if no candidate decodes every name.
pub fn detect<N: AsRef<[u8]>>(names: &[N]) -> ImportResult<Detection> {
    if names.iter().all(|n| n.as_ref().is_ascii()) {
        debug!(names = names.len(), "All entry names are ASCII");
        verify(names, UTF_8)?;
        return Ok(Detection {
            encoding: UTF_8,
            confident: true,
        });
    }

    let mut detector = EncodingDetector::new();
    for name in names {
        detector.feed(name.as_ref(), false);
    }
    detector.feed(&[], true);
    let (guess, confident) = detector.guess_assess(None, true);

    debug!(
        encoding = guess.name(),
        confident = confident,
        "Classifier guess for entry names"
    );

    if !guess.is_single_byte() && verify(names, guess).is_ok() {
        return Ok(Detection {
            encoding: guess,
            confident,
        });
    }

    if let Some(&fallback) = CJK_FALLBACKS
        .iter()
        .find(|&&candidate| candidate != guess && verify(names, candidate).is_ok())
    {
        debug!(
            guess = guess.name(),
            encoding = fallback.name(),
            "Names decode as multi-byte text, overriding classifier"
        );
        return Ok(Detection {
            encoding: fallback,
            confident: false,
        });
    }

    verify(names, guess).map(|()| Detection {
        encoding: guess,
        confident,
    })
}

/// Checks that `encoding` decodes every name without replacement characters and
/// that no decoded name contains control characters.
pub fn verify<N: AsRef<[u8]>>(names: &[N], encoding: &'static Encoding) -> ImportResult<()> {
    for name in names {
        let raw = name.as_ref();
        let decoded = encoding.decode_without_bom_handling_and_without_replacement(raw);
        match decoded {
            Some(text) if !text.chars().any(char::is_control) => {}
            _ => {
                return Err(ImportError::Detection(format!(
                    "entry name {:?} is not valid {}",
                    String::from_utf8_lossy(raw),
                    encoding.name()
                )))
            }
        }
    }
    Ok(())
}

/// Resolves a user-supplied encoding label such as `shift_jis` or `gbk`.
pub fn encoding_for_label(label: &str) -> ImportResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ImportError::Configuration(format!("unknown encoding label: {}", label)))
}

/// Decodes control-file contents. A BOM, if present, overrides `encoding`.
pub fn decode_text<'a>(bytes: &'a [u8], encoding: &'static Encoding, origin: &str) -> Cow<'a, str> {
    let (decoded, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(
            file = origin,
            encoding = used.name(),
            "Decoding errors occurred; malformed bytes were replaced"
        );
    }
    decoded
}
