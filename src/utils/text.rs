//! Text/binary sniffing

/// Number of leading bytes inspected by [`SniffClassifier`].
const SNIFF_LEN: usize = 1024;

/// Decides whether a byte sample is human-readable text.
pub trait TextClassifier {
    fn is_text(&self, sample: &[u8]) -> bool;
}

impl<F> TextClassifier for F
where
    F: Fn(&[u8]) -> bool,
{
    fn is_text(&self, sample: &[u8]) -> bool {
        self(sample)
    }
}

/// Default classifier: the first KiB must be UTF-8 without control characters.
///
/// Tab, newline, carriage return and form feed are allowed. A multi-byte
/// sequence cut off at the end of the sample is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SniffClassifier;

impl TextClassifier for SniffClassifier {
    fn is_text(&self, sample: &[u8]) -> bool {
        let sample = &sample[..sample.len().min(SNIFF_LEN)];
        let text = match std::str::from_utf8(sample) {
            Ok(text) => text,
            Err(err) if err.error_len().is_none() => {
                std::str::from_utf8(&sample[..err.valid_up_to()]).unwrap_or_default()
            }
            Err(_) => return false,
        };
        text.chars().all(|c| c >= ' ' || matches!(c, '\n' | '\t' | '\r' | '\x0c'))
    }
}
