use encoding_rs::Encoding;
use shared_types::LedgerError;
use std::borrow::Cow;
use tracing::{debug, warn};

/// Decodes an uploaded ledger into UTF-8 text.
///
/// A byte order mark wins over `label`. Undecodable byte sequences become
/// U+FFFD rather than failing the upload.
pub fn decode_ledger<'a>(bytes: &'a [u8], label: &str) -> Result<Cow<'a, str>, LedgerError> {
    let (encoding, bom_length) = match Encoding::for_bom(bytes) {
        Some(found) => found,
        None => {
            let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
                LedgerError::Encoding(format!("Unknown encoding label: {}", label))
            })?;
            (encoding, 0)
        }
    };

    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
    if had_errors {
        warn!(
            encoding = encoding.name(),
            "Ledger contains byte sequences that are not valid in its encoding"
        );
    }

    debug!(encoding = encoding.name(), bytes = bytes.len(), "Decoded ledger");
    Ok(text)
}
