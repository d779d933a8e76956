//! Line codec for mailbox records.
//!
//! ```text
//! +---------+---+-------+---+-------------------+----+
//! | state   | ; | seq   | ; | payload           | \n |
//! | -1/0/1  |   | u64   |   | rest of the line  |    |
//! +---------+---+-------+---+-------------------+----+
//! ```

use filebox_core::{Record, RecordState};

use crate::FIELD_DELIMITER;
use crate::error::{MailboxError, MailboxResult, ParseError};

/// Encodes a record as a complete mailbox line, trailing newline included.
///
/// ```rust
/// use filebox_core::Record;
/// use filebox_protocol::encode_record;
///
/// assert_eq!(encode_record(&Record::request(3, "ping")), "1;3;ping\n");
/// ```
pub fn encode_record(record: &Record) -> String {
    format!(
        "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}\n",
        record.state.code(),
        record.seq,
        record.payload
    )
}

/// Decodes one line into a record.
///
/// The line is trimmed, then split at most twice on `;` so the payload keeps
/// any further delimiters.
pub fn decode_line(line: &str) -> Result<Record, ParseError> {
    let line = line.trim();

    let (state, rest) = line
        .split_once(FIELD_DELIMITER)
        .ok_or(ParseError::BadFormat)?;
    let (seq, payload) = rest
        .split_once(FIELD_DELIMITER)
        .ok_or(ParseError::BadFormat)?;

    let state = state
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(RecordState::from_code)
        .ok_or(ParseError::BadState)?;
    let seq = seq.trim().parse().map_err(|_| ParseError::BadSeq)?;

    Ok(Record::new(state, seq, payload))
}

/// Decodes raw file content: only the first line is considered.
pub fn decode_contents(data: &[u8]) -> MailboxResult<Record> {
    if data.is_empty() {
        return Err(MailboxError::EmptyFile);
    }

    let text = std::str::from_utf8(data).map_err(|_| ParseError::InvalidUtf8)?;
    let first_line = text.lines().next().unwrap_or_default();
    Ok(decode_line(first_line)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn encode_sentinel() {
        assert_snapshot!(encode_record(&Record::sentinel()).trim_end(), @"0;0;");
    }

    #[test]
    fn encode_error_record() {
        let line = encode_record(&Record::error(0, "invalid_state:bad seq"));
        assert!(line.ends_with('\n'));
        assert_snapshot!(line.trim_end(), @"-1;0;invalid_state:bad seq");
    }

    #[test]
    fn decode_keeps_delimiters_in_payload() {
        let record = decode_line("1;7;a;b;c").unwrap();
        assert_eq!(record, Record::request(7, "a;b;c"));
    }

    #[test]
    fn decode_trims_fields() {
        let record = decode_line("  0 ; 12 ;pong  \n").unwrap();
        assert_eq!(record, Record::response(12, "pong"));
    }

    #[test]
    fn decode_empty_payload() {
        assert_eq!(decode_line("0;0;").unwrap(), Record::sentinel());
    }

    #[test]
    fn decode_rejects_missing_fields() {
        assert_eq!(decode_line("garbage"), Err(ParseError::BadFormat));
        assert_eq!(decode_line("1;2"), Err(ParseError::BadFormat));
        assert_eq!(decode_line(""), Err(ParseError::BadFormat));
    }

    #[test]
    fn decode_rejects_unknown_state() {
        assert_eq!(decode_line("2;1;ping"), Err(ParseError::BadState));
        assert_eq!(decode_line("x;1;ping"), Err(ParseError::BadState));
    }

    #[test]
    fn decode_rejects_bad_seq() {
        assert_eq!(decode_line("1;one;ping"), Err(ParseError::BadSeq));
        assert_eq!(decode_line("1;-4;ping"), Err(ParseError::BadSeq));
    }

    #[test]
    fn decode_contents_uses_first_line() {
        let record = decode_contents(b"0;3;pong\n1;4;ping\n").unwrap();
        assert_eq!(record, Record::response(3, "pong"));
    }

    #[test]
    fn decode_contents_empty() {
        assert!(matches!(decode_contents(b""), Err(MailboxError::EmptyFile)));
    }

    #[test]
    fn decode_contents_blank_line_is_bad_format() {
        assert!(matches!(
            decode_contents(b"\n"),
            Err(MailboxError::Malformed(ParseError::BadFormat))
        ));
    }

    #[test]
    fn decode_contents_rejects_non_utf8() {
        assert!(matches!(
            decode_contents(&[0xff, 0xfe, b';']),
            Err(MailboxError::Malformed(ParseError::InvalidUtf8))
        ));
    }
}
