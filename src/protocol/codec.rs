use std::io;

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Newline-delimited text framing.
///
/// Each decoded item is one line with its `\n` (and a trailing `\r`, if
/// any) removed. Bytes after the last newline stay in the buffer until
/// more data arrives, so a line may span any number of reads and one read
/// may carry any number of lines. There is no length limit.
///
/// Invalid UTF-8 is replaced, not treated as a stream error.
#[derive(Debug, Clone, Default)]
pub struct LineCodec {
    /// Bytes of the buffer already scanned without finding a newline.
    next_index: usize,
}

impl LineCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `data` to `buf` and iterate over every line it completes.
    pub fn feed<'a>(&'a mut self, buf: &'a mut BytesMut, data: &[u8]) -> Lines<'a> {
        buf.extend_from_slice(data);
        Lines { codec: self, buf }
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, io::Error> {
        let Some(offset) = buf[self.next_index..].iter().position(|b| *b == b'\n') else {
            self.next_index = buf.len();
            return Ok(None);
        };

        let newline = self.next_index + offset;
        self.next_index = 0;

        let mut line = buf.split_to(newline);
        buf.advance(1);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, io::Error> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }
        // Peer went away mid-line; the fragment is never dispatched.
        if !buf.is_empty() {
            tracing::trace!(bytes = buf.len(), "Discarding unterminated line at EOF");
            buf.clear();
        }
        self.next_index = 0;
        Ok(None)
    }
}

impl<T> Encoder<T> for LineCodec
where
    T: AsRef<str>,
{
    type Error = io::Error;

    fn encode(&mut self, line: T, buf: &mut BytesMut) -> Result<(), io::Error> {
        let line = line.as_ref();
        buf.reserve(line.len() + 1);
        buf.put_slice(line.as_bytes());
        buf.put_u8(b'\n');
        Ok(())
    }
}

/// Lines completed by one [`LineCodec::feed`] call.
pub struct Lines<'a> {
    codec: &'a mut LineCodec,
    buf: &'a mut BytesMut,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.codec.decode(self.buf).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_line_waits_for_more_bytes() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        assert_eq!(codec.feed(&mut buf, b"JO").count(), 0);
        let lines: Vec<_> = codec.feed(&mut buf, b"B hello\n").collect();
        assert_eq!(lines, vec!["JOB hello"]);
        assert!(buf.is_empty());
    }

    #[test]
    fn pipelined_lines_come_out_in_order() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        let lines: Vec<_> = codec.feed(&mut buf, b"FETCH\nFETCH\nDONE").collect();
        assert_eq!(lines, vec!["FETCH", "FETCH"]);
        assert_eq!(&buf[..], b"DONE");

        let lines: Vec<_> = codec.feed(&mut buf, b" 1\n").collect();
        assert_eq!(lines, vec!["DONE 1"]);
    }

    #[test]
    fn strips_carriage_return() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"STATUS 1\r\n\r\n"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("STATUS 1"));
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some(""));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn carriage_return_split_from_newline() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        assert_eq!(codec.feed(&mut buf, b"FETCH\r").count(), 0);
        let lines: Vec<_> = codec.feed(&mut buf, b"\n").collect();
        assert_eq!(lines, vec!["FETCH"]);
    }

    #[test]
    fn long_line_across_many_reads() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        let word = "abcdefgh ".repeat(4096);

        assert_eq!(codec.feed(&mut buf, b"JOB ").count(), 0);
        for chunk in word.as_bytes().chunks(1000) {
            assert_eq!(codec.feed(&mut buf, chunk).count(), 0);
        }
        let lines: Vec<_> = codec.feed(&mut buf, b"\n").collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], format!("JOB {word}"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"JOB \xff\xfe\n"[..]);
        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert!(line.starts_with("JOB "));
        assert!(line.contains('\u{FFFD}'));
    }

    #[test]
    fn eof_discards_fragment() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"FETCH\nJOB half"[..]);
        assert_eq!(codec.decode_eof(&mut buf).unwrap().as_deref(), Some("FETCH"));
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
        assert!(buf.is_empty());
    }

    #[test]
    fn encode_appends_newline() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        codec.encode("ID 1", &mut buf).unwrap();
        codec.encode(String::from("NOJOB"), &mut buf).unwrap();
        assert_eq!(&buf[..], b"ID 1\nNOJOB\n");
    }
}
