//! JSON-lines consumer for incoming diagnosis requests

use crate::error::RequestError;
use crate::features::PatientInput;
use std::io::BufRead;

/// Reads one [`PatientInput`] per line, skipping blank lines
pub struct RequestConsumer<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> RequestConsumer<R> {
    /// Create a new request consumer over a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// Number of lines read so far
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for RequestConsumer<R> {
    type Item = Result<PatientInput, RequestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(RequestError::Io(e))),
            }
            self.line += 1;

            let trimmed = self.buf.trim();
            if trimmed.is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str(trimmed).map_err(|source| RequestError::Malformed {
                    line: self.line,
                    source,
                }),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::disease::Disease;
    use std::io::Cursor;

    #[test]
    fn test_reads_requests_and_skips_blank_lines() {
        let input = "{\"disease\":\"diabetes\"}\n\n   \n{\"disease\":\"heart\",\"age\":61}\n";
        let requests: Vec<_> = RequestConsumer::new(Cursor::new(input)).collect();

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].as_ref().unwrap().disease(), Disease::Diabetes);
        assert_eq!(requests[1].as_ref().unwrap().disease(), Disease::Heart);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let input = "{\"disease\":\"diabetes\"}\nnot json\n{\"disease\":\"parkinsons\"}";
        let mut consumer = RequestConsumer::new(Cursor::new(input));

        assert!(consumer.next().unwrap().is_ok());
        match consumer.next().unwrap() {
            Err(RequestError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed request, got {other:?}"),
        }
        assert!(consumer.next().unwrap().is_ok());
        assert!(consumer.next().is_none());
        assert_eq!(consumer.line(), 3);
    }
}
