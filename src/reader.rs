//! Feeding log files to a parser line by line.

use crate::error::{Error, Result};
use crate::parser::LogParser;
use std::io::{BufRead, BufReader, Read};

/// A reader that hands each line of its input to a [`LogParser`].
///
/// Rejected lines are skipped and counted rather than surfaced as errors, so
/// iteration only yields accepted events and I/O failures.
#[derive(Debug)]
pub struct Reader<R: Read, P: LogParser> {
    /// The underlying buffered reader.
    reader: BufReader<R>,
    /// The parser each line is given to.
    parser: P,
    /// Number of non-blank lines read so far.
    lines: u64,
    /// Number of lines the parser rejected.
    dropped: u64,
}

impl<R: Read, P: LogParser> Reader<R, P> {
    /// Create a new reader.
    ///
    /// # Arguments
    ///
    /// * `input` - The input source (file, stdin, etc.)
    /// * `parser` - The parser to run on every line
    ///
    /// # Example
    ///
    /// ```rust
    /// use nginx_access::{AccessParser, Reader};
    /// use std::io::Cursor;
    ///
    /// let log_data = r#"127.0.0.1 - - [08/Nov/2013:13:39:18 +0000] "GET /api/foo HTTP/1.1" 200 612 "-" "curl/7.64.1""#;
    ///
    /// let reader = Reader::new(Cursor::new(log_data), AccessParser::new()?);
    /// let events = reader.collect_all()?;
    /// assert_eq!(events.len(), 1);
    /// # Ok::<(), nginx_access::Error>(())
    /// ```
    pub fn new(input: R, parser: P) -> Self {
        Self {
            reader: BufReader::new(input),
            parser,
            lines: 0,
            dropped: 0,
        }
    }

    /// Get a reference to the underlying parser.
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Number of non-blank lines read so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Number of lines the parser rejected so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Read the next accepted event.
    ///
    /// # Returns
    ///
    /// - `None` at end of input
    /// - `Some(Ok(event))` for the next line the parser accepted
    /// - `Some(Err(error))` if reading failed
    pub fn read(&mut self) -> Option<Result<P::Event>> {
        let mut line = String::new();

        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(Error::Io { source: e })),
            }

            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            if line.trim().is_empty() {
                continue;
            }

            self.lines += 1;
            match self.parser.parse(&line) {
                Some(event) => return Some(Ok(event)),
                None => self.dropped += 1,
            }
        }
    }

    /// Collect all accepted events into a vector.
    ///
    /// Fails only if reading the input fails.
    pub fn collect_all(mut self) -> Result<Vec<P::Event>> {
        let mut events = Vec::new();

        while let Some(result) = self.read() {
            events.push(result?);
        }

        Ok(events)
    }

    /// Process accepted events with a closure, without collecting them.
    ///
    /// # Arguments
    ///
    /// * `f` - A closure called with each accepted event
    pub fn process_events<F, E>(&mut self, mut f: F) -> std::result::Result<(), E>
    where
        F: FnMut(&P::Event) -> std::result::Result<(), E>,
        E: From<Error>,
    {
        while let Some(result) = self.read() {
            let event = result?;
            f(&event)?;
        }
        Ok(())
    }
}

impl<R: Read, P: LogParser> Iterator for Reader<R, P> {
    type Item = Result<P::Event>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AccessParser;
    use std::io::Cursor;

    const LOG: &str = r#"127.0.0.1 - - [08/Nov/2013:13:39:18 +0000] "GET /api/foo HTTP/1.1" 200 612 "-" "curl/7.64.1"
not an access log line

192.168.1.1 - admin [08/Nov/2013:13:40:18 +0000] "POST /api/bar HTTP/1.1" 404 0 "https://example.com/" "Mozilla/5.0"
"#;

    #[test]
    fn test_reader_skips_rejected_lines() {
        let mut reader = Reader::new(Cursor::new(LOG), AccessParser::new().unwrap());

        let first = reader.read().unwrap().unwrap();
        assert_eq!(first.remote_addr(), Some("127.0.0.1"));
        assert_eq!(reader.dropped(), 0);

        let second = reader.read().unwrap().unwrap();
        assert_eq!(second.remote_user(), Some("admin"));
        assert_eq!(second.status(), Some(404));
        assert_eq!(reader.dropped(), 1);
        assert_eq!(reader.lines(), 3);

        assert!(reader.read().is_none());
    }

    #[test]
    fn test_reader_crlf() {
        let log = LOG.replace('\n', "\r\n");
        let reader = Reader::new(Cursor::new(log), AccessParser::new().unwrap());

        let events: Result<Vec<_>> = reader.collect();
        let events = events.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].http_user_agent(), Some("Mozilla/5.0"));
    }

    #[test]
    fn test_process_events() {
        let mut reader = Reader::new(Cursor::new(LOG), AccessParser::new().unwrap());
        let mut bytes = 0;

        reader
            .process_events(|event| -> Result<()> {
                bytes += event.body_bytes_sent().unwrap_or_default();
                Ok(())
            })
            .unwrap();

        assert_eq!(bytes, 612);
        assert_eq!(reader.dropped(), 1);
    }
}
