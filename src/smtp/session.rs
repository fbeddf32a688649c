use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use super::SmtpError;

/// RFC 5321 4.5.3.1.5 reply line limit, CRLF included.
const MAX_LINE: usize = 512;
const MAX_REPLY_LINES: usize = 64;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Plaintext SMTP connection with line buffering. The whole session,
/// connect included, must finish within the timeout given to `connect`.
#[derive(Debug)]
pub(crate) struct SmtpStream {
    stream: TcpStream,
    buffer: Vec<u8>,
    deadline: Instant,
}

impl SmtpStream {
    pub(crate) fn connect(
        host: &str,
        addr: &SocketAddr,
        timeout: Duration,
    ) -> Result<Self, SmtpError> {
        let deadline = Instant::now() + timeout;
        let stream =
            TcpStream::connect_timeout(addr, timeout).map_err(|source| SmtpError::Connect {
                host: host.to_string(),
                source,
            })?;
        stream
            .set_read_timeout(Some(timeout))
            .map_err(SmtpError::io)?;
        stream
            .set_write_timeout(Some(timeout))
            .map_err(SmtpError::io)?;
        Ok(Self {
            stream,
            buffer: Vec::new(),
            deadline,
        })
    }

    pub(crate) fn send_command(&mut self, command: &str) -> Result<(), SmtpError> {
        let mut data = command.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        self.stream.write_all(&data).map_err(SmtpError::io)?;
        self.stream.flush().map_err(SmtpError::io)
    }

    /// Reads one (possibly multi-line) reply.
    pub(crate) fn read_reply(&mut self) -> Result<SmtpReply, SmtpError> {
        let mut lines = Vec::new();
        let mut code: Option<u16> = None;
        loop {
            let line = self.read_line()?;
            let parsed_code = line
                .get(..3)
                .and_then(|head| head.parse::<u16>().ok())
                .ok_or_else(|| SmtpError::Protocol(format!("invalid reply: {line}")))?;
            match code {
                Some(existing) if existing != parsed_code => {
                    return Err(SmtpError::Protocol(format!(
                        "inconsistent reply codes: {existing} vs {parsed_code}"
                    )));
                }
                Some(_) => {}
                None => code = Some(parsed_code),
            }
            let is_last = line.as_bytes().get(3) != Some(&b'-');
            lines.push(line.get(4..).unwrap_or("").to_string());
            if is_last {
                break;
            }
            if lines.len() >= MAX_REPLY_LINES {
                return Err(SmtpError::Protocol(format!(
                    "reply longer than {MAX_REPLY_LINES} lines"
                )));
            }
        }
        Ok(SmtpReply {
            code: code.unwrap_or(0),
            lines,
        })
    }

    fn read_line(&mut self) -> Result<String, SmtpError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
                if pos >= MAX_LINE {
                    return Err(SmtpError::Protocol(format!(
                        "reply line longer than {MAX_LINE} bytes"
                    )));
                }
                let mut line = self.buffer.drain(..=pos).collect::<Vec<_>>();
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return String::from_utf8(line)
                    .map_err(|err| SmtpError::Protocol(format!("utf8 error: {err}")));
            }

            if self.buffer.len() >= MAX_LINE {
                return Err(SmtpError::Protocol(format!(
                    "reply line longer than {MAX_LINE} bytes"
                )));
            }

            let remaining = self.deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(SmtpError::io(io::Error::new(
                    io::ErrorKind::TimedOut,
                    "session deadline exceeded",
                )));
            }
            self.stream
                .set_read_timeout(Some(remaining))
                .map_err(SmtpError::io)?;

            let mut buf = [0u8; MAX_LINE];
            let read = self.stream.read(&mut buf).map_err(SmtpError::io)?;
            if read == 0 {
                return Err(SmtpError::io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed",
                )));
            }
            self.buffer.extend_from_slice(&buf[..read]);
        }
    }
}
