use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use super::SmtpError;
use super::session::{SmtpReply, SmtpStream};

pub const SMTP_PORT: u16 = 25;
pub const SMTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Liveness probe against a single mail exchange.
pub trait SmtpProbe {
    /// Connects to `host`, reads the greeting, says `QUIT` and waits for
    /// the answer. Returns the greeting reply.
    fn handshake(&self, host: &str) -> Result<SmtpReply, SmtpError>;
}

/// Greeting/QUIT over plaintext TCP. No EHLO, no envelope, no TLS.
/// `timeout` bounds the whole session, not each read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpHandshake {
    pub port: u16,
    pub timeout: Duration,
}

impl Default for SmtpHandshake {
    fn default() -> Self {
        Self {
            port: SMTP_PORT,
            timeout: SMTP_TIMEOUT,
        }
    }
}

impl SmtpHandshake {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&self, host: &str) -> Result<Vec<SocketAddr>, SmtpError> {
        let addrs: Vec<SocketAddr> = (host, self.port)
            .to_socket_addrs()
            .map_err(|source| SmtpError::Resolve {
                host: host.to_string(),
                source,
            })?
            .collect();
        if addrs.is_empty() {
            return Err(SmtpError::NoAddress {
                host: host.to_string(),
            });
        }
        Ok(addrs)
    }
}

impl SmtpProbe for SmtpHandshake {
    fn handshake(&self, host: &str) -> Result<SmtpReply, SmtpError> {
        let mut last_err = None;
        for addr in self.resolve(host)? {
            let mut stream = match SmtpStream::connect(host, &addr, self.timeout) {
                Ok(stream) => stream,
                Err(err) => {
                    debug!(%host, %addr, error = %err, "smtp connect failed");
                    last_err = Some(err);
                    continue;
                }
            };

            let greeting = stream.read_reply()?;
            debug!(%host, %addr, code = greeting.code, "smtp greeting");
            stream.send_command("QUIT")?;
            let bye = stream.read_reply()?;
            debug!(%host, %addr, code = bye.code, "smtp quit");
            return Ok(greeting);
        }
        Err(last_err.unwrap_or_else(|| SmtpError::NoAddress {
            host: host.to_string(),
        }))
    }
}
