//! Single-connection HTTP dispatcher for the `/metrics` endpoint.
//!
//! Strictly sequential: one connection is accepted, fully served and
//! closed before the next accept. A slow client serializes behind every
//! other request; that is the intended resource model. The dispatcher
//! talks to the scrape core only through the `MetricSource` seam, so a
//! concurrent variant could be substituted without touching the scrapers.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use tracing::{debug, info, warn};

/// Bounded read timeout per accepted connection. There is no write
/// timeout; the connection closes after one response either way.
const READ_TIMEOUT: Duration = Duration::from_secs(60);

/// Fixed body for every unrecognized path or method.
const NOT_FOUND_BODY: &str = "ERROR: File Not Found.";

/// Anything able to produce a rendered metric stream.
pub trait MetricSource {
    fn render(&mut self) -> String;
}

/// Routing decision for one request line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `GET /metrics` (prefix match, trailing content ignored).
    Metrics,
    /// Any other path or method: fixed 404 body.
    NotFound,
}

/// Classifies an HTTP request line. Only the line itself matters; all
/// other headers are ignored by the dispatcher.
pub fn parse_request_line(line: &str) -> Route {
    if line.trim_start().starts_with("GET /metrics") {
        Route::Metrics
    } else {
        Route::NotFound
    }
}

/// Serves one connection: read a request line, answer, close.
///
/// A read error (including the 60 s timeout) propagates to the caller,
/// which drops the connection without a response.
pub fn handle_connection(mut stream: TcpStream, source: &mut dyn MetricSource) -> io::Result<()> {
    stream.set_read_timeout(Some(READ_TIMEOUT))?;

    let mut line = String::new();
    BufReader::new(&stream).read_line(&mut line)?;
    if line.trim().is_empty() {
        // Client connected and said nothing useful; drop silently.
        return Ok(());
    }

    match parse_request_line(&line) {
        Route::Metrics => {
            debug!("serving metrics: {}", line.trim_end());
            let body = source.render();
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nServer: nodexpd/{}\r\nContent-Type: text/plain; version=0.0.4\r\n\r\n{}",
                env!("CARGO_PKG_VERSION"),
                body
            )?;
        }
        Route::NotFound => {
            debug!("rejecting request: {}", line.trim_end());
            write!(
                stream,
                "HTTP/1.1 404 Not Found\r\nServer: nodexpd/{}\r\nContent-Type: text/plain; version=0.0.4\r\n\r\n{}",
                env!("CARGO_PKG_VERSION"),
                NOT_FOUND_BODY
            )?;
        }
    }

    stream.flush()
}

/// Accept loop: binds the port on all interfaces and serves connections
/// one at a time, forever. Connection-level errors are logged and the
/// listener keeps accepting.
pub fn serve(port: u16, source: &mut dyn MetricSource) -> io::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port))?;
    info!("listening on 0.0.0.0:{}", port);

    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(e) = handle_connection(stream, source) {
                    debug!("connection dropped: {}", e);
                }
            }
            Err(e) => warn!("accept failed: {}", e),
        }
    }

    Ok(())
}
