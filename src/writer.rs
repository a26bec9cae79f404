use std::io::{self, Stderr, Stdout, Write};

use tracing::warn;

/// User-facing output: codes and names on `write`, prompts on `write_err`.
pub trait OutErr {
    fn write_err(&mut self, s: &str);
    fn write(&mut self, s: &str);
}

pub struct OtpWriter {
    out: Stdout,
    err: Stderr,
}

impl OtpWriter {
    pub fn new() -> Self {
        OtpWriter {
            out: io::stdout(),
            err: io::stderr(),
        }
    }
}

fn write_flushed(stream: &mut impl Write, s: &str) -> io::Result<()> {
    stream.write_all(s.as_bytes())?;
    stream.flush()
}

impl OutErr for OtpWriter {
    fn write_err(&mut self, s: &str) {
        if let Err(e) = write_flushed(&mut self.err.lock(), s) {
            warn!("writing to stderr: {}", e);
        }
    }

    fn write(&mut self, s: &str) {
        if let Err(e) = write_flushed(&mut self.out.lock(), s) {
            warn!("writing to stdout: {}", e);
        }
    }
}
