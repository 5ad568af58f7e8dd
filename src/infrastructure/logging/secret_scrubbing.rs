use regex::{Captures, Regex};
use std::io;
use std::sync::LazyLock;
use tracing_subscriber::fmt::MakeWriter;

static BEARER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[A-Za-z0-9\-_\.~+/=]+").expect("valid bearer regex"));

// Matches `"access_token": "..."`, `refresh_token=...` and friends.
static TOKEN_FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(["']?\b(?:access_token|refresh_token|id_token|code)\b["']?\s*[:=]\s*)["']?[^"'\s,}]+["']?"#)
        .expect("valid token field regex")
});

/// Redacts credentials from formatted log output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretScrubber;

impl SecretScrubber {
    /// Scrub a message of sensitive data
    pub fn scrub_message(message: &str) -> String {
        let scrubbed = BEARER_PATTERN.replace_all(message, "Bearer [TOKEN_REDACTED]");
        TOKEN_FIELD_PATTERN
            .replace_all(&scrubbed, |caps: &Captures| format!("{}[REDACTED]", &caps[1]))
            .into_owned()
    }
}

/// `MakeWriter` wrapper that scrubs every formatted event before it reaches the inner writer.
#[derive(Debug, Clone)]
pub struct ScrubbingMakeWriter<M> {
    inner: M,
}

impl<M> ScrubbingMakeWriter<M> {
    pub const fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<'a, M> MakeWriter<'a> for ScrubbingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = ScrubbingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        ScrubbingWriter {
            inner: self.inner.make_writer(),
        }
    }
}

/// Writer half of [`ScrubbingMakeWriter`]. The fmt layer writes one whole event per call.
#[derive(Debug)]
pub struct ScrubbingWriter<W> {
    inner: W,
}

impl<W: io::Write> io::Write for ScrubbingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let scrubbed = SecretScrubber::scrub_message(&text);
        self.inner.write_all(scrubbed.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
