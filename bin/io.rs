use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tracing::instrument;

/// Trait for types that interact with a person line by line.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Console: Send {
    /// Reads the next line, or `None` once the input is exhausted.
    async fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Writes a block of text followed by a line break.
    async fn print(&mut self, text: &str) -> io::Result<()>;
}

/// A [`Console`] over a pair of byte streams.
#[derive(Debug)]
pub struct Terminal<W: AsyncWrite, R: AsyncRead> {
    writer: W,
    reader: Lines<BufReader<R>>,
}

impl<W: AsyncWrite, R: AsyncRead> Terminal<W, R> {
    pub fn new(writer: W, reader: R) -> Self {
        Terminal {
            writer,
            reader: BufReader::new(reader).lines(),
        }
    }
}

#[async_trait]
impl<W: AsyncWrite + Send + Unpin, R: AsyncRead + Send + Unpin> Console for Terminal<W, R> {
    #[instrument(level = "trace", skip(self), ret, err)]
    async fn read_line(&mut self) -> io::Result<Option<String>> {
        self.reader.next_line().await
    }

    #[instrument(level = "trace", skip(self), err)]
    async fn print(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.write_u8(b'\n').await?;
        self.writer.flush().await
    }
}
