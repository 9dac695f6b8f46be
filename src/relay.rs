// src/relay.rs

//! Stream relay: copy one child output stream to the console.
//!
//! Reads are forwarded as soon as they return, one console write per read,
//! with the stream's prefix in front. There is no line buffering, so partial
//! lines show up at the same pace the child produces them.

use std::io;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::console::{OutputSink, StreamKind};

/// Copy `reader` to `sink` until end-of-input or a read error.
///
/// Returns the number of payload bytes relayed (prefixes not counted).
pub async fn relay_stream<R>(
    script: &str,
    stream: StreamKind,
    mut reader: R,
    chunk_size: usize,
    sink: &dyn OutputSink,
) -> u64
where
    R: AsyncRead + Unpin,
{
    let prefix = stream.prefix(script);
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut out = Vec::with_capacity(prefix.len() + buf.len());
    let mut total = 0u64;

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                total += n as u64;
                out.clear();
                out.extend_from_slice(prefix.as_bytes());
                out.extend_from_slice(&buf[..n]);

                trace!(script, %stream, bytes = n, "relaying chunk");
                if let Err(err) = sink.write(&out) {
                    warn!(script, %stream, error = %err, "console write failed");
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                debug!(script, %stream, error = %err, "read failed; stopping relay");
                break;
            }
        }
    }

    debug!(script, %stream, bytes = total, "stream closed");
    total
}

/// Run [`relay_stream`] on its own Tokio task.
pub fn spawn_relay<R>(
    script: String,
    stream: StreamKind,
    reader: R,
    chunk_size: usize,
    sink: Arc<dyn OutputSink>,
) -> JoinHandle<u64>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move { relay_stream(&script, stream, reader, chunk_size, sink.as_ref()).await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::MemorySink;
    use std::time::Duration;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn splits_input_into_prefixed_chunks() {
        let sink = MemorySink::new();
        let input = vec![b'x'; 5000];

        let n = relay_stream("a.py", StreamKind::Stdout, &input[..], 1024, &sink).await;

        assert_eq!(n, 5000);
        let writes = sink.writes();
        assert_eq!(writes.len(), 5);
        assert!(writes.iter().all(|w| w.starts_with(b"[a.py] ")));
        assert_eq!(writes[4].len(), "[a.py] ".len() + 5000 - 4 * 1024);
        assert_eq!(sink.payload("[a.py] "), input);
    }

    #[tokio::test]
    async fn stderr_chunks_carry_error_prefix() {
        let sink = MemorySink::new();

        relay_stream("c.sh", StreamKind::Stderr, &b"oops\n"[..], 1024, &sink).await;

        assert_eq!(sink.contents(), "[c.sh][ERROR] oops\n");
    }

    #[tokio::test]
    async fn empty_stream_writes_nothing() {
        let sink = MemorySink::new();

        let n = relay_stream("a.py", StreamKind::Stdout, &b""[..], 1024, &sink).await;

        assert_eq!(n, 0);
        assert!(sink.writes().is_empty());
    }

    #[tokio::test]
    async fn partial_reads_are_forwarded_before_eof() {
        let sink = MemorySink::new();
        let (mut writer, reader) = tokio::io::duplex(64);

        let handle = spawn_relay(
            "slow.py".into(),
            StreamKind::Stdout,
            reader,
            1024,
            Arc::new(sink.clone()),
        );

        writer.write_all(b"tick").await.unwrap();

        let mut seen = false;
        for _ in 0..100 {
            if sink.contents() == "[slow.py] tick" {
                seen = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(seen, "chunk should be relayed while the stream is still open");

        drop(writer);
        assert_eq!(handle.await.unwrap(), 4);
    }
}
