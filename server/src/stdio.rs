//! Line-delimited JSON-RPC over stdin/stdout

use crate::handler::McpServer;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Serve messages from `reader` until end of input
///
/// Each non-blank line is one message. Each response is written as one line
/// and flushed before the next message is read.
///
/// # Errors
///
/// Returns an I/O error if reading or writing fails
pub async fn serve_lines<R, W>(server: &McpServer, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let Some(response) = server.handle_message(&line).await else {
            continue;
        };

        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }

    tracing::info!("Input closed");
    Ok(())
}

/// Serve on the process stdin and stdout
///
/// # Errors
///
/// Returns an I/O error if stdin or stdout fails
pub async fn run_stdio(server: &McpServer) -> std::io::Result<()> {
    tracing::info!("Serving MCP over stdio");
    serve_lines(
        server,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}
