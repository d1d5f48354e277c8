use std::io;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

use crate::core_log::Logger;

/// Serializes numeric status replies to the control stream, one
/// `NNN text\r\n` line per reply, multi-line replies in the
/// `NNN-first ... NNN last` form. Every reply is mirrored to the session
/// logger.
pub struct ReplyWriter {
    stream: Arc<Mutex<OwnedWriteHalf>>,
    logger: Arc<dyn Logger>,
    session_id: u64,
}

impl ReplyWriter {
    pub fn new(stream: Arc<Mutex<OwnedWriteHalf>>, logger: Arc<dyn Logger>, session_id: u64) -> Self {
        ReplyWriter {
            stream,
            logger,
            session_id,
        }
    }

    pub async fn send(&self, code: u16, text: &str) -> io::Result<()> {
        self.logger.print_response(self.session_id, code, text);
        self.write(format_reply(code, text).as_bytes()).await
    }

    pub async fn send_multiline(
        &self,
        code: u16,
        first: &str,
        body: &[String],
        last: &str,
    ) -> io::Result<()> {
        self.logger.print_response(self.session_id, code, first);
        self.write(format_multiline_reply(code, first, body, last).as_bytes())
            .await
    }

    async fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let mut stream = self.stream.lock().await;
        stream.write_all(bytes).await?;
        stream.flush().await
    }
}

pub fn format_reply(code: u16, text: &str) -> String {
    format!("{} {}\r\n", code, text)
}

pub fn format_multiline_reply(code: u16, first: &str, body: &[String], last: &str) -> String {
    let mut reply = format!("{}-{}\r\n", code, first);
    for line in body {
        reply.push_str(line);
        reply.push_str("\r\n");
    }
    reply.push_str(&format!("{} {}\r\n", code, last));
    reply
}

/// Double-quotes a path for 257 replies, doubling embedded quotes per
/// RFC 959.
pub fn quote_path(path: &str) -> String {
    format!("\"{}\"", path.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_reply() {
        assert_eq!(format_reply(200, "OK"), "200 OK\r\n");
    }

    #[test]
    fn multiline_reply_frames_body() {
        let body = vec![" UTF8".to_string(), " SIZE".to_string()];
        assert_eq!(
            format_multiline_reply(211, "Extensions supported:", &body, "End"),
            "211-Extensions supported:\r\n UTF8\r\n SIZE\r\n211 End\r\n"
        );
    }

    #[test]
    fn quoted_paths_double_embedded_quotes() {
        assert_eq!(quote_path("/"), "\"/\"");
        assert_eq!(quote_path("/a \"b\""), "\"/a \"\"b\"\"\"");
    }
}
