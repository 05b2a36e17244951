//! 测试用的本地 HTTP 服务：按顺序回放预设响应，并记录收到的请求行。

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

pub enum Reply {
    Body { status: u16, body: Vec<u8> },
    /// 读完请求后不回应
    Stall,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Reply::Body {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn bytes(body: &[u8]) -> Self {
        Reply::Body {
            status: 200,
            body: body.to_vec(),
        }
    }
}

pub struct TestServer {
    pub base_url: String,
    requests: mpsc::UnboundedReceiver<String>,
}

impl TestServer {
    pub async fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for reply in replies {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let head = read_head(&mut socket).await;
                let request_line = head.lines().next().unwrap_or_default().to_string();
                let _ = tx.send(request_line);

                match reply {
                    Reply::Stall => {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                    }
                    Reply::Body { status, body } => {
                        let head = format!(
                            "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\n\
                             content-length: {}\r\nconnection: close\r\n\r\n",
                            status,
                            body.len()
                        );
                        let _ = socket.write_all(head.as_bytes()).await;
                        let _ = socket.write_all(&body).await;
                        let _ = socket.shutdown().await;
                    }
                }
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests: rx,
        }
    }

    /// 已收到的请求行，例如 `GET /manga?title=x HTTP/1.1`
    pub fn requests(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = self.requests.try_recv() {
            lines.push(line);
        }
        lines
    }
}

async fn read_head(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
