//! WebSocket connection to the conundrum server

use crate::rendering::render;
use futures::{SinkExt, StreamExt};
use log::{info, warn};
use shared::Message;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// One participant's connection. Sends and receives [`Message`]s as JSON
/// text frames.
pub struct Connection {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Connection {
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (stream, _response) = connect_async(url).await?;
        info!("Connected to {}", url);
        Ok(Self { stream })
    }

    pub async fn send(&mut self, message: &Message) -> Result<(), ClientError> {
        let json = serde_json::to_string(message)?;
        self.stream.send(WsMessage::text(json)).await?;
        Ok(())
    }

    /// Next broadcast from the server. Control frames are skipped; `None`
    /// once the server closes the connection.
    pub async fn next_message(&mut self) -> Option<Result<Message, ClientError>> {
        while let Some(frame) = self.stream.next().await {
            let decoded: serde_json::Result<Message> = match frame {
                Ok(WsMessage::Text(text)) => serde_json::from_str(text.as_str()),
                Ok(WsMessage::Binary(bytes)) => serde_json::from_slice(&bytes),
                Ok(WsMessage::Close(_)) => return None,
                Ok(_) => continue,
                Err(e) => return Some(Err(e.into())),
            };
            return Some(decoded.map_err(Into::into));
        }
        None
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.stream.close(None).await?;
        Ok(())
    }
}

/// Opens a [`Connection`] to the server's WebSocket endpoint.
pub async fn connect(url: &str) -> Result<Connection, ClientError> {
    Connection::connect(url).await
}

/// Interactive participant: stdin lines go out as guesses under `name`,
/// broadcasts are printed as they arrive.
pub struct Client {
    connection: Connection,
    name: String,
}

impl Client {
    pub async fn new(server_url: &str, name: &str) -> Result<Self, ClientError> {
        let connection = connect(server_url).await?;
        Ok(Client {
            connection,
            name: name.to_string(),
        })
    }

    pub async fn run(mut self) -> Result<(), ClientError> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                incoming = self.connection.next_message() => {
                    match incoming {
                        Some(Ok(message)) => println!("{}", render(&message)),
                        Some(Err(e)) => {
                            warn!("Connection lost: {}", e);
                            return Err(e);
                        }
                        None => {
                            info!("Server closed the connection");
                            return Ok(());
                        }
                    }
                },

                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            let line = line.trim_end();
                            if line.is_empty() {
                                continue;
                            }
                            self.connection.send(&Message::new(&self.name, line)).await?;
                        }
                        None => {
                            info!("End of input, disconnecting");
                            return self.connection.close().await;
                        }
                    }
                },
            }
        }
    }
}
