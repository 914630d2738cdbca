//! Interactive client session.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::TcpStream,
    sync::mpsc,
};

use linecast_server::infrastructure::{codec::encode_wire, dto::wire::WireMessage};

use crate::{error::ClientError, formatter::MessageFormatter, ui::redisplay_prompt};

/// Name used when the user enters an empty name
pub const ANONYMOUS: &str = "anonymous";

/// Ask for a display name on the terminal
pub async fn prompt_name() -> Result<String, ClientError> {
    let name = tokio::task::spawn_blocking(|| {
        let mut rl = DefaultEditor::new().map_err(|e| ClientError::Input(e.to_string()))?;
        match rl.readline("Enter your name: ") {
            Ok(line) => Ok(line),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(String::new()),
            Err(e) => Err(ClientError::Input(e.to_string())),
        }
    })
    .await
    .map_err(|e| ClientError::Input(e.to_string()))??;

    Ok(normalize_name(&name))
}

/// Trim the name and fall back to [`ANONYMOUS`] when it is empty
pub fn normalize_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        ANONYMOUS.to_string()
    } else {
        name.to_string()
    }
}

/// Run one client session until the server closes the connection or input ends
pub async fn run_client_session(host: &str, port: u16, name: String) -> Result<(), ClientError> {
    let addr = format!("{}:{}", host, port);
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!("Connected to relay server at {}", addr);
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        name
    );

    let (reader, mut writer) = stream.into_split();

    // Spawn a task to handle incoming lines
    let name_for_read = name.clone();
    let mut read_task = tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    println!("\n{}", MessageFormatter::format_line(line));
                    redisplay_prompt(&name_for_read);
                }
                Ok(None) => {
                    println!("\nDisconnected from relay server");
                    break;
                }
                Err(e) => {
                    tracing::warn!("Read error: {}", e);
                    println!("\nDisconnected from relay server");
                    break;
                }
            }
        }
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt = format!("{}> ", name);
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if line.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str()).ok();
                    if input_tx.send(line).is_err() {
                        // Channel closed, exit thread
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to send input lines to the server
    let mut write_task = tokio::spawn(async move {
        while let Some(text) = input_rx.recv().await {
            let line = match encode_wire(&WireMessage::outgoing_chat(name.as_str(), text)) {
                Ok(line) => line,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            if let Err(e) = writer.write_all(line.as_bytes()).await {
                tracing::warn!("Failed to send message: {}", e);
                println!("Error sending message, connection may be closed.");
                break;
            }
        }
        writer.shutdown().await.ok();
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut read_task => write_task.abort(),
        _ = &mut write_task => read_task.abort(),
    }

    Ok(())
}
