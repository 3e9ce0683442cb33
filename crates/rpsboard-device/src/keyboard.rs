//! Keyboard simulation driver.
//!
//! Stands in for the board when no hardware is attached. Each input line is a
//! command: `L` turns the selector left, `R` turns it right, `P` clicks the
//! play button. Only the first character counts, in either case. The driver
//! keeps its own selector count so the session sees the same raw positions a
//! real encoder would report. The count restarts at zero on every connect,
//! matching the baseline of the fresh session that follows.
//!
//! The display is written to the output instead of being published. Broker
//! operations succeed without doing anything.

use std::io;

use rpsboard_app::Driver;
use rpsboard_proto::{ButtonEdge, Channel, DeviceInput};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

/// Keyboard command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Turn the selector one step back.
    Left,
    /// Turn the selector one step forward.
    Right,
    /// Click the play button.
    Play,
}

impl Command {
    /// Parse a command line. Returns `None` for anything unrecognised.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim_start().chars().next()?.to_ascii_uppercase() {
            'L' => Some(Self::Left),
            'R' => Some(Self::Right),
            'P' => Some(Self::Play),
            _ => None,
        }
    }
}

/// [`Driver`] reading commands from a line source and writing the display to
/// a sink.
pub struct KeyboardDriver<R, W> {
    lines: Lines<R>,
    output: W,
    selector: i64,
    eof: bool,
}

impl KeyboardDriver<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Driver over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> KeyboardDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Driver over arbitrary input and output.
    pub fn new(input: R, output: W) -> Self {
        Self { lines: input.lines(), output, selector: 0, eof: false }
    }

    /// Output sink.
    pub fn output(&self) -> &W {
        &self.output
    }

    /// Translate a command into the input a board would send.
    fn input_for(&mut self, command: Command) -> DeviceInput {
        match command {
            Command::Left => {
                self.selector -= 1;
                DeviceInput::Selector(self.selector)
            },
            Command::Right => {
                self.selector += 1;
                DeviceInput::Selector(self.selector)
            },
            Command::Play => DeviceInput::Button(ButtonEdge::Clicked),
        }
    }
}

impl<R, W> Driver for KeyboardDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    type Error = io::Error;

    async fn connect(&mut self) -> Result<(), Self::Error> {
        self.selector = 0;
        tracing::info!("keyboard mode: L/R select, P plays");
        Ok(())
    }

    async fn subscribe(&mut self, channel: Channel) -> Result<(), Self::Error> {
        tracing::debug!(?channel, "subscribe (keyboard)");
        Ok(())
    }

    async fn unsubscribe(&mut self, channel: Channel) -> Result<(), Self::Error> {
        tracing::debug!(?channel, "unsubscribe (keyboard)");
        Ok(())
    }

    async fn publish(&mut self, channel: Channel, payload: String) -> Result<(), Self::Error> {
        if channel != Channel::DisplayMessage {
            tracing::debug!(?channel, %payload, "publish (keyboard)");
            return Ok(());
        }
        self.output.write_all(payload.as_bytes()).await?;
        self.output.write_all(b"\n\n").await?;
        self.output.flush().await
    }

    async fn next_input(&mut self) -> Result<Option<DeviceInput>, Self::Error> {
        loop {
            if self.eof {
                // The operator may still stop the process; input just never arrives.
                std::future::pending::<()>().await;
            }
            let Some(line) = self.lines.next_line().await? else {
                tracing::info!("keyboard input closed");
                self.eof = true;
                continue;
            };
            match Command::parse(&line) {
                Some(command) => return Ok(Some(self.input_for(command))),
                None if line.trim().is_empty() => {},
                None => tracing::warn!(%line, "unknown command, use L, R or P"),
            }
        }
    }

    async fn disconnect(&mut self) -> Result<(), Self::Error> {
        tracing::debug!("disconnect (keyboard)");
        Ok(())
    }
}
