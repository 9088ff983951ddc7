//! Console boundary: where documents and status lines go, and where operator
//! input comes from. Both are traits so the pipeline never touches stdio directly.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use crate::errors::AppError;

/// Sink for everything the operator sees.
pub trait Reporter: Send + Sync {
    /// A progress/status line.
    fn status(&self, message: &str);
    /// A plain line of interactive output.
    fn line(&self, text: &str);
    /// A finished document under a heading.
    fn document(&self, title: &str, body: &str);
}

/// Writes to stdout. Logs go to stderr, so documents can be piped cleanly.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn status(&self, message: &str) {
        println!("» {message}");
    }

    fn line(&self, text: &str) {
        println!("{text}");
    }

    fn document(&self, title: &str, body: &str) {
        println!("\n===== {title} =====\n");
        println!("{}", body.trim_end());
        println!();
    }
}

/// Source of operator commands during the review loop.
#[async_trait]
pub trait Operator: Send {
    /// Shows `prompt` and reads one line. `None` means input is closed.
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>, AppError>;
}

pub struct StdinOperator {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinOperator {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinOperator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Operator for StdinOperator {
    async fn read_line(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(prompt.as_bytes()).await.map_err(prompt_error)?;
        stdout.flush().await.map_err(prompt_error)?;

        self.lines
            .next_line()
            .await
            .map_err(|e| AppError::Input(format!("Failed to read operator input: {e}")))
    }
}

fn prompt_error(e: std::io::Error) -> AppError {
    AppError::Input(format!("Failed to write prompt: {e}"))
}
