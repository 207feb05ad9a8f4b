//! Terminal challenge provider
//!
//! Tells the operator which site key (and widget script) to solve the
//! challenge with, then reads the resulting token from input.

use crate::challenge::ChallengeProvider;
use crate::ChallengeError;
use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stderr, Stdin,
};
use tokio::sync::Mutex;

/// Notice shown whenever the batch is waiting on a challenge
pub const CHALLENGE_NOTICE: &str = "Captcha required! Solve it to continue.";

/// Reads challenge tokens typed or pasted by a human
pub struct PromptChallengeProvider<R, W> {
    io: Mutex<(R, W)>,
    script_url: Option<String>,
}

impl PromptChallengeProvider<BufReader<Stdin>, Stderr> {
    /// Prompts on stderr and reads from stdin
    pub fn stdio(script_url: Option<String>) -> Self {
        Self::new(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stderr(),
            script_url,
        )
    }
}

impl<R, W> PromptChallengeProvider<R, W> {
    pub fn new(reader: R, writer: W, script_url: Option<String>) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
            script_url,
        }
    }

    /// Returns the underlying reader and writer
    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }
}

#[async_trait]
impl<R, W> ChallengeProvider for PromptChallengeProvider<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn solve(&self, site_key: &str) -> Result<String, ChallengeError> {
        let mut io = self.io.lock().await;
        let (reader, writer) = &mut *io;

        let mut banner = format!("{}\n  Site key: {}\n", CHALLENGE_NOTICE, site_key);
        if let Some(script_url) = &self.script_url {
            banner.push_str(&format!("  Widget script: {}\n", script_url));
        }
        writer.write_all(banner.as_bytes()).await?;

        loop {
            writer.write_all(b"Challenge token: ").await?;
            writer.flush().await?;

            let mut line = String::new();
            if reader.read_line(&mut line).await? == 0 {
                return Err(ChallengeError::Closed);
            }

            let token = line.trim();
            if !token.is_empty() {
                tracing::info!("Challenge token received");
                return Ok(token.to_string());
            }
        }
    }
}
