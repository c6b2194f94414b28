//! Operator input providers

use std::collections::VecDeque;
use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

use crate::common::{Error, Result};

/// Supplies one line of operator input per prompt
#[async_trait]
pub trait InputProvider: Send {
    /// Show `prompt` and wait for a line; the trailing newline is stripped
    async fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Reads answers from the terminal
pub struct StdinInput {
    reader: BufReader<Stdin>,
}

impl StdinInput {
    pub fn new() -> Self {
        Self {
            reader: BufReader::new(tokio::io::stdin()),
        }
    }
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputProvider for StdinInput {
    async fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("   {} ", prompt);
        std::io::stdout().flush()?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        if read == 0 {
            return Err(Error::InputClosed(prompt.to_string()));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Replays a fixed list of answers, for unattended runs and tests
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts seen so far
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

#[async_trait]
impl InputProvider for ScriptedInput {
    async fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| Error::InputClosed(prompt.to_string()))
    }
}
