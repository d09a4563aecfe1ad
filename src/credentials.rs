//! API key acquisition.
//!
//! A key is obtained once at startup from an ordered list of providers. The
//! environment provider is checked first so scripted runs never block on stdin;
//! the interactive prompt is the fallback. Both implement [`CredentialProvider`],
//! and the prompt is generic over its reader and writer so it can be driven from
//! in-memory buffers.

use std::fmt;
use std::io::{self, BufRead, Write};

use crate::config::{ProviderConfig, KEY_PREVIEW_CHARS};

/// A session API key.
///
/// `Debug` and `Display` only ever show the preview, never the full key.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key, trimming surrounding whitespace. Blank input yields `None`.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First few characters followed by an ellipsis, safe to log.
    pub fn preview(&self) -> String {
        let head: String = self.0.chars().take(KEY_PREVIEW_CHARS).collect();
        format!("{}...", head)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.preview()).finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("No API key provided")]
    NoKey,

    #[error("Input closed before an API key was entered")]
    InputClosed,

    #[error("IO error while reading API key: {0}")]
    Io(#[from] io::Error),
}

/// A source of API keys.
pub trait CredentialProvider {
    /// Short label for logs, e.g. "environment" or "prompt".
    fn source(&self) -> &'static str;

    /// Try to obtain a key. `Ok(None)` means this source has nothing to offer
    /// and the next provider should be asked.
    fn fetch(&mut self) -> Result<Option<ApiKey>, CredentialError>;
}

/// Reads the key from an environment variable.
pub struct EnvCredentialProvider {
    var: String,
}

impl EnvCredentialProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredentialProvider {
    fn source(&self) -> &'static str {
        "environment"
    }

    fn fetch(&mut self) -> Result<Option<ApiKey>, CredentialError> {
        let key = std::env::var(&self.var)
            .ok()
            .and_then(|value| ApiKey::new(&value));
        if key.is_some() {
            tracing::info!(var = %self.var, "Using API key from environment");
        }
        Ok(key)
    }
}

/// Asks for the key on an interactive terminal.
///
/// Blank entries are rejected and asked again. A key without the expected prefix
/// is accepted only after an explicit `y` confirmation.
pub struct PromptCredentialProvider<R, W> {
    input: R,
    output: W,
    provider: ProviderConfig,
}

impl PromptCredentialProvider<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's own stdin and stdout.
    pub fn stdio(provider: ProviderConfig) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), provider)
    }
}

impl<R: BufRead, W: Write> PromptCredentialProvider<R, W> {
    pub fn new(input: R, output: W, provider: ProviderConfig) -> Self {
        Self {
            input,
            output,
            provider,
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, prompt: &str) -> Result<String, CredentialError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CredentialError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn write_intro(&mut self) -> Result<(), CredentialError> {
        let provider = &self.provider;
        writeln!(self.output, "\nAPI Key Required for {}", provider.name)?;
        writeln!(self.output, "{}", "=".repeat(40))?;
        writeln!(
            self.output,
            "Get your {} API key from: {}",
            provider.display_name, provider.key_url
        )?;
        if !provider.key_prefix.is_empty() {
            writeln!(
                self.output,
                "Your key should start with '{}'",
                provider.key_prefix
            )?;
        }
        writeln!(self.output, "\nYou can paste your API key here:")?;
        Ok(())
    }

    fn has_expected_prefix(&self, key: &ApiKey) -> bool {
        key.expose().starts_with(&self.provider.key_prefix)
    }
}

impl<R: BufRead, W: Write> CredentialProvider for PromptCredentialProvider<R, W> {
    fn source(&self) -> &'static str {
        "prompt"
    }

    fn fetch(&mut self) -> Result<Option<ApiKey>, CredentialError> {
        self.write_intro()?;
        let prompt = format!("Enter your {} API key: ", self.provider.name);

        loop {
            let Some(key) = ApiKey::new(&self.ask(&prompt)?) else {
                writeln!(self.output, "No API key provided. Please try again.")?;
                continue;
            };

            if !self.has_expected_prefix(&key) {
                writeln!(
                    self.output,
                    "WARNING: {} API keys usually start with '{}'",
                    self.provider.display_name, self.provider.key_prefix
                )?;
                let confirm = self.ask("Are you sure this is correct? (y/n): ")?;
                if !confirm.eq_ignore_ascii_case("y") {
                    continue;
                }
            }

            return Ok(Some(key));
        }
    }
}

/// Ask each provider in turn and return the first key found.
pub fn acquire_api_key(
    providers: &mut [Box<dyn CredentialProvider>],
) -> Result<(ApiKey, &'static str), CredentialError> {
    for provider in providers.iter_mut() {
        if let Some(key) = provider.fetch()? {
            return Ok((key, provider.source()));
        }
        tracing::debug!(source = provider.source(), "No API key from provider");
    }
    Err(CredentialError::NoKey)
}
