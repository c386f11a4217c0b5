//! Entropy collaborator: fetch and decode batches of random integers.
//!
//! The provider is a random.org-style service: `GET /integers` with query
//! parameters, plain-text response, one number per line. With `base = 2` and
//! `max = 65535` each line is a 16-bit binary token; 64 tokens are
//! concatenated into one 1024-bit candidate. The decoded batch is handed to
//! `CandidatePool` whole — a fetch either yields the complete batch or an
//! error, never a partial one.
//!
//! The provider's stream is pseudo-random from the consumer's point of view;
//! keys built from it are not CSPRNG-grade. Known weakness, stated rather
//! than papered over.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use rug::Integer;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Query parameters for the integer endpoint, TOML-loadable.
///
/// Defaults request 960 16-bit numbers in binary, enough for fifteen
/// 1024-bit candidates per batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntropyConfig {
    #[serde(default = "default_num")]
    pub num: u32,
    #[serde(default)]
    pub min: u32,
    #[serde(default = "default_max")]
    pub max: u32,
    #[serde(default = "default_col")]
    pub col: u32,
    #[serde(default = "default_base")]
    pub base: u32,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_rnd")]
    pub rnd: String,
    /// Binary tokens concatenated per candidate integer.
    #[serde(default = "default_tokens_per_integer")]
    pub tokens_per_integer: usize,
}

fn default_num() -> u32 {
    960
}
fn default_max() -> u32 {
    u16::MAX as u32
}
fn default_col() -> u32 {
    1
}
fn default_base() -> u32 {
    2
}
fn default_format() -> String {
    "plain".to_string()
}
fn default_rnd() -> String {
    "new".to_string()
}
fn default_tokens_per_integer() -> usize {
    64
}

impl Default for EntropyConfig {
    fn default() -> Self {
        EntropyConfig {
            num: default_num(),
            min: 0,
            max: default_max(),
            col: default_col(),
            base: default_base(),
            format: default_format(),
            rnd: default_rnd(),
            tokens_per_integer: default_tokens_per_integer(),
        }
    }
}

/// Load an `EntropyConfig` from a TOML file.
pub fn load_config(path: &Path) -> Result<EntropyConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading entropy config {}", path.display()))?;
    let config: EntropyConfig =
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Fetch one batch from the provider and decode it.
///
/// Single synchronous GET; this is the pipeline's only I/O. An HTTP or
/// decode failure yields an error and no integers.
pub fn fetch(url: &str, config: &EntropyConfig) -> Result<Vec<Integer>> {
    let agent = ureq::Agent::new_with_config(
        ureq::config::Config::builder()
            .timeout_connect(Some(Duration::from_secs(5)))
            .timeout_send_request(Some(Duration::from_secs(30)))
            .build(),
    );

    let url = url.trim_end_matches('/');
    info!(url, num = config.num, "fetching entropy batch");

    let mut response = agent
        .get(url)
        .query("num", &config.num.to_string())
        .query("min", &config.min.to_string())
        .query("max", &config.max.to_string())
        .query("col", &config.col.to_string())
        .query("base", &config.base.to_string())
        .query("format", &config.format)
        .query("rnd", &config.rnd)
        .call()
        .with_context(|| format!("querying entropy provider at {}", url))?;

    let body = response
        .body_mut()
        .read_to_string()
        .context("reading entropy provider response")?;

    let integers = decode_plain(&body, config.tokens_per_integer)?;
    info!(candidates = integers.len(), "entropy batch decoded");
    Ok(integers)
}

/// Decode a plain-text base-2 response into candidate integers.
///
/// Tokens are consumed from the tail of the response; every
/// `tokens_per_integer` of them are concatenated and parsed in base 2. An
/// incomplete trailing group is dropped. Consumers therefore see candidates
/// in no particular relation to response line order.
pub fn decode_plain(body: &str, tokens_per_integer: usize) -> Result<Vec<Integer>> {
    if tokens_per_integer == 0 {
        bail!("tokens_per_integer must be positive");
    }
    let mut tokens: Vec<&str> = body.split_whitespace().collect();
    let mut integers = Vec::with_capacity(tokens.len() / tokens_per_integer);
    let mut group = String::new();
    let mut grouped = 0usize;

    while let Some(token) = tokens.pop() {
        if !token.bytes().all(|b| b == b'0' || b == b'1') {
            bail!("non-binary token {:?} in entropy response", token);
        }
        group.push_str(token);
        grouped += 1;
        if grouped == tokens_per_integer {
            let value = Integer::from_str_radix(&group, 2)
                .with_context(|| format!("parsing {}-bit binary group", group.len()))?;
            integers.push(value);
            group.clear();
            grouped = 0;
        }
    }
    Ok(integers)
}

/// Read candidates from a local file: one decimal integer per line, blank
/// lines and `#` comments ignored. Offline counterpart to [`fetch`].
pub fn read_integers_file(path: &Path) -> Result<Vec<Integer>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading candidate file {}", path.display()))?;
    let mut integers = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let value = Integer::from_str_radix(line, 10)
            .with_context(|| format!("{}:{}: not a decimal integer", path.display(), line_no + 1))?;
        integers.push(value);
    }
    Ok(integers)
}
