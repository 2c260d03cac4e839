use std::env;
use std::fs;

use anyhow::{bail, Context, Result};
use bbpe::Tokenizer;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: encode_json <tokenizer.json> [max_length] <text>...");
    };
    let data = fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    let tokenizer = Tokenizer::from_json_str(&data)
        .with_context(|| format!("failed to build tokenizer from {path}"))?;

    let mut rest: Vec<String> = args.collect();
    let max_length = match rest.first().map(|arg| arg.parse::<usize>()) {
        Some(Ok(max_length)) => {
            rest.remove(0);
            max_length
        }
        _ => tokenizer.options().max_length,
    };

    let text = rest.join(" ");
    let encoding = tokenizer.encode_with_mask(&text, Some(max_length));
    tracing::info!(
        attended = encoding.attended(),
        max_length,
        pieces = ?tokenizer.tokenize(&text),
        "encoded text"
    );
    println!("{}", serde_json::to_string(&encoding)?);
    Ok(())
}
