//! veil CLI - operate the identifier ⇄ token codec from the command line
//!
//! This binary provides command-line interfaces for:
//! - encode: numeric ids → tokens
//! - decode: tokens → numeric ids
//! - transform: run the payload transform over a whole JSON document

use clap::{Args, Parser, Subcommand, ValueEnum};
use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use veil_codec::{CodecConfig, IdCodec, VeilCodec};
use veil_transform::{Decoder, Encoder, KeyMatcher, KeyPattern};

#[derive(Parser)]
#[command(name = "veil")]
#[command(about = "Reversible identifier obfuscation CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct CodecArgs {
    /// Salt keying the token alphabet
    #[arg(long, default_value = "")]
    salt: String,
    /// Minimum token length (shorter tokens are padded)
    #[arg(long, default_value = "0")]
    min_length: usize,
    /// Custom token alphabet (at least 16 unique characters)
    #[arg(long)]
    alphabet: Option<String>,
}

impl CodecArgs {
    fn build(&self) -> Result<VeilCodec, veil_codec::ConfigError> {
        let mut config = CodecConfig {
            salt: self.salt.clone(),
            min_length: self.min_length,
            ..CodecConfig::default()
        };
        if let Some(alphabet) = &self.alphabet {
            config.alphabet = alphabet.clone();
        }
        VeilCodec::new(&config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encode numeric ids into tokens, one per line
    ///
    /// Examples:
    ///   veil encode 42
    ///   veil encode 1 2 3 --salt my-service --min-length 8
    Encode {
        /// Identifiers to encode
        #[arg(required = true)]
        ids: Vec<u64>,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Decode tokens back into numeric ids, one per line
    ///
    /// A token that does not decode is a hard error.
    Decode {
        /// Tokens to decode
        #[arg(required = true)]
        tokens: Vec<String>,
        #[command(flatten)]
        codec: CodecArgs,
    },
    /// Transform a whole JSON document (file or stdin)
    ///
    /// Examples:
    ///   veil transform --direction encode --input response.json
    ///   cat body.json | veil transform --direction decode --salt my-service
    Transform {
        /// Direction of the transform
        #[arg(long, value_enum)]
        direction: Direction,
        /// Input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Replace the built-in naming convention with a custom regex
        #[arg(long, conflicts_with = "no_pattern")]
        pattern: Option<String>,
        /// Disable the naming convention; only --key names classify
        #[arg(long)]
        no_pattern: bool,
        /// Extra key names always treated as identifier-bearing (repeatable)
        #[arg(long = "key")]
        keys: Vec<String>,
        #[command(flatten)]
        codec: CodecArgs,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Direction {
    Encode,
    Decode,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { ids, codec } => {
            let codec = codec.build()?;
            for id in ids {
                println!("{}", codec.encode(id));
            }
            Ok(())
        }
        Commands::Decode { tokens, codec } => {
            let codec = codec.build()?;
            for token in tokens {
                match codec.decode(&token) {
                    Some(id) => println!("{id}"),
                    None => return Err(format!("token '{token}' does not decode").into()),
                }
            }
            Ok(())
        }
        Commands::Transform {
            direction,
            input,
            output,
            pattern,
            no_pattern,
            keys,
            codec,
        } => run_transform(direction, input, output, pattern, no_pattern, keys, &codec),
    }
}

fn run_transform(
    direction: Direction,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    pattern: Option<String>,
    no_pattern: bool,
    keys: Vec<String>,
    codec_args: &CodecArgs,
) -> Result<(), Box<dyn Error>> {
    let codec: Arc<VeilCodec> = Arc::new(codec_args.build()?);
    let pattern = if no_pattern {
        KeyPattern::Disabled
    } else if let Some(pattern) = pattern {
        KeyPattern::Custom(Regex::new(&pattern)?)
    } else {
        KeyPattern::Default
    };
    let matcher = Arc::new(KeyMatcher::new(pattern, keys));

    let raw = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let payload: Value = serde_json::from_str(&raw)?;

    let transformed = match direction {
        Direction::Encode => Encoder::new(matcher, codec).encode_payload(&payload),
        Direction::Decode => Decoder::new(matcher, codec).decode_payload(&payload)?,
    };

    let mut rendered = serde_json::to_string_pretty(&transformed)?;
    rendered.push('\n');
    match output {
        Some(path) => fs::write(path, rendered)?,
        None => print!("{rendered}"),
    }
    Ok(())
}
