// CLI module for argument parsing
use crate::size::parse_size;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Dropview - preview files on either side of a peer-to-peer transfer
///
/// Prints preview sets as JSON on stdout; logs go to stderr.
#[derive(Parser, Debug, Clone)]
#[command(name = "dropview")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Build the sender-side preview of a local file
    Send {
        /// File to preview
        file: PathBuf,

        /// Declared media type (guessed from the extension if omitted)
        #[arg(short = 't', long = "type")]
        media_type: Option<String>,
    },

    /// Build the receiver-side preview of received content
    Receive {
        /// File holding the received bytes
        #[arg(required_unless_present = "reference", conflicts_with = "reference")]
        file: Option<PathBuf>,

        /// Declared media type of the received bytes (guessed from the extension if omitted)
        #[arg(short = 't', long = "type")]
        media_type: Option<String>,

        /// Treat the input as a remote reference instead of content
        #[arg(long = "reference")]
        reference: Option<String>,

        /// Decoded connection token, as read from the sender's QR code
        #[arg(long = "token")]
        token: Option<String>,
    },

    /// Format byte counts (e.g., "1536", "5MB")
    Size {
        #[arg(required = true)]
        sizes: Vec<String>,
    },
}

/// What the receiving side was handed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveInput {
    File(PathBuf),
    Reference(String),
}

/// Validated action derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No subcommand: show usage
    Home,
    Send {
        file: PathBuf,
        media_type: Option<String>,
    },
    Receive {
        input: ReceiveInput,
        media_type: Option<String>,
        token: Option<String>,
    },
    Size {
        sizes: Vec<u64>,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            None => Ok(()),
            Some(Command::Send { file, .. }) => validate_file(file),
            Some(Command::Receive {
                file, reference, ..
            }) => match (file, reference) {
                (Some(file), None) => validate_file(file),
                (None, Some(_)) => Ok(()),
                _ => Err("Provide either a file or --reference, not both".to_string()),
            },
            Some(Command::Size { sizes }) => {
                for size in sizes {
                    if parse_size(size).is_none() {
                        return Err(format!(
                            "Invalid size format: '{}'. Use format like '1536', '5MB', '1GB'",
                            size
                        ));
                    }
                }
                Ok(())
            }
        }
    }
}

fn validate_file(file: &Path) -> Result<(), String> {
    if !file.exists() {
        return Err(format!("File does not exist: {}", file.display()));
    }

    if !file.is_file() {
        return Err(format!("Path is not a file: {}", file.display()));
    }

    Ok(())
}

impl From<Args> for Action {
    fn from(args: Args) -> Self {
        match args.command {
            None => Action::Home,
            Some(Command::Send { file, media_type }) => Action::Send { file, media_type },
            Some(Command::Receive {
                file,
                media_type,
                reference,
                token,
            }) => {
                let input = match (file, reference) {
                    (Some(file), _) => ReceiveInput::File(file),
                    (None, Some(reference)) => ReceiveInput::Reference(reference),
                    (None, None) => ReceiveInput::Reference(String::new()),
                };
                Action::Receive {
                    input,
                    media_type,
                    token,
                }
            }
            Some(Command::Size { sizes }) => Action::Size {
                sizes: sizes.iter().filter_map(|s| parse_size(s)).collect(),
            },
        }
    }
}
