//! Command-line interface definition.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "genmedia",
    version,
    about = "Invoke generative-media tools through one calling convention"
)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.genmedia/config.toml
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the registered tools
    Tools,

    /// Print the JSON Schema of a tool's arguments
    Schema {
        /// Tool identifier, e.g. fastSvdLcm
        tool: String,
    },

    /// Run one tool and print its normalized result
    Invoke {
        /// Tool identifier, e.g. briaBackgroundRemove
        tool: String,
        /// JSON arguments, or `-` to read them from stdin
        args: String,
    },

    /// Show the tool badges for a chat message
    Badges {
        /// Message JSON file ({"parts": [...]}), or `-` for stdin
        message: PathBuf,
    },

    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
