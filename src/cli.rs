use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pandoc-tree")]
#[command(author, version)]
#[command(about = "Convert markdown-it token streams into Pandoc JSON")]
#[command(
    long_about = "pandoc-tree reads the JSON form of a markdown-it token stream \
    (JSON.stringify(md.parse(src, env))) and writes the equivalent Pandoc document AST as \
    JSON, ready for `pandoc -f json`. Both the legacy array schema and the current \
    pandoc-api-version 1.23 schema are supported."
)]
#[command(after_help = "\
EXAMPLES:

    # Convert a token dump to legacy Pandoc JSON
    pandoc-tree convert tokens.json

    # Convert from stdin to the current schema and hand it to pandoc
    node dump-tokens.js doc.md | pandoc-tree convert --schema current | pandoc -f json -t html

    # Inspect the reconstructed tree
    pandoc-tree tree tokens.json

CONFIGURATION:

pandoc-tree looks for configuration files in this order:
  1. Explicit --config path
  2. pandoc-tree.toml or .pandoc-tree.toml in current/parent directories
  3. ~/.config/pandoc-tree/config.toml (XDG)
  4. Built-in defaults

Example .pandoc-tree.toml:

    schema = \"current\"
    breaks = false
    pretty = true

    [tokenizer]
    html = true
    lang_prefix = \"language-\"")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, global = true)]
    #[arg(help = "Path to configuration file")]
    #[arg(
        long_help = "Path to a custom configuration file. If not specified, pandoc-tree will \
        search for .pandoc-tree.toml or pandoc-tree.toml in the input's directory and its \
        parents, then fall back to ~/.config/pandoc-tree/config.toml."
    )]
    pub config: Option<PathBuf>,
}

/// Output schema accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SchemaArg {
    /// `[{"unMeta":{}}, blocks]`
    Legacy,
    /// `{"pandoc-api-version":[1,23],"meta":{},"blocks":[...]}`
    Current,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a token stream to Pandoc JSON
    #[command(
        long_about = "Convert the JSON form of a markdown-it token stream into a Pandoc JSON \
        document. By default, writes compact JSON to stdout. Command-line flags take precedence \
        over the configuration file."
    )]
    #[command(after_help = "\
EXAMPLES:

    # Convert to stdout
    pandoc-tree convert tokens.json

    # Convert from stdin
    cat tokens.json | pandoc-tree convert

    # Current schema, pretty-printed, into a file
    pandoc-tree convert --schema current --pretty --output doc.json tokens.json

    # Treat single newlines as hard line breaks
    pandoc-tree convert --breaks tokens.json")]
    Convert {
        /// Input file (stdin if not provided)
        #[arg(help = "Input token JSON file")]
        #[arg(
            long_help = "Path to a JSON file holding a markdown-it token array. If not \
            provided, reads from stdin."
        )]
        file: Option<PathBuf>,

        /// Output schema
        #[arg(long, value_enum)]
        #[arg(help = "Pandoc JSON schema to write")]
        schema: Option<SchemaArg>,

        /// Render soft breaks as hard breaks
        #[arg(long)]
        #[arg(help = "Render soft breaks as LineBreak")]
        breaks: bool,

        /// Pretty-print the output
        #[arg(long)]
        #[arg(help = "Pretty-print the JSON output")]
        pretty: bool,

        /// Write to a file instead of stdout
        #[arg(long, short)]
        #[arg(help = "Output file path")]
        output: Option<PathBuf>,
    },
    /// Build and display the document tree for debugging
    #[command(
        long_about = "Build the document tree from a token stream and print its debug \
        representation. Useful for checking how the level-based nesting of the token stream \
        was reconstructed before any schema is applied."
    )]
    #[command(after_help = "\
EXAMPLES:

    # Show the tree for a token dump
    pandoc-tree tree tokens.json

    # From stdin
    cat tokens.json | pandoc-tree tree")]
    Tree {
        /// Input file (stdin if not provided)
        #[arg(help = "Input token JSON file")]
        file: Option<PathBuf>,

        /// Render soft breaks as hard breaks
        #[arg(long)]
        #[arg(help = "Render soft breaks as LineBreak")]
        breaks: bool,
    },
}
