use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;

use pandoc_tree::{Config, RenderError, SchemaVersion, Token};

mod cli;
use cli::{Cli, Commands, SchemaArg};

fn read_all(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(p) => fs::read_to_string(p),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn start_dir_for(input_path: &Option<PathBuf>) -> io::Result<PathBuf> {
    if let Some(p) = input_path {
        Ok(p.parent().unwrap_or(Path::new(".")).to_path_buf())
    } else {
        std::env::current_dir()
    }
}

fn load_config(explicit: Option<&Path>, file: &Option<PathBuf>) -> io::Result<Config> {
    let start_dir = start_dir_for(file)?;
    let (cfg, cfg_path) = pandoc_tree::config::load(explicit, &start_dir)?;

    if let Some(path) = &cfg_path {
        log::debug!("Using config from: {}", path.display());
    } else {
        log::debug!("Using default config");
    }
    Ok(cfg)
}

fn read_tokens(file: Option<&PathBuf>) -> io::Result<Vec<Token>> {
    let input = read_all(file)?;
    pandoc_tree::token::tokens_from_json(&input)
        .map_err(|e| invalid_data(RenderError::Tokens(e)))
}

fn invalid_data(e: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            file,
            schema,
            breaks,
            pretty,
            output,
        } => {
            let mut cfg = load_config(cli.config.as_deref(), &file)?;
            if let Some(schema) = schema {
                cfg.schema = match schema {
                    SchemaArg::Legacy => SchemaVersion::Legacy,
                    SchemaArg::Current => SchemaVersion::Current,
                };
            }
            cfg.breaks |= breaks;
            cfg.pretty |= pretty;

            let tokens = read_tokens(file.as_ref())?;
            let mut json = pandoc_tree::render(&tokens, &cfg).map_err(invalid_data)?;
            json.push('\n');

            if let Some(path) = &output {
                fs::write(path, &json)?;
                log::info!("Wrote {}", path.display());
            } else {
                io::stdout().write_all(json.as_bytes())?;
            }
            Ok(())
        }
        Commands::Tree { file, breaks } => {
            let mut cfg = load_config(cli.config.as_deref(), &file)?;
            cfg.breaks |= breaks;

            let tokens = read_tokens(file.as_ref())?;
            let document = pandoc_tree::convert(&tokens, &cfg).map_err(invalid_data)?;
            println!("{:#?}", document);
            Ok(())
        }
    }
}
