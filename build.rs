use clap::{Command, CommandFactory};
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::io::Result;
use std::path::Path;

#[path = "src/cli.rs"]
mod cli;

const BIN_NAME: &str = "pandoc-tree";
const SHELLS: [Shell; 5] = [
    Shell::Bash,
    Shell::Fish,
    Shell::Zsh,
    Shell::PowerShell,
    Shell::Elvish,
];

fn render_man(cmd: Command, title: Option<&str>) -> Result<String> {
    let mut man = Man::new(cmd);
    if let Some(title) = title {
        man = man.title(title);
    }
    let mut buffer = Vec::new();
    man.render(&mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// `pandoc-tree.1` plus `pandoc-tree-<sub>.1` for `convert` and `tree`.
fn write_man_pages(out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)?;
    let cmd = cli::Cli::command();
    fs::write(out_dir.join(format!("{BIN_NAME}.1")), render_man(cmd.clone(), None)?)?;

    for sub in cmd.get_subcommands().filter(|sub| sub.get_name() != "help") {
        let name = sub.get_name();
        let title = format!("{BIN_NAME}-{name}");
        // Synopsis should show the full invocation, not the bare subcommand.
        let page = render_man(sub.clone(), Some(&title))?.replace(
            &format!("\\fB{name}\\fR"),
            &format!("\\fB{BIN_NAME} {name}\\fR"),
        );
        fs::write(out_dir.join(format!("{title}.1")), page)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    if let Some(out_dir) = env::var_os("OUT_DIR") {
        let mut cmd = cli::Cli::command();
        for shell in SHELLS {
            generate_to(shell, &mut cmd, BIN_NAME, &out_dir)?;
        }
    }

    write_man_pages(Path::new("target/man"))?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
