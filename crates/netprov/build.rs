use std::fs;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::Shell;

// cli.rs only needs clap and clap_complete, both build-dependencies.
#[path = "src/cli.rs"]
#[allow(dead_code)]
mod cli;

const SHELLS: [Shell; 4] = [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell];

fn main() {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir: PathBuf = std::env::var_os("OUT_DIR")
        .expect("OUT_DIR not set by Cargo")
        .into();

    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("failed to create man output directory");
    let cmd = cli::Cli::command();
    write_manpages(&cmd, &man_dir, None);

    // Packagers pick these up next to the man pages.
    let completion_dir = out_dir.join("completions");
    fs::create_dir_all(&completion_dir).expect("failed to create completions directory");
    for shell in SHELLS {
        let mut cmd = cli::Cli::command();
        clap_complete::generate_to(shell, &mut cmd, "netprov", &completion_dir)
            .unwrap_or_else(|e| panic!("failed to write {shell} completions: {e}"));
    }
}

/// `netprov.1`, then `netprov-<sub>.1` for each visible subcommand, recursively.
fn write_manpages(cmd: &clap::Command, dir: &Path, parent: Option<&str>) {
    let page_name = match parent {
        Some(parent) => format!("{parent}-{}", cmd.get_name()),
        None => cmd.get_name().to_owned(),
    };

    let mut page = Vec::new();
    clap_mangen::Man::new(cmd.clone().name(page_name.clone()))
        .render(&mut page)
        .unwrap_or_else(|e| panic!("cannot render {page_name}.1: {e}"));
    let path = dir.join(format!("{page_name}.1"));
    fs::write(&path, page).unwrap_or_else(|e| panic!("cannot write {}: {e}", path.display()));

    cmd.get_subcommands()
        .filter(|sub| !sub.is_hide_set())
        .for_each(|sub| write_manpages(sub, dir, Some(&page_name)));
}
