use std::path::PathBuf;

use clap::{Parser, Subcommand};

use gitlink::config::GitlinkConfig;
use gitlink::flows::{self, OpenTarget};
use gitlink::git::{self, GitError};
use gitlink::prompt::ConsolePrompt;
use gitlink::store::RepositoryStore;
use gitlink::styling::info_message;

#[derive(Parser)]
#[command(name = "gitlink", version, about = "Jump between GitHub URLs and local checkouts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a GitHub URL to a synchronized local checkout
    ///
    /// Prints the local path (and line selection, if the URL carries one)
    /// to stdout. Prompts and progress go to stderr, so the output is safe
    /// to capture: `$EDITOR $(gitlink open <URL>)`.
    Open {
        /// GitHub repository or file URL
        url: String,
    },

    /// Generate a GitHub URL for a local file
    Link {
        /// File inside a checkout with a GitHub remote
        file: PathBuf,

        /// Line selection, e.g. `12` or `10-20`
        #[arg(short, long)]
        lines: Option<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => {}
        Err(e) => {
            if matches!(e.downcast_ref::<GitError>(), Some(GitError::Cancelled)) {
                anstream::eprintln!("{}", info_message("Cancelled, nothing changed"));
            } else {
                anstream::eprintln!("{e}");
            }
            std::process::exit(git::exit_code(&e));
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = GitlinkConfig::load()?;
    let ui = ConsolePrompt::new();

    match cli.command {
        Commands::Open { url } => {
            let store = RepositoryStore::new(&config);
            let target = flows::open_link(&url, &config, &store, &ui)?;
            print_target(&target);
        }
        Commands::Link { file, lines } => {
            let selection = lines.as_deref().map(parse_lines).transpose()?;
            let url = flows::generate_link(&file, selection, &config, &ui)?;
            anstream::println!("{url}");
        }
    }
    Ok(())
}

fn print_target(target: &OpenTarget) {
    match &target.file_path {
        Some(file) => match (target.start_line, target.end_line) {
            (Some(s), Some(e)) => anstream::println!("{}:{}-{}", file.display(), s, e),
            (Some(s), None) => anstream::println!("{}:{}", file.display(), s),
            _ => anstream::println!("{}", file.display()),
        },
        None => anstream::println!("{}", target.repo_path.display()),
    }
}

/// Parse `12` or `10-20` into an inclusive selection.
fn parse_lines(input: &str) -> anyhow::Result<(u32, u32)> {
    let parse_one = |s: &str| -> anyhow::Result<u32> {
        let n: u32 = s.trim().parse()?;
        anyhow::ensure!(n > 0, "line numbers start at 1");
        Ok(n)
    };
    match input.split_once('-') {
        Some((start, end)) => {
            let (start, end) = (parse_one(start)?, parse_one(end)?);
            anyhow::ensure!(start <= end, "line range is reversed: {input}");
            Ok((start, end))
        }
        None => {
            let line = parse_one(input)?;
            Ok((line, line))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        assert_eq!(parse_lines("12").unwrap(), (12, 12));
        assert_eq!(parse_lines("10-20").unwrap(), (10, 20));
        assert!(parse_lines("20-10").is_err());
        assert!(parse_lines("0").is_err());
        assert!(parse_lines("abc").is_err());
    }
}
