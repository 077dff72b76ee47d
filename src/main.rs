use clap::{CommandFactory, Parser};
use dataforge::cli::{Args, Command, OutputFormat, Shell};
use dataforge::config::Config;
use dataforge::engine::guard::ensure_read_only;
use dataforge::engine::{EngineError, EngineResult, PromptEngine};
use dataforge::format::{TextFormatter, format_entities, format_intents};
use dataforge::logging;
use serde::Serialize;
use std::io::{self, IsTerminal};
use tracing::{debug, error};

fn main() {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        print_completions(shell);
        return;
    }

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(exit_code(&e));
    }
}

/// 2 when the request itself was rejected, 1 for everything else
fn exit_code(error: &EngineError) -> i32 {
    if error.is_client_error() { 2 } else { 1 }
}

fn print_completions(shell: Shell) {
    let mut cmd = Args::command();
    let mut out = io::stdout();
    match shell {
        Shell::Bash => clap_complete::generate(clap_complete::shells::Bash, &mut cmd, "dataforge", &mut out),
        Shell::Zsh => clap_complete::generate(clap_complete::shells::Zsh, &mut cmd, "dataforge", &mut out),
        Shell::Fish => clap_complete::generate(clap_complete::shells::Fish, &mut cmd, "dataforge", &mut out),
        Shell::PowerShell => {
            clap_complete::generate(clap_complete::shells::PowerShell, &mut cmd, "dataforge", &mut out)
        }
        Shell::Elvish => {
            clap_complete::generate(clap_complete::shells::Elvish, &mut cmd, "dataforge", &mut out)
        }
    }
}

fn run(args: Args) -> EngineResult<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let _log_guard = logging::init(&config.logging)?;
    debug!("Dataforge started");

    let Some(command) = args.command.clone() else {
        Args::command().print_help()?;
        return Ok(());
    };

    let json = args.format == OutputFormat::Json;
    let formatter = TextFormatter::new(!args.no_color && io::stdout().is_terminal());

    if let Command::Config = command {
        print!("{}", config.to_documented_toml()?);
        return Ok(());
    }

    if let Command::CheckSql { sql } = &command {
        ensure_read_only(sql)?;
        if json {
            print_json(&serde_json::json!({ "sql": sql, "read_only": true }))?;
        } else {
            println!("OK: statement is read-only");
        }
        return Ok(());
    }

    let engine = PromptEngine::new(config.engine.clone())?;
    let prompt = command.prompt().unwrap_or_default();

    match command {
        Command::Sql { system_prompt, .. } => {
            let response = engine.generate_sql(&prompt)?;
            if json {
                print_json(&response)?;
            } else {
                if system_prompt && let Some(text) = &response.system_prompt {
                    println!("{text}\n");
                }
                print!("{}", formatter.format_sql(&response));
            }
        }
        Command::Transform { .. } => {
            let response = engine.generate_transform(&prompt)?;
            if json {
                print_json(&response)?;
            } else {
                print!("{}", formatter.format_transform(&response));
            }
        }
        Command::Quality { .. } => {
            let response = engine.generate_quality(&prompt)?;
            if json {
                print_json(&response)?;
            } else {
                print!("{}", formatter.format_quality(&response));
            }
        }
        Command::Classify { .. } => {
            let ranking = engine.classify(&prompt)?;
            if json {
                print_json(&ranking)?;
            } else {
                println!("{}", format_intents(&ranking));
            }
        }
        Command::Extract { .. } => {
            let entities = engine.extract(&prompt)?;
            if json {
                print_json(&entities)?;
            } else {
                println!("{}", format_entities(&entities));
            }
        }
        Command::CheckSql { .. } | Command::Config => {}
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> EngineResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EngineError::InvalidInput("prompt is empty".into()), 2)]
    #[case(EngineError::UnsafeSql("DROP".into()), 2)]
    #[case(EngineError::Configuration("bad regex".into()), 1)]
    #[case(EngineError::Io(io::Error::other("disk")), 1)]
    fn test_exit_codes(#[case] error: EngineError, #[case] expected: i32) {
        assert_eq!(exit_code(&error), expected);
    }
}
