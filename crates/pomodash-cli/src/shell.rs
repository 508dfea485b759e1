//! Line parser for the interactive session.

use std::path::PathBuf;

pub const HELP: &str = "\
commands:
  task <text>        capture the task for the next cycle
  start | resume     start a cycle, or resume a paused one
  pause              pause the countdown
  end                end the cycle early
  finish <text>      record a reflection and log the session
  reset              discard the current cycle
  duration <min>     change the cycle duration (idle only)
  status             print the current state
  log                print the session log, newest first
  summary            print session totals
  export <path>      write the session log to a JSON file
  help               show this help
  quit               leave the session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Task(String),
    Start,
    Resume,
    Pause,
    End,
    Finish(String),
    Reset,
    Duration(u32),
    Status,
    Log,
    Summary,
    Export(PathBuf),
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
///
/// Text arguments are passed through untrimmed beyond the separating space;
/// the engine decides whether they are acceptable.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim_start();
    if line.trim().is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "task" => ShellCommand::Task(rest.to_string()),
        "start" => ShellCommand::Start,
        "resume" => ShellCommand::Resume,
        "pause" => ShellCommand::Pause,
        "end" => ShellCommand::End,
        "finish" => ShellCommand::Finish(rest.to_string()),
        "reset" => ShellCommand::Reset,
        "duration" => {
            let minutes = rest
                .trim()
                .parse::<u32>()
                .map_err(|_| format!("duration expects whole minutes, got '{}'", rest.trim()))?;
            ShellCommand::Duration(minutes)
        }
        "status" => ShellCommand::Status,
        "log" => ShellCommand::Log,
        "summary" => ShellCommand::Summary,
        "export" => {
            let path = rest.trim();
            if path.is_empty() {
                return Err("export expects a file path".into());
            }
            ShellCommand::Export(PathBuf::from(path))
        }
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}
