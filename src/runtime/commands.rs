use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

/// Control requests, one per user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play(PathBuf),
    /// Play a listed entry of the current view by its name.
    Select(String),
    Pause,
    Resume,
    TogglePause,
    Stop,
    Seek(Duration),
    /// Volume in percent.
    Volume(u8),
    VolumeUp,
    VolumeDown,
    ToggleMute,
    Random,
    Next,
    /// Browse `collection/year/show`, each part optional.
    List(Vec<String>),
    /// Point the library at another folder.
    Root(PathBuf),
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  ls [collection[/year[/show]]]   browse the library
  select <name>                   play an entry of the current list
  root <folder>                   use another library folder
  play <path>                     play a file
  pause | resume | p              pause / resume / toggle
  stop                            stop playback
  seek <seconds>                  jump within the track
  vol <0-100> | + | -             set or nudge the volume
  mute                            toggle mute
  random                          play something at random
  next                            skip to the next track
  status                          show what is playing
  quit";

/// Parse one input line; `None` for blank or unknown input.
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };

    let cmd = match word {
        "play" if !rest.is_empty() => Command::Play(PathBuf::from(rest)),
        "select" | "s" if !rest.is_empty() => Command::Select(rest.to_string()),
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "p" | "toggle" => Command::TogglePause,
        "stop" => Command::Stop,
        "seek" => {
            let secs = rest.parse::<f64>().ok().filter(|s| s.is_finite() && *s >= 0.0)?;
            Command::Seek(Duration::from_secs_f64(secs))
        }
        "vol" | "volume" => Command::Volume(rest.parse::<u8>().ok().filter(|v| *v <= 100)?),
        "+" => Command::VolumeUp,
        "-" => Command::VolumeDown,
        "mute" | "m" => Command::ToggleMute,
        "random" | "dice" => Command::Random,
        "next" | "n" => Command::Next,
        "ls" | "list" => Command::List(
            rest.split('/')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(3)
                .map(str::to_string)
                .collect(),
        ),
        "root" if !rest.is_empty() => Command::Root(PathBuf::from(rest)),
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(cmd)
}

/// Read commands from stdin on a background thread until EOF or `quit`.
pub fn spawn_stdin_reader(tx: Sender<Command>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(err) => {
                    warn!(error = %err, "stdin closed");
                    break;
                }
            };
            let Some(cmd) = parse(&line) else {
                if !line.trim().is_empty() {
                    println!("unknown command: {} (try `help`)", line.trim());
                }
                continue;
            };
            debug!(?cmd, "command");
            let quit = cmd == Command::Quit;
            if tx.send(cmd).is_err() || quit {
                break;
            }
        }
        let _ = tx.send(Command::Quit);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse("play /m/A/1995/x.mp3"), Some(Command::Play("/m/A/1995/x.mp3".into())));
        assert_eq!(parse("  seek 90 "), Some(Command::Seek(Duration::from_secs(90))));
        assert_eq!(parse("vol 250"), None);
        assert_eq!(parse("vol 40"), Some(Command::Volume(40)));
        assert_eq!(parse("select Live at the Fillmore"), Some(Command::Select("Live at the Fillmore".into())));
        assert_eq!(
            parse("ls Grateful Dead/1977/ Cornell "),
            Some(Command::List(vec!["Grateful Dead".into(), "1977".into(), "Cornell".into()]))
        );
        assert_eq!(parse("ls"), Some(Command::List(vec![])));
        assert_eq!(parse("root /srv/music"), Some(Command::Root("/srv/music".into())));
    }

    #[test]
    fn rejects_blank_and_malformed_input() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("play"), None);
        assert_eq!(parse("seek -3"), None);
        assert_eq!(parse("seek soon"), None);
        assert_eq!(parse("seek inf"), None);
        assert_eq!(parse("dance"), None);
    }
}
