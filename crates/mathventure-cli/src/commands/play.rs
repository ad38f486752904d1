//! The `mathventure play` command.
//!
//! Runs the lesson on a single-threaded runtime: learner commands come from
//! stdin, and the active screen's timers fire while waiting for the next line.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use mathventure_core::config::load_config_from;
use mathventure_core::lesson::{lesson_navigator, LessonContext};
use mathventure_core::navigator::{Navigator, ResourceLocator};
use mathventure_core::parser::{parse_question_set, validate_question_set};
use mathventure_core::statistics::unanswered;
use mathventure_core::store::JsonFileStore;
use mathventure_core::traits::{MediaEvent, ScreenInput};

use crate::host::TerminalHost;

/// Upper bound on timer transitions fired for a single clock reading.
const MAX_CHAINED_TIMERS: usize = 32;

const HELP: &str = "\
Commands:
  next | prev | go <n>        move between screens
  pick <option>               choose an option
  enter <text>                type a name or a number
  set r|h <value>             move a slider
  toggle <name>               press a toggle (label, fill, ends)
  play | replay | ended       video controls
  media-error <reason>        simulate a failed video
  action <name>               press a button (start, fill, ahead, deeper, show)
  retake                      retake the quiz
  status | help | quit";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Next,
    Prev,
    Go(usize),
    Input(ScreenInput),
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "next" | "n" => Command::Next,
        "prev" | "p" | "back" => Command::Prev,
        "go" => rest
            .parse()
            .map(Command::Go)
            .map_err(|_| "usage: go <screen number>".to_string())?,
        "pick" if !rest.is_empty() => Command::Input(ScreenInput::select(rest)),
        "pick" => return Err("usage: pick <option>".into()),
        "enter" => Command::Input(ScreenInput::enter(rest)),
        "set" => {
            let usage = || "usage: set r|h <value>".to_string();
            let (control, value) = rest.split_once(char::is_whitespace).ok_or_else(usage)?;
            let value: f64 = value.trim().parse().map_err(|_| usage())?;
            Command::Input(ScreenInput::adjust(control, value))
        }
        "toggle" if !rest.is_empty() => Command::Input(ScreenInput::toggle(rest)),
        "toggle" => return Err("usage: toggle <name>".into()),
        "play" => Command::Input(ScreenInput::media(MediaEvent::Play)),
        "replay" => Command::Input(ScreenInput::media(MediaEvent::Replay)),
        "pause" => Command::Input(ScreenInput::media(MediaEvent::Pause)),
        "ended" => Command::Input(ScreenInput::media(MediaEvent::Ended)),
        "media-error" => {
            let reason = if rest.is_empty() { "unknown error" } else { rest };
            Command::Input(ScreenInput::media(MediaEvent::Error(reason.to_string())))
        }
        "action" if !rest.is_empty() => Command::Input(ScreenInput::action(rest)),
        "action" => return Err("usage: action <name>".into()),
        "retake" | "start" | "fill" | "ahead" | "deeper" | "show" => {
            Command::Input(ScreenInput::action(word))
        }
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{other}'. Type 'help' for commands.")),
    };
    Ok(Some(command))
}

struct Session {
    nav: Navigator<LessonContext>,
    ctx: LessonContext,
}

impl Session {
    /// Handle one line of input. Returns `false` when the learner quits.
    fn handle_line(&mut self, line: &str) -> bool {
        let command = match parse_command(line) {
            Ok(Some(command)) => command,
            Ok(None) => return true,
            Err(message) => {
                println!("{message}");
                return true;
            }
        };
        tracing::debug!(?command, "learner command");

        match command {
            Command::Next => {
                if !self.nav.next(&mut self.ctx) {
                    println!("This is the last screen.");
                }
            }
            Command::Prev => {
                if !self.nav.previous(&mut self.ctx) {
                    println!("This is the first screen.");
                }
            }
            Command::Go(n) => {
                if let Err(e) = self.nav.go_to_screen(n, &mut self.ctx) {
                    println!("{e}");
                }
            }
            Command::Input(input) => {
                if !self.nav.has_active_behavior() {
                    println!("Nothing to interact with on this screen.");
                }
                self.nav.dispatch(&mut self.ctx, &input);
            }
            Command::Status => self.print_status(),
            Command::Help => println!("{HELP}"),
            Command::Quit => return false,
        }
        self.fire_due(Instant::now());
        true
    }

    /// Fire every timer due at `now`, following any screens they open.
    fn fire_due(&mut self, now: Instant) {
        for _ in 0..MAX_CHAINED_TIMERS {
            match self.nav.next_deadline() {
                Some(deadline) if deadline <= now => {
                    self.nav.poll_timers(&mut self.ctx, now);
                }
                _ => return,
            }
        }
        tracing::warn!("timer chain did not settle; continuing");
    }

    fn print_status(&self) {
        let pager = self.nav.pager();
        let score = self.ctx.quiz.score();
        println!("{}", pager.label());
        println!("Learner: {}", self.ctx.learner_name());
        println!(
            "Quiz answers: {}/{}",
            self.ctx.quiz.answers().len(),
            score.total
        );
        let open = unanswered(&self.ctx.quiz_set, &self.ctx.quiz);
        if !open.is_empty() && open.len() < score.total {
            let ids: Vec<String> = open.iter().map(ToString::to_string).collect();
            println!("Unanswered: {}", ids.join(", "));
        }
        if self.ctx.weak_spots().is_empty() {
            println!("Weak spots: none");
        } else {
            println!("Weak spots: {}", self.ctx.weak_spots().join(", "));
        }
    }
}

pub async fn execute(
    config_path: Option<PathBuf>,
    start: usize,
    question_set: Option<PathBuf>,
    instant: bool,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if instant {
        config = config.without_delays();
    }

    let store = JsonFileStore::shared(config.store_path.clone());
    let assets = ResourceLocator::new(config.assets_dir.clone());
    let ctx = match question_set {
        Some(path) => {
            let set = parse_question_set(&path)?;
            for w in validate_question_set(&set) {
                tracing::warn!(question = ?w.question_id, "{}", w.message);
            }
            LessonContext::with_quiz(config, store, set)
        }
        None => LessonContext::new(config, store),
    };

    let nav = lesson_navigator(&ctx, Box::new(TerminalHost::stdout())).with_resources(assets);
    let mut session = Session { nav, ctx };

    println!("Welcome to mathventure! Type 'help' for commands.");
    if start == 1 {
        session.nav.start(&mut session.ctx)?;
    } else {
        session
            .nav
            .go_to_screen(start, &mut session.ctx)
            .with_context(|| format!("cannot start at screen {start}"))?;
    }
    session.fire_due(Instant::now());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = session.nav.next_deadline();
        let wake = deadline
            .map(tokio::time::Instant::from_std)
            .unwrap_or_else(tokio::time::Instant::now);

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read from stdin")? else {
                    break;
                };
                if !session.handle_line(&line) {
                    break;
                }
            }
            _ = tokio::time::sleep_until(wake), if deadline.is_some() => {
                session.fire_due(Instant::now());
            }
        }
    }

    session.nav.shutdown();
    println!("Bye, {}! 👋", session.ctx.learner_name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_navigation() {
        assert_eq!(parse_command("next"), Ok(Some(Command::Next)));
        assert_eq!(parse_command("  prev "), Ok(Some(Command::Prev)));
        assert_eq!(parse_command("go 9"), Ok(Some(Command::Go(9))));
        assert!(parse_command("go nine").is_err());
        assert_eq!(parse_command(""), Ok(None));
    }

    #[test]
    fn parses_screen_inputs() {
        assert_eq!(
            parse_command("pick side-top-bottom"),
            Ok(Some(Command::Input(ScreenInput::select("side-top-bottom"))))
        );
        assert_eq!(
            parse_command("enter Asha Rao"),
            Ok(Some(Command::Input(ScreenInput::enter("Asha Rao"))))
        );
        assert_eq!(
            parse_command("set r 6.5"),
            Ok(Some(Command::Input(ScreenInput::adjust("r", 6.5))))
        );
        assert!(parse_command("set r").is_err());
        assert_eq!(
            parse_command("media-error 404"),
            Ok(Some(Command::Input(ScreenInput::media(MediaEvent::Error(
                "404".into()
            )))))
        );
        assert_eq!(
            parse_command("retake"),
            Ok(Some(Command::Input(ScreenInput::action("retake"))))
        );
    }

    #[test]
    fn rejects_unknown_commands() {
        let err = parse_command("dance").unwrap_err();
        assert!(err.contains("unknown command 'dance'"));
        assert!(parse_command("pick").is_err());
    }
}
