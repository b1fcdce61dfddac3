//! The interactive console loop.
//!
//! Lines are forgiving the way the tutor is: `3 + 4`, `seven times two`,
//! and `it is five` all parse. Anything else earns a gentle hint.

use std::io::{BufRead, Write};

use services::{
    AnswerOutcome, AppServices, NavOutcome, TutorLoopService, TutorPhase, TutorSession,
};
use tutor_core::model::Operation;
use tutor_core::spoken;

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Solve { operation: Operation, a: u32, b: u32 },
    Answer(u32),
    Next,
    Prev,
    Replay,
    Play,
    Quiz,
    Daily,
    QuizMode(bool),
    Stars,
    Help,
    Quit,
}

/// Parses one input line, or `None` when nothing in it makes sense.
#[must_use]
pub fn parse_command(line: &str) -> Option<ReplCommand> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => None,
        ["quit" | "exit" | "q"] => Some(ReplCommand::Quit),
        ["help" | "h" | "?"] => Some(ReplCommand::Help),
        ["next" | "n"] => Some(ReplCommand::Next),
        ["back" | "prev" | "b"] => Some(ReplCommand::Prev),
        ["again" | "replay"] => Some(ReplCommand::Replay),
        ["play"] => Some(ReplCommand::Play),
        ["quiz"] => Some(ReplCommand::Quiz),
        ["quiz", "on"] => Some(ReplCommand::QuizMode(true)),
        ["quiz", "off"] => Some(ReplCommand::QuizMode(false)),
        ["daily"] => Some(ReplCommand::Daily),
        ["stars"] => Some(ReplCommand::Stars),
        words => {
            parse_solve(words).or_else(|| spoken::parse_number(line).map(ReplCommand::Answer))
        }
    }
}

/// Reads `<number> <operation> <number>`, with multi-word operations like
/// "divided by" in the middle.
fn parse_solve(words: &[&str]) -> Option<ReplCommand> {
    let [first, middle @ .., last] = words else {
        return None;
    };
    if middle.is_empty() {
        return None;
    }
    let a = spoken::parse_number(first)?;
    let b = spoken::parse_number(last)?;
    let operation = middle.join(" ").parse::<Operation>().ok()?;
    Some(ReplCommand::Solve { operation, a, b })
}

/// Runs the loop until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only when stdin or stdout fails.
pub async fn run(services: &AppServices) -> std::io::Result<()> {
    let tutor = services.tutor();
    let mut session = tutor.new_session().await;
    let mut quiz_mode = false;

    println!("Hi! Let's do some math together.");
    print_help();

    loop {
        print!("\n> ");
        std::io::stdout().flush()?;
        let Some(line) = read_line().await? else {
            break;
        };
        let Some(command) = parse_command(&line) else {
            if !line.trim().is_empty() {
                println!("I didn't catch that. Type `help` to see what I understand.");
            }
            continue;
        };
        if !dispatch(&tutor, &mut session, &mut quiz_mode, command).await {
            break;
        }
    }

    println!("Bye! Come back soon.");
    Ok(())
}

/// Handles one command; returns `false` on `quit`.
async fn dispatch(
    tutor: &TutorLoopService,
    session: &mut TutorSession,
    quiz_mode: &mut bool,
    command: ReplCommand,
) -> bool {
    match command {
        ReplCommand::Quit => return false,
        ReplCommand::Help => print_help(),
        ReplCommand::Stars => print_stars(session),
        ReplCommand::QuizMode(on) => {
            *quiz_mode = on;
            if on {
                println!("Quiz-first mode is on: I'll ask you before I explain.");
            } else {
                println!("Quiz-first mode is off.");
            }
        }
        ReplCommand::Solve { operation, a, b } => {
            tutor.submit(session, operation, a, b, *quiz_mode).await;
        }
        ReplCommand::Answer(value) => answer_with(tutor, session, value).await,
        ReplCommand::Next => {
            if tutor.next(session).await == NavOutcome::Ignored {
                print_no_lesson_hint();
            }
        }
        ReplCommand::Prev => match tutor.prev(session) {
            NavOutcome::AtStart => println!("We're already at the first step."),
            NavOutcome::Ignored => print_no_lesson_hint(),
            _ => {}
        },
        ReplCommand::Replay => {
            if tutor.replay(session) == NavOutcome::Ignored {
                print_no_lesson_hint();
            }
        }
        ReplCommand::Play => {
            if tutor.play(session).await == NavOutcome::Ignored {
                print_no_lesson_hint();
            }
        }
        ReplCommand::Quiz => tutor.start_quiz(session).await,
        ReplCommand::Daily => tutor.start_daily(session).await,
    }
    true
}

async fn answer_with(tutor: &TutorLoopService, session: &mut TutorSession, value: u32) {
    if session.phase() != TutorPhase::Quizzing {
        println!("There's no question waiting. Give me a problem like `3 + 4`.");
        return;
    }
    let Some(choice) = choice_for(session, value) else {
        println!("Pick one of the answers shown, or its number.");
        return;
    };
    if tutor.answer(session, choice).await == AnswerOutcome::Ignored {
        println!("That one's already crossed out. Try another!");
    }
}

/// Maps typed input onto an option slot: by value first, then by 1-based
/// position. Value wins when both could apply.
fn choice_for(session: &TutorSession, value: u32) -> Option<usize> {
    let round = session.round()?;
    let options = round.question().options();
    if let Some(index) = options.iter().position(|&option| option == value) {
        return Some(index);
    }
    match value {
        1..=3 => usize::try_from(value - 1).ok(),
        _ => None,
    }
}

fn print_stars(session: &TutorSession) {
    let progress = session.progress();
    println!();
    println!("⭐ {} stars", progress.stars());
    let streak = progress.daily_streak();
    if streak > 0 {
        println!("🔥 {streak}-day streak");
    }
}

fn print_no_lesson_hint() {
    println!("Give me a problem first, like `3 + 4`.");
}

fn print_help() {
    println!();
    println!("Things you can say:");
    println!("  3 + 4            explain a problem (+, -, x, ÷ — words work too)");
    println!("  next / back      move through the explanation");
    println!("  again            repeat the current step");
    println!("  play             run the whole explanation");
    println!("  quiz             practice questions");
    println!("  quiz on|off      ask me first before explaining");
    println!("  daily            today's challenge");
    println!("  stars            show your stars");
    println!("  quit             leave");
}

async fn read_line() -> std::io::Result<Option<String>> {
    tokio::task::spawn_blocking(|| -> std::io::Result<Option<String>> {
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line)? == 0 {
            Ok(None)
        } else {
            Ok(Some(line))
        }
    })
    .await
    .map_err(std::io::Error::other)?
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
