use crate::libgeoguess::options::CHOICES;
use crate::libgeoguess::session::{Event, Round, Session, SessionState, Summary, Verdict};
use crate::Error;
use colored::Colorize;
#[cfg(feature = "kittygfx")]
use kitty_image::{Action, Command, WrappedCommand};
use log::{debug, warn};
use rand::Rng;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use text_io::try_read;

#[derive(Debug, PartialEq)]
enum Choice {
    Option(usize),
    Quit,
    Invalid,
}

impl Choice {
    fn from_str(choices_count: usize, input: &str) -> Choice {
        match input.trim() {
            "q" => Choice::Quit,
            input => match input.parse::<usize>() {
                Ok(num) if (1..=choices_count).contains(&num) => Choice::Option(num - 1),
                Ok(_) => {
                    println!(
                        "{}",
                        format!("There are only {} options available!", choices_count)
                            .bright_red()
                    );
                    Choice::Invalid
                }
                Err(_) => Choice::Invalid,
            },
        }
    }
}

/// Plays until the player exits or `input` runs dry.
pub fn cli_loop<R: Rng, B: BufRead>(
    mut session: Session<R>,
    assets: &Path,
    input: &mut B,
) -> Result<(), Error> {
    loop {
        let event = match session.state() {
            SessionState::NotStarted => main_menu(input),
            SessionState::AwaitingChoice(round) => ask(input, round, assets),
            SessionState::Answered(round, verdict) => show_verdict(input, round, verdict),
            SessionState::Finished(summary) => game_over(input, summary),
            SessionState::Exited => return Ok(()),
        };
        let Some(event) = event else {
            continue;
        };
        debug!("[CLI] event: {:?}", event);

        if let Err(err) = session.handle(event) {
            warn!("[CLI] {}", err);
            println!("{}", err.to_string().bright_red());
        }
    }
}

/// Reads one trimmed line. `None` once the input is closed.
fn prompt<B: BufRead>(input: &mut B, text: &str) -> Option<String> {
    print!("{} ", text.cyan());
    io::stdout().flush().ok();
    match input.fill_buf() {
        Ok([]) => {
            println!();
            debug!("[CLI] End of input");
            return None;
        }
        Ok(_) => {}
        Err(err) => {
            warn!("[CLI] Cannot read input: {}", err);
            return None;
        }
    }

    let mut bytes = input.by_ref().bytes().map_while(Result::ok);
    let line: Result<String, text_io::Error> = try_read!("{}\n", bytes);
    match line {
        Ok(line) => Some(line.trim().to_string()),
        Err(err) => {
            debug!("[CLI] Unreadable line: {}", err);
            Some(String::new())
        }
    }
}

fn main_menu<B: BufRead>(input: &mut B) -> Option<Event> {
    println!("{}", "==========> Welcome to GeoGuess Game <==========".cyan());
    match prompt(input, "s to start, q to exit:").as_deref() {
        None | Some("q") => Some(Event::Exit),
        Some("" | "s") => Some(Event::Start),
        Some(_) => None,
    }
}

fn ask<B: BufRead>(input: &mut B, round: &Round, assets: &Path) -> Option<Event> {
    let leading = format!("{}/{}. ", round.number(), round.total());
    println!(
        "{}{}",
        leading.cyan(),
        "Where is this place?".black().bold().on_white()
    );
    show_image(&round.item().image_path(assets));

    let indent = " ".repeat(leading.len());
    let labels = round.options().labels();
    for (i, label) in labels.iter().enumerate() {
        println!("{}{}. {}", indent, format!("{}", i + 1).bold(), label);
    }

    let Some(answer) = prompt(input, &format!("Answer (1-{}, q to stop the game):", CHOICES))
    else {
        return Some(Event::StopEarly);
    };
    match Choice::from_str(CHOICES, &answer) {
        Choice::Option(idx) => Some(Event::Select(labels[idx].clone())),
        Choice::Quit => Some(Event::StopEarly),
        Choice::Invalid => None,
    }
}

fn show_verdict<B: BufRead>(input: &mut B, round: &Round, verdict: &Verdict) -> Option<Event> {
    if verdict.correct {
        println!("{}", "You are correct! Well done!".bright_green());
    } else {
        println!(
            "{}",
            format!(
                "Oops! The correct answer was: {}. {}. Better luck next time!",
                round.options().correct_index() + 1,
                verdict.correct_label
            )
            .bright_red()
        );
    }
    println!("{}", format!("Score: {}", round.score()).magenta());

    match prompt(input, "n for the next place, q to stop the game:").as_deref() {
        None | Some("q") => Some(Event::StopEarly),
        Some("" | "n") => Some(Event::Advance),
        Some(_) => None,
    }
}

fn game_over<B: BufRead>(input: &mut B, summary: &Summary) -> Option<Event> {
    if summary.stopped_early {
        println!("{}", "Quitting Early!".cyan());
    }
    println!(
        "{}",
        format!(
            "Game Over! Your final score is: {} ({} of {} answered)",
            summary.score, summary.answered, summary.total
        )
        .cyan()
        .bold()
    );
    match prompt(input, "r to restart, q to exit:").as_deref() {
        None | Some("q") => Some(Event::Exit),
        Some("r") => Some(Event::Restart),
        Some(_) => None,
    }
}

#[cfg(feature = "kittygfx")]
fn show_image(path: &Path) {
    if let Err(err) = draw_with_kitty(path) {
        warn!("[CLI] Cannot draw {:?}: {}", path, err);
        println!("{}", format!("[{}]", path.display()).dimmed());
    }
}

#[cfg(not(feature = "kittygfx"))]
fn show_image(path: &Path) {
    println!("{}", format!("[{}]", path.display()).dimmed());
}

/// Scales the picture to at most 800x400 and sends it to the terminal as a PNG file.
#[cfg(feature = "kittygfx")]
fn draw_with_kitty(path: &Path) -> Result<(), Error> {
    let scaled = image::open(path)?.resize(800, 400, image::imageops::FilterType::Triangle);
    let staged = std::env::temp_dir().join("geoguess-current.png");
    scaled.save(&staged)?;
    debug!("path at {staged:?}");

    let (width, height) = image::image_dimensions(&staged)?;
    let action = Action::TransmitAndDisplay(
        kitty_image::ActionTransmission {
            format: kitty_image::Format::Png,
            medium: kitty_image::Medium::File,
            width,
            height,
            ..Default::default()
        },
        kitty_image::ActionPut::default(),
    );
    let command = WrappedCommand::new(Command::with_payload_from_path(action, &staged));
    println!("{command}");
    print!("{}", "\n".repeat(height as usize / 20));
    Ok(())
}
