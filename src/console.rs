//! Terminal play.
//!
//! [`ConsoleDecisions`] answers the engine's questions from a line-based
//! reader and narrates each finished turn to a writer. Anything that is not
//! a valid answer is asked again. When the input closes, the player
//! declines to buy, waits in jail and saves, so a closed terminal never
//! loses the game.
//!
//! The `render_*` functions produce the board and status tables shown
//! between rounds.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use crate::board::{LandingOutcome, Square};
use crate::core::{GameConfig, Player, RandomSource, MAX_PLAYERS, MIN_PLAYERS};
use crate::rules::{Decisions, GameEngine, GameResult, JailChoice, JailOutcome, TurnEvent, TurnReport};

/// Turns reports into sentences. Holds the names it needs so it can work
/// while the engine is busy.
#[derive(Clone, Debug)]
pub struct Narrator {
    players: Vec<String>,
    squares: Vec<String>,
}

impl Narrator {
    pub fn new<R: RandomSource>(engine: &GameEngine<R>) -> Self {
        Self {
            players: engine.players().iter().map(|(_, p)| p.name.clone()).collect(),
            squares: engine.board().squares().iter().map(|s| s.name.clone()).collect(),
        }
    }

    fn square(&self, position: usize) -> &str {
        self.squares.get(position).map_or("?", String::as_str)
    }

    /// One line per event of `report`.
    pub fn lines(&self, report: &TurnReport) -> Vec<String> {
        let name = self.players.get(report.player.index()).map_or("?", String::as_str);
        let mut at = None;
        let mut lines = Vec::with_capacity(report.events.len());

        for event in &report.events {
            let line = match *event {
                TurnEvent::Rolled(roll) => format!("{name} rolled {roll}."),
                TurnEvent::Moved { to } => {
                    at = Some(to);
                    format!("{name} moved to {}.", self.square(to))
                }
                TurnEvent::Landed(outcome) => {
                    let square = at.map_or("?", |p| self.square(p));
                    match outcome {
                        LandingOutcome::NoEffect => match at {
                            Some(p) => format!("{name} landed on {p} {square}. No effect."),
                            None => format!("{name} landed on {square}. No effect."),
                        },
                        LandingOutcome::Bought { price } => format!("{name} bought {square} for ${price}."),
                        LandingOutcome::DeclinedPurchase { price } => {
                            format!("{name} passed on {square} at ${price}.")
                        }
                        LandingOutcome::CannotAfford { price } => {
                            format!("{name} cannot afford {square} at ${price}.")
                        }
                        LandingOutcome::PaidRent { owner, rent } => {
                            let owner = self.players.get(owner.index()).map_or("?", String::as_str);
                            format!("{name} pays ${rent} rent to {owner}.")
                        }
                        LandingOutcome::OwnProperty => format!("{name} already owns {square}."),
                        LandingOutcome::Chance { delta } if delta < 0 => {
                            format!("{name} landed on Chance and lost ${}.", -delta)
                        }
                        LandingOutcome::Chance { delta } => format!("{name} landed on Chance and won ${delta}."),
                        LandingOutcome::Tax { amount } => format!("{name} paid ${amount} in taxes."),
                        LandingOutcome::SentToJail => format!("{name} goes to jail."),
                        LandingOutcome::JailTurnCounted { turns } => {
                            format!("{name} has served {turns} turns in jail.")
                        }
                    }
                }
                TurnEvent::Jail(outcome) => match outcome {
                    JailOutcome::ReleasedOnDoubles(_) => format!("{name} rolled doubles and is out of jail."),
                    JailOutcome::FailedDoubles { turns } => {
                        format!("{name} remains in jail ({turns} turns served).")
                    }
                    JailOutcome::PaidFine { fine } => format!("{name} paid ${fine} and is out of jail."),
                    JailOutcome::FineUnaffordable { turns } => {
                        format!("{name} cannot pay the fine and remains in jail ({turns} turns served).")
                    }
                    JailOutcome::Remained { turns } => format!("{name} remains in jail ({turns} turns served)."),
                    JailOutcome::MandatoryFinePaid { fine } => {
                        format!("{name} paid the ${fine} fine and is out of jail.")
                    }
                    JailOutcome::MandatoryFineUnpaid { fine } => {
                        format!("{name} cannot pay the ${fine} fine and stays in jail.")
                    }
                },
            };
            lines.push(line);
        }
        lines
    }
}

/// A human at a terminal.
pub struct ConsoleDecisions<R, W> {
    input: R,
    output: W,
    narrator: Narrator,
    jail_fine: i64,
    max_jail_turns: u8,
}

impl<R: BufRead, W: Write> ConsoleDecisions<R, W> {
    pub fn new<Rng: RandomSource>(input: R, output: W, engine: &GameEngine<Rng>) -> Self {
        let config: &GameConfig = engine.config();
        Self {
            input,
            output,
            narrator: Narrator::new(engine),
            jail_fine: config.jail_fine,
            max_jail_turns: config.max_jail_turns,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    // Output errors are dropped: a broken terminal shows up as closed input
    // on the next prompt.
    fn say(&mut self, text: &str) {
        let _ = writeln!(self.output, "{text}");
    }

    /// Print `question` and read one trimmed line. `None` once input closes.
    fn prompt(&mut self, question: &str) -> Option<String> {
        let _ = write!(self.output, "{question}");
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn ask_yes_no(&mut self, question: &str) -> Option<bool> {
        loop {
            let answer = self.prompt(question)?;
            match answer.to_ascii_lowercase().as_str() {
                "y" | "yes" => return Some(true),
                "n" | "no" => return Some(false),
                _ => self.say("Please answer y or n."),
            }
        }
    }
}

impl<R: BufRead, W: Write> Decisions for ConsoleDecisions<R, W> {
    fn acknowledge_roll(&mut self, player: &Player) {
        let _ = self.prompt(&format!("{}, press Enter to roll the dice.", player.name));
    }

    fn buy_property(&mut self, player: &Player, square: &Square) -> bool {
        let price = square.deed().map_or(0, |d| d.price);
        let question = format!(
            "{}: {} is unowned. Buy for ${price}? You have ${}. (y/n): ",
            player.name, square.name, player.money
        );
        self.ask_yes_no(&question).unwrap_or(false)
    }

    fn jail_choice(&mut self, player: &Player) -> JailChoice {
        let question = format!(
            "{} is in jail ({} of {} turns served). [r]oll for doubles, [p]ay ${}, or [w]ait: ",
            player.name, player.jail_turns, self.max_jail_turns, self.jail_fine
        );
        loop {
            let Some(answer) = self.prompt(&question) else {
                return JailChoice::Remain;
            };
            match answer.to_ascii_lowercase().as_str() {
                "r" | "roll" | "1" => return JailChoice::AttemptDoubles,
                "p" | "pay" | "2" => return JailChoice::PayFine,
                "w" | "wait" | "3" => return JailChoice::Remain,
                _ => self.say("Please answer r, p or w."),
            }
        }
    }

    fn save_or_continue(&mut self, player: &Player) -> bool {
        self.say(&format!("\n{}'s turn:", player.name));
        let question = format!("{}, would you like to save the game and exit? (y/n): ", player.name);
        self.ask_yes_no(&question).unwrap_or(true)
    }

    fn report(&mut self, report: &TurnReport) {
        for line in self.narrator.lines(report) {
            self.say(&line);
        }
    }
}

/// The board with the initials of active players on their squares.
pub fn render_board<R: RandomSource>(engine: &GameEngine<R>) -> String {
    let mut out = String::from("--- Game Board ---\n");
    for square in engine.board().squares() {
        let markers: String = engine
            .active()
            .iter()
            .map(|id| engine.player(*id))
            .filter(|p| p.position == square.position)
            .filter_map(|p| p.name.chars().next())
            .collect();
        let price = square.deed().map_or_else(|| "N/A".to_string(), |d| format!("${}", d.price));
        let owner = square
            .owner()
            .map(|id| format!(" owned by {}", engine.player(id).name))
            .unwrap_or_default();
        let _ = writeln!(out, "[{} - {price}{owner}] {markers}", square.name);
    }
    out
}

/// Money, position and jail state of every active player.
pub fn render_status<R: RandomSource>(engine: &GameEngine<R>) -> String {
    let mut out = String::from("--- Players Status ---\n");
    for id in engine.active() {
        let p = engine.player(*id);
        let _ = writeln!(
            out,
            "{} - Money: ${}, Position: {}, In Jail: {}",
            p.name,
            p.money,
            p.position,
            if p.in_jail { "yes" } else { "no" }
        );
    }
    out
}

/// Final announcement.
pub fn render_result<R: RandomSource>(engine: &GameEngine<R>, result: &GameResult) -> String {
    let mut out = String::from("Game Over!\n");
    match result {
        GameResult::Winner(id) => {
            let _ = writeln!(out, "The winner is {}!", engine.player(*id).name);
        }
        GameResult::RoundLimit(standings) => {
            let _ = writeln!(
                out,
                "Game ended after {} rounds. Final standings:",
                engine.config().max_rounds
            );
            for s in standings {
                let _ = writeln!(out, "{}: ${}", s.name, s.money);
            }
        }
    }
    out
}

/// Ask for the number of players and their names, re-asking on bad input.
pub fn read_player_names<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<Vec<String>> {
    let closed = || io::Error::new(io::ErrorKind::UnexpectedEof, "input closed");
    let mut line = String::new();

    let count = loop {
        write!(output, "Enter the number of players ({MIN_PLAYERS}-{MAX_PLAYERS}): ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(closed());
        }
        match line.trim().parse::<usize>() {
            Ok(n) if (MIN_PLAYERS..=MAX_PLAYERS).contains(&n) => break n,
            _ => writeln!(output, "Invalid number of players. Try again.")?,
        }
    };

    let mut names: Vec<String> = Vec::with_capacity(count);
    while names.len() < count {
        write!(output, "Enter name for player {}: ", names.len() + 1)?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(closed());
        }
        let name = line.trim();
        if name.is_empty() {
            writeln!(output, "Names cannot be empty.")?;
        } else if names.iter().any(|n| n == name) {
            writeln!(output, "{name} is already playing.")?;
        } else {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
