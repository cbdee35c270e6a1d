//! Terminal front end: stdin commands in, plain text out.

use std::str::FromStr;

use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::engine::{total_with_commission, Outcome};
use crate::events::Event;
use crate::platform::{DialogOption, Notice, NoticeLevel, Platform, Renderer};
use crate::state::{Case, EconomyState, Ledger, User};

pub const HELP: &str = "\
commands:
  cases                         list cases
  view <case>                   show the gifts in a case
  close                         back to the case list
  open <case>                   pay and spin
  claim                         take the revealed prize
  again                         leave the result, back to its case
  leave                         leave the result unclaimed
  add <case> <value> <name> | <description>
  create <price> <color> <name> | <description>
  deposit                       top up the balance
  history                       transaction history
  reset                         start over
  quit";

/// Platform backed by the config file and the terminal. Dialog answers
/// arrive on their own channel, routed there by the input feed.
pub struct ConsolePlatform {
    user: Option<User>,
    answers: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl ConsolePlatform {
    pub fn new(user: Option<User>, answers: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            user,
            answers: Mutex::new(answers),
        }
    }
}

/// Match typed input against dialog options: by id, by text, or by 1-based
/// position.
pub fn pick_option(input: &str, options: &[DialogOption]) -> Option<String> {
    let input = input.trim();
    if let Ok(n) = input.parse::<usize>() {
        return options.get(n.checked_sub(1)?).map(|o| o.id.clone());
    }
    options
        .iter()
        .find(|o| o.id.eq_ignore_ascii_case(input) || o.text.eq_ignore_ascii_case(input))
        .map(|o| o.id.clone())
}

impl Platform for ConsolePlatform {
    async fn confirm(
        &self,
        title: &str,
        message: &str,
        options: &[DialogOption],
    ) -> Option<String> {
        println!("\n== {} ==\n{}", title, message);
        for (i, option) in options.iter().enumerate() {
            println!("  {}) {}", i + 1, option.text);
        }
        // None once input has ended
        let line = self.answers.lock().await.recv().await?;
        pick_option(&line, options)
    }

    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

/// Prints every view to stdout.
#[derive(Debug, Default)]
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn render_cases(&mut self, state: &EconomyState) {
        println!("\nBalance: {}", state.balance);
        println!(
            "Opened: {} | Won: {} | Added: {}",
            state.stats.opened, state.stats.won, state.stats.added
        );
        for case in &state.cases {
            println!(
                "  [{}] {} - {} (+{} fee) | {} participants | {} gifts",
                case.id,
                case.name,
                case.price,
                total_with_commission(case.price) - case.price,
                case.participants,
                case.gifts.len()
            );
        }
    }

    fn render_gifts(&mut self, case: &Case) {
        println!("\n{} - {}", case.name, case.description);
        println!("Open for {}", total_with_commission(case.price));
        if case.gifts.is_empty() {
            println!("  (no gifts yet)");
        }
        for gift in &case.gifts {
            println!(
                "  {} - {} | {} | from {}",
                gift.name,
                gift.value,
                gift.description,
                gift.donor.name()
            );
        }
    }

    fn render_transactions(&mut self, ledger: &Ledger) {
        if ledger.is_empty() {
            println!("\nNo transactions yet");
            return;
        }
        println!();
        for tx in ledger.entries() {
            let sign = if tx.is_credit() { "+" } else { "" };
            println!(
                "  {} {} | {} | {}{}",
                tx.at.format("%Y-%m-%d"),
                tx.kind.label(),
                tx.description,
                sign,
                tx.amount
            );
        }
    }

    fn render_prize(&mut self, outcome: &Outcome) {
        println!("\n*** {} ({}) ***", outcome.prize.name, outcome.prize.value);
        println!("Donated by {}", outcome.prize.donor.name());
        if outcome.own {
            println!("This is your own gift. 'claim' to take it back.");
        } else {
            println!("'claim' to take the prize.");
        }
    }

    fn notify(&mut self, notice: &Notice) {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Info => "info",
        };
        println!("[{}] {}", tag, notice.message);
    }
}

fn parse_id(arg: Option<&str>) -> Result<u64, String> {
    let arg = arg.ok_or("missing case id")?;
    u64::from_str(arg).map_err(|_| format!("not a case id: {}", arg))
}

fn parse_amount(arg: Option<&str>) -> Result<Decimal, String> {
    let arg = arg.ok_or("missing amount")?;
    Decimal::from_str(arg).map_err(|_| format!("not an amount: {}", arg))
}

/// Split "<name> | <description>".
fn split_text(rest: &str) -> (String, String) {
    match rest.split_once('|') {
        Some((name, description)) => {
            (name.trim().to_string(), description.trim().to_string())
        }
        None => (rest.trim().to_string(), String::new()),
    }
}

/// Turn one input line into an event. Ok(None) for blank lines and help.
pub fn parse_command(line: &str) -> Result<Option<Event>, String> {
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let mut args = rest.split_whitespace();

    let event = match command {
        "" => return Ok(None),
        "help" => {
            println!("{}", HELP);
            return Ok(None);
        }
        "cases" => Event::ShowCases,
        "view" => Event::ViewCase {
            case_id: parse_id(args.next())?,
        },
        "close" => Event::CloseCase,
        "open" => Event::OpenCase {
            case_id: parse_id(args.next())?,
        },
        "claim" => Event::Claim,
        "again" => Event::TryAgain,
        "leave" => Event::CloseResult,
        "add" => {
            let case_id = parse_id(args.next())?;
            let value = parse_amount(args.next())?;
            let (name, description) = split_text(&args.collect::<Vec<_>>().join(" "));
            Event::AddGift {
                case_id,
                name,
                value,
                description,
            }
        }
        "create" => {
            let price = parse_amount(args.next())?;
            let color = args.next().ok_or("missing color")?.to_string();
            let (name, description) = split_text(&args.collect::<Vec<_>>().join(" "));
            Event::CreateCase {
                name,
                price,
                description,
                color,
            }
        }
        "deposit" => Event::Deposit,
        "history" => Event::ShowHistory,
        "reset" => Event::Reset,
        "quit" | "exit" => Event::Shutdown,
        other => return Err(format!("unknown command: {} (try 'help')", other)),
    };
    Ok(Some(event))
}

/// What one line of input turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Event),
    /// Reply to the dialog the previous command opens
    Answer(String),
    /// Blank line or help
    Skip,
    Invalid(String),
}

/// Sorts input lines into commands and dialog answers.
///
/// The line right after a dialog-opening command is its answer, no matter
/// whether the dialog has been shown yet. Piped input can run ahead of the
/// session, so this is decided here and not by who is waiting.
#[derive(Debug, Default)]
pub struct LineRouter {
    awaiting_answer: bool,
}

impl LineRouter {
    pub fn route(&mut self, line: &str) -> Input {
        if std::mem::take(&mut self.awaiting_answer) {
            return Input::Answer(line.to_string());
        }
        match parse_command(line) {
            Ok(Some(event)) => {
                self.awaiting_answer = matches!(event, Event::Deposit);
                Input::Command(event)
            }
            Ok(None) => Input::Skip,
            Err(msg) => Input::Invalid(msg),
        }
    }
}

/// Spawns a task that reads stdin, sending commands to `tx` and dialog
/// answers to `answers`. Sends Shutdown at end of input.
pub fn spawn_feed(tx: mpsc::Sender<Event>, answers: mpsc::UnboundedSender<String>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut router = LineRouter::default();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    break;
                }
            };

            match router.route(&line) {
                Input::Command(event) => {
                    if tx.send(event).await.is_err() {
                        debug!("Session gone, stopping input");
                        return;
                    }
                }
                Input::Answer(answer) => {
                    if answers.send(answer).is_err() {
                        debug!("Dialog answer dropped, session gone");
                    }
                }
                Input::Skip => {}
                Input::Invalid(msg) => println!("[error] {}", msg),
            }
        }

        // Closing the answer channel unblocks a dialog still waiting.
        drop(answers);
        let _ = tx.send(Event::Shutdown).await;
    });
}
