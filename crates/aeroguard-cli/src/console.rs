//! Interactive operator console
//!
//! Runs execute as background tasks. Their results come back over a channel
//! and are only shown if the session still holds the ticket they were started
//! with; switching sector mid-run discards the late result.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use aeroguard_core::{
    DecisionOutcome, Directive, OperatorSession, RunTicket, SessionMode, WindObservation,
};

use crate::app::{App, WindSource};
use crate::render;

const HELP: &str = "\
Commands:
  sector <id>              switch sector (discards any in-flight run)
  wind <bearing> <speed>   operator wind override, bearing 0-360, speed 0-100
  wind live                use Open-Meteo current wind
  wind default             use the sector default wind
  go                       authorize a decision run
  status                   show session state
  help                     show this help
  quit                     leave the console";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Sector(String),
    Wind(WindSource),
    Go,
    Status,
    Help,
    Quit,
    Empty,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(ConsoleCommand::Empty);
        };
        let args: Vec<&str> = words.collect();

        match head.to_ascii_lowercase().as_str() {
            "sector" => {
                if args.is_empty() {
                    anyhow::bail!("usage: sector <id>");
                }
                Ok(ConsoleCommand::Sector(args.join(" ")))
            }
            "wind" => match args.as_slice() {
                ["live"] => Ok(ConsoleCommand::Wind(WindSource::Live)),
                ["default"] => Ok(ConsoleCommand::Wind(WindSource::SectorDefault)),
                [bearing, speed] => {
                    let bearing: f64 = bearing
                        .parse()
                        .with_context(|| format!("invalid bearing '{bearing}'"))?;
                    let speed: f64 = speed
                        .parse()
                        .with_context(|| format!("invalid speed '{speed}'"))?;
                    let wind = WindObservation::from_operator(bearing, speed)?;
                    Ok(ConsoleCommand::Wind(WindSource::Manual(wind)))
                }
                _ => anyhow::bail!("usage: wind <bearing> <speed> | wind live | wind default"),
            },
            "go" | "run" => Ok(ConsoleCommand::Go),
            "status" => Ok(ConsoleCommand::Status),
            "help" | "?" => Ok(ConsoleCommand::Help),
            "quit" | "exit" => Ok(ConsoleCommand::Quit),
            other => anyhow::bail!("unknown command '{other}', try 'help'"),
        }
    }
}

type Finished = (RunTicket, DecisionOutcome);

struct Console {
    app: Arc<App>,
    session: OperatorSession,
    wind: WindSource,
    in_flight: bool,
    results: mpsc::UnboundedSender<Finished>,
}

impl Console {
    fn sector_name(&self) -> String {
        self.app
            .registry
            .get(self.session.sector_id())
            .map(|s| s.name.clone())
            .unwrap_or_else(|_| self.session.sector_id().to_string())
    }

    fn handle(&mut self, command: ConsoleCommand) -> Result<bool> {
        match command {
            ConsoleCommand::Sector(key) => {
                let sector = self.app.registry.get(&key)?;
                if self.session.select_sector(&sector.id) {
                    if self.in_flight {
                        println!("{}", "In-flight run abandoned.".yellow());
                    }
                    self.in_flight = false;
                    self.wind = WindSource::SectorDefault;
                    println!("Sector loaded: {} (standby)", sector.name.bold());
                } else {
                    println!("{} is already the active sector", sector.name);
                }
            }
            ConsoleCommand::Wind(source) => {
                self.wind = source;
                match source {
                    WindSource::Manual(wind) => println!("{}", render::wind_line(&wind)),
                    other => println!("Wind source: {}", other.label()),
                }
            }
            ConsoleCommand::Go => self.start_run()?,
            ConsoleCommand::Status => self.print_status(),
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => return Ok(false),
            ConsoleCommand::Empty => {}
        }
        Ok(true)
    }

    fn start_run(&mut self) -> Result<()> {
        let sector = self.app.registry.get(self.session.sector_id())?.clone();
        let ticket = self.session.trigger();
        self.in_flight = true;
        println!(
            "Command authorization received for {}. Running Commander and Auditor...",
            sector.name.bold()
        );

        let app = Arc::clone(&self.app);
        let source = self.wind;
        let results = self.results.clone();
        tokio::spawn(async move {
            let wind = app.wind_for(&sector, source).await;
            let outcome = app.pipeline.run(&sector, wind).await;
            // Receiver gone means the console already exited
            let _ = results.send((ticket, outcome));
        });
        Ok(())
    }

    fn finish_run(&mut self, ticket: RunTicket, outcome: DecisionOutcome) {
        let at = chrono::Utc::now();
        let sector = match self.app.registry.get(ticket.sector_id()) {
            Ok(sector) => sector.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "Finished run for unknown sector");
                return;
            }
        };
        match self.session.deliver(&ticket, outcome.directive.clone()) {
            Ok(_) => {
                self.in_flight = false;
                println!("{}", render::outcome_text(&sector, &outcome, at));
            }
            Err(e) => {
                tracing::info!(run_id = %outcome.run_id, error = %e, "Discarded stale run");
                let notice = format!("Discarded result of superseded run on {}.", sector.name);
                println!("{}", notice.dimmed());
            }
        }
    }

    fn print_status(&self) {
        let mode = match self.session.mode() {
            SessionMode::Standby => "STANDBY".yellow(),
            SessionMode::Active if self.in_flight => "ACTIVE (running)".cyan(),
            SessionMode::Active => "ACTIVE".green(),
        };
        println!("{} {}", "SECTOR:".bold(), self.sector_name());
        println!("{} {}", "MODE:".bold(), mode);
        println!("{} {}", "WIND SOURCE:".bold(), self.wind.label());
        if let WindSource::Manual(wind) = self.wind {
            println!("{}", render::wind_line(&wind));
        }
        match self.session.last_directive() {
            Some(Directive::Authorized { route, .. }) => {
                println!("{} AUTHORIZED via {}", "LAST:".bold(), route)
            }
            Some(Directive::Locked { reason }) => {
                println!("{} LOCKED ({})", "LAST:".bold(), reason)
            }
            None => {}
        }
    }
}

fn prompt() -> Result<()> {
    print!("{} ", "aeroguard>".bold().cyan());
    std::io::stdout().flush().context("Failed to flush stdout")
}

pub async fn run_console(app: Arc<App>, sector_key: &str) -> Result<()> {
    let sector = app.registry.get(sector_key)?;
    let (results, mut finished) = mpsc::unbounded_channel::<Finished>();
    let mut console = Console {
        session: OperatorSession::new(sector.id.clone()),
        app: Arc::clone(&app),
        wind: WindSource::SectorDefault,
        in_flight: false,
        results,
    };

    println!(
        "{} v{}",
        "AeroGuard operator console".bold(),
        aeroguard_core::VERSION
    );
    println!(
        "Sector loaded: {} (standby). Type 'help' for commands.",
        sector.name.bold()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read operator input")? else {
                    break;
                };
                match ConsoleCommand::parse(&line) {
                    Ok(command) => match console.handle(command) {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => println!("{} {e}", "error:".red().bold()),
                    },
                    Err(e) => println!("{} {e}", "error:".red().bold()),
                }
                prompt()?;
            }
            Some((ticket, outcome)) = finished.recv() => {
                println!();
                console.finish_run(ticket, outcome);
                prompt()?;
            }
        }
    }
    Ok(())
}
