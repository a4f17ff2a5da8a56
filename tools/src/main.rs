//! desk-runner: headless driver for the guard desk.
//!
//! Usage:
//!   desk-runner --db desk.db --cycle 1
//!   desk-runner --db desk.db --config desk.json --ipc-mode

use anyhow::Result;
use guard_desk_core::{
    calendar,
    command::Command,
    config::DeskConfig,
    engine::DeskEngine,
    error::DeskError,
    event::DeskEvent,
    schedule::WeeklySchedule,
    settlement::{GlobalTotals, SettlementRow},
    store::DeskStore,
    types::{Cycle, Week},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Apply { command: Command },
    CycleReport { cycle: Cycle },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    sequence:     u64,
    current_week: Week,
    cycle:        Cycle,
    cycle_close:  bool,
    week_start:   Option<chrono::NaiveDate>,
    totals:       GlobalTotals,
    schedule:     Option<&'a WeeklySchedule>,
    events:       Vec<DeskEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let cycle = parse_arg(&args, "--cycle", 1 as Cycle);
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let config = match string_arg(&args, "--config") {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::default(),
    };

    if !ipc_mode {
        println!("Guard Desk: desk-runner");
        println!("  db:        {db}");
        println!("  weeks:     {}", config.total_weeks);
        println!("  cycles:    {}", config.cycle_count());
        println!();
    }

    let store = DeskStore::open(db)?;
    let mut engine = DeskEngine::open(config, store)?;

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        print_summary(&engine, cycle)?;
    }

    Ok(())
}

fn run_ipc_loop(engine: &mut DeskEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Unrecognised IPC line: {e}");
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {
                let state = build_ui_state(engine, Vec::new())?;
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            IpcCommand::Apply { command } => match engine.submit(command) {
                Ok(events) => {
                    let state = build_ui_state(engine, events)?;
                    writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
                }
                // Rejections go back to the caller; infrastructure errors end the loop.
                Err(e @ (DeskError::Configuration { .. }
                | DeskError::InvalidOperation { .. }
                | DeskError::PersonNotFound { .. }
                | DeskError::WeekNotFound { .. }
                | DeskError::CycleNotFound { .. }
                | DeskError::ShiftNotFound { .. }
                | DeskError::NotAssigned { .. })) => write_error(&mut stdout, &e.to_string())?,
                Err(e) => return Err(e.into()),
            },
            IpcCommand::CycleReport { cycle } => match engine.cycle_report(cycle) {
                Ok(rows) => writeln!(stdout, "{}", serde_json::to_string(&rows)?)?,
                Err(e) => write_error(&mut stdout, &e.to_string())?,
            },
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(out: &mut impl Write, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(out, "{}", err_json)?;
    out.flush()?;
    Ok(())
}

fn build_ui_state(engine: &DeskEngine, events: Vec<DeskEvent>) -> Result<UiState<'_>> {
    let config = engine.config();
    let week = engine.state().current_week;
    Ok(UiState {
        sequence:     engine.sequence(),
        current_week: week,
        cycle:        calendar::cycle_of_week(config, week),
        cycle_close:  calendar::is_cycle_close(config, week),
        week_start:   calendar::shift_date(config, week, 0).ok(),
        totals:       engine.global_totals(),
        schedule:     engine.state().current_schedule().ok(),
        events,
    })
}

fn print_summary(engine: &DeskEngine, cycle: Cycle) -> Result<()> {
    let config = engine.config();
    let state = engine.state();
    let totals = engine.global_totals();

    println!("=== DESK SUMMARY ===");
    println!("  sequence:       {}", engine.sequence());
    println!("  current week:   {}", state.current_week);
    println!("  persons:        {}", state.roster.len());
    println!("  retired:        {}", totals.retired);
    println!("  absences:       {}", totals.absences);
    println!("  fulfilled:      {}", totals.fulfilled_shifts);
    println!("  fines:          {}", totals.fines_collected);

    println!();
    println!("=== WEEK {} ===", state.current_week);
    let week = state.current_schedule()?;
    for shift in &week.shifts {
        let date = calendar::shift_date(config, week.week, shift.day_index)?;
        let names: Vec<&str> = shift
            .personnel
            .iter()
            .map(|id| state.roster.get(id).map(|p| p.name.as_str()).unwrap_or(id.as_str()))
            .collect();
        println!("  {} {:<10} {:?}: {}", date, shift.day, shift.period, names.join(", "));
    }

    println!();
    println!("=== CYCLE {cycle} SETTLEMENT ===");
    let rows: Vec<SettlementRow> = engine.cycle_report(cycle)?;
    for row in rows.iter().filter(|r| r.owed != 0 || r.earned != 0) {
        println!(
            "  {:<16} owed {:>9} | earned {:>9} | net {:>+10}{}",
            row.name,
            row.owed,
            row.earned,
            row.net,
            if row.retired { " (retired)" } else { "" }
        );
    }
    if rows.iter().all(|r| r.owed == 0 && r.earned == 0) {
        println!("  (No movements in this cycle)");
    }
    Ok(())
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
