use std::error::Error;
use std::process;

use clap::{Arg, ArgAction, ArgMatches, Command};
use csv::{ReaderBuilder, Trim};
use tracing_subscriber::EnvFilter;

use uniprocessor::config::SimulationConfig;
use uniprocessor::constants::MissPolicy;
use uniprocessor::report::Report;
use uniprocessor::runner::{run, run_all, RunRequest};
use uniprocessor::{Policy, SchedulingError, Task, TaskSet, TimeStep};

const EXIT_SCHEDULABLE: i32 = 0;
const EXIT_DEADLINE_MISSED: i32 = 2;
const EXIT_INVALID_INPUT: i32 = 5;

/// Reads a task set file and returns a `TaskSet`
///
/// One task per line: `id, Ci, Di, Pi`. Values are scaled to ticks with the
/// configured `ticks_per_unit`.
pub fn read_task_file(file_path: &str, config: &SimulationConfig) -> Result<TaskSet, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_path(file_path)?;
    let mut tasks = Vec::new();

    for result in rdr.records() {
        let record = result?;

        if record.len() != 4 {
            let id = record.get(0).unwrap_or_default();
            return Err(SchedulingError::invalid_task(
                id,
                format!("expected 4 fields (id, Ci, Di, Pi), found {}", record.len()),
            )
            .into());
        }

        let id = &record[0];
        let cost: TimeStep = config.to_ticks(id, "cost", &record[1])?;
        let deadline: TimeStep = config.to_ticks(id, "deadline", &record[2])?;
        let period: TimeStep = config.to_ticks(id, "period", &record[3])?;

        tasks.push(Task::new(id, cost, deadline, period)?);
    }

    Ok(TaskSet::new(tasks)?)
}

pub fn build_cli_command() -> Command {
    Command::new("Uniprocessor Scheduler")
    .version("1.0")
    .about("Simulates EDF, RM and DM scheduling of periodic task sets")

    .arg(Arg::new("task_file")
        .required(true)
        .help("Path to the task set file (id, Ci, Di, Pi per line)"))

    .arg(Arg::new("policy")
        .short('p')
        .long("policy")
        .help("Scheduling policy to simulate")
        .value_parser(["edf", "rm", "dm", "all"])
        .default_value("all"))

    .arg(Arg::new("horizon_cap")
        .short('c')
        .long("horizon-cap")
        .help("Largest hyperperiod to simulate, in ticks")
        .value_parser(clap::value_parser!(u64))
        .default_value("10000000"))

    .arg(Arg::new("ticks_per_unit")
        .short('t')
        .long("ticks-per-unit")
        .help("Ticks per input time unit, to rescale fractional values")
        .value_parser(clap::value_parser!(u32).range(1..))
        .default_value("1"))

    .arg(Arg::new("continue_missed")
        .long("continue-missed")
        .help("Keep running jobs past their deadline instead of dropping them")
        .action(ArgAction::SetTrue))

    .arg(Arg::new("json")
        .long("json")
        .help("Print the reports as JSON")
        .action(ArgAction::SetTrue))
}

fn config_from_matches(matches: &ArgMatches) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    if let Some(&cap) = matches.get_one::<u64>("horizon_cap") {
        config = config.with_horizon_cap(cap);
    }
    if let Some(&ticks) = matches.get_one::<u32>("ticks_per_unit") {
        config = config.with_ticks_per_unit(ticks);
    }
    if matches.get_flag("continue_missed") {
        config = config.with_miss_policy(MissPolicy::Continue);
    }
    config
}

fn print_report(report: &Report, task_set: &TaskSet) {
    println!(
        "== {} ({:?}), hyperperiod {}, {} preemption(s)",
        report.policy, report.feasibility, report.hyperperiod, report.preemptions
    );

    for task in task_set.iter() {
        let segments: Vec<String> = report
            .segments_for(task.id())
            .map(|s| format!("[{}, {})", s.start, s.start + s.duration))
            .collect();
        println!("  {:>8}: {}", task.id(), segments.join(" "));
    }

    let markers: Vec<String> = report
        .markers
        .iter()
        .map(|m| format!("{}@{}", m.label, m.time))
        .collect();
    println!("  markers: {}", markers.join(" "));

    if let Some(response_times) = &report.response_times {
        for rt in response_times {
            match rt.response_time {
                Some(r) => println!("  R({}) = {}", rt.task_id, r),
                None => println!("  R({}) exceeds its deadline", rt.task_id),
            }
        }
    }

    if report.misses.is_empty() {
        println!("  no deadline missed");
    }
    for miss in &report.misses {
        match miss.completion_time {
            Some(t) => println!(
                "  MISS {} released {} deadline {} completed {}",
                miss.task_id, miss.release_time, miss.absolute_deadline, t
            ),
            None => println!(
                "  MISS {} released {} deadline {} never completed",
                miss.task_id, miss.release_time, miss.absolute_deadline
            ),
        }
    }
}

fn main() {
    // cargo run <task_file> [-p edf|rm|dm|all] [-c <cap>] [-t <ticks>] [--continue-missed] [--json]
    // example : cargo run tasks.csv -p rm --json
    let matches: ArgMatches = build_cli_command().get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = config_from_matches(&matches);

    let task_file = matches.get_one::<String>("task_file").map(String::as_str).unwrap_or_default();
    let taskset = match read_task_file(task_file, &config) {
        Ok(taskset) => taskset,
        Err(e) => {
            eprintln!("Error reading task file: {}", e);
            process::exit(EXIT_INVALID_INPUT);
        }
    };

    let policy = matches.get_one::<String>("policy").map(String::as_str).unwrap_or("all");
    let results = match policy {
        "all" => run_all(&taskset, &config),
        name => match name.parse::<Policy>() {
            Ok(policy) => {
                let request = RunRequest::new(&taskset, policy).with_config(config.clone());
                vec![(policy, run(&request))]
            }
            Err(e) => {
                eprintln!("{}", e);
                process::exit(EXIT_INVALID_INPUT);
            }
        },
    };

    let mut reports = Vec::new();
    for (policy, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                eprintln!("{} simulation failed: {}", policy, e);
                process::exit(EXIT_INVALID_INPUT);
            }
        }
    }

    if matches.get_flag("json") {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing reports: {}", e);
                process::exit(EXIT_INVALID_INPUT);
            }
        }
    } else {
        for report in &reports {
            print_report(report, &taskset);
        }
    }

    if reports.iter().all(Report::is_schedulable) {
        process::exit(EXIT_SCHEDULABLE);
    }
    process::exit(EXIT_DEADLINE_MISSED);
}
