use clap::{
    arg_enum, crate_name, crate_version, value_t, App, AppSettings, Arg, ArgMatches, SubCommand,
};
use log::{error, info, warn};
use potsim::config::{Config, ConfigError};
use potsim::global::conf_def;
use potsim::logging;
use potsim::randroll::{Roller, RollerError};
use potsim::render::{Page, RenderError};
use potsim::rollcounts::{OutcomeCounts, CHI_SQUARE_CRITICAL_001};
use potsim::rolliter::OutcomeIter;
use potsim::sim::{
    outcome_counts, percentile_of_sorted, rerolls_to_max, run_sessions, transition_counts,
};
use potsim::table::{OutcomeTable, TableError};
use rand::rngs::StdRng;
use serde_json::json;
use std::convert::TryFrom;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;

/// Validates the given expression can be parsed as the given type following clap's convention:
/// Return Ok(()) if yes, else Err(string_describing_the_problem)
macro_rules! validate_as {
    ($T:ty, $V:expr) => {
        match $V.parse::<$T>() {
            Ok(_) => Ok(()),
            Err(e) => Err(e.to_string()),
        }
    };
}

arg_enum! {
    #[derive(PartialEq, Debug)]
    enum TallyOutFmt {
        Counts,
        Table,
        ChiSquare,
    }
}

arg_enum! {
    #[derive(PartialEq, Debug)]
    enum SimulateOutFmt {
        Counts,
        Transitions,
        RerollsToMax,
    }
}

const PERCENTILES: [u8; 7] = [0, 5, 25, 50, 75, 95, 100];

#[derive(Error, Debug)]
enum CliError {
    #[error("{0}")]
    Args(#[from] clap::Error),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Roller(#[from] RollerError),
    #[error("{0}")]
    Render(#[from] RenderError),
    #[error("Error opening {path}: {source}")]
    Open { path: String, source: io::Error },
    #[error("Error parsing table from {path}: {source}")]
    Table {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid table: {0}")]
    InvalidTable(#[from] TableError),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown subcommand {0}")]
    UnknownSubcommand(String),
}

fn open_input(fname: &str) -> Result<File, CliError> {
    OpenOptions::new()
        .read(true)
        .open(fname)
        .map_err(|source| CliError::Open {
            path: fname.to_string(),
            source,
        })
}

fn open_output(fname: &str) -> Result<File, CliError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(fname)
        .map_err(|source| CliError::Open {
            path: fname.to_string(),
            source,
        })
}

/// The table named by the given argument, or the base table when it was not given.
fn get_table(args: &ArgMatches, name: &str) -> Result<OutcomeTable, CliError> {
    match args.value_of(name) {
        Some(fname) => {
            let fd = open_input(fname)?;
            let t: OutcomeTable = serde_json::from_reader(fd).map_err(|source| CliError::Table {
                path: fname.to_string(),
                source,
            })?;
            info!("Read table with {} outcomes from {}", t.len(), fname);
            Ok(t)
        }
        None => Ok(OutcomeTable::base()),
    }
}

/// The --seed argument wins over the configured seed. Neither means fresh entropy.
fn get_seed(args: &ArgMatches, conf: &Config) -> Result<Option<u64>, CliError> {
    Ok(if args.is_present("seed") {
        Some(value_t!(args, "seed", u64)?)
    } else {
        conf.seed
    })
}

fn get_roller(args: &ArgMatches, conf: &Config) -> Result<Roller<StdRng>, CliError> {
    Ok(match get_seed(args, conf)? {
        Some(s) => {
            info!("Using seed {}", s);
            Roller::seeded(s)
        }
        None => Roller::from_entropy(),
    })
}

fn play(args: &ArgMatches, conf: &Config) -> Result<(), CliError> {
    let mut roller = get_roller(args, conf)?;
    let mut state = roller.start()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}> ", Page::new(conf, state).to_text()?)?;
    out.flush()?;
    for line in stdin.lock().lines() {
        match line?.trim() {
            "" | "r" => state = roller.reroll(state)?,
            "q" => break,
            other => {
                warn!("Unknown input {:?}: press enter to reroll, q to quit", other);
                write!(out, "> ")?;
                out.flush()?;
                continue;
            }
        }
        write!(out, "\n{}> ", Page::new(conf, state).to_text()?)?;
        out.flush()?;
    }
    Ok(())
}

fn render(args: &ArgMatches, conf: &Config) -> Result<(), CliError> {
    let rerolls = value_t!(args, "rerolls", u32)?;
    let mut roller = get_roller(args, conf)?;
    let mut state = roller.start()?;
    for _ in 0..rerolls {
        state = roller.reroll(state)?;
    }
    let mut out = open_output(args.value_of("output").unwrap_or("/dev/stdout"))?;
    out.write_all(Page::new(conf, state).to_html()?.as_bytes())?;
    Ok(())
}

fn adjust(args: &ArgMatches) -> Result<(), CliError> {
    let current = value_t!(args, "current", i64)?;
    // anything that is not an outcome excludes nothing
    let t = u8::try_from(current)
        .map(OutcomeTable::adjust)
        .unwrap_or_else(|_| OutcomeTable::base());
    println!("{}", serde_json::to_string(&t)?);
    Ok(())
}

fn draw(args: &ArgMatches, conf: &Config) -> Result<(), CliError> {
    let count = value_t!(args, "count", usize)?;
    let table = get_table(args, "table")?;
    let mut roller = get_roller(args, conf)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for o in roller.draw_many(&table, count)? {
        writeln!(out, "{}", o.value())?;
    }
    Ok(())
}

fn tally(args: &ArgMatches) -> Result<(), CliError> {
    let outfmt = value_t!(args, "outfmt", TallyOutFmt)?;
    let fd = open_input(args.value_of("input").unwrap_or("/dev/stdin"))?;
    let counts: OutcomeCounts = OutcomeIter::new(fd).collect();
    info!("Read {} outcomes", counts.total());
    let out = match outfmt {
        TallyOutFmt::Counts => json!({
            "counts": counts,
            "total": counts.total(),
            "frequencies": counts.frequencies(),
        }),
        TallyOutFmt::Table => json!(counts.to_table()),
        TallyOutFmt::ChiSquare => {
            let expected = get_table(args, "against")?;
            expected.validate()?;
            let stat = counts.chi_square(&expected);
            let dof = expected.len().saturating_sub(1);
            let critical = dof
                .checked_sub(1)
                .and_then(|i| CHI_SQUARE_CRITICAL_001.get(i))
                .copied();
            json!({
                "statistic": stat,
                "degrees_of_freedom": dof,
                "critical_0.001": critical,
                "reject": critical.map(|c| stat > c),
            })
        }
    };
    println!("{}", out);
    Ok(())
}

fn simulate(args: &ArgMatches, conf: &Config) -> Result<(), CliError> {
    let num_sessions = value_t!(args, "numsessions", u32)?;
    let num_rerolls = value_t!(args, "numrerolls", u32)?;
    let outfmt = value_t!(args, "outfmt", SimulateOutFmt)?;
    let histories = run_sessions(num_sessions, num_rerolls, get_seed(args, conf)?)?;
    let out = match outfmt {
        SimulateOutFmt::Counts => {
            let counts = outcome_counts(&histories);
            json!({
                "counts": counts,
                "total": counts.total(),
                "frequencies": counts.frequencies(),
            })
        }
        SimulateOutFmt::Transitions => json!(transition_counts(&histories)),
        SimulateOutFmt::RerollsToMax => {
            let all = rerolls_to_max(&histories);
            let mut reached: Vec<u32> = all.iter().filter_map(|r| *r).collect();
            reached.sort_unstable();
            let percentiles: Option<Vec<(u8, u32)>> = if reached.is_empty() {
                None
            } else {
                Some(
                    PERCENTILES
                        .iter()
                        .map(|p| (*p, percentile_of_sorted(&reached, *p)))
                        .collect(),
                )
            };
            json!({
                "reached": reached.len(),
                "never": all.len() - reached.len(),
                "percentiles": percentiles,
            })
        }
    };
    println!("{}", out);
    Ok(())
}

fn seed_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("seed")
        .long("seed")
        .value_name("N")
        .validator(|v| validate_as!(u64, v))
        .help("Seed the random source for reproducible draws")
}

fn main() {
    let args = App::new(crate_name!())
        .version(crate_version!())
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .default_value(conf_def::CONFIG)
                .global(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Log more; repeat for more detail"),
        )
        .subcommand(
            SubCommand::with_name("play")
                .about("Interactive potential reroll session")
                .arg(seed_arg()),
        )
        .subcommand(
            SubCommand::with_name("render")
                .about("Render the simulator page as HTML")
                .arg(seed_arg())
                .arg(
                    Arg::with_name("rerolls")
                        .long("rerolls")
                        .value_name("N")
                        .default_value(conf_def::RENDER_REROLLS)
                        .validator(|v| validate_as!(u32, v))
                        .help("How many rerolls to apply before rendering"),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .default_value("/dev/stdout"),
                ),
        )
        .subcommand(
            SubCommand::with_name("adjust")
                .about("Print the table a reroll from CURRENT draws from")
                .setting(AppSettings::AllowNegativeNumbers)
                .arg(
                    Arg::with_name("current")
                        .value_name("CURRENT")
                        .required(true)
                        .validator(|v| validate_as!(i64, v)),
                ),
        )
        .subcommand(
            SubCommand::with_name("draw")
                .about("Draw outcomes from a weighted table")
                .arg(seed_arg())
                .arg(
                    Arg::with_name("table")
                        .long("table")
                        .value_name("FILE")
                        .help("JSON table to draw from instead of the base table"),
                )
                .arg(
                    Arg::with_name("count")
                        .short("n")
                        .long("count")
                        .value_name("N")
                        .default_value(conf_def::DRAW_COUNT)
                        .validator(|v| validate_as!(usize, v)),
                ),
        )
        .subcommand(
            SubCommand::with_name("tally")
                .about("Count outcomes read as digits and summarize them")
                .arg(
                    Arg::with_name("input")
                        .short("i")
                        .long("input")
                        .default_value("/dev/stdin"),
                )
                .arg(
                    Arg::with_name("against")
                        .long("against")
                        .value_name("FILE")
                        .help("JSON table to test against instead of the base table"),
                )
                .arg(
                    Arg::with_name("outfmt")
                        .long("outfmt")
                        .possible_values(&TallyOutFmt::variants())
                        .case_insensitive(true)
                        .default_value("Counts"),
                ),
        )
        .subcommand(
            SubCommand::with_name("simulate")
                .about("Run many reroll sessions and summarize them")
                .arg(seed_arg())
                .arg(
                    Arg::with_name("numsessions")
                        .long("num-sessions")
                        .value_name("N")
                        .default_value(conf_def::NUM_SESSIONS)
                        .validator(|v| validate_as!(u32, v))
                        .help("How many sessions to simulate"),
                )
                .arg(
                    Arg::with_name("numrerolls")
                        .long("num-rerolls")
                        .value_name("N")
                        .default_value(conf_def::NUM_REROLLS)
                        .validator(|v| validate_as!(u32, v))
                        .help("Rerolls per session"),
                )
                .arg(
                    Arg::with_name("outfmt")
                        .long("outfmt")
                        .possible_values(&SimulateOutFmt::variants())
                        .case_insensitive(true)
                        .default_value("Counts"),
                ),
        )
        .get_matches();
    if let Err(e) = logging::init(args.occurrences_of("verbose")) {
        eprintln!("Could not start logging: {}", e);
    }
    let res = args
        .value_of("config")
        .map(|c| Config::load(Path::new(c), args.occurrences_of("config") > 0))
        .unwrap_or_else(|| Ok(Config::default()))
        .map_err(CliError::from)
        .and_then(|conf| match args.subcommand() {
            ("play", Some(sub)) => play(sub, &conf),
            ("render", Some(sub)) => render(sub, &conf),
            ("adjust", Some(sub)) => adjust(sub),
            ("draw", Some(sub)) => draw(sub, &conf),
            ("tally", Some(sub)) => tally(sub),
            ("simulate", Some(sub)) => simulate(sub, &conf),
            (name, _) => Err(CliError::UnknownSubcommand(name.to_string())),
        });
    if let Err(e) = res {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{get_seed, CliError};
    use clap::{App, Arg};
    use potsim::config::Config;
    use potsim::table::{OutcomeTable, TableError};

    fn seed_matches(argv: &[&str]) -> clap::ArgMatches<'static> {
        App::new("t")
            .arg(Arg::with_name("seed").long("seed").takes_value(true))
            .get_matches_from(argv.iter().copied())
    }

    #[test]
    fn seed_arg_beats_config() {
        let conf = Config {
            seed: Some(3),
            ..Config::default()
        };
        let m = seed_matches(&["t", "--seed", "8"]);
        assert_eq!(get_seed(&m, &conf).unwrap(), Some(8));
        let m = seed_matches(&["t"]);
        assert_eq!(get_seed(&m, &conf).unwrap(), Some(3));
        assert_eq!(get_seed(&m, &Config::default()).unwrap(), None);
    }

    #[test]
    fn bad_seed_errors() {
        let m = seed_matches(&["t", "--seed", "x"]);
        assert!(matches!(
            get_seed(&m, &Config::default()),
            Err(CliError::Args(_))
        ));
    }

    #[test]
    fn bad_against_table_errors() {
        let t = OutcomeTable::from_pairs(vec![(1, 1.0), (2, -1.0)]);
        let r: Result<(), CliError> = t.validate().map_err(CliError::from);
        assert!(matches!(
            r,
            Err(CliError::InvalidTable(TableError::NonPositiveWeight { key: 2, .. }))
        ));
    }
}
