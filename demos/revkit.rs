use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use rev_rs::commands;
use rev_rs::embed::{AncillaPolicy, EmbedOptions};
use rev_rs::random::RandomCircuitOptions;
use rev_rs::store::{Kind, Placement, Store};
use rev_rs::synthesis::cbs::CbsOptions;
use rev_rs::synthesis::dbs::DbsOptions;
use rev_rs::synthesis::exs::ExsOptions;
use rev_rs::synthesis::tbs::TbsOptions;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Script with one command per line.
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Commands separated by `;`, run after the script.
    #[clap(short, long, value_name = "COMMANDS")]
    commands: Option<String>,
}

/// One script line.
#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
struct Line {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read a permutation, e.g. `spec 0 1 2 4 3 5 6 7`.
    Spec {
        images: Vec<String>,
        #[clap(long)]
        new: bool,
    },
    /// Read a PLA file into a BDD function.
    ReadPla {
        path: PathBuf,
        #[clap(long)]
        new: bool,
    },
    /// Read an ASCII AIGER file.
    ReadAag {
        path: PathBuf,
        #[clap(long)]
        new: bool,
    },
    Tbs {
        #[clap(long)]
        unidirectional: bool,
        #[clap(long)]
        new: bool,
    },
    Dbs {
        /// Lines in the order they are decomposed.
        #[clap(long, value_delimiter = ',')]
        order: Option<Vec<usize>>,
        #[clap(long)]
        new: bool,
    },
    Exs {
        #[clap(long, default_value = "20")]
        max_gates: usize,
        #[clap(long)]
        negative: bool,
        #[clap(long)]
        new: bool,
    },
    /// Embed the current BDD function.
    Embed {
        #[clap(long)]
        bennett: bool,
        #[clap(long, default_value = "16")]
        max_lines: usize,
        #[clap(long)]
        new: bool,
    },
    /// Characteristic BDD of the current specification or circuit.
    Rcbdd {
        #[clap(long)]
        from_circuit: bool,
        #[clap(long)]
        new: bool,
    },
    /// Symbolic TBS on the current RCBDD.
    RcbddSynth {
        #[clap(long)]
        new: bool,
    },
    Cbs {
        /// Leave the AND lines dirty.
        #[clap(long)]
        keep_ancillae: bool,
        #[clap(long)]
        new: bool,
    },
    /// Random circuit.
    Revgen {
        #[clap(long, default_value = "6")]
        lines: usize,
        #[clap(long, default_value = "16")]
        gates: usize,
        #[clap(long, default_value = "0")]
        seed: u64,
        #[clap(long)]
        negative: bool,
        /// Insert one random gate into the current circuit instead.
        #[clap(long)]
        insert: bool,
        #[clap(long)]
        new: bool,
    },
    Revsimp {
        #[clap(long)]
        new: bool,
    },
    Reverse {
        #[clap(long)]
        new: bool,
    },
    Concat {
        first: usize,
        second: usize,
    },
    /// Tabulate the current circuit into a specification.
    Tof {
        #[clap(long)]
        new: bool,
    },
    IsIdentity,
    Equivalent {
        first: usize,
        second: usize,
    },
    Ps,
    Print {
        #[clap(value_enum, default_value = "circuit")]
        kind: KindArg,
    },
    /// List or clear store entries.
    Store {
        #[clap(short, long, value_enum)]
        clear: Vec<KindArg>,
    },
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum KindArg {
    Spec,
    Bdd,
    Rcbdd,
    Aig,
    Circuit,
}

impl From<KindArg> for Kind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Spec => Kind::Spec,
            KindArg::Bdd => Kind::Bdd,
            KindArg::Rcbdd => Kind::Rcbdd,
            KindArg::Aig => Kind::Aig,
            KindArg::Circuit => Kind::Circuit,
        }
    }
}

/// Like the interactive shell: overwrite the current entry unless `--new`.
fn placement(new: bool) -> Placement {
    if new {
        Placement::Append
    } else {
        Placement::ReplaceCurrent
    }
}

fn run(store: &mut Store, command: Command) -> color_eyre::Result<()> {
    match command {
        Command::Spec { images, new } => {
            commands::read_spec(store, &images.join(" "), placement(new))?;
        }
        Command::ReadPla { path, new } => {
            let text = std::fs::read_to_string(&path)?;
            commands::read_pla(store, &text, placement(new))?;
        }
        Command::ReadAag { path, new } => {
            let text = std::fs::read_to_string(&path)?;
            commands::read_aag(store, &text, placement(new))?;
        }
        Command::Tbs {
            unidirectional,
            new,
        } => {
            let options = TbsOptions {
                bidirectional: !unidirectional,
            };
            commands::tbs(store, None, options, placement(new))?;
        }
        Command::Dbs { order, new } => {
            let options = DbsOptions { line_order: order };
            commands::dbs(store, None, options, placement(new))?;
        }
        Command::Exs {
            max_gates,
            negative,
            new,
        } => {
            let options = ExsOptions {
                max_gates,
                negative_controls: negative,
                ..Default::default()
            };
            commands::exs(store, None, options, placement(new))?;
        }
        Command::Embed {
            bennett,
            max_lines,
            new,
        } => {
            let options = EmbedOptions {
                max_lines,
                policy: if bennett {
                    AncillaPolicy::Bennett
                } else {
                    AncillaPolicy::Minimal
                },
            };
            commands::embed(store, None, &options, placement(new))?;
        }
        Command::Rcbdd { from_circuit, new } => {
            if from_circuit {
                commands::rcbdd_from_circuit(store, None, placement(new))?;
            } else {
                commands::rcbdd_from_spec(store, None, placement(new))?;
            }
        }
        Command::RcbddSynth { new } => {
            commands::rcbdd_synth(store, None, placement(new))?;
        }
        Command::Cbs { keep_ancillae, new } => {
            let options = CbsOptions {
                uncompute: !keep_ancillae,
            };
            commands::cbs(store, None, options, placement(new))?;
        }
        Command::Revgen {
            lines,
            gates,
            seed,
            negative,
            insert,
            new,
        } => {
            if insert {
                commands::insert_random_gate(store, None, seed, negative, placement(new))?;
            } else {
                let options = RandomCircuitOptions {
                    lines,
                    gates,
                    seed,
                    negative_controls: negative,
                };
                commands::random_circuit(store, &options, placement(new))?;
            }
        }
        Command::Revsimp { new } => {
            commands::simplify(store, None, placement(new))?;
        }
        Command::Reverse { new } => {
            commands::reverse(store, None, placement(new))?;
        }
        Command::Concat { first, second } => {
            commands::concat(store, first, second, Placement::Append)?;
        }
        Command::Tof { new } => {
            commands::spec_from_circuit(store, None, placement(new))?;
        }
        Command::IsIdentity => {
            println!("{}", commands::is_identity(store, None)?);
        }
        Command::Equivalent { first, second } => {
            println!("{}", commands::equivalent(store, first, second)?);
        }
        Command::Ps => {
            println!("{}", commands::ps(store, None)?);
        }
        Command::Print { kind } => {
            print!("{}", commands::print(store, kind.into(), None)?);
        }
        Command::Store { clear } => {
            if clear.is_empty() {
                print!("{}", commands::listing(store));
            } else {
                let kinds: Vec<Kind> = clear.into_iter().map(Kind::from).collect();
                commands::clear(store, &kinds);
            }
        }
    }
    Ok(())
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    let mut script = String::new();
    if let Some(path) = &args.script {
        script.push_str(&std::fs::read_to_string(path)?);
        script.push('\n');
    }
    if let Some(commands) = &args.commands {
        script.push_str(&commands.replace(';', "\n"));
    }

    let mut store = Store::new();
    for text in script.lines().map(str::trim) {
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        println!("revkit> {}", text);
        match Line::try_parse_from(text.split_whitespace()) {
            Ok(line) => {
                if let Err(e) = run(&mut store, line.command) {
                    eprintln!("[E] {}", e);
                }
            }
            Err(e) => eprintln!("{}", e),
        }
    }

    println!("Total time: {:?}", time_total.elapsed());
    Ok(())
}
