//! Yack CLI entry point: plays a dialog file in the terminal.

use std::cell::RefCell;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use yack_language::pretty::pretty_print;
use yack_runtime::{
    ConsoleConditions, ConsoleContext, DialogPlayer, Outcome, PlayerConfig, RustylineEditor,
    SharedOutput, run_dialog, serialize,
};

/// CLI configuration parsed from arguments.
struct CliConfig {
    file: Option<PathBuf>,
    node: String,
    actor: String,
    deny_code: bool,
    no_parrot: bool,
    states: Option<PathBuf>,
    dump: bool,
    show_help: bool,
    show_version: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            file: None,
            node: "start".to_string(),
            actor: "player".to_string(),
            deny_code: false,
            no_parrot: false,
            states: None,
            dump: false,
            show_help: false,
            show_version: false,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();
    let mut args = args.into_iter().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--deny-code" => config.deny_code = true,
            "--dump" => config.dump = true,
            "--no-parrot" => config.no_parrot = true,
            "-n" | "--node" => {
                config.node = args.next().ok_or("--node requires a label")?;
            }
            "-a" | "--actor" => {
                config.actor = args.next().ok_or("--actor requires a name")?;
            }
            "--states" => {
                config.states = Some(PathBuf::from(
                    args.next().ok_or("--states requires a path")?,
                ));
            }
            other if other.starts_with('-') => {
                return Err(format!("unknown option: {other}").into());
            }
            path => {
                if config.file.is_some() {
                    return Err("only one dialog file can be played".into());
                }
                config.file = Some(PathBuf::from(path));
            }
        }
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("yack {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let Some(file) = config.file else {
        print_help();
        return Err("no dialog file given".into());
    };

    let bytes = std::fs::read(&file)
        .map_err(|e| format!("failed to read '{}': {e}", file.display()))?;
    let source = String::from_utf8_lossy(&bytes);

    if config.dump {
        print!("{}", pretty_print(&yack_language::parse(&source)?));
        return Ok(());
    }

    let dialog_name = file
        .file_stem()
        .map_or_else(|| "dialog".to_string(), |stem| stem.to_string_lossy().into_owned());

    let output: SharedOutput = Rc::new(RefCell::new(std::io::stdout()));
    let mut player = DialogPlayer::new(
        Box::new(ConsoleContext::new(Rc::clone(&output))),
        Box::new(ConsoleConditions::new(!config.deny_code)),
    )
    .with_config(PlayerConfig::default().with_default_parrot(!config.no_parrot));

    if let Some(path) = config.states.as_ref().filter(|path| path.exists()) {
        player.set_states(serialize::load_from_file(path)?);
    }

    player.start_source(&config.actor, &dialog_name, &config.node, &source)?;

    let mut editor = RustylineEditor::new()?;
    let outcome = run_dialog(&mut player, &mut editor, &output)?;
    if outcome == Outcome::Quit {
        println!("\x1b[2m(dialog abandoned)\x1b[0m");
    }

    if let Some(path) = &config.states {
        serialize::save_to_file(player.states(), path)?;
    }

    Ok(())
}

fn print_help() {
    println!(
        "yack {}
Play a Yack dialog in the terminal.

USAGE:
    yack [OPTIONS] <file.yack>

OPTIONS:
    -n, --node <label>    Label to start at (default: start)
    -a, --actor <name>    Actor the dialog is started with (default: player)
        --deny-code       Code conditions evaluate to false instead of true
        --no-parrot       Do not have the actor say the chosen line
        --states <path>   Load and save the condition log at this path
        --dump            Print the parsed dialog and exit
    -h, --help            Print this help
    -V, --version         Print version

Set RUST_LOG=yack_runtime=debug to trace the interpreter.",
        env!("CARGO_PKG_VERSION")
    );
}
