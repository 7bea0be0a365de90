#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(elided_lifetimes_in_paths)]

use std::{env, path, process};

use rustyline::{error::ReadlineError, history::FileHistory, DefaultEditor};
use tracing_subscriber::EnvFilter;

mod args;
mod config;
mod eval;
mod file_paths;
mod random;

use args::Action;
use eval::Stack;

enum EvalResult {
    Ok,
    Err,
    NoInput,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("ARBINT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn eval_and_print_res(
    line: &str,
    stack: &mut Stack,
    random: &mut random::Random,
    config: &config::Config,
) -> EvalResult {
    if line.trim().is_empty() {
        return EvalResult::NoInput;
    }
    match stack.eval_line(line, config.input_base(), random) {
        Ok(()) => {
            let output = stack.format(config.output_base(), config.show_prefix);
            if !output.is_empty() {
                println!("{output}");
            }
            EvalResult::Ok
        }
        Err(msg) => {
            eprintln!("Error: {msg}");
            EvalResult::Err
        }
    }
}

fn print_help(explain_quitting: bool) {
    println!("arbint is an RPN calculator for arbitrary-precision integers.");
    println!();
    println!("Usage: arbint [--help | --version | --default-config | TOKENS...]");
    println!();
    println!("Values:     42  -17  0xff  0o17  0b101  36#zz");
    println!("Arithmetic: + - * / % mod divrem ^ gcd cmp neg abs sq");
    println!("Bits:       << >> bitlen bitcount lsb testbit");
    println!("Other:      rand dup swap drop clear");
    println!();
    println!("Version: {}", arbint_core::get_version());
    if let Some(config_path) = file_paths::get_config_file_location() {
        println!("Config file: {}", config_path.to_string_lossy());
    } else {
        println!("Failed to get config file location");
    }
    if let Some(history_path) = file_paths::get_history_file_location() {
        println!("History file: {}", history_path.to_string_lossy());
    } else {
        println!("Failed to get history file location");
    }
    if explain_quitting {
        println!("\nTo quit, type `quit`.");
    }
}

fn save_history(rl: &mut rustyline::Editor<(), FileHistory>, path: Option<&path::Path>) {
    if let Some(history_path) = path {
        if let Err(e) = rl.save_history(history_path) {
            tracing::debug!(error = %e, "failed to save history");
        }
    }
}

fn repl_loop(config: &config::Config) -> i32 {
    let rl_config = match rustyline::Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .max_history_size(config.max_history_size)
    {
        Ok(builder) => builder.build(),
        Err(err) => {
            eprintln!("Error: {err}");
            return 1;
        }
    };
    let mut rl = match DefaultEditor::with_config(rl_config) {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("Error: {err}");
            return 1;
        }
    };
    let history_path = file_paths::get_writable_history_file_location();
    if let Some(history_path) = &history_path {
        if rl.load_history(history_path).is_err() {
            // No previous history
        }
    }
    let mut stack = Stack::new();
    let mut random = random::Random::new();
    let mut initial_run = true; // set to false after first successful command
    let mut last_command_success = true;
    loop {
        let readline = rl.readline(&config.prompt);
        match readline {
            Ok(line) => match line.trim() {
                "exit" | "quit" | ":q" => break,
                "help" | "?" => {
                    print_help(true);
                }
                line => match eval_and_print_res(line, &mut stack, &mut random, config) {
                    EvalResult::Ok => {
                        last_command_success = true;
                        initial_run = false;
                    }
                    EvalResult::NoInput => {
                        last_command_success = true;
                    }
                    EvalResult::Err => {
                        last_command_success = false;
                    }
                },
            },
            Err(ReadlineError::Interrupted) => {
                if initial_run {
                    break;
                }
                println!("Use Ctrl-D (i.e. EOF) to exit");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {err}");
                break;
            }
        }
        save_history(&mut rl, history_path.as_deref());
    }
    save_history(&mut rl, history_path.as_deref());
    i32::from(!last_command_success)
}

fn main() {
    process::exit(real_main())
}

fn real_main() -> i32 {
    init_logging();
    // Assemble the action from all but the first argument.
    let action: Action = env::args().skip(1).collect();
    tracing::debug!(?action, "starting");
    match action {
        Action::Help => {
            print_help(false);
            0
        }
        Action::Version => {
            println!("{}", arbint_core::get_version());
            0
        }
        Action::DefaultConfig => {
            print!("{}", config::DEFAULT_CONFIG_FILE);
            0
        }
        Action::Eval(expr) => {
            let config = config::read();
            match eval_and_print_res(
                expr.as_str(),
                &mut Stack::new(),
                &mut random::Random::new(),
                &config,
            ) {
                EvalResult::Ok | EvalResult::NoInput => 0,
                EvalResult::Err => 1,
            }
        }
        Action::Repl => {
            let config = config::read();
            repl_loop(&config)
        }
    }
}
