mod cli;
mod repl;

use std::{path::PathBuf, process::ExitCode, rc::Rc};

use clap::{Args, Parser};
use cli::{print_error, print_event, print_finished, print_loaded_lexicon, print_running, print_traced};
use lingua_core::{
    resolver::prelude::{CachingResolver, Lexicon},
    session::Session,
    utils::prelude::{Error, Event, EventEmitter, EventEmitterIO, NullEventEmitterIO},
};

#[derive(Parser)]
enum Command {
    /// Runs a program file and prints the value of its last statement
    Run {
        /// Path of source file
        path: PathBuf,
        #[command(flatten)]
        options: SessionOptions,
    },
    /// Starts an interactive session
    Repl {
        #[command(flatten)]
        options: SessionOptions,
    },
}

#[derive(Args)]
struct SessionOptions {
    /// Extra operation words, one `word = symbol` per line
    #[arg(short, long, value_name = "FILE")]
    lexicon: Option<PathBuf>,
    /// Report errors as annotated diagnostics
    #[arg(long, default_value_t = false)]
    fancy: bool,
    /// Print how every operation word was resolved
    #[arg(short, long, default_value_t = false)]
    trace: bool,
}

fn main() -> ExitCode {
    match Command::parse() {
        Command::Run { path, options } => {
            let session = match build_session(&options) {
                Ok(session) => session,
                Err(err) => {
                    print_error(&err, options.fancy);
                    return ExitCode::FAILURE;
                }
            };

            print_running(&path.display().to_string());
            let start = std::time::Instant::now();

            let result = session.run_file(path);

            if options.trace {
                print_traced(session.events().count());
            }

            match result {
                Ok(value) => {
                    println!("{value}");
                    print_finished(std::time::Instant::now() - start);

                    ExitCode::SUCCESS
                },
                Err(err) => {
                    print_error(&err, options.fancy);

                    ExitCode::FAILURE
                }
            }
        },
        Command::Repl { options } => {
            let session = match build_session(&options) {
                Ok(session) => session,
                Err(err) => {
                    print_error(&err, options.fancy);
                    return ExitCode::FAILURE;
                }
            };

            match repl::start(&session, options.fancy) {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    print_error(&Error::from(err), options.fancy);

                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn build_session(options: &SessionOptions) -> Result<Session, Error> {
    let lexicon = match &options.lexicon {
        Some(path) => {
            let lexicon = Lexicon::load(path)
                .map_err(|error| Error::Lexicon { path: path.clone(), error })?;

            print_loaded_lexicon(&format!("{} ({} words)", path.display(), lexicon.len()));
            lexicon
        },
        None => Lexicon::standard(),
    };

    let events: Rc<dyn EventEmitterIO> = if options.trace {
        Rc::new(ConsoleEventEmitter)
    } else {
        Rc::new(NullEventEmitterIO)
    };

    let session = Session::new(Rc::new(CachingResolver::new(lexicon)))
        .with_events(EventEmitter::new(events));

    Ok(session)
}

#[derive(Debug, Clone, Copy)]
pub struct ConsoleEventEmitter;

impl EventEmitterIO for ConsoleEventEmitter {
    fn emit_event(&self, event: Event) {
        print_event(&event);
    }
}
