use std::io::Write;

use lingua_core::session::{Session, STDIN};

use crate::cli::print_error;

const PROMPT: &str = ">> ";

pub fn start(session: &Session, fancy: bool) -> std::io::Result<()> {
	ctrlc::set_handler(|| {
		println!();
		std::process::exit(0);
	}).map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))?;

	let stdin = std::io::stdin();

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		// end of input
		if stdin.read_line(&mut input)? == 0 {
			println!();
			return Ok(());
		}

		if let Some('\n') = input.chars().next_back() {
			input.pop();
		}
		if let Some('\r') = input.chars().next_back() {
			input.pop();
		}

		match input.trim() {
			"" => {},
			".exit" => return Ok(()),
			_ => match session.run(STDIN, &input) {
				Ok(value) => println!("{value}"),
				Err(err) => print_error(&err, fancy),
			}
		}
	}
}
