use std::{
    io::{IsTerminal, Write},
    time::Duration,
};
use lingua_core::utils::prelude::{Error, Event};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

pub(crate) fn print_running(text: &str) {
    print_colourful_prefix("Running", Color::Magenta, text)
}

pub(crate) fn print_finished(duration: Duration) {
    print_colourful_prefix("Finished", Color::Green, &format!("in {}", seconds(duration)))
}

pub(crate) fn print_loaded_lexicon(text: &str) {
    print_colourful_prefix("Lexicon", Color::Cyan, text)
}

pub(crate) fn print_event(event: &Event) {
    match event {
        Event::Resolved { .. } => print_colourful_prefix("Resolved", Color::Cyan, &event.to_string()),
        Event::Rejected { .. } => print_colourful_prefix("Rejected", Color::Yellow, &event.to_string()),
    }
}

pub(crate) fn print_traced(count: usize) {
    print_colourful_prefix("Traced", Color::Cyan, &format!("{count} operation word lookups"))
}

/// Plain text report, or a codespan diagnostic with `fancy`.
pub(crate) fn print_error(error: &Error, fancy: bool) {
    if !fancy {
        eprintln!("{}", error.render());
        return;
    }

    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();
    error.pretty(&mut buffer);

    if buffer_writer.print(&buffer).is_err() {
        eprintln!("{}", error.render());
    }
}

pub fn seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_millis() as f32 / 1000.)
}

pub fn print_colourful_prefix(prefix: &str, color: Color, text: &str) {
    // stderr going away is not worth failing the program over
    let _ = write_colourful_prefix(prefix, color, text);
}

fn write_colourful_prefix(prefix: &str, color: Color, text: &str) -> std::io::Result<()> {
    let buffer_writer = stderr_buffer_writer();
    let mut buffer = buffer_writer.buffer();
    buffer.set_color(
        ColorSpec::new()
            .set_intense(true)
            .set_bold(true)
            .set_fg(Some(color)),
    )?;
    write!(buffer, "{prefix: >11}")?;
    buffer.set_color(&ColorSpec::new())?;
    writeln!(buffer, " {text}")?;
    buffer_writer.print(&buffer)
}

pub fn stderr_buffer_writer() -> BufferWriter {
    BufferWriter::stderr(color_choice())
}

fn colour_forced() -> bool {
    if let Ok(force) = std::env::var("FORCE_COLOR") {
        !force.is_empty()
    } else {
        false
    }
}

fn color_choice() -> ColorChoice {
    if colour_forced() {
        ColorChoice::Always
    } else if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
