//! Top-level orchestration: wire the four subsystems together, wait for the
//! first of (worker failure, quit signal, selection), clean up the
//! terminal, then either exit or exec the editor.

mod config;
mod editor;
mod error;
mod logger;
mod search;
mod term;
mod trigger;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use crossbeam::channel::Sender as CbSender;
use crossterm::cursor::Show;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;

use config::Config;
use error::Error;
use search::SearchState;
use term::dimensions::Dimensions;
use term::input::{Decoder, Event};
use term::raw::RawGuard;
use term::render::Renderer;
use trigger::{any_subscription, signal_subscription};

fn main() -> ExitCode {
    match run() {
        Ok(Some(note_path)) => {
            // `exec` only returns on failure; the terminal is already clean.
            let err = editor::launch(&note_path);
            eprintln!("noted: {err}");
            ExitCode::FAILURE
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("noted: {err}");
            ExitCode::FAILURE
        }
    }
}

enum Done {
    Quit,
    Selected(String),
}

fn run() -> Result<Option<PathBuf>, Error> {
    let config = Config::load()?;
    logger::install(config.log_file.as_deref())?;

    let raw_guard = RawGuard::enable().map_err(Error::Tty)?;

    let (fail_tx, fail_rx) = crossbeam::channel::unbounded::<Error>();
    let (selection_tx, selection_rx) = mpsc::channel::<String>();

    let search = SearchState::new(config.notes_directory.clone(), selection_tx);
    let dims = Dimensions::new();

    spawn_worker(&fail_tx, {
        let search = search.clone();
        move || search.run()
    });

    spawn_worker(&fail_tx, {
        let dims = dims.clone();
        move || {
            let winch = signal_subscription(&[signal_hook::consts::SIGWINCH])?;
            dims.run(winch)
        }
    });

    spawn_worker(&fail_tx, {
        let search = search.clone();
        let dims = dims.clone();
        move || run_input(&search, &dims)
    });

    spawn_worker(&fail_tx, {
        let search = search.clone();
        let dims = dims.clone();
        move || {
            let combined = any_subscription(vec![search.subscribe(), dims.subscribe()]);
            Renderer::new().run(combined, &search, &dims)
        }
    });

    let quit = signal_subscription(&[signal_hook::consts::SIGINT, signal_hook::consts::SIGTERM])?;
    let (quit_tx, quit_rx) = crossbeam::channel::bounded::<()>(1);
    thread::spawn(move || {
        let mut quit = quit;
        quit.wait();
        let _ = quit_tx.send(());
    });

    let (selection_relay_tx, selection_relay_rx) = crossbeam::channel::bounded::<String>(1);
    thread::spawn(move || {
        if let Ok(path) = selection_rx.recv() {
            let _ = selection_relay_tx.send(path);
        }
    });

    let outcome: Result<Done, Error> = crossbeam::channel::select! {
        recv(fail_rx) -> err => Err(err.expect("fail_tx is held by every worker thread")),
        recv(quit_rx) -> _ => Ok(Done::Quit),
        recv(selection_relay_rx) -> path => {
            Ok(Done::Selected(path.expect("selection_tx is held by the search worker")))
        },
    };

    cleanup_terminal().map_err(Error::Tty)?;
    drop(raw_guard);

    match outcome? {
        Done::Quit => Ok(None),
        Done::Selected(path) if path.is_empty() => Ok(None),
        Done::Selected(path) => Ok(Some(PathBuf::from(path))),
    }
}

fn spawn_worker<F>(fail_tx: &CbSender<Error>, f: F)
where
    F: FnOnce() -> Result<(), Error> + Send + 'static,
{
    let fail_tx = fail_tx.clone();
    thread::spawn(move || {
        if let Err(err) = f() {
            let _ = fail_tx.send(err);
        }
    });
}

fn run_input(search: &SearchState, dims: &Dimensions) -> Result<(), Error> {
    let mut decoder = Decoder::new(io::stdin());
    loop {
        let event = decoder.next_event(|row, col| dims.handle_cpr(row, col))?;
        match event {
            Event::Append(c) => search.append(c),
            Event::Backspace => search.backspace(),
            Event::Select => search.select(),
            Event::MoveUp => search.select_prev(),
            Event::MoveDown => search.select_next(),
        }
    }
}

/// Cleanup run on every exit path: erase stale UI and show the cursor
/// before termios is restored.
fn cleanup_terminal() -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    out.queue(Clear(ClearType::All))?;
    write!(out, "\r")?;
    out.queue(Show)?;
    out.flush()
}
