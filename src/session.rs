//! The interactive menu loop.
//!
//! The session is either unauthenticated or holds a token. Each state has
//! its own menu; the menu tables below are used both to print the choices
//! and to turn a typed key into a [`Command`].

use anyhow::Result;
use colored::Colorize;
use tracing::debug;

use crate::client::TableApi;
use crate::operations;
use crate::prompts::{Cancelled, Prompter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SignUp,
    Login,
    Insert,
    Select,
    Delete,
    Logout,
    Exit,
}

pub struct MenuEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub command: Command,
}

const fn entry(key: &'static str, label: &'static str, command: Command) -> MenuEntry {
    MenuEntry {
        key,
        label,
        command,
    }
}

const UNAUTHENTICATED_MENU: &[MenuEntry] = &[
    entry("1", "Sign-up", Command::SignUp),
    entry("2", "Login", Command::Login),
    entry("0", "Exit", Command::Exit),
];

const AUTHENTICATED_MENU: &[MenuEntry] = &[
    entry("3", "Insert", Command::Insert),
    entry("4", "Select", Command::Select),
    entry("5", "Delete", Command::Delete),
    entry("6", "Logout", Command::Logout),
    entry("0", "Exit", Command::Exit),
];

impl State {
    pub fn menu(self) -> &'static [MenuEntry] {
        match self {
            State::Unauthenticated => UNAUTHENTICATED_MENU,
            State::Authenticated => AUTHENTICATED_MENU,
        }
    }

    fn title(self) -> &'static str {
        match self {
            State::Unauthenticated => "--- Not authenticated ---",
            State::Authenticated => "--- Authenticated ---",
        }
    }

    fn invalid_input_message(self) -> &'static str {
        match self {
            State::Unauthenticated => "Invalid choice!",
            State::Authenticated => "Invalid operation!",
        }
    }
}

impl Command {
    /// Look a typed key up in the menu of `state`.
    pub fn parse(state: State, input: &str) -> Option<Self> {
        let input = input.trim();
        state
            .menu()
            .iter()
            .find(|entry| entry.key == input)
            .map(|entry| entry.command)
    }
}

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Authentication state of the running process. Never persisted.
#[derive(Debug, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> State {
        match &self.token {
            Some(_) => State::Authenticated,
            None => State::Unauthenticated,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Store a token; an empty one leaves the session unauthenticated.
    pub fn sign_in(&mut self, token: String) {
        if !token.is_empty() {
            self.token = Some(token);
        }
    }

    pub fn logout(&mut self) {
        self.token = None;
    }
}

fn print_menu(state: State) {
    println!("\n{}", state.title().bold());
    for entry in state.menu() {
        println!("{}. {}", entry.key, entry.label);
    }
}

/// Run `command` against the session.
pub async fn dispatch(
    session: &mut Session,
    command: Command,
    prompter: &mut impl Prompter,
    api: &impl TableApi,
) -> Result<Flow> {
    match command {
        Command::SignUp => {
            if let Some(token) = operations::sign_up(prompter, api).await? {
                session.sign_in(token);
            }
        }
        Command::Login => {
            if let Some(token) = operations::login(prompter, api).await? {
                session.sign_in(token);
            }
        }
        Command::Insert => {
            if let Some(token) = session.token() {
                let outcome = operations::insert(prompter, api, token).await?;
                debug!(?outcome, "insert finished");
            }
        }
        Command::Select => {
            if let Some(token) = session.token() {
                let outcome = operations::select(prompter, api, token).await?;
                debug!(?outcome, "select finished");
            }
        }
        Command::Delete => {
            if let Some(token) = session.token() {
                let outcome = operations::delete(prompter, api, token).await?;
                debug!(?outcome, "delete finished");
            }
        }
        Command::Logout => {
            session.logout();
            println!("Logged out!");
        }
        Command::Exit => return Ok(Flow::Exit),
    }

    Ok(Flow::Continue)
}

/// Handle one line typed at the menu of the session's current state.
pub async fn step(
    session: &mut Session,
    input: &str,
    prompter: &mut impl Prompter,
    api: &impl TableApi,
) -> Result<Flow> {
    let state = session.state();
    let Some(command) = Command::parse(state, input) else {
        println!("{}", state.invalid_input_message().yellow());
        return Ok(Flow::Continue);
    };

    debug!(?state, ?command, "dispatching command");
    match dispatch(session, command, prompter, api).await {
        Err(err) if err.is::<Cancelled>() => {
            println!("{}", "Cancelled.".yellow());
            Ok(Flow::Continue)
        }
        flow => flow,
    }
}

/// Show the menu, read a line, act on it; until the user exits.
pub async fn run(
    session: &mut Session,
    prompter: &mut impl Prompter,
    api: &impl TableApi,
) -> Result<()> {
    loop {
        print_menu(session.state());
        let input = match prompter.text("Enter the operation you would like to do:") {
            Err(err) if err.is::<Cancelled>() => continue,
            input => input?,
        };
        if step(session, &input, prompter, api).await? == Flow::Exit {
            break;
        }
    }

    Ok(())
}
