//! Console command grammar.

use cs_domain::InputError;
use cs_load::catalog::parse_weight;
use cs_load::load::parse_integer;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    List,
    Set { id: String, quantity: i64 },
    Add { name: String, weight: f64 },
    Delete { id: String },
    Capacity { value: i64 },
    Reset,
    Status,
    Advice,
    Help,
    Exit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Unknown(String),
    Usage(&'static str),
    Input(InputError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Unknown(cmd) => write!(f, "unknown command: {cmd}  (type help for a list)"),
            ParseError::Usage(usage) => write!(f, "usage: {usage}"),
            ParseError::Input(e) => write!(f, "{e}"),
        }
    }
}

pub const HELP: &str = "\
Commands:
  list                    Show container types and quantities
  set <id> <qty>          Set the quantity of a container type
  add <weight> <name...>  Add a custom container type (weight in kg)
  delete <id>             Delete a custom container type
  capacity <kg>           Set the vehicle capacity
  reset                   Clear all quantities (asks for confirmation)
  status                  Show totals and the current advice
  advice                  Wait for the advice on the current load
  help                    Show this help
  exit, quit              Leave the console";

/// Parse one console line. Numeric fields use integer-field semantics:
/// malformed quantities and capacities are coerced, never rejected.
pub fn parse_command(line: &str) -> Result<ConsoleCommand, ParseError> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Err(ParseError::Usage("help"));
    };
    let rest: Vec<&str> = words.collect();

    match cmd.to_ascii_lowercase().as_str() {
        "list" | "ls" => Ok(ConsoleCommand::List),
        "set" => match rest.as_slice() {
            [id, qty] => Ok(ConsoleCommand::Set {
                id: (*id).to_owned(),
                quantity: parse_integer(qty),
            }),
            _ => Err(ParseError::Usage("set <id> <qty>")),
        },
        "add" => match rest.split_first() {
            Some((weight, name)) if !name.is_empty() => {
                let weight = parse_weight(weight).map_err(ParseError::Input)?;
                Ok(ConsoleCommand::Add {
                    name: name.join(" "),
                    weight,
                })
            }
            _ => Err(ParseError::Usage("add <weight> <name...>")),
        },
        "delete" | "rm" => match rest.as_slice() {
            [id] => Ok(ConsoleCommand::Delete {
                id: (*id).to_owned(),
            }),
            _ => Err(ParseError::Usage("delete <id>")),
        },
        "capacity" | "cap" => match rest.as_slice() {
            [value] => Ok(ConsoleCommand::Capacity {
                value: parse_integer(value),
            }),
            _ => Err(ParseError::Usage("capacity <kg>")),
        },
        "reset" => Ok(ConsoleCommand::Reset),
        "status" => Ok(ConsoleCommand::Status),
        "advice" => Ok(ConsoleCommand::Advice),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "exit" | "quit" => Ok(ConsoleCommand::Exit),
        other => Err(ParseError::Unknown(other.to_owned())),
    }
}

/// `y`/`yes` (any case) confirms; everything else declines.
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
