//! Line-oriented commands standing in for the page's controls.
//!
//! | Command | Page equivalent |
//! |---------|-----------------|
//! | `toggle <flag> [on\|off]` | clicking a flag checkbox |
//! | `scenario <n>` | one of the four scenario buttons |
//! | `scenarios` | reading the scenario section |
//! | `status` | looking at the page |

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Flip a flag, or set it when a value is given. The name is passed
    /// through unvalidated, exactly as a checkbox handler would.
    Toggle {
        /// Flag wire key.
        name: String,
        /// Explicit value, if any.
        value: Option<bool>,
    },
    /// Apply a scenario by index. Negative and out-of-range indices are
    /// accepted here and ignored when applied.
    Scenario(i64),
    /// List the scenarios.
    Scenarios,
    /// Print the flags and the page.
    Status,
    /// Print the command summary.
    Help,
    /// Exit.
    Quit,
}

/// Errors produced while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// The line was blank.
    #[error("empty command")]
    Empty,

    /// The first word is not a command.
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    /// A required argument was not given.
    #[error("`{command}` needs a {argument}")]
    MissingArgument {
        /// The command being parsed.
        command: &'static str,
        /// What was missing.
        argument: &'static str,
    },

    /// An argument could not be parsed.
    #[error("invalid {argument} `{value}`")]
    InvalidArgument {
        /// What was being parsed.
        argument: &'static str,
        /// The offending text.
        value: String,
    },

    /// More arguments than the command takes.
    #[error("too many arguments for `{0}`")]
    TooManyArguments(&'static str),
}

/// Summary printed by `help`.
pub const HELP: &str = "\
commands:
  toggle <flag> [on|off]   flip a flag (darkMode, newHeader, analytics, premiumFeatures)
  scenario <0-3>           apply a rollout scenario
  scenarios                list the scenarios
  status                   show flags and page
  help                     show this message
  quit                     exit";

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Empty);
        };

        let command = match verb {
            "toggle" | "t" => {
                let name = words.next().ok_or(CommandError::MissingArgument {
                    command: "toggle",
                    argument: "flag name",
                })?;
                let value = words.next().map(parse_switch).transpose()?;
                Self::Toggle {
                    name: name.to_owned(),
                    value,
                }
            }
            "scenario" | "s" => {
                let raw = words.next().ok_or(CommandError::MissingArgument {
                    command: "scenario",
                    argument: "scenario index",
                })?;
                let Ok(index) = raw.parse::<i64>() else {
                    return Err(CommandError::InvalidArgument {
                        argument: "scenario index",
                        value: raw.to_owned(),
                    });
                };
                Self::Scenario(index)
            }
            "scenarios" | "ls" => Self::Scenarios,
            "status" | "st" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(CommandError::Unknown(other.to_owned())),
        };

        if words.next().is_some() {
            return Err(CommandError::TooManyArguments(command.verb()));
        }
        Ok(command)
    }

    const fn verb(&self) -> &'static str {
        match self {
            Self::Toggle { .. } => "toggle",
            Self::Scenario(_) => "scenario",
            Self::Scenarios => "scenarios",
            Self::Status => "status",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

fn parse_switch(word: &str) -> Result<bool, CommandError> {
    match word {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(CommandError::InvalidArgument {
            argument: "flag value",
            value: other.to_owned(),
        }),
    }
}
