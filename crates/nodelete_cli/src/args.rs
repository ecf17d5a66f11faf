use std::collections::BTreeSet;

use nodelete::{SettingsFlag, UserId};
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    List,
    Add(UserId),
    Remove(UserId),
    Clear,
    Set(SettingsFlag, bool),
    Open(UserId),
}

#[derive(Debug, Default)]
pub struct Args {
    pub datapath: Option<String>,
    pub profiles: Option<String>,
    pub yes: bool,
    pub command: Option<Command>,
}

fn parse_switch(value: &str) -> Option<bool> {
    match value {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

impl Args {
    // parse arguments, return set of unrecognized args
    pub fn parse(args: &[String]) -> (Self, BTreeSet<String>) {
        let mut unrecognized_args = BTreeSet::new();
        let mut res = Args::default();

        let mut i = 0;
        let len = args.len();
        while i < len {
            let arg = args[i].as_str();

            if arg == "--datapath" {
                i += 1;
                res.datapath = args.get(i).cloned();
                if res.datapath.is_none() {
                    error!("datapath argument missing?");
                }
            } else if arg == "--profiles" {
                i += 1;
                res.profiles = args.get(i).cloned();
                if res.profiles.is_none() {
                    error!("profiles argument missing?");
                }
            } else if arg == "--yes" || arg == "-y" {
                res.yes = true;
            } else if res.command.is_some() {
                unrecognized_args.insert(arg.to_owned());
            } else {
                match arg {
                    "show" => res.command = Some(Command::Show),
                    "list" => res.command = Some(Command::List),
                    "clear" => res.command = Some(Command::Clear),
                    "add" | "remove" | "open" => {
                        i += 1;
                        let Some(id) = args.get(i) else {
                            error!("{arg} needs a user id");
                            unrecognized_args.insert(arg.to_owned());
                            i += 1;
                            continue;
                        };
                        let id = UserId::new(id.as_str());
                        res.command = Some(match arg {
                            "add" => Command::Add(id),
                            "remove" => Command::Remove(id),
                            _ => Command::Open(id),
                        });
                    }
                    "set" => {
                        let flag = args.get(i + 1).and_then(|f| f.parse::<SettingsFlag>().ok());
                        let value = args.get(i + 2).and_then(|v| parse_switch(v));
                        match (flag, value) {
                            (Some(flag), Some(value)) => {
                                res.command = Some(Command::Set(flag, value));
                                i += 2;
                            }
                            _ => {
                                error!("usage: set <flag> <on|off>");
                                unrecognized_args.insert(arg.to_owned());
                            }
                        }
                    }
                    _ => {
                        unrecognized_args.insert(arg.to_owned());
                    }
                }
            }

            i += 1;
        }

        (res, unrecognized_args)
    }
}
