//! Console command parsing

use std::path::PathBuf;
use std::str::FromStr;

use crate::list::{SortOrder, ViewMode};
use crate::router::Route;
use crate::utils::errors::AcademyError;

/// Everything the console understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a screen by hash path
    Go(Route),
    Next,
    Prev,
    Page(u32),
    Search(String),
    Filter { key: String, value: String },
    Clear,
    Sort { field: String, order: SortOrder },
    Select(String),
    Unselect(String),
    SelectPage,
    SelectAll,
    Deselect,
    Delete(String),
    DeleteSelected,
    Reload,
    View(ViewMode),
    Export,
    Import(PathBuf),
    Set { field: String, value: String },
    Save,
    Cancel,
    Instructors,
    Slots { instructor: String, date: String },
    /// Book the n-th (1-based) slot of the last `slots` listing
    Book(usize),
    Health,
    Help,
    Quit,
}

pub const HELP: &str = "\
Navegação: #/activities  #/activities/new  #/activities/ID/edit
           #/units  #/units/new  #/units/ID
           #/students  #/students/new  #/students/ID  #/students/ID/personal
Listas:    next | prev | page N | search TEXTO | filter CAMPO VALOR | clear
           sort CAMPO [asc|desc] | select ID | unselect ID | select-page
           select-all | deselect | delete ID | delete-selected | reload
           view table|cards | export | import ARQUIVO
Edição:    set CAMPO VALOR | save | cancel
Personal:  instructors | slots INSTRUTOR AAAA-MM-DD | book N
Geral:     health | help | quit";

impl Command {
    /// Needs a `y/N` answer before it runs
    pub fn is_destructive(&self) -> bool {
        matches!(self, Command::Delete(_) | Command::DeleteSelected)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Go(_) => "go",
            Command::Next => "next",
            Command::Prev => "prev",
            Command::Page(_) => "page",
            Command::Search(_) => "search",
            Command::Filter { .. } => "filter",
            Command::Clear => "clear",
            Command::Sort { .. } => "sort",
            Command::Select(_) => "select",
            Command::Unselect(_) => "unselect",
            Command::SelectPage => "select-page",
            Command::SelectAll => "select-all",
            Command::Deselect => "deselect",
            Command::Delete(_) => "delete",
            Command::DeleteSelected => "delete-selected",
            Command::Reload => "reload",
            Command::View(_) => "view",
            Command::Export => "export",
            Command::Import(_) => "import",
            Command::Set { .. } => "set",
            Command::Save => "save",
            Command::Cancel => "cancel",
            Command::Instructors => "instructors",
            Command::Slots { .. } => "slots",
            Command::Book(_) => "book",
            Command::Health => "health",
            Command::Help => "help",
            Command::Quit => "quit",
        }
    }
}

fn usage(text: &str) -> AcademyError {
    AcademyError::InvalidInput(format!("uso: {}", text))
}

impl FromStr for Command {
    type Err = AcademyError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with('/') {
            return Route::parse(line).map(Command::Go);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        let command = match word.to_ascii_lowercase().as_str() {
            "next" => Command::Next,
            "prev" => Command::Prev,
            "page" => {
                let page = rest.parse::<u32>().map_err(|_| usage("page N"))?;
                Command::Page(page)
            }
            // An empty search clears it
            "search" => Command::Search(rest.to_string()),
            "filter" => {
                let key = args.next().ok_or_else(|| usage("filter CAMPO VALOR"))?;
                let value = rest[key.len()..].trim();
                Command::Filter {
                    key: key.to_string(),
                    value: value.to_string(),
                }
            }
            "clear" => Command::Clear,
            "sort" => {
                let field = args.next().ok_or_else(|| usage("sort CAMPO [asc|desc]"))?;
                let order = match args.next() {
                    Some(order) => SortOrder::parse(order).ok_or_else(|| usage("sort CAMPO [asc|desc]"))?,
                    None => SortOrder::Asc,
                };
                Command::Sort {
                    field: field.to_string(),
                    order,
                }
            }
            "select" => Command::Select(args.next().ok_or_else(|| usage("select ID"))?.to_string()),
            "unselect" => Command::Unselect(args.next().ok_or_else(|| usage("unselect ID"))?.to_string()),
            "select-page" => Command::SelectPage,
            "select-all" => Command::SelectAll,
            "deselect" => Command::Deselect,
            "delete" => Command::Delete(args.next().ok_or_else(|| usage("delete ID"))?.to_string()),
            "delete-selected" => Command::DeleteSelected,
            "reload" => Command::Reload,
            "view" => Command::View(ViewMode::parse(rest).ok_or_else(|| usage("view table|cards"))?),
            "export" => Command::Export,
            "import" => {
                if rest.is_empty() {
                    return Err(usage("import ARQUIVO"));
                }
                Command::Import(PathBuf::from(rest))
            }
            "set" => {
                let field = args.next().ok_or_else(|| usage("set CAMPO VALOR"))?;
                Command::Set {
                    field: field.to_string(),
                    value: rest[field.len()..].trim().to_string(),
                }
            }
            "save" => Command::Save,
            "cancel" => Command::Cancel,
            "instructors" => Command::Instructors,
            "slots" => {
                let (Some(instructor), Some(date)) = (args.next(), args.next()) else {
                    return Err(usage("slots INSTRUTOR AAAA-MM-DD"));
                };
                Command::Slots {
                    instructor: instructor.to_string(),
                    date: date.to_string(),
                }
            }
            "book" => Command::Book(rest.parse::<usize>().map_err(|_| usage("book N"))?),
            "health" => Command::Health,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(AcademyError::InvalidInput(format!(
                    "comando desconhecido: {} (use 'help')",
                    other
                )))
            }
        };
        Ok(command)
    }
}

/// `y`, `s`, `yes` or `sim`; anything else declines
pub fn is_confirmation(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "sim"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_list_commands() {
        assert_eq!("page 3".parse::<Command>().unwrap(), Command::Page(3));
        assert_eq!(
            "filter type TECHNIQUE".parse::<Command>().unwrap(),
            Command::Filter {
                key: "type".to_string(),
                value: "TECHNIQUE".to_string()
            }
        );
        assert_eq!(
            "sort title desc".parse::<Command>().unwrap(),
            Command::Sort {
                field: "title".to_string(),
                order: SortOrder::Desc
            }
        );
        assert_eq!("search  chute frontal ".parse::<Command>().unwrap(), Command::Search("chute frontal".to_string()));
        assert_eq!("view cards".parse::<Command>().unwrap(), Command::View(ViewMode::Cards));
    }

    #[test]
    fn test_set_keeps_spaces_in_value() {
        assert_eq!(
            "set name Unidade Centro".parse::<Command>().unwrap(),
            Command::Set {
                field: "name".to_string(),
                value: "Unidade Centro".to_string()
            }
        );
    }

    #[test]
    fn test_routes_and_errors() {
        assert_eq!(
            "#/units/4".parse::<Command>().unwrap(),
            Command::Go(Route::EditUnit("4".to_string()))
        );
        assert_matches!("page x".parse::<Command>(), Err(AcademyError::InvalidInput(_)));
        assert_matches!("dance".parse::<Command>(), Err(AcademyError::InvalidInput(_)));
    }

    #[test]
    fn test_destructive_and_confirmation() {
        assert!(Command::DeleteSelected.is_destructive());
        assert!(Command::Delete("1".to_string()).is_destructive());
        assert!(!Command::Reload.is_destructive());
        assert!(is_confirmation("S"));
        assert!(!is_confirmation(""));
        assert!(!is_confirmation("n"));
    }
}
