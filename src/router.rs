//! Hash-path routes of the admin panel

use std::fmt;
use std::str::FromStr;

use crate::utils::errors::AcademyError;

/// Screens of the admin panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Activities,
    NewActivity,
    EditActivity(String),
    Units,
    NewUnit,
    EditUnit(String),
    Students,
    NewStudent,
    EditStudent(String),
    StudentPersonal(String),
}

impl Route {
    /// Parse `#/students/42`, `/students/42` or `students/42`
    pub fn parse(path: &str) -> Result<Self, AcademyError> {
        let trimmed = path.trim();
        let clean = trimmed.trim_start_matches('#').trim_matches('/');
        let segments: Vec<&str> = clean.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            ["activities"] => Route::Activities,
            ["activities", "new"] => Route::NewActivity,
            ["activities", id, "edit"] => Route::EditActivity(id.to_string()),
            ["units"] => Route::Units,
            ["units", "new"] => Route::NewUnit,
            ["units", id] => Route::EditUnit(id.to_string()),
            ["students"] => Route::Students,
            ["students", "new"] => Route::NewStudent,
            ["students", id] => Route::EditStudent(id.to_string()),
            ["students", id, "personal"] => Route::StudentPersonal(id.to_string()),
            _ => {
                return Err(AcademyError::InvalidInput(format!(
                    "rota desconhecida: {}",
                    trimmed
                )))
            }
        };
        Ok(route)
    }

    /// The list screen an editor returns to
    pub fn list_route(&self) -> Route {
        match self {
            Route::Activities | Route::NewActivity | Route::EditActivity(_) => Route::Activities,
            Route::Units | Route::NewUnit | Route::EditUnit(_) => Route::Units,
            Route::Students
            | Route::NewStudent
            | Route::EditStudent(_)
            | Route::StudentPersonal(_) => Route::Students,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Route::Activities | Route::Units | Route::Students)
    }
}

impl FromStr for Route {
    type Err = AcademyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Activities => f.write_str("#/activities"),
            Route::NewActivity => f.write_str("#/activities/new"),
            Route::EditActivity(id) => write!(f, "#/activities/{}/edit", id),
            Route::Units => f.write_str("#/units"),
            Route::NewUnit => f.write_str("#/units/new"),
            Route::EditUnit(id) => write!(f, "#/units/{}", id),
            Route::Students => f.write_str("#/students"),
            Route::NewStudent => f.write_str("#/students/new"),
            Route::EditStudent(id) => write!(f, "#/students/{}", id),
            Route::StudentPersonal(id) => write!(f, "#/students/{}/personal", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("#/activities").unwrap(), Route::Activities);
        assert_eq!(
            Route::parse("#/activities/12/edit").unwrap(),
            Route::EditActivity("12".to_string())
        );
        assert_eq!(Route::parse("/units/new").unwrap(), Route::NewUnit);
        assert_eq!(Route::parse("#/units/3").unwrap(), Route::EditUnit("3".to_string()));
        assert_eq!(
            Route::parse("#/students/9/personal").unwrap(),
            Route::StudentPersonal("9".to_string())
        );
    }

    #[test]
    fn test_unknown_route_is_rejected() {
        assert_matches!(Route::parse("#/reports"), Err(AcademyError::InvalidInput(_)));
        assert_matches!(Route::parse("#/activities/12"), Err(AcademyError::InvalidInput(_)));
        assert_matches!(Route::parse(""), Err(AcademyError::InvalidInput(_)));
    }

    #[test]
    fn test_display_round_trips_and_list_route() {
        let route = Route::EditStudent("5".to_string());
        assert_eq!(Route::parse(&route.to_string()).unwrap(), route);
        assert_eq!(route.list_route(), Route::Students);
        assert!(!route.is_list());
    }
}
