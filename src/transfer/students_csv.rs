//! Students CSV export

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use super::techniques::ExportSummary;
use crate::models::Student;
use crate::utils::errors::Result;
use crate::utils::helpers::date_stamp;

pub const HEADER: [&str; 6] = ["ID", "Nome", "Email", "Telefone", "Categoria", "Status"];

pub fn csv_file_name(now: DateTime<Utc>) -> String {
    format!("alunos-{}.csv", date_stamp(now))
}

fn record(student: &Student) -> [String; 6] {
    [
        student.id.clone().unwrap_or_default(),
        student.full_name(),
        student.user.email.clone().unwrap_or_default(),
        student.user.phone.clone().unwrap_or_default(),
        student.category.map(|c| c.as_str().to_string()).unwrap_or_default(),
        student.status_label().to_string(),
    ]
}

/// Render students as CSV; every field quoted, CRLF line endings
pub fn students_to_csv(students: &[Student]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    wtr.write_record(HEADER)?;
    for student in students {
        wtr.write_record(record(student))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

/// Write `alunos-YYYY-MM-DD.csv` into `dir`
pub async fn export_students_csv(
    students: &[Student],
    dir: &Path,
    now: DateTime<Utc>,
) -> Result<ExportSummary> {
    let content = students_to_csv(students)?;
    tokio::fs::create_dir_all(dir).await?;
    let path: PathBuf = dir.join(csv_file_name(now));
    tokio::fs::write(&path, content).await?;

    info!(path = %path.display(), count = students.len(), "Students exported");
    Ok(ExportSummary {
        path,
        count: students.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StudentCategory, StudentUser};
    use chrono::TimeZone;

    fn student() -> Student {
        Student {
            id: Some("7".to_string()),
            user: StudentUser {
                first_name: "Ana".to_string(),
                last_name: "Costa, Jr".to_string(),
                email: Some("ana@ex.com".to_string()),
                phone: Some("11987654321".to_string()),
                ..StudentUser::default()
            },
            category: Some(StudentCategory::Adult),
            is_active: false,
            ..Student::default()
        }
    }

    #[test]
    fn test_csv_quotes_every_field() {
        let csv = students_to_csv(&[student()]).unwrap();
        let mut lines = csv.split("\r\n");
        assert_eq!(
            lines.next(),
            Some(r#""ID","Nome","Email","Telefone","Categoria","Status""#)
        );
        assert_eq!(
            lines.next(),
            Some(r#""7","Ana Costa, Jr","ana@ex.com","11987654321","ADULT","Inativo""#)
        );
    }

    #[tokio::test]
    async fn test_export_writes_dated_file() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2025, 1, 31, 8, 0, 0).unwrap();
        let summary = export_students_csv(&[student()], dir.path(), now).await.unwrap();

        assert_eq!(summary.count, 1);
        assert!(summary.path.ends_with("alunos-2025-01-31.csv"));
        let written = std::fs::read_to_string(&summary.path).unwrap();
        assert!(written.starts_with("\"ID\""));
    }
}
