//! Client-side field validation
//!
//! Mirrors the checks the backend repeats; messages are user-facing.

use std::sync::OnceLock;

use regex::Regex;

use super::form::{FieldKind, FieldSpec, FormState, Rule};
use crate::utils::errors::FieldError;

static EMAIL_RE: OnceLock<Option<Regex>> = OnceLock::new();
static ZIP_CODE_RE: OnceLock<Option<Regex>> = OnceLock::new();
static STATE_CODE_RE: OnceLock<Option<Regex>> = OnceLock::new();

/// Match against a lazily compiled pattern; an uncompilable pattern never matches
fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .map_or(false, |re| re.is_match(value))
}

/// First rule the normalised value breaks, as a message
pub fn validate_field(field: &FieldSpec, value: &str) -> Option<String> {
    if value.is_empty() {
        return field
            .is_required()
            .then(|| format!("{} é obrigatório", field.label));
    }

    if let Some(message) = check_kind(field, value) {
        return Some(message);
    }

    field.rules.iter().find_map(|rule| check_rule(field, rule, value))
}

fn check_kind(field: &FieldSpec, value: &str) -> Option<String> {
    match field.kind {
        FieldKind::Integer if value.parse::<i64>().is_err() => {
            Some(format!("{} deve ser um número inteiro", field.label))
        }
        FieldKind::Date if chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() => {
            Some(format!("{} deve estar no formato AAAA-MM-DD", field.label))
        }
        _ => None,
    }
}

fn check_rule(field: &FieldSpec, rule: &Rule, value: &str) -> Option<String> {
    let digits = || value.chars().filter(|c| c.is_ascii_digit()).count();
    match rule {
        Rule::Required => None,
        Rule::Email if !matches(&EMAIL_RE, r"^[^\s@]+@[^\s@]+\.[^\s@]+$", value) => Some("Email inválido".to_string()),
        Rule::ZipCode if !matches(&ZIP_CODE_RE, r"^\d{8,9}$", value) => {
            Some("CEP deve ter 8 ou 9 dígitos".to_string())
        }
        Rule::StateCode if !matches(&STATE_CODE_RE, r"^[A-Z]{2}$", value) => {
            Some("Estado deve ter 2 letras".to_string())
        }
        Rule::Phone if !(10..=11).contains(&digits()) || digits() != value.len() => {
            Some("Telefone deve ter 10 ou 11 dígitos".to_string())
        }
        Rule::Cpf if digits() != 11 || value.len() != 11 => {
            Some("CPF deve ter 11 dígitos".to_string())
        }
        Rule::MinLen(min) if value.chars().count() < *min => {
            Some(format!("{} deve ter pelo menos {} caracteres", field.label, min))
        }
        Rule::MaxLen(max) if value.chars().count() > *max => {
            Some(format!("{} deve ter no máximo {} caracteres", field.label, max))
        }
        Rule::IntRange(min, max) => match value.parse::<i64>() {
            Ok(n) if (*min..=*max).contains(&n) => None,
            _ => Some(format!("{} deve estar entre {} e {}", field.label, min, max)),
        },
        Rule::OneOf(allowed) if !allowed.contains(&value) => {
            Some(format!("{} inválido: {}", field.label, value))
        }
        _ => None,
    }
}

/// Check every field; an empty result means the form may be submitted
pub fn validate_form(fields: &[FieldSpec], form: &FormState) -> Vec<FieldError> {
    fields
        .iter()
        .filter_map(|field| {
            validate_field(field, &form.normalized(field))
                .map(|message| FieldError::new(field.name, message))
        })
        .collect()
}

/// Attach server-side errors to form fields
///
/// A path matches a field by its full dotted name, else by its last
/// segment; anything else stays a form-level error under its own path.
pub fn map_server_errors(fields: &[FieldSpec], errors: &[FieldError]) -> Vec<FieldError> {
    errors
        .iter()
        .map(|error| {
            if fields.iter().any(|f| f.name == error.field) {
                return error.clone();
            }
            let leaf = error.field.rsplit('.').next().unwrap_or(&error.field);
            match fields.iter().find(|f| f.leaf() == leaf) {
                Some(field) => FieldError::new(field.name, error.message.clone()),
                None => error.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::form::Normalizer;

    const ZIP: FieldSpec = FieldSpec::text("zipcode", "CEP")
        .normalize(Normalizer::Digits)
        .rules(&[Rule::ZipCode]);
    const STATE: FieldSpec = FieldSpec::text("state", "Estado")
        .normalize(Normalizer::Upper)
        .rules(&[Rule::StateCode]);
    const NAME: FieldSpec = FieldSpec::text("name", "Nome").rules(&[Rule::Required, Rule::MaxLen(10)]);
    const EMAIL: FieldSpec = FieldSpec::text("user.email", "Email").rules(&[Rule::Email]);
    const LEVEL: FieldSpec = FieldSpec::text("difficulty", "Dificuldade")
        .kind(FieldKind::Integer)
        .rules(&[Rule::IntRange(1, 5)]);

    #[test]
    fn test_zip_code_is_cleaned_then_accepted() {
        let cleaned = ZIP.normalizer.apply("01310-100");
        assert_eq!(cleaned, "01310100");
        assert_eq!(validate_field(&ZIP, &cleaned), None);
        assert!(validate_field(&ZIP, "0131").is_some());
    }

    #[test]
    fn test_state_is_uppercased() {
        let cleaned = STATE.normalizer.apply(" sp ");
        assert_eq!(cleaned, "SP");
        assert_eq!(validate_field(&STATE, &cleaned), None);
        assert!(validate_field(&STATE, "SPX").is_some());
    }

    #[test]
    fn test_required_and_optional_empty() {
        assert_eq!(validate_field(&NAME, "").as_deref(), Some("Nome é obrigatório"));
        assert_eq!(validate_field(&EMAIL, ""), None);
        assert!(validate_field(&NAME, "um nome longo demais").is_some());
    }

    #[test]
    fn test_email_and_ranges() {
        assert_eq!(validate_field(&EMAIL, "ana@ex.com"), None);
        assert_eq!(validate_field(&EMAIL, "ana@ex").as_deref(), Some("Email inválido"));
        assert!(validate_field(&LEVEL, "6").is_some());
        assert!(validate_field(&LEVEL, "três").is_some());
        assert_eq!(validate_field(&LEVEL, "3"), None);
    }

    #[test]
    fn test_validate_form_collects_every_field() {
        let mut form = FormState::new();
        form.set("zipcode", "123");
        let errors = validate_form(&[NAME, ZIP, EMAIL], &form);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "zipcode"]);
    }

    #[test]
    fn test_server_errors_map_by_leaf() {
        let mapped = map_server_errors(
            &[NAME, EMAIL],
            &[
                FieldError::new("email", "Email inválido"),
                FieldError::new("name", "Nome em uso"),
                FieldError::new("form", "Falha geral"),
            ],
        );
        assert_eq!(mapped[0].field, "user.email");
        assert_eq!(mapped[1].field, "name");
        assert_eq!(mapped[2].field, "form");
    }
}
