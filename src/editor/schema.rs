//! Form definitions of the editable resources

use super::form::{FieldKind, FieldSpec, Normalizer, Rule};
use crate::models::activity::ACTIVITY_TYPES;
use crate::models::student::STUDENT_CATEGORIES;
use crate::models::unit::UNIT_STATUSES;
use crate::models::{Activity, Resource, Student, Unit};

/// A resource with an editor form
pub trait FormResource: Resource {
    /// Background PUT after the form has been idle in edit mode
    const AUTO_SAVE: bool = false;
    const CREATED_MESSAGE: &'static str;
    const UPDATED_MESSAGE: &'static str;

    fn fields() -> &'static [FieldSpec];

    fn field(name: &str) -> Option<&'static FieldSpec> {
        Self::fields().iter().find(|f| f.name == name)
    }

    /// Key of the create-form draft in the preference store
    fn draft_key() -> &'static str {
        Self::PLURAL
    }
}

const UNIT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("organizationId", "Organização"),
    FieldSpec::text("name", "Nome").rules(&[Rule::Required, Rule::MaxLen(100)]),
    FieldSpec::text("description", "Descrição").rules(&[Rule::MaxLen(500)]),
    FieldSpec::text("phone", "Telefone")
        .normalize(Normalizer::Digits)
        .rules(&[Rule::Required, Rule::Phone]),
    FieldSpec::text("email", "Email")
        .normalize(Normalizer::Lower)
        .rules(&[Rule::Email]),
    FieldSpec::text("address", "Endereço").rules(&[Rule::MaxLen(200)]),
    FieldSpec::text("number", "Número").rules(&[Rule::MaxLen(20)]),
    FieldSpec::text("complement", "Complemento"),
    FieldSpec::text("neighborhood", "Bairro"),
    FieldSpec::text("city", "Cidade"),
    FieldSpec::text("state", "Estado")
        .normalize(Normalizer::Upper)
        .rules(&[Rule::StateCode]),
    FieldSpec::text("zipcode", "CEP")
        .normalize(Normalizer::Digits)
        .rules(&[Rule::ZipCode]),
    FieldSpec::text("capacity", "Capacidade")
        .kind(FieldKind::Integer)
        .rules(&[Rule::IntRange(0, 100_000)]),
    FieldSpec::text("status", "Status")
        .normalize(Normalizer::Lower)
        .rules(&[Rule::OneOf(UNIT_STATUSES)]),
    FieldSpec::text("operatingHours", "Horário de funcionamento"),
];

impl FormResource for Unit {
    const CREATED_MESSAGE: &'static str = "Unidade criada com sucesso!";
    const UPDATED_MESSAGE: &'static str = "Unidade atualizada com sucesso!";

    fn fields() -> &'static [FieldSpec] {
        UNIT_FIELDS
    }
}

const ACTIVITY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Título").rules(&[Rule::Required, Rule::MaxLen(200)]),
    FieldSpec::text("description", "Descrição").rules(&[Rule::MaxLen(1000)]),
    FieldSpec::text("type", "Tipo")
        .normalize(Normalizer::Upper)
        .rules(&[Rule::Required, Rule::OneOf(ACTIVITY_TYPES)]),
    FieldSpec::text("difficulty", "Dificuldade")
        .kind(FieldKind::Integer)
        .rules(&[Rule::Required, Rule::IntRange(1, 5)]),
    FieldSpec::text("duration", "Duração")
        .kind(FieldKind::Integer)
        .rules(&[Rule::Required, Rule::IntRange(1, 120)]),
    FieldSpec::text("equipment", "Equipamentos").kind(FieldKind::List),
    FieldSpec::text("safety", "Segurança").rules(&[Rule::MaxLen(500)]),
    FieldSpec::text("objectives", "Objetivos de aprendizado").rules(&[Rule::MaxLen(500)]),
    FieldSpec::text("variations", "Variações e progressões").rules(&[Rule::MaxLen(500)]),
    FieldSpec::text("notes", "Observações").rules(&[Rule::MaxLen(300)]),
];

impl FormResource for Activity {
    const AUTO_SAVE: bool = true;
    const CREATED_MESSAGE: &'static str = "Atividade criada com sucesso";
    const UPDATED_MESSAGE: &'static str = "Atividade atualizada com sucesso";

    fn fields() -> &'static [FieldSpec] {
        ACTIVITY_FIELDS
    }
}

const STUDENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("user.firstName", "Nome").rules(&[Rule::Required, Rule::MinLen(2)]),
    FieldSpec::text("user.lastName", "Sobrenome").rules(&[Rule::Required]),
    FieldSpec::text("user.email", "Email")
        .normalize(Normalizer::Lower)
        .rules(&[Rule::Required, Rule::Email]),
    FieldSpec::text("user.phone", "Telefone")
        .normalize(Normalizer::Digits)
        .rules(&[Rule::Phone]),
    FieldSpec::text("user.cpf", "CPF")
        .normalize(Normalizer::Digits)
        .rules(&[Rule::Cpf]),
    FieldSpec::text("user.birthDate", "Data de nascimento").kind(FieldKind::Date),
    FieldSpec::text("category", "Categoria")
        .normalize(Normalizer::Upper)
        .rules(&[Rule::Required, Rule::OneOf(STUDENT_CATEGORIES)]),
    FieldSpec::text("physicalCondition", "Condição física"),
    FieldSpec::text("isActive", "Ativo").kind(FieldKind::Bool),
    FieldSpec::text("emergencyContact", "Contato de emergência"),
    FieldSpec::text("medicalConditions", "Condições médicas").rules(&[Rule::MaxLen(1000)]),
];

impl FormResource for Student {
    const CREATED_MESSAGE: &'static str = "Estudante cadastrado com sucesso!";
    const UPDATED_MESSAGE: &'static str = "Estudante atualizado com sucesso!";

    fn fields() -> &'static [FieldSpec] {
        STUDENT_FIELDS
    }
}
