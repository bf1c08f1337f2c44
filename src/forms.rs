//! Form definitions and field validation.
//!
//! Every form modal on the page is described by a [`FormKind`]: its DOM id, its fields, and
//! the copy shown while the simulated submission runs.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_CHARS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s+\-()]+$").unwrap());

/// Insurance type that reveals the vehicle section.
pub const VEHICLE_INSURANCE: &str = "auto";
pub const VEHICLE_YEAR_FIELD: &str = "vehicleYear";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormKind {
    Credit,
    Savings,
    Contact,
    Insurance,
    Cdat,
    Store,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Number,
    Password,
    TextArea,
    /// Select with fixed `(value, label)` options.
    Select(&'static [(&'static str, &'static str)]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: false,
    }
}

const CREDIT_TYPES: &[(&str, &str)] = &[
    ("", "Selecciona un tipo"),
    ("libre", "Libre inversión"),
    ("vivienda", "Vivienda"),
    ("vehiculo", "Vehículo"),
    ("educacion", "Educación"),
];
const SAVINGS_TYPES: &[(&str, &str)] = &[
    ("", "Selecciona un producto"),
    ("fincoahorro", "Fincoahorro"),
    ("ahorraton", "Ahorratón"),
    ("programado", "Ahorro programado"),
];
pub const INSURANCE_TYPES: &[(&str, &str)] = &[
    ("", "Selecciona un seguro"),
    ("vida", "Vida"),
    ("hogar", "Hogar"),
    ("auto", "Vehículo"),
    ("exequial", "Exequial"),
];
const CDAT_TERMS: &[(&str, &str)] = &[
    ("", "Selecciona un plazo"),
    ("90", "90 días"),
    ("180", "180 días"),
    ("360", "360 días"),
];

const CREDIT_FIELDS: &[FieldSpec] = &[
    field("fullName", "Nombre completo", FieldKind::Text),
    field("documentId", "Número de documento", FieldKind::Number),
    field("email", "Correo electrónico", FieldKind::Email),
    field("phone", "Teléfono", FieldKind::Phone),
    field("creditType", "Tipo de crédito", FieldKind::Select(CREDIT_TYPES)),
    field("amount", "Monto solicitado", FieldKind::Number),
];
const SAVINGS_FIELDS: &[FieldSpec] = &[
    field("fullName", "Nombre completo", FieldKind::Text),
    field("documentId", "Número de documento", FieldKind::Number),
    field("email", "Correo electrónico", FieldKind::Email),
    field("phone", "Teléfono", FieldKind::Phone),
    field("savingsType", "Producto de ahorro", FieldKind::Select(SAVINGS_TYPES)),
];
const CONTACT_FIELDS: &[FieldSpec] = &[
    field("name", "Nombre", FieldKind::Text),
    field("email", "Correo electrónico", FieldKind::Email),
    optional("phone", "Teléfono", FieldKind::Phone),
    field("message", "Mensaje", FieldKind::TextArea),
];
const INSURANCE_FIELDS: &[FieldSpec] = &[
    field("fullName", "Nombre completo", FieldKind::Text),
    field("email", "Correo electrónico", FieldKind::Email),
    field("phone", "Teléfono", FieldKind::Phone),
    field("insuranceType", "Tipo de seguro", FieldKind::Select(INSURANCE_TYPES)),
    optional(VEHICLE_YEAR_FIELD, "Año del vehículo", FieldKind::Number),
    optional("vehiclePlate", "Placa", FieldKind::Text),
];
const CDAT_FIELDS: &[FieldSpec] = &[
    field("fullName", "Nombre completo", FieldKind::Text),
    field("documentId", "Número de documento", FieldKind::Number),
    field("email", "Correo electrónico", FieldKind::Email),
    field("amount", "Monto a invertir", FieldKind::Number),
    field("term", "Plazo", FieldKind::Select(CDAT_TERMS)),
];
const STORE_FIELDS: &[FieldSpec] = &[
    field("documentId", "Número de documento", FieldKind::Number),
    field("password", "Contraseña", FieldKind::Password),
];
const NEWSLETTER_FIELDS: &[FieldSpec] = &[field("email", "Correo electrónico", FieldKind::Email)];

impl FormKind {
    pub const ALL: [FormKind; 6] = [
        FormKind::Credit,
        FormKind::Savings,
        FormKind::Contact,
        FormKind::Insurance,
        FormKind::Cdat,
        FormKind::Store,
    ];

    /// Id of the `.form-modal` element housing this form.
    pub fn modal_id(self) -> &'static str {
        match self {
            FormKind::Credit => "credit-form",
            FormKind::Savings => "savings-form",
            FormKind::Contact => "contact-form",
            FormKind::Insurance => "insurance-form",
            FormKind::Cdat => "cdat-form",
            FormKind::Store => "store-form",
        }
    }

    pub fn from_modal_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.modal_id() == id)
    }

    pub fn title(self) -> &'static str {
        match self {
            FormKind::Credit => "Solicitud de crédito",
            FormKind::Savings => "Abre tu cuenta de ahorro",
            FormKind::Contact => "Contáctanos",
            FormKind::Insurance => "Cotiza tu seguro",
            FormKind::Cdat => "Abre tu CDAT",
            FormKind::Store => "Acceso a la tienda virtual",
        }
    }

    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            FormKind::Credit => CREDIT_FIELDS,
            FormKind::Savings => SAVINGS_FIELDS,
            FormKind::Contact => CONTACT_FIELDS,
            FormKind::Insurance => INSURANCE_FIELDS,
            FormKind::Cdat => CDAT_FIELDS,
            FormKind::Store => STORE_FIELDS,
        }
    }

    /// Submit button label while idle.
    pub fn submit_label(self) -> &'static str {
        match self {
            FormKind::Credit => "Enviar solicitud",
            FormKind::Savings => "Abrir cuenta",
            FormKind::Contact => "Enviar mensaje",
            FormKind::Insurance => "Solicitar cotización",
            FormKind::Cdat => "Abrir CDAT",
            FormKind::Store => "Acceder a la tienda",
        }
    }

    /// Submit button label while the simulated request is in flight.
    pub fn pending_label(self) -> &'static str {
        match self {
            FormKind::Credit | FormKind::Contact => "Enviando...",
            FormKind::Savings | FormKind::Insurance | FormKind::Cdat => "Procesando...",
            FormKind::Store => "Verificando...",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            FormKind::Credit => "¡Solicitud enviada exitosamente! Nos contactaremos contigo pronto.",
            FormKind::Savings => {
                "¡Cuenta de ahorro creada exitosamente! Recibirás un correo con los detalles."
            }
            FormKind::Contact => "¡Mensaje enviado exitosamente! Te responderemos pronto.",
            FormKind::Insurance => "¡Cotización solicitada! Recibirás la información en tu correo.",
            FormKind::Cdat => {
                "¡CDAT creado exitosamente! Te enviaremos la información de tu inversión."
            }
            FormKind::Store => "¡Acceso concedido! Serás redirigido a la tienda virtual.",
        }
    }

    /// Announcement made once the form closes, if any.
    pub fn closing_notice(self) -> Option<&'static str> {
        match self {
            FormKind::Store => Some("Redirigiendo a la tienda virtual..."),
            _ => None,
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.modal_id())
    }
}

/// Fields of the footer newsletter form, validated without a submission simulator.
pub fn newsletter_fields() -> &'static [FieldSpec] {
    NEWSLETTER_FIELDS
}

/// Current field values keyed by field name.
pub type FormData = BTreeMap<String, String>;

/// Border cue for a validated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMark {
    Valid,
    Invalid,
}

impl FieldMark {
    pub fn class(self) -> &'static str {
        match self {
            FieldMark::Valid => "field-valid",
            FieldMark::Invalid => "field-invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required fields left blank.
    MissingFields(Vec<&'static str>),
    /// Fields present but not in the expected shape.
    MalformedFields(Vec<&'static str>),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingFields(_) => {
                write!(f, "Por favor, completa todos los campos requeridos.")
            }
            ValidationError::MalformedFields(fields) => write!(
                f,
                "Por favor, revisa el formato de: {}.",
                fields.join(", ")
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Vehicle section rules for the insurance form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VehicleSection {
    pub visible: bool,
    pub year_required: bool,
}

impl VehicleSection {
    pub fn for_insurance_type(insurance_type: &str) -> Self {
        let vehicle = insurance_type == VEHICLE_INSURANCE;
        Self {
            visible: vehicle,
            year_required: vehicle,
        }
    }
}

/// Whether `spec` must be filled in, given the rest of the form.
pub fn is_required(spec: &FieldSpec, data: &FormData) -> bool {
    if spec.name == VEHICLE_YEAR_FIELD {
        let insurance_type = data.get("insuranceType").map(String::as_str).unwrap_or("");
        return VehicleSection::for_insurance_type(insurance_type).year_required;
    }
    spec.required
}

fn well_formed(kind: FieldKind, value: &str) -> bool {
    match kind {
        FieldKind::Email => EMAIL_REGEX.is_match(value),
        FieldKind::Phone => {
            let digits = value.chars().filter(char::is_ascii_digit).count();
            PHONE_CHARS_REGEX.is_match(value) && (7..=15).contains(&digits)
        }
        _ => true,
    }
}

/// Mark every field and report the first class of problem found.
///
/// Missing required fields take precedence over malformed ones. Blank optional fields are
/// neither checked nor marked.
pub fn validate(
    fields: &[FieldSpec],
    data: &FormData,
) -> (BTreeMap<&'static str, FieldMark>, Result<(), ValidationError>) {
    let mut marks = BTreeMap::new();
    let mut missing = Vec::new();
    let mut malformed = Vec::new();

    for spec in fields {
        let value = data.get(spec.name).map(|v| v.trim()).unwrap_or("");
        if value.is_empty() {
            if is_required(spec, data) {
                missing.push(spec.name);
                marks.insert(spec.name, FieldMark::Invalid);
            }
            continue;
        }
        if well_formed(spec.kind, value) {
            marks.insert(spec.name, FieldMark::Valid);
        } else {
            malformed.push(spec.name);
            marks.insert(spec.name, FieldMark::Invalid);
        }
    }

    let result = if !missing.is_empty() {
        Err(ValidationError::MissingFields(missing))
    } else if !malformed.is_empty() {
        Err(ValidationError::MalformedFields(malformed))
    } else {
        Ok(())
    };
    (marks, result)
}

/// Blank values for every field of a form.
pub fn empty_data(fields: &[FieldSpec]) -> FormData {
    fields
        .iter()
        .map(|f| (f.name.to_string(), String::new()))
        .collect()
}

#[cfg(test)]
pub(crate) fn filled_data(kind: FormKind) -> FormData {
    kind.fields()
        .iter()
        .map(|f| {
            let value = match f.kind {
                FieldKind::Email => "asociado@example.com",
                FieldKind::Phone => "(601) 307 8330",
                FieldKind::Number => "2020",
                FieldKind::Select(options) => options.last().map(|o| o.0).unwrap_or("x"),
                _ => "Ana Pérez",
            };
            (f.name.to_string(), value.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn modal_ids_round_trip() {
        for kind in FormKind::ALL {
            assert_eq!(FormKind::from_modal_id(kind.modal_id()), Some(kind));
        }
        assert_eq!(FormKind::from_modal_id("loan-form"), None);
    }

    #[test]
    fn filled_forms_validate() {
        for kind in FormKind::ALL {
            let (_, result) = validate(kind.fields(), &filled_data(kind));
            assert_eq!(result, Ok(()), "{kind}");
        }
    }

    #[test]
    fn blank_required_field_is_reported_and_marked() {
        let mut data = filled_data(FormKind::Credit);
        data.insert("phone".into(), "   ".into());
        let (marks, result) = validate(FormKind::Credit.fields(), &data);
        assert_eq!(result, Err(ValidationError::MissingFields(vec!["phone"])));
        assert_eq!(marks.get("phone"), Some(&FieldMark::Invalid));
        assert_eq!(marks.get("email"), Some(&FieldMark::Valid));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Por favor, completa todos los campos requeridos."
        );
    }

    #[test]
    fn blank_optional_field_is_skipped() {
        let mut data = filled_data(FormKind::Contact);
        data.insert("phone".into(), String::new());
        let (marks, result) = validate(FormKind::Contact.fields(), &data);
        assert_eq!(result, Ok(()));
        assert_eq!(marks.get("phone"), None);
    }

    #[test]
    fn malformed_email_and_phone_are_rejected() {
        let mut data = filled_data(FormKind::Savings);
        data.insert("email".into(), "asociado.example.com".into());
        data.insert("phone".into(), "12-34".into());
        let (_, result) = validate(FormKind::Savings.fields(), &data);
        assert_eq!(
            result,
            Err(ValidationError::MalformedFields(vec!["email", "phone"]))
        );
    }

    #[test]
    fn missing_wins_over_malformed() {
        let mut data = filled_data(FormKind::Contact);
        data.insert("email".into(), "nope".into());
        data.insert("message".into(), String::new());
        let (_, result) = validate(FormKind::Contact.fields(), &data);
        assert_eq!(result, Err(ValidationError::MissingFields(vec!["message"])));
    }

    #[test]
    fn vehicle_year_required_only_for_auto() {
        let mut data = filled_data(FormKind::Insurance);
        data.insert(VEHICLE_YEAR_FIELD.into(), String::new());

        data.insert("insuranceType".into(), "auto".into());
        let (_, result) = validate(FormKind::Insurance.fields(), &data);
        assert_eq!(
            result,
            Err(ValidationError::MissingFields(vec![VEHICLE_YEAR_FIELD]))
        );

        data.insert("insuranceType".into(), "hogar".into());
        let (_, result) = validate(FormKind::Insurance.fields(), &data);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn vehicle_section_follows_insurance_type() {
        assert_eq!(
            VehicleSection::for_insurance_type("auto"),
            VehicleSection {
                visible: true,
                year_required: true
            }
        );
        assert_eq!(
            VehicleSection::for_insurance_type("vida"),
            VehicleSection::default()
        );
    }

    #[test]
    fn empty_data_has_every_field() {
        let data = empty_data(FormKind::Store.fields());
        assert_eq!(data.len(), 2);
        assert!(data.values().all(String::is_empty));
    }
}
