//! Book model, listing query and the request sanitizer.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::db::SqlValue;

/// Lowest accepted publication year
pub const MIN_YEAR: i64 = 1800;

/// Book lifecycle state. `Baja` is the soft-deleted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    #[default]
    Disponible,
    Prestado,
    Baja,
}

impl BookStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Disponible => "disponible",
            BookStatus::Prestado => "prestado",
            BookStatus::Baja => "baja",
        }
    }
}

impl std::str::FromStr for BookStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "disponible" => Ok(BookStatus::Disponible),
            "prestado" => Ok(BookStatus::Prestado),
            "baja" => Ok(BookStatus::Baja),
            _ => Err(()),
        }
    }
}

/// Full book row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i64,
    pub isbn: Option<String>,
    pub titulo: String,
    pub autor: String,
    pub editorial: Option<String>,
    pub anio: Option<i64>,
    pub categoria: Option<String>,
    pub ubicacion: Option<String>,
    pub stock: i64,
    pub precio: f64,
    pub estado: BookStatus,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns a listing may be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    Titulo,
    Autor,
    Anio,
    Precio,
    Stock,
}

impl SortField {
    /// Unknown names fall back to `created_at`
    pub fn parse(name: Option<&str>) -> Self {
        match name {
            Some("titulo") => SortField::Titulo,
            Some("autor") => SortField::Autor,
            Some("anio") => SortField::Anio,
            Some("precio") => SortField::Precio,
            Some("stock") => SortField::Stock,
            _ => SortField::CreatedAt,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Titulo => "titulo",
            SortField::Autor => "autor",
            SortField::Anio => "anio",
            SortField::Precio => "precio",
            SortField::Stock => "stock",
        }
    }
}

/// Book listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring matched against titulo, autor and categoria
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// created_at | titulo | autor | anio | precio | stock
    pub sort_by: Option<String>,
    /// asc | desc (default desc)
    pub sort_dir: Option<String>,
    /// Include soft-deleted (baja) books
    pub include_baja: Option<String>,
}

impl BookQuery {
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
    }

    pub fn sort_field(&self) -> SortField {
        SortField::parse(self.sort_by.as_deref())
    }

    pub fn sort_ascending(&self) -> bool {
        matches!(self.sort_dir.as_deref(), Some(d) if d.eq_ignore_ascii_case("asc"))
    }

    pub fn include_baja(&self) -> bool {
        matches!(self.include_baja.as_deref(), Some("true") | Some("1"))
    }
}

/// Raw book payload as sent by clients. Values stay loosely typed until
/// [`BookInput::sanitize`] coerces and validates them.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct BookInput {
    #[schema(value_type = Option<String>)]
    pub isbn: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub titulo: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub autor: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub editorial: Option<Value>,
    #[schema(value_type = Option<i64>)]
    pub anio: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub categoria: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub ubicacion: Option<Value>,
    #[schema(value_type = Option<i64>)]
    pub stock: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub precio: Option<Value>,
    #[schema(value_type = Option<BookStatus>)]
    pub estado: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub notas: Option<Value>,
}

/// Whether every required field must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeMode {
    Full,
    Partial,
}

/// Cleaned, typed book fields. Absent fields are `None`.
#[derive(Debug, Default, Clone, PartialEq, Validate)]
pub struct BookFields {
    pub isbn: Option<String>,
    pub titulo: Option<String>,
    pub autor: Option<String>,
    pub editorial: Option<String>,
    pub anio: Option<i64>,
    pub categoria: Option<String>,
    pub ubicacion: Option<String>,
    #[validate(range(min = 0, message = "stock ≥ 0"))]
    pub stock: Option<i64>,
    #[validate(range(min = 0.0, message = "precio ≥ 0"))]
    pub precio: Option<f64>,
    pub estado: Option<BookStatus>,
    pub notas: Option<String>,
}

fn clean_text(value: &Option<Value>) -> Option<String> {
    let text = match value.as_ref()? {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn clean_number(value: &Option<Value>, field: &str, errors: &mut Vec<String>) -> Option<f64> {
    let parsed = match value.as_ref()? {
        Value::Null => return None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => Some(n),
        _ => {
            errors.push(format!("{} debe ser numérico", field));
            None
        }
    }
}

fn clean_integer(value: &Option<Value>, field: &str, errors: &mut Vec<String>) -> Option<i64> {
    let n = clean_number(value, field, errors)?;
    if n.fract() != 0.0 {
        errors.push(format!("{} debe ser un número entero", field));
        return None;
    }
    Some(n as i64)
}

impl BookInput {
    /// Normalize and validate. Returns the cleaned fields together with every
    /// validation message; the caller decides what to do with the messages.
    pub fn sanitize(&self, mode: SanitizeMode) -> (BookFields, Vec<String>) {
        let mut errors = Vec::new();

        let estado_text = clean_text(&self.estado);
        let estado = estado_text.as_deref().map(str::parse::<BookStatus>);

        let fields = BookFields {
            isbn: clean_text(&self.isbn),
            titulo: clean_text(&self.titulo),
            autor: clean_text(&self.autor),
            editorial: clean_text(&self.editorial),
            anio: clean_integer(&self.anio, "anio", &mut errors),
            categoria: clean_text(&self.categoria),
            ubicacion: clean_text(&self.ubicacion),
            stock: clean_integer(&self.stock, "stock", &mut errors),
            precio: clean_number(&self.precio, "precio", &mut errors),
            estado: estado.and_then(Result::ok),
            notas: clean_text(&self.notas),
        };

        if mode == SanitizeMode::Full {
            if fields.titulo.is_none() {
                errors.push("Campo requerido: titulo".to_string());
            }
            if fields.autor.is_none() {
                errors.push("Campo requerido: autor".to_string());
            }
        }

        if let Err(invalid) = fields.validate() {
            let by_field = invalid.field_errors();
            for name in ["stock", "precio"] {
                if let Some(list) = by_field.get(name) {
                    errors.extend(list.iter().map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} inválido", name))
                    }));
                }
            }
        }

        let max_year = Utc::now().year() as i64 + 1;
        if let Some(anio) = fields.anio {
            if !(MIN_YEAR..=max_year).contains(&anio) {
                errors.push(format!("anio entre {} y {}", MIN_YEAR, max_year));
            }
        }

        if matches!(estado, Some(Err(()))) {
            errors.push("estado inválido (disponible|prestado|baja)".to_string());
        }

        (fields, errors)
    }
}

impl BookFields {
    pub fn is_empty(&self) -> bool {
        *self == BookFields::default()
    }

    /// Present fields as `(column, value)` pairs, in table column order
    pub fn changes(&self) -> Vec<(&'static str, SqlValue)> {
        [
            ("isbn", self.isbn.clone().map(SqlValue::from)),
            ("titulo", self.titulo.clone().map(SqlValue::from)),
            ("autor", self.autor.clone().map(SqlValue::from)),
            ("editorial", self.editorial.clone().map(SqlValue::from)),
            ("anio", self.anio.map(SqlValue::from)),
            ("categoria", self.categoria.clone().map(SqlValue::from)),
            ("ubicacion", self.ubicacion.clone().map(SqlValue::from)),
            ("stock", self.stock.map(SqlValue::from)),
            ("precio", self.precio.map(SqlValue::from)),
            ("estado", self.estado.map(|e| SqlValue::from(e.as_str()))),
            ("notas", self.notas.clone().map(SqlValue::from)),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
        .collect()
    }

    /// Every mutable column, with defaults applied to the omitted ones.
    /// Used by create and full replacement.
    pub fn complete_row(&self) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("isbn", SqlValue::from(self.isbn.clone())),
            ("titulo", SqlValue::from(self.titulo.clone().unwrap_or_default())),
            ("autor", SqlValue::from(self.autor.clone().unwrap_or_default())),
            ("editorial", SqlValue::from(self.editorial.clone())),
            ("anio", SqlValue::from(self.anio)),
            ("categoria", SqlValue::from(self.categoria.clone())),
            ("ubicacion", SqlValue::from(self.ubicacion.clone())),
            ("stock", SqlValue::from(self.stock.unwrap_or(0))),
            ("precio", SqlValue::from(self.precio.unwrap_or(0.0))),
            ("estado", SqlValue::from(self.estado.unwrap_or_default().as_str())),
            ("notas", SqlValue::from(self.notas.clone())),
        ]
    }
}
