use chrono::Local;
use inquire::validator::Validation;
use inquire::{CustomUserError, DateSelect, Select, Text};
use rust_decimal::Decimal;

use crate::catalog::{
    self, COMMON_DEFAULTS, COMMON_FIELDS, CUSTOMER_FIELDS, DefaultValue, FieldDescriptor, FieldKind, ServiceDefinition,
};
use crate::error::Result;
use crate::format::{calculate_end_time, format_amount, parse_number};
use crate::model::Language;

const DONE_OPT: &str = "✅ Done";

/// Walks through service selection, per-service fields, shared fields and
/// customer details, returning the booking as a raw table in the booking
/// file layout.
pub fn new_booking_wizard(lang: Language) -> Result<toml::Table> {
    let selected = select_services()?;

    let mut services = Vec::with_capacity(selected.len());
    for (i, def) in selected.iter().enumerate() {
        println!("\n--- {} ({}/{}) ---", def.display_name, i + 1, selected.len());
        services.push(toml::Value::Table(enter_service_fields(def, lang)?));
    }

    println!("\n--- Event Details ---");
    let mut shared = toml::Table::new();
    for field in COMMON_FIELDS {
        let default = COMMON_DEFAULTS
            .iter()
            .find(|(name, _)| *name == field.name)
            .map(|(_, value)| *value);
        if let Some(value) = prompt_field(field, default, None, lang)? {
            shared.insert(field.name.to_string(), value);
        }
    }

    println!("\n--- Customer ---");
    let mut customer = toml::Table::new();
    for field in CUSTOMER_FIELDS {
        if let Some(value) = prompt_field(field, None, None, lang)? {
            customer.insert(field.name.to_string(), value);
        }
    }

    let mut booking = toml::Table::new();
    booking.insert("customer".into(), toml::Value::Table(customer));
    booking.insert("shared".into(), toml::Value::Table(shared));
    booking.insert("services".into(), toml::Value::Array(services));
    Ok(booking)
}

fn select_services() -> Result<Vec<&'static ServiceDefinition>> {
    let mut selected: Vec<&'static ServiceDefinition> = Vec::new();
    loop {
        if !selected.is_empty() {
            let names: Vec<&str> = selected.iter().map(|d| d.display_name).collect();
            println!("🧾 Selected: {}", names.join(", "));
        }

        let mut options: Vec<String> = catalog::CATALOG
            .iter()
            .map(|def| format!("{} | {}", def.display_name, def.description))
            .collect();
        if !selected.is_empty() {
            options.insert(0, DONE_OPT.to_string());
        }

        let choice = Select::new("Add a service (the same service can be added twice):", options).prompt()?;
        if choice == DONE_OPT {
            return Ok(selected);
        }
        let name = choice.split(" | ").next().unwrap_or_default();
        if let Some(def) = catalog::CATALOG.iter().copied().find(|def| def.display_name == name) {
            selected.push(def);
        }
    }
}

fn enter_service_fields(def: &ServiceDefinition, lang: Language) -> Result<toml::Table> {
    let mut values = toml::Table::new();
    values.insert("service".into(), toml::Value::String(def.id.id().to_string()));

    for field in def.fields {
        if field.name == "custom_photo_size" && text_of(&values, "photo_size").as_deref() != Some("custom") {
            continue;
        }

        let default = def
            .default_values
            .iter()
            .find(|(name, _)| *name == field.name)
            .map(|(_, value)| *value);

        let suggestion = match field.name {
            "end_time" => suggested_end_time(&values),
            "price" => Some(format_amount(def.base_price())),
            _ => None,
        };

        if let Some(value) = prompt_field(field, default, suggestion, lang)? {
            values.insert(field.name.to_string(), value);
        }
    }
    Ok(values)
}

fn text_of(values: &toml::Table, key: &str) -> Option<String> {
    values.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

fn suggested_end_time(values: &toml::Table) -> Option<String> {
    let start = text_of(values, "start_time")?;
    let hours = text_of(values, "hours").map(|h| parse_number(&h))?;
    let hours = rust_decimal::prelude::ToPrimitive::to_f64(&hours)?;
    let end = calculate_end_time(&start, hours);
    (!end.is_empty()).then_some(end)
}

/// Prompts for one field. Blank answers are left out of the table so the
/// catalog defaults apply on load.
fn prompt_field(
    field: &FieldDescriptor,
    default: Option<DefaultValue>,
    suggestion: Option<String>,
    lang: Language,
) -> Result<Option<toml::Value>> {
    let label = if field.required {
        format!("{} *", field.label(lang))
    } else {
        field.label(lang).to_string()
    };

    let answer = match field.kind {
        FieldKind::Select => {
            let options = field.options.to_vec();
            let start = match default {
                Some(DefaultValue::Text(d)) => options.iter().position(|o| *o == d).unwrap_or(0),
                _ => 0,
            };
            Select::new(&label, options).with_starting_cursor(start).prompt()?.to_string()
        }
        FieldKind::Date => DateSelect::new(&label)
            .with_default(Local::now().date_naive())
            .prompt()?
            .format("%Y-%m-%d")
            .to_string(),
        _ => {
            let default_text = suggestion.or_else(|| {
                default.map(|d| match d {
                    DefaultValue::Number(n) => n.to_string(),
                    DefaultValue::Text(s) => s.to_string(),
                })
            });
            let mut prompt = Text::new(&label);
            if let Some(text) = default_text.as_deref() {
                prompt = prompt.with_default(text);
            }
            if let Some(placeholder) = field.placeholder {
                prompt = prompt.with_placeholder(placeholder);
            }
            if field.kind == FieldKind::Number {
                let (min, max) = (field.min, field.max);
                prompt = prompt.with_validator(move |input: &str| -> std::result::Result<Validation, CustomUserError> {
                    Ok(check_range(input, min, max))
                });
            }
            prompt.prompt()?
        }
    };

    let trimmed = answer.trim();
    Ok((!trimmed.is_empty()).then(|| toml::Value::String(trimmed.to_string())))
}

fn check_range(input: &str, min: Option<u32>, max: Option<u32>) -> Validation {
    if input.trim().is_empty() {
        return Validation::Valid;
    }
    let n = parse_number(input);
    if let Some(min) = min.filter(|m| n < Decimal::from(*m)) {
        return Validation::Invalid(format!("must be at least {min}").into());
    }
    if let Some(max) = max.filter(|m| n > Decimal::from(*m)) {
        return Validation::Invalid(format!("must be at most {max}").into());
    }
    Validation::Valid
}
