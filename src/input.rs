//! Booking files.
//!
//! A booking is written in TOML: `[customer]`, `[shared]` and one
//! `[[services]]` table per selected service, in selection order. Catalog
//! defaults are seeded under whatever the file supplies before the values
//! are typed.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::catalog;
use crate::error::{ContractError, Result};
use crate::lenient;
use crate::model::{CustomerData, Selection, ServiceFields, ServiceInstance, ServiceKind, SharedBookingData};

const SERVICE_KEY: &str = "service";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct BookingFile {
    #[serde(default)]
    pub customer: CustomerData,
    #[serde(default)]
    pub shared: SharedBookingData,
    #[serde(default)]
    pub services: Vec<toml::Table>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub customer: CustomerData,
    pub shared: SharedBookingData,
    pub selections: Vec<Selection>,
}

#[derive(Deserialize)]
struct CommonFields {
    #[serde(default, deserialize_with = "lenient::amount")]
    price: Option<rust_decimal::Decimal>,
    #[serde(default, deserialize_with = "lenient::text")]
    notes: Option<String>,
}

pub fn load_booking(path: &Path) -> Result<Booking> {
    let content = fs::read_to_string(path).map_err(|e| ContractError::io(path, e))?;
    let file: BookingFile = toml::from_str(&content).map_err(|source| ContractError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), services = file.services.len(), "booking loaded");
    booking_from_file(file)
}

pub fn booking_from_file(file: BookingFile) -> Result<Booking> {
    let selections = file
        .services
        .into_iter()
        .enumerate()
        .map(|(index, values)| instantiate(index, values))
        .collect::<Result<Vec<_>>>()?;

    Ok(Booking {
        customer: file.customer,
        shared: file.shared,
        selections,
    })
}

/// Booking from an in-memory table in the booking file layout.
pub fn booking_from_table(table: toml::Table) -> Result<Booking> {
    let file: BookingFile = toml::Value::Table(table).try_into()?;
    booking_from_file(file)
}

/// Builds one selection from a `[[services]]` table. Ids missing from the
/// catalog become [`Selection::Unknown`] instead of failing.
pub fn instantiate(index: usize, mut values: toml::Table) -> Result<Selection> {
    let id = match values.remove(SERVICE_KEY) {
        Some(toml::Value::String(id)) => id,
        Some(other) => other.to_string(),
        None => String::new(),
    };

    let Some(definition) = catalog::get_definition(&id) else {
        tracing::warn!(index, id = id.as_str(), "service id not in catalog");
        return Ok(Selection::Unknown { id });
    };

    let mut seeded = definition.default_table();
    seeded.extend(values);

    let invalid = |source| ContractError::InvalidService {
        index,
        id: id.clone(),
        source,
    };
    let common: CommonFields = toml::Value::Table(seeded.clone()).try_into().map_err(invalid)?;
    let fields = typed_fields(definition.id, seeded).map_err(invalid)?;

    let mut instance = ServiceInstance::new(fields);
    if let Some(price) = common.price {
        instance = instance.with_price(price);
    }
    if let Some(notes) = common.notes {
        instance = instance.with_notes(notes);
    }
    Ok(Selection::Service(instance))
}

fn typed_fields(kind: ServiceKind, table: toml::Table) -> std::result::Result<ServiceFields, toml::de::Error> {
    let value = toml::Value::Table(table);
    Ok(match kind {
        ServiceKind::Bundle => ServiceFields::Bundle,
        ServiceKind::Photobooth => ServiceFields::Photobooth(value.try_into()?),
        ServiceKind::Video360 => ServiceFields::Video360(value.try_into()?),
        ServiceKind::Blessing => ServiceFields::Blessing(value.try_into()?),
        ServiceKind::Horoscope => ServiceFields::Horoscope(value.try_into()?),
        ServiceKind::Stickerline => ServiceFields::Stickerline(value.try_into()?),
        ServiceKind::Addon => ServiceFields::Addon(value.try_into()?),
    })
}
