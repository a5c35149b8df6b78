//! Which details each kind of service shows.
//!
//! Both the booking summary and the printed contract build their per-line
//! rows from [`relevant_fields`], so the two never disagree about what a
//! photobooth or an add-on line displays.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::{format_amount, format_date};
use crate::model::{Language, LineItem, LineService, ServiceFields, ServiceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    Hours,
    Location,
    SetupLocation,
    EventDate,
    TimeRange,
    PhotoSize,
    PackageType,
    StickerCount,
    GuestCount,
    PackagePrice,
    AddonItems,
}

pub fn relevant_fields(kind: ServiceKind) -> &'static [DetailField] {
    use DetailField::*;
    match kind {
        ServiceKind::Photobooth => &[Hours, Location, SetupLocation, EventDate, TimeRange, PhotoSize, GuestCount],
        ServiceKind::Video360 => &[Hours, Location, SetupLocation, EventDate, TimeRange, PackageType, GuestCount],
        ServiceKind::Blessing | ServiceKind::Horoscope => {
            &[Hours, Location, SetupLocation, EventDate, TimeRange, GuestCount]
        }
        ServiceKind::Stickerline => &[StickerCount, EventDate, GuestCount],
        ServiceKind::Bundle => &[PackagePrice],
        ServiceKind::Addon => &[AddonItems],
    }
}

impl DetailField {
    /// Whether the value comes from the shared booking data.
    #[cfg(test)]
    pub fn is_shared(self) -> bool {
        matches!(self, DetailField::Location | DetailField::EventDate | DetailField::GuestCount)
    }

    fn label(self, lang: Language) -> &'static str {
        match (self, lang) {
            (DetailField::Hours, Language::Th) => "จำนวนชั่วโมง",
            (DetailField::Hours, Language::En) => "Hours",
            (DetailField::Location, Language::Th) => "สถานที่",
            (DetailField::Location, Language::En) => "Location",
            (DetailField::SetupLocation, Language::Th) => "จุดตั้ง",
            (DetailField::SetupLocation, Language::En) => "Setup location",
            (DetailField::EventDate, Language::Th) => "วันที่",
            (DetailField::EventDate, Language::En) => "Date",
            (DetailField::TimeRange, Language::Th) => "เวลา",
            (DetailField::TimeRange, Language::En) => "Time",
            (DetailField::PhotoSize, Language::Th) => "ขนาดรูป",
            (DetailField::PhotoSize, Language::En) => "Photo size",
            (DetailField::PackageType, _) => "Package type",
            (DetailField::StickerCount, Language::Th) => "จำนวนสติ๊กเกอร์",
            (DetailField::StickerCount, Language::En) => "Stickers",
            (DetailField::GuestCount, Language::Th) => "จำนวนแขก",
            (DetailField::GuestCount, Language::En) => "Guests",
            (DetailField::PackagePrice, Language::Th) => "ราคารวม",
            (DetailField::PackagePrice, Language::En) => "Package price",
            (DetailField::AddonItems, Language::Th) => "รวม Add-on",
            (DetailField::AddonItems, Language::En) => "Add-on total",
        }
    }
}

pub fn currency_unit(lang: Language) -> &'static str {
    match lang {
        Language::Th => "บาท",
        Language::En => "THB",
    }
}

/// One `label: value` row under a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailLine {
    pub label: String,
    pub value: String,
}

impl DetailLine {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Rows for a line item, in table order. Missing values render empty.
/// Unknown services have no rows.
pub fn detail_lines(item: &LineItem, lang: Language) -> Vec<DetailLine> {
    let LineService::Known(fields) = &item.service else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    for field in relevant_fields(fields.kind()) {
        match field {
            DetailField::AddonItems => push_addon_lines(&mut lines, fields, item.effective_price, lang),
            DetailField::PackagePrice => {
                let price = if item.effective_price > Decimal::ZERO {
                    format!("{} {}", format_amount(item.effective_price), currency_unit(lang))
                } else {
                    String::new()
                };
                lines.push(DetailLine::new(field.label(lang), price));
            }
            other => lines.push(DetailLine::new(other.label(lang), field_value(*other, item, fields, lang))),
        }
    }
    lines
}

fn field_value(field: DetailField, item: &LineItem, fields: &ServiceFields, lang: Language) -> String {
    let event = item.event.as_ref();
    let schedule = fields.schedule();
    match field {
        DetailField::Hours => schedule
            .and_then(|s| s.hours)
            .map(|h| h.to_string())
            .unwrap_or_default(),
        DetailField::Location => event.and_then(|e| e.location.clone()).unwrap_or_default(),
        DetailField::SetupLocation => schedule
            .and_then(|s| s.setup_location.clone())
            .unwrap_or_default(),
        DetailField::EventDate => event
            .and_then(|e| e.event_date)
            .map(|d| format_date(d, lang))
            .unwrap_or_default(),
        DetailField::TimeRange => {
            let start = schedule.and_then(|s| s.start_time.clone()).unwrap_or_default();
            let end = schedule.and_then(|s| s.resolved_end_time()).unwrap_or_default();
            format!("{start} - {end}")
        }
        DetailField::PhotoSize => match fields {
            ServiceFields::Photobooth(p) => p.photo_size_display().unwrap_or_default().to_string(),
            _ => String::new(),
        },
        DetailField::PackageType => match fields {
            ServiceFields::Video360(v) => v.package_type.clone().unwrap_or_default(),
            _ => String::new(),
        },
        DetailField::StickerCount => match fields {
            ServiceFields::Stickerline(s) => s.sticker_count.map(|n| n.to_string()).unwrap_or_default(),
            _ => String::new(),
        },
        DetailField::GuestCount => event
            .and_then(|e| e.guest_count)
            .map(|n| n.to_string())
            .unwrap_or_default(),
        DetailField::PackagePrice | DetailField::AddonItems => String::new(),
    }
}

fn push_addon_lines(lines: &mut Vec<DetailLine>, fields: &ServiceFields, effective: Decimal, lang: Language) {
    let ServiceFields::Addon(addon) = fields else {
        return;
    };
    let unit = currency_unit(lang);
    let priced = effective > Decimal::ZERO;

    for (n, (label, price)) in addon.items().into_iter().enumerate() {
        let Some(label) = label else { continue };
        let value = match price {
            Some(p) if priced && p > Decimal::ZERO => format!("{label} - {} {unit}", format_amount(p)),
            _ => label.to_string(),
        };
        lines.push(DetailLine::new(format!("Add-on ({})", n + 1), value));
    }

    if priced {
        lines.push(DetailLine::new(
            DetailField::AddonItems.label(lang),
            format!("{} {unit}", format_amount(effective)),
        ));
    }
}
