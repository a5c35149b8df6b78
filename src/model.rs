use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::calculate_end_time;
use crate::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    #[serde(rename = "bundle")]
    Bundle,
    #[serde(rename = "photobooth")]
    Photobooth,
    #[serde(rename = "360video")]
    Video360,
    #[serde(rename = "blessing")]
    Blessing,
    #[serde(rename = "horoscope")]
    Horoscope,
    #[serde(rename = "stickerline")]
    Stickerline,
    #[serde(rename = "addon")]
    Addon,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 7] = [
        ServiceKind::Bundle,
        ServiceKind::Photobooth,
        ServiceKind::Video360,
        ServiceKind::Blessing,
        ServiceKind::Horoscope,
        ServiceKind::Stickerline,
        ServiceKind::Addon,
    ];

    /// Catalog id, as written in booking files.
    pub fn id(self) -> &'static str {
        match self {
            ServiceKind::Bundle => "bundle",
            ServiceKind::Photobooth => "photobooth",
            ServiceKind::Video360 => "360video",
            ServiceKind::Blessing => "blessing",
            ServiceKind::Horoscope => "horoscope",
            ServiceKind::Stickerline => "stickerline",
            ServiceKind::Addon => "addon",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id.trim())
    }

    /// Bundle and add-on lines never carry the booking's date, guest count
    /// or location.
    pub fn accepts_shared_fields(self) -> bool {
        !matches!(self, ServiceKind::Bundle | ServiceKind::Addon)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Th,
    En,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Th => write!(f, "th (ไทย)"),
            Language::En => write!(f, "en (English)"),
        }
    }
}

// ==========================================
// Per-service fields
// ==========================================

/// Time slot shared by the hourly services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default, deserialize_with = "lenient::hours")]
    pub hours: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub setup_location: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub end_time: Option<String>,
}

impl Schedule {
    /// Derived from start time and hours when both are usable, otherwise
    /// whatever end time was entered.
    pub fn resolved_end_time(&self) -> Option<String> {
        let derived = match (&self.start_time, self.hours) {
            (Some(start), Some(hours)) => calculate_end_time(start, hours),
            _ => String::new(),
        };
        if derived.is_empty() {
            self.end_time.clone()
        } else {
            Some(derived)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoboothFields {
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(default, deserialize_with = "lenient::text")]
    pub photo_size: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub custom_photo_size: Option<String>,
}

impl PhotoboothFields {
    /// The custom size replaces the preset only when "custom" is selected.
    pub fn photo_size_display(&self) -> Option<&str> {
        match (self.photo_size.as_deref(), self.custom_photo_size.as_deref()) {
            (Some("custom"), Some(custom)) => Some(custom),
            (size, _) => size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFields {
    #[serde(flatten)]
    pub schedule: Schedule,
    #[serde(default, deserialize_with = "lenient::text")]
    pub package_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StickerlineFields {
    #[serde(default, deserialize_with = "lenient::count")]
    pub sticker_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddonFields {
    #[serde(default, deserialize_with = "lenient::text")]
    pub addon1: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub addon_price1: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub addon2: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub addon_price2: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub addon3: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub addon_price3: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub addon4: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub addon_price4: Option<Decimal>,
}

impl AddonFields {
    pub fn items(&self) -> [(Option<&str>, Option<Decimal>); 4] {
        [
            (self.addon1.as_deref(), self.addon_price1),
            (self.addon2.as_deref(), self.addon_price2),
            (self.addon3.as_deref(), self.addon_price3),
            (self.addon4.as_deref(), self.addon_price4),
        ]
    }

    /// Sum of the sub-prices; absent or non-positive prices count as zero.
    pub fn subtotal(&self) -> Decimal {
        self.items()
            .iter()
            .filter_map(|(_, price)| *price)
            .filter(|price| *price > Decimal::ZERO)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "service")]
pub enum ServiceFields {
    #[serde(rename = "bundle")]
    Bundle,
    #[serde(rename = "photobooth")]
    Photobooth(PhotoboothFields),
    #[serde(rename = "360video")]
    Video360(VideoFields),
    #[serde(rename = "blessing")]
    Blessing(Schedule),
    #[serde(rename = "horoscope")]
    Horoscope(Schedule),
    #[serde(rename = "stickerline")]
    Stickerline(StickerlineFields),
    #[serde(rename = "addon")]
    Addon(AddonFields),
}

impl ServiceFields {
    pub fn kind(&self) -> ServiceKind {
        match self {
            ServiceFields::Bundle => ServiceKind::Bundle,
            ServiceFields::Photobooth(_) => ServiceKind::Photobooth,
            ServiceFields::Video360(_) => ServiceKind::Video360,
            ServiceFields::Blessing(_) => ServiceKind::Blessing,
            ServiceFields::Horoscope(_) => ServiceKind::Horoscope,
            ServiceFields::Stickerline(_) => ServiceKind::Stickerline,
            ServiceFields::Addon(_) => ServiceKind::Addon,
        }
    }

    /// Empty field set for a kind, with nothing entered.
    pub fn empty(kind: ServiceKind) -> Self {
        match kind {
            ServiceKind::Bundle => ServiceFields::Bundle,
            ServiceKind::Photobooth => ServiceFields::Photobooth(PhotoboothFields::default()),
            ServiceKind::Video360 => ServiceFields::Video360(VideoFields::default()),
            ServiceKind::Blessing => ServiceFields::Blessing(Schedule::default()),
            ServiceKind::Horoscope => ServiceFields::Horoscope(Schedule::default()),
            ServiceKind::Stickerline => ServiceFields::Stickerline(StickerlineFields::default()),
            ServiceKind::Addon => ServiceFields::Addon(AddonFields::default()),
        }
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            ServiceFields::Photobooth(f) => Some(&f.schedule),
            ServiceFields::Video360(f) => Some(&f.schedule),
            ServiceFields::Blessing(s) | ServiceFields::Horoscope(s) => Some(s),
            _ => None,
        }
    }
}

/// One selected occurrence of a catalog service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceInstance {
    pub fields: ServiceFields,
    pub price: Option<Decimal>,
    pub notes: Option<String>,
}

impl ServiceInstance {
    pub fn new(fields: ServiceFields) -> Self {
        Self {
            fields,
            price: None,
            notes: None,
        }
    }

    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn kind(&self) -> ServiceKind {
        self.fields.kind()
    }
}

/// An entry of the user's selection list, in selection order.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Service(ServiceInstance),
    Unknown { id: String },
}

// ==========================================
// Booking-level data
// ==========================================

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SharedBookingData {
    #[serde(default, deserialize_with = "lenient::date")]
    pub event_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub guest_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub deposit_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub travel_fee: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct CustomerData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub customer_email: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub groom_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub bride_name: Option<String>,
}

// ==========================================
// Aggregated output
// ==========================================

/// Shared event fields copied onto a line item.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventDetails {
    pub event_date: Option<NaiveDate>,
    pub guest_count: Option<u32>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LineService {
    Known(ServiceFields),
    Unknown { unknown_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    /// Position in the selection list.
    pub selection_index: usize,
    pub service: LineService,
    pub event: Option<EventDetails>,
    pub effective_price: Decimal,
    pub notes: Option<String>,
}

impl LineItem {
    pub fn kind(&self) -> Option<ServiceKind> {
        match &self.service {
            LineService::Known(fields) => Some(fields.kind()),
            LineService::Unknown { .. } => None,
        }
    }

    pub fn is_bundle(&self) -> bool {
        self.kind() == Some(ServiceKind::Bundle)
    }

    pub fn title(&self) -> &'static str {
        match self.kind() {
            Some(kind) => crate::catalog::definition(kind).display_name,
            None => crate::catalog::UNKNOWN_SERVICE_LABEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractDocument {
    pub line_items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: String,
    pub groom_name: String,
    pub bride_name: String,
    pub notes: String,
    pub deposit_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_fee: Option<Decimal>,
}

impl ContractDocument {
    /// Amount due after the event.
    pub fn balance_due(&self) -> Decimal {
        self.total_amount.saturating_sub(self.deposit_amount)
    }
}
