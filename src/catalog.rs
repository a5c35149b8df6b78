use rust_decimal::Decimal;

use crate::model::{Language, ServiceKind};

pub const UNKNOWN_SERVICE_LABEL: &str = "Unknown Service";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Select,
    Date,
    Time,
    Email,
    Tel,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label_th: &'static str,
    pub label_en: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub options: &'static [&'static str],
    pub placeholder: Option<&'static str>,
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl FieldDescriptor {
    const fn new(name: &'static str, label_th: &'static str, label_en: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label_th,
            label_en,
            kind,
            required: false,
            options: &[],
            placeholder: None,
            min: None,
            max: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    const fn placeholder(mut self, placeholder: &'static str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    const fn range(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn label(&self, lang: Language) -> &'static str {
        match lang {
            Language::Th => self.label_th,
            Language::En => self.label_en,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Number(i64),
    Text(&'static str),
}

impl DefaultValue {
    pub fn to_toml(self) -> toml::Value {
        match self {
            DefaultValue::Number(n) => toml::Value::Integer(n),
            DefaultValue::Text(s) => toml::Value::String(s.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct ServiceDefinition {
    pub id: ServiceKind,
    pub display_name: &'static str,
    pub description: &'static str,
    base_price: u32,
    pub default_values: &'static [(&'static str, DefaultValue)],
    pub fields: &'static [FieldDescriptor],
}

impl ServiceDefinition {
    /// Whole-baht list price.
    pub fn base_price(&self) -> Decimal {
        Decimal::from(self.base_price)
    }

    /// Catalog defaults as a field table, ready to be overlaid by user input.
    pub fn default_table(&self) -> toml::Table {
        self.default_values
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_toml()))
            .collect()
    }
}

// ==========================================
// Field schemas
// ==========================================

const PRICE: FieldDescriptor =
    FieldDescriptor::new("price", "ราคา (บาท)", "Price (THB)", FieldKind::Number).range(Some(0), None);
const NOTES: FieldDescriptor = FieldDescriptor::new("notes", "Note เพิ่มเติม", "Notes", FieldKind::Text)
    .placeholder("Note เพิ่มเติม (ถ้ามี)");
const HOURS: FieldDescriptor = FieldDescriptor::new("hours", "จำนวนชั่วโมง", "Hours", FieldKind::Number)
    .required()
    .range(Some(1), Some(24));
const START_TIME: FieldDescriptor =
    FieldDescriptor::new("start_time", "เวลาเริ่ม", "Start time", FieldKind::Time).required();
const END_TIME: FieldDescriptor =
    FieldDescriptor::new("end_time", "ถึงเวลา", "End time", FieldKind::Time).required();

const fn setup_location(placeholder: &'static str) -> FieldDescriptor {
    FieldDescriptor::new("setup_location", "จุดตั้ง", "Setup location", FieldKind::Text)
        .required()
        .placeholder(placeholder)
}

const BUNDLE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("price", "ราคารวม (บาท)", "Package price (THB)", FieldKind::Number).range(Some(0), None),
    NOTES,
];

const PHOTOBOOTH_FIELDS: &[FieldDescriptor] = &[
    HOURS,
    FieldDescriptor::new("photo_size", "ขนาดรูป", "Photo size", FieldKind::Select)
        .required()
        .options(&["2x6", "4x6", "4x6 อวยพร", "2x6 อวยพร", "custom"]),
    FieldDescriptor::new("custom_photo_size", "ขนาดรูปกำหนดเอง", "Custom photo size", FieldKind::Text)
        .placeholder("ระบุขนาดรูป"),
    setup_location("ระบุจุดตั้งของ Photobooth"),
    START_TIME,
    END_TIME,
    PRICE,
    NOTES,
];

const VIDEO360_FIELDS: &[FieldDescriptor] = &[
    HOURS,
    FieldDescriptor::new("package_type", "Package Type", "Package type", FieldKind::Text)
        .required()
        .placeholder("ระบุ package type"),
    setup_location("ระบุจุดตั้งของ 360 Video"),
    START_TIME,
    END_TIME,
    PRICE,
    NOTES,
];

const BLESSING_FIELDS: &[FieldDescriptor] = &[
    HOURS,
    setup_location("ระบุจุดตั้งของ Blessing Video"),
    START_TIME,
    END_TIME,
    PRICE,
    NOTES,
];

const HOROSCOPE_FIELDS: &[FieldDescriptor] = &[
    HOURS,
    setup_location("ระบุจุดตั้งของ Horoscope Booth"),
    START_TIME,
    END_TIME,
    PRICE,
    NOTES,
];

const STICKERLINE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("sticker_count", "จำนวนสติ๊กเกอร์", "Sticker count", FieldKind::Number)
        .required()
        .range(Some(1), None)
        .placeholder("จำนวนสติ๊กเกอร์ที่ต้องการ"),
    PRICE,
    NOTES,
];

const fn addon_item(name: &'static str, label_th: &'static str, label_en: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(name, label_th, label_en, FieldKind::Text).placeholder("รายการ Add-on")
}

const fn addon_price(name: &'static str, label_th: &'static str, label_en: &'static str) -> FieldDescriptor {
    FieldDescriptor::new(name, label_th, label_en, FieldKind::Number).range(Some(0), None)
}

const ADDON_FIELDS: &[FieldDescriptor] = &[
    addon_item("addon1", "Add-on (1)", "Add-on (1)"),
    addon_price("addon_price1", "ราคา Add-on (1)", "Add-on (1) price"),
    addon_item("addon2", "Add-on (2)", "Add-on (2)"),
    addon_price("addon_price2", "ราคา Add-on (2)", "Add-on (2) price"),
    addon_item("addon3", "Add-on (3)", "Add-on (3)"),
    addon_price("addon_price3", "ราคา Add-on (3)", "Add-on (3) price"),
    addon_item("addon4", "Add-on (4)", "Add-on (4)"),
    addon_price("addon_price4", "ราคา Add-on (4)", "Add-on (4) price"),
    NOTES,
];

/// Booking-level fields entered once for the whole contract.
pub const COMMON_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("event_date", "วันที่จัดงาน", "Event date", FieldKind::Date).required(),
    FieldDescriptor::new("guest_count", "จำนวนแขก", "Guest count", FieldKind::Number)
        .required()
        .range(Some(1), None)
        .placeholder("จำนวนแขกโดยประมาณ"),
    FieldDescriptor::new("location", "สถานที่", "Location", FieldKind::Text)
        .required()
        .placeholder("สถานที่จัดงาน"),
    FieldDescriptor::new("deposit_amount", "เงินมัดจำ (บาท)", "Deposit (THB)", FieldKind::Number)
        .required()
        .range(Some(0), None),
    FieldDescriptor::new("travel_fee", "ค่าเดินทาง (บาท)", "Travel fee (THB)", FieldKind::Number).range(Some(0), None),
    FieldDescriptor::new("notes", "หมายเหตุ", "Notes", FieldKind::Text).placeholder("หมายเหตุเพิ่มเติม (ถ้ามี)"),
];

pub const CUSTOMER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("customer_name", "ชื่อลูกค้า", "Customer name", FieldKind::Text).required(),
    FieldDescriptor::new("customer_phone", "เบอร์โทรศัพท์", "Phone", FieldKind::Tel).required(),
    FieldDescriptor::new("customer_email", "อีเมล", "Email", FieldKind::Email),
    FieldDescriptor::new("groom_name", "เจ้าบ่าวคุณ", "Groom", FieldKind::Text),
    FieldDescriptor::new("bride_name", "เจ้าสาวคุณ", "Bride", FieldKind::Text),
];

/// Defaults the booking form starts from for shared fields.
pub const COMMON_DEFAULTS: &[(&str, DefaultValue)] = &[
    ("guest_count", DefaultValue::Number(200)),
    ("deposit_amount", DefaultValue::Number(3000)),
    ("travel_fee", DefaultValue::Number(0)),
];

// ==========================================
// Definitions
// ==========================================

static BUNDLE: ServiceDefinition = ServiceDefinition {
    id: ServiceKind::Bundle,
    display_name: "Bundle Service",
    description: "Complete service package",
    base_price: 0,
    default_values: &[],
    fields: BUNDLE_FIELDS,
};

static PHOTOBOOTH: ServiceDefinition = ServiceDefinition {
    id: ServiceKind::Photobooth,
    display_name: "Photobooth",
    description: "Professional photo booth service",
    base_price: 8900,
    default_values: &[
        ("hours", DefaultValue::Number(3)),
        ("photo_size", DefaultValue::Text("4x6 อวยพร")),
        ("setup_location", DefaultValue::Text("indoor")),
        ("start_time", DefaultValue::Text("18:00")),
        ("end_time", DefaultValue::Text("21:00")),
    ],
    fields: PHOTOBOOTH_FIELDS,
};

static VIDEO360: ServiceDefinition = ServiceDefinition {
    id: ServiceKind::Video360,
    display_name: "360 Video",
    description: "360 degree video recording service",
    base_price: 10900,
    default_values: &[
        ("hours", DefaultValue::Number(3)),
        ("package_type", DefaultValue::Text("standard")),
        ("setup_location", DefaultValue::Text("indoor")),
        ("start_time", DefaultValue::Text("18:00")),
        ("end_time", DefaultValue::Text("21:00")),
    ],
    fields: VIDEO360_FIELDS,
};

static BLESSING: ServiceDefinition = ServiceDefinition {
    id: ServiceKind::Blessing,
    display_name: "Blessing Video",
    description: "Blessing video recording service",
    base_price: 4900,
    default_values: &[
        ("hours", DefaultValue::Number(2)),
        ("setup_location", DefaultValue::Text("indoor")),
        ("start_time", DefaultValue::Text("18:00")),
        ("end_time", DefaultValue::Text("20:00")),
    ],
    fields: BLESSING_FIELDS,
};

static HOROSCOPE: ServiceDefinition = ServiceDefinition {
    id: ServiceKind::Horoscope,
    display_name: "Horoscope Booth",
    description: "Interactive horoscope booth service",
    base_price: 4900,
    default_values: &[
        ("hours", DefaultValue::Number(2)),
        ("setup_location", DefaultValue::Text("indoor")),
        ("start_time", DefaultValue::Text("18:00")),
        ("end_time", DefaultValue::Text("20:00")),
    ],
    fields: HOROSCOPE_FIELDS,
};

static STICKERLINE: ServiceDefinition = ServiceDefinition {
    id: ServiceKind::Stickerline,
    display_name: "Stickerline",
    description: "Custom sticker line service",
    base_price: 1200,
    default_values: &[("sticker_count", DefaultValue::Number(12))],
    fields: STICKERLINE_FIELDS,
};

static ADDON: ServiceDefinition = ServiceDefinition {
    id: ServiceKind::Addon,
    display_name: "Add-on",
    description: "Up to four extra items, priced individually",
    base_price: 0,
    default_values: &[],
    fields: ADDON_FIELDS,
};

/// Every service, in the order the selection menu lists them.
pub static CATALOG: [&ServiceDefinition; 7] =
    [&BUNDLE, &PHOTOBOOTH, &VIDEO360, &BLESSING, &HOROSCOPE, &STICKERLINE, &ADDON];

pub fn definition(kind: ServiceKind) -> &'static ServiceDefinition {
    match kind {
        ServiceKind::Bundle => &BUNDLE,
        ServiceKind::Photobooth => &PHOTOBOOTH,
        ServiceKind::Video360 => &VIDEO360,
        ServiceKind::Blessing => &BLESSING,
        ServiceKind::Horoscope => &HOROSCOPE,
        ServiceKind::Stickerline => &STICKERLINE,
        ServiceKind::Addon => &ADDON,
    }
}

/// Lookup by catalog id. Unknown ids are `None`; callers skip them.
pub fn get_definition(id: &str) -> Option<&'static ServiceDefinition> {
    ServiceKind::from_id(id.trim()).map(definition)
}
