use std::fmt::Write;

use crate::fields::detail_lines;
use crate::model::{ContractDocument, Language};

struct Labels {
    heading: &'static str,
    customer: &'static str,
    phone: &'static str,
    groom: &'static str,
    bride: &'static str,
    booking: &'static str,
    details: &'static str,
    details_numbered: &'static str,
    notes: &'static str,
}

const TH: Labels = Labels {
    heading: "สรุปการจอง",
    customer: "ชื่อลูกค้า",
    phone: "เบอร์โทรศัพท์",
    groom: "เจ้าบ่าวคุณ",
    bride: "เจ้าสาวคุณ",
    booking: "การจอง",
    details: "รายละเอียดบริการ",
    details_numbered: "รายละเอียดบริการที่",
    notes: "หมายเหตุ",
};

const EN: Labels = Labels {
    heading: "Booking Summary",
    customer: "Customer",
    phone: "Phone",
    groom: "Groom",
    bride: "Bride",
    booking: "Services",
    details: "Service details",
    details_numbered: "Service details",
    notes: "Notes",
};

/// Plain-text booking summary for pasting into chat.
pub fn format_booking_summary(doc: &ContractDocument, lang: Language) -> String {
    let labels = match lang {
        Language::Th => &TH,
        Language::En => &EN,
    };

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", labels.heading);
    let _ = writeln!(
        out,
        "{}: {} {}: {}",
        labels.customer, doc.customer_name, labels.phone, doc.customer_phone
    );
    let _ = writeln!(out, "{}: {} {}: {}", labels.groom, doc.groom_name, labels.bride, doc.bride_name);

    let names: Vec<&str> = doc.line_items.iter().map(|item| item.title()).collect();
    let _ = writeln!(out, "{}: {}\n", labels.booking, names.join(", "));

    let count = doc.line_items.len();
    for (index, item) in doc.line_items.iter().enumerate() {
        if count > 1 {
            let _ = writeln!(out, "{} {}:", labels.details_numbered, index + 1);
        } else {
            let _ = writeln!(out, "{}:", labels.details);
        }

        for line in detail_lines(item, lang) {
            let _ = writeln!(out, "{}: {}", line.label, line.value);
        }

        if let Some(notes) = &item.notes {
            let _ = writeln!(out, "{}: {}", labels.notes, notes);
        }

        if index + 1 < count {
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomerData, Selection, ServiceFields, ServiceInstance, ServiceKind, SharedBookingData};
    use crate::pricing::generate_contract;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn customer() -> CustomerData {
        CustomerData {
            customer_name: Some("Nok".into()),
            customer_phone: Some("081-234-5678".into()),
            groom_name: Some("Ton".into()),
            bride_name: Some("Nok".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_service_summary_thai() {
        let shared = SharedBookingData {
            event_date: NaiveDate::from_ymd_opt(2025, 12, 14),
            guest_count: Some(200),
            location: Some("Riverside Hall".into()),
            ..Default::default()
        };
        let instance = ServiceInstance::new(ServiceFields::empty(ServiceKind::Stickerline)).with_notes("Gold foil");
        let doc = generate_contract(&[Selection::Service(instance)], &shared, &customer());
        let text = format_booking_summary(&doc, Language::Th);

        assert!(text.starts_with("สรุปการจอง\n"));
        assert!(text.contains("ชื่อลูกค้า: Nok เบอร์โทรศัพท์: 081-234-5678\n"));
        assert!(text.contains("การจอง: Stickerline\n\n"));
        assert!(text.contains("รายละเอียดบริการ:\n"));
        assert!(text.contains("วันที่: 14/12/2568\n"));
        assert!(text.contains("จำนวนแขก: 200\n"));
        assert!(text.ends_with("หมายเหตุ: Gold foil\n"));
    }

    #[test]
    fn test_multiple_services_are_numbered_bundle_first() {
        let selections = vec![
            Selection::Service(ServiceInstance::new(ServiceFields::empty(ServiceKind::Photobooth))),
            Selection::Service(
                ServiceInstance::new(ServiceFields::Bundle).with_price(Decimal::from(15000)),
            ),
        ];
        let doc = generate_contract(&selections, &SharedBookingData::default(), &customer());
        let text = format_booking_summary(&doc, Language::En);

        assert!(text.contains("Services: Bundle Service, Photobooth\n"));
        assert!(text.contains("Service details 1:\nPackage price: 15,000 THB\n"));
        assert!(text.contains("\n\nService details 2:\nHours: "));
    }

    #[test]
    fn test_absent_customer_fields_render_empty() {
        let doc = generate_contract(&[], &SharedBookingData::default(), &CustomerData::default());
        let text = format_booking_summary(&doc, Language::En);
        assert!(text.contains("Customer:  Phone: \n"));
        assert!(!text.contains("undefined"));
        assert!(!text.contains("None"));
    }

    #[test]
    fn test_unknown_service_listed_by_label() {
        let doc = generate_contract(
            &[Selection::Unknown { id: "fireworks".into() }],
            &SharedBookingData::default(),
            &CustomerData::default(),
        );
        let text = format_booking_summary(&doc, Language::En);
        assert!(text.contains("Services: Unknown Service\n"));
    }
}
