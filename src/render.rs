//! Printable contract.
//!
//! The contract is rendered with `tera` into a Typst source file and handed
//! to the `typst` CLI for the PDF. The template lives under the data root so
//! it can be customised; the built-in copy is written there on first use.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tera::{Context, Tera};

use crate::config::VendorConfig;
use crate::error::{ContractError, Result};
use crate::fields::{DetailLine, detail_lines};
use crate::format::{format_currency, format_document_date};
use crate::model::{ContractDocument, Language};

const TEMPLATE_NAME: &str = "contract.tera";

// Embed template at compile time to ensure availability
const DEFAULT_TEMPLATE: &str = include_str!("../templates/contract.tera");

const FILENAME_FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[derive(Serialize)]
pub struct ItemRow {
    pub no: usize,
    pub title: &'static str,
    pub details: Vec<DetailLine>,
    pub notes: Option<String>,
    pub unit_price: String,
    pub amount: String,
}

#[derive(Serialize)]
pub struct TravelRow {
    pub no: usize,
    pub amount: String,
}

#[derive(Serialize)]
pub struct ContractContext<'a> {
    pub vendor: &'a VendorConfig,
    pub issue_date: String,
    pub customer_name: &'a str,
    pub customer_phone: &'a str,
    pub customer_email: &'a str,
    pub groom_name: &'a str,
    pub bride_name: &'a str,
    pub items: Vec<ItemRow>,
    pub travel_fee: Option<TravelRow>,
    pub deposit: String,
    pub balance: String,
    pub total: String,
    pub notes: &'a str,
}

impl<'a> ContractContext<'a> {
    pub fn new(doc: &'a ContractDocument, vendor: &'a VendorConfig, issue_date: NaiveDate, lang: Language) -> Self {
        let shown = |amount: Decimal| {
            if amount > Decimal::ZERO {
                format_currency(amount)
            } else {
                String::new()
            }
        };

        let items: Vec<ItemRow> = doc
            .line_items
            .iter()
            .enumerate()
            .map(|(i, item)| ItemRow {
                no: i + 1,
                title: item.title(),
                details: detail_lines(item, lang),
                notes: item.notes.clone(),
                unit_price: shown(item.effective_price),
                amount: shown(item.effective_price),
            })
            .collect();

        let travel_fee = doc.travel_fee.map(|fee| TravelRow {
            no: items.len() + 1,
            amount: format_currency(fee),
        });

        Self {
            vendor,
            issue_date: format_document_date(issue_date),
            customer_name: &doc.customer_name,
            customer_phone: &doc.customer_phone,
            customer_email: &doc.customer_email,
            groom_name: &doc.groom_name,
            bride_name: &doc.bride_name,
            items,
            travel_fee,
            deposit: format_currency(doc.deposit_amount),
            balance: format_currency(doc.balance_due()),
            total: format_currency(doc.total_amount),
            notes: &doc.notes,
        }
    }
}

pub struct ContractRenderer {
    tera: Tera,
}

impl ContractRenderer {
    /// Renderer using the built-in template only.
    pub fn embedded() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, DEFAULT_TEMPLATE)?;
        tera.register_filter("typst", typst_filter);
        Ok(Self { tera })
    }

    /// Renderer loading `*.tera` from `template_dir`, seeding the default
    /// contract template there if it is missing.
    pub fn from_dir(template_dir: &Path) -> Result<Self> {
        fs::create_dir_all(template_dir).map_err(|e| ContractError::io(template_dir, e))?;
        let template_path = template_dir.join(TEMPLATE_NAME);
        if !template_path.exists() {
            println!("✨ Initializing default template...");
            fs::write(&template_path, DEFAULT_TEMPLATE).map_err(|e| ContractError::io(&template_path, e))?;
        }

        let glob = template_dir.join("*.tera");
        let mut tera = Tera::new(&glob.to_string_lossy())?;
        tera.register_filter("typst", typst_filter);
        tracing::debug!(dir = %template_dir.display(), "templates loaded");
        Ok(Self { tera })
    }

    pub fn render(&self, context: &ContractContext<'_>) -> Result<String> {
        let context = Context::from_serialize(context)?;
        Ok(self.tera.render(TEMPLATE_NAME, &context)?)
    }
}

fn typst_filter(value: &tera::Value, _args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
    let raw = match value {
        tera::Value::String(s) => s.clone(),
        tera::Value::Null => String::new(),
        other => other.to_string(),
    };
    Ok(tera::Value::String(escape_typst(&raw)))
}

/// Escapes text so Typst prints it literally. Newlines become line breaks,
/// and a line opening with `12.` stays text instead of a numbered list.
pub fn escape_typst(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    // Only indentation and digits seen so far on the current line.
    let mut at_line_start = true;
    let mut leading_digits = false;

    for c in text.chars() {
        match c {
            '\\' | '#' | '*' | '_' | '$' | '@' | '<' | '>' | '[' | ']' | '`' | '~' | '=' | '-' | '+' | '/' => {
                out.push('\\');
                out.push(c);
            }
            '.' if at_line_start && leading_digits => out.push_str("\\."),
            '\n' => out.push_str("\\\n"),
            '\r' => {}
            _ => out.push(c),
        }

        match c {
            '\n' => {
                at_line_start = true;
                leading_digits = false;
            }
            '0'..='9' if at_line_start => leading_digits = true,
            ' ' | '\t' if at_line_start && !leading_digits => {}
            _ => at_line_start = false,
        }
    }
    out
}

/// File stem for a contract: `Contract_<date>_<location>_<names>`, taken
/// from the first line item that has both a date and a location.
pub fn suggested_filename(doc: &ContractDocument) -> String {
    let mut parts = vec!["Contract".to_string()];

    let event = doc
        .line_items
        .iter()
        .filter_map(|item| item.event.as_ref())
        .find(|event| event.event_date.is_some() && event.location.is_some());
    if let Some(event) = event {
        if let Some(date) = event.event_date {
            parts.push(date.format("%Y-%m-%d").to_string());
        }
        if let Some(location) = &event.location {
            parts.push(location.clone());
        }
    }

    match (doc.groom_name.is_empty(), doc.bride_name.is_empty()) {
        (false, false) => parts.push(format!("{} {}", doc.groom_name, doc.bride_name)),
        (false, true) => parts.push(doc.groom_name.clone()),
        (true, false) => parts.push(doc.bride_name.clone()),
        (true, true) if !doc.customer_name.is_empty() => parts.push(doc.customer_name.clone()),
        (true, true) => {}
    }

    sanitize_filename(&parts.join(" "))
}

/// Drops characters not allowed in filenames and joins words with `_`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !FILENAME_FORBIDDEN.contains(c) && !c.is_control())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Writes the rendered source as `<out_dir>/<stem>.typ`.
pub fn write_contract(out_dir: &Path, stem: &str, rendered: &str) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).map_err(|e| ContractError::io(out_dir, e))?;
    let typ_path = out_dir.join(format!("{stem}.typ"));
    fs::write(&typ_path, rendered).map_err(|e| ContractError::io(&typ_path, e))?;
    Ok(typ_path)
}

#[derive(Debug, PartialEq, Eq)]
pub enum CompileOutcome {
    Compiled(PathBuf),
    TypstMissing,
    Failed,
}

pub fn compile_pdf(typ_path: &Path) -> CompileOutcome {
    if Command::new("typst").arg("--version").output().is_err() {
        tracing::warn!("typst is not installed, leaving the .typ source only");
        return CompileOutcome::TypstMissing;
    }

    let pdf_path = typ_path.with_extension("pdf");
    match Command::new("typst").arg("compile").arg(typ_path).arg(&pdf_path).status() {
        Ok(s) if s.success() => {
            tracing::info!(path = %pdf_path.display(), "contract compiled");
            CompileOutcome::Compiled(pdf_path)
        }
        Ok(s) => {
            tracing::warn!(status = %s, "typst compile failed");
            CompileOutcome::Failed
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not run typst");
            CompileOutcome::Failed
        }
    }
}

/// Reveal `path` in the file manager, then open it.
fn reveal_commands(path: &Path) -> [Command; 2] {
    let mut reveal;
    let mut open;
    if cfg!(target_os = "macos") {
        reveal = Command::new("open");
        reveal.arg("-R").arg(path);
        open = Command::new("open");
    } else if cfg!(target_os = "windows") {
        reveal = Command::new("explorer");
        reveal.arg(format!("/select,{}", path.display()));
        open = Command::new("explorer");
    } else {
        reveal = Command::new("xdg-open");
        reveal.arg(path.parent().unwrap_or(path));
        open = Command::new("xdg-open");
    }
    open.arg(path);
    [reveal, open]
}

// Helper: Open file and reveal in Finder/Explorer
pub fn open_and_reveal(path: &Path) {
    for mut command in reveal_commands(path) {
        if let Err(e) = command.spawn() {
            tracing::warn!(error = %e, path = %path.display(), "could not open file manager");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_vendor;
    use crate::model::{CustomerData, Selection, ServiceFields, ServiceInstance, ServiceKind, SharedBookingData};
    use crate::pricing::generate_contract;

    fn sample_doc() -> ContractDocument {
        let shared = SharedBookingData {
            event_date: NaiveDate::from_ymd_opt(2025, 12, 14),
            location: Some("Riverside Hall / Bangkok".into()),
            guest_count: Some(200),
            travel_fee: Some(Decimal::from(500)),
            notes: Some("Load-in #2 from 15:00".into()),
            ..Default::default()
        };
        let customer = CustomerData {
            customer_name: Some("Nok".into()),
            groom_name: Some("Ton".into()),
            bride_name: Some("Nok".into()),
            ..Default::default()
        };
        let selections = vec![
            Selection::Service(ServiceInstance::new(ServiceFields::Bundle)),
            Selection::Service(ServiceInstance::new(ServiceFields::empty(ServiceKind::Photobooth))),
        ];
        generate_contract(&selections, &shared, &customer)
    }

    #[test]
    fn test_filename_from_first_item_with_date_and_location() {
        assert_eq!(suggested_filename(&sample_doc()), "Contract_2025-12-14_Riverside_Hall_Bangkok_Ton_Nok");
    }

    #[test]
    fn test_filename_without_event_details() {
        let doc = generate_contract(&[], &SharedBookingData::default(), &CustomerData::default());
        assert_eq!(suggested_filename(&doc), "Contract");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("  a:b  c?\t d*e "), "ab_c_de");
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("#1 *bold* a_b"), "\\#1 \\*bold\\* a\\_b");
        assert_eq!(escape_typst("081-234"), "081\\-234");
        assert_eq!(escape_typst("line1\nline2"), "line1\\\nline2");
    }

    #[test]
    fn test_escape_typst_line_numbers() {
        assert_eq!(escape_typst("1. Parking"), "1\\. Parking");
        assert_eq!(escape_typst("Gate A\n  12. Food"), "Gate A\\\n  12\\. Food");
        assert_eq!(escape_typst("Room 1. upstairs"), "Room 1. upstairs");
        assert_eq!(escape_typst("2.5 hours"), "2\\.5 hours");
        assert_eq!(escape_typst("v1.2"), "v1.2");
    }

    #[test]
    fn test_numbered_notes_render_as_text() {
        let mut doc = sample_doc();
        doc.notes = "1. Parking at rear".into();
        let vendor = default_vendor().unwrap();
        let ctx = ContractContext::new(&doc, &vendor, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(), Language::Th);
        let rendered = ContractRenderer::embedded().unwrap().render(&ctx).unwrap();
        assert!(rendered.contains("\n1\\. Parking at rear"));
    }

    #[test]
    fn test_reveal_opens_folder_then_file() {
        let path = Path::new("/tmp/out/Contract_x.pdf");
        let [reveal, open] = reveal_commands(path);
        assert_eq!(open.get_args().collect::<Vec<_>>(), vec![path.as_os_str()]);
        assert_eq!(reveal.get_program(), open.get_program());
        if cfg!(target_os = "linux") {
            assert_eq!(reveal.get_args().collect::<Vec<_>>(), vec![Path::new("/tmp/out").as_os_str()]);
        }
    }

    #[test]
    fn test_context_rows() {
        let doc = sample_doc();
        let vendor = default_vendor().unwrap();
        let ctx = ContractContext::new(&doc, &vendor, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(), Language::Th);
        assert_eq!(ctx.items.len(), 2);
        assert_eq!(ctx.items[0].title, "Bundle Service");
        assert_eq!(ctx.items[1].unit_price, "");
        assert_eq!(ctx.travel_fee.as_ref().map(|t| t.no), Some(3));
        assert_eq!(ctx.issue_date, "01/11/2025");
        assert_eq!(ctx.total, "500.00");
        assert_eq!(ctx.balance, "-2,500.00");
    }

    #[test]
    fn test_render_embedded_template() {
        let doc = sample_doc();
        let vendor = default_vendor().unwrap();
        let ctx = ContractContext::new(&doc, &vendor, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(), Language::Th);
        let rendered = ContractRenderer::embedded().unwrap().render(&ctx).unwrap();

        assert!(rendered.contains("#set page(paper: \"a4\""));
        assert!(rendered.contains("สัญญาจ้างงาน Blossom Pixel"));
        assert!(rendered.contains("*Bundle Service*"));
        assert!(rendered.contains("*Photobooth*"));
        assert!(rendered.contains("ค่าเดินทาง"));
        assert!(rendered.contains("Load\\-in \\#2 from 15:00"));
        assert!(rendered.contains("Passkamon P."));
    }

    #[test]
    fn test_from_dir_seeds_template() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ContractRenderer::from_dir(dir.path()).unwrap();
        assert!(dir.path().join(TEMPLATE_NAME).exists());

        let doc = sample_doc();
        let vendor = default_vendor().unwrap();
        let ctx = ContractContext::new(&doc, &vendor, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(), Language::En);
        assert!(renderer.render(&ctx).unwrap().contains("Photo size : "));
    }

    #[test]
    fn test_write_contract() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_contract(&dir.path().join("2025"), "Contract_x", "#set page()").unwrap();
        assert_eq!(path.file_name().unwrap(), "Contract_x.typ");
        assert_eq!(fs::read_to_string(path).unwrap(), "#set page()");
    }
}
