mod catalog;
mod config;
mod error;
mod fields;
mod format;
mod input;
mod lenient;
mod model;
mod pricing;
mod render;
mod summary;
mod wizard;

use anyhow::Context;
use chrono::{Datelike, Local};
use clap::{CommandFactory, Parser, Subcommand};
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};
use inquire::{Confirm, Text};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::AppSettings;
use crate::fields::{currency_unit, detail_lines};
use crate::format::{calculate_end_time, format_amount, format_currency};
use crate::input::Booking;
use crate::model::{ContractDocument, Language};
use crate::render::{CompileOutcome, ContractContext, ContractRenderer};

// ==========================================
// CLI
// ==========================================

#[derive(Parser)]
#[command(name = "contract-maker", version, about = "Event service quotations and contracts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new booking interactively
    New {
        /// Where to write the booking file (defaults to <data root>/bookings)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the priced itemization of a booking
    Quote {
        booking: PathBuf,
        /// Print the contract document as JSON
        #[arg(long)]
        json: bool,
        #[arg(long, value_enum)]
        lang: Option<Language>,
    },
    /// Print the booking summary text
    Summary {
        booking: PathBuf,
        #[arg(long, value_enum)]
        lang: Option<Language>,
    },
    /// Render the printable contract
    Contract {
        booking: PathBuf,
        /// Output directory (defaults to <data root>/output/<year>)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Only write the .typ source
        #[arg(long)]
        no_compile: bool,
        /// Open the PDF after compiling
        #[arg(long)]
        open: bool,
        /// Ignore the template under the data root
        #[arg(long)]
        builtin_template: bool,
        #[arg(long, value_enum)]
        lang: Option<Language>,
    },
    /// List the available services
    Catalog {
        #[arg(long, value_enum)]
        lang: Option<Language>,
    },
    /// Compute when a slot ends
    #[command(allow_negative_numbers = true)]
    EndTime {
        /// Start time as HH:MM
        start: String,
        hours: f64,
    },
    /// Configure data directory and language
    Config,
}

// ==========================================
// Main Function
// ==========================================

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::New { output } => {
            let settings = settings();
            let table = wizard::new_booking_wizard(settings.language)?;
            let booking = input::booking_from_table(table.clone())?;
            let doc = generate(&booking);

            let path = match output {
                Some(path) => path,
                None => ask_booking_path(&settings, &doc)?,
            };
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
            }
            let content = toml::to_string_pretty(&table)?;
            fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
            println!("✅ Booking saved: {}", path.display());

            print_quote(&doc, settings.language);
        }
        Commands::Quote { booking, json, lang } => {
            let doc = generate(&load(&booking)?);
            if json {
                println!("{}", quote_json(&doc)?);
            } else {
                print_quote(&doc, lang.unwrap_or_else(|| settings().language));
            }
        }
        Commands::Summary { booking, lang } => {
            let doc = generate(&load(&booking)?);
            let lang = lang.unwrap_or_else(|| settings().language);
            print!("{}", summary::format_booking_summary(&doc, lang));
        }
        Commands::Contract {
            booking,
            out,
            no_compile,
            open,
            builtin_template,
            lang,
        } => {
            let settings = settings();
            let doc = generate(&load(&booking)?);
            let lang = lang.unwrap_or(settings.language);
            write_contract(&settings, &doc, out, !no_compile, open, builtin_template, lang)?;
        }
        Commands::Catalog { lang } => {
            print_catalog(lang.unwrap_or_else(|| settings().language));
        }
        Commands::EndTime { start, hours } => {
            let end = calculate_end_time(&start, hours);
            if end.is_empty() {
                anyhow::bail!("invalid start time or duration: {start} + {hours}h");
            }
            println!("{end}");
        }
        Commands::Config => {
            config::setup_config_wizard()?;
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Saved settings. A broken settings file is reported and the defaults used.
fn settings() -> AppSettings {
    config::load_settings().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not load settings, using defaults");
        AppSettings::default()
    })
}

fn load(path: &Path) -> anyhow::Result<Booking> {
    input::load_booking(path).with_context(|| format!("could not load booking {}", path.display()))
}

fn generate(booking: &Booking) -> ContractDocument {
    pricing::generate_contract(&booking.selections, &booking.shared, &booking.customer)
}

// ==========================================
// 1. Booking Creation
// ==========================================

fn ask_booking_path(settings: &AppSettings, doc: &ContractDocument) -> anyhow::Result<PathBuf> {
    let default = settings
        .root()
        .join("bookings")
        .join(format!("{}.toml", render::suggested_filename(doc)));
    let default = default.to_string_lossy();

    let path = PathBuf::from(Text::new("Save booking as:").with_default(&default).prompt()?);
    if path.exists() && !Confirm::new("File exists. Overwrite?").with_default(false).prompt()? {
        anyhow::bail!("cancelled, {} left untouched", path.display());
    }
    Ok(path)
}

// ==========================================
// 2. Quotation Tables
// ==========================================

fn amount_cell(amount: rust_decimal::Decimal) -> Cell {
    if amount <= rust_decimal::Decimal::ZERO {
        Cell::new("-").set_alignment(CellAlignment::Right)
    } else {
        Cell::new(format_currency(amount)).set_alignment(CellAlignment::Right)
    }
}

/// The contract document as pretty JSON. Amounts are decimal strings.
fn quote_json(doc: &ContractDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}

fn print_quote(doc: &ContractDocument, lang: Language) {
    let unit = currency_unit(lang);
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("No."),
        Cell::new("Service"),
        Cell::new("Details"),
        Cell::new(format!("Amount ({unit})")),
    ]);

    for (i, item) in doc.line_items.iter().enumerate() {
        let mut details: Vec<String> = detail_lines(item, lang)
            .into_iter()
            .map(|line| format!("{}: {}", line.label, line.value))
            .collect();
        if let Some(notes) = &item.notes {
            details.push(format!("Note: {notes}"));
        }

        let title = if item.kind().is_some() {
            Cell::new(item.title()).add_attribute(Attribute::Bold)
        } else {
            Cell::new(item.title()).fg(Color::Red)
        };

        table.add_row(vec![
            Cell::new(i + 1),
            title,
            Cell::new(details.join("\n")),
            amount_cell(item.effective_price),
        ]);
    }

    if let Some(fee) = doc.travel_fee {
        let label = match lang {
            Language::Th => "ค่าเดินทาง",
            Language::En => "Travel fee",
        };
        table.add_row(vec![
            Cell::new(doc.line_items.len() + 1),
            Cell::new(label),
            Cell::new(""),
            amount_cell(fee),
        ]);
    }

    let summary_row = |label: &str, amount: rust_decimal::Decimal, color: Color| {
        vec![
            Cell::new(""),
            Cell::new(label).add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(format_currency(amount))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Bold)
                .fg(color),
        ]
    };
    table.add_row(summary_row("TOTAL", doc.total_amount, Color::Cyan));
    table.add_row(summary_row("Deposit", doc.deposit_amount, Color::Green));
    table.add_row(summary_row("Balance due", doc.balance_due(), Color::Yellow));

    println!();
    if !doc.customer_name.is_empty() {
        println!("🧾 {}", doc.customer_name);
    }
    println!("{table}");
}

fn print_catalog(lang: Language) {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID"),
        Cell::new("Service"),
        Cell::new("Description"),
        Cell::new(format!("Base price ({})", currency_unit(lang))),
    ]);

    for def in catalog::CATALOG {
        let price = def.base_price();
        let price_cell = if price.is_zero() {
            Cell::new("-")
        } else {
            Cell::new(format_amount(price))
        };
        table.add_row(vec![
            Cell::new(def.id.id()).fg(Color::Cyan),
            Cell::new(def.display_name),
            Cell::new(def.description),
            price_cell.set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
}

// ==========================================
// 3. Contract Generation
// ==========================================

fn write_contract(
    settings: &AppSettings,
    doc: &ContractDocument,
    out: Option<PathBuf>,
    compile: bool,
    open: bool,
    builtin_template: bool,
    lang: Language,
) -> anyhow::Result<()> {
    let root = settings.root();
    let issue_date = Local::now().date_naive();
    let vendor = config::load_vendor_config(&root)?;

    let renderer = if builtin_template {
        ContractRenderer::embedded()?
    } else {
        ContractRenderer::from_dir(&root.join("templates"))?
    };
    let context = ContractContext::new(doc, &vendor, issue_date, lang);
    let rendered = renderer.render(&context)?;

    let out_dir = out.unwrap_or_else(|| {
        let year = doc
            .line_items
            .iter()
            .find_map(|item| item.event.as_ref().and_then(|e| e.event_date))
            .map_or(issue_date.year(), |d| d.year());
        root.join("output").join(year.to_string())
    });
    let typ_path = render::write_contract(&out_dir, &render::suggested_filename(doc), &rendered)?;
    println!("📄 Contract source: {}", typ_path.display());

    if !compile {
        return Ok(());
    }

    println!("\n🔨 Compiling PDF...");
    match render::compile_pdf(&typ_path) {
        CompileOutcome::Compiled(pdf) => {
            println!("✅ PDF Generated: {}", pdf.display());
            if open {
                render::open_and_reveal(&pdf);
            }
        }
        CompileOutcome::TypstMissing => {
            println!("❌ 'typst' is not installed. Install it and run again, or compile the .typ file yourself.");
        }
        CompileOutcome::Failed => println!("❌ Compilation failed."),
    }
    Ok(())
}
