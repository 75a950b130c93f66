//! SST filing and deduction claim walkthrough

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use cukai_core::utils::round_money;
use cukai_core::{
    compute_ea_summary, days_until_due, next_filing_period, periods_back, CategoryTable,
    DeductionCalculator, EaRecord, FilingPeriod, Invoice, SstCalculator, SstFiling, TaxSettings,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🧾 Cukai Core - SST and Deduction Examples\n");

    let settings = match std::env::args().nth(1) {
        Some(path) => TaxSettings::load(path)?,
        None => TaxSettings::default(),
    };
    let sst = SstCalculator::new(&settings)?;
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).ok_or("invalid date")?;

    // 1. Invoices entered in either date format
    let invoices = vec![
        Invoice::new("INV-001".to_string(), BigDecimal::from(1000), "10/05/2024")
            .with_client("Kedai Runcit Ali".to_string()),
        Invoice::new("INV-002".to_string(), BigDecimal::from(2000), "2024-05-20")
            .with_client("Syarikat Maju".to_string()),
        Invoice::new("INV-003".to_string(), BigDecimal::from(4500), "03/06/2024")
            .with_client("Kopitiam Sdn Bhd".to_string()),
    ];

    // 2. Next filing period and recent history
    let next = next_filing_period(today);
    let next_due = next.due_date()?;
    println!("📅 Next filing period: {}", next.label());
    println!("  Due: {} ({} days)", next_due, days_until_due(next_due, today));
    println!();

    println!("📊 Recent periods ({} months):", settings.history_months);
    for descriptor in periods_back(settings.history_months, next.year(), next.month())? {
        let summary = sst.summarize(&invoices, descriptor.period)?;
        println!(
            "  {:<15} {} to {}  invoices: {}  SST: RM {}",
            descriptor.period.label(),
            descriptor.start,
            descriptor.end,
            summary.invoice_count,
            round_money(&summary.sst_payable)
        );
    }
    println!();

    // 3. Filing lifecycle for May
    let mut filing = SstFiling::for_period(FilingPeriod::new(2024, 5)?, &invoices, &sst)?;
    filing.mark_ready();
    println!(
        "🗂️  May 2024 filing: {:?}, RM {}",
        filing.status,
        round_money(&filing.total_amount)
    );
    println!("  Overdue on {}: {}", today, filing.is_overdue(today));
    println!();

    // 4. Deduction claims
    println!("💼 Deduction claims:");
    let calculator = DeductionCalculator::new(CategoryTable::standard());
    let expenses = [("rent", 4500), ("computers", 3000), ("epf", 5000), ("yacht", 800)];
    for (category_id, amount) in expenses {
        let claim = calculator.claimable(category_id, &BigDecimal::from(amount));
        println!(
            "  {:<10} RM {:>8} -> RM {:>8} ({}%, {:?})",
            category_id,
            amount,
            round_money(&claim.amount),
            round_money(&claim.percent),
            claim.basis
        );
    }
    println!();

    // 5. EA form summary
    let ea = EaRecord {
        gross_salary: BigDecimal::from(5000),
        epf_employee: BigDecimal::from(550),
        socso: BigDecimal::from(20),
        eis: BigDecimal::from(5),
        ..EaRecord::new("Nur Aisyah".to_string(), 2024)
    };
    let summary = compute_ea_summary(&ea);
    println!("👤 EA summary for {}:", ea.employee_name);
    println!("  Total remuneration:    RM {}", round_money(&summary.total_remuneration));
    println!("  Net employment income: RM {}", round_money(&summary.net_employment_income));

    Ok(())
}
