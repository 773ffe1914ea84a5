//! Daily reconciliation run example

use chrono::NaiveDate;
use recon_core::utils::{read_detail_lines, MemoryUpdater, SkipBlankLines};
use recon_core::{
    checksum, control::split_control_lines, HolidaySet, MemorySink, ReconciliationEngine,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📋 Recon Core - Daily Run Example\n");

    // 1. Load the holiday configuration
    println!("📅 Parsing holiday configuration...");
    let holidays = HolidaySet::parse("01-01#01-05#18-09#19-09#25-12")?;
    println!("  ✓ {} recurring holidays configured\n", holidays.0.len());

    // 2. Read the control and detail datasets (normally files on disk)
    let control = split_control_lines(vec![
        "FECHA_PROCESO;FECHA_ULT_VENTA;REGISTROS",
        "15-03-2024;14-03-2024;3",
    ]);
    let detail_lines = vec!["30686957", "", "11111111", "22222222", "   "];
    let details = read_detail_lines(detail_lines, &SkipBlankLines);
    println!("📄 Detail file yielded {} records after skip policy", details.len());

    // Identifiers with a check digit can be validated up front
    for raw in ["30.686.957-4", "30.686.957-5"] {
        println!(
            "  checksum {} -> {}",
            raw,
            if checksum::validate_raw(raw) { "valid" } else { "INVALID" }
        );
    }
    println!();

    // 3. Run the pipeline
    println!("⚙️  Running reconciliation...");
    let updater = MemoryUpdater::new();
    let sink = MemorySink::new();
    let mut engine = ReconciliationEngine::new(updater.clone())
        .with_holidays(holidays)
        // Pin the reference date so the example is reproducible; production
        // omits this and uses the current local date.
        .with_today(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
        .with_sink(Box::new(sink.clone()));

    let report = engine.run(&control, &details).await;

    println!("  outcome:        {:?}", report.outcome);
    println!("  applied:        {}", report.applied);
    println!("  failed updates: {}", report.failed_updates);
    println!("  exit code:      {}", report.exit_code());

    for (outcome, message) in sink.messages() {
        println!("  notification [{:?}]: {}", outcome, message);
    }

    for id in [30686957i64, 11111111, 22222222] {
        println!(
            "  status of {id}: {}",
            updater.status_of(id).unwrap_or_else(|| "<unchanged>".into())
        );
    }

    Ok(())
}
