//! Print capacity and billing figures of the current festival to the log
//!
//! ```ignore
//! WORK_DIR=/srv/festival cargo run --bin ledger-report
//! ```

use festival_ledger::{Config, FestivalLedger, init_logger_with_file};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );

    let ledger = FestivalLedger::from_config(&config)?;
    let Some(festival) = ledger.festivals().current()? else {
        tracing::warn!("No current festival set");
        return Ok(());
    };

    tracing::info!(
        festival_id = festival.id,
        name = %festival.name,
        total_tables = festival.total_tables,
        "Current festival"
    );

    for summary in ledger.tariff_zones().list_zones(festival.id)? {
        tracing::info!(
            zone = %summary.zone.name,
            quota = summary.zone.table_quota,
            committed = summary.committed_tables,
            available = summary.available_tables,
            price_per_table = %summary.zone.price_per_table,
            "Tariff zone"
        );
    }

    for summary in ledger.plan_zones().list_zones(festival.id)? {
        tracing::info!(
            zone = %summary.zone.name,
            quota = summary.zone.table_quota,
            occupied = summary.occupied_tables,
            available = summary.available_tables,
            games = summary.placed_games,
            "Plan zone"
        );
    }

    let unplaced = ledger.plan_zones().unplaced_games(festival.id)?;
    if !unplaced.is_empty() {
        tracing::warn!(count = unplaced.len(), "Games waiting for placement");
    }

    for line in ledger.invoices().billing_summary(festival.id)? {
        tracing::info!(
            reservation_id = line.reservation_id,
            reservant_id = line.reservant_id,
            tables = line.committed_tables,
            total = %line.computed.total,
            invoice = line.invoice_number.as_deref().unwrap_or("-"),
            status = line.status.map(|s| s.as_str()).unwrap_or("-"),
            "Billing"
        );
    }

    Ok(())
}
