use dre_statement_builder::*;
use serde_json::json;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("📊 Monthly DRE Demo\n");

    let gateway = StaticGateway::new()
        .with_rows(
            SourceKind::Sales,
            vec![
                json!({ "sale_price": 89900, "commission": 2500, "sale_date": "2025-09-02" }),
                json!({ "sale_price": 45500, "commission": 1200, "sale_date": "2025-09-30" }),
            ],
        )
        .with_rows(
            SourceKind::Ledger,
            vec![
                json!({ "amount": 8000, "type": "despesa", "transaction_date": "2025-09-05", "description": "Folha de pagamento" }),
                json!({ "amount": 1500, "type": "receita", "transaction_date": "2025-09-10", "description": "Aluguel de box" }),
            ],
        )
        .with_rows(
            SourceKind::ServiceOrders,
            vec![json!({ "total_amount": 1800, "start_date": "2025-09-12" })],
        )
        .with_rows(
            SourceKind::Proposals,
            vec![json!({ "vehicle_price": 72000, "proposal_date": "2025-09-18", "status": "aceita" })],
        )
        .with_failure(SourceKind::Parts, "parts service offline");

    let engine = StatementEngine::new(Arc::new(gateway), EstimatePolicy::default())?;
    let statement = engine.compute("2025-09").await?;

    println!("Period: {}", statement.period_label);
    if statement.is_partial() {
        println!("⚠️  Unavailable sources: {:?}", statement.unavailable_sources);
    }

    println!("\nRECEITAS");
    for line in &statement.revenue_lines {
        println!("  {:<35} {:>12.2} {:>7.2}%", line.description, line.value, line.percentage);
    }

    println!("\nDESPESAS");
    for line in &statement.expense_lines {
        println!("  {:<35} {:>12.2} {:>7.2}%", line.description, line.value, line.percentage);
    }

    println!("\nRESULTADO");
    for line in &statement.result_lines {
        println!("  {:<35} {:>12.2} {:>7.2}%", line.description, line.value, line.percentage);
    }

    println!(
        "\nGross margin {:.2}% | Net margin {:.2}%",
        statement.gross_margin, statement.net_margin
    );

    let path = export_to_dir(&statement, &std::env::temp_dir())?;
    println!("\n✓ CSV written to {}", path.display());

    Ok(())
}
