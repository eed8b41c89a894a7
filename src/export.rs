use crate::error::{DreError, Result};
use crate::period::resolve_period;
use crate::schema::{LineItem, StatementResult};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const TITLE: &str = "DRE - Demonstração do Resultado do Exercício";
const COLUMNS: &str = "Descrição,Valor,Percentual";

/// Writes the statement as a sectioned CSV document.
///
/// Layout: title and period, then `RECEITAS`, `DESPESAS` and `RESULTADO` sections
/// (`"description",value,percentage%` rows), then a `TOTAIS` block. Numbers are
/// plain two-decimal values so the file stays machine readable.
pub fn write_csv<W: Write>(statement: &StatementResult, mut writer: W) -> Result<()> {
    writeln!(writer, "{}", TITLE)?;
    writeln!(writer, "Período: {}", statement.period_label)?;

    write_section(&mut writer, "RECEITAS", &statement.revenue_lines)?;
    write_section(&mut writer, "DESPESAS", &statement.expense_lines)?;
    write_section(&mut writer, "RESULTADO", &statement.result_lines)?;

    writeln!(writer)?;
    writeln!(writer, "TOTAIS")?;
    writeln!(writer, "Total de Receitas,{:.2}", statement.total_revenue)?;
    writeln!(writer, "Total de Despesas,{:.2}", statement.total_expense)?;
    writeln!(writer, "Resultado Líquido,{:.2}", statement.net_result)?;
    writeln!(writer, "Margem Bruta,{:.2}%", statement.gross_margin)?;
    writeln!(writer, "Margem Líquida,{:.2}%", statement.net_margin)?;

    writer.flush()?;
    Ok(())
}

fn write_section<W: Write>(writer: &mut W, title: &str, lines: &[LineItem]) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", title)?;
    writeln!(writer, "{}", COLUMNS)?;

    for line in lines {
        writeln!(
            writer,
            "{},{:.2},{:.2}%",
            quote(&line.description),
            line.value,
            line.percentage
        )?;
    }

    Ok(())
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn to_csv_string(statement: &StatementResult) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(statement, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| DreError::Export(e.to_string()))
}

/// `DRE_<MonthName>_<Year>.csv`, e.g. `DRE_Setembro_2025.csv`.
pub fn export_file_name(statement: &StatementResult) -> Result<String> {
    let window = resolve_period(&statement.period).map_err(|_| {
        DreError::Export(format!(
            "Statement period '{}' is not a YYYY-MM token",
            statement.period
        ))
    })?;

    Ok(format!("DRE_{}_{}.csv", window.month_name(), window.year()))
}

/// Writes the CSV document into `dir` and returns the path of the new file.
pub fn export_to_dir(statement: &StatementResult, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(export_file_name(statement)?);
    let file = File::create(&path)?;
    write_csv(statement, BufWriter::new(file))?;

    info!("Exported statement for {} to {}", statement.period, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LineKind;

    fn statement() -> StatementResult {
        StatementResult {
            period: "2025-09".to_string(),
            period_label: "Setembro de 2025".to_string(),
            revenue_lines: vec![LineItem::new("Vendas de Veículos", 1000.0, LineKind::Revenue, 1000.0)],
            expense_lines: vec![LineItem::new(
                "Peças \"originais\", lote 2",
                120.5,
                LineKind::Expense,
                1000.0,
            )],
            result_lines: vec![LineItem::new("(=) Resultado Líquido", 747.58, LineKind::Result, 1000.0)],
            total_revenue: 1000.0,
            total_expense: 120.5,
            parts_cost: 0.0,
            income_tax: 131.93,
            net_result: 747.58,
            gross_margin: 100.0,
            net_margin: 74.76,
            unavailable_sources: vec![],
        }
    }

    #[test]
    fn test_document_layout() {
        let csv = to_csv_string(&statement()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], TITLE);
        assert_eq!(lines[1], "Período: Setembro de 2025");
        assert_eq!(lines[3], "RECEITAS");
        assert_eq!(lines[4], COLUMNS);
        assert_eq!(lines[5], "\"Vendas de Veículos\",1000.00,100.00%");
        assert_eq!(lines[7], "DESPESAS");
        assert_eq!(lines[9], "\"Peças \"\"originais\"\", lote 2\",120.50,12.05%");
        assert_eq!(lines[11], "RESULTADO");

        let totals = &lines[lines.len() - 6..];
        assert_eq!(
            totals,
            [
                "TOTAIS",
                "Total de Receitas,1000.00",
                "Total de Despesas,120.50",
                "Resultado Líquido,747.58",
                "Margem Bruta,100.00%",
                "Margem Líquida,74.76%",
            ]
        );
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name(&statement()).unwrap(), "DRE_Setembro_2025.csv");

        let mut broken = statement();
        broken.period = "setembro".to_string();
        assert!(matches!(export_file_name(&broken), Err(DreError::Export(_))));
    }

    #[test]
    fn test_export_to_dir() {
        let dir = std::env::temp_dir().join(format!("dre-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let path = export_to_dir(&statement(), &dir).unwrap();
        assert!(path.ends_with("DRE_Setembro_2025.csv"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_csv_string(&statement()).unwrap());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_to_missing_dir_fails_without_touching_statement() {
        let statement = statement();
        let missing = Path::new("/nonexistent/dre/output");

        assert!(matches!(
            export_to_dir(&statement, missing),
            Err(DreError::IoError(_))
        ));
        assert_eq!(statement.net_result, 747.58);
    }
}
