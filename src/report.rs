//! Plain text rendering of the regression summary and the scenario projection table.
use crate::projection::ProjectionResult;
use crate::regression::RegressionSummary;
use std::io;
use std::io::Write;
use tabwriter::{Alignment, TabWriter};

pub const PROJECTION_HEADINGS: [&str; 6] = [
    "Scenario",
    "Gas price (post-tax)",
    "Electricity price",
    "Subsidy (£)",
    "CO₂ tax (£/tCO₂)",
    "Projected Yearly Installations",
];

/// Writes rows of cells as right-aligned columns, without padding after the last column.
fn write_table(writer: &mut impl Write, rows: &[Vec<String>]) -> io::Result<()> {
    let mut laid_out = vec![];
    {
        // every cell is tab-terminated so that the last column is aligned too
        let mut table = TabWriter::new(&mut laid_out)
            .padding(2)
            .alignment(Alignment::Right);
        for row in rows {
            writeln!(table, "{}\t", row.join("\t"))?;
        }
        table.flush()?;
    }

    for line in String::from_utf8_lossy(&laid_out).lines() {
        writeln!(writer, "{}", line.trim_end())?;
    }

    Ok(())
}

pub fn write_regression_summary(
    mut writer: impl Write,
    summary: &RegressionSummary,
) -> io::Result<()> {
    let mut rows = vec![vec!["Feature".to_string(), "Coefficient".to_string()]];
    rows.extend(
        summary
            .ranked_coefficients
            .iter()
            .map(|(feature, coefficient)| vec![feature.to_string(), format!("{coefficient:.6}")]),
    );

    writeln!(writer, "Regression Coefficients:")?;
    write_table(&mut writer, &rows)?;
    writeln!(writer, "R² score: {:.3}", summary.r2)?;

    writer.flush()
}

pub fn write_projection_table(
    mut writer: impl Write,
    projections: &[ProjectionResult],
) -> io::Result<()> {
    let mut rows = vec![PROJECTION_HEADINGS.map(str::to_string).to_vec()];
    rows.extend(projections.iter().map(|projection| {
        vec![
            projection.label.clone(),
            format_thousands(projection.gas_price_posttax),
            format_thousands(projection.elec_price),
            format!("{:.0}", projection.subsidy),
            format_thousands(projection.co2_tax_t),
            projection.yearly_installations.to_string(),
        ]
    }));

    write_table(&mut writer, &rows)?;

    writer.flush()
}

/// Formats a value rounded to zero decimal places, with commas between groups of thousands.
pub fn format_thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return format!("{value:.0}");
    }

    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value.is_sign_negative() {
        formatted.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }

    formatted
}
