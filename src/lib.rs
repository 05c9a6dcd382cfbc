pub mod catalogue;
pub mod errors;
pub mod features;
pub mod input;
pub mod output;
pub mod projection;
pub mod regression;
pub mod report;
pub mod scenario;

use crate::catalogue::scenario_catalogue;
use crate::features::prepare_training_data;
use crate::input::HistoricalRecord;
use crate::output::{Output, ReportSection};
use crate::projection::{project_scenarios, ProjectionAssumptions, ProjectionResult};
use crate::regression::{FittedModel, RegressionSummary};
use crate::report::{write_projection_table, write_regression_summary};
use tracing::debug;

/// Relative path of the historical data spreadsheet.
pub const INPUT_FILE: &str = "gb_heat_V2.xlsx";

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisResults {
    pub model: FittedModel,
    pub summary: RegressionSummary,
    pub projections: Vec<ProjectionResult>,
}

/// Fits the uptake model to the historical records, projects every catalogued scenario and
/// writes the report to `output`.
pub fn run_analysis(
    records: &[HistoricalRecord],
    output: impl Output,
) -> anyhow::Result<AnalysisResults> {
    let training_rows = prepare_training_data(records);

    let model = FittedModel::fit(&training_rows)?;
    let summary = model.summarise(&training_rows);
    write_section(&output, ReportSection::Regression, |writer| {
        write_regression_summary(writer, &summary)
    })?;

    let projections = project_scenarios(
        &model,
        &scenario_catalogue(),
        &ProjectionAssumptions::default(),
    );
    write_section(&output, ReportSection::Projections, |writer| {
        write_projection_table(writer, &projections)
    })?;

    Ok(AnalysisResults {
        model,
        summary,
        projections,
    })
}

fn write_section(
    output: &impl Output,
    section: ReportSection,
    write: impl FnOnce(&mut dyn std::io::Write) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    if output.is_noop() {
        return Ok(());
    }

    debug!("Writing {} section", <&str>::from(section));
    let mut writer = output.writer_for_section(section)?;
    write(&mut writer)?;

    Ok(())
}
