use crate::scenario::{Scenario, ScenarioInput};

/// The fixed set of scenarios the report projects installations for.
pub fn scenario_catalogue() -> Vec<Scenario> {
    let standard_subsidy = ScenarioInput::default().subsidy;

    [
        ("Standard Scenario", None, None, 62., standard_subsidy),
        ("Standard Scenario high CO2 tax", None, None, 103., standard_subsidy),
        ("Standard High Elec", None, Some(40.), 62., standard_subsidy),
        ("Standard Low Elec", None, Some(15.), 62., standard_subsidy),
        ("Standard High Gas", Some(15.), None, 62., standard_subsidy),
        ("Standard Low Gas", Some(4.), None, 62., standard_subsidy),
        ("Standard Subsidy High Gas High CO2 Tax Low Elec", Some(15.), Some(15.), 103., standard_subsidy),
        ("Standard Low Gas Low CO2 Tax High Elec", Some(4.), Some(40.), 40., standard_subsidy),
        ("Increased Subsidy", None, None, 62., 10000.),
        ("Increased Subsidy High Elec", None, Some(40.), 62., 10000.),
        ("Increased Subsidy Low Elec", None, Some(15.), 62., 10000.),
        ("Increased Subsidy High Gas", Some(15.), None, 62., 10000.),
        ("Increased Subsidy Low Gas", Some(4.), None, 62., 10000.),
        ("Increased Subsidy Low Elec High CO2 Tax", None, Some(15.), 103., 10000.),
        ("Increased Subsidy High Gas High CO2 Tax", Some(15.), None, 103., 10000.),
        ("Increased Subsidy High Gas High CO2 Tax Low Elec", Some(15.), Some(15.), 103., 10000.),
        ("Big Subsidy High Gas High CO2 Tax Low Elec", Some(15.), Some(15.), 103., 15000.),
        ("Increased Subsidy Low Gas Low CO2 Tax High Elec", Some(4.), Some(40.), 40., 10000.),
    ]
    .into_iter()
    .map(|(label, gas_price, elec_price, co2_tax_t, subsidy)| {
        let defaults = ScenarioInput::default();
        ScenarioInput {
            label: label.to_string(),
            gas_price: gas_price.unwrap_or(defaults.gas_price),
            elec_price: elec_price.unwrap_or(defaults.elec_price),
            co2_tax_t,
            subsidy,
        }
        .into()
    })
    .collect()
}
