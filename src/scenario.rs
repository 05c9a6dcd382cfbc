use crate::features::FeatureRow;

/// CO2 intensity of gas, in kgCO2/kWh.
pub const GAS_CARBON_INTENSITY: f64 = 0.235;

pub const KILOGRAMS_PER_TONNE: f64 = 1_000.;

/// Inputs for a [`Scenario`], with the central case as defaults.
///
/// Arguments
/// * `label` - name used in the report
/// * `gas_price` - pre-tax gas price, in £/kWh
/// * `elec_price` - electricity price, in £/kWh
/// * `co2_tax_t` - carbon tax on gas, in £ per tonne CO2 emitted
/// * `subsidy` - subsidy per heat pump installation, in £
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioInput {
    pub label: String,
    pub gas_price: f64,
    pub elec_price: f64,
    pub co2_tax_t: f64,
    pub subsidy: f64,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        Self {
            label: "Scenario 1".to_string(),
            gas_price: 6.24,
            elec_price: 24.5,
            co2_tax_t: 0.,
            subsidy: 7500.,
        }
    }
}

/// A hypothetical future for gas and electricity prices, subsidy and carbon tax.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    label: String,
    gas_price_pretax: f64,
    elec_price: f64,
    co2_tax_kg: f64,
    subsidy: f64,
    gas_price_posttax: f64,
}

impl From<ScenarioInput> for Scenario {
    fn from(input: ScenarioInput) -> Self {
        let ScenarioInput {
            label,
            gas_price,
            elec_price,
            co2_tax_t,
            subsidy,
        } = input;
        let co2_tax_kg = co2_tax_t / KILOGRAMS_PER_TONNE;

        Self {
            label,
            gas_price_pretax: gas_price,
            elec_price,
            co2_tax_kg,
            subsidy,
            gas_price_posttax: gas_price + co2_tax_kg * GAS_CARBON_INTENSITY,
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        ScenarioInput::default().into()
    }
}

impl Scenario {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn gas_price_pretax(&self) -> f64 {
        self.gas_price_pretax
    }

    /// Gas price including the carbon tax, in £/kWh
    pub fn gas_price_posttax(&self) -> f64 {
        self.gas_price_posttax
    }

    pub fn elec_price(&self) -> f64 {
        self.elec_price
    }

    /// Carbon tax in £/kgCO2
    pub fn co2_tax_kg(&self) -> f64 {
        self.co2_tax_kg
    }

    /// Carbon tax in £/tCO2
    pub fn co2_tax_t(&self) -> f64 {
        self.co2_tax_kg * KILOGRAMS_PER_TONNE
    }

    pub fn subsidy(&self) -> f64 {
        self.subsidy
    }

    /// The scenario expressed as a row of regression features.
    pub fn feature_row(&self) -> FeatureRow {
        FeatureRow {
            elec_price_recent: self.elec_price,
            gas_price_recent: self.gas_price_posttax,
            subsidy_level: self.subsidy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn taxed_scenario() -> Scenario {
        ScenarioInput {
            label: "Standard Scenario".to_string(),
            co2_tax_t: 62.,
            ..Default::default()
        }
        .into()
    }

    #[rstest]
    fn should_add_carbon_tax_to_gas_price(taxed_scenario: Scenario) {
        assert_eq!(
            taxed_scenario.gas_price_posttax(),
            6.24 + (62. / 1000.) * 0.235
        );
        assert_eq!(taxed_scenario.co2_tax_kg(), 0.062);
    }

    #[rstest]
    fn should_leave_gas_price_untaxed_by_default() {
        let scenario = Scenario::default();

        assert_eq!(scenario.label(), "Scenario 1");
        assert_eq!(scenario.gas_price_pretax(), 6.24);
        assert_eq!(scenario.gas_price_posttax(), scenario.gas_price_pretax());
        assert_eq!(scenario.elec_price(), 24.5);
        assert_eq!(scenario.co2_tax_t(), 0.);
        assert_eq!(scenario.subsidy(), 7500.);
    }

    #[rstest]
    fn should_express_co2_tax_per_tonne_for_display(taxed_scenario: Scenario) {
        assert_relative_eq!(taxed_scenario.co2_tax_t(), 62., max_relative = 1e-12);
    }

    #[rstest]
    fn should_build_feature_row_from_posttax_gas_price(taxed_scenario: Scenario) {
        assert_eq!(
            taxed_scenario.feature_row(),
            FeatureRow {
                elec_price_recent: 24.5,
                gas_price_recent: taxed_scenario.gas_price_posttax(),
                subsidy_level: 7500.,
            }
        );
    }
}
