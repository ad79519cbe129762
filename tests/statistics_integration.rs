//! Inequality measures and configuration loading

use agent_economy::stats::{gini, hoover};
use agent_economy::{simulate, EconError, GovernmentType, SimulationConfig};

#[test]
fn test_gini_reference_values() {
    assert_eq!(gini(&[]), 0.0);
    assert_eq!(gini(&[7.0]), 0.0);
    assert_eq!(gini(&[5.0, 5.0, 5.0]), 0.0);
    assert!((gini(&[0.0, 0.0, 0.0, 10.0]) - 0.75).abs() < 1e-12);
}

#[test]
fn test_gini_scale_invariance() {
    let values = [1.0, 4.0, 9.0, 16.0, 25.0];
    let scaled: Vec<f64> = values.iter().map(|v| v * 3.7).collect();
    assert!((gini(&values) - gini(&scaled)).abs() < 1e-12);
    assert!((hoover(&values) - hoover(&scaled)).abs() < 1e-12);
}

#[test]
fn test_partial_toml_overrides_defaults() {
    let config = SimulationConfig::from_toml_str(
        r#"
        months = 4
        runs = 2

        [government]
        government_type = "representative"
        tax_adjustment_frequency = 2

        [firms]
        num_firms = 6

        [households]
        num_households = 60
        "#,
    )
    .unwrap();

    assert_eq!(config.months, 4);
    assert_eq!(config.government.government_type, GovernmentType::Representative);
    assert_eq!(config.government.tax_gamma, 4.0);
    assert_eq!(config.households.cr_decay, 0.9);

    let output = simulate(config).unwrap();
    assert_eq!(output.statistician.num_runs(), 2);
    assert!(output.summary().contains("party_seats"));
}

#[test]
fn test_invalid_toml_values_rejected() {
    let err = SimulationConfig::from_toml_str("[households]\nnum_households = 0\n").unwrap_err();
    assert!(matches!(err, EconError::InvalidConfig(_)));

    let err = SimulationConfig::from_toml_str("months = \"twelve\"").unwrap_err();
    assert!(matches!(err, EconError::TomlError(_)));
}
