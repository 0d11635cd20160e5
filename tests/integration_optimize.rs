mod common;

use efinops::model::types::EquipmentSizing;
use efinops::optimizer::{Axis, Objective, SearchOptions, SearchSpace, optimize_with};
use efinops::{OptimizeError, optimize};

#[test]
fn npv_search_picks_the_only_profitable_asset() {
    let cfg = common::pv_dominant_config();
    let outcome = optimize(&cfg, Objective::MaximizeNpv, &SearchSpace::default()).unwrap();

    assert_eq!(outcome.evaluated, 1296);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(outcome.best_sizing, EquipmentSizing::new(0.0, 10_000.0, 0.0, 0.0));
    assert!(outcome.evaluation.metrics.npv > 0.0);
    assert_eq!(outcome.best_value, -outcome.evaluation.metrics.npv);
}

#[test]
fn reported_value_matches_recomputed_evaluation() {
    let cfg = common::reference_config();
    let lifespan = cfg.economics.lifespan_years;
    for objective in Objective::ALL {
        let outcome = optimize(&cfg, objective, &common::coarse_space()).unwrap();
        assert_eq!(outcome.evaluation.sizing, outcome.best_sizing);
        assert_eq!(
            objective.value(&outcome.evaluation.metrics, lifespan),
            outcome.best_value
        );
        let no_better = outcome
            .candidates
            .iter()
            .filter_map(|c| c.objective_value)
            .all(|v| !objective.is_better(v, outcome.best_value));
        assert!(no_better, "{objective}: a candidate beats the reported best");
    }
}

#[test]
fn parallel_search_matches_serial() {
    let cfg = common::reference_config();
    let serial = optimize(&cfg, Objective::MaximizeIrr, &common::coarse_space()).unwrap();
    let parallel = optimize_with(
        &cfg,
        Objective::MaximizeIrr,
        &common::coarse_space(),
        &SearchOptions {
            parallel: true,
            cancel: None,
        },
    )
    .unwrap();
    assert_eq!(serial, parallel);
}

#[test]
fn zero_demand_returns_first_candidate() {
    let mut cfg = common::reference_config();
    cfg.demand.electricity_kwh = 0.0;
    cfg.demand.heat_kwh = 0.0;
    cfg.demand.cooling_kwh = 0.0;
    for objective in Objective::ALL {
        let outcome = optimize(&cfg, objective, &common::coarse_space()).unwrap();
        assert_eq!(outcome.best_sizing, EquipmentSizing::default());
    }
}

#[test]
fn best_sizing_is_snapped() {
    let cfg = common::reference_config();
    let space = SearchSpace {
        heat_pump_kw: Axis::new(0.0, 1000.0, 4),
        ..common::coarse_space()
    };
    let outcome = optimize(&cfg, Objective::MaximizeNpv, &space).unwrap();
    assert!([0.0, 330.0, 670.0, 1000.0].contains(&outcome.best_sizing.heat_pump_kw));
    assert!(outcome.candidates.iter().all(|c| c.sizing.heat_pump_kw % 10.0 == 0.0));
}

#[test]
fn malformed_axis_is_rejected() {
    let cfg = common::reference_config();
    let space = SearchSpace {
        pv_area_m2: Axis::new(0.0, 1000.0, 0),
        ..SearchSpace::default()
    };
    assert!(matches!(
        optimize(&cfg, Objective::MaximizeNpv, &space),
        Err(OptimizeError::InvalidAxis { axis: "pv_area_m2", .. })
    ));
}

#[test]
fn faulting_candidates_are_skipped() {
    // any PV area overflows CAPEX and yields a NaN NPV
    let mut cfg = common::reference_config();
    cfg.photovoltaic.cost_per_m2 = 1e305;
    let outcome = optimize(&cfg, Objective::MaximizeNpv, &common::coarse_space()).unwrap();

    assert_eq!(outcome.evaluated, 81);
    assert_eq!(outcome.skipped, 54);
    assert_eq!(outcome.best_sizing.pv_area_m2, 0.0);
    assert!(outcome.best_value.is_finite());
    assert!(outcome.evaluation.metrics.npv.is_finite());

    let skipped: Vec<_> = outcome
        .candidates
        .iter()
        .filter(|c| c.objective_value.is_none())
        .collect();
    assert!(skipped.iter().all(|c| c.sizing.pv_area_m2 > 0.0));
    assert!(skipped.iter().all(|c| c.skip_reason.is_some()));
}

#[test]
fn all_candidates_faulting_is_infeasible() {
    let mut cfg = common::reference_config();
    cfg.photovoltaic.cost_per_m2 = 1e305;
    let space = SearchSpace {
        pv_area_m2: Axis::new(5000.0, 10_000.0, 3),
        ..common::coarse_space()
    };
    assert_eq!(
        optimize(&cfg, Objective::MaximizeNpv, &space),
        Err(OptimizeError::NoFeasibleSolution { evaluated: 81 })
    );
}

#[test]
fn oversized_grid_is_rejected_before_enumeration() {
    let cfg = common::reference_config();
    let space = SearchSpace {
        pv_area_m2: Axis::new(0.0, 1000.0, usize::MAX),
        ..SearchSpace::default()
    };
    assert!(matches!(
        optimize(&cfg, Objective::MaximizeNpv, &space),
        Err(OptimizeError::InvalidAxis { axis: "pv_area_m2", .. })
    ));
}
