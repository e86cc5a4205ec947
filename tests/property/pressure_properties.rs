use proptest::prelude::*;
use spark_page::catalog::governance_levers;
use spark_page::{
    gauge_angle, PressureConfig, PressureModel, RiskBand, GAUGE_ARC_LENGTH,
};

const LEVER_IDS: [&str; 5] = ["land", "supply", "accounting", "subsidies", "ai"];

fn model() -> PressureModel {
    PressureModel::new(governance_levers(), &PressureConfig::default())
}

fn select(model: &PressureModel, mask: &[bool]) {
    for (id, on) in LEVER_IDS.iter().zip(mask) {
        if *on {
            model.toggle(id).unwrap();
        }
    }
}

proptest! {
    #[test]
    fn score_stays_between_floor_and_baseline(mask in prop::collection::vec(any::<bool>(), 5)) {
        let model = model();
        select(&model, &mask);
        let score = model.result().pressure_score;
        prop_assert!((20..=85).contains(&score), "score {} out of range", score);
    }

    #[test]
    fn double_toggle_restores_selection(
        mask in prop::collection::vec(any::<bool>(), 5),
        lever in 0usize..5,
    ) {
        let model = model();
        select(&model, &mask);
        let before = model.selection();
        let result_before = model.result();

        model.toggle(LEVER_IDS[lever]).unwrap();
        model.toggle(LEVER_IDS[lever]).unwrap();

        prop_assert_eq!(model.selection(), before);
        prop_assert_eq!(model.result(), result_before);
    }

    #[test]
    fn more_levers_never_raise_pressure(
        mask in prop::collection::vec(any::<bool>(), 5),
        extra in 0usize..5,
    ) {
        let model = model();
        select(&model, &mask);
        let before = model.result().pressure_score;

        if !model.is_selected(LEVER_IDS[extra]) {
            model.toggle(LEVER_IDS[extra]).unwrap();
        }
        prop_assert!(model.result().pressure_score <= before);
    }

    #[test]
    fn band_matches_score(mask in prop::collection::vec(any::<bool>(), 5)) {
        let model = model();
        select(&model, &mask);
        let result = model.result();
        let expected = match result.pressure_score {
            s if s > 70 => RiskBand::Critical,
            s if s > 50 => RiskBand::High,
            s if s > 30 => RiskBand::Moderate,
            _ => RiskBand::Low,
        };
        prop_assert_eq!(result.risk_band, expected);
    }

    #[test]
    fn gauge_angle_is_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(gauge_angle(lo) <= gauge_angle(hi));
        prop_assert!((-90.0..=90.0).contains(&gauge_angle(a)));
    }

    #[test]
    fn arc_offset_within_track(mask in prop::collection::vec(any::<bool>(), 5)) {
        let model = model();
        select(&model, &mask);
        let offset = model.result().arc_offset();
        prop_assert!((0.0..=GAUGE_ARC_LENGTH).contains(&offset));
    }
}

#[test]
fn gauge_endpoints() {
    assert_eq!(gauge_angle(0.0), -90.0);
    assert_eq!(gauge_angle(100.0), 90.0);
}

#[test]
fn every_lever_reaches_floor() {
    let model = model();
    select(&model, &[true; 5]);
    let result = model.result();
    assert_eq!(result.total_reduction, 80);
    assert_eq!(result.pressure_score, 20);
    assert_eq!(result.risk_band, RiskBand::Low);
}
