use proptest::prelude::*;
use spark_page::{
    probe_y, ScrollEmitter, ScrollSample, Section, SectionTracker, TrackerConfig,
};

fn spans() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0f64..5000.0, 1.0f64..2000.0), 1..8)
}

fn sections(spans: &[(f64, f64)]) -> Vec<Section> {
    spans
        .iter()
        .enumerate()
        .map(|(i, (top, height))| Section::new(format!("s{}", i), i, *top, *height))
        .collect()
}

proptest! {
    #[test]
    fn active_is_registered_or_initial(
        spans in spans(),
        samples in prop::collection::vec((-500.0f64..8000.0, 100.0f64..1200.0), 1..20),
    ) {
        let sections = sections(&spans);
        let tracker = SectionTracker::new("initial", &TrackerConfig::default());
        tracker.replace_sections(sections.clone()).unwrap();

        let emitter = ScrollEmitter::new();
        tracker.attach(&emitter);

        for (scroll_y, height) in samples {
            emitter.emit(ScrollSample::new(scroll_y, height));
            let current = tracker.current();
            prop_assert!(
                current == "initial" || sections.iter().any(|s| s.id == current),
                "unexpected active id {}", current
            );
        }
    }

    #[test]
    fn first_matching_section_wins(
        spans in spans(),
        scroll_y in -500.0f64..8000.0,
        height in 100.0f64..1200.0,
    ) {
        let sections = sections(&spans);
        let tracker = SectionTracker::new("initial", &TrackerConfig::default());
        tracker.replace_sections(sections.clone()).unwrap();

        let sample = ScrollSample::new(scroll_y, height);
        tracker.evaluate(&sample);

        let probe = probe_y(&sample, TrackerConfig::default().probe_fraction);
        let expected = sections
            .iter()
            .find(|s| probe >= s.dom_top && probe < s.dom_top + s.dom_height)
            .map(|s| s.id.clone())
            .unwrap_or_else(|| "initial".to_string());
        prop_assert_eq!(tracker.current(), expected);
    }

    #[test]
    fn no_match_keeps_previous(spans in spans(), height in 100.0f64..1200.0) {
        let sections = sections(&spans);
        let tracker = SectionTracker::new("initial", &TrackerConfig::default());
        tracker.replace_sections(sections).unwrap();

        tracker.evaluate(&ScrollSample::new(0.0, height));
        let before = tracker.current();

        // Far below every section
        tracker.evaluate(&ScrollSample::new(1.0e6, height));
        prop_assert_eq!(tracker.current(), before);
    }

    #[test]
    fn detached_tracker_ignores_samples(spans in spans(), scroll_y in 0.0f64..8000.0) {
        let tracker = SectionTracker::new("initial", &TrackerConfig::default());
        tracker.replace_sections(sections(&spans)).unwrap();

        let emitter = ScrollEmitter::new();
        tracker.attach(&emitter);
        tracker.detach();

        emitter.emit(ScrollSample::new(scroll_y, 600.0));
        prop_assert_eq!(tracker.current(), "initial");
    }
}

#[test]
fn three_contiguous_sections() {
    let tracker = SectionTracker::new("one", &TrackerConfig::default());
    tracker
        .replace_sections(vec![
            Section::new("one", 0, 0.0, 100.0),
            Section::new("two", 1, 100.0, 150.0),
            Section::new("three", 2, 250.0, 150.0),
        ])
        .unwrap();

    tracker.evaluate(&ScrollSample::new(0.0, 300.0));
    assert_eq!(tracker.current(), "two");

    tracker.evaluate(&ScrollSample::new(-50.0, 300.0));
    assert_eq!(tracker.current(), "one");
}
