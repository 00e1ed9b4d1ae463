use approx::assert_abs_diff_eq;
use telanneal::{
    codec::{read_schedule, write_schedule},
    constants::{BEST_STATE_HEADER, DPI},
    movement_cost, sample, switch_representation, total_distance, Pointing, Schedule,
};

#[test]
fn test_sample_thousand_pointings() {
    let first = sample(1, 1000, 1);
    let again = sample(1, 1000, 1);
    let other = sample(1, 1000, 2);

    assert_eq!(first, again);
    assert_ne!(first.schedule, other.schedule);

    let min_phi = (0.02 * std::f64::consts::FRAC_PI_2).sin().asin();
    assert!(first.schedule.iter().all(|p| p.phi() >= min_phi - 1e-12));
    assert!(first.schedule.iter().all(|p| !p.is_other_representation()));
}

#[test]
fn test_wrap_invariance() {
    let a = Pointing::new(0, 0.1, 0.2);
    let b = Pointing::new(1, 6.2, 0.2);
    let b_shifted = Pointing::new(1, 6.2 - DPI, 0.2);
    let a_shifted = Pointing::new(0, 0.1 + DPI, 0.2);

    let reference = movement_cost(&a, &b);
    assert_abs_diff_eq!(reference, DPI - 6.1, epsilon = 1e-12);
    assert_abs_diff_eq!(movement_cost(&a, &b_shifted), reference, epsilon = 1e-12);
    assert_abs_diff_eq!(movement_cost(&a_shifted, &b), reference, epsilon = 1e-12);
}

#[test]
fn test_switching_changes_cost_not_direction() {
    let a = Pointing::new(0, 1.0, 0.6);
    let b = Pointing::new(1, 1.2, 0.5);
    let b_other = switch_representation(b);

    assert_abs_diff_eq!(movement_cost(&a, &b), 0.2, epsilon = 1e-12);
    assert!(movement_cost(&a, &b_other) > 1.0);
    assert_eq!(b_other.plot_coordinates(), b.plot_coordinates());
}

#[test]
fn test_schedule_round_trip_keeps_distance() {
    let schedule: Schedule = vec![
        Pointing::new(0, 0.25, 0.5),
        Pointing::new(1, 3.0, 1.1),
        Pointing::new(2, 5.5, 0.05),
        Pointing::new(3, 1.75, 0.8).switch_representation(),
        Pointing::new(4, 6.0, 0.3),
    ]
    .into_iter()
    .collect();

    let mut buffer = Vec::new();
    write_schedule(&mut buffer, BEST_STATE_HEADER, &schedule).unwrap();
    let parsed = read_schedule(buffer.as_slice(), BEST_STATE_HEADER, "buffer").unwrap();

    assert_eq!(parsed.count_other_representation(), 1);
    assert_abs_diff_eq!(
        total_distance(&parsed),
        schedule.total_distance(),
        epsilon = 1e-9
    );
    assert_eq!(total_distance(&parsed[..1]), 0.0);
}
