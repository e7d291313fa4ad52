use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cuesheet_core::{
    Config, Ease, EasePreset, Scheduler, SetSequence, SetValue, TweenOptions,
};

fn sink<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl FnMut(T) + 'static) {
    let store: Rc<RefCell<Vec<T>>> = Rc::new(RefCell::new(Vec::new()));
    let writer = Rc::clone(&store);
    (store, move |v: T| writer.borrow_mut().push(v))
}

#[test]
fn final_value_is_exactly_the_end_value() {
    let mut s = Scheduler::new(Config::default());
    let (applied, set) = sink::<f32>();
    let id = s.interpolate(
        || 0.1f32,
        set,
        0.3,
        TweenOptions {
            duration: Some(0.25),
            ..TweenOptions::default()
        },
    );

    s.tick(0.0).unwrap();
    s.tick(0.1).unwrap();
    s.tick(0.2).unwrap();
    let r = s.tick(0.3).unwrap();
    assert!(r.finished(id));

    let applied = applied.borrow();
    // Bit-for-bit equality, not closeness: the completing step substitutes
    // the end value instead of trusting float accumulation.
    assert_eq!(*applied.last().unwrap(), 0.3f32);
    assert!(applied.len() >= 2);
}

#[test]
fn zero_duration_applies_exactly_one_step() {
    let mut s = Scheduler::new(Config::default());
    let (applied, set) = sink::<f32>();
    let id = s.interpolate(
        || 0.0f32,
        set,
        5.0,
        TweenOptions {
            duration: Some(0.0),
            ..TweenOptions::default()
        },
    );

    let r = s.tick(0.0).unwrap();
    assert!(r.finished(id));
    assert_eq!(*applied.borrow(), vec![5.0f32]);
}

#[test]
fn equal_endpoints_apply_exactly_one_step() {
    let mut s = Scheduler::new(Config::default());
    let (applied, set) = sink::<f32>();
    let id = s.interpolate(
        || 2.5f32,
        set,
        2.5,
        TweenOptions {
            duration: Some(10.0),
            ..TweenOptions::default()
        },
    );

    let r = s.tick(0.0).unwrap();
    assert!(r.finished(id));
    assert_eq!(*applied.borrow(), vec![2.5f32]);
}

#[test]
fn midpoint_follows_the_easing_curve() {
    let mut s = Scheduler::new(Config::default());
    let (applied, set) = sink::<f32>();
    s.interpolate(
        || 0.0f32,
        set,
        1.0,
        TweenOptions {
            duration: Some(1.0),
            ease: Ease::Preset(EasePreset::EaseIn),
            ..TweenOptions::default()
        },
    );

    s.tick(0.0).unwrap();
    s.tick(0.5).unwrap();
    s.tick(1.0).unwrap();

    let applied = applied.borrow();
    assert!((applied[0] - 0.0).abs() < 1e-6);
    let expected_mid = EasePreset::EaseIn.apply(0.5);
    assert!((applied[1] - expected_mid).abs() < 1e-6);
    assert!(applied[1] < 0.5, "ease-in lags linear progress");
    assert_eq!(*applied.last().unwrap(), 1.0f32);
}

#[test]
fn color_slides_component_wise() {
    let mut s = Scheduler::new(Config::default());
    let (applied, set) = sink::<[f32; 4]>();
    let id = s.interpolate(
        || [0.0, 0.0, 0.0, 1.0],
        set,
        [1.0, 0.5, 0.0, 0.5],
        TweenOptions {
            duration: Some(1.0),
            ..TweenOptions::default()
        },
    );

    s.tick(0.0).unwrap();
    s.tick(0.5).unwrap();
    let r = s.tick(1.0).unwrap();
    assert!(r.finished(id));

    let applied = applied.borrow();
    let mid = applied[1];
    for (got, want) in mid.iter().zip([0.5, 0.25, 0.0, 0.75]) {
        assert!((got - want).abs() < 1e-6);
    }
    assert_eq!(*applied.last().unwrap(), [1.0, 0.5, 0.0, 0.5]);
}

#[test]
fn vector_values_slide_component_wise() {
    let mut s = Scheduler::new(Config::default());
    let (applied, set) = sink::<Vec<f32>>();
    s.interpolate(
        || vec![0.0, 10.0],
        set,
        vec![1.0, 20.0],
        TweenOptions {
            duration: Some(1.0),
            ..TweenOptions::default()
        },
    );

    s.tick(0.0).unwrap();
    s.tick(0.5).unwrap();
    s.tick(1.0).unwrap();

    let applied = applied.borrow();
    assert!((applied[1][0] - 0.5).abs() < 1e-6);
    assert!((applied[1][1] - 15.0).abs() < 1e-6);
    assert_eq!(*applied.last().unwrap(), vec![1.0, 20.0]);
}

#[test]
fn start_value_override_skips_get() {
    let mut s = Scheduler::new(Config::default());
    let gets = Rc::new(Cell::new(0u32));
    let gets2 = Rc::clone(&gets);
    let (applied, set) = sink::<f32>();
    s.interpolate(
        move || {
            gets2.set(gets2.get() + 1);
            0.0f32
        },
        set,
        10.0,
        TweenOptions {
            start_value: Some(5.0),
            duration: Some(1.0),
            ..TweenOptions::default()
        },
    );

    s.tick(0.0).unwrap();
    s.tick(0.5).unwrap();
    s.tick(1.0).unwrap();

    assert_eq!(gets.get(), 0);
    let applied = applied.borrow();
    assert!((applied[1] - 7.5).abs() < 1e-6);
    assert_eq!(*applied.last().unwrap(), 10.0f32);
}

#[test]
fn map_and_side_effect_run_every_applied_step() {
    let mut s = Scheduler::new(Config::default());
    let effects = Rc::new(Cell::new(0u32));
    let effects2 = Rc::clone(&effects);
    let (applied, set) = sink::<f32>();
    s.interpolate(
        || 0.0f32,
        set,
        5.0,
        TweenOptions {
            duration: Some(1.0),
            map: Some(Box::new(|v| v * 2.0)),
            side_effect: Some(Box::new(move || effects2.set(effects2.get() + 1))),
            ..TweenOptions::default()
        },
    );

    s.tick(0.0).unwrap();
    s.tick(0.5).unwrap();
    s.tick(1.0).unwrap();

    let applied = applied.borrow();
    assert_eq!(effects.get() as usize, applied.len());
    // The completion guarantee applies to the mapped end value.
    assert_eq!(*applied.last().unwrap(), 10.0f32);
}

#[test]
fn custom_delta_and_compose_define_the_value_space() {
    let mut s = Scheduler::new(Config::default());
    let (applied, set) = sink::<f32>();
    // Geometric interpolation: delta is the ratio, compose raises it to the
    // progress fraction.
    s.interpolate(
        || 1.0f32,
        set,
        16.0,
        TweenOptions {
            duration: Some(1.0),
            delta: Some(Box::new(|start, end| end / start)),
            compose: Some(Box::new(|start, fraction, delta| {
                start * delta.powf(fraction)
            })),
            ..TweenOptions::default()
        },
    );

    s.tick(0.0).unwrap();
    s.tick(0.5).unwrap();
    s.tick(1.0).unwrap();

    let applied = applied.borrow();
    assert!((applied[0] - 1.0).abs() < 1e-5);
    assert!((applied[1] - 4.0).abs() < 1e-4, "geometric midpoint");
    assert!((applied.last().unwrap() - 16.0).abs() < 1e-4);
}

#[test]
fn oscillating_ease_returns_to_start() {
    let mut s = Scheduler::new(Config::default());
    let (applied, set) = sink::<f32>();
    let id = s.interpolate(
        || 2.0f32,
        set,
        3.0,
        TweenOptions {
            duration: Some(1.0),
            ease: Ease::custom(cuesheet_core::oscillate),
            ..TweenOptions::default()
        },
    );

    s.tick(0.0).unwrap();
    s.tick(0.25).unwrap();
    s.tick(0.75).unwrap();
    let r = s.tick(1.0).unwrap();
    assert!(r.finished(id));

    let applied = applied.borrow();
    assert!((applied[1] - 3.0).abs() < 1e-5, "peaks at the end value");
    assert!((applied[2] - 1.0).abs() < 1e-5, "troughs below the start");
    assert!(
        (applied.last().unwrap() - 2.0).abs() < 1e-5,
        "ends where it started"
    );
}

#[test]
fn mirrored_ease_round_trips_through_the_end_value() {
    let mut s = Scheduler::new(Config::default());
    let (applied, set) = sink::<f32>();
    s.interpolate(
        || 0.0f32,
        set,
        1.0,
        TweenOptions {
            duration: Some(1.0),
            ease: Ease::Preset(EasePreset::Linear).mirrored(),
            ..TweenOptions::default()
        },
    );

    s.tick(0.0).unwrap();
    s.tick(0.5).unwrap();
    s.tick(0.75).unwrap();
    s.tick(1.0).unwrap();

    let applied = applied.borrow();
    assert!((applied[1] - 1.0).abs() < 1e-6, "full value at the midpoint");
    assert!((applied[2] - 0.5).abs() < 1e-6, "halfway back down");
    assert!(applied.last().unwrap().abs() < 1e-6, "back at the start");
}

#[test]
fn default_duration_comes_from_config() {
    let mut s = Scheduler::new(Config {
        default_duration: 2.0,
        ..Config::default()
    });
    let (applied, set) = sink::<f32>();
    let id = s.interpolate(|| 0.0f32, set, 1.0, TweenOptions::default());

    s.tick(0.0).unwrap();
    let r = s.tick(1.9).unwrap();
    assert!(!r.finished(id));
    let r = s.tick(2.0).unwrap();
    assert!(r.finished(id));
    assert_eq!(*applied.borrow().last().unwrap(), 1.0f32);
}

#[test]
fn set_value_applies_once_and_completes() {
    let mut s = Scheduler::new(Config::default());
    let (applied, set) = sink::<&'static str>();
    let id = s.schedule(SetValue::new(set, "ready"));

    let r = s.tick(0.0).unwrap();
    assert!(r.finished(id));
    assert_eq!(*applied.borrow(), vec!["ready"]);
}

#[test]
fn set_sequence_applies_one_item_per_tick() {
    let mut s = Scheduler::new(Config::default());
    let (applied, set) = sink::<u32>();
    let id = s.schedule(SetSequence::new(set, 1..=3u32));

    s.tick(0.0).unwrap();
    s.tick(0.1).unwrap();
    s.tick(0.2).unwrap();
    assert_eq!(*applied.borrow(), vec![1, 2, 3]);
    assert!(!s.is_finished(id));

    let r = s.tick(0.3).unwrap();
    assert!(r.finished(id));
}
