//! Ready-made effects. Each builds a tween over a shared target's
//! accessors, schedules it, and returns the task handle so callers can
//! cancel or compose it from their own scripts.

use std::cell::RefCell;
use std::f32::consts::PI;
use std::rc::Rc;

use cuesheet_core::{ColorRgba, Ease, EasePreset, Scheduler, TaskId, TweenOptions, Tweenable};

use crate::visual::{TextVisual, Visual};

/// Default pulse highlight, a shade of green.
pub const PULSE_COLOR: ColorRgba = [0.404, 0.812, 0.439, 1.0];

const WOBBLE_RADIANS: f32 = 10.0 * PI / 180.0;
const WOBBLE_DURATION: f32 = 0.3;

/// Per-effect overrides, passed through to the underlying tween.
#[derive(Debug, Default)]
pub struct EffectCfg {
    /// Seconds; defaults to the scheduler's default duration.
    pub duration: Option<f32>,
    /// Defaults to linear, except where an effect has its own shape.
    pub ease: Option<Ease>,
}

impl EffectCfg {
    fn into_options<T: Tweenable>(self) -> TweenOptions<T> {
        TweenOptions {
            duration: self.duration,
            ease: self.ease.unwrap_or_default(),
            ..TweenOptions::default()
        }
    }
}

/// Slide the target's position to `to`.
pub fn move_to<V: Visual + 'static>(
    sched: &mut Scheduler,
    target: &Rc<RefCell<V>>,
    to: [f32; 2],
    cfg: EffectCfg,
) -> TaskId {
    let getter = Rc::clone(target);
    let setter = Rc::clone(target);
    sched.interpolate(
        move || getter.borrow().position(),
        move |p| setter.borrow_mut().set_position(p),
        to,
        cfg.into_options(),
    )
}

/// Slide the target's position by a delta from where it is now.
pub fn move_by<V: Visual + 'static>(
    sched: &mut Scheduler,
    target: &Rc<RefCell<V>>,
    delta: [f32; 2],
    cfg: EffectCfg,
) -> TaskId {
    let [x, y] = target.borrow().position();
    move_to(sched, target, [x + delta[0], y + delta[1]], cfg)
}

/// Slide the target's size to `to`.
pub fn resize_to<V: Visual + 'static>(
    sched: &mut Scheduler,
    target: &Rc<RefCell<V>>,
    to: [f32; 2],
    cfg: EffectCfg,
) -> TaskId {
    let getter = Rc::clone(target);
    let setter = Rc::clone(target);
    sched.interpolate(
        move || getter.borrow().size(),
        move |v| setter.borrow_mut().set_size(v),
        to,
        cfg.into_options(),
    )
}

/// Fade the target away.
pub fn fade_out<V: Visual + 'static>(
    sched: &mut Scheduler,
    target: &Rc<RefCell<V>>,
    cfg: EffectCfg,
) -> TaskId {
    let getter = Rc::clone(target);
    let setter = Rc::clone(target);
    sched.interpolate(
        move || getter.borrow().alpha(),
        move |a| setter.borrow_mut().set_alpha(a),
        0.0,
        cfg.into_options(),
    )
}

/// Fade the target in from fully transparent, whatever its current alpha.
pub fn fade_in<V: Visual + 'static>(
    sched: &mut Scheduler,
    target: &Rc<RefCell<V>>,
    cfg: EffectCfg,
) -> TaskId {
    let getter = Rc::clone(target);
    let setter = Rc::clone(target);
    let mut opts = cfg.into_options();
    opts.start_value = Some(0.0);
    sched.interpolate(
        move || getter.borrow().alpha(),
        move |a| setter.borrow_mut().set_alpha(a),
        1.0,
        opts,
    )
}

/// Pulse the target's background to `color` and back. The configured ease
/// (default ease-in) shapes the outbound half; the mirror combinator
/// brings the color home.
pub fn pulse<V: Visual + 'static>(
    sched: &mut Scheduler,
    target: &Rc<RefCell<V>>,
    color: ColorRgba,
    cfg: EffectCfg,
) -> TaskId {
    let getter = Rc::clone(target);
    let setter = Rc::clone(target);
    let ease = cfg
        .ease
        .unwrap_or(Ease::Preset(EasePreset::EaseIn))
        .mirrored();
    sched.interpolate(
        move || getter.borrow().background(),
        move |c| setter.borrow_mut().set_background(c),
        color,
        TweenOptions {
            duration: cfg.duration,
            ease,
            ..TweenOptions::default()
        },
    )
}

/// Slide the target's rotation to an absolute angle, in radians.
pub fn rotate_to<V: Visual + 'static>(
    sched: &mut Scheduler,
    target: &Rc<RefCell<V>>,
    radians: f32,
    cfg: EffectCfg,
) -> TaskId {
    let getter = Rc::clone(target);
    let setter = Rc::clone(target);
    sched.interpolate(
        move || getter.borrow().rotation(),
        move |r| setter.borrow_mut().set_rotation(r),
        radians,
        cfg.into_options(),
    )
}

/// Slide the target's rotation by a relative angle, in radians.
pub fn rotate_by<V: Visual + 'static>(
    sched: &mut Scheduler,
    target: &Rc<RefCell<V>>,
    radians: f32,
    cfg: EffectCfg,
) -> TaskId {
    let current = target.borrow().rotation();
    rotate_to(sched, target, current + radians, cfg)
}

/// A short attention-getting wobble: the rotation swings about ten degrees
/// either way and settles back where it started.
pub fn wobble<V: Visual + 'static>(sched: &mut Scheduler, target: &Rc<RefCell<V>>) -> TaskId {
    let current = target.borrow().rotation();
    rotate_to(
        sched,
        target,
        current + WOBBLE_RADIANS,
        EffectCfg {
            duration: Some(WOBBLE_DURATION),
            ease: Some(Ease::custom(cuesheet_core::oscillate)),
        },
    )
}

/// Reveal the target's current text one character at a time over the
/// duration. The full text is captured up front; the target shows longer
/// and longer prefixes until the whole string is back.
pub fn reveal_text<V: TextVisual + 'static>(
    sched: &mut Scheduler,
    target: &Rc<RefCell<V>>,
    cfg: EffectCfg,
) -> TaskId {
    let full: Vec<char> = target.borrow().text().chars().collect();
    let len = full.len() as f32;
    let setter = Rc::clone(target);
    let mut opts: TweenOptions<f32> = cfg.into_options();
    opts.start_value = Some(0.0);
    sched.interpolate(
        move || 0.0,
        move |progress: f32| {
            let shown = (progress.round().max(0.0) as usize).min(full.len());
            setter.borrow_mut().set_text(full[..shown].iter().collect());
        },
        len,
        opts,
    )
}
