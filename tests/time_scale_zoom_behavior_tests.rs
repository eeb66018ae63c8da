use approx::assert_abs_diff_eq;
use chrono::{DateTime, TimeZone, Utc};
use fintime_scale::core::{
    FinanceTimeScale, MIN_ZOOM_FACTOR, TickInterval, TimeUnit, ZoomTransform,
};

fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
        .single()
        .expect("valid date")
}

fn trading_days() -> Vec<DateTime<Utc>> {
    [(5, 18), (5, 21), (5, 22), (5, 23), (5, 24), (5, 25), (5, 29), (5, 30), (5, 31), (6, 1)]
        .into_iter()
        .map(|(m, d)| date(2012, m, d))
        .collect()
}

fn build_scale() -> FinanceTimeScale {
    let mut scale = FinanceTimeScale::default();
    scale.set_domain(trading_days()).set_range(48.0, 1052.0);
    scale
}

fn zoomed_scale() -> FinanceTimeScale {
    let scale = build_scale();
    scale.zoomable().set_transform(ZoomTransform::new(1.5, -10.0));
    scale
}

// k = 1.5, x = -10 opens the index window at -0.613; the clamp holds it at
// the initial -0.52, leaving [-0.52, 6.08] across [48, 1052].
const ZOOMED_FIRST_PX: f64 = 127.103_030_303_030_34;
const ZOOMED_LAST_PX: f64 = 1_496.193_939_393_94;
const ZOOMED_STEP_PX: f64 = 1_004.0 / 6.6;

#[test]
fn zoom_translate_shifts_and_widens_mapping() {
    let scale = zoomed_scale();
    let data = trading_days();

    assert_eq!(scale.range(), (48.0, 1052.0));
    assert_abs_diff_eq!(scale.scale(data[0]), ZOOMED_FIRST_PX, epsilon = 1e-9);
    assert_abs_diff_eq!(scale.scale(data[9]), ZOOMED_LAST_PX, epsilon = 1e-9);
    assert_abs_diff_eq!(scale.step(), ZOOMED_STEP_PX, epsilon = 1e-9);
    assert_abs_diff_eq!(scale.band(), ZOOMED_STEP_PX * 0.8, epsilon = 1e-9);
}

#[test]
fn zoom_window_is_clamped_to_initial_index_domain() {
    let scale = zoomed_scale();
    let (start, end) = scale.index_scale().zoomed_domain();

    assert!(scale.zoomable().clamp());
    assert_abs_diff_eq!(start, -0.52, epsilon = 1e-9);
    assert_abs_diff_eq!(end, 6.08, epsilon = 1e-9);
}

#[test]
fn zooming_out_never_shrinks_the_data_below_the_range() {
    let scale = build_scale();
    scale.zoomable().set_transform(ZoomTransform::new(0.5, 0.0));
    let data = trading_days();

    assert_abs_diff_eq!(scale.scale(data[0]), 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(scale.scale(data[9]), 1000.0, epsilon = 1e-9);
    assert_abs_diff_eq!(scale.band(), 80.0, epsilon = 1e-9);
    assert_eq!(scale.domain(), trading_days().as_slice());
}

#[test]
fn unclamped_zoom_follows_the_raw_transform() {
    let scale = zoomed_scale();
    let controller = scale.zoomable();
    controller.set_clamp(false);
    let data = trading_days();

    assert!(!scale.zoomable().clamp());
    assert_abs_diff_eq!(scale.scale(data[0]), 140.0, epsilon = 1e-9);
    assert_abs_diff_eq!(scale.scale(data[9]), 1490.0, epsilon = 1e-9);
    assert_abs_diff_eq!(scale.band(), 120.0, epsilon = 1e-9);
    assert_eq!(scale.domain(), &trading_days()[..7]);

    controller.set_transform(ZoomTransform::new(0.5, 0.0));
    assert_abs_diff_eq!(scale.scale(data[0]), 50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(scale.scale(data[9]), 500.0, epsilon = 1e-9);
    assert_abs_diff_eq!(scale.band(), 40.0, epsilon = 1e-9);
}

#[test]
fn zoom_shrinks_visible_domain_to_in_range_indices() {
    let scale = zoomed_scale();
    assert_eq!(scale.domain(), &trading_days()[..7]);
    assert_eq!(scale.visible_index_bounds(), Some((0, 6)));
    assert_eq!(scale.full_domain().len(), 10);
}

#[test]
fn zoomed_ticks_only_cover_visible_domain() {
    let mut scale = zoomed_scale();

    assert_eq!(scale.ticks(), trading_days()[..7].to_vec());
    assert_eq!(
        scale.ticks_with_count(3),
        vec![date(2012, 5, 21), date(2012, 5, 29)]
    );
    let every_other_day = TickInterval::new(TimeUnit::Day, 2).expect("valid step");
    assert_eq!(
        scale.ticks_with_interval(every_other_day),
        vec![
            date(2012, 5, 21),
            date(2012, 5, 23),
            date(2012, 5, 25),
            date(2012, 5, 29),
        ]
    );
}

#[test]
fn zoom_round_trip_still_holds_outside_visible_window() {
    let scale = zoomed_scale();
    for time in trading_days() {
        assert_eq!(scale.invert(scale.scale(time)), Some(time));
    }
}

#[test]
fn heavy_zoom_leaves_nothing_visible() {
    let mut scale = build_scale();
    scale.zoomable().set_transform(ZoomTransform::new(100.0, 0.0));

    assert!(scale.domain().is_empty());
    assert_eq!(scale.visible_index_bounds(), None);
    assert!(scale.ticks().is_empty());
    assert!(scale.ticks_with_interval(TickInterval::DAY).is_empty());
}

#[test]
fn panning_past_the_data_leaves_nothing_visible() {
    let scale = build_scale();
    scale.zoomable().translate_by(-5_000.0);
    assert!(scale.domain().is_empty());

    scale.zoomable().translate_by(10_000.0);
    assert!(scale.domain().is_empty());

    scale.zoomable().translate_by(-5_000.0);
    assert_eq!(scale.domain().len(), 10);
}

#[test]
fn band_tracks_zoom_mutations_without_resetting_domain() {
    let scale = build_scale();
    let handle = scale.zoomable();

    handle.scale_by(2.0, 550.0);
    assert_abs_diff_eq!(scale.band(), 160.0, epsilon = 1e-9);

    handle.scale_by(0.5, 550.0);
    assert_abs_diff_eq!(scale.band(), 80.0, epsilon = 1e-9);
}

#[test]
fn scale_by_keeps_anchor_fixed() {
    let scale = build_scale();
    let anchor_index = scale.index_scale().pixel_to_index(600.0);

    scale.zoomable().scale_by(3.0, 600.0);

    let after = scale.index_scale().pixel_to_index(600.0);
    assert_abs_diff_eq!(after, anchor_index, epsilon = 1e-9);
    assert_eq!(scale.invert(600.0), Some(trading_days()[5]));
}

#[test]
fn zoom_handles_share_state() {
    let scale = build_scale();
    let controller = scale.zoomable();
    let other = scale.zoomable();

    controller.set_transform(ZoomTransform::new(2.0, 5.0));
    assert!(controller.shares_state_with(&other));
    assert_eq!(other.transform(), ZoomTransform::new(2.0, 5.0));
}

#[test]
fn set_domain_resets_zoom_through_the_shared_handle() {
    let mut scale = zoomed_scale();
    let controller = scale.zoomable();

    scale.set_domain(trading_days());

    assert!(controller.transform().is_identity());
    assert_eq!(scale.domain().len(), 10);

    controller.set_transform(ZoomTransform::new(1.5, -10.0));
    assert_eq!(scale.domain().len(), 7);
}

#[test]
fn copy_snapshots_zoom_independently() {
    let mut scale = zoomed_scale();
    let mut cloned = scale.copy();

    assert_abs_diff_eq!(cloned.scale(trading_days()[0]), ZOOMED_FIRST_PX, epsilon = 1e-9);
    assert_abs_diff_eq!(cloned.scale(trading_days()[9]), ZOOMED_LAST_PX, epsilon = 1e-9);
    assert_eq!(cloned.domain(), &trading_days()[..7]);
    assert_eq!(cloned.ticks(), scale.ticks());

    cloned.zoomable().set_transform(ZoomTransform::new(100.0, 0.0));
    assert!(cloned.domain().is_empty());
    assert_eq!(scale.domain(), &trading_days()[..7]);
    assert_abs_diff_eq!(scale.scale(trading_days()[0]), ZOOMED_FIRST_PX, epsilon = 1e-9);
}

#[test]
fn copy_keeps_clamp_setting_without_sharing_it() {
    let scale = zoomed_scale();
    scale.zoomable().set_clamp(false);

    let cloned = scale.copy();
    assert!(!cloned.zoomable().clamp());

    cloned.zoomable().set_clamp(true);
    assert!(!scale.zoomable().clamp());
    assert_abs_diff_eq!(scale.scale(trading_days()[0]), 140.0, epsilon = 1e-9);
    assert_abs_diff_eq!(cloned.scale(trading_days()[0]), ZOOMED_FIRST_PX, epsilon = 1e-9);
}

#[test]
fn zoom_factor_is_floored_at_minimum() {
    let transform = ZoomTransform::new(0.0, 3.0);
    assert_eq!(transform.k, MIN_ZOOM_FACTOR);

    let scale = build_scale();
    scale.zoomable().scale_by(0.0, 0.0);
    assert_eq!(scale.zoomable().transform().k, MIN_ZOOM_FACTOR);
}

#[test]
fn reset_restores_identity() {
    let scale = zoomed_scale();
    scale.zoomable().reset();
    assert_eq!(scale.domain().len(), 10);
    assert_abs_diff_eq!(scale.scale(trading_days()[0]), 100.0, epsilon = 1e-9);
}
