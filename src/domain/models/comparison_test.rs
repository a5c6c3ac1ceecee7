use ratatui::prelude::Rect;

use super::ComparisonSlider;

fn area() -> Rect {
    return Rect::new(10, 0, 40, 20);
}

#[test]
fn it_starts_centered() {
    let slider = ComparisonSlider::default();
    assert_eq!(slider.position, 50.0);
    assert!(!slider.is_dragging());
}

#[test]
fn it_ignores_moves_without_drag() {
    let mut slider = ComparisonSlider::default();
    slider.drag_to(20, area());
    assert_eq!(slider.position, 50.0);
}

#[test]
fn it_tracks_drag_as_percentage() {
    let mut slider = ComparisonSlider::default();
    slider.begin_drag();
    slider.drag_to(20, area());
    assert_eq!(slider.position, 25.0);

    slider.drag_to(40, area());
    assert_eq!(slider.position, 75.0);
}

#[test]
fn it_clamps_to_pane_edges() {
    let mut slider = ComparisonSlider::default();
    slider.begin_drag();

    slider.drag_to(0, area());
    assert_eq!(slider.position, 0.0);

    slider.drag_to(200, area());
    assert_eq!(slider.position, 100.0);
}

#[test]
fn it_stops_tracking_after_release() {
    let mut slider = ComparisonSlider::default();
    slider.begin_drag();
    slider.drag_to(20, area());
    slider.release();
    slider.drag_to(40, area());

    assert!(!slider.is_dragging());
    assert_eq!(slider.position, 25.0);
}

#[test]
fn it_nudges_within_bounds() {
    let mut slider = ComparisonSlider::default();
    slider.nudge(-70.0);
    assert_eq!(slider.position, 0.0);
    slider.nudge(5.0);
    assert_eq!(slider.position, 5.0);
    slider.nudge(500.0);
    assert_eq!(slider.position, 100.0);
}

#[test]
fn it_computes_split_column() {
    let mut slider = ComparisonSlider::default();
    assert_eq!(slider.split_column(40), 20);
    slider.nudge(50.0);
    assert_eq!(slider.split_column(40), 40);
    slider.nudge(-100.0);
    assert_eq!(slider.split_column(40), 0);
}
