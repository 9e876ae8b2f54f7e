//! Integration tests for gradient rasterization and preview sizing
//!
//! These tests verify:
//! - Determinism of `render`
//! - Edge and center pixels for linear and radial gradients
//! - The color-swap / reversed-direction symmetry
//! - `target_size` lower bounds for degenerate viewports

use gradientgen::models::{Color, Direction, GradientSpec, Position};
use gradientgen::services::{PreviewScaler, render};
use proptest::prelude::*;

fn color() -> impl Strategy<Value = Color> {
    any::<[u8; 3]>().prop_map(Color::from)
}

fn direction() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn position() -> impl Strategy<Value = Position> {
    prop::sample::select(Position::ALL.to_vec())
}

fn within_one(actual: Color, expected: Color) -> bool {
    actual
        .channels()
        .iter()
        .zip(expected.channels())
        .all(|(a, e)| a.abs_diff(e) <= 1)
}

#[test]
fn test_red_to_blue_scenario() {
    let spec = GradientSpec::linear(
        Direction::LeftToRight,
        Color::parse("#FF0000").unwrap(),
        Color::parse("#0000FF").unwrap(),
        100,
        1,
    )
    .unwrap();
    let image = render(&spec).unwrap();

    assert_eq!(image.pixel(0, 0), Some(Color::new(255, 0, 0)));
    let last = image.pixel(99, 0).unwrap();
    assert!(within_one(last, Color::new(2, 0, 253)), "{last:?}");
}

#[test]
fn test_radial_black_to_white_scenario() {
    let spec = GradientSpec::radial(Position::Center, Color::BLACK, Color::WHITE, 10, 10).unwrap();
    let image = render(&spec).unwrap();

    assert_eq!(image.pixel(5, 5), Some(Color::BLACK));
    assert!(within_one(image.pixel(0, 0).unwrap(), Color::WHITE));
}

#[test]
fn test_every_direction_renders_full_image() {
    for direction in Direction::ALL {
        let spec = GradientSpec::linear(direction, Color::BLACK, Color::WHITE, 7, 5).unwrap();
        let image = render(&spec).unwrap();
        assert_eq!(image.dimensions(), (7, 5));
        assert_eq!(image.as_bytes().len(), 7 * 5 * 3);
    }
}

#[test]
fn test_unknown_names_fall_back() {
    assert_eq!(Direction::from_name("diagonal"), Direction::TopLeftToBottomRight);
    assert_eq!(Position::from_name("middle"), Position::Center);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn render_is_deterministic(
        primary in color(),
        secondary in color(),
        direction in direction(),
        w in 1u32..48,
        h in 1u32..48,
    ) {
        let spec = GradientSpec::linear(direction, primary, secondary, w, h).unwrap();
        prop_assert_eq!(render(&spec).unwrap(), render(&spec).unwrap());
    }

    #[test]
    fn radial_render_is_deterministic(
        primary in color(),
        secondary in color(),
        position in position(),
        w in 1u32..48,
        h in 1u32..48,
    ) {
        let spec = GradientSpec::radial(position, primary, secondary, w, h).unwrap();
        prop_assert_eq!(render(&spec).unwrap(), render(&spec).unwrap());
    }

    #[test]
    fn swapped_colors_with_reversed_direction_match(
        primary in color(),
        secondary in color(),
        direction in direction(),
        w in 1u32..48,
        h in 1u32..48,
    ) {
        let spec = GradientSpec::linear(direction, primary, secondary, w, h).unwrap();
        let mirrored =
            GradientSpec::linear(direction.reversed(), secondary, primary, w, h).unwrap();
        prop_assert_eq!(render(&spec).unwrap(), render(&mirrored).unwrap());
    }

    #[test]
    fn left_to_right_edges_match_colors(
        primary in color(),
        secondary in color(),
        w in 255u32..600,
        h in 1u32..4,
    ) {
        let spec = GradientSpec::linear(Direction::LeftToRight, primary, secondary, w, h).unwrap();
        let image = render(&spec).unwrap();
        for y in 0..h {
            prop_assert_eq!(image.pixel(0, y), Some(primary));
            let last = image.pixel(w - 1, y).unwrap();
            prop_assert!(within_one(last, secondary), "{:?} vs {:?}", last, secondary);
        }
    }

    #[test]
    fn radial_center_and_corner_match_colors(
        primary in color(),
        secondary in color(),
        half_w in 1u32..40,
        half_h in 1u32..40,
    ) {
        let (w, h) = (half_w * 2, half_h * 2);
        let spec = GradientSpec::radial(Position::Center, primary, secondary, w, h).unwrap();
        let image = render(&spec).unwrap();
        prop_assert_eq!(image.pixel(half_w, half_h), Some(primary));
        prop_assert_eq!(image.pixel(0, 0), Some(secondary));
    }

    #[test]
    fn target_size_is_never_zero(
        available_w in any::<i64>(),
        available_h in any::<i64>(),
        image_w in 1u32..100_000,
        image_h in 1u32..100_000,
        zoom in -10.0f64..10.0,
    ) {
        let (w, h) = PreviewScaler::default()
            .target_size(available_w, available_h, image_w, image_h, zoom);
        prop_assert!(w >= 1 && h >= 1);
        prop_assert!(w <= 801 && h <= 801);
    }
}
