use pagefit::fit::{FitTarget, Rotation, fit_in_rectangle};
use pagefit::geometry::{Orientation, Rect, Size};
use pagefit::layout::{Scroll, compute_layout};
use pagefit::test_utils::test_helpers::sizes;

const VIEWPORT: Size = Size::new(2417, 1363);

#[test]
fn test_full_size_single_page() {
    let layout = compute_layout(&sizes(&[(2417, 1363)]), VIEWPORT, Orientation::WESTERN, 0, 1).unwrap();
    assert_eq!(layout.content_boxes(), &[Rect::from_size([2417, 1363])]);
    assert_eq!(layout.union_box(), Rect::from_size([2417, 1363]));
    assert_eq!(layout.viewport_box(), Rect::from_size([2417, 1363]));
}

#[test]
fn test_double_page_manga_is_reversed() {
    let layout = compute_layout(
        &sizes(&[(961, 1363), (961, 1363)]),
        VIEWPORT,
        Orientation::MANGA,
        0,
        1,
    )
    .unwrap();
    assert_eq!(
        layout.content_boxes(),
        &[Rect::new([1209, 0], [961, 1363]), Rect::new([246, 0], [961, 1363])]
    );
    assert_eq!(layout.union_box(), Rect::from_size([2417, 1363]));
}

#[test]
fn test_double_page_western() {
    let layout = compute_layout(
        &sizes(&[(961, 1363), (961, 1363)]),
        VIEWPORT,
        Orientation::WESTERN,
        0,
        1,
    )
    .unwrap();
    assert_eq!(
        layout.content_boxes(),
        &[Rect::new([247, 0], [961, 1363]), Rect::new([1210, 0], [961, 1363])]
    );
}

#[test]
fn test_content_stays_inside_union() {
    let pages = sizes(&[(700, 1000), (900, 1200), (300, 300)]);
    for orientation in [Orientation::WESTERN, Orientation::MANGA] {
        let layout = compute_layout(&pages, Size::new(1000, 800), orientation, 5, 1).unwrap();
        let union = layout.union_box();
        for b in layout.content_boxes() {
            for idx in 0..2 {
                assert!(b.position()[idx] >= union.position()[idx]);
                assert!(b.position()[idx] + b.size()[idx] <= union.position()[idx] + union.size()[idx]);
            }
        }
        assert!(union.size()[0] >= 1000 && union.size()[1] >= 800);
    }
}

#[test]
fn test_scroll_to_start_follows_reading_direction() {
    let pages = sizes(&[(1500, 1000), (1500, 1000)]);

    let mut western = compute_layout(&pages, Size::new(1000, 1000), Orientation::WESTERN, 0, 1).unwrap();
    western.scroll_to([Scroll::Start, Scroll::Start]);
    assert_eq!(western.current_index(), Some(0));
    assert_eq!(western.viewport_box().position(), [0, 0]);

    let mut manga = compute_layout(&pages, Size::new(1000, 1000), Orientation::MANGA, 0, 1).unwrap();
    manga.scroll_to([Scroll::Start, Scroll::Start]);
    assert_eq!(manga.current_index(), Some(0));
    assert_eq!(manga.viewport_box().position(), [2002, 0]);
}

#[test]
fn test_fit_output_is_never_empty() {
    let targets = [(1, 1), (0, 5), (5, 0), (-1, 3), (3, -1), (1000, 1000)];
    let sources = [(1, 1), (1, 100_000), (100_000, 1), (0, 0), (4000, 3000)];
    for &(tw, th) in &targets {
        for &(sw, sh) in &sources {
            for scale_up in [false, true] {
                let size = fit_in_rectangle(
                    Size::new(sw, sh),
                    FitTarget::new(tw, th),
                    true,
                    scale_up,
                    Rotation::None,
                )
                .unwrap();
                assert!(size.width >= 1 && size.height >= 1, "{sw}x{sh} into {tw}x{th}");
            }
        }
    }
}

#[test]
fn test_fit_is_idempotent_without_scale_up() {
    let target = FitTarget::new(1366, 768);
    for source in [(3000, 2000), (500, 2500), (1366, 768), (20, 10)] {
        let once = fit_in_rectangle(source.into(), target, true, false, Rotation::None).unwrap();
        let twice = fit_in_rectangle(once, target, true, false, Rotation::None).unwrap();
        assert_eq!(once, twice);
    }
}
