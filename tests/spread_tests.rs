use pagefit::geometry::{Orientation, Rect, Size};
use pagefit::library::{PageLibrary, ScanOptions};
use pagefit::settings::Settings;
use pagefit::spread::{SpreadPlanner, VirtualDoublePage};
use pagefit::test_utils::test_helpers::{TempLibraryBuilder, sizes};
use pagefit::zoom::ZoomMode;

fn manga_double_settings() -> Settings {
    Settings {
        reading_direction: pagefit::geometry::ReadingDirection::Manga,
        double_page: true,
        virtual_double_page: VirtualDoublePage::AsOneTitle,
        zoom_mode: ZoomMode::Best,
        ..Settings::default()
    }
}

#[test]
fn test_plan_from_scanned_directory() {
    let dir = TempLibraryBuilder::new()
        .png("003.png", 961, 1363)
        .png("001.png", 961, 1363)
        .png("002.png", 961, 1363)
        .build();
    let settings = manga_double_settings();
    let library = PageLibrary::scan(dir.path(), settings.scan_options()).unwrap();
    let planner = SpreadPlanner::new(settings.spread_options());
    let sizes = library.sizes();

    // the cover stands alone and fits the height
    let cover = planner.plan(&sizes, 0, Size::new(2417, 1363)).unwrap();
    assert_eq!(cover.pages, vec![0]);
    assert_eq!(cover.display_sizes, vec![Size::new(961, 1363)]);
    assert_eq!(cover.layout.content_boxes(), &[Rect::new([728, 0], [961, 1363])]);

    let next = planner.next_index(&sizes, 0);
    assert_eq!(next, 1);
    let spread = planner.plan(&sizes, next, Size::new(2417, 1363)).unwrap();
    assert_eq!(spread.pages, vec![1, 2]);
    assert_eq!(spread.layout.orientation(), Orientation::MANGA);
    assert_eq!(
        spread.layout.content_boxes(),
        &[Rect::new([1209, 0], [961, 1363]), Rect::new([246, 0], [961, 1363])]
    );
    assert_eq!(library.get(spread.pages[0]).unwrap().name, "002.png");
}

#[test]
fn test_spread_with_mismatched_heights_is_normalised() {
    let settings = Settings {
        double_page: true,
        virtual_double_page: VirtualDoublePage::Never,
        zoom_mode: ZoomMode::Manual,
        ..Settings::default()
    };
    let planner = SpreadPlanner::new(settings.spread_options());
    let plan = planner
        .plan(&sizes(&[(500, 1000), (250, 500)]), 0, Size::new(3000, 3000))
        .unwrap();
    assert_eq!(plan.display_sizes, vec![Size::new(500, 1000), Size::new(500, 1000)]);
}

#[test]
fn test_spread_never_overflows_in_best_mode() {
    let planner = SpreadPlanner::new(manga_double_settings().spread_options());
    let pages = sizes(&[(1000, 1400), (1200, 1700), (900, 1300), (1500, 1000), (1000, 1400)]);
    let viewport = Size::new(1920, 1080);
    let mut page = 0;
    loop {
        let plan = planner.plan(&pages, page, viewport).unwrap();
        assert_eq!(plan.layout.union_box(), Rect::from_size([1920, 1080]), "page {page}");
        let next = planner.next_index(&pages, page);
        if next == page {
            break;
        }
        page = next;
    }
}
