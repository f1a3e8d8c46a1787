#![allow(clippy::unwrap_used)]

use memviewlib::{
    CellMetrics, Cursor, DisplayConfig, DisplayEvent, HexDisplay, MemViewError, NamedSelection,
    NavKey, Nibble, Point, RenderContext, Rgba, SearchType, Settings, TextGrid,
};
use rand::Rng;

const UNIT: CellMetrics = CellMetrics {
    width: 1.0,
    height: 1.0,
};

const PIXELS: CellMetrics = CellMetrics {
    width: 8.0,
    height: 16.0,
};

fn grid_for(display: &mut HexDisplay, rows: usize) -> TextGrid {
    display.set_cell_metrics(UNIT);
    let grid = TextGrid::new(display.layout().total_chars_per_line(), rows, UNIT);
    let (width, height) = grid.pixel_size();
    display.resize(width, height);
    grid
}

#[test]
fn test_settings_from_file_drive_layout() {
    // Arrange
    let settings = Settings::load("tests/fixtures/memview.toml").unwrap();
    let config = DisplayConfig {
        top_margin: 0.0,
        ..settings.display.clone()
    };
    let mut display = HexDisplay::with_data(config, b"0123456789abcdef".to_vec(), 0xF0);
    let mut grid = grid_for(&mut display, 2);

    // Act
    display.render(&mut grid, &RenderContext::new(settings.palette));

    // Assert
    assert_eq!(
        grid.lines(),
        vec![
            " 000000f0 |30 31 32 33 34 35 36 37 |01234567".to_string(),
            " 000000f8 |38 39 61 62 63 64 65 66 |89abcdef".to_string(),
        ]
    );
}

#[test]
fn test_invalid_settings_file() {
    // Act
    let res = Settings::load("tests/fixtures/invalid.toml");

    // Assert
    assert!(matches!(res, Err(MemViewError::InvalidConfig(_))));
}

#[test]
fn test_debugger_stop_sequence() {
    // Arrange: a 4 byte stack at 100
    let mut display = HexDisplay::with_data(DisplayConfig::default(), b"AAAA".to_vec(), 100);
    display.highlight_address("sp", 100, 1, Rgba::rgb(200, 0, 0));

    // Act: the program writes one byte, then pushes two more
    display.update_at(102, b"BA").unwrap();
    let first_stop = display.dirty().mask().to_vec();
    display.set_new_offset(98, b"XXAABA".to_vec());

    // Assert
    assert_eq!(first_stop, vec![false, false, true, false]);
    assert_eq!(
        display.dirty().mask(),
        &[true, true, false, false, true, false]
    );
    assert_eq!(display.highlights()[0].index_range(display.len()), Some(2..=2));
}

#[test]
fn test_mutation_events_are_queued_in_order() {
    // Arrange
    let mut display = HexDisplay::with_data(DisplayConfig::default(), vec![0; 32], 0);
    display.move_cursor_to(20, Nibble::High);
    display.take_events();

    // Act: shrink below the cursor
    display.update_at(8, b"").unwrap();
    let events = display.take_events();

    // Assert
    assert_eq!(
        events,
        vec![
            DisplayEvent::CursorChanged(memviewlib::CursorChanged {
                previous: Cursor::new(20, Nibble::High),
                current: Cursor::new(7, Nibble::High),
            }),
            DisplayEvent::SelectionChanged,
        ]
    );
    assert!(display.take_events().is_empty());
}

#[test]
fn test_named_selection_outlives_display() {
    // Arrange
    let display = HexDisplay::with_data(DisplayConfig::default(), vec![0; 16], 0x100);
    let sel = NamedSelection::create(display.origin(), "frame", 0x104, 4, Rgba::default());
    assert_eq!(sel.start(), Some(4));

    // Act
    drop(display);

    // Assert
    assert_eq!(sel.start(), None);
    assert!(!sel.contains(4));
}

#[test]
fn test_scrolled_render_shows_later_lines() {
    // Arrange
    let config = DisplayConfig {
        bytes_per_line: 4,
        address_digits: 4,
        top_margin: 0.0,
        ..DisplayConfig::default()
    };
    let mut display = HexDisplay::with_data(config, (0u8..40).collect(), 0);
    let mut grid = grid_for(&mut display, 3);
    display.highlight_range(0, 3, Rgba::rgb(1, 1, 1));

    // Act
    display.set_scroll(0, 5);
    display.render(&mut grid, &RenderContext::default());

    // Assert
    assert_eq!(grid.lines()[0], " 0014 |14 15 16 17 |....");
    assert!(
        (0..grid.pixel_size().0 as usize)
            .all(|col| grid.bg_at(col, 0) != Some(Rgba::rgb(1, 1, 1)))
    );
}

#[test]
fn test_search_hits_are_absolute() {
    // Arrange
    let display = HexDisplay::with_data(
        DisplayConfig::default(),
        b"..GET /index GET /".to_vec(),
        0x8000,
    );

    // Act
    let hits = display.search(&SearchType::Ascii("GET /".to_string()));

    // Assert
    assert_eq!(hits, vec![0x8002, 0x800D]);
}

#[test]
fn test_random_input_keeps_invariants() {
    // Arrange
    let mut rng = rand::rng();
    let initial: Vec<u8> = (0..500).map(|_| rng.random()).collect();
    let config = DisplayConfig {
        bytes_per_line: 16,
        ..DisplayConfig::default()
    };
    let mut display = HexDisplay::with_data(config, initial, 0x4000);
    display.set_cell_metrics(PIXELS);
    display.resize(900.0, 320.0);

    let keys = [
        NavKey::Left,
        NavKey::Right,
        NavKey::Up,
        NavKey::Down,
        NavKey::PageUp,
        NavKey::PageDown,
        NavKey::Home,
        NavKey::End,
    ];

    for _ in 0..3000 {
        // Act
        let p = Point::new(rng.random_range(0.0..900.0), rng.random_range(0.0..320.0));
        match rng.random_range(0..7) {
            0 => display.handle_key(keys[rng.random_range(0..keys.len())]),
            1 => display.press(p),
            2 => display.drag(p),
            3 => display.release(p),
            4 => {
                let len = u64::try_from(display.len()).unwrap();
                let address = display.starting_address() + rng.random_range(0..=len);
                let bytes: Vec<u8> = (0..rng.random_range(0..64)).map(|_| rng.random()).collect();
                display.update_at(address, &bytes).unwrap();
            }
            5 => {
                display.scroll_lines(rng.random_range(-10..10));
            }
            _ => {
                let start = 0x3FF0 + rng.random_range(0..32);
                let bytes: Vec<u8> = (0..rng.random_range(1..600)).map(|_| rng.random()).collect();
                display.set_new_offset(start, bytes);
            }
        }

        // Assert
        assert!(display.is_empty() || display.cursor().address < display.len());
        assert!(display.selection().start() <= display.selection().end());
        assert!(display.viewport().vertical() <= display.viewport().vertical_max());
        assert_eq!(display.dirty().mask().len(), display.len());
    }
}
