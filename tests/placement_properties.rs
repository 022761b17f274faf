use term_chat::layout::{Bounds, DeviceClass, DeviceMode, PlacementMetrics, PositionSolver, Size, solve};

const BOX: Size = Size::new(200, 150);

fn anchors(viewport: Size) -> impl Iterator<Item = Bounds> {
    let xs = (0..viewport.width - 40).step_by(37);
    xs.flat_map(move |x| {
        (0..viewport.height - 20)
            .step_by(53)
            .map(move |y| Bounds::new(x, y, 40, 20))
    })
}

#[test]
fn desktop_box_stays_inside_margins() {
    for viewport in [Size::new(1280, 800), Size::new(1024, 600), Size::new(800, 400)] {
        for anchor in anchors(viewport) {
            let p = solve(anchor, viewport, DeviceClass::Desktop, BOX);
            assert!(p.x >= 16, "{anchor:?} in {viewport:?} -> {p:?}");
            assert!(p.x + BOX.width <= viewport.width - 16, "{anchor:?} -> {p:?}");
            assert!(p.y >= 16, "{anchor:?} -> {p:?}");
            assert!(p.y + BOX.height <= viewport.height - 16, "{anchor:?} -> {p:?}");
        }
    }
}

#[test]
fn desktop_box_never_covers_the_anchor_when_there_is_room() {
    let viewport = Size::new(1280, 800);
    for anchor in anchors(viewport) {
        let room_right = anchor.right() + 8 + BOX.width <= viewport.width - 16;
        let room_left = anchor.left() - 8 - BOX.width >= 16;
        if !(room_right || room_left) {
            continue;
        }
        let p = solve(anchor, viewport, DeviceClass::Desktop, BOX);
        let placed = Bounds::at(p, BOX);
        assert!(
            placed.right() <= anchor.left() || placed.left() >= anchor.right(),
            "{anchor:?} -> {placed:?}"
        );
    }
}

#[test]
fn mobile_box_avoids_the_sidebar() {
    let solver = PositionSolver::default();
    for width in (440..=768).step_by(16) {
        let viewport = Size::new(width, 900);
        let sidebar = solver.sidebar_width(width);
        assert!(sidebar <= 160);
        for anchor in anchors(viewport) {
            let p = solver.solve(anchor, viewport, DeviceClass::Mobile, BOX);
            assert!(p.x >= sidebar + 8, "width {width}: {p:?}");
            assert!(p.x + BOX.width <= width - 8, "width {width}: {p:?}");
            assert!(p.y >= 16 && p.y + BOX.height <= 900 - 16);
        }
    }
}

#[test]
fn device_mode_auto_follows_breakpoint() {
    let metrics = PlacementMetrics::default();
    assert_eq!(
        DeviceMode::Auto.resolve(Size::new(768, 900), &metrics),
        DeviceClass::Mobile
    );
    assert_eq!(
        DeviceMode::Auto.resolve(Size::new(769, 900), &metrics),
        DeviceClass::Desktop
    );
    assert_eq!(
        DeviceMode::Mobile.resolve(Size::new(1920, 1080), &metrics),
        DeviceClass::Mobile
    );
}

#[test]
fn terminal_metrics_keep_menus_on_screen() {
    let solver = PositionSolver::new(PlacementMetrics::terminal());
    let viewport = Size::new(100, 30);
    let menu = Size::new(16, 6);
    for anchor in anchors(viewport) {
        let p = solver.solve(anchor, viewport, DeviceClass::Desktop, menu);
        assert!(p.x >= 1 && p.x + menu.width <= 99, "{anchor:?} -> {p:?}");
        assert!(p.y >= 1 && p.y + menu.height <= 29, "{anchor:?} -> {p:?}");
    }
}
