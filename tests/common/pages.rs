use std::path::PathBuf;

use jump_to::cli::config::AppConfig;
use jump_to::commands::controller::Controller;
use jump_to::labels::overlay::MemorySurface;
use jump_to::page::page_model::{PageElement, PageSnapshot, Rect, Viewport};
use jump_to::page::snapshot::SnapshotPage;

pub type TestController = Controller<SnapshotPage, MemorySurface>;

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Small link boxes laid out 20 per row inside the default viewport.
pub fn grid_rect(i: usize) -> Rect {
    let col = (i % 20) as f64;
    let row = (i / 20) as f64;
    Rect::new(30.0 + col * 62.0, 10.0 + row * 24.0, 40.0, 18.0)
}

pub fn links(n: usize) -> SnapshotPage {
    SnapshotPage::with_elements(
        (0..n)
            .map(|i| PageElement::link(&format!("link {}", i), &format!("/l/{}", i), grid_rect(i)))
            .collect(),
    )
}

pub fn texts(texts: &[&str]) -> SnapshotPage {
    SnapshotPage::with_elements(
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| PageElement::link(t, &format!("/t/{}", i), grid_rect(i)))
            .collect(),
    )
}

/// 382 links: 4 contain "sing" (one of them "singl"), 188 contain "s", 194 have no "s".
pub fn search_snapshot() -> PageSnapshot {
    let mut elements = vec![
        PageElement::link("single cloud", "https://news.example/user?id=single_cloud", grid_rect(0)),
        PageElement::link("rising star", "/rising", grid_rect(1)),
        PageElement::link("missing docs", "/missing", grid_rect(2)),
        PageElement::link("closing time", "/closing", grid_rect(3)),
    ];
    for i in 4..188 {
        elements.push(PageElement::link(&format!("post {}", i), &format!("/p/{}", i), grid_rect(i)));
    }
    for i in 188..382 {
        elements.push(PageElement::link(&format!("item {}", i), &format!("/i/{}", i), grid_rect(i)));
    }
    PageSnapshot {
        url: "https://news.example/".to_string(),
        title: "news".to_string(),
        viewport: Viewport::default(),
        elements,
        focused: None,
    }
}

/// Four links hugging the corners of the default viewport.
pub fn edge_page() -> SnapshotPage {
    SnapshotPage::with_elements(vec![
        PageElement::link("top left", "/tl", Rect::new(0.0, 0.0, 120.0, 20.0)),
        PageElement::link("top right", "/tr", Rect::new(1200.0, 0.0, 80.0, 20.0)),
        PageElement::link("bottom left", "/bl", Rect::new(0.0, 700.0, 100.0, 20.0)),
        PageElement::link("bottom right", "/br", Rect::new(1180.0, 700.0, 100.0, 20.0)),
    ])
}

pub fn controller(page: SnapshotPage) -> TestController {
    let mut controller = Controller::new(page, MemorySurface::new(), &AppConfig::default());
    controller.install();
    controller
}
