use glidepane::{HeaderOptions, NestedScrollSource, Size};
use glidepane_adapter::{HeaderController, SeparatorDrag};

fn main() {
    // Example: a frame-driven header above a scrolling list.
    //
    // An adapter would:
    // - report measured heights after layout
    // - route the list's scroll deltas through on_pre_scroll/on_post_scroll
    // - call on_fling_end when the list's fling runs out
    // - call tick(now_ms) in a frame loop and place the header/body from the frame
    let mut c = HeaderController::new(HeaderOptions::new(56.0, 200.0));
    c.on_header_measured(56.0, 220.0);

    // The list is flung upward and the header collapses along with it. When the fling runs out
    // the header settles to whichever end is nearer.
    for _ in 0..4 {
        c.on_pre_scroll(-20.0, NestedScrollSource::Fling);
    }
    let frame = c.frame();
    println!("before fling end: height={:.1} body_at={:.1}", frame.height, frame.body_offset());

    if c.on_fling_end(0.0, 0.0, 0).is_some() {
        let mut now_ms = 0u64;
        while let Some(frame) = c.tick(now_ms + 16) {
            now_ms += 16;
            let scale = frame.lerp(Size::new(1.0, 1.0), Size::new(0.8, 0.8));
            println!(
                "t={now_ms} height={:.1} progress={:.3} title_scale={:.2}",
                frame.height, frame.progress, scale.width
            );
        }
    }

    // Separator sessions on a two-pane split.
    let mut split = glidepane::SplitLayoutState::new(
        glidepane::SplitOptions::new(2)
            .with_size(800.0)
            .with_min_size(200.0),
    );
    let mut drag = SeparatorDrag::new();
    drag.begin(0);
    for delta in [50.0, 100.0, 100.0, 20.0, -30.0] {
        let moved = drag.drag(&mut split, delta);
        println!(
            "delta={delta} moved={moved} blocked={} left={:.1}",
            drag.is_blocked(),
            split.pane_size(0)
        );
    }
    drag.end();

    let saved = c.save();
    println!("saved={saved:?}");
}
